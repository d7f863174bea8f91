use dioxus::prelude::*;
use pinpoint_shared::LocationQuery;

use crate::api::{self, MapFollow};
use crate::components::hourly_forecast::HourlyForecast;
use crate::components::weather_card::WeatherCard;
use crate::state::Dashboard;

#[component]
pub fn Search() -> Element {
    let dashboard = use_context::<Dashboard>();
    let mut city = use_signal(String::new);

    let run = {
        let dashboard = dashboard.clone();
        move |name: String| {
            api::start_lookup(
                dashboard.client.as_ref(),
                LocationQuery::City(name),
                dashboard.search,
                dashboard.theme,
                Some(MapFollow {
                    viewport: dashboard.viewport,
                    board: dashboard.map,
                }),
            );
        }
    };

    let units = dashboard
        .client
        .as_ref()
        .map(|c| c.units())
        .unwrap_or_default();
    let board = dashboard.search.read();

    rsx! {
        div { class: "panel search-panel",
            form {
                class: "search-form",
                onsubmit: {
                    let run = run.clone();
                    move |evt: Event<FormData>| {
                        evt.prevent_default();
                        run(city.read().clone());
                    }
                },
                input {
                    r#type: "text",
                    placeholder: "Enter a city...",
                    value: "{city}",
                    oninput: move |evt: Event<FormData>| city.set(evt.value()),
                }
                button { r#type: "submit", "Search" }
            }
            div { class: "quick-picks",
                for name in api::QUICK_PICKS.iter().copied() {
                    button {
                        key: "{name}",
                        class: "secondary",
                        onclick: {
                            let run = run.clone();
                            move |_| {
                                city.set(name.to_string());
                                run(name.to_string());
                            }
                        },
                        "{name}"
                    }
                }
            }
        }
        div { class: "panel",
            WeatherCard { weather: board.weather.clone(), place: None, units, detailed: false }
            HourlyForecast { forecast: board.forecast.clone(), units }
        }
    }
}
