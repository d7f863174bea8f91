use dioxus::prelude::*;
use pinpoint_shared::{icon_url_small, Forecast, LookupStatus, TemperatureUnit};

/// One tile of the hourly strip, ready to render.
#[derive(Debug, Clone, PartialEq)]
struct HourTile {
    label: String,
    temperature: String,
    icon: String,
    description: String,
}

fn tiles(forecast: &Forecast, units: TemperatureUnit) -> Vec<HourTile> {
    forecast
        .samples
        .iter()
        .map(|s| HourTile {
            label: format!("{}:00", s.local_hour(forecast.timezone_offset)),
            temperature: units.format(s.temperature),
            icon: icon_url_small(&s.icon),
            description: s.description.clone(),
        })
        .collect()
}

#[component]
pub fn HourlyForecast(forecast: LookupStatus<Forecast>, units: TemperatureUnit) -> Element {
    match forecast {
        LookupStatus::Ready(forecast) if !forecast.samples.is_empty() => {
            let tiles = tiles(&forecast, units);
            rsx! {
                div { class: "forecast",
                    h4 { "Next 24 Hours" }
                    div { class: "hourly",
                        for HourTile { label, temperature, icon, description } in tiles {
                            div { class: "hourly-item",
                                span { "{label}" }
                                img { src: "{icon}", alt: "{description}" }
                                span { "{temperature}" }
                            }
                        }
                    }
                }
            }
        }
        LookupStatus::Failed(message) => rsx! {
            p { class: "forecast error", "{message}" }
        },
        _ => rsx! {},
    }
}
