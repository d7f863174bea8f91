use dioxus::prelude::*;

use crate::components::hourly_forecast::HourlyForecast;
use crate::components::map_view::MapView;
use crate::components::weather_card::WeatherCard;
use crate::state::Dashboard;

#[component]
pub fn WorldMap() -> Element {
    let dashboard = use_context::<Dashboard>();
    let units = dashboard
        .client
        .as_ref()
        .map(|c| c.units())
        .unwrap_or_default();
    let board = dashboard.map.read();

    rsx! {
        div { class: "panel map-panel",
            MapView {}
        }
        div { class: "panel",
            if board.query.is_none() {
                p { class: "hint", "Click anywhere on the map to get the weather there." }
            }
            WeatherCard {
                weather: board.weather.clone(),
                place: Some(board.place.clone()),
                units,
                detailed: true,
            }
            HourlyForecast { forecast: board.forecast.clone(), units }
        }
    }
}
