use dioxus::prelude::*;
use pinpoint_shared::{icon_url_large, CurrentWeather, LookupStatus, Place, TemperatureUnit};

#[component]
pub fn WeatherCard(
    weather: LookupStatus<CurrentWeather>,
    place: Option<LookupStatus<Place>>,
    units: TemperatureUnit,
    /// Show humidity, wind and feels-like.
    detailed: bool,
) -> Element {
    let area = match &place {
        Some(LookupStatus::Ready(p)) if !p.label().is_empty() => Some(p.label()),
        Some(LookupStatus::Ready(_)) => Some("Open water".to_string()),
        _ => None,
    };

    match weather {
        LookupStatus::Idle => rsx! {},
        LookupStatus::Loading => rsx! {
            div { class: "weather-card loading", "Loading..." }
        },
        LookupStatus::Failed(message) => rsx! {
            div { class: "weather-card error", p { "{message}" } }
        },
        LookupStatus::Ready(w) => {
            let icon = icon_url_large(&w.icon);
            let title = w.title();
            let temperature = units.format(w.temperature);
            let feels_like = units.format(w.feels_like);
            let wind = format!("{:.1} {}", w.wind_speed, units.wind_symbol());
            let description = w.description;
            let humidity = w.humidity;
            rsx! {
                div { class: "weather-card",
                    h2 { "{title}" }
                    if let Some(area) = area {
                        p { class: "area", "{area}" }
                    }
                    img { src: "{icon}", alt: "{description}" }
                    div { class: "temp", "{temperature}" }
                    p { class: "description", "{description}" }
                    if detailed {
                        div { class: "details",
                            span { "Feels like: {feels_like}" }
                            span { "Humidity: {humidity}%" }
                            span { "Wind: {wind}" }
                        }
                    }
                }
            }
        }
    }
}
