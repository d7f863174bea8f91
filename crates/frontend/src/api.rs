use dioxus::prelude::*;
use dioxus::core::spawn_forever;
use pinpoint_shared::{
    BackgroundTheme, LocationQuery, LookupBoard, LookupError, MapViewport, ProviderConfig,
    TemperatureUnit, WeatherClient,
};

/// Cities offered as one-click searches.
pub const QUICK_PICKS: &[&str] = &["London", "New York", "Tokyo", "Sydney", "Cairo", "Rio de Janeiro"];

/// Build the provider client from settings baked in at compile time.
pub fn client() -> Option<WeatherClient> {
    let api_key = option_env!("OPENWEATHER_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        tracing::warn!("OPENWEATHER_API_KEY was not set at build time; the provider will refuse lookups");
    }

    let mut config = ProviderConfig::new(api_key);
    if let Some(base_url) = option_env!("OPENWEATHER_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    if let Some(units) = option_env!("PINPOINT_UNITS").and_then(TemperatureUnit::from_provider_units) {
        config = config.with_units(units);
    }

    match WeatherClient::new(config) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::error!(error = %e, "Failed to build weather client");
            None
        }
    }
}

/// The map tab a city search drags along: its pin moves to the found city
/// and its stale results are cleared so card and pin agree.
#[derive(Clone, Copy)]
pub struct MapFollow {
    pub viewport: Signal<MapViewport>,
    pub board: Signal<LookupBoard>,
}

/// Fire the lookups for `query` into `board`. Weather, forecast and (for
/// coordinates) place names resolve independently; results for a superseded
/// query are dropped by the board. When `follow` is given, a successful
/// weather result moves the map pin to the reported location and clears the
/// map's card.
pub fn start_lookup(
    client: Option<&WeatherClient>,
    query: LocationQuery,
    mut board: Signal<LookupBoard>,
    mut theme: Signal<BackgroundTheme>,
    follow: Option<MapFollow>,
) {
    if matches!(&query, LocationQuery::City(name) if name.trim().is_empty()) {
        board.write().reject(LookupError::EmptyQuery);
        return;
    }
    let Some(client) = client.cloned() else {
        tracing::error!("No weather client, skipping lookup");
        return;
    };

    let ticket = board.write().begin(&query);

    {
        let client = client.clone();
        let query = query.clone();
        spawn_forever(async move {
            let result = client.current_weather(&query).await;
            let located = result.as_ref().ok().map(|w| w.coord);
            if !board.write().apply_weather(ticket, result) {
                return;
            }
            if let Some(next) = board.peek().theme() {
                theme.set(next);
            }
            if let (Some(MapFollow { mut viewport, board: mut map_board }), Some(coord)) =
                (follow, located)
            {
                map_board.write().clear();
                viewport.write().show_pin_at(coord);
            }
        });
    }

    {
        let client = client.clone();
        let query = query.clone();
        spawn_forever(async move {
            let result = client.forecast(&query).await;
            board.write().apply_forecast(ticket, result);
        });
    }

    if let LocationQuery::Coordinates(coord) = query {
        spawn_forever(async move {
            let result = client.reverse_geocode(coord).await;
            board.write().apply_place(ticket, result);
        });
    }
}
