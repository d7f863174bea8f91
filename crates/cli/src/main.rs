mod args;
mod render;

use std::cell::Cell;
use std::rc::Rc;

use pinpoint_shared::{
    GeoCoordinate, LocationQuery, LookupBoard, LookupStatus, MapSize, MapViewport,
    ProviderConfig, ViewportEvent, WeatherClient,
};
use tracing_subscriber::EnvFilter;

use args::Mode;

/// Run a click through the viewport the same way the map does and return
/// the coordinate it selects.
fn click_to_coordinate(at: (f64, f64), map: (f64, f64), zoom: u32) -> Option<GeoCoordinate> {
    let size = MapSize::new(map.0, map.1)?;
    let mut viewport = MapViewport::new(size);

    let step = viewport.config().zoom_step;
    for _ in 0..zoom {
        let before = viewport.state().scale;
        viewport.zoom_at_point(step, map.0 / 2.0, map.1 / 2.0);
        if viewport.state().scale == before {
            break;
        }
    }
    let view = viewport.state();
    tracing::debug!(scale = view.scale, offset_x = view.offset_x, offset_y = view.offset_y, "Viewport ready");

    let selected = Rc::new(Cell::new(None));
    let sink = Rc::clone(&selected);
    viewport.subscribe(move |event| {
        if let ViewportEvent::CoordinateSelected(coord) = event {
            sink.set(Some(*coord));
        }
    });

    viewport.pointer_down(at.0, at.1);
    viewport.pointer_up(at.0, at.1);
    selected.get()
}

async fn run_lookup(client: &WeatherClient, query: LocationQuery) -> LookupBoard {
    let mut board = LookupBoard::new();
    let ticket = board.begin(&query);

    match query {
        LocationQuery::Coordinates(coord) => {
            let (weather, forecast, place) = tokio::join!(
                client.current_weather(&query),
                client.forecast(&query),
                client.reverse_geocode(coord),
            );
            board.apply_weather(ticket, weather);
            board.apply_forecast(ticket, forecast);
            board.apply_place(ticket, place);
        }
        LocationQuery::City(_) => {
            let (weather, forecast) =
                tokio::join!(client.current_weather(&query), client.forecast(&query));
            board.apply_weather(ticket, weather);
            board.apply_forecast(ticket, forecast);
        }
    }

    board
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    eprintln!("{}", args::USAGE);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = args::parse(&raw).unwrap_or_else(|e| fail(e));

    let mut config = ProviderConfig::from_env().unwrap_or_else(|e| fail(e));
    if let Some(units) = args.units {
        config = config.with_units(units);
    }

    let query = match args.mode {
        Mode::City(name) => LocationQuery::City(name),
        Mode::Coordinates(coord) => LocationQuery::Coordinates(coord),
        Mode::Click { at, map, zoom } => {
            let coord = click_to_coordinate(at, map, zoom)
                .unwrap_or_else(|| fail("click did not land on the map"));
            tracing::info!(%coord, "Click resolved");
            LocationQuery::Coordinates(coord)
        }
    };

    let client = WeatherClient::new(config).unwrap_or_else(|e| fail(e));
    let units = client.units();
    let board = run_lookup(&client, query).await;

    print!("{}", render::report(&board, units));

    if matches!(board.weather, LookupStatus::Failed(_)) {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_center_of_unzoomed_map() {
        let coord = click_to_coordinate((400.0, 200.0), (800.0, 400.0), 0).unwrap();
        assert!(coord.lat.abs() < 1e-9);
        assert!(coord.lon.abs() < 1e-9);
    }

    #[test]
    fn test_click_center_survives_zoom() {
        // Zooming around the center keeps the center fixed
        let coord = click_to_coordinate((400.0, 200.0), (800.0, 400.0), 3).unwrap();
        assert!(coord.lat.abs() < 1e-9);
        assert!(coord.lon.abs() < 1e-9);
    }

    #[test]
    fn test_click_when_zoomed_narrows_the_span() {
        let flat = click_to_coordinate((0.0, 0.0), (800.0, 400.0), 0).unwrap();
        let zoomed = click_to_coordinate((0.0, 0.0), (800.0, 400.0), 2).unwrap();
        assert_eq!(flat.to_string(), "Lat: 90.00°, Lon: -180.00°");
        // Scale 2: the top-left corner now shows a quarter of the way in
        assert!((zoomed.lat - 45.0).abs() < 1e-9);
        assert!((zoomed.lon - (-90.0)).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_map_selects_nothing() {
        assert!(click_to_coordinate((1.0, 1.0), (0.0, 400.0), 0).is_none());
    }

    #[test]
    fn test_huge_zoom_stops_at_max_scale() {
        let at_max = click_to_coordinate((0.0, 0.0), (800.0, 400.0), 8).unwrap();
        let huge = click_to_coordinate((0.0, 0.0), (800.0, 400.0), u32::MAX).unwrap();
        assert_eq!(at_max, huge);
        // Scale 5: the corner shows a fifth of the way out from the center
        assert!((huge.lat - 18.0).abs() < 1e-9);
        assert!((huge.lon - (-36.0)).abs() < 1e-9);
    }
}
