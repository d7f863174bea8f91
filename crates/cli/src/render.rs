use pinpoint_shared::{LookupBoard, LookupStatus, TemperatureUnit};

/// Plain-text report of a finished lookup.
pub fn report(board: &LookupBoard, units: TemperatureUnit) -> String {
    let mut out = String::new();

    if let Some(query) = &board.query {
        out.push_str(&format!("=== {query} ===\n"));
    }

    match &board.place {
        LookupStatus::Ready(place) if !place.label().is_empty() => {
            out.push_str(&format!("  Area: {}\n", place.label()));
        }
        LookupStatus::Ready(_) => out.push_str("  Area: open water\n"),
        _ => {}
    }

    match &board.weather {
        LookupStatus::Ready(w) => {
            out.push_str(&format!("  {}\n", w.title()));
            out.push_str(&format!(
                "  {} ({}), feels like {}\n",
                units.format(w.temperature),
                w.description,
                units.format(w.feels_like)
            ));
            out.push_str(&format!(
                "  Humidity: {}%  Wind: {:.1} {}\n",
                w.humidity,
                w.wind_speed,
                units.wind_symbol()
            ));
        }
        LookupStatus::Failed(message) => out.push_str(&format!("  {message}\n")),
        LookupStatus::Loading | LookupStatus::Idle => {}
    }

    if let LookupStatus::Ready(forecast) = &board.forecast {
        if !forecast.samples.is_empty() {
            out.push_str("\n=== Next hours ===\n");
            for sample in &forecast.samples {
                out.push_str(&format!(
                    "  {:02}:00  {:>5}  {}\n",
                    sample.local_hour(forecast.timezone_offset),
                    units.format(sample.temperature),
                    sample.description
                ));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinpoint_shared::{
        CurrentWeather, Forecast, ForecastSample, GeoCoordinate, LocationQuery, LookupError, Place,
    };

    fn board_with_weather() -> LookupBoard {
        let mut board = LookupBoard::new();
        let ticket = board.begin(&LocationQuery::Coordinates(GeoCoordinate {
            lat: 48.85,
            lon: 2.35,
        }));
        board.apply_weather(
            ticket,
            Ok(CurrentWeather {
                location_name: "Paris".to_string(),
                country: Some("FR".to_string()),
                temperature: 18.4,
                feels_like: 17.6,
                description: "scattered clouds".to_string(),
                condition: "Clouds".to_string(),
                icon: "03d".to_string(),
                humidity: 60,
                wind_speed: 3.25,
                coord: GeoCoordinate { lat: 48.85, lon: 2.35 },
                timezone_offset: 7200,
            }),
        );
        board.apply_forecast(
            ticket,
            Ok(Forecast {
                samples: vec![ForecastSample {
                    timestamp: 1_704_067_200,
                    temperature: 15.0,
                    description: "light rain".to_string(),
                    icon: "10d".to_string(),
                }],
                timezone_offset: 7200,
            }),
        );
        board.apply_place(
            ticket,
            Ok(Place {
                name: Some("Paris".to_string()),
                state: Some("Ile-de-France".to_string()),
                country: Some("FR".to_string()),
            }),
        );
        board
    }

    #[test]
    fn test_report_contains_sections() {
        let text = report(&board_with_weather(), TemperatureUnit::Celsius);
        assert!(text.contains("=== Lat: 48.85°, Lon: 2.35° ==="));
        assert!(text.contains("Area: Paris, Ile-de-France, FR"));
        assert!(text.contains("Paris, FR"));
        assert!(text.contains("18°C (scattered clouds), feels like 18°C"));
        assert!(text.contains("Wind: 3.2 m/s") || text.contains("Wind: 3.3 m/s"));
        assert!(text.contains("02:00   15°C  light rain"));
    }

    #[test]
    fn test_report_shows_failure_message() {
        let mut board = LookupBoard::new();
        let ticket = board.begin(&LocationQuery::City("Atlantis".to_string()));
        board.apply_weather(ticket, Err(LookupError::NotFound("city not found".to_string())));
        let text = report(&board, TemperatureUnit::Celsius);
        assert!(text.contains("Location not found or over ocean"));
    }

    #[test]
    fn test_report_marks_open_water() {
        let mut board = LookupBoard::new();
        let ticket = board.begin(&LocationQuery::Coordinates(GeoCoordinate::default()));
        board.apply_place(ticket, Ok(Place::default()));
        assert!(report(&board, TemperatureUnit::Celsius).contains("Area: open water"));
    }
}
