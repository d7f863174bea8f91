//! OpenWeatherMap client: current conditions, 3-hour forecast and reverse
//! geocoding.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::config::ProviderConfig;
use crate::error::LookupError;
use crate::models::{
    CurrentWeather, Forecast, ForecastSample, GeoCoordinate, LocationQuery, Place,
    TemperatureUnit,
};

const UNKNOWN_LOCATION: &str = "Unknown Location";

#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.config.base_url)
            .field("units", &self.config.units)
            .finish_non_exhaustive()
    }
}

impl WeatherClient {
    pub fn new(config: ProviderConfig) -> Result<Self, LookupError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(10));
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    pub fn units(&self) -> TemperatureUnit {
        self.config.units
    }

    fn location_params(&self, query: &LocationQuery) -> Result<Vec<(&'static str, String)>, LookupError> {
        let mut params = match query {
            LocationQuery::City(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(LookupError::EmptyQuery);
                }
                vec![("q", name.to_string())]
            }
            LocationQuery::Coordinates(c) => {
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())]
            }
        };
        params.push(("appid", self.config.api_key.clone()));
        params.push(("units", self.config.units.provider_units().to_string()));
        Ok(params)
    }

    /// Current conditions for a city name or coordinate.
    #[instrument(skip(self), level = "debug")]
    pub async fn current_weather(&self, query: &LocationQuery) -> Result<CurrentWeather, LookupError> {
        let params = self.location_params(query)?;
        let url = format!("{}/data/2.5/weather", self.config.base_url);

        let response = self.client.get(&url).query(&params).send().await?;
        let body: WeatherResponse = read_json(response).await?;
        let weather = body.into_model()?;

        info!(location = %weather.title(), condition = %weather.condition, "Fetched current weather");
        Ok(weather)
    }

    /// Upcoming 3-hour samples, at most `forecast_len` of them.
    #[instrument(skip(self), level = "debug")]
    pub async fn forecast(&self, query: &LocationQuery) -> Result<Forecast, LookupError> {
        let mut params = self.location_params(query)?;
        params.push(("cnt", self.config.forecast_len.to_string()));
        let url = format!("{}/data/2.5/forecast", self.config.base_url);

        let response = self.client.get(&url).query(&params).send().await?;
        let body: ForecastResponse = read_json(response).await?;
        let forecast = body.into_model(self.config.forecast_len);

        debug!(samples = forecast.samples.len(), "Fetched forecast");
        Ok(forecast)
    }

    /// Names for the area around a coordinate. An empty answer (open ocean)
    /// is not an error.
    #[instrument(skip(self), level = "debug")]
    pub async fn reverse_geocode(&self, coord: GeoCoordinate) -> Result<Place, LookupError> {
        let url = format!("{}/geo/1.0/reverse", self.config.base_url);
        let params = [
            ("lat", coord.lat.to_string()),
            ("lon", coord.lon.to_string()),
            ("limit", "1".to_string()),
            ("appid", self.config.api_key.clone()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let places: Vec<GeocodeEntry> = read_json(response).await?;

        let place = places
            .into_iter()
            .next()
            .map(|p| Place {
                name: p.name,
                state: p.state,
                country: p.country,
            })
            .unwrap_or_default();
        debug!(place = %place.label(), "Reverse geocoded");
        Ok(place)
    }
}

/// Decode a provider response, mapping HTTP and in-body `cod` failures.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, LookupError> {
    let status = response.status();
    let text = response.text().await?;
    let value: Option<serde_json::Value> = serde_json::from_str(&text).ok();

    let body_code = value.as_ref().and_then(|v| v.get("cod")).and_then(status_code);
    let message = value
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string);

    let code = match body_code {
        Some(code) if code >= 400 => code,
        _ if !status.is_success() => status.as_u16(),
        _ => {
            let value = value.ok_or_else(|| LookupError::Parse(truncate(&text)))?;
            return serde_json::from_value(value).map_err(|e| LookupError::Parse(e.to_string()));
        }
    };

    let message = message.unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
    if code == 404 {
        Err(LookupError::NotFound(message))
    } else {
        Err(LookupError::Api { status: code, message })
    }
}

/// `cod` comes back as a number from some endpoints and a string from others.
fn status_code(value: &serde_json::Value) -> Option<u16> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(120).collect()
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WireCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    coord: WireCoord,
    weather: Vec<Condition>,
    main: WeatherMain,
    #[serde(default)]
    wind: Wind,
    #[serde(default)]
    sys: Sys,
    #[serde(default)]
    name: String,
    #[serde(default)]
    timezone: i32,
}

impl WeatherResponse {
    fn into_model(self) -> Result<CurrentWeather, LookupError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::Parse("response has no weather conditions".to_string()))?;

        let location_name = if self.name.trim().is_empty() {
            UNKNOWN_LOCATION.to_string()
        } else {
            self.name
        };

        Ok(CurrentWeather {
            location_name,
            country: self.sys.country.filter(|c| !c.is_empty()),
            temperature: self.main.temp,
            feels_like: self.main.feels_like.unwrap_or(self.main.temp),
            description: condition.description,
            condition: condition.main,
            icon: condition.icon,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            coord: GeoCoordinate::clamped(self.coord.lat, self.coord.lon),
            timezone_offset: self.timezone,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: ForecastMain,
    weather: Vec<Condition>,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastCity {
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastEntry>,
    #[serde(default)]
    city: ForecastCity,
}

impl ForecastResponse {
    fn into_model(self, limit: usize) -> Forecast {
        let samples = self
            .list
            .into_iter()
            .take(limit)
            .filter_map(|entry| {
                let condition = entry.weather.into_iter().next()?;
                Some(ForecastSample {
                    timestamp: entry.dt,
                    temperature: entry.main.temp,
                    description: condition.description,
                    icon: condition.icon,
                })
            })
            .collect();

        Forecast {
            samples,
            timezone_offset: self.city.timezone,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeEntry {
    name: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherClient {
        let config = ProviderConfig::new("test_key").with_base_url(server.uri());
        WeatherClient::new(config).unwrap()
    }

    fn london_body() -> serde_json::Value {
        json!({
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 12.4, "feels_like": 11.6, "humidity": 82},
            "wind": {"speed": 4.1},
            "sys": {"country": "GB"},
            "name": "London",
            "timezone": 3600,
            "cod": 200
        })
    }

    fn forecast_body(entries: usize) -> serde_json::Value {
        let list: Vec<_> = (0..entries)
            .map(|i| {
                json!({
                    "dt": 1_704_067_200 + i as i64 * 10_800,
                    "main": {"temp": 5.0 + i as f64},
                    "weather": [{"main": "Clouds", "description": "few clouds", "icon": "02d"}]
                })
            })
            .collect();
        json!({"cod": "200", "cnt": entries, "list": list, "city": {"timezone": -18000}})
    }

    #[tokio::test]
    async fn test_current_weather_by_city() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
            .mount(&server)
            .await;

        let weather = client_for(&server)
            .current_weather(&LocationQuery::City("  London ".to_string()))
            .await
            .unwrap();

        assert_eq!(weather.title(), "London, GB");
        assert_eq!(weather.condition, "Rain");
        assert_eq!(weather.icon, "10d");
        assert_eq!(weather.humidity, 82);
        assert_eq!(weather.timezone_offset, 3600);
    }

    #[tokio::test]
    async fn test_current_weather_by_coordinates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "10.5"))
            .and(query_param("lon", "-20.25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "coord": {"lon": -20.25, "lat": 10.5},
                "weather": [{"main": "Clear", "description": "clear sky", "icon": "01n"}],
                "main": {"temp": 26.0, "humidity": 70},
                "name": "",
                "cod": 200
            })))
            .mount(&server)
            .await;

        let query = LocationQuery::Coordinates(GeoCoordinate { lat: 10.5, lon: -20.25 });
        let weather = client_for(&server).current_weather(&query).await.unwrap();

        assert_eq!(weather.location_name, "Unknown Location");
        assert_eq!(weather.country, None);
        assert_eq!(weather.feels_like, 26.0);
        assert_eq!(weather.wind_speed, 0.0);
    }

    #[tokio::test]
    async fn test_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .current_weather(&LocationQuery::City("Atlantis".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::NotFound(ref m) if m == "city not found"));
        assert_eq!(err.user_message(), "Location not found or over ocean");
    }

    #[tokio::test]
    async fn test_not_found_in_body_with_ok_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .current_weather(&LocationQuery::City("Atlantis".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .current_weather(&LocationQuery::City("Paris".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_unauthorized_uses_provider_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"cod": 401, "message": "Invalid API key"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .current_weather(&LocationQuery::City("Paris".to_string()))
            .await
            .unwrap_err();

        match err {
            LookupError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": true})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .current_weather(&LocationQuery::City("Paris".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)));
    }

    #[tokio::test]
    async fn test_empty_city_sends_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_body()))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .current_weather(&LocationQuery::City("   ".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::EmptyQuery));

        let err = client
            .forecast(&LocationQuery::City(String::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::EmptyQuery));
    }

    #[tokio::test]
    async fn test_forecast_is_truncated() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("cnt", "8"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(10)))
            .mount(&server)
            .await;

        let config = ProviderConfig::new("test_key")
            .with_base_url(server.uri())
            .with_units(TemperatureUnit::Fahrenheit);
        let forecast = WeatherClient::new(config)
            .unwrap()
            .forecast(&LocationQuery::City("New York".to_string()))
            .await
            .unwrap();

        assert_eq!(forecast.samples.len(), 8);
        assert_eq!(forecast.timezone_offset, -18000);
        assert_eq!(forecast.samples[0].temperature, 5.0);
        assert_eq!(forecast.samples[0].local_hour(forecast.timezone_offset), 19);
    }

    #[tokio::test]
    async fn test_reverse_geocode() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Springfield", "state": "Illinois", "country": "US", "lat": 39.8, "lon": -89.6}
            ])))
            .mount(&server)
            .await;

        let place = client_for(&server)
            .reverse_geocode(GeoCoordinate { lat: 39.8, lon: -89.6 })
            .await
            .unwrap();

        assert_eq!(place.label(), "Springfield, Illinois, US");
    }

    #[tokio::test]
    async fn test_reverse_geocode_over_ocean() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let place = client_for(&server)
            .reverse_geocode(GeoCoordinate { lat: 0.0, lon: -30.0 })
            .await
            .unwrap();

        assert_eq!(place, Place::default());
    }

    #[test]
    fn test_status_code_forms() {
        assert_eq!(status_code(&json!("404")), Some(404));
        assert_eq!(status_code(&json!(200)), Some(200));
        assert_eq!(status_code(&json!(null)), None);
    }
}
