use serde::{Deserialize, Serialize};

pub const LAT_LIMIT: f64 = 90.0;
pub const LON_LIMIT: f64 = 180.0;

/// A point on the globe. Always within `[-90, 90]` x `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    /// Build a coordinate, clamping each axis into its valid range.
    pub fn clamped(lat: f64, lon: f64) -> Self {
        Self {
            lat: clamp_axis(lat, LAT_LIMIT),
            lon: clamp_axis(lon, LON_LIMIT),
        }
    }
}

/// NaN has no place on the globe; it lands on the axis origin.
fn clamp_axis(v: f64, limit: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(-limit, limit)
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Lat: {:.2}°, Lon: {:.2}°",
            tidy_zero(self.lat),
            tidy_zero(self.lon)
        )
    }
}

/// Avoid printing "-0.00" for values that round to zero.
fn tidy_zero(v: f64) -> f64 {
    if (v * 100.0).round() == 0.0 {
        0.0
    } else {
        v
    }
}

/// Size of the unscaled map's bounding box, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    width: f64,
    height: f64,
}

impl MapSize {
    /// Returns `None` unless both sides are finite and positive.
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Default for MapSize {
    /// One pixel per degree.
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 180.0,
        }
    }
}

/// Zoom and pan applied to the map as `translate(offset) scale(scale)`,
/// anchored at the map's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Pin position in unscaled map-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PinState {
    pub map_x: Option<f64>,
    pub map_y: Option<f64>,
    pub visible: bool,
}

impl PinState {
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.map_x?, self.map_y?))
    }

    pub fn set_position(&mut self, map_x: f64, map_y: f64) {
        self.map_x = Some(map_x);
        self.map_y = Some(map_y);
    }
}

/// What to ask the weather provider about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationQuery {
    City(String),
    Coordinates(GeoCoordinate),
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationQuery::City(name) => write!(f, "{}", name.trim()),
            LocationQuery::Coordinates(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Value of the provider's `units` query parameter.
    pub fn provider_units(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "metric",
            TemperatureUnit::Fahrenheit => "imperial",
        }
    }

    pub fn from_provider_units(units: &str) -> Option<Self> {
        match units.trim().to_ascii_lowercase().as_str() {
            "metric" | "celsius" | "c" => Some(TemperatureUnit::Celsius),
            "imperial" | "fahrenheit" | "f" => Some(TemperatureUnit::Fahrenheit),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn wind_symbol(self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "m/s",
            TemperatureUnit::Fahrenheit => "mph",
        }
    }

    /// Rounded temperature with its unit symbol, e.g. "21°C".
    pub fn format(self, temperature: f64) -> String {
        format!("{}{}", temperature.round() as i64, self.symbol())
    }
}

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Large (4x) condition icon.
pub fn icon_url_large(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@4x.png")
}

/// Small condition icon used in the hourly strip.
pub fn icon_url_small(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}.png")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub location_name: String,
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    /// Provider condition group ("Clear", "Rain", ...).
    pub condition: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub coord: GeoCoordinate,
    /// Shift from UTC in seconds.
    pub timezone_offset: i32,
}

impl CurrentWeather {
    /// "London, GB", or just the name when the country is unknown.
    pub fn title(&self) -> String {
        match self.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {}", self.location_name, country),
            None => self.location_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix seconds, UTC.
    pub timestamp: i64,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

impl ForecastSample {
    /// Hour of day (0-23) at the forecast location.
    pub fn local_hour(&self, timezone_offset: i32) -> u32 {
        let local = self.timestamp + i64::from(timezone_offset);
        (local.rem_euclid(86_400) / 3_600) as u32
    }
}

/// Ordered 3-hour samples, nearest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub samples: Vec<ForecastSample>,
    pub timezone_offset: i32,
}

/// Administrative names around a coordinate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Place {
    pub name: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl Place {
    /// Known parts joined with ", ". Empty when nothing is known.
    pub fn label(&self) -> String {
        [&self.name, &self.state, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
