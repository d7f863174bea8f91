use pinpoint_shared::{GeoCoordinate, TemperatureUnit};

pub const USAGE: &str = "Usage:
  pinpoint --city <name> [--imperial]
  pinpoint --lat <deg> --lon <deg> [--imperial]
  pinpoint --click <x>,<y> --map <w>x<h> [--zoom <n>] [--imperial]";

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    City(String),
    Coordinates(GeoCoordinate),
    /// Simulate a click on a map of `map` size, zoomed by `zoom` steps
    /// around its center.
    Click {
        at: (f64, f64),
        map: (f64, f64),
        zoom: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub units: Option<TemperatureUnit>,
}

fn get_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().skip_while(|a| *a != flag).nth(1).cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_number(flag: &str, value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{flag} expects a number, got '{value}'"))
}

/// Parse "a<sep>b" into two numbers.
fn parse_pair(flag: &str, value: &str, sep: char) -> Result<(f64, f64), String> {
    let (a, b) = value
        .split_once(sep)
        .ok_or_else(|| format!("{flag} expects <a>{sep}<b>, got '{value}'"))?;
    Ok((parse_number(flag, a)?, parse_number(flag, b)?))
}

/// Parse arguments, excluding the program name.
pub fn parse(args: &[String]) -> Result<Args, String> {
    let units = has_flag(args, "--imperial").then_some(TemperatureUnit::Fahrenheit);

    if let Some(city) = get_arg(args, "--city") {
        return Ok(Args {
            mode: Mode::City(city),
            units,
        });
    }

    if let Some(click) = get_arg(args, "--click") {
        let at = parse_pair("--click", &click, ',')?;
        let map = get_arg(args, "--map").ok_or("--click requires --map <w>x<h>")?;
        let map = parse_pair("--map", &map, 'x')?;
        if map.0 <= 0.0 || map.1 <= 0.0 {
            return Err("--map dimensions must be positive".to_string());
        }
        let zoom = match get_arg(args, "--zoom") {
            Some(z) => z
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("--zoom expects a whole number, got '{z}'"))?,
            None => 0,
        };
        return Ok(Args {
            mode: Mode::Click { at, map, zoom },
            units,
        });
    }

    match (get_arg(args, "--lat"), get_arg(args, "--lon")) {
        (Some(lat), Some(lon)) => {
            let lat = parse_number("--lat", &lat)?;
            let lon = parse_number("--lon", &lon)?;
            Ok(Args {
                mode: Mode::Coordinates(GeoCoordinate::clamped(lat, lon)),
                units,
            })
        }
        (Some(_), None) | (None, Some(_)) => Err("--lat and --lon must be given together".to_string()),
        (None, None) => Err("one of --city, --lat/--lon or --click is required".to_string()),
    }
}
