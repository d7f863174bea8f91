//! Equirectangular projection between map pixels and the globe.
//!
//! Pixels are measured from the top-left corner of the unscaled map.
//! Longitude runs -180..180 left to right, latitude runs 90..-90 top to bottom.
//! Out-of-range input is clamped, never rejected.

use crate::models::{GeoCoordinate, MapSize, LAT_LIMIT, LON_LIMIT};

pub const LON_SPAN: f64 = 2.0 * LON_LIMIT;
pub const LAT_SPAN: f64 = 2.0 * LAT_LIMIT;

/// Spacing of the graticule drawn over the map, in degrees.
pub const GRATICULE_STEP_DEG: f64 = 30.0;

/// Convert a map-local pixel to a geographic coordinate.
pub fn pixel_to_geo(px: f64, py: f64, size: MapSize) -> GeoCoordinate {
    let lon = (px / size.width()) * LON_SPAN - LON_LIMIT;
    let lat = LAT_LIMIT - (py / size.height()) * LAT_SPAN;
    GeoCoordinate::clamped(lat, lon)
}

/// Convert a geographic coordinate to a map-local pixel.
pub fn geo_to_pixel(coord: GeoCoordinate, size: MapSize) -> (f64, f64) {
    let coord = GeoCoordinate::clamped(coord.lat, coord.lon);
    (
        (coord.lon + LON_LIMIT) / LON_SPAN * size.width(),
        (LAT_LIMIT - coord.lat) / LAT_SPAN * size.height(),
    )
}

/// Clamp a map-local pixel onto the map.
pub fn clamp_to_map(px: f64, py: f64, size: MapSize) -> (f64, f64) {
    let clamp = |v: f64, max: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
    (clamp(px, size.width()), clamp(py, size.height()))
}

/// Map-local x of a meridian.
pub fn meridian_px(lon: f64, size: MapSize) -> f64 {
    geo_to_pixel(GeoCoordinate { lat: 0.0, lon }, size).0
}

/// Map-local y of a parallel.
pub fn parallel_px(lat: f64, size: MapSize) -> f64 {
    geo_to_pixel(GeoCoordinate { lat, lon: 0.0 }, size).1
}
