//! Page background derived from the current conditions.

use serde::{Deserialize, Serialize};

/// How often the thunderstorm loop rolls for a strike.
pub const LIGHTNING_TICK_MS: u32 = 500;
/// How long a strike stays lit.
pub const LIGHTNING_FLASH_MS: u32 = 100;
/// A roll in `[0, 1)` above this triggers a strike.
pub const LIGHTNING_CHANCE: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackgroundTheme {
    Sunny,
    ClearNight,
    Cloudy,
    Rainy,
    Thunderstorm,
    Snowy,
    Misty,
    #[default]
    Default,
}

impl BackgroundTheme {
    /// Pick a theme from the provider's condition group ("Clear", "Rain",
    /// ...) and icon code. Night icons end in `n`.
    pub fn from_conditions(condition: &str, icon: &str) -> Self {
        match condition.trim().to_ascii_lowercase().as_str() {
            "clear" if icon.contains('n') => BackgroundTheme::ClearNight,
            "clear" => BackgroundTheme::Sunny,
            "clouds" => BackgroundTheme::Cloudy,
            "rain" | "drizzle" => BackgroundTheme::Rainy,
            "thunderstorm" => BackgroundTheme::Thunderstorm,
            "snow" => BackgroundTheme::Snowy,
            "mist" | "fog" | "haze" => BackgroundTheme::Misty,
            _ => BackgroundTheme::Default,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            BackgroundTheme::Sunny => "sunny",
            BackgroundTheme::ClearNight => "clear-night",
            BackgroundTheme::Cloudy => "cloudy",
            BackgroundTheme::Rainy => "rainy",
            BackgroundTheme::Thunderstorm => "thunderstorm",
            BackgroundTheme::Snowy => "snowy",
            BackgroundTheme::Misty => "misty",
            BackgroundTheme::Default => "default",
        }
    }

    pub fn particle_kinds(self) -> &'static [ParticleKind] {
        match self {
            BackgroundTheme::ClearNight => &[ParticleKind::Star],
            BackgroundTheme::Rainy | BackgroundTheme::Thunderstorm => &[ParticleKind::RainDrop],
            BackgroundTheme::Snowy => &[ParticleKind::SnowFlake],
            _ => &[],
        }
    }

    pub fn has_lightning(self) -> bool {
        self == BackgroundTheme::Thunderstorm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    RainDrop,
    SnowFlake,
    Star,
}

/// Placement and animation timing of one particle, in CSS units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub left_pct: f64,
    pub top_pct: f64,
    pub delay_s: f64,
    pub duration_s: f64,
    pub size_px: f64,
}

/// Golden-ratio conjugate; successive multiples spread evenly over `[0, 1)`.
const SPREAD: f64 = 0.618_033_988_749_895;

fn spread(i: usize, salt: f64) -> f64 {
    ((i as f64 + salt) * SPREAD).fract()
}

impl ParticleKind {
    pub fn css_class(self) -> &'static str {
        match self {
            ParticleKind::RainDrop => "raindrop",
            ParticleKind::SnowFlake => "snowflake",
            ParticleKind::Star => "star",
        }
    }

    pub fn count(self) -> usize {
        match self {
            ParticleKind::RainDrop => 100,
            ParticleKind::SnowFlake => 50,
            ParticleKind::Star => 100,
        }
    }

    /// Deterministic layout so re-renders don't reshuffle the particles.
    pub fn layout(self) -> Vec<Particle> {
        (0..self.count())
            .map(|i| {
                let (a, b, c) = (spread(i, 0.0), spread(i, 0.37), spread(i, 0.71));
                match self {
                    ParticleKind::RainDrop => Particle {
                        left_pct: a * 100.0,
                        top_pct: -10.0,
                        delay_s: b * 2.0,
                        duration_s: 0.5 + c * 0.5,
                        size_px: 2.0,
                    },
                    ParticleKind::SnowFlake => Particle {
                        left_pct: a * 100.0,
                        top_pct: -10.0,
                        delay_s: b * 5.0,
                        duration_s: 5.0 + c * 5.0,
                        size_px: 3.0 + c * 4.0,
                    },
                    ParticleKind::Star => Particle {
                        left_pct: a * 100.0,
                        top_pct: b * 100.0,
                        delay_s: c * 3.0,
                        duration_s: 2.0 + b,
                        size_px: 1.0 + c * 2.0,
                    },
                }
            })
            .collect()
    }
}

/// Whether a random roll in `[0, 1)` produces a strike.
pub fn lightning_strikes(roll: f64) -> bool {
    roll > LIGHTNING_CHANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_mapping() {
        let cases = [
            ("Clear", "01d", BackgroundTheme::Sunny),
            ("Clear", "01n", BackgroundTheme::ClearNight),
            ("Clouds", "03d", BackgroundTheme::Cloudy),
            ("Rain", "10d", BackgroundTheme::Rainy),
            ("Drizzle", "09d", BackgroundTheme::Rainy),
            ("Thunderstorm", "11d", BackgroundTheme::Thunderstorm),
            ("Snow", "13d", BackgroundTheme::Snowy),
            ("Mist", "50d", BackgroundTheme::Misty),
            ("Fog", "50n", BackgroundTheme::Misty),
            ("Haze", "50d", BackgroundTheme::Misty),
            ("Tornado", "50d", BackgroundTheme::Default),
        ];
        for (condition, icon, expected) in cases {
            assert_eq!(
                BackgroundTheme::from_conditions(condition, icon),
                expected,
                "{condition}/{icon}"
            );
        }
    }

    #[test]
    fn test_particles_per_theme() {
        assert!(BackgroundTheme::Sunny.particle_kinds().is_empty());
        assert_eq!(
            BackgroundTheme::Thunderstorm.particle_kinds(),
            &[ParticleKind::RainDrop]
        );
        assert!(BackgroundTheme::Thunderstorm.has_lightning());
        assert!(!BackgroundTheme::Rainy.has_lightning());
    }

    #[test]
    fn test_layout_counts_and_bounds() {
        for kind in [ParticleKind::RainDrop, ParticleKind::SnowFlake, ParticleKind::Star] {
            let particles = kind.layout();
            assert_eq!(particles.len(), kind.count());
            for p in &particles {
                assert!((0.0..100.0).contains(&p.left_pct));
                assert!(p.duration_s > 0.0);
            }
        }
        assert_eq!(ParticleKind::SnowFlake.count(), 50);
    }

    #[test]
    fn test_layout_is_stable() {
        assert_eq!(ParticleKind::Star.layout(), ParticleKind::Star.layout());
    }

    #[test]
    fn test_lightning_threshold() {
        assert!(!lightning_strikes(0.5));
        assert!(!lightning_strikes(0.95));
        assert!(lightning_strikes(0.96));
    }
}
