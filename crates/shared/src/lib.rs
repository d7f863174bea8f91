//! Map viewport geometry, lookup sequencing and weather provider access
//! shared by the Pinpoint web frontend and CLI.

pub mod config;
pub mod error;
pub mod events;
pub mod lookup;
pub mod models;
pub mod projection;
pub mod provider;
pub mod theme;
pub mod viewport;

pub use config::{ProviderConfig, ViewportConfig};
pub use error::{ConfigError, LookupError};
pub use events::{EventBus, ListenerId, ViewportEvent};
pub use lookup::{LookupBoard, LookupStatus, SelectionSequence, SelectionTicket};
pub use models::*;
pub use provider::WeatherClient;
pub use theme::BackgroundTheme;
pub use viewport::{Gesture, MapViewport};
