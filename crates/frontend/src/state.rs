use dioxus::prelude::*;
use pinpoint_shared::{
    BackgroundTheme, LocationQuery, LookupBoard, MapSize, MapViewport, ViewportEvent,
    ViewportState, WeatherClient,
};

use crate::api;

/// App-wide state shared by both tabs through context.
#[derive(Clone)]
pub struct Dashboard {
    pub client: Option<WeatherClient>,
    /// City search results.
    pub search: Signal<LookupBoard>,
    /// Results for the point picked on the map.
    pub map: Signal<LookupBoard>,
    /// Theme of whichever lookup resolved last.
    pub theme: Signal<BackgroundTheme>,
    pub viewport: Signal<MapViewport>,
    /// Mirrors of the viewport, updated from its events, for rendering.
    pub view: Signal<ViewportState>,
    pub pin_screen: Signal<Option<(f64, f64)>>,
}

impl Dashboard {
    /// Must be called inside a component scope (it creates signals).
    pub fn new() -> Self {
        let client = api::client();
        let search = Signal::new(LookupBoard::new());
        let map = Signal::new(LookupBoard::new());
        let theme = Signal::new(BackgroundTheme::default());
        let mut view = Signal::new(ViewportState::default());
        let mut pin_screen = Signal::new(None);

        let mut viewport = MapViewport::new(MapSize::default());
        let lookup_client = client.clone();
        viewport.subscribe(move |event| match *event {
            ViewportEvent::CoordinateSelected(coord) => {
                tracing::info!(%coord, "Coordinate selected");
                api::start_lookup(
                    lookup_client.as_ref(),
                    LocationQuery::Coordinates(coord),
                    map,
                    theme,
                    None,
                );
            }
            ViewportEvent::ViewportChanged {
                scale,
                offset_x,
                offset_y,
                pin,
            } => {
                view.set(ViewportState {
                    scale,
                    offset_x,
                    offset_y,
                });
                pin_screen.set(pin);
            }
        });

        Self {
            client,
            search,
            map,
            theme,
            viewport: Signal::new(viewport),
            view,
            pin_screen,
        }
    }
}
