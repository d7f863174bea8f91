//! Zoom/pan transform and pin placement for the world map.
//!
//! Screen coordinates are relative to the map container's top-left corner.
//! The map is drawn with `translate(offset) scale(scale)` anchored at its own
//! top-left corner, so a map-local pixel `m` lands on screen at
//! `m * scale + offset`. The pin is stored in map-local pixels; its screen
//! position is derived on demand and never cached.

use tracing::trace;

use crate::config::ViewportConfig;
use crate::events::{EventBus, ListenerId, ViewportEvent};
use crate::models::{GeoCoordinate, MapSize, PinState, ViewportState};
use crate::projection;

/// Scale differences below this are treated as no change.
const SCALE_EPSILON: f64 = 1e-9;

/// Pointer gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    /// Pressed at minimum scale, where the map cannot pan. May become a click.
    Pressed { start: (f64, f64) },
    Panning {
        start: (f64, f64),
        start_offset: (f64, f64),
    },
    DraggingPin { start: (f64, f64) },
}

impl Gesture {
    fn start(&self) -> Option<(f64, f64)> {
        match *self {
            Gesture::Idle => None,
            Gesture::Pressed { start }
            | Gesture::Panning { start, .. }
            | Gesture::DraggingPin { start } => Some(start),
        }
    }
}

/// Compute the offset that keeps `pivot` over the same map point when the
/// scale changes from `old_scale` to `new_scale`.
pub fn zoom_offset_at_pivot(
    pivot_x: f64,
    pivot_y: f64,
    old_scale: f64,
    new_scale: f64,
    old_offset_x: f64,
    old_offset_y: f64,
) -> (f64, f64) {
    let ratio = new_scale / old_scale;
    (
        pivot_x - (pivot_x - old_offset_x) * ratio,
        pivot_y - (pivot_y - old_offset_y) * ratio,
    )
}

/// Whether the pointer has travelled far enough from `start` to be a drag.
fn exceeds_threshold(start: (f64, f64), current: (f64, f64), threshold: f64) -> bool {
    (current.0 - start.0).abs() > threshold || (current.1 - start.1).abs() > threshold
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn point_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

#[derive(Debug)]
pub struct MapViewport {
    config: ViewportConfig,
    size: MapSize,
    view: ViewportState,
    pin: PinState,
    gesture: Gesture,
    moved: bool,
    events: EventBus<ViewportEvent>,
}

impl MapViewport {
    pub fn new(size: MapSize) -> Self {
        Self::with_config(size, ViewportConfig::default())
    }

    pub fn with_config(size: MapSize, config: ViewportConfig) -> Self {
        let config = config.validated();
        Self {
            view: ViewportState {
                scale: config.min_scale,
                ..ViewportState::default()
            },
            config,
            size,
            pin: PinState::default(),
            gesture: Gesture::Idle,
            moved: false,
            events: EventBus::new(),
        }
    }

    pub fn state(&self) -> ViewportState {
        self.view
    }

    pub fn pin(&self) -> PinState {
        self.pin
    }

    pub fn map_size(&self) -> MapSize {
        self.size
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ViewportEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // ---------------------------------------------------------------------
    // Zoom / pan
    // ---------------------------------------------------------------------

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }

    fn is_min_scale(&self, scale: f64) -> bool {
        scale - self.config.min_scale < SCALE_EPSILON
    }

    pub fn can_pan(&self) -> bool {
        !self.is_min_scale(self.view.scale)
    }

    pub fn zoom_in(&mut self) {
        self.step_zoom(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.step_zoom(-self.config.zoom_step);
    }

    fn step_zoom(&mut self, delta: f64) {
        let new_scale = self.clamp_scale(self.view.scale + delta);
        if (new_scale - self.view.scale).abs() < SCALE_EPSILON {
            return;
        }
        self.view.scale = new_scale;
        if self.is_min_scale(new_scale) {
            self.view.offset_x = 0.0;
            self.view.offset_y = 0.0;
        }
        self.notify_viewport();
    }

    /// Change the scale by `delta` while keeping the map point under the
    /// pivot (screen pixels) fixed. Positive `delta` zooms in.
    pub fn zoom_at_point(&mut self, delta: f64, pivot_x: f64, pivot_y: f64) {
        if !all_finite(&[delta, pivot_x, pivot_y]) {
            trace!(delta, pivot_x, pivot_y, "non-finite zoom ignored");
            return;
        }
        let old_scale = self.view.scale;
        let new_scale = self.clamp_scale(old_scale + delta);
        if (new_scale - old_scale).abs() < SCALE_EPSILON {
            return;
        }

        let (offset_x, offset_y) = if self.is_min_scale(new_scale) {
            (0.0, 0.0)
        } else {
            zoom_offset_at_pivot(
                pivot_x,
                pivot_y,
                old_scale,
                new_scale,
                self.view.offset_x,
                self.view.offset_y,
            )
        };

        self.view = ViewportState {
            scale: new_scale,
            offset_x,
            offset_y,
        };
        self.notify_viewport();
    }

    /// Set the pan offset. Ignored at minimum scale or for non-finite input.
    pub fn pan_to(&mut self, x: f64, y: f64) {
        if !self.can_pan() {
            trace!("pan ignored at minimum scale");
            return;
        }
        if !all_finite(&[x, y]) {
            return;
        }
        self.view.offset_x = x;
        self.view.offset_y = y;
        self.notify_viewport();
    }

    /// Back to minimum scale, no offset, pin hidden.
    pub fn reset_view(&mut self) {
        self.view = ViewportState {
            scale: self.config.min_scale,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        self.pin.visible = false;
        self.gesture = Gesture::Idle;
        self.moved = false;
        self.notify_viewport();
    }

    /// Update the unscaled map box, e.g. after a window resize. A placed pin
    /// is rescaled so it keeps its geographic position.
    pub fn set_map_size(&mut self, width: f64, height: f64) {
        let Some(new_size) = MapSize::new(width, height) else {
            return;
        };
        if new_size == self.size {
            return;
        }
        if let Some((mx, my)) = self.pin.position() {
            self.pin.set_position(
                mx * new_size.width() / self.size.width(),
                my * new_size.height() / self.size.height(),
            );
        }
        self.size = new_size;
        self.notify_viewport();
    }

    // ---------------------------------------------------------------------
    // Coordinate conversion
    // ---------------------------------------------------------------------

    /// Map-local pixel to globe.
    pub fn pixel_to_geo(&self, px: f64, py: f64) -> GeoCoordinate {
        projection::pixel_to_geo(px, py, self.size)
    }

    /// Globe to map-local pixel.
    pub fn geo_to_pixel(&self, lat: f64, lon: f64) -> (f64, f64) {
        projection::geo_to_pixel(GeoCoordinate { lat, lon }, self.size)
    }

    /// Undo the zoom/pan transform.
    pub fn screen_to_map(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.view.offset_x) / self.view.scale,
            (sy - self.view.offset_y) / self.view.scale,
        )
    }

    pub fn map_to_screen(&self, mx: f64, my: f64) -> (f64, f64) {
        (
            mx * self.view.scale + self.view.offset_x,
            my * self.view.scale + self.view.offset_y,
        )
    }

    /// Coordinate under a screen pixel, for hover readouts.
    pub fn geo_at_screen(&self, sx: f64, sy: f64) -> GeoCoordinate {
        let (mx, my) = self.screen_to_map(sx, sy);
        self.pixel_to_geo(mx, my)
    }

    /// Screen position of the pin under the current transform.
    pub fn pin_screen_position(&self) -> Option<(f64, f64)> {
        if !self.pin.visible {
            return None;
        }
        let (mx, my) = self.pin.position()?;
        Some(self.map_to_screen(mx, my))
    }

    pub fn pin_coordinate(&self) -> Option<GeoCoordinate> {
        if !self.pin.visible {
            return None;
        }
        let (mx, my) = self.pin.position()?;
        Some(self.pixel_to_geo(mx, my))
    }

    // ---------------------------------------------------------------------
    // Pin placement
    // ---------------------------------------------------------------------

    fn set_pin_from_screen(&mut self, sx: f64, sy: f64) {
        let (mx, my) = self.screen_to_map(sx, sy);
        let (mx, my) = projection::clamp_to_map(mx, my, self.size);
        self.pin.set_position(mx, my);
        self.pin.visible = true;
    }

    /// Drop the pin at a screen pixel and select its coordinate.
    pub fn place_pin(&mut self, sx: f64, sy: f64) {
        if !all_finite(&[sx, sy]) {
            trace!(sx, sy, "non-finite pin position ignored");
            return;
        }
        self.set_pin_from_screen(sx, sy);
        self.notify_viewport();
        self.emit_selection();
    }

    /// Relocate the pin to a screen pixel and select its coordinate.
    pub fn move_pin(&mut self, sx: f64, sy: f64) {
        self.place_pin(sx, sy);
    }

    /// Show the pin at a known coordinate without selecting it, e.g. after a
    /// city search resolved to that point.
    pub fn show_pin_at(&mut self, coord: GeoCoordinate) {
        let (mx, my) = projection::geo_to_pixel(coord, self.size);
        self.pin.set_position(mx, my);
        self.pin.visible = true;
        self.notify_viewport();
    }

    fn hits_pin(&self, sx: f64, sy: f64) -> bool {
        self.pin_screen_position()
            .is_some_and(|pin| point_distance(pin, (sx, sy)) <= self.config.pin_hit_radius)
    }

    // ---------------------------------------------------------------------
    // Pointer gestures
    // ---------------------------------------------------------------------

    pub fn pointer_down(&mut self, sx: f64, sy: f64) {
        if !all_finite(&[sx, sy]) {
            self.pointer_cancel();
            return;
        }
        let start = (sx, sy);
        self.moved = false;
        self.gesture = if self.hits_pin(sx, sy) {
            Gesture::DraggingPin { start }
        } else if self.can_pan() {
            Gesture::Panning {
                start,
                start_offset: (self.view.offset_x, self.view.offset_y),
            }
        } else {
            Gesture::Pressed { start }
        };
        trace!(gesture = ?self.gesture, "pointer down");
    }

    pub fn pointer_move(&mut self, sx: f64, sy: f64) {
        let Some(start) = self.gesture.start() else {
            return;
        };
        if !all_finite(&[sx, sy]) {
            return;
        }
        if !self.moved && exceeds_threshold(start, (sx, sy), self.config.drag_threshold) {
            self.moved = true;
        }
        if !self.moved {
            return;
        }

        match self.gesture {
            Gesture::Panning {
                start,
                start_offset,
            } => {
                self.pan_to(start_offset.0 + sx - start.0, start_offset.1 + sy - start.1);
            }
            Gesture::DraggingPin { .. } => {
                self.set_pin_from_screen(sx, sy);
                self.notify_viewport();
            }
            Gesture::Pressed { .. } | Gesture::Idle => {}
        }
    }

    /// Finish the gesture. Only a press that never moved counts as a click;
    /// a pin drag selects its new spot only if the pin actually moved.
    pub fn pointer_up(&mut self, sx: f64, sy: f64) {
        if !all_finite(&[sx, sy]) {
            self.pointer_cancel();
            return;
        }
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        let moved = std::mem::take(&mut self.moved);
        trace!(?gesture, moved, "pointer up");

        match gesture {
            Gesture::Idle => {}
            Gesture::DraggingPin { .. } => {
                if moved {
                    self.set_pin_from_screen(sx, sy);
                    self.notify_viewport();
                    self.emit_selection();
                }
            }
            Gesture::Pressed { .. } | Gesture::Panning { .. } => {
                if !moved {
                    self.place_pin(sx, sy);
                }
            }
        }
    }

    /// Abandon the gesture without placing or selecting anything.
    pub fn pointer_cancel(&mut self) {
        self.gesture = Gesture::Idle;
        self.moved = false;
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    fn notify_viewport(&mut self) {
        let event = ViewportEvent::ViewportChanged {
            scale: self.view.scale,
            offset_x: self.view.offset_x,
            offset_y: self.view.offset_y,
            pin: self.pin_screen_position(),
        };
        self.events.emit(&event);
    }

    fn emit_selection(&mut self) {
        if let Some(coord) = self.pin_coordinate() {
            self.events.emit(&ViewportEvent::CoordinateSelected(coord));
        }
    }
}
