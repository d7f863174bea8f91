use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use pinpoint_shared::projection::{meridian_px, parallel_px, GRATICULE_STEP_DEG};
use pinpoint_shared::{GeoCoordinate, MapSize, MapViewport, ViewportState};

use crate::coords;
use crate::state::Dashboard;

const MAP_CONTAINER_ID: &str = "world-map-container";

// ---------------------------------------------------------------------------
// Pure helpers
// ---------------------------------------------------------------------------

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Scroll up zooms in by one wheel step, scroll down zooms out.
fn wheel_zoom_delta(delta_y: f64, wheel_step: f64) -> Option<f64> {
    if delta_y < 0.0 {
        Some(wheel_step)
    } else if delta_y > 0.0 {
        Some(-wheel_step)
    } else {
        None
    }
}

fn transform_style(view: ViewportState) -> String {
    format!(
        "transform: translate({}px, {}px) scale({}); transform-origin: 0 0;",
        view.offset_x, view.offset_y, view.scale
    )
}

fn hover_text(coord: GeoCoordinate) -> String {
    format!("{coord} (Click to get weather)")
}

/// Graticule in a 360x180 viewBox, one unit per degree.
fn build_graticule(svg: &mut String) {
    let size = MapSize::default();
    let (w, h) = (size.width(), size.height());
    let steps = |limit: f64| {
        let count = (2.0 * limit / GRATICULE_STEP_DEG) as i32;
        (0..=count).map(move |i| -limit + i as f64 * GRATICULE_STEP_DEG)
    };

    for lon in steps(180.0) {
        let x = meridian_px(lon, size);
        let stroke = if lon == 0.0 { "0.35" } else { "0.15" };
        svg.push_str(&format!(
            r#"<line x1="{x}" y1="0" x2="{x}" y2="{h}" stroke="rgba(255,255,255,{stroke})" stroke-width="0.4" vector-effect="non-scaling-stroke"/>"#
        ));
    }
    for lat in steps(90.0) {
        let y = parallel_px(lat, size);
        let stroke = if lat == 0.0 { "0.35" } else { "0.15" };
        svg.push_str(&format!(
            r#"<line x1="0" y1="{y}" x2="{w}" y2="{y}" stroke="rgba(255,255,255,{stroke})" stroke-width="0.4" vector-effect="non-scaling-stroke"/>"#
        ));
    }
}

fn build_graticule_labels(svg: &mut String) {
    let size = MapSize::default();
    for lon in [-120.0, -60.0, 0.0, 60.0, 120.0] {
        let x = meridian_px(lon, size);
        svg.push_str(&format!(
            r#"<text x="{x}" y="176" fill="rgba(255,255,255,0.45)" font-size="5" font-family="monospace" text-anchor="middle">{lon}°</text>"#
        ));
    }
    for lat in [-60.0, -30.0, 0.0, 30.0, 60.0] {
        let y = parallel_px(lat, size);
        svg.push_str(&format!(
            r#"<text x="2" y="{y}" fill="rgba(255,255,255,0.45)" font-size="5" font-family="monospace" dominant-baseline="central">{lat}°</text>"#
        ));
    }
}

fn build_svg() -> String {
    let size = MapSize::default();
    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg viewBox="0 0 {} {}" preserveAspectRatio="none" width="100%" height="100%" xmlns="http://www.w3.org/2000/svg">"#,
        size.width(),
        size.height()
    ));
    build_graticule(&mut svg);
    build_graticule_labels(&mut svg);
    svg.push_str("</svg>");
    svg
}

// ---------------------------------------------------------------------------
// DOM glue
// ---------------------------------------------------------------------------

/// Push the rendered container size to the viewport if it changed. The pin
/// is rescaled with it, so it keeps its place on the globe.
fn sync_map_size(viewport: &mut Signal<MapViewport>) -> Option<web_sys::DomRect> {
    let rect = coords::container_rect(MAP_CONTAINER_ID)?;
    let known = viewport.peek().map_size();
    if let Some(size) = coords::resized_map(known, rect.width(), rect.height()) {
        viewport.write().set_map_size(size.width(), size.height());
    }
    Some(rect)
}

/// Container-relative position of a client point. Syncs the map size first
/// in case a layout change slipped past the resize handler.
fn local_point(viewport: &mut Signal<MapViewport>, client_x: f64, client_y: f64) -> Option<(f64, f64)> {
    let rect = sync_map_size(viewport)?;
    Some(coords::client_to_container(client_x, client_y, rect.left(), rect.top()))
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[component]
pub fn MapView() -> Element {
    let dashboard = use_context::<Dashboard>();
    let mut viewport = dashboard.viewport;
    let view = *dashboard.view.read();
    let pin = *dashboard.pin_screen.read();

    let mut hover = use_signal(|| None::<GeoCoordinate>);

    let svg_html = use_hook(build_svg);
    let transform = transform_style(view);
    let readout = match *hover.read() {
        Some(coord) => hover_text(coord),
        None => "Hover over the map".to_string(),
    };
    let can_pan = view.scale > viewport.peek().config().min_scale;
    let container_class = if can_pan { "world-map pannable" } else { "world-map" };

    rsx! {
        div { class: "map-toolbar",
            button { onclick: move |_| viewport.write().zoom_in(), "+" }
            button { onclick: move |_| viewport.write().zoom_out(), "−" }
            button { class: "secondary", onclick: move |_| viewport.write().reset_view(), "Reset" }
            span { class: "map-info", "{readout}" }
        }
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onmounted: move |_| {
                sync_map_size(&mut viewport);
            },
            onresize: move |_| {
                sync_map_size(&mut viewport);
            },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let step = viewport.peek().config().wheel_step;
                let Some(delta) = wheel_zoom_delta(wheel_delta_y(evt.data().delta()), step) else {
                    return;
                };
                let client = evt.data().client_coordinates();
                if let Some((x, y)) = local_point(&mut viewport, client.x, client.y) {
                    viewport.write().zoom_at_point(delta, x, y);
                }
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                if let Some((x, y)) = local_point(&mut viewport, client.x, client.y) {
                    viewport.write().pointer_down(x, y);
                }
            },

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                let Some((x, y)) = local_point(&mut viewport, client.x, client.y) else {
                    return;
                };
                hover.set(Some(viewport.peek().geo_at_screen(x, y)));
                if viewport.peek().is_gesture_active() {
                    viewport.write().pointer_move(x, y);
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                if !viewport.peek().is_gesture_active() {
                    return;
                }
                let client = evt.client_coordinates();
                match local_point(&mut viewport, client.x, client.y) {
                    Some((x, y)) => viewport.write().pointer_up(x, y),
                    None => viewport.write().pointer_cancel(),
                }
            },

            onmouseleave: move |_| {
                hover.set(None);
                if viewport.peek().is_gesture_active() {
                    viewport.write().pointer_cancel();
                }
            },

            // --- Touch: one finger behaves like the mouse ---

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                if touches.len() != 1 {
                    viewport.write().pointer_cancel();
                    return;
                }
                let client = touches[0].client_coordinates();
                if let Some((x, y)) = local_point(&mut viewport, client.x, client.y) {
                    viewport.write().pointer_down(x, y);
                }
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let touches = evt.data().touches();
                if touches.len() != 1 || !viewport.peek().is_gesture_active() {
                    return;
                }
                let client = touches[0].client_coordinates();
                if let Some((x, y)) = local_point(&mut viewport, client.x, client.y) {
                    viewport.write().pointer_move(x, y);
                }
            },

            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                if !viewport.peek().is_gesture_active() {
                    return;
                }
                let lifted = evt.data().touches_changed();
                let point = lifted
                    .first()
                    .map(|t| t.client_coordinates())
                    .and_then(|c| local_point(&mut viewport, c.x, c.y));
                match point {
                    Some((x, y)) => viewport.write().pointer_up(x, y),
                    None => viewport.write().pointer_cancel(),
                }
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                viewport.write().pointer_cancel();
            },

            // Transformed layer: the map and its graticule zoom and pan together
            div {
                class: "map-inner",
                style: "{transform}",
                div {
                    class: "map-graticule",
                    dangerous_inner_html: "{svg_html}",
                }
            }

            // The pin sits outside the transform so it keeps its size
            if let Some((x, y)) = pin {
                div {
                    class: "map-pin",
                    style: "left: {x}px; top: {y}px;",
                }
            }
        }
    }
}
