use pinpoint_shared::MapSize;

/// Get the bounding client rect of an element by id.
pub fn container_rect(id: &str) -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(id)?;
    Some(element.get_bounding_client_rect())
}

/// Convert client (viewport) coordinates to container-relative pixel coordinates.
pub fn client_to_container(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
) -> (f64, f64) {
    (client_x - rect_left, client_y - rect_top)
}

/// Whether the rendered container differs from the size the viewport knows.
/// Sub-pixel jitter from layout rounding is ignored.
pub fn size_changed(known_w: f64, known_h: f64, rect_w: f64, rect_h: f64) -> bool {
    (known_w - rect_w).abs() > 0.5 || (known_h - rect_h).abs() > 0.5
}

/// The size to hand the viewport after a layout pass, or `None` when the
/// container still matches `known` or has collapsed to nothing.
pub fn resized_map(known: MapSize, rect_w: f64, rect_h: f64) -> Option<MapSize> {
    let rendered = MapSize::new(rect_w, rect_h)?;
    size_changed(known.width(), known.height(), rendered.width(), rendered.height())
        .then_some(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_to_container_origin() {
        let (x, y) = client_to_container(100.0, 200.0, 100.0, 200.0);
        assert!((x - 0.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_client_to_container_offset() {
        let (x, y) = client_to_container(450.0, 350.0, 320.0, 50.0);
        assert!((x - 130.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_size_changed_ignores_rounding() {
        assert!(!size_changed(800.0, 400.0, 800.3, 399.8));
        assert!(size_changed(800.0, 400.0, 640.0, 320.0));
    }

    #[test]
    fn test_resized_map() {
        let known = MapSize::default();
        assert_eq!(resized_map(known, 960.0, 480.0), MapSize::new(960.0, 480.0));
        assert_eq!(resized_map(known, 360.2, 179.9), None);
        // Hidden tab: zero-sized rect keeps the last real size
        assert_eq!(resized_map(known, 0.0, 0.0), None);
    }
}
