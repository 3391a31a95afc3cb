//! Target geometry: locating a step's element in page coordinates.
//!
//! Locators are resolved fresh on every step activation. The page is assumed
//! mutable between steps, so boxes are never cached.

use kurbo::Rect;

use crate::surface::{Surface, Viewport};

/// Absolute bounding box of the element matching `locator`, in page
/// (scroll-inclusive) coordinates.
///
/// Combines the surface's viewport-relative box with the current scroll
/// offset. A malformed or non-matching locator is `None`, never a panic.
pub fn locate<S: Surface + ?Sized>(surface: &S, locator: &str) -> Option<Rect> {
    let relative = surface.query(locator)?;
    let scroll = surface.viewport().scroll;
    Some(relative + scroll)
}

/// Whether a viewport-relative box lies fully inside the viewport.
pub fn is_visible(relative: Rect, viewport: &Viewport) -> bool {
    relative.min_y() >= 0.0
        && relative.min_x() >= 0.0
        && relative.max_y() <= viewport.size.height
        && relative.max_x() <= viewport.size.width
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSurface {
        rect: Option<Rect>,
        viewport: Viewport,
    }

    impl Surface for FixedSurface {
        fn query(&self, locator: &str) -> Option<Rect> {
            if locator.starts_with('#') { self.rect } else { None }
        }

        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn scroll_to(&mut self, _target: Rect) {}
        fn show_overlay(&mut self) {}
        fn highlight(&mut self, _target: Rect) {}
        fn clear_highlight(&mut self) {}
        fn show_panel(&mut self, _panel: &crate::surface::PanelView) {}
        fn hide_panel(&mut self) {}
        fn show_completion(&mut self) {}
        fn teardown(&mut self) {}
    }

    #[test]
    fn locate_adds_scroll_offset() {
        let surface = FixedSurface {
            rect: Some(Rect::new(10.0, 20.0, 60.0, 40.0)),
            viewport: Viewport::new(1000.0, 800.0, 5.0, 300.0),
        };

        let located = locate(&surface, "#target").unwrap();
        assert_eq!(located, Rect::new(15.0, 320.0, 65.0, 340.0));
    }

    #[test]
    fn locate_missing_element_is_none() {
        let surface = FixedSurface {
            rect: None,
            viewport: Viewport::new(1000.0, 800.0, 0.0, 0.0),
        };
        assert!(locate(&surface, "#does-not-exist").is_none());
    }

    #[test]
    fn malformed_locator_is_none_not_a_panic() {
        let surface = FixedSurface {
            rect: Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
            viewport: Viewport::new(1000.0, 800.0, 0.0, 0.0),
        };
        assert!(locate(&surface, ">>> not a selector").is_none());
    }

    #[test]
    fn visibility_is_relative_to_the_viewport() {
        let viewport = Viewport::new(800.0, 600.0, 0.0, 0.0);
        assert!(is_visible(Rect::new(0.0, 0.0, 800.0, 600.0), &viewport));
        assert!(is_visible(Rect::new(10.0, 10.0, 50.0, 50.0), &viewport));
        assert!(!is_visible(Rect::new(-1.0, 10.0, 50.0, 50.0), &viewport));
        assert!(!is_visible(Rect::new(10.0, 10.0, 50.0, 601.0), &viewport));
    }
}
