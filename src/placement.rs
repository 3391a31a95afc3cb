//! Panel placement: choosing where the explanatory panel sits relative to
//! its target.
//!
//! Candidates are generated in a fixed preference order and the first one
//! that fits the viewport wins. When nothing fits, the first candidate is
//! returned anyway: the planner always produces a position.

use kurbo::{Point, Rect, Size};

use crate::surface::Viewport;

/// Which side of the target the panel sits on.
///
/// Also orients the panel's directional indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// A chosen panel position: page coordinates of the top-left corner plus the
/// side of the target it was placed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub origin: Point,
    pub side: Side,
}

/// Picks a placement for a `panel`-sized box next to `target`.
///
/// `target` is in page coordinates; fit is checked against the viewport,
/// vertically relative to the current scroll. Preference order is bottom,
/// top, right, left. Each candidate centers the panel along the target's
/// perpendicular axis and offsets it by `padding` along the placement axis.
/// If no candidate fits, the bottom candidate is returned unconditionally.
pub fn plan(target: Rect, panel: Size, padding: f64, viewport: &Viewport) -> Placement {
    let candidates = [
        below(target, panel, padding),
        above(target, panel, padding),
        right_of(target, panel, padding),
        left_of(target, panel, padding),
    ];

    candidates
        .into_iter()
        .find(|candidate| fits(*candidate, panel, viewport))
        .unwrap_or(candidates[0])
}

/// Position for the centered-in-viewport fallback, used when a step's target
/// cannot be resolved.
///
/// Computed directly from the viewport, independent of any target: centered
/// horizontally, and centered vertically within the currently scrolled-to
/// region of the page.
pub fn centered(panel: Size, viewport: &Viewport) -> Point {
    Point::new(
        viewport.size.width / 2.0 - panel.width / 2.0,
        viewport.scroll.y + viewport.size.height / 2.0 - panel.height / 2.0,
    )
}

fn below(target: Rect, panel: Size, padding: f64) -> Placement {
    Placement {
        origin: Point::new(
            target.min_x() + target.width() / 2.0 - panel.width / 2.0,
            target.max_y() + padding,
        ),
        side: Side::Bottom,
    }
}

fn above(target: Rect, panel: Size, padding: f64) -> Placement {
    Placement {
        origin: Point::new(
            target.min_x() + target.width() / 2.0 - panel.width / 2.0,
            target.min_y() - panel.height - padding,
        ),
        side: Side::Top,
    }
}

fn right_of(target: Rect, panel: Size, padding: f64) -> Placement {
    Placement {
        origin: Point::new(
            target.max_x() + padding,
            target.min_y() + target.height() / 2.0 - panel.height / 2.0,
        ),
        side: Side::Right,
    }
}

fn left_of(target: Rect, panel: Size, padding: f64) -> Placement {
    Placement {
        origin: Point::new(
            target.min_x() - panel.width - padding,
            target.min_y() + target.height() / 2.0 - panel.height / 2.0,
        ),
        side: Side::Left,
    }
}

/// Whether the panel rectangle lies fully inside the viewport.
///
/// Horizontal bounds are absolute; vertical bounds are checked relative to
/// the current scroll offset.
fn fits(candidate: Placement, panel: Size, viewport: &Viewport) -> bool {
    let left = candidate.origin.x;
    if left < 0.0 || left + panel.width > viewport.size.width {
        return false;
    }

    let relative_top = candidate.origin.y - viewport.scroll.y;
    relative_top >= 0.0 && relative_top + panel.height <= viewport.size.height
}
