//! The render surface capability.
//!
//! The page being toured is shared, externally mutable state. The engine
//! never touches it directly; everything it needs from the host environment
//! is behind the [`Surface`] trait, so the state machine can run against a
//! real page, a test double, or anything in between.

use kurbo::{Point, Rect, Size, Vec2};

use crate::model::Step;
use crate::placement::Side;

/// The visible window onto the page: its size and current scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Size,
    pub scroll: Vec2,
}

impl Viewport {
    pub fn new(width: f64, height: f64, scroll_x: f64, scroll_y: f64) -> Self {
        Self {
            size: Size::new(width, height),
            scroll: Vec2::new(scroll_x, scroll_y),
        }
    }
}

/// Render-ready view of one step's explanatory panel.
///
/// Carries everything the surface needs to draw the panel: content, the
/// `current / total` progress counter, and where to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub title: String,
    pub body: String,

    /// 1-based position shown in the progress counter.
    pub step_number: usize,
    pub total_steps: usize,

    /// Page coordinates of the panel's top-left corner.
    pub position: Point,

    /// Which side of the target the panel sits on. `None` means the centered
    /// fallback; the surface hides the directional indicator.
    pub side: Option<Side>,
}

impl PanelView {
    pub(crate) fn new(step: &Step, step_number: usize, total_steps: usize) -> Self {
        Self {
            title: step.title.clone(),
            body: step.body.clone(),
            step_number,
            total_steps,
            position: Point::ZERO,
            side: None,
        }
    }

    #[must_use]
    pub(crate) fn at(mut self, position: Point, side: Option<Side>) -> Self {
        self.position = position;
        self.side = side;
        self
    }

    /// True on the first step; the surface disables its Back affordance.
    pub fn is_first(&self) -> bool {
        self.step_number == 1
    }

    /// True on the last step; the surface relabels Next as Finish.
    pub fn is_last(&self) -> bool {
        self.step_number == self.total_steps
    }
}

/// Injected rendering and geometry capability.
///
/// Geometry reads are pure; presentation calls mutate whatever the host uses
/// to draw. A surface must tolerate presentation calls arriving in any order
/// the state machine produces, including `teardown` without a prior panel.
pub trait Surface {
    /// Viewport-relative bounding box of the first element matching
    /// `locator`, or `None` if the locator is malformed or matches nothing.
    /// Must not panic on malformed locators.
    fn query(&self, locator: &str) -> Option<Rect>;

    /// Current viewport extents and scroll offset.
    fn viewport(&self) -> Viewport;

    /// Smoothly scroll a page-coordinates box into view.
    fn scroll_to(&mut self, target: Rect);

    /// Show the page-dimming overlay.
    fn show_overlay(&mut self);

    /// Spotlight a page-coordinates box.
    fn highlight(&mut self, target: Rect);

    /// Remove the spotlight.
    fn clear_highlight(&mut self);

    /// Show the explanatory panel.
    fn show_panel(&mut self, panel: &PanelView);

    /// Hide the explanatory panel.
    fn hide_panel(&mut self);

    /// Show the end-of-tour affordance.
    fn show_completion(&mut self);

    /// Destroy overlay, highlight, and panel.
    fn teardown(&mut self);
}
