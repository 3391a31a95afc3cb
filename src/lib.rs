//! Waypoint: a guided-tour playback engine.
//!
//! Given an ordered list of steps (each naming a target element on a page, a
//! title, and body text), Waypoint walks a visitor through the page: it
//! highlights each target, positions an explanatory panel next to it, and
//! records progress so a tour can be resumed later or permanently dismissed.
//!
//! The crate is the engine, not the chrome. Everything environment-specific
//! sits behind injected capabilities, so the same state machine runs against
//! a real page or a test double:
//!
//! - [`Surface`]: geometry queries plus the presentation calls (overlay,
//!   highlight, panel, completion affordance).
//! - [`ProgressBackend`]: string key/value persistence for the resumable
//!   progress record. Best-effort; playback works without it.
//! - [`EventSink`] / observers: fire-and-forget delivery of structured
//!   lifecycle events.
//! - [`TourSource`]: fetches tour definitions by id.
//! - [`Scheduler`]: owns the timer for the post-scroll settle delay and
//!   calls back into [`TourEngine::settle`].
//!
//! ## Flow
//!
//! ```text
//! TourSource ─► TourEngine ─► geometry::locate ─► placement::plan ─► Surface
//!                   │
//!                   ├─► ProgressStore (persist on every transition)
//!                   └─► EventReporter (sinks + observers)
//! ```
//!
//! Playback is single-threaded and event-driven: the host feeds key signals
//! through [`TourEngine::handle_key`], calls the explicit controls
//! (`advance`/`retreat`/`skip`/`dismiss`), and completes scheduled settle
//! delays via [`TourEngine::settle`].

mod clock;
mod config;
mod engine;
pub mod geometry;
mod input;
mod model;
pub mod placement;
mod progress;
mod report;
mod source;
mod surface;

pub use clock::{Clock, SystemClock};
pub use config::{Config, ConfigError};
pub use engine::{EngineState, Scheduler, TourEngine};
pub use input::{InputController, KeySignal, NavIntent};
pub use model::{EventAttributes, EventKind, ProgressRecord, Step, Tour, TourEvent};
pub use placement::{Placement, Side};
pub use progress::{BackendError, FileBackend, MemoryBackend, ProgressBackend, ProgressStore};
pub use report::{DeliveryError, EventObserver, EventReporter, EventSink};
pub use source::{SourceError, StaticSource, TourSource, parse_tour_json};
pub use surface::{PanelView, Surface, Viewport};
