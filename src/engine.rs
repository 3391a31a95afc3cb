//! The playback engine: step sequencing and orchestration.
//!
//! Owns the step sequence, the current position, and the state machine
//! `Idle → Active(index) → Completed | Dismissed`. On every transition it
//! persists progress and reports an event. Everything it touches in the host
//! environment goes through injected capabilities: the render surface, the
//! progress backend, the event sinks, and the settle-delay scheduler.
//!
//! ## Driving the engine
//!
//! The host wires three things back into the engine:
//!
//! - key signals, via [`TourEngine::handle_key`];
//! - explicit control calls (`advance`/`retreat`/`skip`/`dismiss`) from its
//!   own UI affordances;
//! - timer completions, via [`TourEngine::settle`]: whenever the engine asks
//!   the [`Scheduler`] for a delay, the host calls `settle(generation)` once
//!   that delay elapses. Stale generations are discarded, so a timer that
//!   fires after the user has already navigated on is harmless.

use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::Config;
use crate::geometry;
use crate::input::{InputController, KeySignal, NavIntent};
use crate::model::{EventAttributes, EventKind, Step, Tour};
use crate::placement;
use crate::progress::{ProgressBackend, ProgressStore};
use crate::report::{EventObserver, EventReporter, EventSink};
use crate::source::{SourceError, TourSource};
use crate::surface::{PanelView, Surface};

/// Timer capability: the host owns the actual timer and calls
/// [`TourEngine::settle`] with the same generation when it fires.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, generation: u64);
}

/// Where playback stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Not started, or suppressed because the tour was already completed.
    Idle,

    /// Showing the step at this index.
    Active(usize),

    /// Ran past the last step; the completion affordance is up, waiting for
    /// acknowledgement.
    Completed,

    /// Closed. Terminal: the engine accepts no further intents.
    Dismissed,
}

/// Sequences a tour's steps on a render surface.
pub struct TourEngine<S: Surface> {
    tour: Tour,
    config: Config,
    state: EngineState,
    /// Bumped on every scheduled activation; stale settle callbacks are
    /// discarded by comparing against it.
    generation: u64,
    surface: S,
    store: ProgressStore,
    input: InputController,
    reporter: EventReporter,
    scheduler: Box<dyn Scheduler>,
}

impl<S: Surface> TourEngine<S> {
    /// An engine for an already-fetched tour.
    pub fn new(
        tour: Tour,
        surface: S,
        store: ProgressStore,
        scheduler: Box<dyn Scheduler>,
        config: Config,
    ) -> Self {
        let reporter = EventReporter::new(tour.id.clone());
        Self {
            tour,
            config,
            state: EngineState::Idle,
            generation: 0,
            surface,
            store,
            input: InputController::new(),
            reporter,
            scheduler,
        }
    }

    /// Fetches the tour from `source` and constructs an engine for it.
    ///
    /// A fetch failure is fatal to startup: the error is returned, no engine
    /// exists, and no state was mutated.
    pub fn load(
        source: &dyn TourSource,
        tour_id: &str,
        surface: S,
        backend: Box<dyn ProgressBackend>,
        scheduler: Box<dyn Scheduler>,
        config: Config,
    ) -> Result<Self, SourceError> {
        let tour = source.fetch_tour(tour_id)?;
        let store = ProgressStore::new(&tour.id, backend);
        Ok(Self::new(tour, surface, store, scheduler, config))
    }

    /// Registers a delivery sink for reported events.
    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.reporter.add_sink(sink);
    }

    /// Registers an observer notified of every reported event.
    pub fn add_observer(&mut self, observer: EventObserver) {
        self.reporter.add_observer(observer);
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    /// Starts or resumes playback.
    ///
    /// A tour the store marks completed stays suppressed: the engine remains
    /// `Idle` and nothing is shown or reported. Otherwise playback begins at
    /// the persisted resumable index (clamped into the current step range)
    /// or at step 0.
    pub fn start(&mut self) {
        if self.state != EngineState::Idle {
            log::warn!("tour {} already started", self.tour.id);
            return;
        }
        if self.tour.steps.is_empty() {
            log::warn!("tour {} has no steps", self.tour.id);
            return;
        }
        if self.store.is_completed() {
            log::debug!("tour {} already completed", self.tour.id);
            return;
        }

        let last = self.tour.steps.len() - 1;
        let resumed = self.store.get_progress().map_or(0, |index| {
            if index > last {
                log::warn!("saved step index {index} out of range, clamping to {last}");
            }
            index.min(last)
        });
        if resumed > 0 {
            log::debug!("resuming tour {} from step {}", self.tour.id, resumed + 1);
        }

        self.state = EngineState::Active(resumed);
        self.input.enable();
        self.reporter
            .track(EventKind::TourStarted, EventAttributes::index(resumed));
        self.surface.show_overlay();
        self.activate_step();
    }

    /// Moves to the next step, or completes the tour from the last one.
    pub fn advance(&mut self) {
        let EngineState::Active(index) = self.state else {
            return;
        };
        if index + 1 >= self.tour.steps.len() {
            self.complete();
            return;
        }

        let step_id = self.tour.steps[index].id.clone();
        self.reporter
            .track(EventKind::StepNext, EventAttributes::step(step_id, index));
        let next = index + 1;
        self.state = EngineState::Active(next);
        self.store.save_progress(next);
        self.activate_step();
    }

    /// Moves to the previous step. A no-op on the first step: no event, no
    /// state change.
    pub fn retreat(&mut self) {
        let EngineState::Active(index) = self.state else {
            return;
        };
        if index == 0 {
            return;
        }

        let step_id = self.tour.steps[index].id.clone();
        self.reporter
            .track(EventKind::StepBack, EventAttributes::step(step_id, index));
        let previous = index - 1;
        self.state = EngineState::Active(previous);
        self.store.save_progress(previous);
        self.activate_step();
    }

    /// Closes the tour, keeping progress resumable.
    pub fn skip(&mut self) {
        let EngineState::Active(index) = self.state else {
            return;
        };
        self.reporter
            .track(EventKind::TourSkipped, EventAttributes::index(index));
        self.store.save_progress(index);
        self.state = EngineState::Dismissed;
        self.release();
    }

    /// Closes the tour permanently: it never auto-starts again.
    pub fn dismiss(&mut self) {
        let EngineState::Active(index) = self.state else {
            return;
        };
        let mut metadata = Map::new();
        metadata.insert("permanent".into(), Value::Bool(true));
        self.reporter.track(
            EventKind::TourSkipped,
            EventAttributes::index(index).with_metadata(metadata),
        );
        self.store.mark_completed();
        self.state = EngineState::Dismissed;
        self.release();
    }

    /// Dismisses the completion affordance and releases resources.
    pub fn acknowledge_completion(&mut self) {
        if self.state != EngineState::Completed {
            return;
        }
        self.state = EngineState::Dismissed;
        self.release();
    }

    /// Feeds a key signal through the input controller. Returns whether the
    /// signal was handled, so the host can suppress the platform default.
    pub fn handle_key(&mut self, signal: KeySignal) -> bool {
        let Some(intent) = self.input.intent_for(signal) else {
            return false;
        };
        match intent {
            NavIntent::Advance => self.advance(),
            NavIntent::Retreat => self.retreat(),
            NavIntent::Abort => self.skip(),
        }
        true
    }

    /// Finishes a scheduled step activation once the settle delay elapsed.
    ///
    /// Call with the generation the [`Scheduler`] was given. A stale
    /// generation means the user navigated on during the delay; the callback
    /// is discarded untouched.
    pub fn settle(&mut self, generation: u64) {
        if generation != self.generation {
            log::debug!("discarding stale step activation (generation {generation})");
            return;
        }
        let EngineState::Active(index) = self.state else {
            return;
        };

        let step = self.tour.steps[index].clone();
        match geometry::locate(&self.surface, &step.locator) {
            Some(target) => {
                self.surface.highlight(target);
                let viewport = self.surface.viewport();
                let placement = placement::plan(
                    target,
                    self.config.panel_size(),
                    self.config.panel_padding,
                    &viewport,
                );
                let view = self
                    .panel_view(index)
                    .at(placement.origin, Some(placement.side));
                self.surface.show_panel(&view);
            }
            // The page mutated during the scroll and the target vanished.
            None => self.target_missing(index, &step),
        }
    }

    /// Activates the current step: reports the view, resolves the target,
    /// and either schedules the post-scroll settle or falls back to a
    /// centered panel.
    fn activate_step(&mut self) {
        let EngineState::Active(index) = self.state else {
            return;
        };
        let step = self.tour.steps[index].clone();

        log::debug!("step {} of {}: {}", index + 1, self.tour.steps.len(), step.title);
        self.reporter.track(
            EventKind::StepViewed,
            EventAttributes::step(step.id.clone(), index),
        );

        match geometry::locate(&self.surface, &step.locator) {
            Some(target) => {
                self.surface.scroll_to(target);
                self.generation += 1;
                self.scheduler
                    .schedule(self.config.settle_delay(), self.generation);
            }
            None => self.target_missing(index, &step),
        }
    }

    fn target_missing(&mut self, index: usize, step: &Step) {
        log::warn!("tour target not found: {}", step.locator);
        let mut metadata = Map::new();
        metadata.insert("error".into(), Value::String("element_not_found".into()));
        metadata.insert("locator".into(), Value::String(step.locator.clone()));
        self.reporter.track(
            EventKind::TourError,
            EventAttributes::step(step.id.clone(), index).with_metadata(metadata),
        );

        let viewport = self.surface.viewport();
        let origin = placement::centered(self.config.panel_size(), &viewport);
        let view = self.panel_view(index).at(origin, None);
        self.surface.show_panel(&view);
    }

    fn complete(&mut self) {
        self.reporter
            .track(EventKind::TourCompleted, EventAttributes::default());
        self.store.mark_completed();
        self.surface.hide_panel();
        self.surface.clear_highlight();
        self.state = EngineState::Completed;
        self.surface.show_completion();
    }

    fn release(&mut self) {
        self.input.disable();
        self.surface.teardown();
    }

    fn panel_view(&self, index: usize) -> PanelView {
        PanelView::new(&self.tour.steps[index], index + 1, self.tour.steps.len())
    }
}
