//! Keyboard navigation: discrete key signals mapped to navigation intents.
//!
//! Escape closes the tour (progress stays resumable), forward-arrow or
//! confirm advances, back-arrow retreats. The controller is a gate, not a
//! listener: the host feeds signals in and suppresses the platform default
//! whenever the engine reports the signal as handled.

/// A discrete key signal from the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySignal {
    Escape,
    ArrowForward,
    ArrowBack,
    Confirm,
}

/// What the user asked playback to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    Advance,
    Retreat,
    Abort,
}

/// Maps key signals to intents while enabled; inert while disabled.
///
/// One controller is attached per engine. Enabling an already-enabled
/// controller is a guarded no-op, so a duplicate registration can never
/// double-fire an intent.
#[derive(Debug, Default)]
pub struct InputController {
    enabled: bool,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts translating signals. Returns `false` if already enabled.
    pub fn enable(&mut self) -> bool {
        if self.enabled {
            log::debug!("input controller already enabled");
            return false;
        }
        self.enabled = true;
        true
    }

    /// Stops translating signals. Idempotent.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The intent for a signal, or `None` while disabled.
    pub fn intent_for(&self, signal: KeySignal) -> Option<NavIntent> {
        if !self.enabled {
            return None;
        }
        Some(match signal {
            KeySignal::Escape => NavIntent::Abort,
            KeySignal::ArrowForward | KeySignal::Confirm => NavIntent::Advance,
            KeySignal::ArrowBack => NavIntent::Retreat,
        })
    }
}
