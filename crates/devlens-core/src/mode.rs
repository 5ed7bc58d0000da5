#![forbid(unsafe_code)]

//! Session-scoped inspection-mode state.
//!
//! [`ModeStore`] is the single container for the two inspection flags. All
//! mutation goes through its methods, and every actual change is delivered
//! synchronously to subscribers before the mutator returns, so no consumer
//! can observe a stale value after the call.
//!
//! # Invariants
//!
//! 1. `show_outlines_always` only affects visuals while `enabled` is true.
//! 2. Writing a field's current value is not a change: no notification, no
//!    revision bump.
//! 3. Listeners run in subscription order.

use std::fmt;

/// Current inspection flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeState {
    /// Inspection mode on/off.
    pub enabled: bool,
    /// Draw the ambient outline on every region, not only the hovered one.
    pub show_outlines_always: bool,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            enabled: false,
            show_outlines_always: true,
        }
    }
}

impl ModeState {
    /// Create a state with explicit flags.
    #[must_use]
    pub const fn new(enabled: bool, show_outlines_always: bool) -> Self {
        Self {
            enabled,
            show_outlines_always,
        }
    }

    /// True when ambient outlines are actually drawn.
    #[inline]
    pub fn ambient_outlines(&self) -> bool {
        self.enabled && self.show_outlines_always
    }
}

/// Which flag changed, with its new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Enabled(bool),
    ShowOutlinesAlways(bool),
}

impl ModeChange {
    /// Stable flag name for diagnostics.
    pub const fn flag(self) -> &'static str {
        match self {
            Self::Enabled(_) => "enabled",
            Self::ShowOutlinesAlways(_) => "show_outlines_always",
        }
    }

    /// New value of the changed flag.
    pub const fn value(self) -> bool {
        match self {
            Self::Enabled(v) | Self::ShowOutlinesAlways(v) => v,
        }
    }
}

/// Handle returned by [`ModeStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw id value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Listener invoked on every mode change.
pub type ModeListener = Box<dyn FnMut(&ModeState, ModeChange)>;

/// Inspection-mode state container with synchronous subscriptions.
pub struct ModeStore {
    state: ModeState,
    revision: u64,
    next_id: u64,
    listeners: Vec<(SubscriptionId, ModeListener)>,
}

impl fmt::Debug for ModeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ModeStore {
    fn default() -> Self {
        Self::new(ModeState::default())
    }
}

impl ModeStore {
    /// Create a store with the given initial state.
    #[must_use]
    pub fn new(initial: ModeState) -> Self {
        Self {
            state: initial,
            revision: 0,
            next_id: 1,
            listeners: Vec::new(),
        }
    }

    /// Current state snapshot.
    #[inline]
    pub fn state(&self) -> ModeState {
        self.state
    }

    /// Shorthand for `state().enabled`.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Number of changes applied since creation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Flip `enabled`. Returns the new value.
    pub fn toggle_enabled(&mut self) -> bool {
        let next = !self.state.enabled;
        self.set_enabled(next);
        next
    }

    /// Set `enabled` directly.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.state.enabled == enabled {
            return;
        }
        self.state.enabled = enabled;
        self.commit(ModeChange::Enabled(enabled));
    }

    /// Set `show_outlines_always`.
    ///
    /// The value is stored even while inspection is disabled; it takes
    /// effect the next time inspection is enabled.
    pub fn set_show_outlines_always(&mut self, show: bool) {
        if self.state.show_outlines_always == show {
            return;
        }
        self.state.show_outlines_always = show;
        self.commit(ModeChange::ShowOutlinesAlways(show));
    }

    /// Flip `show_outlines_always`. Returns the new value.
    pub fn toggle_show_outlines(&mut self) -> bool {
        let next = !self.state.show_outlines_always;
        self.set_show_outlines_always(next);
        next
    }

    /// Register a listener for subsequent changes.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ModeState, ModeChange) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    #[inline]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn commit(&mut self, change: ModeChange) {
        self.revision += 1;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            flag = change.flag(),
            value = change.value(),
            revision = self.revision,
            "inspection mode changed"
        );

        let state = self.state;
        for (_, listener) in &mut self.listeners {
            listener(&state, change);
        }
    }
}
