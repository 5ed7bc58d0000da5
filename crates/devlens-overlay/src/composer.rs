#![forbid(unsafe_code)]

//! Overlay session: the composer tying mode, geometry and styles together.
//!
//! One [`OverlaySession`] exists per host session. It owns the [`ModeStore`],
//! keeps the singleton override style block in sync with it, consumes the
//! toggle chord, runs the positioner on hover-enter and turns an
//! [`InspectedRegion`] into a [`RegionPaint`] the host draws.
//!
//! # Example
//!
//! ```
//! use devlens_core::geometry::{AnchorRect, Size};
//! use devlens_overlay::annotation::AnnotationRecord;
//! use devlens_overlay::composer::OverlaySession;
//! use devlens_overlay::config::OverlayConfig;
//! use devlens_overlay::region::InspectedRegion;
//! use devlens_overlay::stylesheet::InMemoryStyleHost;
//! use devlens_overlay::visual::VisualState;
//!
//! let mut session = OverlaySession::new(OverlayConfig::default(), InMemoryStyleHost::new());
//! session.set_viewport(Size::new(1280.0, 800.0));
//! session.set_enabled(true);
//!
//! let mut card = InspectedRegion::new(AnnotationRecord::new("Card").spacing("p-4"));
//! session.hover_enter(&mut card, &AnchorRect::new(100.0, 50.0, 150.0, 140.0));
//!
//! let paint = session.compose(&card);
//! assert_eq!(paint.state, VisualState::Highlighted);
//! assert_eq!(paint.badge, Some("Card"));
//! let panel = paint.panel.expect("panel shown while hovered");
//! assert_eq!((panel.placement.top, panel.placement.left), (100.0, 158.0));
//! ```

use devlens_core::event::KeyEvent;
use devlens_core::geometry::{AnchorRect, PanelPlacement, Size};
use devlens_core::mode::{ModeChange, ModeState, ModeStore, SubscriptionId};
use devlens_core::positioner::{PanelPositioner, PlacementTrace};
use devlens_core::shortcut::{ShortcutOutcome, ToggleShortcut};

use crate::config::OverlayConfig;
use crate::diagnostics::{
    DiagnosticEntry, DiagnosticEventKind, DiagnosticLog, DiagnosticSink, TelemetryHooks,
};
use crate::panel::PanelContent;
use crate::region::{HoverTicket, InspectedRegion, MeasureAnchor};
use crate::stylesheet::{SlotChange, StyleBlockSlot, StyleHost};
use crate::visual::{OutlineStyle, VisualState};

/// Detail panel ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelPaint {
    pub placement: PanelPlacement,
    pub size: Size,
    pub content: PanelContent,
}

/// Everything the host draws for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPaint<'a> {
    pub state: VisualState,
    pub outline: Option<OutlineStyle>,
    /// Identifier badge text.
    pub badge: Option<&'a str>,
    /// Present only while highlighted and the anchor has been measured.
    pub panel: Option<PanelPaint>,
}

impl RegionPaint<'_> {
    /// True when the host draws only the plain content.
    #[inline]
    pub fn is_plain(&self) -> bool {
        self.outline.is_none() && self.badge.is_none() && self.panel.is_none()
    }
}

/// Session-scoped overlay engine.
#[derive(Debug)]
pub struct OverlaySession<H: StyleHost> {
    config: OverlayConfig,
    mode: ModeStore,
    shortcut: ToggleShortcut,
    positioner: PanelPositioner,
    slot: StyleBlockSlot,
    host: H,
    viewport: Size,
    diagnostics: DiagnosticSink,
    /// Bumped on every enable/disable; hovers from an earlier epoch are void.
    enable_epoch: u64,
}

impl<H: StyleHost> OverlaySession<H> {
    /// Start a session. If the config starts enabled, the override block is
    /// installed immediately.
    pub fn new(config: OverlayConfig, host: H) -> Self {
        let log = config
            .diagnostics
            .then(|| DiagnosticLog::new().with_max_entries(config.diagnostics_max_entries));
        let mut session = Self {
            mode: ModeStore::new(config.initial_mode),
            shortcut: config.shortcut,
            positioner: config.positioner(),
            slot: StyleBlockSlot::new(),
            host,
            viewport: Size::default(),
            diagnostics: DiagnosticSink::new(log, None)
                .deterministic(config.diagnostics_deterministic),
            config,
            enable_epoch: 0,
        };
        session.sync_styles();
        session
    }

    /// Attach telemetry hooks.
    #[must_use]
    pub fn with_telemetry_hooks(mut self, hooks: TelemetryHooks) -> Self {
        self.diagnostics.set_hooks(hooks);
        self
    }

    /// Use sequence-derived timestamps in diagnostics.
    #[must_use]
    pub fn with_deterministic_diagnostics(mut self) -> Self {
        self.diagnostics = std::mem::take(&mut self.diagnostics).deterministic(true);
        self
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Current mode.
    #[inline]
    pub fn state(&self) -> ModeState {
        self.mode.state()
    }

    /// The underlying mode store (read-only; mutate through the session so
    /// the style block stays in sync).
    #[inline]
    pub fn mode(&self) -> &ModeStore {
        &self.mode
    }

    pub fn shortcut(&self) -> &ToggleShortcut {
        &self.shortcut
    }

    pub fn positioner(&self) -> &PanelPositioner {
        &self.positioner
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Update the viewport used for subsequent placements.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn style_host(&self) -> &H {
        &self.host
    }

    pub fn style_host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Diagnostic log, when enabled in the config.
    pub fn diagnostics(&self) -> Option<&DiagnosticLog> {
        self.diagnostics.log()
    }

    pub fn diagnostics_mut(&mut self) -> Option<&mut DiagnosticLog> {
        self.diagnostics.log_mut()
    }

    // --- mode ---

    /// Flip inspection mode. Returns the new value.
    pub fn toggle_enabled(&mut self) -> bool {
        let before = self.mode.state();
        let next = self.mode.toggle_enabled();
        self.after_mode_change(before);
        next
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        let before = self.mode.state();
        self.mode.set_enabled(enabled);
        self.after_mode_change(before);
    }

    pub fn set_show_outlines_always(&mut self, show: bool) {
        let before = self.mode.state();
        self.mode.set_show_outlines_always(show);
        self.after_mode_change(before);
    }

    /// Flip `show_outlines_always`. Returns the new value.
    pub fn toggle_show_outlines(&mut self) -> bool {
        let before = self.mode.state();
        let next = self.mode.toggle_show_outlines();
        self.after_mode_change(before);
        next
    }

    /// Register a mode listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ModeState, ModeChange) + 'static,
    ) -> SubscriptionId {
        self.mode.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.mode.unsubscribe(id)
    }

    /// Offer a key event. The toggle chord flips inspection mode and is
    /// reported as consumed; everything else is ignored.
    pub fn handle_key(&mut self, event: &KeyEvent) -> ShortcutOutcome {
        if !self.shortcut.matches(event) {
            return ShortcutOutcome::Ignored;
        }
        self.diagnostics.emit(
            DiagnosticEntry::new(DiagnosticEventKind::ShortcutConsumed)
                .with_context(self.shortcut.label()),
        );
        self.toggle_enabled();
        ShortcutOutcome::Consumed
    }

    fn after_mode_change(&mut self, before: ModeState) {
        let after = self.mode.state();
        if before.enabled != after.enabled {
            self.enable_epoch = self.enable_epoch.wrapping_add(1);
            self.diagnostics.emit(
                DiagnosticEntry::new(DiagnosticEventKind::InspectionToggled)
                    .with_flag("enabled", after.enabled),
            );
        }
        if before.show_outlines_always != after.show_outlines_always {
            self.diagnostics.emit(
                DiagnosticEntry::new(DiagnosticEventKind::OutlinesChanged)
                    .with_flag("show_outlines_always", after.show_outlines_always),
            );
        }
        self.sync_styles();
    }

    fn sync_styles(&mut self) -> SlotChange {
        let change = self.slot.sync(self.mode.state(), &mut self.host);
        if change != SlotChange::Unchanged {
            self.diagnostics.emit(
                DiagnosticEntry::new(DiagnosticEventKind::StyleBlockChanged)
                    .with_context(change.as_str()),
            );
        }
        change
    }

    // --- hover ---

    /// Hover-enter with a synchronous measurement.
    ///
    /// Ignored (returns `None`) while inspection is off.
    pub fn hover_enter(
        &mut self,
        region: &mut InspectedRegion,
        anchor: &dyn MeasureAnchor,
    ) -> Option<PlacementTrace> {
        #[cfg(feature = "tracing")]
        let _span =
            tracing::debug_span!("devlens.hover_enter", identifier = region.identifier()).entered();

        let ticket = self.begin_hover(region)?;
        self.resolve_hover(region, ticket, anchor.measure())
    }

    /// Hover-enter without a measurement yet. The host measures and calls
    /// [`resolve_hover`](Self::resolve_hover) with the returned ticket.
    pub fn begin_hover(&mut self, region: &mut InspectedRegion) -> Option<HoverTicket> {
        if !self.mode.is_enabled() {
            return None;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(identifier = region.identifier(), "hover entered");

        self.report_issues(region);
        let ticket = region.hover.begin_hover();
        region.hover.set_epoch(self.enable_epoch);
        self.diagnostics.emit(
            DiagnosticEntry::new(DiagnosticEventKind::HoverEntered)
                .with_identifier(region.identifier())
                .with_ticket(ticket.id()),
        );
        Some(ticket)
    }

    /// Deliver a measurement. Stale tickets are dropped.
    pub fn resolve_hover(
        &mut self,
        region: &mut InspectedRegion,
        ticket: HoverTicket,
        measured: Option<AnchorRect>,
    ) -> Option<PlacementTrace> {
        let resolved = if self.is_current(region) {
            region
                .hover
                .resolve(ticket, measured, &self.positioner, self.viewport)
        } else {
            None
        };
        match resolved {
            Some(trace) => {
                self.diagnostics.emit(
                    DiagnosticEntry::new(DiagnosticEventKind::PanelPlaced)
                        .with_identifier(region.identifier())
                        .with_placement(trace.placement, trace.side)
                        .with_ticket(ticket.id()),
                );
                Some(trace)
            }
            None => {
                self.diagnostics.emit(
                    DiagnosticEntry::new(DiagnosticEventKind::StaleMeasurementDropped)
                        .with_identifier(region.identifier())
                        .with_ticket(ticket.id()),
                );
                None
            }
        }
    }

    /// Hover-leave: hide the panel and discard the placement.
    pub fn hover_leave(&mut self, region: &mut InspectedRegion) {
        if !region.hover.is_hovered() {
            return;
        }
        region.hover.leave();

        #[cfg(feature = "tracing")]
        tracing::debug!(identifier = region.identifier(), "hover left");

        self.diagnostics.emit(
            DiagnosticEntry::new(DiagnosticEventKind::HoverLeft)
                .with_identifier(region.identifier()),
        );
    }

    fn report_issues(&mut self, region: &InspectedRegion) {
        for issue in region.record.validate() {
            #[cfg(feature = "tracing")]
            tracing::debug!(identifier = region.identifier(), %issue, "tolerated annotation issue");

            self.diagnostics.emit(
                DiagnosticEntry::new(DiagnosticEventKind::AnnotationIssue)
                    .with_identifier(region.identifier())
                    .with_context(issue.to_string()),
            );
        }
    }

    // --- composition ---

    /// True when `region`'s hover began in the current enable-epoch.
    fn is_current(&self, region: &InspectedRegion) -> bool {
        region.hover.epoch() == self.enable_epoch
    }

    /// Resolve what the host draws for `region` right now.
    ///
    /// A hover started before the last enable/disable counts as not hovered,
    /// so a disable/enable cycle never revives an old panel placement.
    pub fn compose<'a>(&self, region: &'a InspectedRegion) -> RegionPaint<'a> {
        let hovered = region.hover.is_hovered() && self.is_current(region);
        let state = VisualState::resolve(self.mode.state(), hovered);
        let panel = state
            .shows_panel()
            .then(|| region.hover.placement())
            .flatten()
            .map(|placement| PanelPaint {
                placement,
                size: self.positioner.panel_size(),
                content: PanelContent::project(&region.record),
            });
        RegionPaint {
            state,
            outline: state.outline(),
            badge: state.shows_badge().then(|| region.identifier()),
            panel,
        }
    }

    /// End the session: remove the override block and hand the host back.
    pub fn teardown(mut self) -> H {
        let change = self
            .slot
            .sync(ModeState::new(false, self.mode.state().show_outlines_always), &mut self.host);
        if change != SlotChange::Unchanged {
            self.diagnostics.emit(
                DiagnosticEntry::new(DiagnosticEventKind::StyleBlockChanged)
                    .with_context(change.as_str()),
            );
        }
        self.host
    }
}
