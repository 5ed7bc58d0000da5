#![forbid(unsafe_code)]

//! Hover lifecycle of one inspected region.
//!
//! Geometry is captured as an explicit request/response pair: hover-enter
//! issues a [`HoverTicket`], the host measures the anchor, and the
//! measurement is resolved against the ticket. A leave (or a newer enter)
//! invalidates outstanding tickets, so a late measurement is dropped instead
//! of showing a panel for a region the pointer already left.
//!
//! # Invariants
//!
//! 1. The panel placement exists only while the region is hovered.
//! 2. Placement is recomputed on every hover-enter; nothing is cached
//!    across hovers.
//! 3. Regions share no mutable state with each other.

use devlens_core::geometry::{AnchorRect, PanelPlacement, Size};
use devlens_core::positioner::{PanelPositioner, PlacementTrace};

use crate::annotation::AnnotationRecord;

/// Source of live anchor geometry.
///
/// `None` means the anchor cannot be measured (not mounted yet, detached);
/// the positioner then receives [`AnchorRect::DEGENERATE`].
pub trait MeasureAnchor {
    fn measure(&self) -> Option<AnchorRect>;
}

impl MeasureAnchor for AnchorRect {
    fn measure(&self) -> Option<AnchorRect> {
        Some(*self)
    }
}

impl MeasureAnchor for Option<AnchorRect> {
    fn measure(&self) -> Option<AnchorRect> {
        *self
    }
}

impl<F> MeasureAnchor for F
where
    F: Fn() -> Option<AnchorRect>,
{
    fn measure(&self) -> Option<AnchorRect> {
        self()
    }
}

/// Token tying a measurement to the hover-enter that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoverTicket(u64);

impl HoverTicket {
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Per-region hover state.
#[derive(Debug, Clone, Default)]
pub struct RegionHover {
    hovered: bool,
    pending: Option<HoverTicket>,
    placement: Option<PanelPlacement>,
    last_trace: Option<PlacementTrace>,
    issued: u64,
    epoch: u64,
}

impl RegionHover {
    /// Create an idle hover state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True between hover-enter and hover-leave.
    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// True while a measurement is outstanding.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolved panel placement for the current hover.
    #[inline]
    pub fn placement(&self) -> Option<PanelPlacement> {
        self.placement
    }

    /// Positioner trace for the current hover.
    #[inline]
    pub fn last_trace(&self) -> Option<&PlacementTrace> {
        self.last_trace.as_ref()
    }

    /// Session enable-epoch the current hover was started in.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn set_epoch(&mut self, epoch: u64) {
        self.epoch = epoch;
    }

    /// Start a hover and request a measurement.
    ///
    /// Any earlier outstanding ticket becomes stale.
    pub fn begin_hover(&mut self) -> HoverTicket {
        self.issued += 1;
        let ticket = HoverTicket(self.issued);
        self.hovered = true;
        self.pending = Some(ticket);
        self.placement = None;
        self.last_trace = None;
        ticket
    }

    /// Resolve a measurement. Returns `None` (and changes nothing) when the
    /// ticket is stale.
    pub fn resolve(
        &mut self,
        ticket: HoverTicket,
        measured: Option<AnchorRect>,
        positioner: &PanelPositioner,
        viewport: Size,
    ) -> Option<PlacementTrace> {
        if self.pending != Some(ticket) {
            #[cfg(feature = "tracing")]
            tracing::trace!(ticket = ticket.id(), "dropped stale anchor measurement");
            return None;
        }
        let anchor = measured.unwrap_or(AnchorRect::DEGENERATE);
        let trace = positioner.place_traced(anchor, viewport);
        self.pending = None;
        self.placement = Some(trace.placement);
        self.last_trace = Some(trace);
        Some(trace)
    }

    /// Hover-enter with a synchronous measurement.
    pub fn enter(
        &mut self,
        anchor: &dyn MeasureAnchor,
        positioner: &PanelPositioner,
        viewport: Size,
    ) -> PlacementTrace {
        let ticket = self.begin_hover();
        let measured = anchor.measure();
        let anchor = measured.unwrap_or(AnchorRect::DEGENERATE);
        self.resolve(ticket, measured, positioner, viewport)
            .unwrap_or_else(|| positioner.place_traced(anchor, viewport))
    }

    /// End the hover: hide the panel, drop the placement and any pending
    /// measurement.
    pub fn leave(&mut self) {
        self.hovered = false;
        self.pending = None;
        self.placement = None;
        self.last_trace = None;
    }
}

/// An annotated region as held by the host: its metadata plus hover state.
#[derive(Debug, Clone)]
pub struct InspectedRegion {
    pub record: AnnotationRecord,
    pub hover: RegionHover,
}

impl InspectedRegion {
    /// Wrap a record with idle hover state.
    #[must_use]
    pub fn new(record: AnnotationRecord) -> Self {
        Self {
            record,
            hover: RegionHover::new(),
        }
    }

    /// Badge text.
    #[inline]
    pub fn identifier(&self) -> &str {
        &self.record.identifier
    }
}

impl From<AnnotationRecord> for InspectedRegion {
    fn from(record: AnnotationRecord) -> Self {
        Self::new(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(1280.0, 800.0);

    fn positioner() -> PanelPositioner {
        PanelPositioner::default()
    }

    #[test]
    fn enter_places_and_leave_clears() {
        let mut hover = RegionHover::new();
        let anchor = AnchorRect::new(100.0, 50.0, 150.0, 140.0);
        let trace = hover.enter(&anchor, &positioner(), VIEWPORT);
        assert!(hover.is_hovered());
        assert!(!hover.is_pending());
        assert_eq!(hover.placement(), Some(PanelPlacement::new(100.0, 158.0)));
        assert_eq!(trace.placement, PanelPlacement::new(100.0, 158.0));

        hover.leave();
        assert!(!hover.is_hovered());
        assert_eq!(hover.placement(), None);
        assert!(hover.last_trace().is_none());
    }

    #[test]
    fn unmeasurable_anchor_pins_top_left() {
        let mut hover = RegionHover::new();
        let missing: Option<AnchorRect> = None;
        hover.enter(&missing, &positioner(), VIEWPORT);
        assert_eq!(hover.placement(), Some(PanelPlacement::new(8.0, 8.0)));
    }

    #[test]
    fn closure_measurement() {
        let mut hover = RegionHover::new();
        let measure = || Some(AnchorRect::new(750.0, 50.0, 150.0, 790.0));
        hover.enter(&measure, &positioner(), VIEWPORT);
        assert_eq!(hover.placement().map(|p| p.top), Some(512.0));
    }

    #[test]
    fn late_measurement_after_leave_is_dropped() {
        let mut hover = RegionHover::new();
        let ticket = hover.begin_hover();
        assert!(hover.is_pending());
        assert_eq!(hover.placement(), None);

        hover.leave();
        let resolved = hover.resolve(
            ticket,
            Some(AnchorRect::new(10.0, 10.0, 20.0, 20.0)),
            &positioner(),
            VIEWPORT,
        );
        assert!(resolved.is_none());
        assert_eq!(hover.placement(), None);
    }

    #[test]
    fn superseded_ticket_is_dropped() {
        let mut hover = RegionHover::new();
        let first = hover.begin_hover();
        let second = hover.begin_hover();
        assert_ne!(first, second);

        let anchor = Some(AnchorRect::new(10.0, 10.0, 20.0, 20.0));
        assert!(hover.resolve(first, anchor, &positioner(), VIEWPORT).is_none());
        assert!(hover.resolve(second, anchor, &positioner(), VIEWPORT).is_some());
        assert_eq!(hover.placement(), Some(PanelPlacement::new(10.0, 28.0)));
    }

    #[test]
    fn each_enter_recomputes() {
        let mut hover = RegionHover::new();
        hover.enter(&AnchorRect::new(10.0, 10.0, 20.0, 20.0), &positioner(), VIEWPORT);
        let first = hover.placement();
        hover.leave();
        hover.enter(&AnchorRect::new(300.0, 10.0, 20.0, 320.0), &positioner(), VIEWPORT);
        assert_ne!(hover.placement(), first);
    }

    #[test]
    fn region_wraps_record() {
        let region = InspectedRegion::from(AnnotationRecord::new("Sidebar"));
        assert_eq!(region.identifier(), "Sidebar");
        assert!(!region.hover.is_hovered());
    }
}
