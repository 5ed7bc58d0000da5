#![forbid(unsafe_code)]

//! Viewport-aware placement for the floating detail panel.
//!
//! # Algorithm
//!
//! 1. Prefer the right side of the anchor, top-aligned:
//!    `left = anchor.right + margin`, `top = anchor.top`.
//! 2. If the panel would overflow the right edge, flip to the left side:
//!    `left = anchor.left - panel.width - margin`.
//! 3. Clamp `left` to at least `margin`.
//! 4. If the panel would overflow the bottom edge, pull it up:
//!    `top = viewport.height - panel.height - margin`.
//! 5. Clamp `top` to at least `margin`.
//!
//! # Invariants
//!
//! 1. The result is a pure function of its inputs.
//! 2. `left >= margin` and `top >= margin` for every input.
//! 3. When the panel fits inside the viewport minus both margins, the panel
//!    lies entirely within `[margin, viewport - margin]` on both axes.
//!
//! # Failure Modes
//!
//! - Panel larger than the viewport: the panel is pinned at `margin` and
//!   overflows the far edge. No shrinking is attempted.
//! - Anchor in a far corner of a small viewport: the clamps may leave the
//!   panel overlapping the anchor. Accepted; no further repositioning.
//! - Unmeasurable anchor: callers pass [`AnchorRect::DEGENERATE`] and the
//!   panel lands near the top-left margin.

use crate::geometry::{AnchorRect, PanelPlacement, Size};

/// Default gap between anchor and panel, and minimum distance to the
/// viewport edge.
pub const DEFAULT_MARGIN: f64 = 8.0;

/// Default fixed panel dimensions.
pub const DEFAULT_PANEL_SIZE: Size = Size::new(320.0, 280.0);

/// Side of the anchor the panel ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelSide {
    /// Preferred placement to the right of the anchor.
    #[default]
    Right,
    /// Flipped to the left because the right side overflowed.
    Left,
}

impl PanelSide {
    /// Stable string representation for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
        }
    }
}

/// Record of which steps of the algorithm fired.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlacementTrace {
    /// Final placement.
    pub placement: PanelPlacement,
    /// Side chosen by the horizontal overflow check.
    pub side: PanelSide,
    /// `left` was raised to the margin.
    pub clamped_left: bool,
    /// `top` was pulled up because of bottom overflow.
    pub shifted_up: bool,
    /// `top` was raised to the margin.
    pub clamped_top: bool,
}

/// Compute the panel placement for an anchor.
///
/// This is the raw algorithm; see the module docs.
#[must_use]
pub fn place_panel(
    anchor: AnchorRect,
    viewport: Size,
    panel: Size,
    margin: f64,
) -> PanelPlacement {
    trace_placement(anchor, viewport, panel, margin).placement
}

/// Compute the panel placement and report which steps fired.
#[must_use]
pub fn trace_placement(
    anchor: AnchorRect,
    viewport: Size,
    panel: Size,
    margin: f64,
) -> PlacementTrace {
    let anchor = anchor.sanitized();
    let viewport = viewport.sanitized();
    let panel = panel.sanitized();
    let margin = if margin.is_finite() { margin } else { 0.0 };

    let mut trace = PlacementTrace::default();

    let mut left = anchor.right + margin;
    let mut top = anchor.top;

    if left + panel.width > viewport.width {
        left = anchor.left - panel.width - margin;
        trace.side = PanelSide::Left;
    }
    if left < margin {
        left = margin;
        trace.clamped_left = true;
    }

    if top + panel.height > viewport.height {
        top = viewport.height - panel.height - margin;
        trace.shifted_up = true;
    }
    if top < margin {
        top = margin;
        trace.clamped_top = true;
    }

    trace.placement = PanelPlacement::new(top, left);
    trace
}

/// Panel positioner bound to a fixed panel size and margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPositioner {
    panel: Size,
    margin: f64,
}

impl Default for PanelPositioner {
    fn default() -> Self {
        Self {
            panel: DEFAULT_PANEL_SIZE,
            margin: DEFAULT_MARGIN,
        }
    }
}

impl PanelPositioner {
    /// Create a positioner for the given panel size and margin.
    #[must_use]
    pub const fn new(panel: Size, margin: f64) -> Self {
        Self { panel, margin }
    }

    /// Set the panel size.
    #[must_use]
    pub fn with_panel_size(mut self, panel: Size) -> Self {
        self.panel = panel;
        self
    }

    /// Set the margin.
    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Configured panel size.
    #[inline]
    pub fn panel_size(&self) -> Size {
        self.panel
    }

    /// Configured margin.
    #[inline]
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Place the panel next to `anchor` inside `viewport`.
    #[must_use]
    pub fn place(&self, anchor: AnchorRect, viewport: Size) -> PanelPlacement {
        self.place_traced(anchor, viewport).placement
    }

    /// Place the panel and report which steps of the algorithm fired.
    #[must_use]
    pub fn place_traced(&self, anchor: AnchorRect, viewport: Size) -> PlacementTrace {
        let trace = trace_placement(anchor, viewport, self.panel, self.margin);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            anchor = ?anchor,
            viewport_w = viewport.width,
            viewport_h = viewport.height,
            side = trace.side.as_str(),
            top = trace.placement.top,
            left = trace.placement.left,
            "placed inspection panel"
        );

        trace
    }
}
