#![forbid(unsafe_code)]

//! devlens public facade crate.
//!
//! Re-exports the inspection-mode state, panel positioner and overlay
//! session from the internal crates, plus a prelude for day-to-day use.
//!
//! ```
//! use devlens::prelude::*;
//!
//! let mut session = OverlaySession::new(OverlayConfig::default(), InMemoryStyleHost::new());
//! let chord =
//!     KeyEvent::new(KeyCode::Char('d')).with_modifiers(Modifiers::CTRL | Modifiers::SHIFT);
//! assert_eq!(session.handle_key(&chord), ShortcutOutcome::Consumed);
//! assert!(session.state().enabled);
//! ```

// --- Core re-exports -------------------------------------------------------

pub use devlens_core::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use devlens_core::geometry::{AnchorRect, PanelPlacement, Size};
pub use devlens_core::mode::{ModeChange, ModeState, ModeStore, SubscriptionId};
pub use devlens_core::positioner::{
    DEFAULT_MARGIN, DEFAULT_PANEL_SIZE, PanelPositioner, PanelSide, PlacementTrace, place_panel,
};
pub use devlens_core::shortcut::{ShortcutOutcome, ToggleShortcut};

// --- Overlay re-exports ----------------------------------------------------

pub use devlens_overlay::annotation::{
    AnnotationIssue, AnnotationRecord, Attributes, DesignFacets, ReviewStatus, StatusTone,
};
pub use devlens_overlay::composer::{OverlaySession, PanelPaint, RegionPaint};
pub use devlens_overlay::config::{ConfigError, OverlayConfig};
pub use devlens_overlay::diagnostics::{DiagnosticEventKind, DiagnosticLog, TelemetryHooks};
pub use devlens_overlay::panel::{PanelContent, SectionKind};
pub use devlens_overlay::region::{HoverTicket, InspectedRegion, MeasureAnchor};
pub use devlens_overlay::stylesheet::{InMemoryStyleHost, OverrideStyles, StyleHost};
pub use devlens_overlay::visual::{OutlineStyle, VisualState};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AnchorRect, AnnotationRecord, InMemoryStyleHost, InspectedRegion, KeyCode, KeyEvent,
        ModeState, Modifiers, OverlayConfig, OverlaySession, ReviewStatus, ShortcutOutcome, Size,
        StyleHost, VisualState,
    };

    pub use crate::{core, overlay};
}

pub use devlens_core as core;
pub use devlens_overlay as overlay;
