#![forbid(unsafe_code)]

//! Core: inspection-mode state, panel geometry, and the toggle shortcut.

pub mod event;
pub mod geometry;
pub mod mode;
pub mod positioner;
pub mod shortcut;

pub use geometry::{AnchorRect, PanelPlacement, Size};
pub use mode::{ModeChange, ModeState, ModeStore, SubscriptionId};
pub use positioner::{PanelPositioner, PanelSide, PlacementTrace, place_panel, trace_placement};
