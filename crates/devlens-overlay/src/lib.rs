#![forbid(unsafe_code)]

//! Annotation overlay engine: per-region metadata, visual state resolution,
//! detail-panel content, the override style block, and the session that
//! composes them.

pub mod annotation;
pub mod composer;
pub mod config;
pub mod diagnostics;
pub mod panel;
pub mod region;
pub mod stylesheet;
pub mod visual;

pub use annotation::{
    AnnotationIssue, AnnotationRecord, Attributes, DesignFacets, ReviewStatus, StatusTone,
};
pub use composer::{OverlaySession, PanelPaint, RegionPaint};
pub use config::{ConfigError, ConfigParse, OverlayConfig};
pub use diagnostics::{DiagnosticEntry, DiagnosticEventKind, DiagnosticLog, TelemetryHooks};
pub use panel::{PanelContent, PanelSection, SectionBody, SectionKind, StatusLine};
pub use region::{HoverTicket, InspectedRegion, MeasureAnchor, RegionHover};
pub use stylesheet::{InMemoryStyleHost, OverrideStyles, StyleBlockSlot, StyleHost};
pub use visual::{OutlineStyle, VisualState};
