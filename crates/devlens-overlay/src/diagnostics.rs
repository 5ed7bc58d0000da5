#![forbid(unsafe_code)]

//! Session diagnostics and telemetry.
//!
//! Every observable overlay event can be captured as a [`DiagnosticEntry`]:
//! a monotonic sequence number, a timestamp, the event kind, a few optional
//! fields, and an FNV-1a checksum over the payload. Entries are kept in a
//! bounded [`DiagnosticLog`] and exported as JSONL. [`TelemetryHooks`] let a
//! host observe entries as they are emitted.
//!
//! In deterministic mode the timestamp is derived from the sequence number
//! (`seq * 1000`), so two runs of the same interaction produce identical
//! logs.

use std::collections::VecDeque;

use devlens_core::geometry::PanelPlacement;
use devlens_core::positioner::PanelSide;
use serde_json::{Map, Value};
use web_time::Instant;

/// Diagnostic event types for JSONL logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticEventKind {
    /// `enabled` flipped.
    InspectionToggled,
    /// `show_outlines_always` changed.
    OutlinesChanged,
    /// The toggle chord was consumed.
    ShortcutConsumed,
    /// Pointer entered a region.
    HoverEntered,
    /// Pointer left a region.
    HoverLeft,
    /// Panel placement computed.
    PanelPlaced,
    /// A measurement arrived for a superseded hover.
    StaleMeasurementDropped,
    /// Override style block inserted, replaced or removed.
    StyleBlockChanged,
    /// A record failed validation and was rendered anyway.
    AnnotationIssue,
}

impl DiagnosticEventKind {
    /// Get the JSONL event type string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InspectionToggled => "inspection_toggled",
            Self::OutlinesChanged => "outlines_changed",
            Self::ShortcutConsumed => "shortcut_consumed",
            Self::HoverEntered => "hover_entered",
            Self::HoverLeft => "hover_left",
            Self::PanelPlaced => "panel_placed",
            Self::StaleMeasurementDropped => "stale_measurement_dropped",
            Self::StyleBlockChanged => "style_block_changed",
            Self::AnnotationIssue => "annotation_issue",
        }
    }

    fn is_hover(self) -> bool {
        matches!(
            self,
            Self::HoverEntered | Self::HoverLeft | Self::PanelPlaced | Self::StaleMeasurementDropped
        )
    }
}

/// JSONL diagnostic log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEntry {
    /// Monotonic sequence number, assigned on emit.
    pub seq: u64,
    /// Microseconds since the sink was created, assigned on emit.
    pub timestamp_us: u64,
    pub kind: DiagnosticEventKind,
    /// Mode flag name (`enabled` / `show_outlines_always`).
    pub flag: Option<&'static str>,
    /// New flag value.
    pub value: Option<bool>,
    /// Region identifier.
    pub identifier: Option<String>,
    pub placement: Option<PanelPlacement>,
    pub side: Option<PanelSide>,
    /// Hover ticket id.
    pub ticket: Option<u64>,
    /// Free-form detail (style change, issue text).
    pub context: Option<String>,
    /// Checksum for determinism verification.
    pub checksum: u64,
}

impl DiagnosticEntry {
    /// Create an unstamped entry.
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            seq: 0,
            timestamp_us: 0,
            kind,
            flag: None,
            value: None,
            identifier: None,
            placement: None,
            side: None,
            ticket: None,
            context: None,
            checksum: 0,
        }
    }

    /// Set flag change details.
    #[must_use]
    pub fn with_flag(mut self, flag: &'static str, value: bool) -> Self {
        self.flag = Some(flag);
        self.value = Some(value);
        self
    }

    /// Set the region identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set placement and chosen side.
    #[must_use]
    pub fn with_placement(mut self, placement: PanelPlacement, side: PanelSide) -> Self {
        self.placement = Some(placement);
        self.side = Some(side);
        self
    }

    /// Set the hover ticket.
    #[must_use]
    pub fn with_ticket(mut self, ticket: u64) -> Self {
        self.ticket = Some(ticket);
        self
    }

    /// Set context string.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Compute and set checksum.
    #[must_use]
    pub fn with_checksum(mut self) -> Self {
        self.checksum = self.compute_checksum();
        self
    }

    /// FNV-1a over the payload. Sequence and timestamp are excluded.
    fn compute_checksum(&self) -> u64 {
        let mut hash: u64 = 0xcbf29ce484222325;
        let payload = format!(
            "{:?}{:?}{:?}{}{:?}{:?}{:?}{}",
            self.kind,
            self.flag,
            self.value,
            self.identifier.as_deref().unwrap_or(""),
            self.placement.map(|p| (p.top.to_bits(), p.left.to_bits())),
            self.side,
            self.ticket,
            self.context.as_deref().unwrap_or(""),
        );
        for &b in payload.as_bytes() {
            hash ^= b as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        hash
    }

    /// Format as a single JSON line.
    pub fn to_jsonl(&self) -> String {
        let mut obj = Map::new();
        obj.insert("seq".into(), self.seq.into());
        obj.insert("ts_us".into(), self.timestamp_us.into());
        obj.insert("kind".into(), self.kind.as_str().into());
        if let Some(flag) = self.flag {
            obj.insert("flag".into(), flag.into());
        }
        if let Some(value) = self.value {
            obj.insert("value".into(), value.into());
        }
        if let Some(ref id) = self.identifier {
            obj.insert("identifier".into(), id.as_str().into());
        }
        if let Some(p) = self.placement {
            obj.insert("top".into(), p.top.into());
            obj.insert("left".into(), p.left.into());
        }
        if let Some(side) = self.side {
            obj.insert("side".into(), side.as_str().into());
        }
        if let Some(ticket) = self.ticket {
            obj.insert("ticket".into(), ticket.into());
        }
        if let Some(ref ctx) = self.context {
            obj.insert("context".into(), ctx.as_str().into());
        }
        obj.insert(
            "checksum".into(),
            format!("{:016x}", self.checksum).into(),
        );
        Value::Object(obj).to_string()
    }
}

/// Bounded diagnostic log collector.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<DiagnosticEntry>,
    max_entries: usize,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticLog {
    /// Create a log holding up to 5000 entries.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: crate::config::DEFAULT_DIAGNOSTICS_MAX,
        }
    }

    /// Set maximum entries to keep (0 = unbounded).
    #[must_use]
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Record an entry, evicting the oldest when full.
    pub fn record(&mut self, entry: DiagnosticEntry) {
        if self.max_entries > 0 && self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get entries of a specific kind.
    pub fn entries_of_kind(&self, kind: DiagnosticEventKind) -> Vec<&DiagnosticEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }

    /// Clear all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Export all entries as JSONL.
    pub fn to_jsonl(&self) -> String {
        self.entries
            .iter()
            .map(DiagnosticEntry::to_jsonl)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Callback type for telemetry hooks.
pub type TelemetryCallback = Box<dyn Fn(&DiagnosticEntry) + Send + Sync>;

/// Telemetry hooks for observing overlay events.
#[derive(Default)]
pub struct TelemetryHooks {
    on_toggle: Option<TelemetryCallback>,
    on_hover: Option<TelemetryCallback>,
    on_style_change: Option<TelemetryCallback>,
    on_any_event: Option<TelemetryCallback>,
}

impl std::fmt::Debug for TelemetryHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryHooks")
            .field("on_toggle", &self.on_toggle.is_some())
            .field("on_hover", &self.on_hover.is_some())
            .field("on_style_change", &self.on_style_change.is_some())
            .field("on_any_event", &self.on_any_event.is_some())
            .finish()
    }
}

impl TelemetryHooks {
    /// Create new empty hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for inspection and outline toggles.
    #[must_use]
    pub fn on_toggle(mut self, f: impl Fn(&DiagnosticEntry) + Send + Sync + 'static) -> Self {
        self.on_toggle = Some(Box::new(f));
        self
    }

    /// Called for hover lifecycle and placement events.
    #[must_use]
    pub fn on_hover(mut self, f: impl Fn(&DiagnosticEntry) + Send + Sync + 'static) -> Self {
        self.on_hover = Some(Box::new(f));
        self
    }

    /// Called when the override style block changes.
    #[must_use]
    pub fn on_style_change(mut self, f: impl Fn(&DiagnosticEntry) + Send + Sync + 'static) -> Self {
        self.on_style_change = Some(Box::new(f));
        self
    }

    /// Catch-all callback.
    #[must_use]
    pub fn on_any(mut self, f: impl Fn(&DiagnosticEntry) + Send + Sync + 'static) -> Self {
        self.on_any_event = Some(Box::new(f));
        self
    }

    fn dispatch(&self, entry: &DiagnosticEntry) {
        if let Some(ref cb) = self.on_any_event {
            cb(entry);
        }

        let targeted = match entry.kind {
            DiagnosticEventKind::InspectionToggled | DiagnosticEventKind::OutlinesChanged => {
                self.on_toggle.as_ref()
            }
            DiagnosticEventKind::StyleBlockChanged => self.on_style_change.as_ref(),
            kind if kind.is_hover() => self.on_hover.as_ref(),
            _ => None,
        };
        if let Some(cb) = targeted {
            cb(entry);
        }
    }
}

/// Stamps entries and fans them out to the log and hooks.
#[derive(Debug)]
pub struct DiagnosticSink {
    log: Option<DiagnosticLog>,
    hooks: Option<TelemetryHooks>,
    next_seq: u64,
    start: Instant,
    deterministic: bool,
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl DiagnosticSink {
    pub fn new(log: Option<DiagnosticLog>, hooks: Option<TelemetryHooks>) -> Self {
        Self {
            log,
            hooks,
            next_seq: 0,
            start: Instant::now(),
            deterministic: false,
        }
    }

    /// Force deterministic timestamps.
    #[must_use]
    pub fn deterministic(mut self, on: bool) -> Self {
        self.deterministic = on;
        self
    }

    /// True when anything would observe an emitted entry.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.log.is_some() || self.hooks.is_some()
    }

    pub fn log(&self) -> Option<&DiagnosticLog> {
        self.log.as_ref()
    }

    pub fn log_mut(&mut self) -> Option<&mut DiagnosticLog> {
        self.log.as_mut()
    }

    pub fn set_hooks(&mut self, hooks: TelemetryHooks) {
        self.hooks = Some(hooks);
    }

    /// Stamp, checksum, dispatch and record an entry.
    pub fn emit(&mut self, entry: DiagnosticEntry) {
        if !self.is_active() {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        let timestamp_us = if self.deterministic {
            seq.saturating_mul(1_000)
        } else {
            self.start.elapsed().as_micros() as u64
        };
        let entry = DiagnosticEntry {
            seq,
            timestamp_us,
            ..entry
        }
        .with_checksum();

        if let Some(ref hooks) = self.hooks {
            hooks.dispatch(&entry);
        }
        if let Some(ref mut log) = self.log {
            log.record(entry);
        }
    }
}
