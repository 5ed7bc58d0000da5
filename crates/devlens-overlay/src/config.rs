#![forbid(unsafe_code)]

//! Overlay session configuration.
//!
//! Defaults match the stock overlay: a 320×280 panel, 8px margin, inspection
//! off, ambient outlines on. Environment variables override the defaults at
//! session start; nothing is written back.
//!
//! | variable                  | field                         |
//! |---------------------------|-------------------------------|
//! | `DEVLENS_PANEL_WIDTH`     | `panel_size.width`            |
//! | `DEVLENS_PANEL_HEIGHT`    | `panel_size.height`           |
//! | `DEVLENS_PANEL_MARGIN`    | `margin`                      |
//! | `DEVLENS_ENABLED`         | `initial_mode.enabled`        |
//! | `DEVLENS_SHOW_OUTLINES`   | `initial_mode.show_outlines_always` |
//! | `DEVLENS_DIAGNOSTICS`     | `diagnostics`                 |
//! | `DEVLENS_DIAGNOSTICS_MAX` | `diagnostics_max_entries`     |
//! | `DEVLENS_DIAGNOSTICS_DETERMINISTIC` | `diagnostics_deterministic` |

use std::env;
use std::fmt;

use devlens_core::geometry::Size;
use devlens_core::mode::ModeState;
use devlens_core::positioner::{DEFAULT_MARGIN, DEFAULT_PANEL_SIZE, PanelPositioner};
use devlens_core::shortcut::ToggleShortcut;

const ENV_PANEL_WIDTH: &str = "DEVLENS_PANEL_WIDTH";
const ENV_PANEL_HEIGHT: &str = "DEVLENS_PANEL_HEIGHT";
const ENV_PANEL_MARGIN: &str = "DEVLENS_PANEL_MARGIN";
const ENV_ENABLED: &str = "DEVLENS_ENABLED";
const ENV_SHOW_OUTLINES: &str = "DEVLENS_SHOW_OUTLINES";
const ENV_DIAGNOSTICS: &str = "DEVLENS_DIAGNOSTICS";
const ENV_DIAGNOSTICS_MAX: &str = "DEVLENS_DIAGNOSTICS_MAX";
const ENV_DIAGNOSTICS_DETERMINISTIC: &str = "DEVLENS_DIAGNOSTICS_DETERMINISTIC";

/// Default diagnostic log capacity.
pub const DEFAULT_DIAGNOSTICS_MAX: usize = 5000;

/// Overlay session configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Fixed panel dimensions used for placement.
    pub panel_size: Size,
    /// Gap to the anchor and minimum distance to the viewport edge.
    pub margin: f64,
    /// Mode at session start.
    pub initial_mode: ModeState,
    /// Chord that toggles inspection.
    pub shortcut: ToggleShortcut,
    /// Record a diagnostic log.
    pub diagnostics: bool,
    /// Diagnostic log capacity (0 = unbounded).
    pub diagnostics_max_entries: usize,
    /// Derive diagnostic timestamps from the sequence number.
    pub diagnostics_deterministic: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            panel_size: DEFAULT_PANEL_SIZE,
            margin: DEFAULT_MARGIN,
            initial_mode: ModeState::default(),
            shortcut: ToggleShortcut::default(),
            diagnostics: false,
            diagnostics_max_entries: DEFAULT_DIAGNOSTICS_MAX,
            diagnostics_deterministic: false,
        }
    }
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Parsed configuration plus every rejected value.
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: OverlayConfig,
    pub errors: Vec<ConfigError>,
}

impl OverlayConfig {
    /// Parse config from environment variables, ignoring bad values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Set the panel size.
    #[must_use]
    pub fn panel_size(mut self, size: Size) -> Self {
        self.panel_size = size;
        self
    }

    /// Set the margin.
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Set the initial mode.
    #[must_use]
    pub fn initial_mode(mut self, mode: ModeState) -> Self {
        self.initial_mode = mode;
        self
    }

    /// Set the toggle chord.
    #[must_use]
    pub fn shortcut(mut self, shortcut: ToggleShortcut) -> Self {
        self.shortcut = shortcut;
        self
    }

    /// Enable or disable the diagnostic log.
    #[must_use]
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Set the diagnostic log capacity.
    #[must_use]
    pub fn diagnostics_max_entries(mut self, max: usize) -> Self {
        self.diagnostics_max_entries = max;
        self
    }

    /// Use sequence-derived diagnostic timestamps.
    #[must_use]
    pub fn diagnostics_deterministic(mut self, on: bool) -> Self {
        self.diagnostics_deterministic = on;
        self
    }

    /// Positioner for the configured panel size and margin.
    #[must_use]
    pub fn positioner(&self) -> PanelPositioner {
        PanelPositioner::new(self.panel_size, self.margin)
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        validate_positive("panel_width", self.panel_size.width, &mut errors);
        validate_positive("panel_height", self.panel_size.height, &mut errors);
        if !self.margin.is_finite() || self.margin < 0.0 {
            errors.push(ConfigError::new(
                "margin",
                self.margin.to_string(),
                "must be a finite, non-negative number",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn validate_positive(field: &'static str, value: f64, errors: &mut Vec<ConfigError>) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(ConfigError::new(
            field,
            value.to_string(),
            "must be a finite, positive number",
        ));
    }
}

fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = OverlayConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_PANEL_WIDTH) {
        match parse_positive(&value) {
            Some(parsed) => config.panel_size.width = parsed,
            None => errors.push(ConfigError::new(
                "panel_width",
                value,
                "expected positive number",
            )),
        }
    }

    if let Some(value) = get(ENV_PANEL_HEIGHT) {
        match parse_positive(&value) {
            Some(parsed) => config.panel_size.height = parsed,
            None => errors.push(ConfigError::new(
                "panel_height",
                value,
                "expected positive number",
            )),
        }
    }

    if let Some(value) = get(ENV_PANEL_MARGIN) {
        match value.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => config.margin = parsed,
            _ => errors.push(ConfigError::new(
                "margin",
                value,
                "expected non-negative number",
            )),
        }
    }

    if let Some(value) = get(ENV_ENABLED) {
        match parse_bool(&value) {
            Some(parsed) => config.initial_mode.enabled = parsed,
            None => errors.push(ConfigError::new(
                "enabled",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_SHOW_OUTLINES) {
        match parse_bool(&value) {
            Some(parsed) => config.initial_mode.show_outlines_always = parsed,
            None => errors.push(ConfigError::new(
                "show_outlines_always",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_DIAGNOSTICS) {
        match parse_bool(&value) {
            Some(parsed) => config.diagnostics = parsed,
            None => errors.push(ConfigError::new(
                "diagnostics",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_DIAGNOSTICS_MAX) {
        match value.trim().parse::<usize>() {
            Ok(parsed) => config.diagnostics_max_entries = parsed,
            Err(_) => errors.push(ConfigError::new(
                "diagnostics_max_entries",
                value,
                "expected non-negative integer",
            )),
        }
    }

    if let Some(value) = get(ENV_DIAGNOSTICS_DETERMINISTIC) {
        match parse_bool(&value) {
            Some(parsed) => config.diagnostics_deterministic = parsed,
            None => errors.push(ConfigError::new(
                "diagnostics_deterministic",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    ConfigParse { config, errors }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_positive(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
