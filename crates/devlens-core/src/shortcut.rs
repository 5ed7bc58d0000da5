#![forbid(unsafe_code)]

//! Key chord that toggles inspection mode.
//!
//! The default chord is `Ctrl+Shift+D`, with `Super` (Cmd) accepted in place
//! of `Ctrl`. A match is reported as [`ShortcutOutcome::Consumed`]; hosts
//! must then suppress their own handling of the event (the browser
//! `preventDefault` equivalent).

use crate::event::{KeyCode, KeyEvent, Modifiers};

/// Result of offering a key event to the shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutOutcome {
    /// The event matched; the host must not forward it.
    Consumed,
    /// Not ours; the host handles it normally.
    Ignored,
}

impl ShortcutOutcome {
    /// True when the host should suppress its default handling.
    #[inline]
    pub fn prevent_default(self) -> bool {
        self == Self::Consumed
    }
}

/// Modifier + modifier + key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleShortcut {
    key: char,
    /// All of these must be held.
    required: Modifiers,
    /// At least one of these must be held.
    any_of: Modifiers,
}

impl Default for ToggleShortcut {
    fn default() -> Self {
        Self {
            key: 'd',
            required: Modifiers::SHIFT,
            any_of: Modifiers::CTRL | Modifiers::SUPER,
        }
    }
}

impl ToggleShortcut {
    /// Create a chord. `key` is compared ASCII case-insensitively.
    #[must_use]
    pub const fn new(key: char, required: Modifiers, any_of: Modifiers) -> Self {
        Self {
            key,
            required,
            any_of,
        }
    }

    /// Check whether `event` triggers the chord.
    ///
    /// Only fresh presses match; auto-repeat and release are ignored so that a
    /// held chord does not flip the mode back and forth.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !event.is_press() {
            return false;
        }
        let KeyCode::Char(c) = event.code else {
            return false;
        };
        if !c.eq_ignore_ascii_case(&self.key) {
            return false;
        }
        if !event.modifiers.contains(self.required) {
            return false;
        }
        self.any_of.is_empty() || event.modifiers.intersects(self.any_of)
    }

    /// Human-readable label, e.g. `Ctrl+Shift+D`.
    #[must_use]
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.any_of.contains(Modifiers::CTRL) {
            parts.push("Ctrl".into());
        } else if self.any_of.contains(Modifiers::SUPER) {
            parts.push("Super".into());
        }
        for (flag, name) in [
            (Modifiers::CTRL, "Ctrl"),
            (Modifiers::ALT, "Alt"),
            (Modifiers::SHIFT, "Shift"),
            (Modifiers::SUPER, "Super"),
        ] {
            if self.required.contains(flag) && !parts.iter().any(|p| p == name) {
                parts.push(name.into());
            }
        }
        parts.push(self.key.to_ascii_uppercase().to_string());
        parts.join("+")
    }
}
