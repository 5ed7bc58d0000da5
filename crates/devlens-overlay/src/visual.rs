#![forbid(unsafe_code)]

//! Visual state resolution for a single region.
//!
//! | enabled | hovered | show_outlines_always | state         |
//! |---------|---------|----------------------|---------------|
//! | false   | any     | any                  | `Suppressed`  |
//! | true    | true    | any                  | `Highlighted` |
//! | true    | false   | true                 | `Outlined`    |
//! | true    | false   | false                | `Hidden`      |
//!
//! Hover always escalates: it implies at least the ambient outline for that
//! region, and the highlight style wins over the ambient style.

use devlens_core::mode::ModeState;

/// Stroke kind of an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Dashed,
    Solid,
}

impl LineKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashed => "dashed",
            Self::Solid => "solid",
        }
    }
}

/// Relative visual weight of an outline color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Emphasis {
    Low,
    High,
}

/// Outline stroke descriptor. Colors are the host's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutlineStyle {
    pub line: LineKind,
    /// Stroke width in pixels (or cells for terminal hosts).
    pub weight: u8,
    pub emphasis: Emphasis,
}

impl OutlineStyle {
    /// Low-emphasis dashed outline shown on every region.
    pub const AMBIENT: Self = Self {
        line: LineKind::Dashed,
        weight: 1,
        emphasis: Emphasis::Low,
    };

    /// High-emphasis solid outline shown on the hovered region.
    pub const HIGHLIGHT: Self = Self {
        line: LineKind::Solid,
        weight: 2,
        emphasis: Emphasis::High,
    };
}

/// Resolved presentation of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualState {
    /// Inspection is off: plain content only.
    Suppressed,
    /// Inspection is on but this region shows nothing (hover-only outlines,
    /// not hovered).
    Hidden,
    /// Ambient dashed outline plus identifier badge.
    Outlined,
    /// Solid outline, badge, and the detail panel.
    Highlighted,
}

impl VisualState {
    /// Resolve the state for a region.
    #[must_use]
    pub fn resolve(mode: ModeState, hovered: bool) -> Self {
        if !mode.enabled {
            Self::Suppressed
        } else if hovered {
            Self::Highlighted
        } else if mode.show_outlines_always {
            Self::Outlined
        } else {
            Self::Hidden
        }
    }

    /// Stable string representation for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suppressed => "suppressed",
            Self::Hidden => "hidden",
            Self::Outlined => "outlined",
            Self::Highlighted => "highlighted",
        }
    }

    /// Outline to draw, if any.
    #[inline]
    pub fn outline(self) -> Option<OutlineStyle> {
        match self {
            Self::Suppressed | Self::Hidden => None,
            Self::Outlined => Some(OutlineStyle::AMBIENT),
            Self::Highlighted => Some(OutlineStyle::HIGHLIGHT),
        }
    }

    /// True for Outlined or better.
    #[inline]
    pub fn shows_badge(self) -> bool {
        matches!(self, Self::Outlined | Self::Highlighted)
    }

    /// True only for the hovered, highlighted region.
    #[inline]
    pub fn shows_panel(self) -> bool {
        self == Self::Highlighted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn disabled_suppresses_everything() {
        for hovered in [false, true] {
            for always in [false, true] {
                let state = VisualState::resolve(ModeState::new(false, always), hovered);
                assert_eq!(state, VisualState::Suppressed);
                assert_eq!(state.outline(), None);
                assert!(!state.shows_badge());
                assert!(!state.shows_panel());
            }
        }
    }

    #[test]
    fn hover_highlights_regardless_of_outline_setting() {
        for always in [false, true] {
            let state = VisualState::resolve(ModeState::new(true, always), true);
            assert_eq!(state, VisualState::Highlighted);
            assert_eq!(state.outline(), Some(OutlineStyle::HIGHLIGHT));
            assert!(state.shows_badge());
            assert!(state.shows_panel());
        }
    }

    #[test]
    fn ambient_outline_when_always_on() {
        let state = VisualState::resolve(ModeState::new(true, true), false);
        assert_eq!(state, VisualState::Outlined);
        assert_eq!(state.outline(), Some(OutlineStyle::AMBIENT));
        assert!(state.shows_badge());
        assert!(!state.shows_panel());
    }

    #[test]
    fn hover_only_mode_hides_idle_regions() {
        let state = VisualState::resolve(ModeState::new(true, false), false);
        assert_eq!(state, VisualState::Hidden);
        assert!(!state.shows_badge());
    }

    #[test]
    fn highlight_outranks_ambient() {
        assert!(OutlineStyle::HIGHLIGHT.weight > OutlineStyle::AMBIENT.weight);
        assert!(OutlineStyle::HIGHLIGHT.emphasis > OutlineStyle::AMBIENT.emphasis);
        assert_eq!(OutlineStyle::AMBIENT.line.as_str(), "dashed");
        assert_eq!(OutlineStyle::HIGHLIGHT.line.as_str(), "solid");
    }

    proptest! {
        #[test]
        fn panel_implies_badge(enabled: bool, always: bool, hovered: bool) {
            let state = VisualState::resolve(ModeState::new(enabled, always), hovered);
            if state.shows_panel() {
                prop_assert!(state.shows_badge());
                prop_assert!(hovered && enabled);
            }
            prop_assert_eq!(state.outline().is_some(), state.shows_badge());
        }
    }
}
