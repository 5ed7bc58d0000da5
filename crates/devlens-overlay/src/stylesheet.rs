#![forbid(unsafe_code)]

//! Global override style block emitted while inspection is on.
//!
//! The block carries two rules: the ambient outline rule, whose target is
//! derived from `show_outlines_always` (every region vs. the hovered region
//! only), and the hover highlight rule. Hosts install it through the
//! [`StyleHost`] seam; [`StyleBlockSlot`] makes install/remove idempotent.
//!
//! # Invariants
//!
//! 1. At most one block is installed at any time.
//! 2. A block is installed iff inspection is enabled.
//! 3. The block content depends only on `show_outlines_always`.

use std::fmt;

use devlens_core::mode::ModeState;

use crate::visual::OutlineStyle;

/// Attribute that marks inspectable regions in DOM-like hosts.
pub const REGION_ATTRIBUTE: &str = "data-dev-annotation";

/// Which regions the ambient outline rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlineTarget {
    /// Every annotated region.
    AllRegions,
    /// Only the region under the pointer.
    HoveredRegion,
}

impl OutlineTarget {
    /// Attribute selector for this target.
    #[must_use]
    pub fn selector(self, attribute: &str) -> String {
        match self {
            Self::AllRegions => format!("[{attribute}]"),
            Self::HoveredRegion => format!("[{attribute}]:hover"),
        }
    }
}

/// Content of the singleton override block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverrideStyles {
    pub ambient_target: OutlineTarget,
    pub ambient: OutlineStyle,
    pub highlight: OutlineStyle,
}

impl OverrideStyles {
    /// Block content for the given outline setting.
    #[must_use]
    pub fn for_outlines(show_outlines_always: bool) -> Self {
        Self {
            ambient_target: if show_outlines_always {
                OutlineTarget::AllRegions
            } else {
                OutlineTarget::HoveredRegion
            },
            ambient: OutlineStyle::AMBIENT,
            highlight: OutlineStyle::HIGHLIGHT,
        }
    }

    /// Render as CSS-like text against `attribute`.
    ///
    /// Only structure is emitted (selector, stroke kind and width); colors
    /// are left to the host's own stylesheet.
    #[must_use]
    pub fn to_css(&self, attribute: &str) -> String {
        format!(
            "{} {{ outline: {}px {} !important; outline-offset: 1px; }}\n\
             [{attribute}]:hover {{ outline: {}px {} !important; outline-offset: 1px; }}\n",
            self.ambient_target.selector(attribute),
            self.ambient.weight,
            self.ambient.line.as_str(),
            self.highlight.weight,
            self.highlight.line.as_str(),
        )
    }
}

impl fmt::Display for OverrideStyles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(REGION_ATTRIBUTE))
    }
}

/// Host seam for the override block.
pub trait StyleHost {
    /// Install the block. Called only when no block is installed.
    fn insert_block(&mut self, styles: &OverrideStyles);

    /// Replace the installed block's content.
    fn replace_block(&mut self, styles: &OverrideStyles) {
        self.remove_block();
        self.insert_block(styles);
    }

    /// Remove the installed block. Called only when one is installed.
    fn remove_block(&mut self);
}

/// Headless style host that keeps installed blocks in memory.
///
/// Suitable for terminal hosts (which read the rule, not CSS) and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStyleHost {
    blocks: Vec<OverrideStyles>,
    inserts: u64,
    removes: u64,
}

impl InMemoryStyleHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks currently installed.
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// The installed block, if exactly one exists.
    #[must_use]
    pub fn current(&self) -> Option<&OverrideStyles> {
        match self.blocks.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Total inserts observed.
    #[inline]
    pub fn insert_count(&self) -> u64 {
        self.inserts
    }

    /// Total removals observed.
    #[inline]
    pub fn remove_count(&self) -> u64 {
        self.removes
    }
}

impl StyleHost for InMemoryStyleHost {
    fn insert_block(&mut self, styles: &OverrideStyles) {
        self.inserts += 1;
        self.blocks.push(*styles);
    }

    fn replace_block(&mut self, styles: &OverrideStyles) {
        match self.blocks.last_mut() {
            Some(last) => *last = *styles,
            None => self.insert_block(styles),
        }
    }

    fn remove_block(&mut self) {
        if self.blocks.pop().is_some() {
            self.removes += 1;
        }
    }
}

/// What [`StyleBlockSlot::sync`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    Unchanged,
    Inserted,
    Replaced,
    Removed,
}

impl SlotChange {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Inserted => "inserted",
            Self::Replaced => "replaced",
            Self::Removed => "removed",
        }
    }
}

/// Tracks the installed block so the host sees zero or one at all times.
#[derive(Debug, Clone, Default)]
pub struct StyleBlockSlot {
    installed: Option<OverrideStyles>,
}

impl StyleBlockSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently installed block content.
    #[inline]
    pub fn installed(&self) -> Option<&OverrideStyles> {
        self.installed.as_ref()
    }

    /// Bring the host in line with `mode`. Safe to call any number of times.
    pub fn sync(&mut self, mode: ModeState, host: &mut dyn StyleHost) -> SlotChange {
        let desired = mode
            .enabled
            .then(|| OverrideStyles::for_outlines(mode.show_outlines_always));

        let change = match (self.installed, desired) {
            (None, None) => SlotChange::Unchanged,
            (Some(current), Some(next)) if current == next => SlotChange::Unchanged,
            (None, Some(next)) => {
                host.insert_block(&next);
                SlotChange::Inserted
            }
            (Some(_), Some(next)) => {
                host.replace_block(&next);
                SlotChange::Replaced
            }
            (Some(_), None) => {
                host.remove_block();
                SlotChange::Removed
            }
        };
        self.installed = desired;

        #[cfg(feature = "tracing")]
        if change != SlotChange::Unchanged {
            tracing::debug!(change = change.as_str(), "override style block synced");
        }

        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_follows_outline_setting() {
        assert_eq!(
            OverrideStyles::for_outlines(true).ambient_target,
            OutlineTarget::AllRegions
        );
        assert_eq!(
            OverrideStyles::for_outlines(false).ambient_target,
            OutlineTarget::HoveredRegion
        );
        assert_eq!(
            OutlineTarget::HoveredRegion.selector(REGION_ATTRIBUTE),
            "[data-dev-annotation]:hover"
        );
    }

    #[test]
    fn css_text_has_both_rules() {
        let css = OverrideStyles::for_outlines(true).to_string();
        assert_eq!(
            css,
            "[data-dev-annotation] { outline: 1px dashed !important; outline-offset: 1px; }\n\
             [data-dev-annotation]:hover { outline: 2px solid !important; outline-offset: 1px; }\n"
        );
    }

    #[test]
    fn slot_inserts_once_and_removes() {
        let mut slot = StyleBlockSlot::new();
        let mut host = InMemoryStyleHost::new();
        let on = ModeState::new(true, true);

        assert_eq!(slot.sync(on, &mut host), SlotChange::Inserted);
        assert_eq!(slot.sync(on, &mut host), SlotChange::Unchanged);
        assert_eq!(host.block_count(), 1);

        assert_eq!(slot.sync(ModeState::new(false, true), &mut host), SlotChange::Removed);
        assert_eq!(slot.sync(ModeState::new(false, true), &mut host), SlotChange::Unchanged);
        assert_eq!(host.block_count(), 0);
        assert!(slot.installed().is_none());
    }

    #[test]
    fn outline_change_replaces_in_place() {
        let mut slot = StyleBlockSlot::new();
        let mut host = InMemoryStyleHost::new();
        slot.sync(ModeState::new(true, true), &mut host);
        assert_eq!(
            slot.sync(ModeState::new(true, false), &mut host),
            SlotChange::Replaced
        );
        assert_eq!(host.block_count(), 1);
        assert_eq!(
            host.current().map(|b| b.ambient_target),
            Some(OutlineTarget::HoveredRegion)
        );
        assert_eq!(host.insert_count(), 1);
    }

    #[test]
    fn outline_change_while_disabled_touches_nothing() {
        let mut slot = StyleBlockSlot::new();
        let mut host = InMemoryStyleHost::new();
        assert_eq!(
            slot.sync(ModeState::new(false, false), &mut host),
            SlotChange::Unchanged
        );
        assert_eq!(host.insert_count(), 0);
    }

    struct NaiveHost {
        blocks: usize,
    }

    impl StyleHost for NaiveHost {
        fn insert_block(&mut self, _styles: &OverrideStyles) {
            self.blocks += 1;
        }

        fn remove_block(&mut self) {
            self.blocks -= 1;
        }
    }

    #[test]
    fn default_replace_keeps_single_block() {
        let mut slot = StyleBlockSlot::new();
        let mut host = NaiveHost { blocks: 0 };
        slot.sync(ModeState::new(true, true), &mut host);
        slot.sync(ModeState::new(true, false), &mut host);
        slot.sync(ModeState::new(true, true), &mut host);
        assert_eq!(host.blocks, 1);
        slot.sync(ModeState::new(false, true), &mut host);
        assert_eq!(host.blocks, 0);
    }
}
