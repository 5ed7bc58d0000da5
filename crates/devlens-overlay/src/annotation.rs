#![forbid(unsafe_code)]

//! Per-region design metadata.
//!
//! An [`AnnotationRecord`] is supplied by whoever wraps a region for
//! inspection. The engine only reads it.
//!
//! # Invariants
//!
//! 1. Attributes keep declaration order; re-declaring a key replaces the
//!    value in place.
//! 2. A region without a review status renders no status indicator. A status
//!    note without a status is tolerated and ignored (see
//!    [`AnnotationRecord::validate`]).
//!
//! # Example
//!
//! ```
//! use devlens_overlay::annotation::{AnnotationRecord, ReviewStatus};
//!
//! let record = AnnotationRecord::new("PrimaryButton")
//!     .attribute("variant", "solid")
//!     .spacing("px-4 py-2")
//!     .contains(["Icon", "Label"])
//!     .status(ReviewStatus::Warning)
//!     .status_note("contrast 4.2:1");
//! assert!(record.validate().is_empty());
//! ```

use std::fmt;

/// Outcome of a design review for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReviewStatus {
    Pass,
    Warning,
    Violation,
}

impl ReviewStatus {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warning => "warning",
            Self::Violation => "violation",
        }
    }

    /// Glyph shown before the status text.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Pass => "✅",
            Self::Warning => "⚠️",
            Self::Violation => "❌",
        }
    }

    /// Severity tone the host colors the status with.
    pub const fn tone(self) -> StatusTone {
        match self {
            Self::Pass => StatusTone::Positive,
            Self::Warning => StatusTone::Caution,
            Self::Violation => StatusTone::Critical,
        }
    }

    /// Parse a status name (case-insensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pass" => Some(Self::Pass),
            "warning" => Some(Self::Warning),
            "violation" => Some(Self::Violation),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a review status. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusTone {
    Positive,
    Caution,
    Critical,
}

impl StatusTone {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Caution => "caution",
            Self::Critical => "critical",
        }
    }
}

/// Key/value attributes in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Returns the previous value, if any.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no attributes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

#[cfg(feature = "serde")]
mod attributes_serde {
    use super::Attributes;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::fmt;

    impl Serialize for Attributes {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (k, v) in self.iter() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }

    struct AttributesVisitor;

    impl<'de> Visitor<'de> for AttributesVisitor {
        type Value = Attributes;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of string attributes")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Attributes, A::Error> {
            let mut attrs = Attributes::new();
            while let Some((k, v)) = access.next_entry::<String, String>()? {
                attrs.insert(k, v);
            }
            Ok(attrs)
        }
    }

    impl<'de> Deserialize<'de> for Attributes {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(AttributesVisitor)
        }
    }
}

/// Free-text design notes, one per facet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DesignFacets {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub spacing: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub colors: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub typography: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub icons: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub responsive: Option<String>,
}

impl DesignFacets {
    /// True when no facet is set.
    pub fn is_empty(&self) -> bool {
        self.spacing.is_none()
            && self.colors.is_none()
            && self.typography.is_none()
            && self.icons.is_none()
            && self.responsive.is_none()
    }
}

/// Design metadata attached to one inspected region.
///
/// With the `serde` feature, documents may use either the nested
/// `designFacets` object or flat `spacing`/`colors`/`typography`/`icons`/
/// `responsive` keys; a nested value wins over a flat one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AnnotationRecord {
    /// Badge text and panel title.
    pub identifier: String,
    /// Declared props, rendered first in the panel.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Attributes::is_empty"))]
    pub attributes: Attributes,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "DesignFacets::is_empty"))]
    pub design_facets: DesignFacets,
    /// Nested component identifiers, in composition order.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub contained_identifiers: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub notes: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub review_status: Option<ReviewStatus>,
    /// Decoration for `review_status`; never shown on its own.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub status_note: Option<String>,
}

#[cfg(feature = "serde")]
mod record_serde {
    use super::{AnnotationRecord, Attributes, DesignFacets, ReviewStatus};
    use serde::{Deserialize, Deserializer};

    /// Accepted input shape: camelCase keys, short aliases, and facets
    /// either nested or flat.
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RecordDocument {
        #[serde(alias = "component")]
        identifier: String,
        #[serde(default, alias = "props")]
        attributes: Attributes,
        #[serde(default)]
        design_facets: Option<DesignFacets>,
        #[serde(default)]
        spacing: Option<String>,
        #[serde(default)]
        colors: Option<String>,
        #[serde(default)]
        typography: Option<String>,
        #[serde(default)]
        icons: Option<String>,
        #[serde(default)]
        responsive: Option<String>,
        #[serde(default, alias = "contains")]
        contained_identifiers: Vec<String>,
        #[serde(default)]
        notes: Option<String>,
        #[serde(default, alias = "status")]
        review_status: Option<ReviewStatus>,
        #[serde(default)]
        status_note: Option<String>,
    }

    impl From<RecordDocument> for AnnotationRecord {
        fn from(doc: RecordDocument) -> Self {
            let nested = doc.design_facets.unwrap_or_default();
            Self {
                identifier: doc.identifier,
                attributes: doc.attributes,
                design_facets: DesignFacets {
                    spacing: nested.spacing.or(doc.spacing),
                    colors: nested.colors.or(doc.colors),
                    typography: nested.typography.or(doc.typography),
                    icons: nested.icons.or(doc.icons),
                    responsive: nested.responsive.or(doc.responsive),
                },
                contained_identifiers: doc.contained_identifiers,
                notes: doc.notes,
                review_status: doc.review_status,
                status_note: doc.status_note,
            }
        }
    }

    impl<'de> Deserialize<'de> for AnnotationRecord {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            RecordDocument::deserialize(deserializer).map(Self::from)
        }
    }
}

impl AnnotationRecord {
    /// Create a record with only an identifier.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Add or replace an attribute.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Set the spacing facet.
    #[must_use]
    pub fn spacing(mut self, text: impl Into<String>) -> Self {
        self.design_facets.spacing = Some(text.into());
        self
    }

    /// Set the colors facet.
    #[must_use]
    pub fn colors(mut self, text: impl Into<String>) -> Self {
        self.design_facets.colors = Some(text.into());
        self
    }

    /// Set the typography facet.
    #[must_use]
    pub fn typography(mut self, text: impl Into<String>) -> Self {
        self.design_facets.typography = Some(text.into());
        self
    }

    /// Set the icons facet.
    #[must_use]
    pub fn icons(mut self, text: impl Into<String>) -> Self {
        self.design_facets.icons = Some(text.into());
        self
    }

    /// Set the responsive facet.
    #[must_use]
    pub fn responsive(mut self, text: impl Into<String>) -> Self {
        self.design_facets.responsive = Some(text.into());
        self
    }

    /// Append nested component identifiers.
    #[must_use]
    pub fn contains<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contained_identifiers
            .extend(identifiers.into_iter().map(Into::into));
        self
    }

    /// Set free-form notes.
    #[must_use]
    pub fn notes(mut self, text: impl Into<String>) -> Self {
        self.notes = Some(text.into());
        self
    }

    /// Set the review status.
    #[must_use]
    pub fn status(mut self, status: ReviewStatus) -> Self {
        self.review_status = Some(status);
        self
    }

    /// Set the note shown next to the review status.
    #[must_use]
    pub fn status_note(mut self, text: impl Into<String>) -> Self {
        self.status_note = Some(text.into());
        self
    }

    /// Report malformed metadata. Never fails; callers log and carry on.
    #[must_use]
    pub fn validate(&self) -> Vec<AnnotationIssue> {
        let mut issues = Vec::new();
        if self.identifier.trim().is_empty() {
            issues.push(AnnotationIssue::EmptyIdentifier);
        }
        if self.review_status.is_none() && self.status_note.is_some() {
            issues.push(AnnotationIssue::OrphanStatusNote {
                identifier: self.identifier.clone(),
            });
        }
        issues
    }
}

/// Tolerated problem in an [`AnnotationRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationIssue {
    /// The identifier is empty or whitespace.
    EmptyIdentifier,
    /// `status_note` is set but `review_status` is not; the note is dropped.
    OrphanStatusNote { identifier: String },
}

impl fmt::Display for AnnotationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "annotation identifier is empty"),
            Self::OrphanStatusNote { identifier } => {
                write!(f, "{identifier}: status note without a review status is ignored")
            }
        }
    }
}

impl std::error::Error for AnnotationIssue {}
