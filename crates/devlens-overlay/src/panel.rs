#![forbid(unsafe_code)]

//! Projection of an [`AnnotationRecord`] into detail-panel content.
//!
//! Section order is fixed: `Props` first (when any attribute exists), then
//! Spacing, Colors, Typography, Icons, Responsive, Contains, Notes. Absent
//! and blank fields produce no section.

use crate::annotation::{AnnotationRecord, ReviewStatus, StatusTone};

/// Separator used when joining contained identifiers.
pub const CONTAINS_SEPARATOR: &str = ", ";

/// Kind of a panel section, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Props,
    Spacing,
    Colors,
    Typography,
    Icons,
    Responsive,
    Contains,
    Notes,
}

impl SectionKind {
    /// Section heading.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Props => "Props",
            Self::Spacing => "Spacing",
            Self::Colors => "Colors",
            Self::Typography => "Typography",
            Self::Icons => "Icons",
            Self::Responsive => "Responsive",
            Self::Contains => "Contains",
            Self::Notes => "Notes",
        }
    }
}

/// Body of a panel section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    /// `key="value"` rows, in declaration order.
    Pairs(Vec<(String, String)>),
    /// Single block of text.
    Text(String),
}

/// One labelled section of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSection {
    pub kind: SectionKind,
    pub body: SectionBody,
}

impl PanelSection {
    /// Section heading.
    #[inline]
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Review status shown in the panel header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub status: ReviewStatus,
    /// Severity tone for coloring the line.
    pub tone: StatusTone,
    /// The status note when present and non-blank, otherwise the status name.
    pub text: String,
}

impl StatusLine {
    /// Build the status line for a record. `None` when no status is set.
    #[must_use]
    pub fn for_record(record: &AnnotationRecord) -> Option<Self> {
        let status = record.review_status?;
        let text = non_blank(record.status_note.as_deref())
            .map(str::to_owned)
            .unwrap_or_else(|| status.as_str().to_owned());
        Some(Self {
            status,
            tone: status.tone(),
            text,
        })
    }

    /// `symbol text`, e.g. `⚠️ contrast 4.2:1`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {}", self.status.symbol(), self.text)
    }
}

/// Everything the detail panel shows for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelContent {
    pub title: String,
    pub status: Option<StatusLine>,
    pub sections: Vec<PanelSection>,
}

impl PanelContent {
    /// Project a record into ordered panel content.
    #[must_use]
    pub fn project(record: &AnnotationRecord) -> Self {
        let mut sections = Vec::new();

        if !record.attributes.is_empty() {
            let pairs = record
                .attributes
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
            sections.push(PanelSection {
                kind: SectionKind::Props,
                body: SectionBody::Pairs(pairs),
            });
        }

        let facets = &record.design_facets;
        let text_fields = [
            (SectionKind::Spacing, facets.spacing.as_deref()),
            (SectionKind::Colors, facets.colors.as_deref()),
            (SectionKind::Typography, facets.typography.as_deref()),
            (SectionKind::Icons, facets.icons.as_deref()),
            (SectionKind::Responsive, facets.responsive.as_deref()),
        ];
        for (kind, value) in text_fields {
            push_text(&mut sections, kind, value);
        }

        let contains = record
            .contained_identifiers
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(CONTAINS_SEPARATOR);
        push_text(&mut sections, SectionKind::Contains, Some(contains.as_str()));
        push_text(&mut sections, SectionKind::Notes, record.notes.as_deref());

        Self {
            title: record.identifier.clone(),
            status: StatusLine::for_record(record),
            sections,
        }
    }

    /// Find a section by kind.
    #[must_use]
    pub fn section(&self, kind: SectionKind) -> Option<&PanelSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Plain-text rendering, one entry per line.
    ///
    /// Layout: title (with status after two spaces), then per section an
    /// upper-case heading followed by its rows.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(1 + self.sections.len() * 2);
        match &self.status {
            Some(status) => lines.push(format!("{}  {}", self.title, status.display())),
            None => lines.push(self.title.clone()),
        }
        for section in &self.sections {
            lines.push(section.label().to_ascii_uppercase());
            match &section.body {
                SectionBody::Pairs(pairs) => {
                    lines.extend(pairs.iter().map(|(k, v)| format!("{k}=\"{v}\"")));
                }
                SectionBody::Text(text) => lines.push(text.clone()),
            }
        }
        lines
    }
}

fn push_text(sections: &mut Vec<PanelSection>, kind: SectionKind, value: Option<&str>) {
    if let Some(text) = non_blank(value) {
        sections.push(PanelSection {
            kind,
            body: SectionBody::Text(text.to_owned()),
        });
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
