use std::collections::BTreeSet;

use super::stats::DiffStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Equal,
    Insert,
    Delete,
}

/// One step of an edit script, carrying a line or word token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOp {
    pub kind: EditKind,
    pub token: String,
}

impl EditOp {
    pub fn equal(token: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Equal,
            token: token.into(),
        }
    }

    pub fn insert(token: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            token: token.into(),
        }
    }

    pub fn delete(token: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            token: token.into(),
        }
    }

    pub fn is_equal(&self) -> bool {
        self.kind == EditKind::Equal
    }
}

#[derive(Debug, Clone)]
pub enum DiffRow {
    Unchanged(String),
    Pair(Vec<EditOp>, Vec<EditOp>),
}

/// Either no change, or a structured change of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDiff<T> {
    Unchanged,
    Changed(T),
}

impl<T> FieldDiff<T> {
    pub fn is_changed(&self) -> bool {
        matches!(self, FieldDiff::Changed(_))
    }

    pub fn changed(&self) -> Option<&T> {
        match self {
            FieldDiff::Changed(change) => Some(change),
            FieldDiff::Unchanged => None,
        }
    }
}

/// Change of an atomic value. `Added` is used when there is no predecessor
/// and must render as the new value only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueChange<T> {
    Added { new: T },
    Replaced { old: T, new: T },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagChange {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

/// Per-field differences between two note states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDiff {
    pub title: FieldDiff<Vec<EditOp>>,
    pub content: FieldDiff<Vec<EditOp>>,
    pub color: FieldDiff<ValueChange<Option<String>>>,
    pub pinned: FieldDiff<ValueChange<bool>>,
    pub tags: FieldDiff<TagChange>,
}

impl NoteDiff {
    pub fn has_changes(&self) -> bool {
        self.title.is_changed()
            || self.content.is_changed()
            || self.color.is_changed()
            || self.pinned.is_changed()
            || self.tags.is_changed()
    }

    /// True when nothing in the diff removes or replaces earlier content
    pub fn is_additions_only(&self) -> bool {
        let text_additive = |field: &FieldDiff<Vec<EditOp>>| {
            field
                .changed()
                .is_none_or(|ops| ops.iter().all(|op| op.kind != EditKind::Delete))
        };

        text_additive(&self.title)
            && text_additive(&self.content)
            && !matches!(self.color.changed(), Some(ValueChange::Replaced { .. }))
            && !matches!(self.pinned.changed(), Some(ValueChange::Replaced { .. }))
            && self.tags.changed().is_none_or(|tags| tags.removed.is_empty())
    }
}

/// What the selected revision is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// The next-older revision is loaded
    Predecessor { index: usize, local_number: usize },
    /// The selected revision is the first one of the note
    Initial,
    /// An older revision exists but has not been fetched yet
    NotLoaded,
}

/// A renderable diff of one revision against its predecessor
#[derive(Debug, Clone)]
pub struct DiffPresentation {
    pub index: usize,
    pub local_number: usize,
    pub baseline: Baseline,
    pub diff: NoteDiff,
    pub stats: DiffStats,
    /// Content lines changed, but only blank lines were added or removed
    pub blank_lines_only: bool,
}

impl DiffPresentation {
    pub fn is_initial(&self) -> bool {
        self.baseline == Baseline::Initial
    }
}

/// The live note compared against its newest cached revision
#[derive(Debug, Clone)]
pub struct CurrentComparison {
    /// Local number of the revision used as baseline, if any was loaded
    pub baseline_number: Option<usize>,
    pub diff: NoteDiff,
    pub stats: DiffStats,
    pub blank_lines_only: bool,
}
