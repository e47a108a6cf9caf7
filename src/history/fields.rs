//! Per-field comparison of two note states.
//!
//! A missing old state means "no predecessor": every change is then expressed
//! as an addition and nothing is reported as removed.

use super::diff::diff_words;
use super::types::{EditOp, FieldDiff, NoteDiff, TagChange, ValueChange};
use crate::revision::NoteState;

pub fn diff_note(old: Option<&NoteState>, new: &NoteState) -> NoteDiff {
    NoteDiff {
        title: diff_text(old.map(NoteState::title), new.title()),
        content: diff_text(old.map(NoteState::content), new.content()),
        color: diff_color(old.map(|state| &state.color), &new.color),
        pinned: diff_value(old.map(|state| state.pinned), new.pinned),
        tags: diff_tags(old, new),
    }
}

/// Word-granularity text diff; a script without edits counts as unchanged
pub fn diff_text(old: Option<&str>, new: &str) -> FieldDiff<Vec<EditOp>> {
    let old = old.unwrap_or("");
    if old == new {
        return FieldDiff::Unchanged;
    }

    let ops = diff_words(old, new);
    if ops.iter().all(EditOp::is_equal) {
        FieldDiff::Unchanged
    } else {
        FieldDiff::Changed(ops)
    }
}

pub fn diff_value<T: PartialEq>(old: Option<T>, new: T) -> FieldDiff<ValueChange<T>> {
    match old {
        None => FieldDiff::Changed(ValueChange::Added { new }),
        Some(old) if old == new => FieldDiff::Unchanged,
        Some(old) => FieldDiff::Changed(ValueChange::Replaced { old, new }),
    }
}

fn diff_color(
    old: Option<&Option<String>>,
    new: &Option<String>,
) -> FieldDiff<ValueChange<Option<String>>> {
    // nothing to add when the first revision has no color
    if old.is_none() && new.is_none() {
        return FieldDiff::Unchanged;
    }
    diff_value(old.cloned(), new.clone())
}

pub fn diff_tags(old: Option<&NoteState>, new: &NoteState) -> FieldDiff<TagChange> {
    let old_labels = old.map(NoteState::tag_labels).unwrap_or_default();
    let new_labels = new.tag_labels();

    let change = TagChange {
        added: new_labels.difference(&old_labels).cloned().collect(),
        removed: old_labels.difference(&new_labels).cloned().collect(),
    };

    if change.added.is_empty() && change.removed.is_empty() {
        FieldDiff::Unchanged
    } else {
        FieldDiff::Changed(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revision::Tag;
    use std::collections::BTreeSet;

    fn state(title: &str, content: &str, tags: &[&str]) -> NoteState {
        NoteState {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            color: None,
            pinned: false,
            tags: tags.iter().map(|t| Tag::from(*t)).collect(),
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tag_sets_are_diffed() {
        let old = state("t", "c", &["x", "y"]);
        let new = state("t", "c", &["y", "z"]);

        let diff = diff_note(Some(&old), &new);
        let tags = diff.tags.changed().unwrap();
        assert_eq!(tags.added, set(&["z"]));
        assert_eq!(tags.removed, set(&["x"]));
    }

    #[test]
    fn structured_tags_compare_by_label() {
        let old = NoteState {
            tags: vec![Tag::Structured(serde_json::json!({ "name": "work" }))],
            ..NoteState::default()
        };
        let new = NoteState {
            tags: vec![Tag::from("work")],
            ..NoteState::default()
        };
        assert_eq!(diff_tags(Some(&old), &new), FieldDiff::Unchanged);
    }

    #[test]
    fn identical_states_have_no_changes() {
        let note = state("Plan", "step one\nstep two", &["a"]);
        let diff = diff_note(Some(&note), &note.clone());
        assert!(!diff.has_changes());
    }

    #[test]
    fn whitespace_only_edit_is_unchanged() {
        assert_eq!(diff_text(Some("a  b"), "a b"), FieldDiff::Unchanged);
    }

    #[test]
    fn content_is_diffed_by_word() {
        let old = state("t", "buy milk today", &[]);
        let new = state("t", "buy oat milk", &[]);

        let diff = diff_note(Some(&old), &new);
        assert_eq!(diff.title, FieldDiff::Unchanged);
        assert_eq!(
            diff.content,
            FieldDiff::Changed(vec![
                EditOp::equal("buy"),
                EditOp::insert("oat"),
                EditOp::equal("milk"),
                EditOp::delete("today"),
            ])
        );
    }

    #[test]
    fn no_predecessor_is_additions_only() {
        let mut new = state("First", "hello world", &["inbox"]);
        new.color = Some("#fff".to_string());
        new.pinned = true;

        let diff = diff_note(None, &new);
        assert!(diff.is_additions_only());
        assert_eq!(
            diff.color,
            FieldDiff::Changed(ValueChange::Added {
                new: Some("#fff".to_string())
            })
        );
        assert_eq!(
            diff.pinned,
            FieldDiff::Changed(ValueChange::Added { new: true })
        );
        assert_eq!(diff.tags.changed().unwrap().added, set(&["inbox"]));
        assert!(diff.tags.changed().unwrap().removed.is_empty());
    }

    #[test]
    fn no_predecessor_with_empty_fields() {
        let diff = diff_note(None, &NoteState::default());
        assert_eq!(diff.title, FieldDiff::Unchanged);
        assert_eq!(diff.content, FieldDiff::Unchanged);
        assert_eq!(diff.color, FieldDiff::Unchanged);
        assert_eq!(diff.tags, FieldDiff::Unchanged);
        assert!(diff.is_additions_only());
    }

    #[test]
    fn null_text_is_treated_as_empty() {
        let old = NoteState {
            content: None,
            ..NoteState::default()
        };
        let new = state("", "text", &[]);
        let diff = diff_note(Some(&old), &new);
        assert_eq!(
            diff.content,
            FieldDiff::Changed(vec![EditOp::insert("text")])
        );
    }

    #[test]
    fn color_and_pinned_replacements() {
        let mut old = state("t", "c", &[]);
        old.color = Some("red".to_string());
        let mut new = old.clone();
        new.color = None;
        new.pinned = true;

        let diff = diff_note(Some(&old), &new);
        assert_eq!(
            diff.color,
            FieldDiff::Changed(ValueChange::Replaced {
                old: Some("red".to_string()),
                new: None
            })
        );
        assert_eq!(
            diff.pinned,
            FieldDiff::Changed(ValueChange::Replaced {
                old: false,
                new: true
            })
        );
        assert!(!diff.is_additions_only());
    }
}
