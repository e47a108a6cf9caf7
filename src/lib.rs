//! Note History library
//!
//! Revision history and diff engine for notes: loads the paged history of a
//! note in the background, numbers revisions locally and diffs each revision
//! against its predecessor at word and line granularity.

pub mod backend;
pub mod config;
pub mod constant;
pub mod history;
pub mod messages;
pub mod revision;

pub use backend::{BackendError, FileRevisionSource, HttpRevisionSource, RevisionSource};
pub use history::diff::{diff_lines, diff_words};
pub use history::{
    Baseline, DiffPresentation, EditKind, EditOp, FieldDiff, HistoryError, LoadState, NoteDiff,
    RevisionCache, RevisionHistory,
};
pub use revision::{NoteId, NoteState, RevisionPage, RevisionType, Snapshot, Tag};
