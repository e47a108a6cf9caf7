pub mod file_backend;
pub mod http_backend;

use crate::revision::{NoteId, NoteState, RevisionPage};
use std::io;
use thiserror::Error;

pub use file_backend::FileRevisionSource;
pub use http_backend::HttpRevisionSource;

/// Custom error types for revision sources
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),
}

/// Paged read access to the history of notes.
///
/// Implementations are called from background threads, one fetch at a time
/// per open history.
pub trait RevisionSource: Send + Sync {
    /// Newest-first revisions of `note_id` for the zero-based `page_index`
    fn fetch_revisions(
        &self,
        note_id: NoteId,
        page_index: usize,
        page_size: usize,
    ) -> Result<RevisionPage, BackendError>;

    /// The live state of the note, for comparing against its latest revision
    fn fetch_note_current_state(&self, note_id: NoteId) -> Result<NoteState, BackendError>;
}
