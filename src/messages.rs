use crate::revision::{NoteId, RevisionPage};

/// Response messages from background fetches
pub enum ResponseMessage {
    /// A page fetch finished. `note_id` and `generation` identify the cache
    /// the fetch was started for.
    RevisionsLoaded {
        note_id: NoteId,
        generation: u64,
        page_index: usize,
        result: Result<RevisionPage, String>,
    },
}
