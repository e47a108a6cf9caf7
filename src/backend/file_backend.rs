use super::{BackendError, RevisionSource};
use crate::config::Config;
use crate::revision::{NoteId, NoteState, RevisionPage, Snapshot};
use std::fs;
use std::path::{Path, PathBuf};

/// Local history store: one JSON file per note, oldest revision first
pub struct FileRevisionSource {
    history_dir: PathBuf,
}

impl FileRevisionSource {
    /// Initialize the store under the configured data directory
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        Self::with_dir(config.history_dir())
    }

    pub fn with_dir(history_dir: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let history_dir = history_dir.into();
        fs::create_dir_all(&history_dir)?;
        Ok(Self { history_dir })
    }

    pub fn history_dir(&self) -> &Path {
        &self.history_dir
    }

    fn history_path(&self, note_id: NoteId) -> PathBuf {
        self.history_dir.join(format!("{}.json", note_id))
    }

    /// Load history for a note, oldest first
    fn load_history(&self, note_id: NoteId) -> Result<Vec<Snapshot>, BackendError> {
        let history_path = self.history_path(note_id);

        if !history_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(history_path)?;
        let entries = serde_json::from_str(&content)?;
        Ok(entries)
    }

    fn save_history(&self, note_id: NoteId, entries: &[Snapshot]) -> Result<(), BackendError> {
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(self.history_path(note_id), content)?;
        Ok(())
    }

    /// Append a revision to the history of a note
    pub fn record(&self, note_id: NoteId, snapshot: Snapshot) -> Result<(), BackendError> {
        let mut history = self.load_history(note_id)?;
        history.push(snapshot);
        self.save_history(note_id, &history)
    }
}

impl RevisionSource for FileRevisionSource {
    fn fetch_revisions(
        &self,
        note_id: NoteId,
        page_index: usize,
        page_size: usize,
    ) -> Result<RevisionPage, BackendError> {
        let history = self.load_history(note_id)?;
        let page_size = page_size.max(1);
        let total = history.len();

        let snapshots = history
            .into_iter()
            .rev()
            .skip(page_index.saturating_mul(page_size))
            .take(page_size)
            .collect();

        Ok(RevisionPage {
            snapshots,
            total_elements: Some(total),
            total_pages: Some(total.div_ceil(page_size)),
            page_index: Some(page_index),
        })
    }

    fn fetch_note_current_state(&self, note_id: NoteId) -> Result<NoteState, BackendError> {
        self.load_history(note_id)?
            .pop()
            .map(|snapshot| snapshot.note_state)
            .ok_or(BackendError::NoteNotFound(note_id))
    }
}
