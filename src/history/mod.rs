//! Revision history of one open note.
//!
//! [`RevisionHistory`] owns the page cache, runs page fetches on background
//! threads and applies their results when polled. Every fetch remembers the
//! note and cache generation it was started for; a result arriving after the
//! user opened another note (or reopened this one) is dropped untouched.

pub mod cache;
pub mod diff;
pub mod fields;
pub mod stats;
mod types;

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, RevisionSource};
use crate::messages::ResponseMessage;
use crate::revision::{NoteId, NoteState};

pub use cache::RevisionCache;
pub use types::{
    Baseline, CurrentComparison, DiffPresentation, DiffRow, EditKind, EditOp, FieldDiff, NoteDiff,
    TagChange, ValueChange,
};

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("No revision history is open")]
    NotOpen,

    #[error("Revision {0} is not loaded")]
    RevisionNotLoaded(usize),

    #[error("Failed to load revisions: {0}")]
    FetchFailed(String),

    #[error("Timed out waiting for revisions")]
    TimedOut,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    /// The last fetch failed; calling `load_next_page` retries it
    Failed(String),
    /// Every page of the open note has been loaded
    Exhausted,
}

pub struct RevisionHistory {
    source: Arc<dyn RevisionSource>,
    page_size: usize,
    cache: RevisionCache,
    state: LoadState,
    sender: Sender<ResponseMessage>,
    receiver: Receiver<ResponseMessage>,
}

impl RevisionHistory {
    pub fn new(source: Arc<dyn RevisionSource>, page_size: usize) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source,
            page_size: page_size.max(1),
            cache: RevisionCache::new(),
            state: LoadState::Idle,
            sender,
            receiver,
        }
    }

    /// Reset the cache for `note_id` and start loading its first page
    pub fn open_history(&mut self, note_id: NoteId) {
        info!("Open history for note {}", note_id);
        self.cache.reset(Some(note_id));
        self.state = LoadState::Idle;
        self.load_next_page();
    }

    /// Start fetching the next page. Returns whether a fetch was started;
    /// nothing happens while another fetch is in flight or when no pages remain.
    pub fn load_next_page(&mut self) -> bool {
        let Some(note_id) = self.cache.owner() else {
            return false;
        };
        if self.state == LoadState::Loading || !self.cache.has_more() {
            return false;
        }

        let page_index = self.cache.next_page_index();
        let generation = self.cache.generation();
        let page_size = self.page_size;
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();

        debug!("Fetch page {} of note {}", page_index, note_id);
        self.state = LoadState::Loading;

        thread::spawn(move || {
            let result = source
                .fetch_revisions(note_id, page_index, page_size)
                .map_err(|e| e.to_string());

            let _ = sender.send(ResponseMessage::RevisionsLoaded {
                note_id,
                generation,
                page_index,
                result,
            });
        });

        true
    }

    /// Discard the cache entirely. Fetches still in flight become stale.
    pub fn close_history(&mut self) {
        if let Some(note_id) = self.cache.owner() {
            info!("Close history for note {}", note_id);
        }
        self.cache.reset(None);
        self.state = LoadState::Idle;
    }

    /// Apply every response delivered so far without blocking.
    /// Returns the number of responses received, stale ones included.
    pub fn poll(&mut self) -> usize {
        let mut received = 0;
        while let Ok(message) = self.receiver.try_recv() {
            self.apply(message);
            received += 1;
        }
        received
    }

    /// Block until the in-flight fetch settles or `timeout` elapses
    pub fn wait_for_page(&mut self, timeout: Duration) -> Result<(), HistoryError> {
        let deadline = Instant::now() + timeout;

        while self.state == LoadState::Loading {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(message) => self.apply(message),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {
                    return Err(HistoryError::TimedOut);
                }
            }
        }

        match &self.state {
            LoadState::Failed(message) => Err(HistoryError::FetchFailed(message.clone())),
            _ => Ok(()),
        }
    }

    /// Keep loading pages until none remain
    pub fn load_all(&mut self, page_timeout: Duration) -> Result<(), HistoryError> {
        if self.cache.owner().is_none() {
            return Err(HistoryError::NotOpen);
        }

        loop {
            if !self.load_next_page() && self.state != LoadState::Loading {
                return Ok(());
            }
            self.wait_for_page(page_timeout)?;
        }
    }

    /// Start loading more pages if the predecessor of `index` is not cached yet.
    /// Returns whether the predecessor is still pending.
    pub fn ensure_predecessor(&mut self, index: usize) -> bool {
        if index + 1 < self.cache.len() || !self.cache.has_more() {
            return false;
        }
        self.load_next_page();
        self.state == LoadState::Loading
    }

    fn apply(&mut self, message: ResponseMessage) {
        match message {
            ResponseMessage::RevisionsLoaded {
                note_id,
                generation,
                page_index,
                result,
            } => {
                if !self.cache.is_current(note_id, generation)
                    || page_index != self.cache.next_page_index()
                {
                    debug!(
                        "Discard stale page {} of note {} (generation {})",
                        page_index, note_id, generation
                    );
                    return;
                }

                match result {
                    Ok(page) => {
                        let appended = self.cache.apply_page(page);
                        debug!(
                            "Loaded page {} of note {}: {} revisions, {} total",
                            page_index,
                            note_id,
                            appended,
                            self.cache.total()
                        );
                        self.state = if self.cache.has_more() {
                            LoadState::Idle
                        } else {
                            LoadState::Exhausted
                        };
                    }
                    Err(e) => {
                        warn!("Failed to load revisions of note {}: {}", note_id, e);
                        self.state = LoadState::Failed(e);
                    }
                }
            }
        }
    }

    /// Diff of the revision at `index` against its next-older revision
    pub fn present_diff(&self, index: usize) -> Result<DiffPresentation, HistoryError> {
        if self.cache.owner().is_none() {
            return Err(HistoryError::NotOpen);
        }
        let selected = self
            .cache
            .get(index)
            .ok_or(HistoryError::RevisionNotLoaded(index))?;
        let local_number = self
            .cache
            .local_number(index)
            .ok_or(HistoryError::RevisionNotLoaded(index))?;

        let predecessor = self.cache.get(index + 1);
        let baseline = match (predecessor, self.cache.local_number(index + 1)) {
            (Some(_), Some(number)) => Baseline::Predecessor {
                index: index + 1,
                local_number: number,
            },
            _ if self.cache.has_more() => Baseline::NotLoaded,
            _ => Baseline::Initial,
        };

        let old_state = predecessor.map(|snapshot| &snapshot.note_state);
        let new_state = &selected.note_state;
        let (stats, blank_lines_only) = content_changes(old_state, new_state);

        Ok(DiffPresentation {
            index,
            local_number,
            baseline,
            diff: fields::diff_note(old_state, new_state),
            stats,
            blank_lines_only,
        })
    }

    /// Diff of the newest cached revision against the live note
    pub fn present_current(&self, current: &NoteState) -> Result<CurrentComparison, HistoryError> {
        if self.cache.owner().is_none() {
            return Err(HistoryError::NotOpen);
        }
        let latest = self.cache.get(0).map(|snapshot| &snapshot.note_state);
        let (stats, blank_lines_only) = content_changes(latest, current);

        Ok(CurrentComparison {
            baseline_number: self.cache.local_number(0),
            diff: fields::diff_note(latest, current),
            stats,
            blank_lines_only,
        })
    }

    /// Fetch the live state of the open note
    pub fn fetch_current_state(&self) -> Result<NoteState, HistoryError> {
        let note_id = self.cache.owner().ok_or(HistoryError::NotOpen)?;
        Ok(self.source.fetch_note_current_state(note_id)?)
    }

    pub fn cache(&self) -> &RevisionCache {
        &self.cache
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }
}

/// Line-level content change: character stats, and whether the edits touch
/// nothing but blank lines
fn content_changes(old: Option<&NoteState>, new: &NoteState) -> (stats::DiffStats, bool) {
    let old_content = old.map(NoteState::content).unwrap_or("");
    let ops = diff::diff_lines(old_content, new.content());
    let blank_lines_only =
        ops.iter().any(|op| !op.is_equal()) && !diff::has_meaningful_changes(&ops);
    (
        stats::calculate_stats(&diff::group_into_rows(&ops)),
        blank_lines_only,
    )
}
