//! Append-only cache of the revisions loaded for one open note.
//!
//! Snapshots are kept newest first in the order pages arrived. A snapshot's
//! index is its absolute position from the newest end and never changes once
//! loaded, which keeps its local number stable while older pages are appended.

use std::collections::HashSet;

use crate::revision::{NoteId, RevisionId, RevisionPage, Snapshot};

#[derive(Debug, Default)]
pub struct RevisionCache {
    owner: Option<NoteId>,
    generation: u64,
    snapshots: Vec<Snapshot>,
    seen: HashSet<RevisionId>,
    total: usize,
    /// Server total captured at the first page of this generation
    numbering_total: Option<usize>,
    numbering_captured: bool,
    next_page_index: usize,
    has_more: bool,
}

impl RevisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all contents and start a new generation bound to `owner`
    pub fn reset(&mut self, owner: Option<NoteId>) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            owner,
            generation,
            has_more: owner.is_some(),
            ..Self::default()
        };
    }

    /// Whether a fetch started for `note_id` at `generation` still targets this cache
    pub fn is_current(&self, note_id: NoteId, generation: u64) -> bool {
        self.owner == Some(note_id) && self.generation == generation
    }

    /// Merge a fetched page, returning the number of snapshots appended
    pub fn apply_page(&mut self, page: RevisionPage) -> usize {
        let mut appended = 0;

        for snapshot in page.snapshots {
            if self.seen.insert(snapshot.revision_id) {
                self.snapshots.push(snapshot);
                appended += 1;
            }
        }

        self.total = page.total_elements.unwrap_or(self.snapshots.len());
        // the first page decides the numbering base even when it carries no total
        if !self.numbering_captured {
            self.numbering_total = page.total_elements.filter(|total| *total > 0);
            self.numbering_captured = true;
        }

        // without page metadata, paging ends once a page brings nothing new
        self.has_more = match page.total_pages {
            Some(total_pages) => self.next_page_index + 1 < total_pages,
            None => appended > 0,
        };
        self.next_page_index += 1;

        appended
    }

    /// Display number of the snapshot at `index`, or `None` if it is not loaded.
    ///
    /// A server-supplied version wins. Otherwise the number counts down from
    /// the total captured at the first load, falling back to `index + 1` when
    /// no total is known.
    pub fn local_number(&self, index: usize) -> Option<usize> {
        let snapshot = self.snapshots.get(index)?;
        if let Some(version) = snapshot.version {
            return Some(version);
        }

        let derived = self
            .numbering_total
            .and_then(|total| total.checked_sub(index))
            .filter(|number| *number > 0)
            .unwrap_or(index + 1);
        Some(derived)
    }

    pub fn owner(&self) -> Option<NoteId> {
        self.owner
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Best known total number of revisions
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn next_page_index(&self) -> usize {
        self.next_page_index
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }
}
