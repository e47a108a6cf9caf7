//! Revision data model
//!
//! Snapshots are produced by a [`crate::backend::RevisionSource`] and never
//! mutated locally. Field names follow the camelCase JSON of the history
//! resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

pub type NoteId = i64;
pub type RevisionId = i64;

/// Kind of change recorded by a revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RevisionType {
    Add,
    Mod,
    Del,
}

/// A tag as delivered by the server: either a bare label or a structured object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Label(String),
    Structured(Value),
}

impl Tag {
    /// Display label used for comparison. Objects resolve to `name`, then
    /// `label`, then their JSON text; null resolves to an empty string.
    pub fn label(&self) -> String {
        match self {
            Tag::Label(label) => label.clone(),
            Tag::Structured(value) => value_label(value),
        }
    }
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Tag::Label(label.to_string())
    }
}

fn value_label(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => match map
            .get("name")
            .filter(|v| !v.is_null())
            .or_else(|| map.get("label").filter(|v| !v.is_null()))
        {
            Some(inner) => value_label(inner),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// The note fields captured by one revision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteState {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl NoteState {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Normalized tag labels as a set
    pub fn tag_labels(&self) -> BTreeSet<String> {
        self.tags.iter().map(Tag::label).collect()
    }
}

/// One historical state of a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Opaque server key, never used for display ordering
    pub revision_id: RevisionId,
    pub revision_type: RevisionType,
    pub revision_date: DateTime<Utc>,
    #[serde(default)]
    pub auditor: Option<String>,
    /// Server-supplied version number, preferred over the derived local number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<usize>,
    #[serde(alias = "note", alias = "entity")]
    pub note_state: NoteState,
}

/// One page of revisions, newest first. Metadata may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionPage {
    #[serde(default, rename = "content", alias = "revisions")]
    pub snapshots: Vec<Snapshot>,
    #[serde(default)]
    pub total_elements: Option<usize>,
    #[serde(default)]
    pub total_pages: Option<usize>,
    #[serde(default, rename = "number", alias = "pageIndex")]
    pub page_index: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageBody {
    Bare(Vec<Snapshot>),
    Paged(RevisionPage),
}

impl RevisionPage {
    /// Page without any pagination metadata
    pub fn bare(snapshots: Vec<Snapshot>) -> Self {
        Self {
            snapshots,
            ..Self::default()
        }
    }

    /// Parse a response body that is either a paged object or a bare array
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let page = match serde_json::from_str::<PageBody>(body)? {
            PageBody::Bare(snapshots) => Self::bare(snapshots),
            PageBody::Paged(page) => page,
        };
        Ok(page)
    }
}
