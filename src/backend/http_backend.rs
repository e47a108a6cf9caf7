use reqwest::blocking::{Client, Response};

use super::{BackendError, RevisionSource};
use crate::config::Settings;
use crate::revision::{NoteId, NoteState, RevisionPage};

/// Revision source backed by the note service's JSON history resource
pub struct HttpRevisionSource {
    client: Client,
    api_url: String,
}

impl HttpRevisionSource {
    pub fn new(api_url: impl Into<String>, client: Client) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        let api_url = std::env::var("NOTE_HISTORY_API_URL").unwrap_or_else(|_| {
            tracing::debug!("NOTE_HISTORY_API_URL not set, using configured URL");
            settings.api_url.clone()
        });

        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self::new(api_url, client))
    }

    fn revisions_url(&self, note_id: NoteId) -> String {
        format!("{}/notes/{}/revisions", self.api_url, note_id)
    }

    fn note_url(&self, note_id: NoteId) -> String {
        format!("{}/notes/{}", self.api_url, note_id)
    }

    fn check_status(note_id: NoteId, response: Response) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NoteNotFound(note_id));
        }

        let body = response
            .text()
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl RevisionSource for HttpRevisionSource {
    fn fetch_revisions(
        &self,
        note_id: NoteId,
        page_index: usize,
        page_size: usize,
    ) -> Result<RevisionPage, BackendError> {
        let response = self
            .client
            .get(self.revisions_url(note_id))
            .query(&[("page", page_index), ("size", page_size)])
            .send()?;

        let body = Self::check_status(note_id, response)?.text()?;
        Ok(RevisionPage::from_json(&body)?)
    }

    fn fetch_note_current_state(&self, note_id: NoteId) -> Result<NoteState, BackendError> {
        let response = self.client.get(self.note_url(note_id)).send()?;
        let state = Self::check_status(note_id, response)?.json()?;
        Ok(state)
    }
}
