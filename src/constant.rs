/// Application name and metadata constants
pub const APP_QUALIFIER: &str = "com";
pub const APP_ORGANIZATION: &str = "NoteHistory";
pub const APP_NAME: &str = "Note History";

/// Default endpoint of the note service exposing the revision resource
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Paging and fetch defaults
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

/// Directory (under the data dir) holding per-note history files
pub const HISTORY_DIR: &str = "history";
