//! Organizer backend boundary
//!
//! The organizer runs as a separate local process. The controller only
//! needs a call-and-respond query operation, expressed here as the
//! [`OrganizerBackend`] trait. [`HttpBackend`] is the implementation used by
//! the application; tests provide scripted ones.

pub mod http;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use http::HttpBackend;

/// One opaque result record: a mapping from field name to value
pub type ResultItem = serde_json::Map<String, serde_json::Value>;

/// Query side of the organizer service.
///
/// Calls run on worker threads and may block for as long as the backend
/// takes; the controller enforces its own timeout on top.
pub trait OrganizerBackend: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<ResultItem>>;
}

/// Where the organizer would file a piece of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub filename: String,
    pub folder: String,
}

impl Suggestion {
    /// Relative destination path, `folder/filename`
    pub fn destination(&self) -> String {
        let folder = self.folder.trim_end_matches(['/', '\\']);
        if folder.is_empty() {
            self.filename.clone()
        } else {
            format!("{}/{}", folder, self.filename)
        }
    }
}
