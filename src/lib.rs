//! OrgSearch - live search front end for a local file-organizing service
//!
//! The organizer runs as its own process. This crate provides the piece in
//! front of it: a search controller that turns keystrokes into debounced
//! backend queries and keeps only the newest answer, plus a terminal UI and
//! a small CLI built on top.
//!
//! # Features
//!
//! - **Debounced queries**: the text updates instantly, the backend is only
//!   asked once typing pauses
//! - **Stale-response guard**: every request carries a sequence number, late
//!   answers to older queries are dropped
//! - **Timeouts**: slow requests fail cleanly and the input stays usable
//! - **Organize suggestions**: ask the backend where a file should live
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use orgsearch::{AppConfig, HttpBackend, SearchController, SearchStatus};
//!
//! fn main() -> orgsearch::Result<()> {
//!     let config = AppConfig::default();
//!     let backend = HttpBackend::from_config(&config)?;
//!     let mut controller = SearchController::new(Arc::new(backend), config.controller_settings());
//!
//!     controller.set_query("invoices 2024");
//!     controller.flush();
//!     while !controller.is_settled() {
//!         controller.wait_for_response(Duration::from_millis(100));
//!         controller.poll();
//!     }
//!
//!     let results = controller.results();
//!     if results.status == SearchStatus::Ready {
//!         for item in &results.items {
//!             println!("{}", serde_json::Value::Object(item.clone()));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod tui;

// Re-export main types
pub use backend::{HttpBackend, OrganizerBackend, ResultItem, Suggestion};
pub use config::{AppConfig, ControllerSettings};
pub use controller::{ResultSet, SearchController, SearchStatus};
pub use error::{OrgSearchError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format bytes as human-readable string
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
