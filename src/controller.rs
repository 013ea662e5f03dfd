//! Search input controller
//!
//! Owns the query text and the latest [`ResultSet`]. Keystrokes go through
//! [`SearchController::set_query`], which updates the text at once and
//! (re)arms a debounce deadline. The owning event loop calls
//! [`SearchController::poll`] on every tick; that fires due dispatches,
//! enforces the request timeout and applies backend responses.
//!
//! Backend calls run on worker threads and report back over a channel, but
//! all state changes happen on the thread that owns the controller. Each
//! dispatch gets a sequence number and only the response carrying the
//! current in-flight number is applied; everything else is dropped.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::{OrganizerBackend, ResultItem};
use crate::config::ControllerSettings;
use crate::error::{OrgSearchError, Result};

/// Status tag of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl SearchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SearchStatus::Idle => "Idle",
            SearchStatus::Loading => "Loading",
            SearchStatus::Ready => "Ready",
            SearchStatus::Failed => "Failed",
        }
    }
}

/// Latest search outcome, as seen by the rendering layer
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ResultSet {
    pub status: SearchStatus,
    pub items: Vec<ResultItem>,
    /// Human-readable cause when `status` is `Failed`
    pub error: Option<String>,
    /// Query text that produced this set (empty while idle)
    pub query: String,
    /// When the last response was applied
    pub updated_at: Option<DateTime<Local>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Response sent back by a worker thread
struct Completion {
    seq: u64,
    outcome: Result<Vec<ResultItem>>,
}

struct PendingDispatch {
    text: String,
    due: Instant,
}

struct InFlight {
    seq: u64,
    text: String,
    deadline: Instant,
}

pub struct SearchController {
    backend: Arc<dyn OrganizerBackend>,
    settings: ControllerSettings,

    query: String,
    results: ResultSet,

    pending: Option<PendingDispatch>,
    in_flight: Option<InFlight>,
    last_seq: u64,

    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn OrganizerBackend>, settings: ControllerSettings) -> Self {
        let (completion_tx, completion_rx) = unbounded();
        Self {
            backend,
            settings,
            query: String::new(),
            results: ResultSet::default(),
            pending: None,
            in_flight: None,
            last_seq: 0,
            completion_tx,
            completion_rx,
        }
    }

    // --- Observables ---

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    /// True when a debounced dispatch is waiting to fire
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Sequence number of the request whose response would be applied
    pub fn in_flight_seq(&self) -> Option<u64> {
        self.in_flight.as_ref().map(|f| f.seq)
    }

    /// Nothing scheduled and nothing in flight
    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && self.in_flight.is_none()
    }

    /// Earliest moment `poll` has timer work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let due = self.pending.as_ref().map(|p| p.due);
        let deadline = self.in_flight.as_ref().map(|f| f.deadline);
        match (due, deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // --- Operations ---

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.set_query_at(text, Instant::now());
    }

    /// Replace the query text and re-arm the debounce timer.
    ///
    /// Blank input never reaches the backend: it goes straight to `Idle`.
    pub fn set_query_at(&mut self, text: impl Into<String>, now: Instant) {
        self.query = text.into();

        if self.query.trim().is_empty() {
            self.pending = None;
            self.supersede_in_flight();
            self.results = ResultSet::default();
            return;
        }

        if self.pending.is_some() {
            debug!("debounce rescheduled");
        }
        self.pending = Some(PendingDispatch {
            text: self.query.clone(),
            due: now + self.settings.debounce,
        });
    }

    /// Reset to an empty query and an idle result set
    pub fn clear(&mut self) {
        self.query.clear();
        self.pending = None;
        self.supersede_in_flight();
        self.results = ResultSet::default();
    }

    pub fn flush(&mut self) {
        self.flush_at(Instant::now());
    }

    /// Fire a pending dispatch now instead of waiting out the debounce
    pub fn flush_at(&mut self, now: Instant) {
        if let Some(pending) = self.pending.take() {
            self.dispatch(pending.text, now);
        }
    }

    pub fn refresh(&mut self) {
        self.refresh_at(Instant::now());
    }

    /// Re-issue the current query, e.g. after a failure
    pub fn refresh_at(&mut self, now: Instant) {
        if self.query.trim().is_empty() {
            return;
        }
        self.pending = None;
        self.dispatch(self.query.clone(), now);
    }

    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Drive timers and apply responses. Returns whether the observable
    /// state changed.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let mut changed = false;

        // Deadline first: an answer still queued past it counts as late
        if let Some(in_flight) = &self.in_flight {
            if now >= in_flight.deadline {
                let err = OrgSearchError::Timeout(self.settings.timeout);
                warn!(seq = in_flight.seq, query = %in_flight.text, "{}", err);
                self.in_flight = None;
                self.fail(err.to_string());
                changed = true;
            }
        }

        while let Ok(completion) = self.completion_rx.try_recv() {
            changed |= self.apply(completion);
        }

        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            if let Some(pending) = self.pending.take() {
                self.dispatch(pending.text, now);
                changed = true;
            }
        }

        changed
    }

    /// Block up to `max_wait` for one backend response and apply it.
    ///
    /// Returns `true` if a response arrived, whether or not it was current.
    pub fn wait_for_response(&mut self, max_wait: Duration) -> bool {
        match self.completion_rx.recv_timeout(max_wait) {
            Ok(completion) => {
                self.apply(completion);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    // --- Internals ---

    fn dispatch(&mut self, text: String, now: Instant) {
        self.last_seq += 1;
        let seq = self.last_seq;

        if let Some(old) = &self.in_flight {
            debug!(old = old.seq, new = seq, "superseding in-flight query");
        }
        debug!(seq, query = %text, "dispatching query");

        self.in_flight = Some(InFlight {
            seq,
            text: text.clone(),
            deadline: now + self.settings.timeout,
        });
        self.results.status = SearchStatus::Loading;
        self.results.error = None;
        self.results.query = text.clone();

        let backend = Arc::clone(&self.backend);
        let tx = self.completion_tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("orgsearch-query-{}", seq))
            .spawn(move || {
                let outcome = backend.search(&text);
                let _ = tx.send(Completion { seq, outcome });
            });

        if let Err(e) = spawned {
            warn!(seq, "cannot spawn query worker: {}", e);
            self.in_flight = None;
            self.fail(format!("Cannot start query worker: {}", e));
        }
    }

    /// Apply a response if it belongs to the current in-flight request
    fn apply(&mut self, completion: Completion) -> bool {
        let current = self.in_flight.as_ref().map(|f| f.seq);
        if current != Some(completion.seq) {
            debug!(seq = completion.seq, ?current, "discarding superseded response");
            return false;
        }
        self.in_flight = None;

        match completion.outcome {
            Ok(items) => {
                debug!(seq = completion.seq, count = items.len(), "query settled");
                self.results.status = SearchStatus::Ready;
                self.results.items = items;
                self.results.error = None;
                self.results.updated_at = Some(Local::now());
            }
            Err(err) => {
                warn!(seq = completion.seq, "query failed: {}", err);
                self.fail(err.to_string());
            }
        }
        true
    }

    fn fail(&mut self, message: String) {
        self.results.status = SearchStatus::Failed;
        self.results.items.clear();
        self.results.error = Some(message);
        self.results.updated_at = Some(Local::now());
    }

    fn supersede_in_flight(&mut self) {
        if let Some(old) = self.in_flight.take() {
            debug!(seq = old.seq, "in-flight query abandoned");
        }
    }
}
