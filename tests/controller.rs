//! Ordering, debounce and timeout behaviour of the search controller,
//! driven by a scripted backend whose responses can be held back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};
use orgsearch::backend::{OrganizerBackend, ResultItem};
use orgsearch::{ControllerSettings, OrgSearchError, ResultSet, SearchController, SearchStatus};
use proptest::prelude::*;

const DEBOUNCE: Duration = Duration::from_millis(300);
const TIMEOUT: Duration = Duration::from_secs(10);
const WAIT: Duration = Duration::from_secs(5);

/// Backend that answers each query with `<query>1`, `<query>2`, unless told
/// otherwise, and can hold a query until its gate is released.
#[derive(Default)]
struct ScriptedBackend {
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, Receiver<()>>>,
    failures: Mutex<HashMap<String, String>>,
}

impl ScriptedBackend {
    /// Hold the next call for `query` until the returned sender fires or drops
    fn gate(&self, query: &str) -> Sender<()> {
        let (tx, rx) = bounded(1);
        self.gates.lock().unwrap().insert(query.to_string(), rx);
        tx
    }

    fn fail_with(&self, query: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(query.to_string(), message.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl OrganizerBackend for ScriptedBackend {
    fn search(&self, query: &str) -> orgsearch::Result<Vec<ResultItem>> {
        self.calls.lock().unwrap().push(query.to_string());

        let gate = self.gates.lock().unwrap().remove(query);
        if let Some(gate) = gate {
            let _ = gate.recv();
        }

        if let Some(message) = self.failures.lock().unwrap().get(query) {
            return Err(OrgSearchError::BackendError(message.clone()));
        }
        Ok(vec![named(&format!("{query}1")), named(&format!("{query}2"))])
    }
}

fn named(name: &str) -> ResultItem {
    let mut item = ResultItem::new();
    item.insert("name".into(), name.into());
    item
}

fn names(results: &ResultSet) -> Vec<String> {
    results
        .items
        .iter()
        .filter_map(|item| item.get("name").and_then(|v| v.as_str()))
        .map(str::to_string)
        .collect()
}

fn controller(backend: &Arc<ScriptedBackend>) -> SearchController {
    let settings = ControllerSettings {
        debounce: DEBOUNCE,
        timeout: TIMEOUT,
    };
    SearchController::new(backend.clone(), settings)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn typing_within_debounce_sends_only_last_text() {
    let backend = Arc::new(ScriptedBackend::default());
    let mut ctl = controller(&backend);
    let t0 = Instant::now();

    ctl.set_query_at("a", t0);
    ctl.set_query_at("ab", t0 + ms(100));

    assert!(!ctl.poll_at(t0 + ms(300)));
    assert!(!ctl.poll_at(t0 + ms(399)));
    assert!(ctl.poll_at(t0 + ms(400)));
    assert!(ctl.wait_for_response(WAIT));

    assert_eq!(backend.calls(), vec!["ab".to_string()]);
    assert_eq!(ctl.results().status, SearchStatus::Ready);
    assert_eq!(names(ctl.results()), vec!["ab1", "ab2"]);
}

#[test]
fn late_response_for_older_query_is_discarded() {
    let backend = Arc::new(ScriptedBackend::default());
    let mut ctl = controller(&backend);
    let t0 = Instant::now();

    let cat = backend.gate("cat");
    ctl.set_query_at("cat", t0);
    ctl.poll_at(t0 + ms(300));
    assert_eq!(ctl.in_flight_seq(), Some(1));

    ctl.set_query_at("dog", t0 + ms(1_000));
    ctl.poll_at(t0 + ms(1_300));
    assert_eq!(ctl.in_flight_seq(), Some(2));
    assert_eq!(ctl.results().status, SearchStatus::Loading);

    assert!(ctl.wait_for_response(WAIT));
    assert_eq!(ctl.results().status, SearchStatus::Ready);
    assert_eq!(names(ctl.results()), vec!["dog1", "dog2"]);

    cat.send(()).unwrap();
    assert!(ctl.wait_for_response(WAIT));
    ctl.poll_at(t0 + ms(6_000));
    assert_eq!(ctl.results().status, SearchStatus::Ready);
    assert_eq!(names(ctl.results()), vec!["dog1", "dog2"]);
    assert_eq!(ctl.results().query, "dog");
}

#[test]
fn timeout_fails_the_request_and_drops_its_late_answer() {
    let backend = Arc::new(ScriptedBackend::default());
    let mut ctl = controller(&backend);
    let t0 = Instant::now();

    let slow = backend.gate("slow");
    ctl.set_query_at("slow", t0);
    ctl.flush_at(t0);

    assert!(!ctl.poll_at(t0 + ms(9_999)));
    assert_eq!(ctl.results().status, SearchStatus::Loading);

    assert!(ctl.poll_at(t0 + TIMEOUT));
    let results = ctl.results().clone();
    assert_eq!(results.status, SearchStatus::Failed);
    assert!(results.error.unwrap().to_lowercase().contains("timeout"));
    assert_eq!(ctl.in_flight_seq(), None);

    slow.send(()).unwrap();
    assert!(ctl.wait_for_response(WAIT));
    assert_eq!(ctl.results().status, SearchStatus::Failed);
    assert!(ctl.results().items.is_empty());
}

#[test]
fn answer_queued_past_the_deadline_is_still_a_timeout() {
    let backend = Arc::new(ScriptedBackend::default());
    let mut ctl = controller(&backend);
    let t0 = Instant::now();

    ctl.set_query_at("slow", t0);
    ctl.flush_at(t0);
    // Answer lands in the channel without a tick in between
    std::thread::sleep(ms(200));

    assert!(ctl.poll_at(t0 + TIMEOUT));
    assert_eq!(ctl.results().status, SearchStatus::Failed);
    assert!(ctl.results().items.is_empty());

    ctl.wait_for_response(ms(500));
    ctl.poll_at(t0 + TIMEOUT + ms(50));
    assert_eq!(ctl.results().status, SearchStatus::Failed);
    assert!(ctl.results().items.is_empty());
    assert_eq!(backend.calls(), vec!["slow".to_string()]);
}

#[test]
fn clear_while_in_flight_keeps_idle() {
    let backend = Arc::new(ScriptedBackend::default());
    let mut ctl = controller(&backend);
    let t0 = Instant::now();

    let cat = backend.gate("cat");
    ctl.set_query_at("cat", t0);
    ctl.poll_at(t0 + DEBOUNCE);
    assert_eq!(ctl.results().status, SearchStatus::Loading);

    ctl.clear();
    assert_eq!(ctl.query(), "");
    assert_eq!(ctl.results().status, SearchStatus::Idle);

    cat.send(()).unwrap();
    assert!(ctl.wait_for_response(WAIT));
    ctl.poll_at(t0 + ms(2_000));
    assert_eq!(*ctl.results(), ResultSet::default());
}

#[test]
fn backend_error_surfaces_message_then_recovers() {
    let backend = Arc::new(ScriptedBackend::default());
    backend.fail_with("bad", "index is rebuilding");
    let mut ctl = controller(&backend);
    let t0 = Instant::now();

    ctl.set_query_at("bad", t0);
    ctl.flush_at(t0);
    assert!(ctl.wait_for_response(WAIT));
    assert_eq!(ctl.results().status, SearchStatus::Failed);
    assert!(ctl
        .results()
        .error
        .as_deref()
        .unwrap()
        .contains("index is rebuilding"));

    ctl.set_query_at("good", t0 + ms(50));
    ctl.poll_at(t0 + ms(350));
    assert_eq!(ctl.results().status, SearchStatus::Loading);
    assert!(ctl.wait_for_response(WAIT));
    assert_eq!(ctl.results().status, SearchStatus::Ready);
    assert_eq!(ctl.results().error, None);
}

#[test]
fn clearing_the_text_returns_to_idle_from_ready() {
    let backend = Arc::new(ScriptedBackend::default());
    let mut ctl = controller(&backend);
    let t0 = Instant::now();

    ctl.set_query_at("x", t0);
    ctl.flush_at(t0);
    assert!(ctl.wait_for_response(WAIT));
    assert_eq!(ctl.results().status, SearchStatus::Ready);

    ctl.set_query_at("", t0 + ms(10));
    assert_eq!(ctl.results().status, SearchStatus::Idle);
    assert!(ctl.results().items.is_empty());
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn next_deadline_tracks_debounce_then_timeout() {
    let backend = Arc::new(ScriptedBackend::default());
    let mut ctl = controller(&backend);
    let t0 = Instant::now();

    let _hold = backend.gate("q");
    ctl.set_query_at("q", t0);
    assert_eq!(ctl.next_deadline(), Some(t0 + DEBOUNCE));

    ctl.poll_at(t0 + DEBOUNCE);
    assert_eq!(ctl.next_deadline(), Some(t0 + DEBOUNCE + TIMEOUT));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn only_the_last_keystroke_in_a_burst_is_sent(
        burst in prop::collection::vec(("[a-z]{1,6}", 0u64..300), 1..8)
    ) {
        let backend = Arc::new(ScriptedBackend::default());
        let mut ctl = controller(&backend);
        let mut now = Instant::now();

        for (text, gap) in &burst {
            now += ms(*gap);
            ctl.poll_at(now);
            ctl.set_query_at(text.clone(), now);
        }
        prop_assert!(ctl.poll_at(now + DEBOUNCE));
        prop_assert!(ctl.wait_for_response(WAIT));

        let last = burst.last().map(|(text, _)| text.clone()).unwrap();
        prop_assert_eq!(backend.calls(), vec![last]);
    }

    #[test]
    fn newest_dispatch_wins_whatever_order_answers_arrive(
        order in Just((0..5usize).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let backend = Arc::new(ScriptedBackend::default());
        let mut ctl = controller(&backend);
        let t0 = Instant::now();

        let queries: Vec<String> = (0..5).map(|i| format!("q{i}")).collect();
        let mut gates = Vec::new();
        for (i, query) in queries.iter().enumerate() {
            gates.push(Some(backend.gate(query)));
            ctl.set_query_at(query.clone(), t0 + ms(i as u64 * 1_000));
            ctl.flush_at(t0 + ms(i as u64 * 1_000));
        }

        for idx in order {
            if let Some(gate) = gates[idx].take() {
                gate.send(()).unwrap();
            }
            prop_assert!(ctl.wait_for_response(WAIT));
        }

        prop_assert_eq!(ctl.results().status, SearchStatus::Ready);
        prop_assert_eq!(names(ctl.results()), vec!["q41".to_string(), "q42".to_string()]);
    }
}
