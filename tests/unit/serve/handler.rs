use super::*;
use crate::foundation::error::{CountdownError, CountdownResult};
use crate::serve::{record::TimerRecord, store::InMemoryTimerStore};
use chrono::TimeZone;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
}

fn short_opts() -> ServeOpts {
    ServeOpts {
        animate: AnimateOpts {
            frame_count: 2,
            ..AnimateOpts::default()
        },
        ..ServeOpts::default()
    }
}

fn store_with(record: TimerRecord) -> InMemoryTimerStore {
    let mut store = InMemoryTimerStore::new();
    store.insert(record).unwrap();
    store
}

struct FailingStore;

impl TimerStore for FailingStore {
    fn get(&self, _id: &str) -> CountdownResult<Option<TimerRecord>> {
        Err(CountdownError::lookup("connection refused"))
    }
    fn list_by_owner(&self, _owner: &str) -> CountdownResult<Vec<TimerRecord>> {
        Ok(Vec::new())
    }
    fn insert(&mut self, _record: TimerRecord) -> CountdownResult<()> {
        Ok(())
    }
    fn delete(&mut self, _id: &str) -> CountdownResult<bool> {
        Ok(false)
    }
}

#[test]
fn empty_id_is_bad_request() {
    let store = InMemoryTimerStore::new();
    let resp = handle_timer_request(&store, " ", now(), &FontBook::empty(), &short_opts());
    assert_eq!(resp.status, 400);
    assert_eq!(resp.json().unwrap()["error"], "Timer ID is required");
}

#[test]
fn missing_record_is_not_found_with_id() {
    let store = InMemoryTimerStore::new();
    let resp = handle_timer_request(&store, "nope", now(), &FontBook::empty(), &short_opts());
    assert_eq!(resp.status, 404);
    let body = resp.json().unwrap();
    assert_eq!(body["error"], "Timer not found");
    assert_eq!(body["details"], "No timer exists with this ID");
    assert_eq!(body["id"], "nope");
}

#[test]
fn lookup_failure_is_not_found_with_details() {
    let resp = handle_timer_request(&FailingStore, "t", now(), &FontBook::empty(), &short_opts());
    assert_eq!(resp.status, 404);
    assert!(
        resp.json().unwrap()["details"]
            .as_str()
            .unwrap()
            .contains("connection refused")
    );
}

#[test]
fn unrenderable_record_is_internal_error() {
    let store = store_with(TimerRecord::new("bad", "2026-03-01T00:00:00Z", "not-a-color"));
    let resp = handle_timer_request(&store, "bad", now(), &FontBook::empty(), &short_opts());
    assert_eq!(resp.status, 500);
    assert_eq!(resp.json().unwrap()["error"], "Internal server error");
}

#[test]
fn success_serves_uncacheable_gif() {
    let store = store_with(TimerRecord::new("ok", "2026-02-01T01:01:01Z", "#3366cc"));
    let resp = handle_timer_request(&store, "ok", now(), &FontBook::empty(), &short_opts());
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("content-type"), Some("image/gif"));
    assert_eq!(
        resp.header("Cache-Control"),
        Some("no-cache, no-store, must-revalidate")
    );
    assert_eq!(resp.header("Pragma"), Some("no-cache"));
    assert_eq!(resp.header("Expires"), Some("0"));
    assert_eq!(&resp.body[..6], b"GIF89a");
}
