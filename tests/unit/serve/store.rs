use super::*;

fn owned(id: &str, owner: &str) -> TimerRecord {
    let mut r = TimerRecord::new(id, "2026-05-01T00:00:00Z", "#000000");
    r.user_id = Some(owner.to_string());
    r
}

#[test]
fn insert_get_delete() {
    let mut store = InMemoryTimerStore::new();
    assert!(store.is_empty());
    store.insert(owned("a", "u1")).unwrap();
    assert_eq!(store.get("a").unwrap().map(|r| r.id), Some("a".to_string()));
    assert!(store.get("missing").unwrap().is_none());
    assert!(store.delete("a").unwrap());
    assert!(!store.delete("a").unwrap());
    assert!(store.is_empty());
}

#[test]
fn list_by_owner_filters_and_orders_by_id() {
    let mut store = InMemoryTimerStore::new();
    store.insert(owned("c", "u1")).unwrap();
    store.insert(owned("a", "u1")).unwrap();
    store.insert(owned("b", "u2")).unwrap();
    let ids: Vec<String> = store
        .list_by_owner("u1")
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["a", "c"]);
    assert!(store.list_by_owner("nobody").unwrap().is_empty());
}

#[test]
fn blank_ids_are_rejected() {
    let mut store = InMemoryTimerStore::new();
    assert!(store.insert(owned("  ", "u1")).is_err());
    assert!(InMemoryTimerStore::from_json(r##"[{"id":"","end_date":"x","color":"#fff"}]"##).is_err());
}

#[test]
fn json_array_loads() {
    let store = InMemoryTimerStore::from_json(
        r##"[
            {"id":"t1","user_id":"u","end_date":"2026-05-01T00:00:00Z","color":"#ff8800","style":"neon"},
            {"id":"t2","end_date":"2026-06-01","color":"#00f","language":"de","max_views":10}
        ]"##,
    )
    .unwrap();
    assert_eq!(store.len(), 2);
    let t2 = store.get("t2").unwrap().unwrap();
    assert_eq!(t2.max_views, Some(10));
    assert_eq!(t2.language.as_deref(), Some("de"));
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = InMemoryTimerStore::from_json("{not json").unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));
}
