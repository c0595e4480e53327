//! Every backend must behave the same behind `dyn Store`.

use chrono::NaiveDate;
use sitebook::models::{Attendance, DailyRecord, Place, Rates};
use sitebook::session::Session;
use sitebook::store::{JsonStore, MemoryStore, SqliteStore, Store, StoreChange};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("sitebook_contract_{}", name));
    fs::remove_file(&path).ok();
    path
}

fn check_places(store: &dyn Store) {
    let alice = Session::new("alice").unwrap();
    let bob = Session::new("bob").unwrap();

    let mut place = Place::new("Block A", Rates::new(1000.0, 600.0));
    store.put_place(&alice, &place).unwrap();

    let listed = store.list_places(&alice).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, place.id);
    assert_eq!(listed[0].name, "Block A");
    assert_eq!(listed[0].worker_rate, 1000.0);

    // Other users never see it.
    assert!(store.list_places(&bob).unwrap().is_empty());
    assert!(store.get_place(&bob, &place.id).unwrap().is_none());

    place.name = "Block A2".into();
    place.labourer_rate = 650.0;
    store.put_place(&alice, &place).unwrap();
    let fetched = store.get_place(&alice, &place.id).unwrap().unwrap();
    assert_eq!(fetched.name, "Block A2");
    assert_eq!(fetched.labourer_rate, 650.0);
    assert_eq!(store.list_places(&alice).unwrap().len(), 1);
}

fn check_records(store: &dyn Store) {
    let user = Session::new("records").unwrap();
    let place = Place::new("Tower", Rates::new(800.0, 500.0));
    store.put_place(&user, &place).unwrap();

    let first = DailyRecord::new(place.id, day("2025-09-02"), Attendance::new(10, 15));
    store.put_record(&user, &first).unwrap();
    let earlier = DailyRecord::new(place.id, day("2025-09-01"), Attendance::new(1, 1));
    store.put_record(&user, &earlier).unwrap();

    // Same (place, date) with a fresh id: the stored id survives.
    let mut replacement = DailyRecord::new(place.id, day("2025-09-02"), Attendance::new(12, 3));
    replacement.notes = Some("rain after lunch".into());
    store.put_record(&user, &replacement).unwrap();

    let stored = store
        .get_record(&user, &place.id, day("2025-09-02"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.workers, 12);
    assert_eq!(stored.labourers, 3);
    assert_eq!(stored.notes.as_deref(), Some("rain after lunch"));

    let records = store.list_records(&user, &place.id).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, day("2025-09-01"));
    assert_eq!(records[1].date, day("2025-09-02"));

    assert!(!store.delete_record(&user, &place.id, &replacement.id).unwrap());
    assert!(store.delete_record(&user, &place.id, &first.id).unwrap());
    assert!(store.get_record(&user, &place.id, day("2025-09-02")).unwrap().is_none());
}

fn check_cascade_and_clear(store: &dyn Store) {
    let user = Session::new("cascade").unwrap();
    let doomed = Place::new("Doomed", Rates::default());
    let kept = Place::new("Kept", Rates::default());
    store.put_place(&user, &doomed).unwrap();
    store.put_place(&user, &kept).unwrap();
    for p in [&doomed, &kept] {
        let r = DailyRecord::new(p.id, day("2025-09-03"), Attendance::new(1, 0));
        store.put_record(&user, &r).unwrap();
    }

    assert!(store.delete_place(&user, &doomed.id).unwrap());
    assert!(!store.delete_place(&user, &doomed.id).unwrap());
    assert!(store.list_records(&user, &doomed.id).unwrap().is_empty());
    assert_eq!(store.list_records(&user, &kept.id).unwrap().len(), 1);

    store.clear(&user).unwrap();
    assert!(store.list_places(&user).unwrap().is_empty());
    assert!(store.list_records(&user, &kept.id).unwrap().is_empty());
}

fn check_subscription(store: &dyn Store) {
    let user = Session::new("feed").unwrap();
    let seen: Arc<Mutex<Vec<StoreChange>>> = Arc::default();
    let count = Arc::new(AtomicUsize::new(0));

    let sub = {
        let seen = Arc::clone(&seen);
        let count = Arc::clone(&count);
        store.subscribe(Box::new(move |change| {
            seen.lock().unwrap().push(change.clone());
            count.fetch_add(1, Ordering::SeqCst);
        }))
    };

    let place = Place::new("Watched", Rates::default());
    store.put_place(&user, &place).unwrap();
    let record = DailyRecord::new(place.id, day("2025-09-04"), Attendance::new(2, 2));
    store.put_record(&user, &record).unwrap();

    {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].user(), "feed");
        assert_eq!(seen[0].place_id(), Some(place.id));
        assert!(matches!(
            seen[1],
            StoreChange::RecordSaved { date, .. } if date == day("2025-09-04")
        ));
    }

    // Nothing is published for a delete that found nothing.
    store
        .delete_record(&user, &place.id, &uuid::Uuid::new_v4())
        .unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);

    drop(sub);
    store.delete_place(&user, &place.id).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

fn contract(store: &dyn Store) {
    check_places(store);
    check_records(store);
    check_cascade_and_clear(store);
    check_subscription(store);
}

#[test]
fn memory_store_contract() {
    contract(&MemoryStore::new());
}

#[test]
fn json_store_contract() {
    let path = temp_path("store.json");
    let store = JsonStore::open(&path.to_string_lossy()).unwrap();
    contract(&store);
}

#[test]
fn sqlite_memory_store_contract() {
    contract(&SqliteStore::open_in_memory().unwrap());
}

#[test]
fn sqlite_file_store_contract() {
    let path = temp_path("store.sqlite");
    let store = SqliteStore::open(&path.to_string_lossy()).unwrap();
    contract(&store);
}

#[test]
fn json_store_survives_reopen() {
    let path = temp_path("reopen.json");
    let user = Session::new("alice").unwrap();
    let place = Place::new("Block A", Rates::new(1000.0, 600.0));
    let mut record = DailyRecord::new(place.id, day("2025-09-01"), Attendance::new(10, 15));
    record.rates = Some(place.rates());

    {
        let store = JsonStore::open(&path.to_string_lossy()).unwrap();
        store.put_place(&user, &place).unwrap();
        store.put_record(&user, &record).unwrap();
    }

    let store = JsonStore::open(&path.to_string_lossy()).unwrap();
    let back = store
        .get_record(&user, &place.id, day("2025-09-01"))
        .unwrap()
        .unwrap();
    assert_eq!(back, record);
}

#[test]
fn sqlite_store_survives_reopen() {
    let path = temp_path("reopen.sqlite");
    let user = Session::new("alice").unwrap();
    let place = Place::new("Block A", Rates::new(1000.0, 600.0));
    let mut record = DailyRecord::new(place.id, day("2025-09-01"), Attendance::new(10, 15));
    record.additional_costs = vec![sitebook::models::AdditionalCost::new("Cement bags", 500.0)];
    record.rates = Some(place.rates());

    {
        let store = SqliteStore::open(&path.to_string_lossy()).unwrap();
        store.put_place(&user, &place).unwrap();
        store.put_record(&user, &record).unwrap();
    }

    let store = SqliteStore::open(&path.to_string_lossy()).unwrap();
    let back = store
        .get_record(&user, &place.id, day("2025-09-01"))
        .unwrap()
        .unwrap();
    assert_eq!(back.id, record.id);
    assert_eq!(back.additional_costs, record.additional_costs);
    assert_eq!(back.rates, Some(Rates::new(1000.0, 600.0)));
}
