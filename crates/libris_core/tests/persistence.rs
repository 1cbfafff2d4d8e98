use chrono::NaiveDate;
use libris_core::{
    Book, Catalog, JsonSnapshotStore, MemorySnapshotStore, SnapshotStore, StoreError,
};
use std::collections::BTreeMap;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn save_writes_one_snapshot_file_per_collection() {
    let dir = tempdir().unwrap();
    let mut catalog = Catalog::new(JsonSnapshotStore::new(dir.path()));
    catalog.add_book("Dune", "Frank Herbert", None, 1);
    catalog.save().unwrap();

    for name in ["books.json", "members.json", "loans.json"] {
        assert!(dir.path().join(name).exists(), "missing {name}");
    }
}

#[test]
fn roundtrip_reproduces_identical_records() {
    let dir = tempdir().unwrap();

    let mut catalog = Catalog::new(JsonSnapshotStore::new(dir.path()));
    let book = catalog.add_book(
        "Dune",
        "Frank Herbert",
        Some("9780441172719".to_string()),
        3,
    );
    let member = catalog.add_member("Ada", "ada@example.com", "555-0100");
    let loan = catalog.issue_book_at(book, member, date(2026, 3, 1)).unwrap();
    catalog.save().unwrap();

    let mut restored = Catalog::new(JsonSnapshotStore::new(dir.path()));
    restored.load();

    let loaded_book = restored.find_book(book).unwrap();
    assert_eq!(loaded_book.title, "Dune");
    assert_eq!(loaded_book.author, "Frank Herbert");
    assert_eq!(loaded_book.isbn.as_deref(), Some("9780441172719"));
    assert_eq!(loaded_book.total_copies, 3);
    assert_eq!(loaded_book.available_copies, 2);

    let loaded_member = restored.find_member(member).unwrap();
    assert_eq!(loaded_member.name, "Ada");
    assert_eq!(loaded_member.email, "ada@example.com");
    assert_eq!(loaded_member.phone, "555-0100");

    let loans = restored.list_loans(false);
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].id, loan.id);
    assert_eq!(loans[0].book_id, book);
    assert_eq!(loans[0].member_id, member);
    assert_eq!(loans[0].issue_date, date(2026, 3, 1));
    assert_eq!(loans[0].due_date, date(2026, 3, 15));
    assert_eq!(loans[0].return_date, None);
}

#[test]
fn returned_loans_survive_the_roundtrip() {
    let dir = tempdir().unwrap();

    let mut catalog = Catalog::new(JsonSnapshotStore::new(dir.path()));
    let book = catalog.add_book("Dune", "Frank Herbert", None, 1);
    let member = catalog.add_member("Ada", "ada@example.com", "555-0100");
    let loan = catalog.issue_book_at(book, member, date(2026, 3, 1)).unwrap();
    catalog.return_book_at(loan.id, date(2026, 3, 21)).unwrap();
    catalog.save().unwrap();

    let mut restored = Catalog::new(JsonSnapshotStore::new(dir.path()));
    restored.load();
    assert_eq!(restored.list_loans(true).len(), 0);
    assert_eq!(restored.compute_fine_at(loan.id, date(2027, 1, 1)), 30);
}

#[test]
fn load_with_no_snapshots_leaves_state_untouched() {
    let dir = tempdir().unwrap();
    let mut catalog = Catalog::new(JsonSnapshotStore::new(dir.path()));
    let book = catalog.add_book("Dune", "Frank Herbert", None, 1);

    catalog.load();
    assert!(catalog.find_book(book).is_some());
}

#[test]
fn missing_individual_snapshot_keeps_that_collection() {
    let dir = tempdir().unwrap();

    let mut catalog = Catalog::new(JsonSnapshotStore::new(dir.path()));
    catalog.add_book("Dune", "Frank Herbert", None, 1);
    catalog.save().unwrap();
    std::fs::remove_file(dir.path().join("members.json")).unwrap();

    let mut restored = Catalog::new(JsonSnapshotStore::new(dir.path()));
    let member = restored.add_member("Ada", "ada@example.com", "555-0100");
    restored.load();

    // Books were replaced from disk; the absent members snapshot left the
    // in-memory members alone.
    assert_eq!(restored.list_books().len(), 1);
    assert!(restored.find_member(member).is_some());
}

#[test]
fn corrupt_snapshot_is_swallowed_on_load() {
    let dir = tempdir().unwrap();

    let mut catalog = Catalog::new(JsonSnapshotStore::new(dir.path()));
    let book = catalog.add_book("Dune", "Frank Herbert", None, 1);
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(dir.path().join("books.json"), "{not json").unwrap();

    catalog.load();
    assert!(catalog.find_book(book).is_some());
}

#[test]
fn json_store_load_distinguishes_absent_from_corrupt() {
    let dir = tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path());

    let absent = store.load::<Book>("books").unwrap();
    assert!(absent.is_none());

    std::fs::write(dir.path().join("books.json"), "[1, 2, 3]").unwrap();
    let err = store.load::<Book>("books").unwrap_err();
    assert!(matches!(err, StoreError::Decode { ref name, .. } if name.as_str() == "books"));
}

#[test]
fn json_store_save_overwrites_previous_snapshot() {
    let dir = tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path());

    let first = Book::new("Dune", "Frank Herbert", None, 1);
    let mut records = BTreeMap::new();
    records.insert(first.id.to_string(), &first);
    store.save("books", &records).unwrap();

    let second = Book::new("Solaris", "Stanislaw Lem", None, 1);
    let mut replacement = BTreeMap::new();
    replacement.insert(second.id.to_string(), &second);
    store.save("books", &replacement).unwrap();

    let loaded = store.load::<Book>("books").unwrap().unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded.contains_key(&second.id.to_string()));
}

#[test]
fn save_failure_propagates_to_the_caller() {
    let dir = tempdir().unwrap();
    // A plain file where the storage root should be makes the root
    // uncreatable, so the very first write fails.
    let blocked_root = dir.path().join("not-a-directory");
    std::fs::write(&blocked_root, "occupied").unwrap();

    let mut catalog = Catalog::new(JsonSnapshotStore::new(blocked_root.join("data")));
    catalog.add_book("Dune", "Frank Herbert", None, 1);

    let err = catalog.save().unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }), "unexpected error: {err}");
}

#[test]
fn memory_store_honors_the_same_contract() {
    let store = MemorySnapshotStore::new();
    assert!(store.load::<Book>("books").unwrap().is_none());

    let book = Book::new("Dune", "Frank Herbert", None, 2);
    let mut records = BTreeMap::new();
    records.insert(book.id.to_string(), &book);
    store.save("books", &records).unwrap();
    assert!(store.contains("books"));

    let loaded = store.load::<Book>("books").unwrap().unwrap();
    let restored = loaded.get(&book.id.to_string()).unwrap();
    assert_eq!(restored.title, "Dune");
    assert_eq!(restored.total_copies, 2);

    store.put_raw("books", "{broken");
    let err = store.load::<Book>("books").unwrap_err();
    assert!(matches!(err, StoreError::Decode { .. }));
}
