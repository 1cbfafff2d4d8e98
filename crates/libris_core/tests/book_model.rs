use libris_core::Book;

#[test]
fn new_book_starts_fully_available() {
    let book = Book::new("Dune", "Frank Herbert", Some("9780441172719".to_string()), 3);
    assert_eq!(book.total_copies, 3);
    assert_eq!(book.available_copies, 3);
    assert!(!book.id.is_nil());
}

#[test]
fn new_book_clamps_zero_copies_to_one() {
    let book = Book::new("Dune", "Frank Herbert", None, 0);
    assert_eq!(book.total_copies, 1);
    assert_eq!(book.available_copies, 1);
}

#[test]
fn borrow_one_fails_without_mutation_at_zero() {
    let mut book = Book::new("Dune", "Frank Herbert", None, 2);
    assert!(book.borrow_one());
    assert!(book.borrow_one());
    assert_eq!(book.available_copies, 0);

    assert!(!book.borrow_one());
    assert_eq!(book.available_copies, 0);
    assert_eq!(book.total_copies, 2);
}

#[test]
fn return_one_never_exceeds_total() {
    let mut book = Book::new("Dune", "Frank Herbert", None, 2);
    book.return_one();
    assert_eq!(book.available_copies, 2);

    assert!(book.borrow_one());
    book.return_one();
    book.return_one();
    assert_eq!(book.available_copies, 2);
}

#[test]
fn set_total_copies_grows_availability_by_delta() {
    let mut book = Book::new("Dune", "Frank Herbert", None, 2);
    assert!(book.borrow_one());

    book.set_total_copies(5);
    assert_eq!(book.total_copies, 5);
    assert_eq!(book.available_copies, 4);
}

#[test]
fn set_total_copies_shrink_floors_availability_at_zero() {
    let mut book = Book::new("Dune", "Frank Herbert", None, 5);
    assert!(book.borrow_one());
    assert!(book.borrow_one());
    assert!(book.borrow_one());
    assert!(book.borrow_one());
    // 5 total, 1 available, 4 out on loan.

    book.set_total_copies(2);
    assert_eq!(book.total_copies, 2);
    assert_eq!(book.available_copies, 0);
}

#[test]
fn set_total_copies_ignores_zero() {
    let mut book = Book::new("Dune", "Frank Herbert", None, 3);
    book.set_total_copies(0);
    assert_eq!(book.total_copies, 3);
    assert_eq!(book.available_copies, 3);
}

#[test]
fn availability_stays_in_bounds_across_mixed_sequence() {
    let mut book = Book::new("Dune", "Frank Herbert", None, 3);
    let steps: &[fn(&mut Book)] = &[
        |b| {
            b.borrow_one();
        },
        |b| b.return_one(),
        |b| {
            b.borrow_one();
        },
        |b| {
            b.borrow_one();
        },
        |b| b.set_total_copies(1),
        |b| b.return_one(),
        |b| b.set_total_copies(4),
        |b| {
            b.borrow_one();
        },
        |b| b.return_one(),
        |b| b.return_one(),
    ];

    for step in steps {
        step(&mut book);
        assert!(
            book.available_copies <= book.total_copies,
            "available {} exceeded total {}",
            book.available_copies,
            book.total_copies
        );
        assert!(book.total_copies >= 1);
    }
}

#[test]
fn equality_is_by_id_not_by_fields() {
    let book = Book::new("Dune", "Frank Herbert", None, 1);
    let mut renamed = book.clone();
    renamed.title = "Dune Messiah".to_string();
    assert_eq!(book, renamed);

    let twin = Book::new("Dune", "Frank Herbert", None, 1);
    assert_ne!(book, twin);
}
