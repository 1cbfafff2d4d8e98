//! Catalog: owner of all book, member, and loan collections.
//!
//! # Responsibility
//! - Provide the business operations over the three collections.
//! - Enforce cross-entity invariants: copy accounting on issue/return,
//!   the per-member loan cap, and active-loan deletion blocks.
//! - Drive snapshot persistence through an injected [`SnapshotStore`].
//!
//! # Invariants
//! - Collections keep insertion order; listing never reorders.
//! - A loan transitions Outstanding -> Returned exactly once.
//! - Books and members with an outstanding loan cannot be removed.
//! - Single-threaded by design: every check-then-act sequence below assumes
//!   no interleaved caller.

use crate::model::book::{Book, BookId};
use crate::model::loan::{Loan, LoanId};
use crate::model::member::{Member, MemberId};
use crate::store::{SnapshotStore, StoreResult};
use chrono::{Days, Local, NaiveDate};
use log::{info, warn};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Days a member may keep a book before it is overdue.
pub const LOAN_PERIOD_DAYS: u64 = 14;
/// Outstanding loans one member may hold at the same time.
pub const MAX_ACTIVE_LOANS: usize = 5;
/// Fine per whole day overdue, in currency units.
pub const DAILY_FINE_RATE: u64 = 5;

const BOOKS_SNAPSHOT: &str = "books";
const MEMBERS_SNAPSHOT: &str = "members";
const LOANS_SNAPSHOT: &str = "loans";

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Business-rule failure of a catalog operation.
///
/// These are expected outcomes, not faults: the caller decides how to
/// present them and the catalog state is left untouched by the failed call.
#[derive(Debug)]
pub enum CatalogError {
    BookNotFound(BookId),
    MemberNotFound(MemberId),
    LoanNotFound(LoanId),
    /// Every copy of the book is currently lent out.
    NoCopiesAvailable(BookId),
    /// The member already holds the maximum number of outstanding loans.
    LoanLimitReached(MemberId),
    /// The book is referenced by at least one outstanding loan.
    BookHasActiveLoans(BookId),
    /// The member is referenced by at least one outstanding loan.
    MemberHasActiveLoans(MemberId),
    /// The loan has already been returned; the return date is immutable.
    AlreadyReturned(LoanId),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::MemberNotFound(id) => write!(f, "member not found: {id}"),
            Self::LoanNotFound(id) => write!(f, "loan not found: {id}"),
            Self::NoCopiesAvailable(id) => write!(f, "no copies available for book {id}"),
            Self::LoanLimitReached(id) => write!(
                f,
                "member {id} already holds {MAX_ACTIVE_LOANS} outstanding loans"
            ),
            Self::BookHasActiveLoans(id) => {
                write!(f, "book {id} has outstanding loans and cannot be removed")
            }
            Self::MemberHasActiveLoans(id) => {
                write!(f, "member {id} has outstanding loans and cannot be removed")
            }
            Self::AlreadyReturned(id) => write!(f, "loan {id} was already returned"),
        }
    }
}

impl Error for CatalogError {}

/// In-memory catalog over an injected snapshot store.
///
/// One owned instance is passed explicitly to the shell; there is no ambient
/// global state, so the catalog is testable without a live process.
pub struct Catalog<S: SnapshotStore> {
    store: S,
    books: Vec<Book>,
    members: Vec<Member>,
    loans: Vec<Loan>,
}

impl<S: SnapshotStore> Catalog<S> {
    /// Creates an empty catalog backed by the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            books: Vec::new(),
            members: Vec::new(),
            loans: Vec::new(),
        }
    }

    // ---- books ----

    /// Registers a new book; always succeeds.
    ///
    /// `copies` below 1 are clamped to 1 and all copies start available.
    pub fn add_book(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: Option<String>,
        copies: u32,
    ) -> BookId {
        let book = Book::new(title, author, isbn, copies);
        let id = book.id;
        info!(
            "event=add_book module=catalog status=ok book_id={} copies={}",
            id, book.total_copies
        );
        self.books.push(book);
        id
    }

    /// Removes a book unless an outstanding loan still references it.
    pub fn remove_book(&mut self, id: BookId) -> CatalogResult<()> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(CatalogError::BookNotFound(id))?;
        if self
            .loans
            .iter()
            .any(|loan| loan.book_id == id && loan.is_outstanding())
        {
            return Err(CatalogError::BookHasActiveLoans(id));
        }
        self.books.remove(index);
        info!("event=remove_book module=catalog status=ok book_id={id}");
        Ok(())
    }

    /// All books in insertion order.
    pub fn list_books(&self) -> &[Book] {
        &self.books
    }

    /// Case-insensitive substring search over title, author, and isbn.
    ///
    /// Matches come back in catalog insertion order; no matches is an empty
    /// result, not a failure.
    pub fn search_books(&self, keyword: &str) -> Vec<&Book> {
        let keyword_lower = keyword.to_lowercase();
        self.books
            .iter()
            .filter(|book| book.matches_keyword(&keyword_lower))
            .collect()
    }

    /// Looks up one book by id.
    pub fn find_book(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Replaces a book's owned copy count, shifting availability by the same
    /// delta (floored at 0). Counts below 1 are ignored by the book itself.
    pub fn set_book_copies(&mut self, id: BookId, total: u32) -> CatalogResult<()> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(CatalogError::BookNotFound(id))?;
        book.set_total_copies(total);
        Ok(())
    }

    // ---- members ----

    /// Registers a new member; always succeeds.
    pub fn add_member(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> MemberId {
        let member = Member::new(name, email, phone);
        let id = member.id;
        info!("event=add_member module=catalog status=ok member_id={id}");
        self.members.push(member);
        id
    }

    /// Removes a member unless an outstanding loan still references them.
    pub fn remove_member(&mut self, id: MemberId) -> CatalogResult<()> {
        let index = self
            .members
            .iter()
            .position(|member| member.id == id)
            .ok_or(CatalogError::MemberNotFound(id))?;
        if self
            .loans
            .iter()
            .any(|loan| loan.member_id == id && loan.is_outstanding())
        {
            return Err(CatalogError::MemberHasActiveLoans(id));
        }
        self.members.remove(index);
        info!("event=remove_member module=catalog status=ok member_id={id}");
        Ok(())
    }

    /// All members in insertion order.
    pub fn list_members(&self) -> &[Member] {
        &self.members
    }

    /// Looks up one member by id.
    pub fn find_member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    // ---- loans ----

    /// Issues a book to a member, due [`LOAN_PERIOD_DAYS`] from today.
    pub fn issue_book(&mut self, book_id: BookId, member_id: MemberId) -> CatalogResult<Loan> {
        self.issue_book_at(book_id, member_id, today())
    }

    /// Date-explicit form of [`Self::issue_book`].
    ///
    /// # Contract
    /// - Fails with `BookNotFound` for an unknown book id.
    /// - Fails with `NoCopiesAvailable` when every copy is lent out.
    /// - Fails with `LoanLimitReached` when the member already holds
    ///   [`MAX_ACTIVE_LOANS`] outstanding loans.
    /// - The member id is a soft reference and is not required to resolve.
    /// - On success one copy is taken and the created loan is returned.
    pub fn issue_book_at(
        &mut self,
        book_id: BookId,
        member_id: MemberId,
        today: NaiveDate,
    ) -> CatalogResult<Loan> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == book_id)
            .ok_or(CatalogError::BookNotFound(book_id))?;
        if book.available_copies == 0 {
            return Err(CatalogError::NoCopiesAvailable(book_id));
        }
        let active = self
            .loans
            .iter()
            .filter(|loan| loan.member_id == member_id && loan.is_outstanding())
            .count();
        if active >= MAX_ACTIVE_LOANS {
            return Err(CatalogError::LoanLimitReached(member_id));
        }

        // All checks passed; from here the operation must complete.
        book.borrow_one();
        let due_date = today + Days::new(LOAN_PERIOD_DAYS);
        let loan = Loan::new(book_id, member_id, today, due_date);
        info!(
            "event=issue_book module=catalog status=ok loan_id={} book_id={} member_id={} due_date={}",
            loan.id, book_id, member_id, due_date
        );
        self.loans.push(loan.clone());
        Ok(loan)
    }

    /// Returns a loaned book and reports the fine as of today.
    pub fn return_book(&mut self, loan_id: LoanId) -> CatalogResult<u64> {
        self.return_book_at(loan_id, today())
    }

    /// Date-explicit form of [`Self::return_book`].
    ///
    /// # Contract
    /// - Fails with `LoanNotFound` for an unknown loan id.
    /// - Fails with `AlreadyReturned` when the return date is already set;
    ///   book availability is not touched in that case.
    /// - On success stamps the return date, puts the copy back on the shelf
    ///   (tolerating a book that no longer exists), and returns the fine.
    pub fn return_book_at(&mut self, loan_id: LoanId, today: NaiveDate) -> CatalogResult<u64> {
        let loan = self
            .loans
            .iter_mut()
            .find(|loan| loan.id == loan_id)
            .ok_or(CatalogError::LoanNotFound(loan_id))?;
        if !loan.is_outstanding() {
            return Err(CatalogError::AlreadyReturned(loan_id));
        }

        loan.mark_returned(today);
        let book_id = loan.book_id;
        let fine = loan.fine(today, DAILY_FINE_RATE);

        // Removal is blocked while loans are outstanding, so the book should
        // always resolve; a missing one is tolerated rather than fatal.
        if let Some(book) = self.books.iter_mut().find(|book| book.id == book_id) {
            book.return_one();
        }

        info!(
            "event=return_book module=catalog status=ok loan_id={loan_id} book_id={book_id} fine={fine}"
        );
        Ok(fine)
    }

    /// All loans, or only the outstanding ones, in insertion order.
    pub fn list_loans(&self, only_active: bool) -> Vec<&Loan> {
        self.loans
            .iter()
            .filter(|loan| !only_active || loan.is_outstanding())
            .collect()
    }

    /// Fine owed on a loan as of today; 0 for an unknown id.
    pub fn compute_fine(&self, loan_id: LoanId) -> u64 {
        self.compute_fine_at(loan_id, today())
    }

    /// Date-explicit form of [`Self::compute_fine`].
    pub fn compute_fine_at(&self, loan_id: LoanId, as_of: NaiveDate) -> u64 {
        self.loans
            .iter()
            .find(|loan| loan.id == loan_id)
            .map(|loan| loan.fine(as_of, DAILY_FINE_RATE))
            .unwrap_or(0)
    }

    // ---- persistence ----

    /// Persists the three collections as named snapshots.
    ///
    /// The three writes are independent; a failure part-way through leaves
    /// earlier snapshots written. Errors propagate to the caller.
    pub fn save(&self) -> StoreResult<()> {
        self.store.save(BOOKS_SNAPSHOT, &keyed(&self.books, |b| b.id.to_string()))?;
        self.store.save(MEMBERS_SNAPSHOT, &keyed(&self.members, |m| m.id.to_string()))?;
        self.store.save(LOANS_SNAPSHOT, &keyed(&self.loans, |l| l.id.to_string()))?;
        info!(
            "event=catalog_save module=catalog status=ok books={} members={} loans={}",
            self.books.len(),
            self.members.len(),
            self.loans.len()
        );
        Ok(())
    }

    /// Loads the three named snapshots, replacing each in-memory collection
    /// for which a snapshot exists.
    ///
    /// # Contract
    /// - A present snapshot replaces its collection wholesale.
    /// - A missing snapshot leaves its collection untouched.
    /// - I/O and decode failures are swallowed after a warning; the catalog
    ///   continues with the state it had.
    pub fn load(&mut self) {
        if let Some(books) = load_collection::<S, Book>(&self.store, BOOKS_SNAPSHOT) {
            self.books = books;
        }
        if let Some(members) = load_collection::<S, Member>(&self.store, MEMBERS_SNAPSHOT) {
            self.members = members;
        }
        if let Some(loans) = load_collection::<S, Loan>(&self.store, LOANS_SNAPSHOT) {
            self.loans = loans;
        }
        info!(
            "event=catalog_load module=catalog status=ok books={} members={} loans={}",
            self.books.len(),
            self.members.len(),
            self.loans.len()
        );
    }
}

/// Today in the process-local calendar.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn keyed<T, F: Fn(&T) -> String>(records: &[T], key: F) -> BTreeMap<String, &T> {
    records.iter().map(|record| (key(record), record)).collect()
}

fn load_collection<S: SnapshotStore, T: DeserializeOwned>(
    store: &S,
    name: &str,
) -> Option<Vec<T>> {
    match store.load::<T>(name) {
        Ok(Some(records)) => Some(records.into_values().collect()),
        Ok(None) => None,
        Err(err) => {
            warn!("event=catalog_load module=catalog status=error name={name} error={err}");
            None
        }
    }
}
