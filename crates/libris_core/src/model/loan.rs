//! Loan record and overdue/fine arithmetic.
//!
//! # Responsibility
//! - Record one lending of one book copy to one member.
//! - Compute days overdue and the resulting fine.
//!
//! # Invariants
//! - `book_id` and `member_id` are soft references; resolution happens in the
//!   catalog at the time of use.
//! - `due_date` is fixed at issue time and never changes.
//! - Once `return_date` is set it is immutable; the catalog rejects a second
//!   return before calling `mark_returned` again.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

use super::book::BookId;
use super::member::MemberId;

/// Stable identifier for a loan record.
pub type LoanId = Uuid;

/// One lending of a book copy. Outstanding while `return_date` is `None`.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    /// Book referenced by id; the book may be looked up lazily.
    pub book_id: BookId,
    /// Member referenced by id; existence is not enforced here.
    pub member_id: MemberId,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    /// `None` while the loan is outstanding.
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    /// Creates an outstanding loan with a generated id.
    pub fn new(book_id: BookId, member_id: MemberId, issue_date: NaiveDate, due_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id,
            member_id,
            issue_date,
            due_date,
            return_date: None,
        }
    }

    /// Returns whether the loan has not been returned yet.
    pub fn is_outstanding(&self) -> bool {
        self.return_date.is_none()
    }

    /// Stamps the return date.
    ///
    /// The catalog guarantees at most one call per loan; this setter does not
    /// re-check.
    pub fn mark_returned(&mut self, date: NaiveDate) {
        self.return_date = Some(date);
    }

    /// Whole days past the due date as of the effective date.
    ///
    /// The effective date is the return date once set, otherwise `as_of`.
    /// Never negative; on or before the due date yields 0.
    pub fn days_overdue(&self, as_of: NaiveDate) -> i64 {
        let effective = self.return_date.unwrap_or(as_of);
        (effective - self.due_date).num_days().max(0)
    }

    /// Fine owed as of the effective date, at `daily_rate` per overdue day.
    ///
    /// Frozen after return, since the effective date stops moving.
    pub fn fine(&self, as_of: NaiveDate, daily_rate: u64) -> u64 {
        self.days_overdue(as_of) as u64 * daily_rate
    }
}

impl PartialEq for Loan {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Loan {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
