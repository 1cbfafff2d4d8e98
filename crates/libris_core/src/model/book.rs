//! Book record and copy accounting.
//!
//! # Responsibility
//! - Hold the catalog entry for one title with its copy counts.
//! - Enforce the copy invariant on every mutation path.
//!
//! # Invariants
//! - `id` is stable and never reused for another book.
//! - `0 <= available_copies <= total_copies` after any operation.
//! - `total_copies >= 1` after construction and after `set_total_copies`.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Stable identifier for a book record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BookId = Uuid;

/// One title in the catalog, with total and currently available copy counts.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Stable id used by loans to reference this book.
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Optional and not enforced unique across the catalog.
    pub isbn: Option<String>,
    /// Copies the library owns. Always at least 1.
    pub total_copies: u32,
    /// Copies currently on the shelf. Never exceeds `total_copies`.
    pub available_copies: u32,
}

impl Book {
    /// Creates a book with a generated id and all copies available.
    ///
    /// Requested `copies` below 1 are clamped to 1.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: Option<String>,
        copies: u32,
    ) -> Self {
        let copies = copies.max(1);
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
            isbn,
            total_copies: copies,
            available_copies: copies,
        }
    }

    /// Takes one copy off the shelf.
    ///
    /// Returns `true` and decrements availability iff a copy is available;
    /// otherwise returns `false` without mutating anything.
    pub fn borrow_one(&mut self) -> bool {
        if self.available_copies > 0 {
            self.available_copies -= 1;
            true
        } else {
            false
        }
    }

    /// Puts one copy back on the shelf.
    ///
    /// No-op when all copies are already available. Double-return at the
    /// loan level is rejected by the catalog; this guard only keeps the
    /// copy invariant intact.
    pub fn return_one(&mut self) {
        if self.available_copies < self.total_copies {
            self.available_copies += 1;
        }
    }

    /// Changes the owned copy count, shifting availability by the same delta.
    ///
    /// Ignored when `total` is below 1. Shrinking the total can drive
    /// availability to 0 but never below it.
    pub fn set_total_copies(&mut self, total: u32) {
        if total < 1 {
            return;
        }
        let delta = i64::from(total) - i64::from(self.total_copies);
        let available = i64::from(self.available_copies) + delta;
        self.total_copies = total;
        self.available_copies = available.max(0) as u32;
    }

    /// Case-insensitive substring match on title, author, or isbn.
    pub fn matches_keyword(&self, keyword_lower: &str) -> bool {
        self.title.to_lowercase().contains(keyword_lower)
            || self.author.to_lowercase().contains(keyword_lower)
            || self
                .isbn
                .as_deref()
                .is_some_and(|isbn| isbn.to_lowercase().contains(keyword_lower))
    }
}

// Identity semantics: two books are the same record iff ids match, so a
// title edit in place never splits or merges map/set entries.
impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
