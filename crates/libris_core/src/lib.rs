//! Core domain logic for the libris catalog manager.
//! This crate is the single source of truth for business invariants.

pub mod catalog;
pub mod logging;
pub mod model;
pub mod store;

pub use catalog::{
    Catalog, CatalogError, CatalogResult, DAILY_FINE_RATE, LOAN_PERIOD_DAYS, MAX_ACTIVE_LOANS,
};
pub use logging::{default_log_level, init_logging};
pub use model::book::{Book, BookId};
pub use model::loan::{Loan, LoanId};
pub use model::member::{Member, MemberId};
pub use store::{
    JsonSnapshotStore, MemorySnapshotStore, SnapshotStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
