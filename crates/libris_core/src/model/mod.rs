//! Domain records for the catalog: books, members, loans.
//!
//! # Responsibility
//! - Define the canonical data shapes owned by the catalog.
//! - Keep per-record behavior (copy accounting, fine math) next to the data.
//!
//! # Invariants
//! - Every record is identified by a stable id; equality and hashing compare
//!   ids only, never mutable attributes.
//! - Loans reference books and members by id value, not by ownership.

pub mod book;
pub mod loan;
pub mod member;
