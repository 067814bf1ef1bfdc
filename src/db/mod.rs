// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod photo_repository;
pub mod response_repository;
pub mod review_repository;

pub use photo_repository::*;
pub use response_repository::*;
pub use review_repository::*;

/// Detect a unique-constraint violation in a driver error.
/// The storage constraints are the source of truth for the
/// one-review-per-booking and one-response-per-review invariants; concurrent
/// writers race to them, and the loser's error is translated here.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
