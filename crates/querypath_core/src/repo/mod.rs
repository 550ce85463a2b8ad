//! Repository layer: the single dispatch point for data access.
//!
//! # Responsibility
//! - Route prebuilt query/command objects to one held data context.
//! - Keep callers independent of the persistence technology behind it.
//!
//! # Invariants
//! - Object results and object errors pass through unchanged.
//! - The repository borrows its context and never manages its lifecycle.

pub mod context_repo;
