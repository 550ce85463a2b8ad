//! Query and command object contracts.
//!
//! # Responsibility
//! - Define the capability traits every reusable data-access unit implements.
//! - Keep the context type opaque: objects decide what they do with it.
//!
//! # Invariants
//! - Each object declares its own `Error`; callers see it unwrapped.
//! - `execute` is the single entry point of every object.
//!
//! # See also
//! - `crate::repo::context_repo` for the adapter that dispatches objects.

pub mod func;
pub mod sql;

/// Read operation that yields exactly one value from a context.
pub trait ScalarQuery<C: ?Sized> {
    type Output;
    type Error;

    /// Runs the query against `context`.
    fn execute(&self, context: &C) -> Result<Self::Output, Self::Error>;
}

/// Read operation that yields a sequence of entities from a context.
///
/// The returned iterator may borrow both the query and the context, so an
/// implementation is free to stay lazy instead of materializing results.
pub trait Query<C: ?Sized> {
    type Entity;
    type Error;
    type Iter<'ctx>: Iterator<Item = Self::Entity>
    where
        Self: 'ctx,
        C: 'ctx;

    /// Runs the query against `context`.
    fn execute<'ctx>(&'ctx self, context: &'ctx C) -> Result<Self::Iter<'ctx>, Self::Error>;
}

/// Write operation run for its side effects on a context.
pub trait Command<C: ?Sized> {
    type Error;

    /// Runs the command against `context`.
    fn execute(&self, context: &C) -> Result<(), Self::Error>;
}
