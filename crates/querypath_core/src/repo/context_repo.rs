//! Context-bound repository adapter.
//!
//! # Responsibility
//! - Hold one data context reference for the adapter's lifetime.
//! - Execute scalar queries, sequence queries, and commands against it.
//!
//! # Invariants
//! - Every operation invokes the supplied object's `execute` exactly once.
//! - Sequences are returned without being iterated, buffered, or re-wrapped.
//! - Object errors reach the caller as the object's own error type.
//! - No transaction, retry, or caching is layered on top of the object.

use crate::object::{Command, Query, ScalarQuery};
use log::trace;
use std::any::type_name;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors raised by the repository itself, as opposed to its objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    MissingContext,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingContext => write!(f, "repository requires a data context"),
        }
    }
}

impl Error for RepoError {}

/// Uniform calling convention for data access through query/command objects.
pub trait Repository {
    type Context: ?Sized;

    /// Context every object is executed against.
    fn context(&self) -> &Self::Context;

    /// Executes a scalar query and returns its single value.
    fn get<Q>(&self, query: &Q) -> Result<Q::Output, Q::Error>
    where
        Q: ScalarQuery<Self::Context> + ?Sized;

    /// Executes a sequence query and returns its iterator untouched.
    fn find<'a, Q>(&'a self, query: &'a Q) -> Result<Q::Iter<'a>, Q::Error>
    where
        Q: Query<Self::Context> + ?Sized,
        Self::Context: 'a;

    /// Executes a command for its side effects.
    fn execute<Q>(&self, command: &Q) -> Result<(), Q::Error>
    where
        Q: Command<Self::Context> + ?Sized;
}

/// Repository that runs every object against one borrowed context.
///
/// The adapter is `Send`/`Sync` only when the context is `Sync`; a context
/// that cannot be shared keeps its repository on one thread as well.
pub struct ContextRepository<'ctx, C: ?Sized> {
    context: &'ctx C,
}

impl<'ctx, C: ?Sized> ContextRepository<'ctx, C> {
    pub fn new(context: &'ctx C) -> Self {
        Self { context }
    }

    /// Builds a repository from a context that may be absent.
    ///
    /// # Errors
    /// - Returns `RepoError::MissingContext` when `context` is `None`.
    pub fn try_new(context: Option<&'ctx C>) -> RepoResult<Self> {
        context.map(Self::new).ok_or(RepoError::MissingContext)
    }
}

impl<C: ?Sized> Repository for ContextRepository<'_, C> {
    type Context = C;

    fn context(&self) -> &C {
        self.context
    }

    fn get<Q>(&self, query: &Q) -> Result<Q::Output, Q::Error>
    where
        Q: ScalarQuery<C> + ?Sized,
    {
        trace!("event=repo_get module=repo query={}", type_name::<Q>());
        query.execute(self.context)
    }

    fn find<'a, Q>(&'a self, query: &'a Q) -> Result<Q::Iter<'a>, Q::Error>
    where
        Q: Query<C> + ?Sized,
        C: 'a,
    {
        trace!("event=repo_find module=repo query={}", type_name::<Q>());
        query.execute(self.context)
    }

    fn execute<Q>(&self, command: &Q) -> Result<(), Q::Error>
    where
        Q: Command<C> + ?Sized,
    {
        trace!(
            "event=repo_execute module=repo command={}",
            type_name::<Q>()
        );
        command.execute(self.context)
    }
}

impl<C: ?Sized> Clone for ContextRepository<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for ContextRepository<'_, C> {}

impl<C: ?Sized> Debug for ContextRepository<'_, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextRepository")
            .field("context", &type_name::<C>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextRepository, RepoError, Repository};
    use crate::object::{Command, Query, ScalarQuery};
    use std::cell::Cell;

    struct Session {
        id: u32,
    }

    struct SessionId {
        calls: Cell<u32>,
    }

    impl ScalarQuery<Session> for SessionId {
        type Output = u32;
        type Error = String;

        fn execute(&self, context: &Session) -> Result<u32, String> {
            self.calls.set(self.calls.get() + 1);
            Ok(context.id)
        }
    }

    /// Counts how many elements the caller actually pulls.
    struct Countdown {
        from: u32,
        pulled: Cell<u32>,
    }

    impl Query<Session> for Countdown {
        type Entity = u32;
        type Error = String;
        type Iter<'ctx> = Box<dyn Iterator<Item = u32> + 'ctx>;

        fn execute<'ctx>(&'ctx self, _context: &'ctx Session) -> Result<Self::Iter<'ctx>, String> {
            let pulled = &self.pulled;
            Ok(Box::new((1..=self.from).rev().inspect(move |_| {
                pulled.set(pulled.get() + 1);
            })))
        }
    }

    struct Reject;

    impl Command<Session> for Reject {
        type Error = &'static str;

        fn execute(&self, _context: &Session) -> Result<(), &'static str> {
            Err("read-only session")
        }
    }

    #[test]
    fn try_new_without_context_fails_fast() {
        let result = ContextRepository::<Session>::try_new(None);
        assert!(matches!(result, Err(RepoError::MissingContext)));
    }

    #[test]
    fn try_new_with_context_keeps_same_instance() {
        let session = Session { id: 7 };
        let repo = ContextRepository::try_new(Some(&session)).unwrap();
        assert!(std::ptr::eq(repo.context(), &session));
    }

    #[test]
    fn get_passes_held_context_and_calls_once() {
        let session = Session { id: 42 };
        let repo = ContextRepository::new(&session);
        let query = SessionId {
            calls: Cell::new(0),
        };

        assert_eq!(repo.get(&query), Ok(42));
        assert_eq!(query.calls.get(), 1);
    }

    #[test]
    fn find_does_not_pull_elements() {
        let session = Session { id: 1 };
        let repo = ContextRepository::new(&session);
        let query = Countdown {
            from: 3,
            pulled: Cell::new(0),
        };

        let iter = repo.find(&query).unwrap();
        assert_eq!(query.pulled.get(), 0);

        let items: Vec<u32> = iter.collect();
        assert_eq!(items, vec![3, 2, 1]);
        assert_eq!(query.pulled.get(), 3);
    }

    #[test]
    fn execute_surfaces_command_error_unchanged() {
        let session = Session { id: 1 };
        let repo = ContextRepository::new(&session);
        assert_eq!(repo.execute(&Reject), Err("read-only session"));
    }

    #[test]
    fn copies_share_the_context() {
        let session = Session { id: 9 };
        let repo = ContextRepository::new(&session);
        let copy = repo;
        assert!(std::ptr::eq(repo.context(), copy.context()));
    }
}
