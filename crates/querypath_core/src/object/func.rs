//! Closure-backed query and command objects.
//!
//! Lets callers author one-off objects inline without declaring a type:
//!
//! ```
//! use querypath_core::{ContextRepository, Repository, ScalarFn};
//! use std::convert::Infallible;
//!
//! let context = 40_u32;
//! let repo = ContextRepository::new(&context);
//! let answer = ScalarFn::new(|ctx: &u32| Ok::<_, Infallible>(ctx + 2));
//! assert_eq!(repo.get(&answer), Ok(42));
//! ```

use super::{Command, Query, ScalarQuery};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// Scalar query wrapping `Fn(&C) -> Result<T, E>`.
pub struct ScalarFn<F, T, E> {
    run: F,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> ScalarFn<F, T, E> {
    pub fn new<C: ?Sized>(run: F) -> Self
    where
        F: Fn(&C) -> Result<T, E>,
    {
        Self {
            run,
            _marker: PhantomData,
        }
    }
}

impl<C: ?Sized, F, T, E> ScalarQuery<C> for ScalarFn<F, T, E>
where
    F: Fn(&C) -> Result<T, E>,
{
    type Output = T;
    type Error = E;

    fn execute(&self, context: &C) -> Result<T, E> {
        (self.run)(context)
    }
}

impl<F, T, E> Debug for ScalarFn<F, T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarFn").finish_non_exhaustive()
    }
}

/// Sequence query wrapping `Fn(&C) -> Result<I, E>` where `I: IntoIterator`.
///
/// The closure's result is converted with `into_iter()` and handed back as-is.
pub struct QueryFn<F, I, E> {
    run: F,
    _marker: PhantomData<fn() -> (I, E)>,
}

impl<F, I, E> QueryFn<F, I, E> {
    pub fn new<C: ?Sized>(run: F) -> Self
    where
        F: Fn(&C) -> Result<I, E>,
        I: IntoIterator,
    {
        Self {
            run,
            _marker: PhantomData,
        }
    }
}

impl<C: ?Sized, F, I, E> Query<C> for QueryFn<F, I, E>
where
    F: Fn(&C) -> Result<I, E>,
    I: IntoIterator,
{
    type Entity = I::Item;
    type Error = E;
    type Iter<'ctx> = I::IntoIter
    where
        Self: 'ctx,
        C: 'ctx;

    fn execute<'ctx>(&'ctx self, context: &'ctx C) -> Result<I::IntoIter, E> {
        (self.run)(context).map(IntoIterator::into_iter)
    }
}

impl<F, I, E> Debug for QueryFn<F, I, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryFn").finish_non_exhaustive()
    }
}

/// Command wrapping `Fn(&C) -> Result<(), E>`.
pub struct CommandFn<F, E> {
    run: F,
    _marker: PhantomData<fn() -> E>,
}

impl<F, E> CommandFn<F, E> {
    pub fn new<C: ?Sized>(run: F) -> Self
    where
        F: Fn(&C) -> Result<(), E>,
    {
        Self {
            run,
            _marker: PhantomData,
        }
    }
}

impl<C: ?Sized, F, E> Command<C> for CommandFn<F, E>
where
    F: Fn(&C) -> Result<(), E>,
{
    type Error = E;

    fn execute(&self, context: &C) -> Result<(), E> {
        (self.run)(context)
    }
}

impl<F, E> Debug for CommandFn<F, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandFn").finish_non_exhaustive()
    }
}
