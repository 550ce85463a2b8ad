//! In-memory data context.
//!
//! # Responsibility
//! - Provide a persistence-free context for query/command objects.
//! - Keep one insertion-ordered set per entity type.
//!
//! # Invariants
//! - A set stored under `TypeId::of::<T>()` always holds `Vec<T>`.
//! - Mutation goes through `&self`; the context is single-threaded (`!Sync`).
//! - No `RefCell` borrow is held while caller code runs, so objects may
//!   re-enter the context from predicates or `Clone` impls.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};

/// Typed entity sets held in process memory.
#[derive(Default)]
pub struct InMemoryContext {
    sets: RefCell<HashMap<TypeId, Box<dyn Any>>>,
}

impl InMemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entity` to the set of its type.
    pub fn add<T: 'static>(&self, entity: T) {
        let mut sets = self.sets.borrow_mut();
        let set = sets
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Vec::<T>::new()) as Box<dyn Any>);
        if let Some(set) = set.downcast_mut::<Vec<T>>() {
            set.push(entity);
        }
    }

    /// Returns a snapshot of every entity of type `T`, in insertion order.
    pub fn all<T: Clone + 'static>(&self) -> Vec<T> {
        let set = self.detach::<T>();
        let snapshot = set.clone();
        self.reattach(set);
        snapshot
    }

    /// Returns the number of stored entities of type `T`.
    pub fn count<T: 'static>(&self) -> usize {
        self.sets
            .borrow()
            .get(&TypeId::of::<T>())
            .and_then(|set| set.downcast_ref::<Vec<T>>())
            .map_or(0, Vec::len)
    }

    /// Removes entities of type `T` matching `predicate`; returns how many.
    ///
    /// The set of `T` is detached while `predicate` runs: reading it from the
    /// predicate sees no entities of `T`, and entities of `T` added meanwhile
    /// are kept after the surviving ones.
    pub fn remove_where<T: 'static>(&self, predicate: impl Fn(&T) -> bool) -> usize {
        let mut set = self.detach::<T>();
        let before = set.len();
        set.retain(|entity| !predicate(entity));
        let removed = before - set.len();
        self.reattach(set);
        removed
    }

    /// Drops every stored entity of every type.
    pub fn clear(&self) {
        self.sets.borrow_mut().clear();
    }

    // No borrow of `sets` may be held while caller code (predicates, `Clone`)
    // runs, since that code can re-enter the context.
    fn detach<T: 'static>(&self) -> Vec<T> {
        self.sets
            .borrow_mut()
            .get_mut(&TypeId::of::<T>())
            .and_then(|set| set.downcast_mut::<Vec<T>>())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    fn reattach<T: 'static>(&self, mut set: Vec<T>) {
        if set.is_empty() {
            return;
        }
        let mut sets = self.sets.borrow_mut();
        let slot = sets
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Vec::<T>::new()) as Box<dyn Any>);
        if let Some(current) = slot.downcast_mut::<Vec<T>>() {
            set.append(current);
            *current = set;
        }
    }
}

impl Debug for InMemoryContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryContext")
            .field("entity_types", &self.sets.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryContext;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag(&'static str);

    #[test]
    fn sets_are_separated_by_type() {
        let context = InMemoryContext::new();
        context.add(Tag("rust"));
        context.add(7_u64);
        context.add(Tag("sql"));

        assert_eq!(context.all::<Tag>(), vec![Tag("rust"), Tag("sql")]);
        assert_eq!(context.all::<u64>(), vec![7]);
        assert_eq!(context.count::<String>(), 0);
    }

    #[test]
    fn remove_where_reports_removed_count() {
        let context = InMemoryContext::new();
        for value in 1..=5_u32 {
            context.add(value);
        }

        assert_eq!(context.remove_where(|value: &u32| value % 2 == 0), 2);
        assert_eq!(context.all::<u32>(), vec![1, 3, 5]);
        assert_eq!(context.remove_where(|_: &i8| true), 0);
    }

    #[test]
    fn remove_where_predicate_may_reenter_context() {
        let context = InMemoryContext::new();
        context.add(1_u32);
        context.add(2_u32);

        let removed = context.remove_where(|value: &u32| {
            context.add(Tag("seen"));
            *value as usize == context.count::<u32>() || context.all::<u32>().contains(value)
        });

        assert_eq!(removed, 0);
        assert_eq!(context.all::<u32>(), vec![1, 2]);
        assert_eq!(context.count::<Tag>(), 2);
    }

    #[test]
    fn entities_added_during_remove_where_follow_survivors() {
        let context = InMemoryContext::new();
        for value in 1..=4_u32 {
            context.add(value);
        }

        let removed = context.remove_where(|value: &u32| {
            if *value == 4 {
                context.add(10_u32);
            }
            value % 2 == 0
        });

        assert_eq!(removed, 2);
        assert_eq!(context.all::<u32>(), vec![1, 3, 10]);
    }

    #[test]
    fn all_tolerates_clone_that_writes_to_context() {
        struct Linked {
            context: Rc<InMemoryContext>,
        }

        impl Clone for Linked {
            fn clone(&self) -> Self {
                self.context.add(Tag("cloned"));
                Self {
                    context: Rc::clone(&self.context),
                }
            }
        }

        let context = Rc::new(InMemoryContext::new());
        context.add(Linked {
            context: Rc::clone(&context),
        });

        assert_eq!(context.all::<Linked>().len(), 1);
        assert_eq!(context.count::<Linked>(), 1);
        assert_eq!(context.all::<Tag>(), vec![Tag("cloned")]);

        context.clear();
    }

    #[test]
    fn clear_drops_every_set() {
        let context = InMemoryContext::new();
        context.add(Tag("a"));
        context.add(1_i32);
        context.clear();

        assert_eq!(context.count::<Tag>(), 0);
        assert_eq!(context.count::<i32>(), 0);
    }
}
