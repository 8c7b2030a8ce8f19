//! # Queries
//!
//! Masked traversals over the entity table in ascending id order.
//!
//! [`Query`] borrows the store and is a plain [`Iterator`]. [`QueryCursor`]
//! holds no borrow, so callers can mutate components between steps.
//!
//! Adding entities or components while a traversal is in progress has
//! unspecified effects on that traversal. A cursor snapshots the id range
//! when it is created and never visits entities created afterwards, but it
//! does observe mask changes on entities it has not reached yet.

use super::entity::{Entity, EntityId};
use super::mask::ComponentMask;
use super::store::EntityStore;

/// Lazy, restartable iterator over the entities matching a mask.
#[derive(Clone, Debug)]
pub struct Query<'a> {
    entities: &'a [Entity],
    required: ComponentMask,
    next: usize,
}

impl<'a> Query<'a> {
    pub(crate) fn new(entities: &'a [Entity], required: ComponentMask) -> Self {
        Self {
            entities,
            required,
            next: 0,
        }
    }

    /// A query that yields nothing.
    pub(crate) fn empty() -> Self {
        Self::new(&[], ComponentMask::EMPTY)
    }

    /// Returns the mask this query filters by.
    #[inline]
    #[must_use]
    pub const fn required(&self) -> ComponentMask {
        self.required
    }

    /// Rewinds the query to the first entity.
    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for Query<'_> {
    type Item = EntityId;

    fn next(&mut self) -> Option<EntityId> {
        while let Some(entity) = self.entities.get(self.next) {
            self.next += 1;
            if entity.matches(self.required) {
                return Some(entity.id);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entities.len().saturating_sub(self.next)))
    }
}

impl std::iter::FusedIterator for Query<'_> {}

/// Detached traversal over the entities matching a mask.
///
/// # Example
///
/// ```rust
/// use junction_core::ecs::{EntityStore, Position, Velocity};
///
/// let mut store = EntityStore::new();
/// let e = store.create_entity();
/// store.add_component(e, Position::new(0.0, 0.0));
/// store.add_component(e, Velocity::new(1.0, 2.0));
///
/// let mut cursor = store.cursor_of::<(Position, Velocity)>();
/// while let Some(id) = cursor.next(&store) {
///     let velocity = *store.get_component::<Velocity>(id).unwrap();
///     store.get_component_mut::<Position>(id).unwrap().integrate(velocity, 1.0);
/// }
///
/// assert_eq!(store.get_component::<Position>(e), Some(&Position::new(1.0, 2.0)));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct QueryCursor {
    required: ComponentMask,
    next: usize,
    end: usize,
}

impl QueryCursor {
    pub(crate) const fn new(required: ComponentMask, end: usize) -> Self {
        Self {
            required,
            next: 0,
            end,
        }
    }

    /// Returns the next matching entity, or `None` once the snapshot range is exhausted.
    pub fn next(&mut self, store: &EntityStore) -> Option<EntityId> {
        while self.next < self.end {
            let index = self.next;
            self.next += 1;
            if let Some(entity) = store.entity_at(index) {
                if entity.matches(self.required) {
                    return Some(entity.id);
                }
            }
        }
        None
    }

    /// Rewinds the cursor to the first entity, keeping the snapshot range.
    pub fn restart(&mut self) {
        self.next = 0;
    }

    /// Returns the number of entity slots this cursor covers.
    #[inline]
    #[must_use]
    pub const fn range_len(&self) -> usize {
        self.end
    }
}
