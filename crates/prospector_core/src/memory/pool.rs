//! # Entity Pool
//!
//! Fixed-capacity slot array with a high-water mark.

use crate::error::{PoolError, PoolResult};

/// A fixed-capacity pool of entities.
///
/// Slots are handed out front to back. The pool tracks the highest slot ever
/// handed out (`last_active_index`) and every consumer iterates
/// `0..=last_active_index`. A slot inside that range may hold an entity that
/// is dead in game terms (a depleted asteroid); aliveness is a property of
/// the payload and is checked by the consumer.
///
/// Slots are never removed. [`EntityPool::recycle`] overwrites a slot with a
/// default value and bumps its generation so outstanding [`PoolHandle`]s
/// stop resolving.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. The simulation is single-threaded.
///
/// # Example
///
/// ```rust,ignore
/// let mut pool: EntityPool<Asteroid> = EntityPool::new(3);
///
/// // Allocate - O(1), no heap allocation
/// let (handle, asteroid) = pool.new_entity()?;
/// asteroid.resource_count = 25;
///
/// // Weak lookup - None once the slot is recycled
/// assert!(pool.resolve(handle).is_some());
/// ```
pub struct EntityPool<T> {
    /// The storage array, sized once.
    slots: Box<[T]>,
    /// Generation counter per slot.
    generations: Box<[u32]>,
    /// Highest occupied slot.
    last_active: Option<usize>,
}

/// Weak handle to a pooled entity.
///
/// Resolving a handle never panics: a handle whose slot was recycled (or
/// that belongs to another pool) simply resolves to `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    /// Index into the pool.
    index: usize,
    /// Slot generation at the time the handle was issued.
    generation: u32,
}

impl PoolHandle {
    /// Returns the slot index this handle points at.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl<T: Default> EntityPool<T> {
    /// Creates a new pool with the specified capacity.
    ///
    /// All memory is pre-allocated upfront.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let slots: Vec<T> = (0..capacity).map(|_| T::default()).collect();

        Self {
            slots: slots.into_boxed_slice(),
            generations: vec![0; capacity].into_boxed_slice(),
            last_active: None,
        }
    }

    /// Hands out the slot after the high-water mark.
    ///
    /// The slot is reset to `T::default()` before it is returned.
    /// This is a **O(1)** operation with **zero heap allocations**.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::PoolExhausted`] when the last slot is already
    /// active. The caller decides whether to drop the request or recycle an
    /// inactive entry.
    pub fn new_entity(&mut self) -> PoolResult<(PoolHandle, &mut T)> {
        let index = self.last_active.map_or(0, |last| last + 1);
        if index >= self.slots.len() {
            return Err(PoolError::PoolExhausted {
                capacity: self.slots.len(),
            });
        }

        self.last_active = Some(index);
        let handle = PoolHandle {
            index,
            generation: self.generations[index],
        };
        let slot = &mut self.slots[index];
        *slot = T::default();

        Ok((handle, slot))
    }

    /// Overwrites a slot with `T::default()` and invalidates its handles.
    ///
    /// The slot stays inside the iterated range; the high-water mark never
    /// shrinks. Returns `false` when the handle was already stale.
    pub fn recycle(&mut self, handle: PoolHandle) -> bool {
        if self.resolve(handle).is_none() {
            return false;
        }

        self.slots[handle.index] = T::default();
        self.generations[handle.index] = self.generations[handle.index].wrapping_add(1);
        true
    }
}

impl<T> EntityPool<T> {
    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the highest slot handed out so far, `None` when empty.
    #[inline]
    #[must_use]
    pub const fn last_active_index(&self) -> Option<usize> {
        self.last_active
    }

    /// Returns the number of slots in the iterated range.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.last_active.map_or(0, |last| last + 1)
    }

    /// Returns true if no slot was ever handed out.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.last_active.is_none()
    }

    /// Returns true if the next `new_entity` call would fail.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() == self.slots.len()
    }

    /// Bounds-checked access to an active slot.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::OutOfRange`] unless
    /// `index <= last_active_index`.
    #[inline]
    pub fn get(&self, index: usize) -> PoolResult<&T> {
        self.check_index(index)?;
        Ok(&self.slots[index])
    }

    /// Bounds-checked mutable access to an active slot.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::OutOfRange`] unless
    /// `index <= last_active_index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> PoolResult<&mut T> {
        self.check_index(index)?;
        Ok(&mut self.slots[index])
    }

    /// Returns the current handle for an active slot.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::OutOfRange`] unless
    /// `index <= last_active_index`.
    pub fn handle_at(&self, index: usize) -> PoolResult<PoolHandle> {
        self.check_index(index)?;
        Ok(PoolHandle {
            index,
            generation: self.generations[index],
        })
    }

    /// Resolves a weak handle.
    ///
    /// Returns `None` for handles outside the active range or whose slot has
    /// been recycled since the handle was issued.
    #[inline]
    #[must_use]
    pub fn resolve(&self, handle: PoolHandle) -> Option<&T> {
        if self.is_live(handle) {
            Some(&self.slots[handle.index])
        } else {
            None
        }
    }

    /// Resolves a weak handle mutably.
    #[inline]
    pub fn resolve_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if self.is_live(handle) {
            Some(&mut self.slots[handle.index])
        } else {
            None
        }
    }

    /// Iterates over every slot in `0..=last_active_index`.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots[..self.len()].iter()
    }

    /// Iterates mutably over every slot in `0..=last_active_index`.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        let len = self.len();
        self.slots[..len].iter_mut()
    }

    /// Iterates over `(handle, entity)` pairs in `0..=last_active_index`.
    pub fn iter_handles(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.slots[..self.len()]
            .iter()
            .zip(self.generations.iter())
            .enumerate()
            .map(|(index, (slot, &generation))| (PoolHandle { index, generation }, slot))
    }

    fn is_live(&self, handle: PoolHandle) -> bool {
        handle.index < self.len() && self.generations[handle.index] == handle.generation
    }

    fn check_index(&self, index: usize) -> PoolResult<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(PoolError::OutOfRange {
                index,
                last_active: self.last_active,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Rock {
        ore: u32,
    }

    #[test]
    fn test_pool_exhausts_at_capacity() {
        let mut pool: EntityPool<Rock> = EntityPool::new(3);

        for _ in 0..3 {
            assert!(pool.new_entity().is_ok());
        }
        assert_eq!(pool.last_active_index(), Some(2));
        assert!(pool.is_full());

        let err = pool.new_entity().unwrap_err();
        assert_eq!(err, PoolError::PoolExhausted { capacity: 3 });
        assert_eq!(pool.last_active_index(), Some(2));
    }

    #[test]
    fn test_empty_pool() {
        let pool: EntityPool<Rock> = EntityPool::new(4);
        assert!(pool.is_empty());
        assert_eq!(pool.last_active_index(), None);
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.iter().count(), 0);
        assert!(matches!(pool.get(0), Err(PoolError::OutOfRange { index: 0, .. })));
    }

    #[test]
    fn test_get_is_bounded_by_high_water_mark() {
        let mut pool: EntityPool<Rock> = EntityPool::new(8);
        let (_, rock) = pool.new_entity().unwrap();
        rock.ore = 7;
        pool.new_entity().unwrap();

        assert_eq!(pool.get(0).unwrap().ore, 7);
        assert!(pool.get(1).is_ok());
        assert_eq!(
            pool.get(2).unwrap_err(),
            PoolError::OutOfRange {
                index: 2,
                last_active: Some(1),
            }
        );
    }

    #[test]
    fn test_new_entity_resets_slot() {
        let mut pool: EntityPool<Rock> = EntityPool::new(2);
        let (_, rock) = pool.new_entity().unwrap();
        rock.ore = 99;

        let (handle, fresh) = pool.new_entity().unwrap();
        assert_eq!(fresh.ore, 0);
        assert_eq!(handle.index(), 1);
    }

    #[test]
    fn test_recycle_invalidates_handles_but_keeps_range() {
        let mut pool: EntityPool<Rock> = EntityPool::new(4);
        let (handle, rock) = pool.new_entity().unwrap();
        rock.ore = 10;
        pool.new_entity().unwrap();

        assert!(pool.recycle(handle));
        assert!(pool.resolve(handle).is_none());
        assert!(!pool.recycle(handle));

        // Dead slot is still iterated and reset to default
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(0).unwrap(), &Rock::default());

        let fresh = pool.handle_at(0).unwrap();
        assert_ne!(fresh, handle);
        assert!(pool.resolve(fresh).is_some());
    }

    #[test]
    fn test_iter_handles_cover_active_range() {
        let mut pool: EntityPool<Rock> = EntityPool::new(10);
        for ore in 0..4 {
            let (_, rock) = pool.new_entity().unwrap();
            rock.ore = ore;
        }

        let seen: Vec<u32> = pool.iter_handles().map(|(_, r)| r.ore).collect();
        assert_eq!(seen, vec![0, 1, 2, 3]);

        for rock in pool.iter_mut() {
            rock.ore += 1;
        }
        assert_eq!(pool.iter().map(|r| r.ore).sum::<u32>(), 10);
    }
}
