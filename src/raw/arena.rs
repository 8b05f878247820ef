use alloc::vec::Vec;

use super::handle::Handle;
use crate::error::{Error, Result};

/// Slot pool that owns every node of a tree.
///
/// This is the allocator boundary: [`try_alloc`](Self::try_alloc) acquires a slot and moves
/// the element into it in one step, [`take`](Self::take) moves it out and releases the slot.
/// Freed slots are recycled, so handles of live elements never move.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    #[cfg(test)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes room for `additional` more elements without further allocation.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let needed = additional.saturating_sub(self.free.len());
        self.slots.try_reserve(needed)?;
        Ok(())
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        // Trailing free slots can go; interior ones keep live handles stable.
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        let len = self.slots.len();
        self.free.retain(|h| h.to_index() < len);
        self.slots.shrink_to_fit();
        self.free.shrink_to_fit();
    }

    /// Stores `element` and returns its handle, or hands back why no slot was available.
    ///
    /// On error `element` is dropped and the arena is unchanged.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle> {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()] = Some(element);
            return Ok(h);
        }

        // Fresh slots stop at `Handle::MAX`.
        if self.slots.len() >= Handle::MAX {
            return Err(Error::CapacityExceeded {
                max: Handle::MAX,
            });
        }

        let before = self.slots.capacity();
        self.slots.try_reserve(1)?;
        if self.slots.capacity() != before {
            log::trace!("node arena grew from {} to {} slots", before, self.slots.capacity());
        }

        self.slots.push(Some(element));
        Ok(Handle::from_index(self.slots.len() - 1))
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        match self.try_alloc(element) {
            Ok(h) => h,
            Err(err) => panic!("`Arena::alloc()` - {err}"),
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns `true` if `handle` refers to an occupied slot.
    #[inline]
    pub(crate) fn contains(&self, handle: Handle) -> bool {
        matches!(self.slots.get(handle.to_index()), Some(Some(_)))
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    #[cfg(test)]
    pub(crate) fn free(&mut self, handle: Handle) {
        drop(self.take(handle));
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
