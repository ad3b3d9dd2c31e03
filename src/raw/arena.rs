use alloc::vec::Vec;

use super::handle::Handle;

/// A vacant entry stores the next vacant handle, so released slots form a stack inside the
/// vector itself.
#[derive(Clone)]
enum Entry<T> {
    Occupied(T),
    Vacant { next: Option<Handle> },
}

/// Slab of node slots addressed by [`Handle`].
#[derive(Clone)]
pub(crate) struct Arena<T> {
    entries: Vec<Entry<T>>,
    vacant: Option<Handle>,
    occupied: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: None,
            occupied: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            vacant: None,
            occupied: 0,
        }
    }

    /// Number of slots that can be occupied without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let vacant = self.entries.len() - self.occupied;
        self.entries.reserve(additional.saturating_sub(vacant));
    }

    pub(crate) const fn len(&self) -> usize {
        self.occupied
    }

    /// Stores `value` in a released slot if there is one, otherwise in a new slot.
    ///
    /// # Panics
    ///
    /// Panics if every index a [`Handle`] can express is occupied.
    pub(crate) fn alloc(&mut self, value: T) -> Handle {
        if let Some(handle) = self.vacant {
            let entry = &mut self.entries[handle.to_index()];
            if let Entry::Vacant { next } = *entry {
                self.vacant = next;
            }
            *entry = Entry::Occupied(value);
            self.occupied += 1;
            return handle;
        }

        assert!(
            self.entries.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is full ({} slots)",
            Handle::MAX + 1
        );
        let handle = Handle::from_index(self.entries.len());
        self.entries.push(Entry::Occupied(value));
        self.occupied += 1;
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.try_get(handle).expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn try_get(&self, handle: Handle) -> Option<&T> {
        match self.entries.get(handle.to_index()) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match self.entries.get_mut(handle.to_index()) {
            Some(Entry::Occupied(value)) => value,
            _ => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Moves the value out and pushes the slot onto the vacant stack.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let entry = self
            .entries
            .get_mut(handle.to_index())
            .expect("`Arena::take()` - `handle` is invalid!");

        match core::mem::replace(entry, Entry::Vacant { next: self.vacant }) {
            Entry::Occupied(value) => {
                self.vacant = Some(handle);
                self.occupied -= 1;
                value
            }
            vacant @ Entry::Vacant { .. } => {
                *entry = vacant;
                panic!("`Arena::take()` - `handle` is invalid!");
            }
        }
    }

    /// Visits every occupied slot in index order.
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().filter_map(|entry| match entry {
            Entry::Occupied(value) => Some(value),
            Entry::Vacant { .. } => None,
        })
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.vacant = None;
        self.occupied = 0;
    }
}
