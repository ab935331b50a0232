//! SlotStore: fixed-capacity slot array with linear probing.
//!
//! Every slot is `None` or a fully owned `(key, value)` pair. Entries live in
//! the cluster that starts at their home index `fnv1a(key) % capacity`, and
//! removal back-shifts the rest of the cluster so no lookup ever has to step
//! over a hole. Capacity is fixed for the life of a store; growth builds a
//! new store and moves entries across.

use crate::error::{Result, TableError};
use crate::hasher::home_index;
use core::mem::size_of;

/// One occupied slot. `key.len()` is the key size.
#[derive(Debug)]
pub(crate) struct Slot<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
}

/// Outcome of scanning the probe sequence for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The key is stored at this index.
    Found(usize),
    /// The key is absent; an insert would land at this index.
    Vacant(usize),
    /// Every slot was visited without a match or a free slot.
    Exhausted,
}

pub(crate) struct SlotStore<V> {
    slots: Vec<Option<Slot<V>>>,
    len: usize,
}

/// Copy caller key bytes into a buffer owned by the table.
pub(crate) fn copy_key(key: &[u8]) -> Result<Box<[u8]>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(key.len())
        .map_err(|_| TableError::AllocationFailed {
            what: "key buffer",
            bytes: key.len(),
        })?;
    buf.extend_from_slice(key);
    Ok(buf.into_boxed_slice())
}

/// Cyclic distance walking forward from `from` to `to`.
#[inline]
fn forward_distance(from: usize, to: usize, capacity: usize) -> usize {
    if to >= from {
        to - from
    } else {
        to + capacity - from
    }
}

impl<V> SlotStore<V> {
    /// Allocate `capacity` empty slots with the global allocator's
    /// infallible path. Used for default-sized tables only.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, len: 0 }
    }

    /// Allocate `capacity` empty slots, reporting allocator refusal.
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self> {
        debug_assert!(capacity > 0);
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| TableError::AllocationFailed {
                what: "slot array",
                bytes: capacity.saturating_mul(size_of::<Option<Slot<V>>>()),
            })?;
        slots.resize_with(capacity, || None);
        Ok(Self { slots, len: 0 })
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Scan from the key's home index, at most `capacity` steps.
    pub(crate) fn locate(&self, key: &[u8]) -> Probe {
        let capacity = self.capacity();
        let mut index = home_index(key, capacity);
        for _ in 0..capacity {
            match &self.slots[index] {
                None => return Probe::Vacant(index),
                Some(slot) if *slot.key == *key => return Probe::Found(index),
                Some(_) => index = (index + 1) % capacity,
            }
        }
        Probe::Exhausted
    }

    pub(crate) fn value(&self, index: usize) -> Option<&V> {
        self.slots[index].as_ref().map(|s| &s.value)
    }

    pub(crate) fn value_mut(&mut self, index: usize) -> Option<&mut V> {
        self.slots[index].as_mut().map(|s| &mut s.value)
    }

    /// Store a new entry in a slot that `locate` reported vacant.
    pub(crate) fn fill(&mut self, index: usize, slot: Slot<V>) {
        debug_assert!(self.slots[index].is_none(), "fill over occupied slot");
        debug_assert!(self.len + 1 < self.capacity(), "last free slot filled");
        self.slots[index] = Some(slot);
        self.len += 1;
    }

    /// Remove the entry at `index` and close the gap it leaves.
    pub(crate) fn take(&mut self, index: usize) -> Option<Slot<V>> {
        let removed = self.slots[index].take()?;
        self.len -= 1;
        self.backshift(index);
        Some(removed)
    }

    /// Walk the cluster after `hole` and pull back every entry whose home
    /// does not lie strictly between the hole and its current position.
    fn backshift(&mut self, mut hole: usize) {
        let capacity = self.capacity();
        let mut index = (hole + 1) % capacity;
        while let Some(slot) = &self.slots[index] {
            let home = home_index(&slot.key, capacity);
            if forward_distance(home, index, capacity) >= forward_distance(hole, index, capacity) {
                self.slots.swap(hole, index);
                hole = index;
            }
            index = (index + 1) % capacity;
        }
    }

    /// Move every entry into a fresh store of `new_capacity` slots.
    ///
    /// The fresh array is allocated before anything moves, so on failure
    /// `self` is untouched. Keys and values are moved, never copied or
    /// released.
    pub(crate) fn grow(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity > self.len);
        let mut fresh = Self::try_with_capacity(new_capacity)?;
        for slot in self.slots.iter_mut().filter_map(Option::take) {
            fresh.place_moved(slot);
        }
        debug_assert_eq!(fresh.len, self.len, "entries lost during rehash");
        *self = fresh;
        Ok(())
    }

    /// Rehash path: the key is known to be absent, so stop at the first
    /// free slot.
    fn place_moved(&mut self, slot: Slot<V>) {
        let capacity = self.capacity();
        let mut index = home_index(&slot.key, capacity);
        while self.slots[index].is_some() {
            index = (index + 1) % capacity;
        }
        self.slots[index] = Some(slot);
        self.len += 1;
    }

    /// Empty every slot, handing each entry to `f`.
    pub(crate) fn drain_with<F>(&mut self, mut f: F)
    where
        F: FnMut(Slot<V>),
    {
        for cell in self.slots.iter_mut() {
            if let Some(slot) = cell.take() {
                self.len -= 1;
                f(slot);
            }
        }
        debug_assert_eq!(self.len, 0);
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, Option<Slot<V>>> {
        self.slots.iter()
    }
}
