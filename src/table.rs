//! ProbeTable: byte-keyed map with growth and release policies.

use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::release::{DropRelease, Release};
use crate::slot_store::{copy_key, Probe, Slot, SlotStore};
use core::fmt;
use core::mem;
use tracing::{debug, warn};

/// What an insert did with its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The key was absent; a new entry now holds it.
    Inserted,
    /// The key was present; its previous value went to the release policy.
    Replaced,
}

/// Open-addressing hash table keyed by byte sequences.
///
/// Keys are copied into table-owned buffers on first insert. Values are
/// owned by the table, and every value the table discards is handed to the
/// release policy `R` exactly once (see [`Release`]).
///
/// Growth happens only inside `insert`/`insert_copy`, before the entry is
/// placed, and costs O(len) for that one call.
///
/// ```
/// use probe_table::{Insertion, ProbeTable};
///
/// let mut table = ProbeTable::new();
/// assert_eq!(table.insert(b"alpha\0", 1).unwrap(), Insertion::Inserted);
/// assert_eq!(table.get(b"alpha\0"), Some(&1));
/// assert_eq!(table.insert(b"alpha\0", 2).unwrap(), Insertion::Replaced);
/// assert_eq!(table.len(), 1);
/// ```
pub struct ProbeTable<V, R = DropRelease>
where
    R: Release<V>,
{
    store: SlotStore<V>,
    config: TableConfig,
    release: R,
}

impl<V> ProbeTable<V> {
    /// Default configuration, values dropped on discard.
    pub fn new() -> Self {
        Self::with_release(DropRelease)
    }

    /// Custom parameters, values dropped on discard.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_release(config, DropRelease)
    }
}

impl<V> Default for ProbeTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over `(key, value)` pairs in slot order.
pub struct Iter<'a, V> {
    it: core::slice::Iter<'a, Option<Slot<V>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .by_ref()
            .flatten()
            .next()
            .map(|s| (&*s.key, &s.value))
    }
}

impl<V, R> ProbeTable<V, R>
where
    R: Release<V>,
{
    /// Default configuration with a custom release policy.
    pub fn with_release(release: R) -> Self {
        let config = TableConfig::default();
        Self {
            store: SlotStore::with_capacity(config.capacity),
            config,
            release,
        }
    }

    /// Validate `config` and allocate its initial slots.
    pub fn with_config_and_release(config: TableConfig, release: R) -> Result<Self> {
        config.validate()?;
        let store = SlotStore::try_with_capacity(config.capacity)
            .inspect_err(|e| warn!(error = %e, "table creation failed"))?;
        Ok(Self {
            store,
            config,
            release,
        })
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Number of slots. Never shrinks.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Parameters the table was created with.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The policy that receives discarded values.
    pub fn release_policy(&self) -> &R {
        &self.release
    }

    /// Move `value` into the table under `key`.
    ///
    /// An existing value for `key` is replaced and released. On error the
    /// stored entries are unchanged and `value` is dropped without going
    /// through the release policy.
    pub fn insert(&mut self, key: &[u8], value: V) -> Result<Insertion> {
        self.reserve_one()?;
        match self.store.locate(key) {
            Probe::Found(index) => {
                if let Some(stored) = self.store.value_mut(index) {
                    let old = mem::replace(stored, value);
                    self.release.release(old);
                }
                Ok(Insertion::Replaced)
            }
            Probe::Vacant(index) => {
                let key = copy_key(key)
                    .inspect_err(|e| warn!(error = %e, "insert failed"))?;
                self.store.fill(index, Slot { key, value });
                Ok(Insertion::Inserted)
            }
            Probe::Exhausted => {
                let err = TableError::TableFull {
                    capacity: self.capacity(),
                };
                warn!(error = %err, len = self.len(), "insert failed");
                Err(err)
            }
        }
    }

    /// Store a table-owned duplicate of `value` under `key`.
    ///
    /// The duplicate is made before the table is touched, so the caller's
    /// original can change afterwards without affecting the stored value.
    ///
    /// ```
    /// use probe_table::ProbeTable;
    ///
    /// let mut table: ProbeTable<Vec<u8>> = ProbeTable::new();
    /// let mut buf = vec![1u8, 2, 3];
    /// table.insert_copy(b"k", buf.as_slice()).unwrap();
    /// buf[0] = 9;
    /// assert_eq!(table.get(b"k").map(Vec::as_slice), Some(&[1u8, 2, 3][..]));
    /// ```
    pub fn insert_copy<Q>(&mut self, key: &[u8], value: &Q) -> Result<Insertion>
    where
        Q: ?Sized + ToOwned<Owned = V>,
    {
        let copy = value.to_owned();
        self.insert(key, copy)
    }

    /// Borrow the value stored under `key`. Never allocates, never grows.
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        match self.store.locate(key) {
            Probe::Found(index) => self.store.value(index),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Mutable access to the value under `key`; the key itself stays fixed.
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        match self.store.locate(key) {
            Probe::Found(index) => self.store.value_mut(index),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Whether `key` is present. Never allocates, never grows.
    pub fn contains(&self, key: &[u8]) -> bool {
        matches!(self.store.locate(key), Probe::Found(_))
    }

    /// Remove `key` and release its value. Returns `false`, releasing
    /// nothing, when the key is absent.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        let Probe::Found(index) = self.store.locate(key) else {
            return false;
        };
        match self.store.take(index) {
            Some(slot) => {
                self.release.release(slot.value);
                true
            }
            None => false,
        }
    }

    /// Release every value and empty all slots. Capacity is kept.
    pub fn clear(&mut self) {
        let release = &mut self.release;
        self.store.drain_with(|slot| release.release(slot.value));
    }

    /// Iterate over entries in slot order. The order is unspecified and
    /// changes when the table grows or entries are removed.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.store.iter(),
        }
    }

    /// Grow, if needed, so one more entry fits under the load threshold.
    ///
    /// The growth target is computed first and the slots are rehashed
    /// once, even when one factor step is not enough to get there.
    fn reserve_one(&mut self) -> Result<()> {
        let prospective = self.len() + 1;
        let capacity = self.capacity();
        if !self.config.needs_growth(prospective, capacity) {
            return Ok(());
        }
        let new_capacity = self
            .config
            .growth_target(prospective, capacity)
            .inspect_err(|e| warn!(error = %e, "resize failed"))?;
        self.store
            .grow(new_capacity)
            .inspect_err(|e| warn!(error = %e, capacity, new_capacity, "resize failed"))?;
        debug!(capacity, new_capacity, len = self.len(), "table grew");
        Ok(())
    }
}

impl<V, R> Drop for ProbeTable<V, R>
where
    R: Release<V>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a, V, R> IntoIterator for &'a ProbeTable<V, R>
where
    R: Release<V>,
{
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, R> fmt::Debug for ProbeTable<V, R>
where
    V: fmt::Debug,
    R: Release<V>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeTable")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, V, R: Release<V>>(&'a ProbeTable<V, R>);

impl<V: fmt::Debug, R: Release<V>> fmt::Debug for DebugEntries<'_, V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::home_index;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting() -> (Rc<Cell<usize>>, impl FnMut(i32)) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move |_v: i32| c.set(c.get() + 1))
    }

    /// Invariant: the load factor never exceeds the threshold after an
    /// insert, and `len < capacity` always holds.
    #[test]
    fn load_factor_bound_holds_across_growth() {
        let mut t = ProbeTable::with_config(TableConfig::new(3, 0.6, 1.5)).unwrap();
        for i in 0..200u32 {
            t.insert(&i.to_be_bytes(), i).unwrap();
            assert!(t.len() as f64 / t.capacity() as f64 <= 0.6);
            assert!(t.len() < t.capacity());
        }
        assert_eq!(t.len(), 200);
    }

    /// Invariant: a factor of 1.0 still grows (one slot at a time).
    #[test]
    fn unit_factor_still_grows() {
        let mut t = ProbeTable::with_config(TableConfig::new(2, 0.5, 1.0)).unwrap();
        for i in 0..10u8 {
            t.insert(&[i], i).unwrap();
        }
        assert_eq!(t.len(), 10);
        assert_eq!(t.capacity(), 20);
        for i in 0..10u8 {
            assert_eq!(t.get(&[i]), Some(&i));
        }
    }

    /// Invariant: a threshold of 1.0 never fills the last slot.
    #[test]
    fn full_threshold_keeps_a_free_slot() {
        let mut t = ProbeTable::with_config(TableConfig::new(4, 1.0, 2.0)).unwrap();
        for i in 0..3u8 {
            t.insert(&[i], i).unwrap();
        }
        assert_eq!(t.capacity(), 4);
        t.insert(&[3], 3).unwrap();
        assert_eq!(t.capacity(), 8);
        assert!(!t.contains(&[4]));
    }

    /// Invariant: an update near the threshold is still checked against the
    /// prospective size, matching the insert path.
    #[test]
    fn update_at_threshold_may_grow() {
        let mut t = ProbeTable::with_config(TableConfig::new(4, 0.5, 2.0)).unwrap();
        t.insert(b"a", 1).unwrap();
        t.insert(b"b", 2).unwrap();
        assert_eq!(t.capacity(), 4);
        assert_eq!(t.insert(b"a", 3).unwrap(), Insertion::Replaced);
        assert_eq!(t.capacity(), 8);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(b"a"), Some(&3));
    }

    /// Invariant: release is never called during rehash.
    #[test]
    fn growth_releases_nothing() {
        let (count, policy) = counting();
        let mut t =
            ProbeTable::with_config_and_release(TableConfig::new(2, 0.5, 2.0), policy).unwrap();
        for i in 0..64i32 {
            t.insert(&i.to_le_bytes(), i).unwrap();
        }
        assert_eq!(count.get(), 0);
        drop(t);
        assert_eq!(count.get(), 64);
    }

    /// Invariant: removal through a collision chain keeps later keys
    /// reachable and releases exactly the removed value.
    #[test]
    fn remove_middle_of_chain() {
        let capacity = 16;
        let target = home_index(b"c0", capacity);
        let keys: Vec<Vec<u8>> = (0..)
            .map(|i| format!("c{i}").into_bytes())
            .filter(|k| home_index(k, capacity) == target)
            .take(3)
            .collect();
        let (count, policy) = counting();
        let mut t = ProbeTable::with_release(policy);
        for (i, k) in keys.iter().enumerate() {
            t.insert(k, i as i32).unwrap();
        }
        assert_eq!(t.capacity(), capacity);
        assert!(t.remove(&keys[1]));
        assert_eq!(count.get(), 1);
        assert_eq!(t.get(&keys[0]), Some(&0));
        assert_eq!(t.get(&keys[2]), Some(&2));
        assert!(!t.contains(&keys[1]));
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut t = ProbeTable::new();
        t.insert(b"n", 1u64).unwrap();
        *t.get_mut(b"n").unwrap() += 41;
        assert_eq!(t.get(b"n"), Some(&42));
        assert!(t.get_mut(b"missing").is_none());
    }

    #[test]
    fn iter_yields_each_entry_once() {
        let mut t = ProbeTable::new();
        for i in 0..20u8 {
            t.insert(&[i, i], i).unwrap();
        }
        t.remove(&[3, 3]);
        let mut seen: Vec<u8> = t
            .iter()
            .map(|(k, v)| {
                assert_eq!(k, &[*v, *v]);
                *v
            })
            .collect();
        seen.sort_unstable();
        let expected: Vec<u8> = (0..20).filter(|&i| i != 3).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = ProbeTable::<u8>::with_config(TableConfig::default().with_capacity(0))
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidConfig(_)));
    }

    #[test]
    fn debug_lists_entries() {
        let mut t = ProbeTable::new();
        t.insert(b"k", 7).unwrap();
        let s = format!("{t:?}");
        assert!(s.contains("len: 1"));
        assert!(s.contains("capacity: 16"));
        assert!(s.contains("[107]: 7"));
    }
}
