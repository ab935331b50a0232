//! probe-table: an in-process, open-addressing hash table keyed by arbitrary
//! byte sequences, with per-table release policies for discarded values.
//!
//! Internal Design:
//!
//! Summary
//! - Keys are byte slices of any length, including zero. The table copies
//!   each new key into a `Box<[u8]>` it owns; two keys are equal iff their
//!   lengths and bytes match.
//! - Values are owned by the table. Whatever the table discards (the old
//!   value on update, removed values, everything on `clear` and drop) goes
//!   to the table's `Release<V>` policy exactly once.
//! - Layers:
//!   - `hasher`: FNV-1a over key bytes.
//!   - `SlotStore<V>`: fixed-capacity `Option<Slot>` array, linear probing,
//!     back-shift removal, rehash into a fresh array.
//!   - `ProbeTable<V, R>`: growth policy, insert/update, release dispatch.
//!   - `str_keys`: C-string style adapter (`key bytes + NUL`).
//!
//! Constraints
//! - Single-threaded: no internal synchronisation. Mutation goes through
//!   `&mut self`; callers sharing a table across threads wrap it in a lock.
//! - `len < capacity` after every operation; at least one slot stays free
//!   so every probe terminates at an empty slot.
//! - After a successful insert, `len / capacity <= resize_threshold`.
//!
//! Growth
//! - Checked before every insert (including updates of an existing key)
//!   against the prospective length `len + 1`.
//! - New capacity is `floor(capacity * resize_factor)` and never less than
//!   `capacity + 1`, so factors near 1.0 cannot stall growth.
//! - The new slot array is allocated up front with `try_reserve_exact`; if
//!   that fails the old array is untouched. Entries are moved, never copied
//!   or released. One growing insert costs O(len).
//!
//! Removal
//! - No tombstones. The cluster after a removed slot is shifted back so
//!   every remaining key stays reachable from its home index.
//!
//! Errors
//! - Every fallible call returns `Result<_, TableError>`. A failed call
//!   leaves stored entries intact; there is no poisoned state.
//! - Failures are also reported through `tracing` at `warn` level; growth
//!   is reported at `debug` level.
//!
//! Notes and non-goals
//! - No ordering guarantees; `iter` walks slots in storage order.
//! - No persistence, no hash flooding resistance.

pub mod config;
pub mod error;
pub mod hasher;
pub mod release;
mod slot_store;
mod str_keys;
pub mod table;
mod table_proptest;

// Public surface
pub use config::TableConfig;
pub use error::{Result, TableError};
pub use release::{DropRelease, Release};
pub use table::{Insertion, ProbeTable};
