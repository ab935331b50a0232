//! Value release policies.
//!
//! A table hands every value it discards to its policy exactly once: the old
//! value on update, the removed value on `remove`, and every stored value on
//! `clear` and on drop. Values moved during growth are never released, and a
//! value that never made it into the table is never released.
//!
//! The policy runs after the table is consistent again, so a policy that
//! panics leaves the table valid (the value being released is lost).

/// Cleanup capability applied uniformly to discarded values.
pub trait Release<V> {
    fn release(&mut self, value: V);
}

/// Default policy: the value is dropped.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DropRelease;

impl<V> Release<V> for DropRelease {
    #[inline]
    fn release(&mut self, value: V) {
        drop(value);
    }
}

/// Any `FnMut(V)` is a policy, so a closure can stand in for a destructor.
impl<V, F> Release<V> for F
where
    F: FnMut(V),
{
    #[inline]
    fn release(&mut self, value: V) {
        self(value)
    }
}
