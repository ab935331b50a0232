//! String-key adapter.
//!
//! String keys follow the C-string convention: the key bytes are the UTF-8
//! encoding followed by one NUL byte. `insert_str("alpha", v)` and
//! `insert(b"alpha\0", v)` therefore address the same entry. Interior NULs
//! are not special; every byte of the string is part of the key.

use crate::error::Result;
use crate::release::Release;
use crate::table::{Insertion, ProbeTable};

/// Longest string (excluding the terminator) keyed without a heap buffer.
const INLINE_LEN: usize = 63;

/// NUL-terminated copy of a string key, inline when short.
enum TerminatedKey {
    Inline([u8; INLINE_LEN + 1], usize),
    Heap(Vec<u8>),
}

impl TerminatedKey {
    fn new(key: &str) -> Self {
        let bytes = key.as_bytes();
        if bytes.len() <= INLINE_LEN {
            let mut buf = [0u8; INLINE_LEN + 1];
            buf[..bytes.len()].copy_from_slice(bytes);
            TerminatedKey::Inline(buf, bytes.len() + 1)
        } else {
            let mut buf = Vec::with_capacity(bytes.len() + 1);
            buf.extend_from_slice(bytes);
            buf.push(0);
            TerminatedKey::Heap(buf)
        }
    }

    fn as_bytes(&self) -> &[u8] {
        match self {
            TerminatedKey::Inline(buf, len) => &buf[..*len],
            TerminatedKey::Heap(buf) => buf,
        }
    }
}

impl<V, R> ProbeTable<V, R>
where
    R: Release<V>,
{
    pub fn insert_str(&mut self, key: &str, value: V) -> Result<Insertion> {
        self.insert(TerminatedKey::new(key).as_bytes(), value)
    }

    pub fn insert_copy_str<Q>(&mut self, key: &str, value: &Q) -> Result<Insertion>
    where
        Q: ?Sized + ToOwned<Owned = V>,
    {
        self.insert_copy(TerminatedKey::new(key).as_bytes(), value)
    }

    pub fn get_str(&self, key: &str) -> Option<&V> {
        self.get(TerminatedKey::new(key).as_bytes())
    }

    pub fn get_str_mut(&mut self, key: &str) -> Option<&mut V> {
        self.get_mut(TerminatedKey::new(key).as_bytes())
    }

    pub fn contains_str(&self, key: &str) -> bool {
        self.contains(TerminatedKey::new(key).as_bytes())
    }

    pub fn remove_str(&mut self, key: &str) -> bool {
        self.remove(TerminatedKey::new(key).as_bytes())
    }
}
