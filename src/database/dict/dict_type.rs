use std::{hash::Hash, marker::PhantomData};

use siphasher::sip128::{Hasher128, SipHasher13};

use crate::hash;

/// Per-instance hook table a [`Dict`](super::Dict) consults for hashing,
/// key comparison, and a handful of policy decisions. Every hook has a
/// conservative default: no-copy, no-destroy, always-allow, zero metadata.
pub trait DictType<K, V> {
    /// Hashes `key`. Must be stable for the lifetime of any `Dict` using
    /// this type, since rehashing re-derives bucket indices from it.
    fn hash(&self, key: &K) -> u64;

    /// Key-equality hook. Rust has no pointer-
    /// identity default to fall back to, so implementors supply this
    /// directly rather than inheriting one.
    fn key_eq(&self, a: &K, b: &K) -> bool;

    /// Key copy hook (`keyDup`). Rarely exercised: `Dict`'s own API takes
    /// keys by value, so this only matters for callers that deep-clone a
    /// `Dict` themselves.
    fn key_dup(&self, key: &K) -> K
    where
        K: Clone,
    {
        key.clone()
    }

    /// Value copy hook (`valDup`), same caveat as `key_dup`.
    fn val_dup(&self, val: &V) -> V
    where
        V: Clone,
    {
        val.clone()
    }

    /// Key destructor hook (`keyDestructor`). Runs just before an entry's
    /// key is dropped during unlink/free/clear.
    fn on_key_drop(&self, _key: &K) {}

    /// Value destructor hook (`valDestructor`), same timing as `on_key_drop`.
    fn on_val_drop(&self, _val: &V) {}

    /// Growth policy hook (`expandAllowed`). Default always permits growth.
    fn expand_allowed(
        &self,
        _more_mem: usize,
        _used_ratio: f64,
    ) -> bool {
        true
    }

    /// Trailing metadata length reserved per entry (`entryMetadataBytes`).
    /// Zero-initialized on allocation.
    fn entry_metadata_len(&self) -> usize {
        0
    }
}

/// The default type vtable: SipHash-1-3 keyed by the process-wide seed
/// ([`crate::hash::seed`]), `Eq`-based key comparison, no metadata.
pub struct DefaultDictType<K, V> {
    _marker: PhantomData<fn(K, V)>,
}

impl<K, V> Default for DefaultDictType<K, V> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K, V> Clone for DefaultDictType<K, V> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<K: Hash, V> DictType<K, V> for DefaultDictType<K, V>
where
    K: Eq,
{
    fn hash(&self, key: &K) -> u64 {
        let seed = hash::seed();
        let mut hasher = SipHasher13::new_with_keys(seed.0, seed.1);
        key.hash(&mut hasher);
        hasher.finish128().h1
    }

    fn key_eq(
        &self,
        a: &K,
        b: &K,
    ) -> bool {
        a == b
    }
}
