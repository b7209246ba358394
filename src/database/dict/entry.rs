//! `std`-style Entry API for the rehashing `Dict`.

use super::{Dict, DictType};

/// A view into a single slot, obtained via [`Dict::entry`].
pub enum Entry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    Occupied(OccupiedEntry<'a, K, V, T>),
    Vacant(VacantEntry<'a, K, V, T>),
}

pub struct OccupiedEntry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub(super) dict: &'a mut Dict<K, V, T>,
    pub(super) key: K,
    pub(super) hash: u64,
}

pub struct VacantEntry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub(super) dict: &'a mut Dict<K, V, T>,
    pub(super) key: K,
    pub(super) hash: u64,
}

impl<'a, K, V, T> OccupiedEntry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn get(&self) -> &V {
        self.dict
            .find_ref_by_hash(self.hash, &self.key)
            .expect("occupied entry's key must be present")
            .1
    }

    pub fn get_mut(&mut self) -> &mut V {
        self.dict
            .find_mut_by_hash(self.hash, &self.key)
            .expect("occupied entry's key must be present")
            .1
    }

    pub fn into_mut(self) -> &'a mut V {
        let dict = self.dict;
        dict.find_mut_by_hash(self.hash, &self.key)
            .expect("occupied entry's key must be present")
            .1
    }

    /// Replaces the value, returning the previous one.
    pub fn insert(
        &mut self,
        val: V,
    ) -> V {
        std::mem::replace(self.get_mut(), val)
    }

    /// Removes this entry from the dictionary, returning its value.
    pub fn remove(self) -> V {
        self.dict
            .remove(&self.key)
            .unwrap_or_else(|_| panic!("occupied entry's key must be present"))
    }
}

impl<'a, K, V, T> VacantEntry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts `val` for this entry's key and returns a mutable
    /// reference to it.
    pub fn insert(self, val: V) -> &'a mut V {
        self.dict.insert_new(self.hash, self.key, val)
    }
}

impl<'a, K, V, T> Entry<'a, K, V, T>
where
    T: DictType<K, V>,
{
    /// Inserts `default` if vacant, then returns a mutable reference to
    /// the value either way.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(default),
        }
    }

    pub fn or_insert_with(self, f: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(f()),
        }
    }

    pub fn or_insert_with_key(self, f: impl FnOnce(&K) -> V) -> &'a mut V {
        match self {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let val = f(&e.key);
                e.insert(val)
            }
        }
    }

    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }

    /// Runs `f` against the value if occupied, leaving it untouched
    /// otherwise.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut e) => {
                f(e.get_mut());
                Entry::Occupied(e)
            }
            other => other,
        }
    }
}
