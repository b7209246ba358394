//! Safe and raw iterators.

use super::{Dict, DictEntry, DictType};

struct Cursor {
    table_idx: usize,
    bucket_idx: usize,
}

impl Cursor {
    fn start() -> Self {
        Self {
            table_idx: 0,
            bucket_idx: 0,
        }
    }
}

/// Walks `table[index]`'s chain, advancing `index`; once Table 0 is
/// exhausted, continues into Table 1 starting at `rehash_idx` if a
/// rehash is in progress.
fn advance_to_next_entry<'a, K, V, T>(
    dict: &'a Dict<K, V, T>,
    cursor: &mut Cursor,
) -> Option<&'a DictEntry<K, V>>
where
    T: DictType<K, V>,
{
    loop {
        if cursor.table_idx == 1 && !dict.is_rehashing() {
            return None;
        }
        if cursor.table_idx >= 2 {
            return None;
        }
        let table = &dict.tables[cursor.table_idx];
        if cursor.bucket_idx >= table.size() {
            cursor.table_idx += 1;
            cursor.bucket_idx = 0;
            continue;
        }
        if let Some(entry) = table.buckets[cursor.bucket_idx].as_deref() {
            cursor.bucket_idx += 1;
            return Some(entry);
        }
        cursor.bucket_idx += 1;
    }
}

/// Safe shared iterator. Increments the dict's `pause_rehash` counter on
/// creation and decrements it on drop.
pub struct Iter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    dict: &'a Dict<K, V, T>,
    cursor: Cursor,
}

impl<'a, K, V, T> Iter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub(super) fn new(dict: &'a Dict<K, V, T>) -> Self {
        dict.pause_rehash.set(dict.pause_rehash.get() + 1);
        Self {
            dict,
            cursor: Cursor::start(),
        }
    }
}

impl<'a, K, V, T> Iterator for Iter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        advance_to_next_entry(self.dict, &mut self.cursor).map(|e| (&e.key, &e.val))
    }
}

impl<'a, K, V, T> Drop for Iter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    fn drop(&mut self) {
        let prev = self.dict.pause_rehash.get();
        self.dict
            .pause_rehash
            .set(prev.checked_sub(1).expect("pause_rehash underflow"));
    }
}

/// Safe mutable iterator. Same pause discipline as [`Iter`], but exposed
/// as a lending `next(&mut self)` rather than `std::iter::Iterator`: a
/// `(&K, &mut V)` pair can only ever borrow from the call that produced
/// it, not from the iterator's own `'a`, since two live `&mut V`
/// borrows from the same `Dict` must never alias.
pub struct IterMut<'a, K, V, T>
where
    T: DictType<K, V>,
{
    dict: &'a mut Dict<K, V, T>,
    cursor: Cursor,
}

impl<'a, K, V, T> IterMut<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub(super) fn new(dict: &'a mut Dict<K, V, T>) -> Self {
        dict.pause_rehash.set(dict.pause_rehash.get() + 1);
        Self {
            dict,
            cursor: Cursor::start(),
        }
    }

    pub fn next(&mut self) -> Option<(&K, &mut V)> {
        loop {
            if self.cursor.table_idx == 1 && !self.dict.is_rehashing() {
                return None;
            }
            if self.cursor.table_idx >= 2 {
                return None;
            }
            let size = self.dict.tables[self.cursor.table_idx].size();
            if self.cursor.bucket_idx >= size {
                self.cursor.table_idx += 1;
                self.cursor.bucket_idx = 0;
                continue;
            }
            let idx = self.cursor.bucket_idx;
            self.cursor.bucket_idx += 1;
            let slot = self.dict.tables[self.cursor.table_idx].buckets[idx].as_deref_mut();
            if let Some(entry) = slot {
                return Some((&entry.key, &mut entry.val));
            }
        }
    }

    /// Runs `f` against every remaining `(&K, &mut V)` pair.
    pub fn for_each(mut self, mut f: impl FnMut(&K, &mut V)) {
        while let Some((k, v)) = self.next() {
            f(k, v);
        }
    }
}

impl<'a, K, V, T> Drop for IterMut<'a, K, V, T>
where
    T: DictType<K, V>,
{
    fn drop(&mut self) {
        let prev = self.dict.pause_rehash.get();
        self.dict
            .pause_rehash
            .set(prev.checked_sub(1).expect("pause_rehash underflow"));
    }
}

/// Raw iterator: does not pause rehash.
/// Rust's aliasing rules already forbid mutating the `Dict` while this
/// borrows it immutably, so the fingerprint check on [`Drop`] can never
/// actually fail — it is retained as a structural-invariant assertion
/// rather than relied on for safety.
pub struct RawIter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    dict: &'a Dict<K, V, T>,
    cursor: Cursor,
    fingerprint: u64,
}

impl<'a, K, V, T> RawIter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    pub(super) fn new(dict: &'a Dict<K, V, T>) -> Self {
        Self {
            fingerprint: dict.fingerprint(),
            dict,
            cursor: Cursor::start(),
        }
    }
}

impl<'a, K, V, T> Iterator for RawIter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        advance_to_next_entry(self.dict, &mut self.cursor).map(|e| (&e.key, &e.val))
    }
}

impl<'a, K, V, T> Drop for RawIter<'a, K, V, T>
where
    T: DictType<K, V>,
{
    fn drop(&mut self) {
        assert_eq!(
            self.fingerprint,
            self.dict.fingerprint(),
            "raw iterator outlived a structural mutation of the dict"
        );
    }
}
