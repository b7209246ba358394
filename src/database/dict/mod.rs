//! Incrementally-resizable chained hash map.
//!
//! A `Dict` holds two [`DictTable`]s; while `rehash_idx >= 0` entries are
//! split across both and every mutating or lookup operation performs one
//! bounded migration step first ([`Dict::rehash_step_if_needed`]).

mod dict_type;
pub mod entry;
mod iter;
mod sampling;
mod scan;

use std::sync::atomic::{AtomicBool, Ordering};

use packedcore_error::{DictError, DictResult};
use rand::{rngs::SmallRng, SeedableRng};

pub use dict_type::{DefaultDictType, DictType};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use iter::{Iter, IterMut, RawIter};

/// Smallest table a `Dict` ever allocates — `Expand` floors its target
/// size at `max(n, 4)`.
const INITIAL_SIZE: usize = 4;

/// Load-factor ratio that forces growth even when automatic resizing is
/// globally disabled.
const FORCE_GROW_RATIO: f64 = 5.0;

static GLOBAL_RESIZE_ENABLED: AtomicBool = AtomicBool::new(true);

/// Enables or disables automatic growth across every `Dict` in the
/// process. Explicit [`Dict::expand`] is
/// unaffected.
pub fn set_resize_policy(enabled: bool) {
    GLOBAL_RESIZE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Reads the current process-wide resize policy.
pub fn resize_policy() -> bool {
    GLOBAL_RESIZE_ENABLED.load(Ordering::Relaxed)
}

/// One entry in a bucket's collision chain.
pub(crate) struct DictEntry<K, V> {
    key: K,
    val: V,
    next: Option<Box<DictEntry<K, V>>>,
    /// Trailing metadata region, sized by `T::entry_metadata_len()` and
    /// zero-initialized at creation.
    #[allow(dead_code)]
    metadata: Box<[u8]>,
}

/// A single hash-bucket array. Unallocated state is represented as an
/// empty `buckets` vector rather than a separate exponent field.
pub(crate) struct DictTable<K, V> {
    buckets: Vec<Option<Box<DictEntry<K, V>>>>,
    mask: usize,
    used: usize,
}

impl<K, V> DictTable<K, V> {
    fn unallocated() -> Self {
        Self {
            buckets: Vec::new(),
            mask: 0,
            used: 0,
        }
    }

    fn try_with_size(size: usize) -> Result<Self, DictError> {
        debug_assert!(size.is_power_of_two());
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(size)
            .map_err(|_| DictError::AllocationFailed { requested: size })?;
        buckets.resize_with(size, || None);
        Ok(Self {
            buckets,
            mask: size - 1,
            used: 0,
        })
    }

    fn size(&self) -> usize {
        self.buckets.len()
    }

    fn is_allocated(&self) -> bool {
        !self.buckets.is_empty()
    }
}

/// Incrementally-resizable chained hash map.
///
/// `T` is a per-table policy vtable (see [`DictType`]) covering hashing,
/// key equality, and growth decisions. Callers who need a tagged-union
/// value type can express it directly as an enum `V` rather than the
/// crate baking one in.
pub struct Dict<K, V, T = DefaultDictType<K, V>>
where
    T: DictType<K, V>,
{
    tables: [DictTable<K, V>; 2],
    /// `-1` when idle, otherwise the next Table-0 bucket to migrate.
    rehash_idx: isize,
    /// Re-entrant pause counter for safe iterators. `Cell` because this
    /// only needs to track "is someone iterating", not synchronize across
    /// threads — the crate is single-writer.
    pause_rehash: std::cell::Cell<u32>,
    dict_type: T,
    forked_child: bool,
    rng: SmallRng,
}

impl<K, V> Dict<K, V, DefaultDictType<K, V>>
where
    K: std::hash::Hash + Eq,
{
    /// Creates an empty dict using [`DefaultDictType`].
    pub fn new() -> Self {
        Self::with_type(DefaultDictType::default())
    }
}

impl<K, V> Default for Dict<K, V, DefaultDictType<K, V>>
where
    K: std::hash::Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, T> Dict<K, V, T>
where
    T: DictType<K, V>,
{
    /// Creates an empty dict with a caller-supplied type vtable
    ///`).
    pub fn with_type(dict_type: T) -> Self {
        Self {
            tables: [DictTable::unallocated(), DictTable::unallocated()],
            rehash_idx: -1,
            pause_rehash: std::cell::Cell::new(0),
            dict_type,
            forked_child: false,
            rng: SmallRng::from_rng(rand::thread_rng())
                .expect("thread_rng is an infallible seed source"),
        }
    }

    pub fn len(&self) -> usize {
        self.tables[0].used + self.tables[1].used
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_rehashing(&self) -> bool {
        self.rehash_idx >= 0
    }

    /// Inhibits automatic growth while `true`, preserving copy-on-write
    /// pages across a fork.
    pub fn set_forked_child(
        &mut self,
        forked: bool,
    ) {
        self.forked_child = forked;
    }

    fn fingerprint(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for table in &self.tables {
            table.size().hash(&mut hasher);
            table.used.hash(&mut hasher);
        }
        self.rehash_idx.hash(&mut hasher);
        hasher.finish()
    }

    fn target_size(
        n: usize,
        used0: usize,
    ) -> usize {
        n.max(INITIAL_SIZE).max(used0).next_power_of_two()
    }

    /// `TryExpand`: allocation failure is reported rather
    /// than fatal.
    pub fn try_expand(
        &mut self,
        n: usize,
    ) -> DictResult<()> {
        if self.is_rehashing() {
            return Err(DictError::AlreadyRehashing);
        }
        let target = Self::target_size(n, self.tables[0].used);
        if self.tables[0].is_allocated() && self.tables[0].size() == target {
            return Ok(());
        }
        tracing::debug!(target, "dict: beginning rehash");
        self.tables[1] = DictTable::try_with_size(target)?;
        self.rehash_idx = 0;
        Ok(())
    }

    /// `Expand`: allocation failure is fatal outside
    /// `try_expand`.
    pub fn expand(
        &mut self,
        n: usize,
    ) {
        self.try_expand(n)
            .unwrap_or_else(|e| panic!("dict expand failed: {e}"));
    }

    fn finish_rehash(&mut self) {
        self.tables[0] = std::mem::replace(&mut self.tables[1], DictTable::unallocated());
        self.rehash_idx = -1;
        tracing::debug!("dict: rehash finished");
    }

    /// `Step(n)`: moves up to `n` non-empty buckets,
    /// visiting at most `10 * n` buckets total to bound worst-case
    /// latency during sparse tails. Returns the number of non-empty
    /// buckets migrated.
    pub fn rehash_step(
        &mut self,
        n: usize,
    ) -> usize {
        if !self.is_rehashing() {
            return 0;
        }
        let mut moved = 0;
        let mut visited = 0;
        let max_visits = n.saturating_mul(10).max(1);
        while moved < n && visited < max_visits {
            if self.tables[0].used == 0 {
                self.finish_rehash();
                return moved;
            }
            let idx = self.rehash_idx as usize;
            if idx >= self.tables[0].size() {
                self.finish_rehash();
                return moved;
            }
            visited += 1;
            let chain = self.tables[0].buckets[idx].take();
            match chain {
                None => {
                    self.rehash_idx += 1;
                }
                Some(mut entry_box) => {
                    moved += 1;
                    loop {
                        let next = entry_box.next.take();
                        let hash = self.dict_type.hash(&entry_box.key);
                        let dest = hash as usize & self.tables[1].mask;
                        entry_box.next = self.tables[1].buckets[dest].take();
                        self.tables[0].used -= 1;
                        self.tables[1].used += 1;
                        self.tables[1].buckets[dest] = Some(entry_box);
                        match next {
                            Some(n) => entry_box = n,
                            None => break,
                        }
                    }
                    self.rehash_idx += 1;
                }
            }
        }
        moved
    }

    /// No-op while a safe iterator is live; otherwise performs one
    /// rehash step. Called at the top of every mutating/lookup operation
    ///.
    pub fn rehash_step_if_needed(&mut self) {
        if self.pause_rehash.get() == 0 {
            self.rehash_step(1);
        }
    }

    /// Loops `Step(100)` until `ms` milliseconds elapse. Returns the
    /// number of non-empty buckets migrated.
    pub fn rehash_milliseconds(
        &mut self,
        ms: u64,
    ) -> usize {
        if !self.is_rehashing() {
            return 0;
        }
        let deadline = std::time::Instant::now() + std::time::Duration::from_millis(ms);
        let mut total = 0;
        while self.is_rehashing() && std::time::Instant::now() < deadline {
            total += self.rehash_step(100);
        }
        total
    }

    fn maybe_grow(&mut self) {
        if self.is_rehashing() || self.forked_child {
            return;
        }
        if !self.tables[0].is_allocated() {
            self.expand(INITIAL_SIZE);
            return;
        }
        let used = self.tables[0].used;
        let size = self.tables[0].size();
        let ratio = used as f64 / size as f64;
        let should_grow = used >= size && (resize_policy() || ratio >= FORCE_GROW_RATIO);
        if should_grow && self.dict_type.expand_allowed(used + 1, ratio) {
            self.expand(used + 1);
        }
    }

    fn find_ref_by_hash(
        &self,
        hash: u64,
        key: &K,
    ) -> Option<(&K, &V)> {
        for t in 0..2 {
            if t == 1 && !self.is_rehashing() {
                break;
            }
            if !self.tables[t].is_allocated() {
                continue;
            }
            let idx = hash as usize & self.tables[t].mask;
            let mut cur = self.tables[t].buckets[idx].as_deref();
            while let Some(entry) = cur {
                if self.dict_type.key_eq(&entry.key, key) {
                    return Some((&entry.key, &entry.val));
                }
                cur = entry.next.as_deref();
            }
        }
        None
    }

    fn find_mut_by_hash(
        &mut self,
        hash: u64,
        key: &K,
    ) -> Option<(&K, &mut V)> {
        for t in 0..2 {
            if t == 1 && !self.is_rehashing() {
                break;
            }
            if !self.tables[t].is_allocated() {
                continue;
            }
            let idx = hash as usize & self.tables[t].mask;
            let mut cur = self.tables[t].buckets[idx].as_mut();
            while let Some(entry) = cur {
                if self.dict_type.key_eq(&entry.key, key) {
                    return Some((&entry.key, &mut entry.val));
                }
                cur = entry.next.as_mut();
            }
        }
        None
    }

    fn insert_new(
        &mut self,
        hash: u64,
        key: K,
        val: V,
    ) -> &mut V {
        self.maybe_grow();
        let target = if self.is_rehashing() { 1 } else { 0 };
        let idx = hash as usize & self.tables[target].mask;
        let metadata = vec![0u8; self.dict_type.entry_metadata_len()].into_boxed_slice();
        let next = self.tables[target].buckets[idx].take();
        self.tables[target].buckets[idx] = Some(Box::new(DictEntry {
            key,
            val,
            next,
            metadata,
        }));
        self.tables[target].used += 1;
        &mut self.tables[target].buckets[idx].as_mut().unwrap().val
    }

    /// `Find`/`FetchValue`.
    pub fn get(
        &mut self,
        key: &K,
    ) -> Option<&V> {
        self.rehash_step_if_needed();
        let hash = self.dict_type.hash(key);
        self.find_ref_by_hash(hash, key).map(|(_, v)| v)
    }

    pub fn contains_key(
        &mut self,
        key: &K,
    ) -> bool {
        self.get(key).is_some()
    }

    pub fn get_mut(
        &mut self,
        key: &K,
    ) -> Option<&mut V> {
        self.rehash_step_if_needed();
        let hash = self.dict_type.hash(key);
        self.find_mut_by_hash(hash, key).map(|(_, v)| v)
    }

    /// `Add`: fails if `key` already exists.
    pub fn add(
        &mut self,
        key: K,
        val: V,
    ) -> DictResult<()> {
        self.rehash_step_if_needed();
        let hash = self.dict_type.hash(&key);
        if self.find_ref_by_hash(hash, &key).is_some() {
            return Err(DictError::KeyExists);
        }
        self.insert_new(hash, key, val);
        Ok(())
    }

    /// `Replace`: upserts, returning the previous value.
    /// The new value is installed before the old one is dropped, so
    /// self-assignment of reference-counted values stays sound.
    pub fn replace(
        &mut self,
        key: K,
        val: V,
    ) -> Option<V> {
        self.rehash_step_if_needed();
        let hash = self.dict_type.hash(&key);
        if let Some((_, slot)) = self.find_mut_by_hash(hash, &key) {
            let old = std::mem::replace(slot, val);
            self.dict_type.on_val_drop(&old);
            return Some(old);
        }
        self.insert_new(hash, key, val);
        None
    }

    /// `Unlink`: detaches the entry from its chain
    /// without destroying it; pair with [`Dict::free_unlinked_entry`].
    pub fn unlink(
        &mut self,
        key: &K,
    ) -> Option<Box<DictEntry<K, V>>> {
        self.rehash_step_if_needed();
        let hash = self.dict_type.hash(key);
        for t in 0..2 {
            if t == 1 && !self.is_rehashing() {
                break;
            }
            if !self.tables[t].is_allocated() {
                continue;
            }
            let idx = hash as usize & self.tables[t].mask;
            let mut slot = &mut self.tables[t].buckets[idx];
            loop {
                let found = matches!(slot, Some(e) if self.dict_type.key_eq(&e.key, key));
                if found {
                    let mut removed = slot.take().expect("checked Some above");
                    *slot = removed.next.take();
                    self.tables[t].used -= 1;
                    return Some(removed);
                }
                match slot {
                    Some(e) => slot = &mut e.next,
                    None => break,
                }
            }
        }
        None
    }

    /// `FreeUnlinkedEntry`: runs destructor hooks and
    /// returns the owned key/value pair.
    pub fn free_unlinked_entry(
        &self,
        entry: Box<DictEntry<K, V>>,
    ) -> (K, V) {
        self.dict_type.on_key_drop(&entry.key);
        self.dict_type.on_val_drop(&entry.val);
        let DictEntry { key, val, .. } = *entry;
        (key, val)
    }

    /// `Delete` = `Unlink` + `FreeUnlinkedEntry`.
    pub fn remove(
        &mut self,
        key: &K,
    ) -> DictResult<V> {
        match self.unlink(key) {
            Some(entry) => Ok(self.free_unlinked_entry(entry).1),
            None => Err(DictError::KeyNotFound),
        }
    }

    /// `Empty(callback)`: drops every entry, invoking
    /// `callback` every 65,536 buckets visited so the host can yield.
    pub fn clear_with_callback(
        &mut self,
        mut callback: impl FnMut(),
    ) {
        let mut visited: u64 = 0;
        for t in 0..2 {
            for slot in self.tables[t].buckets.iter_mut() {
                let mut cur = slot.take();
                while let Some(mut entry) = cur {
                    cur = entry.next.take();
                    self.dict_type.on_key_drop(&entry.key);
                    self.dict_type.on_val_drop(&entry.val);
                }
                visited += 1;
                if visited % 65_536 == 0 {
                    callback();
                }
            }
        }
        self.tables = [DictTable::unallocated(), DictTable::unallocated()];
        self.rehash_idx = -1;
    }

    pub fn clear(&mut self) {
        self.clear_with_callback(|| {});
    }

    /// `Resize`: explicit shrink toward `max(used, 4)`.
    /// Never automatic, unlike growth.
    pub fn shrink_to_fit(&mut self) -> DictResult<()> {
        if self.is_rehashing() {
            return Err(DictError::AlreadyRehashing);
        }
        if !resize_policy() {
            return Ok(());
        }
        let used = self.tables[0].used;
        self.try_expand(used.max(INITIAL_SIZE))
    }

    /// Entry API: steps the rehash forward first, then returns a view
    /// into the slot for `key`.
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, T> {
        self.rehash_step_if_needed();
        let hash = self.dict_type.hash(&key);
        let exists = self.find_ref_by_hash(hash, &key).is_some();
        if exists {
            Entry::Occupied(OccupiedEntry {
                dict: self,
                key,
                hash,
            })
        } else {
            Entry::Vacant(VacantEntry {
                dict: self,
                key,
                hash,
            })
        }
    }

    /// Safe iterator: pauses rehash for its lifetime.
    pub fn iter(&self) -> Iter<'_, K, V, T> {
        Iter::new(self)
    }

    /// Safe mutable iterator.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, T> {
        IterMut::new(self)
    }

    /// Unsafe-in-spirit iterator: does not pause rehash, instead
    /// fingerprinting the dict's structural state at creation and
    /// asserting it is unchanged at release. Rust's borrow checker already
    /// forbids structural mutation for the `&Dict` this holds; the
    /// fingerprint is kept as a belt-and-suspenders invariant check.
    pub fn raw_iter(&self) -> RawIter<'_, K, V, T> {
        RawIter::new(self)
    }
}
