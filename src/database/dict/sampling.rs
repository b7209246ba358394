//! Random sampling, backed by
//! `rand::rngs::SmallRng` (Xoshiro256++) in place of the source's
//! mt19937-64 — see DESIGN.md for the Open Question this resolves.

use rand::Rng;

use super::{Dict, DictType};

/// Number of candidate buckets `fair_random_key` samples before picking
/// uniformly among the entries found, reducing the chain-length bias a
/// single-bucket pick would have.
const FAIR_SAMPLE_CANDIDATES: usize = 5;

impl<K, V, T> Dict<K, V, T>
where
    T: DictType<K, V>,
{
    fn pick_table_for_sampling(&mut self) -> usize {
        if !self.is_rehashing() {
            return 0;
        }
        let u0 = self.tables[0].used as f64;
        let u1 = self.tables[1].used as f64;
        let total = (u0 + u1).max(1.0);
        if self.rng.gen_bool((u1 / total).clamp(0.0, 1.0)) {
            1
        } else {
            0
        }
    }

    /// `GetRandomKey`: amortized-uniform over entries —
    /// picks a random bucket, then a random position in its chain.
    pub fn random_key(&mut self) -> Option<(&K, &V)> {
        self.rehash_step_if_needed();
        if self.is_empty() {
            return None;
        }
        loop {
            let table_idx = self.pick_table_for_sampling();
            let size = self.tables[table_idx].size();
            if size == 0 {
                continue;
            }
            let idx = self.rng.gen_range(0..size);
            if self.tables[table_idx].buckets[idx].is_none() {
                continue;
            }
            let chain_len = {
                let mut n = 0usize;
                let mut cur = self.tables[table_idx].buckets[idx].as_deref();
                while let Some(e) = cur {
                    n += 1;
                    cur = e.next.as_deref();
                }
                n
            };
            let pick = self.rng.gen_range(0..chain_len);
            let mut cur = self.tables[table_idx].buckets[idx].as_deref().unwrap();
            for _ in 0..pick {
                cur = cur.next.as_deref().unwrap();
            }
            return Some((&cur.key, &cur.val));
        }
    }

    /// `GetFairRandomKey`: samples several candidate
    /// buckets and picks uniformly among the entries found, rather than
    /// uniformly among buckets (which would over-represent long chains'
    /// neighbours... the opposite bias `random_key` has).
    pub fn fair_random_key(&mut self) -> Option<(&K, &V)> {
        self.rehash_step_if_needed();
        if self.is_empty() {
            return None;
        }
        let mut candidates: Vec<(usize, usize)> = Vec::new();
        for _ in 0..FAIR_SAMPLE_CANDIDATES {
            let table_idx = self.pick_table_for_sampling();
            let size = self.tables[table_idx].size();
            if size == 0 {
                continue;
            }
            let idx = self.rng.gen_range(0..size);
            if self.tables[table_idx].buckets[idx].is_some() {
                candidates.push((table_idx, idx));
            }
        }
        if candidates.is_empty() {
            return self.random_key();
        }
        let (table_idx, idx) = candidates[self.rng.gen_range(0..candidates.len())];
        let chain_len = {
            let mut n = 0usize;
            let mut cur = self.tables[table_idx].buckets[idx].as_deref();
            while let Some(e) = cur {
                n += 1;
                cur = e.next.as_deref();
            }
            n
        };
        let pick = self.rng.gen_range(0..chain_len);
        let mut cur = self.tables[table_idx].buckets[idx].as_deref().unwrap();
        for _ in 0..pick {
            cur = cur.next.as_deref().unwrap();
        }
        Some((&cur.key, &cur.val))
    }

    /// `GetSomeKeys(count)`: cluster-samples up to
    /// `count` entries starting from a random bucket. Not guaranteed
    /// unique across calls, only within one call.
    pub fn some_keys(&mut self, count: usize) -> Vec<(&K, &V)> {
        self.rehash_step_if_needed();
        let mut out = Vec::new();
        if self.is_empty() || count == 0 {
            return out;
        }
        let table_idx = if self.tables[0].used > 0 { 0 } else { 1 };
        let size = self.tables[table_idx].size();
        if size == 0 {
            return out;
        }
        let start = self.rng.gen_range(0..size);
        'outer: for step in 0..size {
            let idx = (start + step) % size;
            let mut cur = self.tables[table_idx].buckets[idx].as_deref();
            while let Some(e) = cur {
                out.push((&e.key, &e.val));
                if out.len() >= count {
                    break 'outer;
                }
                cur = e.next.as_deref();
            }
        }
        out
    }
}
