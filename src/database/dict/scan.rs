//! Reverse-binary-increment scan cursor.

use super::{Dict, DictType};

/// Advances `cursor` by reverse-binary increment relative to `mask`:
/// flips the increment direction so that cursors visit every bucket
/// exactly once per cycle even as the table grows or shrinks mid-scan.
fn reverse_binary_increment(
    cursor: u64,
    mask: u64,
) -> u64 {
    let mut v = cursor | !mask;
    v = v.reverse_bits();
    v = v.wrapping_add(1);
    v.reverse_bits()
}

impl<K, V, T> Dict<K, V, T>
where
    T: DictType<K, V>,
{
    /// Visits one bucket (or, mid-rehash, the corresponding buckets in
    /// both tables) and returns the next cursor; `0` signals a
    /// completed cycle. `f` is invoked once per live entry visited.
    pub fn scan(
        &self,
        cursor: u64,
        mut f: impl FnMut(&K, &V),
    ) -> u64 {
        if !self.tables[0].is_allocated() {
            return 0;
        }
        if !self.is_rehashing() {
            let mask = self.tables[0].mask as u64;
            let idx = (cursor & mask) as usize;
            Self::visit_bucket(&self.tables[0], idx, &mut f);
            return reverse_binary_increment(cursor, mask);
        }

        let (small, large) = if self.tables[0].size() <= self.tables[1].size() {
            (0usize, 1usize)
        } else {
            (1usize, 0usize)
        };
        let mask_small = self.tables[small].mask as u64;
        let mask_large = self.tables[large].mask as u64;
        let idx_small = (cursor & mask_small) as usize;
        Self::visit_bucket(&self.tables[small], idx_small, &mut f);

        let mut idx_large = idx_small;
        loop {
            Self::visit_bucket(&self.tables[large], idx_large, &mut f);
            idx_large += (mask_small + 1) as usize;
            if idx_large as u64 > mask_large {
                break;
            }
        }
        reverse_binary_increment(cursor, mask_large)
    }

    fn visit_bucket(
        table: &super::DictTable<K, V>,
        idx: usize,
        f: &mut impl FnMut(&K, &V),
    ) {
        let mut cur = table.buckets[idx].as_deref();
        while let Some(entry) = cur {
            f(&entry.key, &entry.val);
            cur = entry.next.as_deref();
        }
    }
}
