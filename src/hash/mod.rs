//! Process-wide hash seed shared by [`DefaultDictType`](crate::database::dict::DefaultDictType).
//!
//! A lazily-initialized, set-once 128-bit seed read by every hash call —
//! `OnceLock` gives us that without an `unsafe` static.

use std::sync::OnceLock;

use rand::RngCore;

/// A 128-bit SipHash key pair.
pub type HashSeed = (u64, u64);

static SEED: OnceLock<HashSeed> = OnceLock::new();

/// Sets the process-wide hash seed. Panics if called more than once.
pub fn init_seed(seed: HashSeed) {
    SEED.set(seed)
        .unwrap_or_else(|_| panic!("hash seed already initialized"));
}

/// Returns the process-wide hash seed, initializing it from the system
/// RNG on first use if [`init_seed`] was never called explicitly.
pub fn seed() -> HashSeed {
    *SEED.get_or_init(|| {
        let mut rng = rand::thread_rng();
        (rng.next_u64(), rng.next_u64())
    })
}

#[cfg(test)]
pub(crate) fn init_seed_for_test() {
    let _ = SEED.set((0x5EED_0001, 0x5EED_0002));
}
