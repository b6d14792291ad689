// Round key schedule (no external crates).
//
// This is NOT cryptographically secure.
// It only decorrelates rounds and epochs from one another.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Golden-ratio increment added before each SplitMix64 finalization.
pub const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer.
///
/// Used both to expand the user seed and as the round function's hash.
#[inline]
pub fn mix64(x: u64) -> u64 {
    let mut x = x.wrapping_add(GOLDEN_GAMMA);
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Chained expansion of one seed into per-round sub-seeds.
///
/// Entry `i` is `mix64` applied `i + 1` times to the seed, so a longer
/// schedule always starts with the entries of a shorter one.
#[derive(Debug, Clone)]
pub struct SeedSchedule {
    state: u64,
}

impl SeedSchedule {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Collect the first `rounds` sub-seeds for `seed`.
    pub fn expand(seed: u64, rounds: usize) -> Vec<u64> {
        Self::new(seed).take(rounds).collect()
    }
}

impl Iterator for SeedSchedule {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        self.state = mix64(self.state);
        Some(self.state)
    }
}
