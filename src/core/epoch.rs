//! Epoch resolution: one keyed network, many same-size blocks.
//!
//! With epochs enabled, index `i` belongs to block `i / N` and is permuted
//! within `[origin, origin + max_value]` under a key derived from the block
//! origin. Block 0 keeps key 0, so the base permutation does not change when
//! epochs are switched on.

use crate::schedule::mix64;

/// Where an index sits: its block origin, its offset in the block, and the
/// key mixed into every round for that block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    pub origin: u64,
    pub offset: u64,
    pub key: u64,
}

impl Epoch {
    /// The base block.
    #[inline]
    pub fn base(offset: u64) -> Self {
        Self {
            origin: 0,
            offset,
            key: 0,
        }
    }

    /// Resolve `index` against blocks of `domain_size` values.
    ///
    /// Returns `None` when the block would run past `u64::MAX`: the truncated
    /// final block cannot be permuted onto itself.
    pub fn resolve(index: u64, domain_size: u64) -> Option<Self> {
        let offset = index % domain_size;
        let origin = index - offset;
        if origin == 0 {
            return Some(Self::base(offset));
        }
        origin.checked_add(domain_size - 1)?;
        Some(Self {
            origin,
            offset,
            key: mix64(origin),
        })
    }

    /// Translate an in-block offset back to an absolute index.
    #[inline]
    pub fn absolute(&self, offset: u64) -> u64 {
        self.origin + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_block_has_no_key() {
        assert_eq!(Epoch::resolve(7, 10), Some(Epoch::base(7)));
        assert_eq!(Epoch::resolve(0, 10), Some(Epoch::base(0)));
    }

    #[test]
    fn later_blocks_split_origin_and_offset() {
        let epoch = Epoch::resolve(23, 10).unwrap();
        assert_eq!(epoch.origin, 20);
        assert_eq!(epoch.offset, 3);
        assert_eq!(epoch.key, mix64(20));
        assert_eq!(epoch.absolute(9), 29);
    }

    #[test]
    fn blocks_get_distinct_keys() {
        let a = Epoch::resolve(10, 10).unwrap();
        let b = Epoch::resolve(20, 10).unwrap();
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn truncated_final_block_is_rejected() {
        // u64::MAX = 18446744073709551615; blocks of 10 end at ...609, the
        // block starting at ...610 would need ...619.
        assert_eq!(Epoch::resolve(u64::MAX, 10), None);
        assert_eq!(Epoch::resolve(u64::MAX - 5, 10), None);

        let last_full = Epoch::resolve(u64::MAX - 6, 10).unwrap();
        assert_eq!(last_full.absolute(9), u64::MAX - 6);
    }

    #[test]
    fn exact_final_block_is_accepted() {
        // 2^64 is divisible by 16, so the last block ends exactly at u64::MAX.
        let epoch = Epoch::resolve(u64::MAX, 16).unwrap();
        assert_eq!(epoch.absolute(15), u64::MAX);
    }
}
