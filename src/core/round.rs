//! The keyed Feistel round over unequal radices.
//!
//! Even rounds update the low half from a hash of the high half, odd rounds
//! update the high half from a hash of the low half. The hashed half is never
//! the one being changed, so the same `f` is recomputed in both directions
//! and subtraction undoes addition exactly.

use crate::radix::RadixSplit;
use crate::schedule::mix64;

/// Which way the rounds are replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Rounds `0..rounds`, adding the round function.
    Forward,
    /// Rounds `rounds-1..=0`, subtracting the round function.
    Inverse,
}

/// An index split into its Feistel halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halves {
    /// `index % split.left`
    pub low: u64,
    /// `index / split.left`
    pub high: u64,
}

impl Halves {
    #[inline]
    pub fn split(index: u64, split: RadixSplit) -> Self {
        Self {
            low: index % split.left,
            high: index / split.left,
        }
    }

    /// Recombine into a grid position. May exceed `u64` for splits whose
    /// capacity does.
    #[inline]
    pub fn combine(self, split: RadixSplit) -> u128 {
        self.low as u128 + self.high as u128 * split.left as u128
    }
}

#[inline]
fn shift(value: u64, f: u64, radix: u64, direction: Direction) -> u64 {
    match direction {
        Direction::Forward => (value + f) % radix,
        Direction::Inverse => (value + (radix - f)) % radix,
    }
}

/// Apply round `round` with sub-seed `sub_seed` and epoch key `epoch_key`.
#[inline]
pub fn apply_round(
    halves: Halves,
    split: RadixSplit,
    round: usize,
    sub_seed: u64,
    epoch_key: u64,
    direction: Direction,
) -> Halves {
    if round % 2 == 0 {
        let f = mix64(halves.high ^ epoch_key ^ sub_seed) % split.left;
        Halves {
            low: shift(halves.low, f, split.left, direction),
            ..halves
        }
    } else {
        let f = mix64(halves.low ^ epoch_key ^ sub_seed) % split.right;
        Halves {
            high: shift(halves.high, f, split.right, direction),
            ..halves
        }
    }
}

/// Run every round once, in schedule order for `Forward` and reversed for
/// `Inverse`.
#[inline]
pub fn run_pass(
    halves: Halves,
    split: RadixSplit,
    seeds: &[u64],
    epoch_key: u64,
    direction: Direction,
) -> Halves {
    let step = |h: Halves, (round, &seed): (usize, &u64)| {
        apply_round(h, split, round, seed, epoch_key, direction)
    };
    match direction {
        Direction::Forward => seeds.iter().enumerate().fold(halves, step),
        Direction::Inverse => seeds.iter().enumerate().rev().fold(halves, step),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLIT: RadixSplit = RadixSplit { left: 7, right: 11 };

    #[test]
    fn split_and_combine_are_inverse() {
        for index in 0..77u64 {
            let halves = Halves::split(index, SPLIT);
            assert!(halves.low < SPLIT.left);
            assert!(halves.high < SPLIT.right);
            assert_eq!(halves.combine(SPLIT), index as u128);
        }
    }

    #[test]
    fn even_rounds_touch_only_the_low_half() {
        let before = Halves { low: 3, high: 9 };
        let after = apply_round(before, SPLIT, 0, 0xDEAD_BEEF, 0, Direction::Forward);
        assert_eq!(after.high, before.high);
        assert!(after.low < SPLIT.left);
    }

    #[test]
    fn odd_rounds_touch_only_the_high_half() {
        let before = Halves { low: 3, high: 9 };
        let after = apply_round(before, SPLIT, 1, 0xDEAD_BEEF, 0, Direction::Forward);
        assert_eq!(after.low, before.low);
        assert!(after.high < SPLIT.right);
    }

    #[test]
    fn inverse_round_undoes_forward_round() {
        for round in 0..4 {
            for index in 0..77u64 {
                let start = Halves::split(index, SPLIT);
                let fwd = apply_round(start, SPLIT, round, 12345, 678, Direction::Forward);
                let back = apply_round(fwd, SPLIT, round, 12345, 678, Direction::Inverse);
                assert_eq!(back, start, "round {round} index {index}");
            }
        }
    }

    #[test]
    fn pass_is_a_bijection_on_the_grid() {
        let seeds = [1u64, 2, 3, 4, 5];
        let mut seen = [false; 77];
        for index in 0..77u64 {
            let out = run_pass(Halves::split(index, SPLIT), SPLIT, &seeds, 0, Direction::Forward);
            let pos = out.combine(SPLIT) as usize;
            assert!(!seen[pos], "collision at {pos}");
            seen[pos] = true;
            let back = run_pass(out, SPLIT, &seeds, 0, Direction::Inverse);
            assert_eq!(back.combine(SPLIT), index as u128);
        }
    }

    #[test]
    fn epoch_key_changes_the_pass() {
        let seeds = [11u64, 22, 33, 44];
        let differs = (0..77u64).any(|index| {
            let start = Halves::split(index, SPLIT);
            run_pass(start, SPLIT, &seeds, 0, Direction::Forward)
                != run_pass(start, SPLIT, &seeds, mix64(77), Direction::Forward)
        });
        assert!(differs);
    }
}
