//! Domain splitting for the Feistel halves.
//!
//! A domain of `N = max_value + 1` indices is covered by a `left x right`
//! grid. Every grid cell outside the domain costs an extra cycle-walking pass
//! for some input, so the split aims for the smallest product `>= N` with
//! both factors near `sqrt(N)`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two moduli of the Feistel halves.
///
/// `left` is the radix of the low half (`index % left`), `right` of the high
/// half (`index / left`). `left * right` always covers the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadixSplit {
    pub left: u64,
    pub right: u64,
}

impl RadixSplit {
    /// Split for tiny domains (at most 3 values).
    pub const MINIMAL: Self = Self { left: 2, right: 2 };

    /// Split for the full `u64` domain (`2^64` values).
    pub const FULL: Self = Self {
        left: 1 << 32,
        right: 1 << 32,
    };

    /// Choose the split for the domain `[0, max_value]`.
    ///
    /// The search walks down from `floor(sqrt(N))` until it finds a divisor
    /// or `current` drops below `sqrt(N / 2)`. Without a divisor near the
    /// root that is about `0.29 * sqrt(N)` divisions, so construction for
    /// domains near `2^64` can take seconds.
    pub fn for_max_value(max_value: u64) -> Self {
        if max_value < 3 {
            return Self::MINIMAL;
        }
        if max_value == u64::MAX {
            return Self::FULL;
        }

        let n = max_value + 1;
        let sqrt = n.isqrt();

        // (current, other, score)
        let mut best: Option<(u64, u64, u128)> = None;

        let mut current = sqrt;
        while current > 1 && current * 2 > n / current {
            if n % current == 0 {
                return Self {
                    left: current,
                    right: n / current,
                };
            }

            let other = n / current + 1;
            let excess = other as u128 * current as u128 - n as u128;
            let score = excess + other.abs_diff(current) as u128;

            if best.is_none_or(|(_, _, s)| score < s) {
                best = Some((current, other, score));
            }
            current -= 1;
        }

        match best {
            Some((left, right, _)) => Self { left, right },
            // The scan is empty only when sqrt * 2 == n / sqrt (n == 8).
            None => Self {
                left: sqrt,
                right: n.div_ceil(sqrt),
            },
        }
    }

    /// Number of cells in the `left x right` grid.
    #[inline]
    pub fn capacity(&self) -> u128 {
        self.left as u128 * self.right as u128
    }
}
