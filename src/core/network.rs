#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::iter::FusedIterator;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{NetworkConfig, RoundPolicy};
use crate::epoch::Epoch;
use crate::error::FeistelError;
use crate::radix::RadixSplit;
use crate::round::{run_pass, Direction, Halves};
use crate::schedule::SeedSchedule;

/// Largest domain [`Network::permutation`] will materialize.
pub const MAX_MATERIALIZED_DOMAIN: u64 = 1 << 24;

/// Indices walked per candidate round count when calibrating a
/// minimum-average policy.
const CALIBRATION_SAMPLES: u64 = 256;

/// A keyed permutation of `[0, max_value]`, optionally extended to every
/// later block of the same size.
///
/// Immutable once built; share it freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    max_value: u64,
    split: RadixSplit,
    seeds: Vec<u64>,
    epochs: bool,
}

impl Network {
    /// Build a network for `[0, max_value]` keyed by `seed`.
    ///
    /// Seed expansion, radix selection and (for a minimum-average policy)
    /// round calibration all happen here.
    pub fn new(max_value: u64, seed: u64, config: &NetworkConfig) -> Result<Self, FeistelError> {
        let policy = config.validate()?;
        let split = RadixSplit::for_max_value(max_value);

        let seeds = match policy {
            RoundPolicy::Fixed(rounds) => SeedSchedule::expand(seed, rounds as usize),
            RoundPolicy::MinimumAverage(target) => {
                let mut seeds = SeedSchedule::expand(seed, target as usize);
                let rounds = calibrate_rounds(max_value, split, &seeds, target);
                seeds.truncate(rounds);
                seeds
            }
        };

        tracing::debug!(
            max_value,
            left = split.left,
            right = split.right,
            rounds = seeds.len(),
            epochs = config.epochs,
            "built feistel network"
        );

        Ok(Self {
            max_value,
            split,
            seeds,
            epochs: config.epochs,
        })
    }

    /// Shorthand for a fixed round count without epochs.
    pub fn with_rounds(max_value: u64, seed: u64, rounds: u8) -> Result<Self, FeistelError> {
        Self::new(max_value, seed, &NetworkConfig::with_rounds(rounds))
    }

    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    /// `max_value + 1`; `2^64` for the full `u64` domain.
    pub fn domain_size(&self) -> u128 {
        self.max_value as u128 + 1
    }

    /// Rounds per cycle-walking pass.
    pub fn rounds(&self) -> usize {
        self.seeds.len()
    }

    pub fn split(&self) -> RadixSplit {
        self.split
    }

    /// Per-round sub-seeds.
    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }

    pub fn epochs_enabled(&self) -> bool {
        self.epochs
    }

    /// Map `index` to its position in the permutation.
    pub fn map(&self, index: u64) -> Result<u64, FeistelError> {
        self.encode(index, Direction::Forward)
    }

    /// Inverse of [`map`](Self::map).
    pub fn invert_map(&self, index: u64) -> Result<u64, FeistelError> {
        self.encode(index, Direction::Inverse)
    }

    fn encode(&self, index: u64, direction: Direction) -> Result<u64, FeistelError> {
        let epoch = self.locate(index)?;
        let (offset, _) = self.walk(epoch.offset, epoch.key, direction);
        Ok(epoch.absolute(offset))
    }

    fn locate(&self, index: u64) -> Result<Epoch, FeistelError> {
        let out_of_range = FeistelError::IndexOutOfRange {
            index,
            max_value: self.max_value,
        };
        if index <= self.max_value {
            return Ok(Epoch::base(index));
        }
        if !self.epochs {
            return Err(out_of_range);
        }
        // index > max_value, so max_value + 1 cannot overflow here.
        Epoch::resolve(index, self.max_value + 1).ok_or(out_of_range)
    }

    /// Cycle-walk `offset` (which must be `<= max_value`) through the network.
    ///
    /// Returns the mapped offset and the number of passes it took.
    pub(crate) fn walk(&self, offset: u64, epoch_key: u64, direction: Direction) -> (u64, u32) {
        walk_with(
            self.max_value,
            self.split,
            &self.seeds,
            offset,
            epoch_key,
            direction,
        )
    }

    /// The base permutation as an iterator: `map(0), map(1), ..., map(max_value)`.
    pub fn shuffled(&self) -> Shuffled<'_> {
        Shuffled {
            network: self,
            next: Some(0),
        }
    }

    /// Materialize the base permutation, `permutation[i] == map(i)`.
    ///
    /// Returns `None` for domains larger than [`MAX_MATERIALIZED_DOMAIN`].
    pub fn permutation(&self) -> Option<Vec<u64>> {
        let traced = self.trace_domain()?;
        Some(traced.into_iter().map(|(value, _)| value).collect())
    }

    /// Forward-walk every base index, keeping the pass count of each.
    pub(crate) fn trace_domain(&self) -> Option<Vec<(u64, u32)>> {
        if self.max_value >= MAX_MATERIALIZED_DOMAIN {
            return None;
        }

        #[cfg(feature = "parallel")]
        let traced = (0..=self.max_value)
            .into_par_iter()
            .map(|index| self.walk(index, 0, Direction::Forward))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let traced = (0..=self.max_value)
            .map(|index| self.walk(index, 0, Direction::Forward))
            .collect();

        Some(traced)
    }
}

fn walk_with(
    max_value: u64,
    split: RadixSplit,
    seeds: &[u64],
    offset: u64,
    epoch_key: u64,
    direction: Direction,
) -> (u64, u32) {
    if max_value == 0 {
        return (0, 0);
    }

    let mut halves = Halves::split(offset, split);
    let mut passes = 0u32;
    loop {
        halves = run_pass(halves, split, seeds, epoch_key, direction);
        passes += 1;

        let candidate = halves.combine(split);
        if candidate <= max_value as u128 {
            if passes > 1 {
                tracing::trace!(offset, passes, "cycle walk needed extra passes");
            }
            return (candidate as u64, passes);
        }
    }
}

/// Pick the round count for a minimum-average policy.
///
/// Starts from the analytic estimate `ceil(target * N / capacity)` and
/// accepts the first count whose empirical rounds per accepted output, over a
/// strided sample of the domain, reach `target`. `target` itself always
/// qualifies since every output costs at least one pass.
fn calibrate_rounds(max_value: u64, split: RadixSplit, seeds: &[u64], target: u8) -> usize {
    let target = target as usize;
    if max_value == 0 {
        return target;
    }

    let n = max_value as u128 + 1;
    let estimate = (target as u128 * n).div_ceil(split.capacity()) as usize;
    let start = estimate.clamp(1, target);

    let samples = n.min(CALIBRATION_SAMPLES as u128) as u64;
    let sample = |k: u64| (k as u128 * n / samples as u128) as u64;

    for rounds in start..target {
        let passes: u64 = (0..samples)
            .map(|k| {
                let (_, passes) = walk_with(
                    max_value,
                    split,
                    &seeds[..rounds],
                    sample(k),
                    0,
                    Direction::Forward,
                );
                passes as u64
            })
            .sum();

        if rounds as u64 * passes >= target as u64 * samples {
            tracing::debug!(
                target_rounds = target,
                rounds,
                mean_passes = passes as f64 / samples as f64,
                "calibrated round count"
            );
            return rounds;
        }
    }

    tracing::debug!(
        target_rounds = target,
        "calibration kept the target round count"
    );
    target
}

/// Iterator over the base permutation, see [`Network::shuffled`].
#[derive(Debug, Clone)]
pub struct Shuffled<'a> {
    network: &'a Network,
    next: Option<u64>,
}

impl Iterator for Shuffled<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let index = self.next?;
        self.next = index.checked_add(1).filter(|&i| i <= self.network.max_value);
        let (value, _) = self.network.walk(index, 0, Direction::Forward);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            None => (0, Some(0)),
            Some(index) => {
                let remaining = self.network.max_value - index;
                match usize::try_from(remaining).ok().and_then(|r| r.checked_add(1)) {
                    Some(len) => (len, Some(len)),
                    None => (usize::MAX, None),
                }
            }
        }
    }
}

impl FusedIterator for Shuffled<'_> {}
