//! Whole-domain statistics for a network's base permutation.
//!
//! A uniformly random permutation of `N` values has on average one fixed
//! point, about `ln N + γ` cycles, and a lag-1 serial correlation of
//! `-1/(N-1)`. These numbers are how a network is judged "random enough".

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::network::Network;

/// Euler-Mascheroni constant.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    pub domain_size: u64,
    /// Indices with `map(i) == i`.
    pub fixed_points: u64,
    pub cycle_count: u64,
    pub longest_cycle: u64,
    /// Cycle-walking passes summed over the domain.
    pub total_passes: u64,
    /// Most passes any single index needed.
    pub max_passes: u32,
    /// Pearson correlation of `map(i)` against `map(i + 1)`.
    pub lag1_correlation: f64,
}

impl Diagnostics {
    pub fn mean_passes(&self) -> f64 {
        self.total_passes as f64 / self.domain_size as f64
    }

    /// Lag-1 correlation expected from a uniformly random permutation.
    pub fn expected_lag1_correlation(&self) -> f64 {
        if self.domain_size < 2 {
            return 0.0;
        }
        -1.0 / (self.domain_size - 1) as f64
    }

    /// `ceil(ln N + γ + z * sqrt(ln N))`: an upper band on the cycle count
    /// of a random permutation, `z` standard deviations above the mean.
    pub fn cycle_bound(&self, z: f64) -> u64 {
        if self.domain_size < 2 {
            return self.domain_size;
        }
        let ln = (self.domain_size as f64).ln();
        (ln + EULER_GAMMA + z * ln.sqrt()).ceil() as u64
    }

    pub fn cycles_within_bound(&self) -> bool {
        self.cycle_count <= self.cycle_bound(3.0)
    }
}

impl Network {
    /// Compute [`Diagnostics`] over the base domain.
    ///
    /// Returns `None` for domains too large to materialize.
    pub fn diagnostics(&self) -> Option<Diagnostics> {
        let traced = self.trace_domain()?;
        let outputs: Vec<u64> = traced.iter().map(|&(value, _)| value).collect();

        let fixed_points = outputs
            .iter()
            .enumerate()
            .filter(|&(i, &v)| i as u64 == v)
            .count() as u64;

        let (cycle_count, longest_cycle) = cycle_structure(&outputs);

        let diag = Diagnostics {
            domain_size: outputs.len() as u64,
            fixed_points,
            cycle_count,
            longest_cycle,
            total_passes: traced.iter().map(|&(_, p)| p as u64).sum(),
            max_passes: traced.iter().map(|&(_, p)| p).max().unwrap_or(0),
            lag1_correlation: lag1_correlation(&outputs),
        };

        tracing::debug!(
            domain_size = diag.domain_size,
            fixed_points = diag.fixed_points,
            cycles = diag.cycle_count,
            mean_passes = diag.mean_passes(),
            "computed permutation diagnostics"
        );

        Some(diag)
    }
}

fn cycle_structure(perm: &[u64]) -> (u64, u64) {
    let mut seen = vec![false; perm.len()];
    let mut count = 0u64;
    let mut longest = 0u64;

    for start in 0..perm.len() {
        if seen[start] {
            continue;
        }
        count += 1;
        let mut len = 0u64;
        let mut i = start;
        while !seen[i] {
            seen[i] = true;
            len += 1;
            i = perm[i] as usize;
        }
        longest = longest.max(len);
    }

    (count, longest)
}

fn lag1_correlation(values: &[u64]) -> f64 {
    if values.len() < 3 {
        return 0.0;
    }
    let xs = &values[..values.len() - 1];
    let ys = &values[1..];
    let n = xs.len() as f64;

    let mean_x = xs.iter().map(|&v| v as f64).sum::<f64>() / n;
    let mean_y = ys.iter().map(|&v| v as f64).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x as f64 - mean_x;
        let dy = y as f64 - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return 0.0;
    }
    sxy / (sxx * syy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_structure_of_known_permutations() {
        assert_eq!(cycle_structure(&[0, 1, 2, 3]), (4, 1));
        assert_eq!(cycle_structure(&[1, 2, 3, 0]), (1, 4));
        assert_eq!(cycle_structure(&[1, 0, 3, 2, 4]), (3, 2));
    }

    #[test]
    fn correlation_of_monotone_sequences() {
        let up: Vec<u64> = (0..100).collect();
        assert!((lag1_correlation(&up) - 1.0).abs() < 1e-9);
        assert_eq!(lag1_correlation(&[0, 1]), 0.0);
        assert_eq!(lag1_correlation(&[5, 5, 5, 5]), 0.0);
    }

    #[test]
    fn cycle_bound_grows_with_domain() {
        let mut diag = Diagnostics {
            domain_size: 14,
            fixed_points: 0,
            cycle_count: 0,
            longest_cycle: 0,
            total_passes: 0,
            max_passes: 0,
            lag1_correlation: 0.0,
        };
        // ln 14 = 2.639; 2.639 + 0.577 + 3 * 1.624 = 8.09
        assert_eq!(diag.cycle_bound(3.0), 9);
        diag.domain_size = 1_000_000;
        assert!(diag.cycle_bound(3.0) > 9);
        diag.domain_size = 1;
        assert_eq!(diag.cycle_bound(3.0), 1);
    }

    #[test]
    fn diagnostics_of_a_small_network() {
        let net = Network::with_rounds(1000, 0, 8).unwrap();
        let diag = net.diagnostics().unwrap();
        assert_eq!(diag.domain_size, 1001);
        assert!(diag.longest_cycle <= 1001);
        assert!(diag.total_passes >= 1001);
        // Every grid cell is visited at most once across all walks.
        assert!(diag.total_passes as u128 <= net.split().capacity());
        assert!(diag.cycles_within_bound());
        assert!((diag.expected_lag1_correlation() + 0.001).abs() < 1e-12);
    }

    #[test]
    fn diagnostics_of_the_identity_domain() {
        let net = Network::with_rounds(0, 0, 1).unwrap();
        let diag = net.diagnostics().unwrap();
        assert_eq!(diag.domain_size, 1);
        assert_eq!(diag.fixed_points, 1);
        assert_eq!(diag.cycle_count, 1);
        assert_eq!(diag.total_passes, 0);
        assert_eq!(diag.mean_passes(), 0.0);
    }
}
