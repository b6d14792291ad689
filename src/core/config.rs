#[cfg(all(feature = "serde", not(feature = "std")))]
use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::FeistelError;

/// How many rounds a network runs per cycle-walking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPolicy {
    /// Exactly this many rounds per pass.
    Fixed(u8),
    /// The fewest rounds per pass for which the rounds evaluated per accepted
    /// output, cycle-walking passes included, reach this average.
    MinimumAverage(u8),
}

/// Construction options for a [`Network`](crate::network::Network).
///
/// Exactly one of `rounds` and `minimum_average_rounds` must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkConfig {
    /// Fixed number of Feistel rounds per pass.
    pub rounds: Option<u8>,
    /// Minimum average rounds per accepted output. Small or awkwardly sized
    /// domains need several passes per output, which this counts, so the
    /// per-pass round count can be lowered accordingly.
    pub minimum_average_rounds: Option<u8>,
    /// Treat indices beyond `max_value` as further same-size blocks, each
    /// with its own keyed permutation, instead of rejecting them.
    pub epochs: bool,
}

impl NetworkConfig {
    /// Config with a fixed round count.
    pub fn with_rounds(rounds: u8) -> Self {
        Self {
            rounds: Some(rounds),
            ..Default::default()
        }
    }

    /// Config targeting a minimum average round count.
    pub fn with_minimum_average_rounds(rounds: u8) -> Self {
        Self {
            minimum_average_rounds: Some(rounds),
            ..Default::default()
        }
    }

    /// Enable epochs.
    pub fn with_epochs(mut self) -> Self {
        self.epochs = true;
        self
    }

    /// Validate the configuration, returning the round policy it selects.
    pub fn validate(&self) -> Result<RoundPolicy, FeistelError> {
        match (self.rounds, self.minimum_average_rounds) {
            (Some(rounds), None) if rounds > 0 => Ok(RoundPolicy::Fixed(rounds)),
            (None, Some(rounds)) if rounds > 0 => Ok(RoundPolicy::MinimumAverage(rounds)),
            _ => Err(FeistelError::RoundsMustBeSet),
        }
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
