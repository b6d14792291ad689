//! # feistel
//!
//! Keyed, invertible pseudorandom permutations of `[0, max_value]`.
//!
//! A [`Network`](network::Network) is a Feistel network over two unequal
//! radices covering the domain, with cycle walking to pull outputs that land
//! outside the domain back in. Use it to turn sequential IDs into
//! non-obvious ones, or as a stateless shuffle for sharding and load
//! balancing. It is NOT cryptographically secure.
//!
//! ## Quick Start
//!
//! ```
//! use feistel::prelude::*;
//!
//! let net = Network::with_rounds(9, 42, 8).unwrap();
//! let mapped = net.map(3).unwrap();
//! assert!(mapped <= 9);
//! assert_eq!(net.invert_map(mapped).unwrap(), 3);
//!
//! // Epochs: every later block of 10 gets its own permutation.
//! let net = Network::new(9, 42, &NetworkConfig::with_rounds(8).with_epochs()).unwrap();
//! let mapped = net.map(25).unwrap();
//! assert!((20..=29).contains(&mapped));
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support, permutation diagnostics
//! - `serde` (default): Enable serialization/deserialization and JSON configs
//! - `parallel`: Materialize whole domains in parallel via rayon
//! - `cli`: Build the `feistel` demo binary
//!
//! ## no_std Support
//!
//! Disable default features for `no_std` environments (`alloc` is required):
//! ```toml
//! feistel = { version = "0.1", default-features = false }
//! ```
//!
//! ## Modules
//!
//! - [`network`]: Construction, mapping and cycle walking
//! - [`config`]: Round policy and epoch options
//! - [`radix`]: Domain splitting
//! - [`round`]: The keyed round function
//! - [`schedule`]: Seed expansion
//! - [`epoch`]: Block resolution for epochs

// no_std support
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[path = "core/config.rs"]
pub mod config;

#[cfg(feature = "std")]
#[path = "core/diagnostics.rs"]
pub mod diagnostics;

#[path = "core/epoch.rs"]
pub mod epoch;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/network.rs"]
pub mod network;

#[path = "core/radix.rs"]
pub mod radix;

#[path = "core/round.rs"]
pub mod round;

#[path = "core/schedule.rs"]
pub mod schedule;

/// Prelude module for convenient imports.
///
/// ```
/// use feistel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{NetworkConfig, RoundPolicy};
    #[cfg(feature = "std")]
    pub use crate::diagnostics::Diagnostics;
    pub use crate::error::FeistelError;
    pub use crate::network::{Network, Shuffled};
    pub use crate::radix::RadixSplit;
}
