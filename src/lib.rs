//! `distinct-estimator` estimates the number of distinct elements observed
//! in a stream using memory sublinear in the stream size.
//!
//! The crate implements classical HyperLogLog: a fixed array of
//! `2^precision` registers, each holding the maximum rank seen among the
//! keys hashed into its bucket, with a bias-corrected harmonic-mean
//! estimate read out on demand. Expected relative error is
//! `1.04 / sqrt(2^precision)`.
//!
//! Numeric keys are mixed directly through the SplitMix64 finalizer;
//! sequence-like keys are reduced to bytes by a caller-supplied strategy
//! and hashed with `wyhash`. Both paths are deterministic, so estimates
//! are reproducible across runs.
//!
//! ```
//! use distinct_estimator::Estimator;
//!
//! let mut estimator = Estimator::<u64>::new(12)?;
//! for key in 0..10_000u64 {
//!     estimator.insert(&key);
//! }
//! let estimate = estimator.calculate();
//! assert!(estimate > 9_000 && estimate < 11_000);
//! # Ok::<(), distinct_estimator::ConfigurationError>(())
//! ```

mod correction;
pub mod estimator;
pub mod hash;
mod registers;

pub use estimator::{ConfigurationError, Estimator, MAX_PRECISION, MIN_PRECISION};
pub use hash::{ByteHash, KeyHasher, KeyView, Mix64, NumericKey};
