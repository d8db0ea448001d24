//! Distinct-count estimator facade tying hashing, registers and the
//! corrected estimate together.
//!
//! [`Estimator`] is defined by a `precision` parameter in the `[4..18]`
//! range and a hashing strategy `H`:
//! - `precision` is the log2 of the register count, i.e. the estimator
//!   keeps `m = 2^precision` registers and its expected relative error is
//!   `1.04 / sqrt(m)`.
//! - `H` maps keys to 64-bit digests; see the [`hash`](crate::hash) module.
//!
//! Each `insert` splits the digest into a bucket index (top `precision`
//! bits) and a rank (one plus the leading zeros of the remaining bits) and
//! raises the addressed register to the rank if larger. `calculate` scans
//! the registers and applies the regime-corrected harmonic-mean formula.
//!
//! Keys are never stored: memory use is fixed at construction regardless of
//! how many elements the stream carries. Insertion order does not affect
//! the register state, and re-inserting a key is a no-op.

use std::fmt::{self, Debug, Display, Formatter};
use std::marker::PhantomData;

use crate::correction::{self, RegisterScan};
use crate::hash::{ByteHash, KeyHasher, KeyView, Mix64, NumericKey};
use crate::registers::Registers;

/// Smallest supported precision (16 registers).
pub const MIN_PRECISION: u8 = 4;
/// Largest supported precision (262144 registers).
pub const MAX_PRECISION: u8 = 18;

/// Construction-time configuration error; the only fallible transition in
/// the estimator's lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Precision outside the `[MIN_PRECISION..=MAX_PRECISION]` range.
    InvalidPrecision(u8),
    /// Merge attempted between estimators with different register counts.
    IncompatiblePrecision {
        /// Precision of the estimator being merged into.
        lhs: u8,
        /// Precision of the estimator being merged from.
        rhs: u8,
    },
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::InvalidPrecision(p) => {
                write!(f, "precision {p} is outside the [{MIN_PRECISION}..{MAX_PRECISION}] range")
            }
            ConfigurationError::IncompatiblePrecision { lhs, rhs } => {
                write!(f, "cannot merge estimators with precisions {lhs} and {rhs}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// HyperLogLog estimator for the number of distinct keys of type `K`
/// observed in a stream.
pub struct Estimator<K: ?Sized, H = Mix64> {
    registers: Registers,
    hasher: H,
    _key: PhantomData<fn() -> *const K>,
}

impl<K: NumericKey> Estimator<K> {
    /// Create an estimator for numeric keys with `2^precision` registers,
    /// hashing keys through the SplitMix64 finalizer.
    pub fn new(precision: u8) -> Result<Self, ConfigurationError> {
        Self::with_hasher(precision, Mix64)
    }
}

impl<K: ?Sized, V: KeyView<K>> Estimator<K, ByteHash<V>> {
    /// Create an estimator for sequence-like keys. `view` is the extraction
    /// strategy reducing a key to the bytes that get hashed, e.g.
    /// `str::as_bytes`:
    ///
    /// ```
    /// use distinct_estimator::Estimator;
    ///
    /// let mut estimator = Estimator::<str, _>::with_key_adapter(12, str::as_bytes)?;
    /// estimator.insert("sean");
    /// estimator.insert("rebekka");
    /// estimator.insert("sean");
    /// assert_eq!(estimator.calculate(), 2);
    /// # Ok::<(), distinct_estimator::ConfigurationError>(())
    /// ```
    pub fn with_key_adapter(precision: u8, view: V) -> Result<Self, ConfigurationError> {
        Self::with_hasher(precision, ByteHash::new(view))
    }
}

impl<K: ?Sized, H: KeyHasher<K>> Estimator<K, H> {
    /// Create an estimator with an explicit hashing strategy.
    pub fn with_hasher(precision: u8, hasher: H) -> Result<Self, ConfigurationError> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(ConfigurationError::InvalidPrecision(precision));
        }
        Ok(Self {
            registers: Registers::new(precision),
            hasher,
            _key: PhantomData,
        })
    }

    /// Observe `key`. O(1), infallible, touches exactly one register.
    #[inline]
    pub fn insert(&mut self, key: &K) {
        let digest = self.hasher.digest(key);
        self.insert_digest(digest);
    }
}

impl<K: ?Sized, H> Estimator<K, H> {
    /// Observe a pre-computed 64-bit digest.
    ///
    /// Useful when the digest is already available, or to apply updates
    /// collected by per-worker estimators that share the same hashing
    /// strategy.
    #[inline]
    pub fn insert_digest(&mut self, digest: u64) {
        let precision = self.registers.precision();
        let idx = (digest >> (64 - u32::from(precision))) as usize;
        // Rank counts leading zeros among the bits not spent on the index;
        // the clamp covers the all-zero remainder.
        let rank = ((digest << precision).leading_zeros() + 1).min(correction::max_rank(precision));
        self.registers.update(idx, rank);
    }

    /// Return the distinct-count estimate, rounded to the nearest integer.
    ///
    /// Read-only and idempotent: repeated calls without intervening inserts
    /// return the same value. Expected relative error is
    /// `1.04 / sqrt(2^precision)`.
    pub fn calculate(&self) -> u64 {
        let scan = RegisterScan::run(self.registers.iter());
        let estimate = correction::estimate(self.registers.count(), scan);
        (estimate + 0.5) as u64
    }

    /// Fold another estimator of identical precision into this one via
    /// elementwise register max. The result is exactly the state this
    /// estimator would have reached had it seen both streams.
    pub fn merge(&mut self, rhs: &Self) -> Result<(), ConfigurationError> {
        if self.precision() != rhs.precision() {
            return Err(ConfigurationError::IncompatiblePrecision {
                lhs: self.precision(),
                rhs: rhs.precision(),
            });
        }
        self.registers.merge(&rhs.registers);
        Ok(())
    }

    /// Configured precision (log2 of the register count).
    #[inline]
    pub fn precision(&self) -> u8 {
        self.registers.precision()
    }

    /// Number of registers `m`.
    #[inline]
    pub fn registers(&self) -> usize {
        self.registers.count()
    }

    #[cfg(test)]
    pub(crate) fn register(&self, idx: usize) -> u32 {
        self.registers.get(idx)
    }

    #[cfg(test)]
    pub(crate) fn register_scan(&self) -> RegisterScan {
        RegisterScan::run(self.registers.iter())
    }
}

impl<K: ?Sized, H: Clone> Clone for Estimator<K, H> {
    fn clone(&self) -> Self {
        Self {
            registers: self.registers.clone(),
            hasher: self.hasher.clone(),
            _key: PhantomData,
        }
    }
}

impl<K: ?Sized, H> PartialEq for Estimator<K, H> {
    /// Estimators compare equal when their register state is identical,
    /// i.e. when they would answer every `calculate` call the same way.
    fn eq(&self, rhs: &Self) -> bool {
        self.registers == rhs.registers
    }
}

impl<K: ?Sized, H> Debug for Estimator<K, H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ precision: {}, registers: {}, estimate: {} }}",
            self.precision(),
            self.registers(),
            self.calculate()
        )
    }
}
