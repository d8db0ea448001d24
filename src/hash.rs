//! Hash adapters turning keys into 64-bit digests.
//!
//! Two strategies are provided:
//! - [`Mix64`] feeds numeric keys through the SplitMix64 finalizer, so that
//!   the bits used for bucket indexing stay uncorrelated with the bits used
//!   for rank extraction.
//! - [`ByteHash`] reduces sequence-like keys to a byte view with a
//!   caller-supplied [`KeyView`] strategy and hashes the bytes with `wyhash`
//!   under a fixed seed.
//!
//! Both strategies are deterministic and unseeded by default, so estimates
//! are reproducible across runs and platforms.

/// Strategy producing a 64-bit digest for a key.
///
/// Implementations must be deterministic and stable for the lifetime of the
/// estimator they are attached to, and statistically uniform over `u64`.
pub trait KeyHasher<K: ?Sized> {
    /// Digest `key` into 64 near-uniform bits.
    fn digest(&self, key: &K) -> u64;
}

/// Keys with a canonical 64-bit representation suitable for direct mixing.
pub trait NumericKey: Copy {
    /// The key's bits, widened or reinterpreted into a `u64`.
    fn to_u64(self) -> u64;
}

macro_rules! numeric_key_widening {
    ($($t:ty),*) => {
        $(impl NumericKey for $t {
            #[inline]
            fn to_u64(self) -> u64 {
                u64::from(self)
            }
        })*
    };
}

macro_rules! numeric_key_bits {
    ($($t:ty),*) => {
        $(impl NumericKey for $t {
            #[inline]
            fn to_u64(self) -> u64 {
                self as u64
            }
        })*
    };
}

numeric_key_widening!(u8, u16, u32, u64);
numeric_key_bits!(usize, i8, i16, i32, i64, isize);

/// Hash adapter for numeric keys: the SplitMix64 avalanche finalizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mix64;

impl<K: NumericKey> KeyHasher<K> for Mix64 {
    #[inline]
    fn digest(&self, key: &K) -> u64 {
        mix64(key.to_u64())
    }
}

/// SplitMix64 finalizer: every input bit affects roughly half of the output
/// bits, which is what makes splitting the digest into index and rank safe.
#[inline]
pub(crate) fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// Strategy reducing a sequence-like key to the byte view that gets hashed.
///
/// Implemented for any `for<'a> Fn(&'a K) -> &'a [u8]`. Named functions
/// like `str::as_bytes` or `String::as_bytes` carry that higher-ranked
/// signature and work directly; inline closures generally infer a less
/// general one, so prefer a fn item (or implement the trait by hand).
pub trait KeyView<K: ?Sized> {
    /// Borrow the bytes representing `key`.
    fn view<'a>(&self, key: &'a K) -> &'a [u8];
}

impl<K: ?Sized, F> KeyView<K> for F
where
    F: for<'a> Fn(&'a K) -> &'a [u8],
{
    #[inline]
    fn view<'a>(&self, key: &'a K) -> &'a [u8] {
        self(key)
    }
}

/// Seed used by [`ByteHash`] unless overridden; fixed for reproducibility.
pub const DEFAULT_BYTE_HASH_SEED: u64 = 0;

/// Hash adapter for sequence-like keys: a caller-supplied byte extraction
/// strategy followed by `wyhash`.
#[derive(Clone, Copy, Debug)]
pub struct ByteHash<V> {
    view: V,
    seed: u64,
}

impl<V> ByteHash<V> {
    /// Create a byte hasher with the default seed.
    #[inline]
    pub fn new(view: V) -> Self {
        Self::with_seed(view, DEFAULT_BYTE_HASH_SEED)
    }

    /// Create a byte hasher with an explicit seed.
    #[inline]
    pub fn with_seed(view: V, seed: u64) -> Self {
        Self { view, seed }
    }
}

impl<K: ?Sized, V: KeyView<K>> KeyHasher<K> for ByteHash<V> {
    #[inline]
    fn digest(&self, key: &K) -> u64 {
        wyhash::wyhash(self.view.view(key), self.seed)
    }
}
