//! Bias-corrected cardinality estimate computed from a register scan.
//!
//! The raw harmonic-mean estimate `alpha_m * m^2 / sum(2^-reg[i])` is
//! accurate only in the middle of its range; two further regimes correct it
//! at the extremes:
//! - small range: linear counting over the still-zero registers
//! - large range: collision correction as the estimate approaches the
//!   64-bit hash space
//!
//! Reference: Flajolet et al., *HyperLogLog: the analysis of a near-optimal
//! cardinality estimation algorithm*.

/// Digest width the large-range correction is computed for.
const DIGEST_BITS: u32 = 64;

/// `2^64` as a float.
const HASH_SPACE: f64 = 18_446_744_073_709_551_616.0;

/// Bias-correction constant `alpha_m`. The first three entries are the
/// empirically derived values from the HyperLogLog paper; larger register
/// counts use the asymptotic formula.
#[inline]
pub(crate) fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    }
}

/// Summary of one pass over the registers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RegisterScan {
    /// Number of registers still equal to zero.
    pub(crate) zeros: usize,
    /// Harmonic sum `sum(2^-reg[i])` over all registers.
    pub(crate) harmonic_sum: f64,
}

impl RegisterScan {
    /// Scan register values, accumulating the zero count and harmonic sum.
    pub(crate) fn run(registers: impl Iterator<Item = u32>) -> Self {
        let mut zeros = 0;
        let mut harmonic_sum = 0.0;
        for rank in registers {
            zeros += usize::from(rank == 0);
            harmonic_sum += 1.0 / ((1u64 << rank) as f64);
        }
        Self { zeros, harmonic_sum }
    }
}

/// Regime-corrected estimate for `m` registers.
pub(crate) fn estimate(m: usize, scan: RegisterScan) -> f64 {
    let m_f = m as f64;
    let raw = alpha(m) * m_f * m_f / scan.harmonic_sum;

    if raw <= 2.5 * m_f {
        // Small range: while some registers are empty, counting them is a
        // better estimator than the harmonic mean. With every register hit,
        // fall through to the raw estimate.
        if scan.zeros > 0 {
            m_f * (m_f / (scan.zeros as f64)).ln()
        } else {
            raw
        }
    } else if raw > HASH_SPACE / 30.0 && raw < HASH_SPACE {
        // Large range: digest collisions are no longer negligible. The
        // upper guard keeps the logarithm's argument positive for register
        // states no genuine stream can produce.
        -HASH_SPACE * (1.0 - raw / HASH_SPACE).ln()
    } else {
        raw
    }
}

/// Largest rank a digest can produce once `precision` index bits are used.
#[inline]
pub(crate) fn max_rank(precision: u8) -> u32 {
    DIGEST_BITS - u32::from(precision) + 1
}
