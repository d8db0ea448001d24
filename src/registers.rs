//! Fixed-size array of HyperLogLog registers.
//!
//! Each register stores the maximum rank observed among elements hashed into
//! its bucket and only ever grows. Registers are 6 bits wide and packed into
//! a `u32` word buffer:
//! - register `i` occupies bits `[6 * i, 6 * i + 6)` of the word stream
//! - reads and writes touch two adjacent words, so the buffer carries one
//!   spare word at the end to keep the two-word access in bounds

/// Register width in bits. Ranks for a 64-bit digest never exceed
/// `64 - 4 + 1 = 61`, so 6 bits always suffice.
pub(crate) const REGISTER_WIDTH: usize = 6;

/// Largest value a packed register can hold.
pub(crate) const MAX_REGISTER_VALUE: u32 = (1 << REGISTER_WIDTH) - 1;

/// Array of `2^precision` packed registers sized once at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Registers {
    words: Vec<u32>,
    precision: u8,
}

impl Registers {
    /// Create a zeroed register array with `2^precision` registers.
    pub(crate) fn new(precision: u8) -> Self {
        let count = 1usize << precision;
        let words = vec![0u32; (count * REGISTER_WIDTH).div_ceil(32) + 1];
        Self { words, precision }
    }

    /// Precision this array was sized for.
    #[inline]
    pub(crate) fn precision(&self) -> u8 {
        self.precision
    }

    /// Number of registers `m`.
    #[inline]
    pub(crate) fn count(&self) -> usize {
        1 << self.precision
    }

    /// Get register `idx`.
    #[inline]
    pub(crate) fn get(&self, idx: usize) -> u32 {
        let bit_idx = idx * REGISTER_WIDTH;
        let word_idx = bit_idx / 32;
        let bit_pos = bit_idx % 32;
        let bits_1 = REGISTER_WIDTH.min(32 - bit_pos);
        let bits_2 = REGISTER_WIDTH - bits_1;
        let mask_1 = (1 << bits_1) - 1;
        let mask_2 = (1 << bits_2) - 1;

        ((self.words[word_idx] >> bit_pos) & mask_1)
            | ((self.words[word_idx + 1] & mask_2) << bits_1)
    }

    /// Set register `idx` to `rank`, updating both words it may straddle.
    #[inline]
    fn set(&mut self, idx: usize, rank: u32) {
        let bit_idx = idx * REGISTER_WIDTH;
        let word_idx = bit_idx / 32;
        let bit_pos = bit_idx % 32;
        let bits_1 = REGISTER_WIDTH.min(32 - bit_pos);
        let bits_2 = REGISTER_WIDTH - bits_1;
        let mask_1 = (1 << bits_1) - 1;
        let mask_2 = (1 << bits_2) - 1;

        self.words[word_idx] &= !(mask_1 << bit_pos);
        self.words[word_idx] |= (rank & mask_1) << bit_pos;
        self.words[word_idx + 1] &= !mask_2;
        self.words[word_idx + 1] |= (rank >> bits_1) & mask_2;
    }

    /// Raise register `idx` to `rank` if larger. The update is a max, hence
    /// commutative, associative and idempotent; registers never decrease.
    #[inline]
    pub(crate) fn update(&mut self, idx: usize, rank: u32) {
        let rank = rank.min(MAX_REGISTER_VALUE);
        if rank > self.get(idx) {
            self.set(idx, rank);
        }
    }

    /// Iterate over all register values in index order.
    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.count()).map(move |idx| self.get(idx))
    }

    /// Elementwise max with another array of identical size.
    pub(crate) fn merge(&mut self, rhs: &Self) {
        debug_assert_eq!(self.precision, rhs.precision);
        for idx in 0..self.count() {
            let rhs_rank = rhs.get(idx);
            if rhs_rank > self.get(idx) {
                self.set(idx, rhs_rank);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(4)]
    #[test_case(7)]
    #[test_case(12)]
    fn test_new_is_zeroed(precision: u8) {
        let regs = Registers::new(precision);
        assert_eq!(regs.count(), 1 << precision);
        assert!(regs.iter().all(|r| r == 0));
    }

    #[test]
    fn test_set_get_across_word_boundaries() {
        // With 6-bit registers every 16th register straddles two words;
        // write a distinct value into each slot and read all of them back.
        let mut regs = Registers::new(6);
        for idx in 0..regs.count() {
            regs.update(idx, (idx as u32) % 61 + 1);
        }
        for idx in 0..regs.count() {
            assert_eq!(regs.get(idx), (idx as u32) % 61 + 1, "register {idx}");
        }
    }

    #[test]
    fn test_update_is_monotone() {
        let mut regs = Registers::new(4);
        regs.update(3, 17);
        assert_eq!(regs.get(3), 17);
        regs.update(3, 5);
        assert_eq!(regs.get(3), 17);
        regs.update(3, 17);
        assert_eq!(regs.get(3), 17);
        regs.update(3, 42);
        assert_eq!(regs.get(3), 42);
    }

    #[test]
    fn test_update_clamps_to_register_width() {
        let mut regs = Registers::new(4);
        regs.update(0, u32::MAX);
        assert_eq!(regs.get(0), MAX_REGISTER_VALUE);
        // neighbors must be untouched
        assert_eq!(regs.get(1), 0);
    }

    #[test]
    fn test_merge_takes_elementwise_max() {
        let mut lhs = Registers::new(4);
        let mut rhs = Registers::new(4);
        lhs.update(0, 10);
        lhs.update(1, 2);
        rhs.update(1, 9);
        rhs.update(15, 4);

        lhs.merge(&rhs);

        assert_eq!(lhs.get(0), 10);
        assert_eq!(lhs.get(1), 9);
        assert_eq!(lhs.get(15), 4);
        assert_eq!(lhs.get(7), 0);
    }
}
