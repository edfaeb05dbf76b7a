//! Angular momentum ordering of operands.
//!
//! Recurrence kernels are registered for canonically ordered angular momenta only. Engines
//! reorder their operands into canonical slots and undo the permutation on the result.

/// Ordering convention of the recurrence table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AmOrdering {
    /// Higher angular momentum first within a pair; the bra pair carries the lower total.
    Standard,
    /// Lower angular momentum first within a pair; the bra pair carries the higher total.
    Orca,
}

/// Ordering used by the recurrence table shipped with this crate.
pub const SHELL_ORDERING: AmOrdering = AmOrdering::Standard;

impl AmOrdering {
    /// Whether the two operands of a pair must trade places. Ties never swap.
    #[inline(always)]
    pub const fn swap_pair(self, l1: usize, l2: usize) -> bool {
        match self {
            AmOrdering::Standard => l1 < l2,
            AmOrdering::Orca => l1 > l2,
        }
    }

    /// Whether the bra and ket pairs must trade places. Ties never swap.
    #[inline(always)]
    pub const fn swap_braket(self, bra: usize, ket: usize) -> bool {
        match self {
            AmOrdering::Standard => bra > ket,
            AmOrdering::Orca => bra < ket,
        }
    }

    pub const fn is_canonical_pair(self, l: [usize; 2]) -> bool {
        !self.swap_pair(l[0], l[1])
    }

    pub const fn is_canonical_quartet(self, l: [usize; 4]) -> bool {
        !QuartetPermutation::new(self, l).swaps_any()
    }
}

/// Canonical reordering of a one-body operand pair.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PairPermutation {
    pub swap: bool,
}

impl PairPermutation {
    pub const fn new(ordering: AmOrdering, l: [usize; 2]) -> Self {
        Self {
            swap: ordering.swap_pair(l[0], l[1]),
        }
    }

    /// Places the operands into canonical slots.
    #[inline(always)]
    pub fn apply<T: Copy>(&self, [s1, s2]: [T; 2]) -> [T; 2] {
        if self.swap {
            [s2, s1]
        } else {
            [s1, s2]
        }
    }
}

/// Canonical reordering of a two-body operand quartet `(bra1 bra2 | ket1 ket2)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QuartetPermutation {
    pub swap_bra: bool,
    pub swap_ket: bool,
    pub swap_braket: bool,
}

impl QuartetPermutation {
    pub const fn new(ordering: AmOrdering, l: [usize; 4]) -> Self {
        Self {
            swap_bra: ordering.swap_pair(l[0], l[1]),
            swap_ket: ordering.swap_pair(l[2], l[3]),
            swap_braket: ordering.swap_braket(l[0] + l[1], l[2] + l[3]),
        }
    }

    pub const fn swaps_any(&self) -> bool {
        self.swap_bra || self.swap_ket || self.swap_braket
    }

    /// Places the operands (or any per-operand data) into canonical slots.
    #[inline(always)]
    pub fn apply<T: Copy>(&self, [b1, b2, k1, k2]: [T; 4]) -> [T; 4] {
        let &Self {
            swap_bra,
            swap_ket,
            swap_braket,
        } = self;

        let (bra1, bra2) = if swap_bra { (b2, b1) } else { (b1, b2) };
        let (ket1, ket2) = if swap_ket { (k2, k1) } else { (k1, k2) };

        if swap_braket {
            [ket1, ket2, bra1, bra2]
        } else {
            [bra1, bra2, ket1, ket2]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_never_swap() {
        for l in 0..5 {
            assert!(!PairPermutation::new(SHELL_ORDERING, [l, l]).swap);
            assert!(!QuartetPermutation::new(SHELL_ORDERING, [l, l, l, l]).swaps_any());
        }
    }

    #[test]
    fn standard_quartet() {
        let permutation = QuartetPermutation::new(AmOrdering::Standard, [1, 2, 0, 0]);
        assert_eq!(
            permutation,
            QuartetPermutation {
                swap_bra: true,
                swap_ket: false,
                swap_braket: true,
            }
        );
        assert_eq!(permutation.apply(["a", "b", "c", "d"]), ["c", "d", "b", "a"]);
        assert!(AmOrdering::Standard.is_canonical_quartet(
            permutation.apply([1, 2, 0, 0])
        ));
    }

    #[test]
    fn canonical_slots_are_canonical() {
        for ordering in [AmOrdering::Standard, AmOrdering::Orca] {
            for l in itertools::iproduct!(0..4, 0..4, 0..4, 0..4) {
                let l = [l.0, l.1, l.2, l.3];
                let canonical = QuartetPermutation::new(ordering, l).apply(l);
                assert!(ordering.is_canonical_quartet(canonical), "{ordering:?} {l:?}");
            }
            for l in itertools::iproduct!(0..4, 0..4) {
                let canonical = PairPermutation::new(ordering, [l.0, l.1]).apply([l.0, l.1]);
                assert!(ordering.is_canonical_pair(canonical));
            }
        }
    }
}
