//! Registry of angular-momentum specialized recurrence kernels.
//!
//! Every kernel turns a slice of [`PrimitiveRecord`]s into the contracted cartesian block
//! `[ncart(l1)][ncart(l2)]` (one-body) or `[ncart(l1)][ncart(l2)][ncart(l3)][ncart(l4)]`
//! (two-body), row-major. Kernels are registered for canonically ordered angular momenta.

use std::{collections::HashMap, fmt, sync::OnceLock};

use itertools::iproduct;

use crate::{
    cartesian::{cumulative, ncart},
    engine::{
        canonical::{AmOrdering, SHELL_ORDERING},
        OperatorKind, PrimitiveRecord,
    },
    MAX_AM_ONE_BODY, MAX_AM_TWO_BODY,
};

mod hrr;
mod one_body;
mod two_body;

/// Kernel entry point: records, canonical angular momenta, workspace, output block.
pub type KernelFn = fn(&[PrimitiveRecord], [usize; 4], &mut KernelWorkspace, &mut [f64]);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KernelKey {
    pub operator: OperatorKind,
    /// Angular momenta of the canonical operands; unused slots are zero
    pub am: [usize; 4],
}

#[derive(Copy, Clone)]
pub struct RecurrenceKernel {
    am: [usize; 4],
    run: KernelFn,
}

impl RecurrenceKernel {
    /// Evaluates the contracted cartesian block into `out`.
    #[inline]
    pub fn run(&self, records: &[PrimitiveRecord], workspace: &mut KernelWorkspace, out: &mut [f64]) {
        (self.run)(records, self.am, workspace, out)
    }
}

impl fmt::Debug for RecurrenceKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecurrenceKernel")
            .field("am", &self.am)
            .finish_non_exhaustive()
    }
}

/// Intermediate storage of the kernels, sized once per engine.
#[derive(Clone, Debug)]
pub struct KernelWorkspace {
    pub(crate) vrr: Vec<f64>,
    pub(crate) hrr: [Vec<f64>; 2],
}

impl KernelWorkspace {
    /// Workspace for one-body kernels with shells up to `max_l`.
    pub fn one_body(max_l: usize) -> Self {
        let lower = cumulative(2 * max_l + 1);
        let vrr = ((2 * max_l + 1) * lower).max(6 * (max_l + 1).pow(2));
        let hrr = lower * ncart(max_l);
        Self::with_sizes(vrr, hrr)
    }

    /// Workspace for two-body kernels with shells up to `max_l`.
    pub fn two_body(max_l: usize) -> Self {
        let lower = cumulative(2 * max_l + 1);
        let vrr = (4 * max_l + 1) * lower * lower;
        let hrr = (lower * lower * ncart(max_l)).max(ncart(max_l).pow(3) * lower);
        Self::with_sizes(vrr, hrr)
    }

    fn with_sizes(vrr: usize, hrr: usize) -> Self {
        Self {
            vrr: vec![0.0; vrr],
            hrr: [vec![0.0; hrr], vec![0.0; hrr]],
        }
    }
}

/// Kernels keyed by operator and canonical angular momenta.
#[derive(Debug)]
pub struct RecurrenceTable {
    ordering: AmOrdering,
    kernels: HashMap<KernelKey, RecurrenceKernel>,
}

impl RecurrenceTable {
    /// Populates the table for every canonical angular momentum tuple within the compiled limits.
    pub fn new(ordering: AmOrdering) -> Self {
        let mut kernels = HashMap::new();

        let one_body_kernels: [(OperatorKind, KernelFn); 3] = [
            (OperatorKind::Overlap, one_body::overlap),
            (OperatorKind::Kinetic, one_body::kinetic),
            (OperatorKind::Nuclear, one_body::nuclear),
        ];
        for ((operator, run), l1, l2) in
            iproduct!(one_body_kernels, 0..=MAX_AM_ONE_BODY, 0..=MAX_AM_ONE_BODY)
        {
            if ordering.is_canonical_pair([l1, l2]) {
                let am = [l1, l2, 0, 0];
                kernels.insert(KernelKey { operator, am }, RecurrenceKernel { am, run });
            }
        }

        // the geminal kernels differ from Coulomb only through their auxiliary values
        let two_body_operators = [
            OperatorKind::Coulomb,
            OperatorKind::Geminal,
            OperatorKind::GeminalCoulomb,
            OperatorKind::GeminalGradientSquared,
        ];
        let l = 0..=MAX_AM_TWO_BODY;
        for (operator, l1, l2, l3, l4) in
            iproduct!(two_body_operators, l.clone(), l.clone(), l.clone(), l)
        {
            let am = [l1, l2, l3, l4];
            if ordering.is_canonical_quartet(am) {
                kernels.insert(
                    KernelKey { operator, am },
                    RecurrenceKernel {
                        am,
                        run: two_body::electron_repulsion,
                    },
                );
            }
        }

        log::debug!("recurrence table holds {} kernels", kernels.len());

        Self { ordering, kernels }
    }

    /// The table for [`SHELL_ORDERING`], built on first use and shared read-only afterwards.
    pub fn global() -> &'static RecurrenceTable {
        static TABLE: OnceLock<RecurrenceTable> = OnceLock::new();
        TABLE.get_or_init(|| RecurrenceTable::new(SHELL_ORDERING))
    }

    pub fn ordering(&self) -> AmOrdering {
        self.ordering
    }

    pub fn get(&self, operator: OperatorKind, am: [usize; 4]) -> Option<&RecurrenceKernel> {
        self.kernels.get(&KernelKey { operator, am })
    }

    /// Highest angular momentum of any operand the table covers for `operator`.
    pub fn max_angular_momentum(&self, operator: OperatorKind) -> usize {
        if operator.is_two_body() {
            MAX_AM_TWO_BODY
        } else {
            MAX_AM_ONE_BODY
        }
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_canonical_tuples_only() {
        let table = RecurrenceTable::global();

        assert!(table.get(OperatorKind::Overlap, [0, 0, 0, 0]).is_some());
        assert!(table.get(OperatorKind::Kinetic, [3, 1, 0, 0]).is_some());
        assert!(table.get(OperatorKind::Kinetic, [1, 3, 0, 0]).is_none());
        assert!(table.get(OperatorKind::Coulomb, [0, 0, 0, 0]).is_some());
        assert!(table.get(OperatorKind::Coulomb, [1, 0, 2, 1]).is_some());
        assert!(table.get(OperatorKind::Coulomb, [2, 1, 1, 0]).is_none());
        assert!(table
            .get(OperatorKind::Nuclear, [MAX_AM_ONE_BODY + 1, 0, 0, 0])
            .is_none());
    }
}
