use std::fmt;

use serde::{Deserialize, Serialize};

use crate::auxiliary::{ContractedGeminal, GeminalKind};

/// Every operator the recurrence table has kernels for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    Overlap,
    Kinetic,
    Nuclear,
    Coulomb,
    Geminal,
    GeminalCoulomb,
    GeminalGradientSquared,
}

impl OperatorKind {
    pub fn is_two_body(&self) -> bool {
        !matches!(
            self,
            OperatorKind::Overlap | OperatorKind::Kinetic | OperatorKind::Nuclear
        )
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperatorKind::Overlap => "overlap",
            OperatorKind::Kinetic => "kinetic",
            OperatorKind::Nuclear => "nuclear",
            OperatorKind::Coulomb => "coulomb",
            OperatorKind::Geminal => "geminal",
            OperatorKind::GeminalCoulomb => "geminal-coulomb",
            OperatorKind::GeminalGradientSquared => "geminal-gradient-squared",
        };
        f.write_str(name)
    }
}

/// One-body operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OneBodyOperator {
    Overlap,
    /// `-1/2 nabla^2`
    Kinetic,
    /// `-sum_c q_c / |r - C|`, summed over the engine's point charges
    Nuclear,
}

impl OneBodyOperator {
    pub fn kind(&self) -> OperatorKind {
        match self {
            OneBodyOperator::Overlap => OperatorKind::Overlap,
            OneBodyOperator::Kinetic => OperatorKind::Kinetic,
            OneBodyOperator::Nuclear => OperatorKind::Nuclear,
        }
    }

    /// Highest auxiliary order needed for shells up to `max_l`.
    pub(crate) fn auxiliary_order(&self, max_l: usize, derivative_order: usize) -> usize {
        match self {
            OneBodyOperator::Overlap | OneBodyOperator::Kinetic => 0,
            OneBodyOperator::Nuclear => 2 * max_l + derivative_order,
        }
    }
}

/// Two-body operator kernels, each carrying its own parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum TwoBodyKernel {
    /// `1 / r12`
    #[default]
    Coulomb,
    /// `g(r12) = sum_i c_i exp(-gamma_i r12^2)`
    Geminal(ContractedGeminal),
    /// `g(r12) / r12`
    GeminalCoulomb(ContractedGeminal),
    /// `|grad g(r12)|^2`
    GeminalGradientSquared(ContractedGeminal),
}

impl TwoBodyKernel {
    pub fn kind(&self) -> OperatorKind {
        match self {
            TwoBodyKernel::Coulomb => OperatorKind::Coulomb,
            TwoBodyKernel::Geminal(_) => OperatorKind::Geminal,
            TwoBodyKernel::GeminalCoulomb(_) => OperatorKind::GeminalCoulomb,
            TwoBodyKernel::GeminalGradientSquared(_) => OperatorKind::GeminalGradientSquared,
        }
    }

    /// The geminal parameters, for every kernel except Coulomb.
    pub fn geminal(&self) -> Option<(GeminalKind, &ContractedGeminal)> {
        match self {
            TwoBodyKernel::Coulomb => None,
            TwoBodyKernel::Geminal(geminal) => Some((GeminalKind::Geminal, geminal)),
            TwoBodyKernel::GeminalCoulomb(geminal) => Some((GeminalKind::GeminalCoulomb, geminal)),
            TwoBodyKernel::GeminalGradientSquared(geminal) => {
                Some((GeminalKind::GeminalGradientSquared, geminal))
            }
        }
    }

    pub(crate) fn auxiliary_order(&self, max_l: usize, derivative_order: usize) -> usize {
        4 * max_l + derivative_order
    }
}
