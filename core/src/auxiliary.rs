//! Auxiliary kernel values `G_m(T)` feeding the recurrences of the nuclear attraction and
//! two-body operators.

use std::sync::Arc;

pub use boys::{BoysEvaluator, BoysTable};
pub use geminal::{ContractedGeminal, GeminalEvaluator, GeminalKind, GeminalTerm};

use crate::error::ConfigurationError;

mod boys;
mod geminal;

/// Computes the auxiliary values of one operator for all orders up to a bound.
pub trait AuxiliaryEvaluator {
    /// Highest order this evaluator can produce.
    fn max_order(&self) -> usize;

    /// Fills `out[0..=max_order]` with the values at argument `t`. `rho` is the reduced
    /// exponent of the primitive quartet; operators whose values only depend on `t` ignore it.
    fn evaluate(&mut self, out: &mut [f64], t: f64, rho: f64, max_order: usize);
}

/// Read-only tables shared between engines.
///
/// Build one registry up front and hand it to every engine (or engine clone) that needs it.
/// Engines built without a registry create a private one of the order they require.
#[derive(Clone, Debug)]
pub struct AuxiliaryRegistry {
    boys: Arc<BoysTable>,
}

impl AuxiliaryRegistry {
    pub fn new(max_order: usize) -> Self {
        log::debug!("building Boys table up to order {max_order}");
        Self {
            boys: Arc::new(BoysTable::new(max_order)),
        }
    }

    pub fn max_order(&self) -> usize {
        self.boys.max_order()
    }

    pub fn boys_table(&self) -> &Arc<BoysTable> {
        &self.boys
    }

    /// A Boys function evaluator sharing this registry's table.
    pub fn boys(&self) -> BoysEvaluator {
        BoysEvaluator::new(Arc::clone(&self.boys))
    }

    pub(crate) fn ensure(&self, required: usize) -> Result<(), ConfigurationError> {
        if required > self.max_order() {
            return Err(ConfigurationError::AuxiliaryOrder {
                required,
                available: self.max_order(),
            });
        }
        Ok(())
    }
}
