//! Integral engines: canonicalize the operands, build primitive data, run the recurrence
//! kernel and bring the result into the caller's shell order and basis.

use serde::{Deserialize, Serialize};

pub use one_body::OneBodyEngine;
pub use operator::{OneBodyOperator, OperatorKind, TwoBodyKernel};
pub use primitive::PrimitiveRecord;
pub use two_body::TwoBodyEngine;

mod buffers;
pub mod canonical;
mod one_body;
mod operator;
pub mod primitive;
mod transform;
mod two_body;

/// Construction parameters of an engine. `O` is [`OneBodyOperator`] or [`TwoBodyKernel`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig<O> {
    pub operator: O,
    /// Largest number of primitives in any shell passed to `compute`
    pub max_primitives: usize,
    /// Largest angular momentum of any shell passed to `compute`
    pub max_angular_momentum: usize,
    #[serde(default)]
    pub derivative_order: usize,
}

impl<O> EngineConfig<O> {
    pub fn new(operator: O, max_primitives: usize, max_angular_momentum: usize) -> Self {
        Self {
            operator,
            max_primitives,
            max_angular_momentum,
            derivative_order: 0,
        }
    }

    pub fn with_derivative_order(mut self, derivative_order: usize) -> Self {
        self.derivative_order = derivative_order;
        self
    }
}
