pub mod atom;
pub mod auxiliary;
pub mod basis;
pub mod cartesian;
pub mod config;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod molecule;
pub mod recurrence;
pub mod solid_harmonics;

pub use engine::{
    canonical::{AmOrdering, SHELL_ORDERING},
    EngineConfig, OneBodyEngine, OneBodyOperator, TwoBodyEngine, TwoBodyKernel,
};
pub use error::{BasisError, ConfigurationError, EngineError, UnsupportedFeature};

/// Highest angular momentum the one-body recurrence table is populated for.
pub const MAX_AM_ONE_BODY: usize = 6;

/// Highest angular momentum the two-body recurrence table is populated for.
pub const MAX_AM_TWO_BODY: usize = 4;

/// Highest derivative order an engine may be configured with. Only order 0 can be computed.
pub const MAX_DERIVATIVE_ORDER: usize = 2;
