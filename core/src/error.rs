use thiserror::Error;

/// Errors surfaced by engine construction, configuration and `compute`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The engine was default-constructed and carries no operator.
    #[error("engine is not usable: it was default-constructed without an operator")]
    Unusable,

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("unsupported feature: {0}")]
    Unsupported(#[from] UnsupportedFeature),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Nuclear attraction integrals need at least one point charge.
    #[error("nuclear attraction integrals requested, but no point charges were set")]
    MissingCharges,

    /// The requested angular momentum is not covered by the compiled recurrence table.
    #[error("maximum angular momentum {requested} exceeds the compiled limit of {limit}")]
    AngularMomentumLimit { requested: usize, limit: usize },

    /// A shell passed to `compute` is larger than the engine was configured for.
    #[error("shell angular momentum {requested} exceeds the engine maximum of {max}")]
    AngularMomentumExceedsEngine { requested: usize, max: usize },

    #[error("derivative order {requested} exceeds the compiled limit of {limit}")]
    DerivativeOrderLimit { requested: usize, limit: usize },

    /// Engines consume single-contraction shells only; use `Shell::split_contractions`.
    #[error("shell has {ncontr} contractions, engines accept exactly one")]
    MultipleContractions { ncontr: usize },

    #[error("auxiliary registry supports order {available}, engine requires {required}")]
    AuxiliaryOrder { required: usize, available: usize },

    #[error("geminal operator needs at least one (exponent, coefficient) term")]
    EmptyGeminal,

    /// No recurrence kernel is registered for the canonical angular momenta.
    #[error("no recurrence kernel registered for {operator} with angular momenta {am:?}")]
    MissingKernel { operator: String, am: [usize; 4] },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnsupportedFeature {
    #[error("derivative integrals of order {order} are not implemented")]
    DerivativeIntegrals { order: usize },
}

/// Errors raised while building shells, basis sets and molecules from input data.
#[derive(Error, Debug)]
pub enum BasisError {
    #[error("shell has {exponents} exponents but {coefficients} coefficients")]
    LengthMismatch { exponents: usize, coefficients: usize },

    #[error("shell has no primitives")]
    Empty,

    #[error("primitive exponent {0} is not positive")]
    NonPositiveExponent(f64),

    #[error("could not parse number from basis set entry: {0}")]
    Parse(#[from] std::num::ParseFloatError),

    #[error("basis set entry lists {angular_momenta} angular momenta but {contractions} contractions")]
    MalformedShell {
        angular_momenta: usize,
        contractions: usize,
    },

    #[error("atom {index} has {len} coordinates, expected x, y, z")]
    MalformedPosition { index: usize, len: usize },

    #[error("basis set has no entry for element {0}")]
    MissingElement(u32),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse input: {0}")]
    Json(#[from] serde_json::Error),
}
