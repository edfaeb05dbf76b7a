use itertools::iproduct;

use crate::{
    auxiliary::{AuxiliaryEvaluator, AuxiliaryRegistry, BoysEvaluator, GeminalEvaluator},
    basis::Shell,
    cartesian::ncart,
    error::{ConfigurationError, EngineError, UnsupportedFeature},
    recurrence::{KernelWorkspace, RecurrenceTable},
    MAX_DERIVATIVE_ORDER,
};

use super::{
    buffers::{BufferPair, Slot},
    canonical::QuartetPermutation,
    transform::{transform_quartet, unpermute_quartet},
    EngineConfig, PrimitiveRecord, TwoBodyKernel,
};

/// Computes two-electron integrals `(b1 b2|O|k1 k2)` in chemists' notation.
///
/// See [`OneBodyEngine`](super::OneBodyEngine) for the ownership rules of the result.
#[derive(Debug, Default)]
pub struct TwoBodyEngine {
    state: Option<State>,
}

/// Auxiliary values of the configured kernel.
#[derive(Clone, Debug)]
enum Auxiliary {
    Boys(BoysEvaluator),
    Geminal(GeminalEvaluator),
}

impl AuxiliaryEvaluator for Auxiliary {
    fn max_order(&self) -> usize {
        match self {
            Auxiliary::Boys(boys) => boys.max_order(),
            Auxiliary::Geminal(geminal) => geminal.max_order(),
        }
    }

    #[inline]
    fn evaluate(&mut self, out: &mut [f64], t: f64, rho: f64, max_order: usize) {
        match self {
            Auxiliary::Boys(boys) => boys.evaluate(out, t, rho, max_order),
            Auxiliary::Geminal(geminal) => geminal.evaluate(out, t, rho, max_order),
        }
    }
}

#[derive(Debug)]
struct State {
    config: EngineConfig<TwoBodyKernel>,
    table: &'static RecurrenceTable,
    auxiliary: Auxiliary,
    records: Vec<PrimitiveRecord>,
    workspace: KernelWorkspace,
    buffers: BufferPair,
}

impl State {
    fn build(config: EngineConfig<TwoBodyKernel>, auxiliary: Auxiliary) -> Self {
        let max_l = config.max_angular_momentum;
        let order = config
            .operator
            .auxiliary_order(max_l, config.derivative_order);

        Self {
            table: RecurrenceTable::global(),
            auxiliary,
            records: vec![PrimitiveRecord::new(order); config.max_primitives.pow(4)],
            workspace: KernelWorkspace::two_body(max_l),
            buffers: BufferPair::new(ncart(max_l).pow(4)),
            config,
        }
    }
}

impl TwoBodyEngine {
    /// Builds an engine with its own Boys table.
    pub fn new(config: EngineConfig<TwoBodyKernel>) -> Result<Self, EngineError> {
        let order = config
            .operator
            .auxiliary_order(config.max_angular_momentum, config.derivative_order);
        Self::with_registry(config, &AuxiliaryRegistry::new(order))
    }

    /// Builds an engine sharing the tables of `registry`.
    pub fn with_registry(
        config: EngineConfig<TwoBodyKernel>,
        registry: &AuxiliaryRegistry,
    ) -> Result<Self, EngineError> {
        let kind = config.operator.kind();
        let limit = RecurrenceTable::global().max_angular_momentum(kind);

        if config.max_angular_momentum > limit {
            return Err(ConfigurationError::AngularMomentumLimit {
                requested: config.max_angular_momentum,
                limit,
            }
            .into());
        }
        if config.derivative_order > MAX_DERIVATIVE_ORDER {
            return Err(ConfigurationError::DerivativeOrderLimit {
                requested: config.derivative_order,
                limit: MAX_DERIVATIVE_ORDER,
            }
            .into());
        }
        registry.ensure(
            config
                .operator
                .auxiliary_order(config.max_angular_momentum, config.derivative_order),
        )?;

        let auxiliary = match config.operator.geminal() {
            None => Auxiliary::Boys(registry.boys()),
            Some((_, geminal)) if geminal.is_empty() => {
                return Err(ConfigurationError::EmptyGeminal.into())
            }
            Some((kind, geminal)) => Auxiliary::Geminal(GeminalEvaluator::new(
                kind,
                geminal,
                registry.boys_table().clone(),
            )),
        };

        let state = State::build(config, auxiliary);
        log::debug!(
            "two-body {kind} engine: l <= {}, {} primitives, {} primitive quartets, 2 x {} buffer values",
            state.config.max_angular_momentum,
            state.config.max_primitives,
            state.records.len(),
            state.buffers.len()
        );

        Ok(Self { state: Some(state) })
    }

    pub fn is_usable(&self) -> bool {
        self.state.is_some()
    }

    pub fn config(&self) -> Option<&EngineConfig<TwoBodyKernel>> {
        self.state.as_ref().map(|state| &state.config)
    }

    /// Integrals `(b1 b2|k1 k2)`, row-major over the functions of `b1, b2, k1, k2`.
    ///
    /// # Panics
    ///
    /// If a shell has more primitives than the engine was configured for.
    pub fn compute(
        &mut self,
        b1: &Shell,
        b2: &Shell,
        k1: &Shell,
        k2: &Shell,
    ) -> Result<&[f64], EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::Unusable)?;
        let State {
            config,
            table,
            auxiliary,
            records,
            workspace,
            buffers,
        } = state;

        if config.derivative_order > 0 {
            return Err(UnsupportedFeature::DerivativeIntegrals {
                order: config.derivative_order,
            }
            .into());
        }

        let shells = [b1, b2, k1, k2];
        for shell in shells {
            if shell.ncontr() != 1 {
                return Err(ConfigurationError::MultipleContractions {
                    ncontr: shell.ncontr(),
                }
                .into());
            }
            if shell.angular_momentum() > config.max_angular_momentum {
                return Err(ConfigurationError::AngularMomentumExceedsEngine {
                    requested: shell.angular_momentum(),
                    max: config.max_angular_momentum,
                }
                .into());
            }
        }

        let am = shells.map(Shell::angular_momentum);
        let permutation = QuartetPermutation::new(table.ordering(), am);
        let canonical = permutation.apply(shells);
        let [bra1, bra2, ket1, ket2] = canonical;
        let lmax = am.into_iter().max().unwrap_or(0);

        let nprim = canonical.map(Shell::nprim);
        let nquartets: usize = nprim.iter().product();
        assert!(
            nquartets <= records.len(),
            "shell quartet has {nquartets} primitive quartets, engine was built for {}",
            records.len()
        );

        let kind = config.operator.kind();
        let kernel = if lmax == 0 {
            None
        } else {
            let am = canonical.map(Shell::angular_momentum);
            let kernel = table
                .get(kind, am)
                .ok_or_else(|| ConfigurationError::MissingKernel {
                    operator: kind.to_string(),
                    am,
                })?;
            Some(kernel)
        };

        log::trace!(
            "{kind} ({}{}|{}{}): {permutation:?}, {nquartets} primitive quartets",
            am[0],
            am[1],
            am[2],
            am[3]
        );

        for (record, (p0, p1, p2, p3)) in records
            .iter_mut()
            .zip(iproduct!(0..nprim[0], 0..nprim[1], 0..nprim[2], 0..nprim[3]))
        {
            record.fill_two_body(canonical, [p0, p1, p2, p3], 0, auxiliary);
        }
        let records = &records[..nquartets];

        buffers.set_current(Slot::Main);
        let Some(kernel) = kernel else {
            buffers.main_mut()[0] = records.iter().map(|record| record.aux[0]).sum();
            return Ok(buffers.view(1));
        };

        kernel.run(records, workspace, buffers.main_mut());

        if canonical.iter().any(|shell| shell.is_pure()) {
            transform_quartet(buffers, [bra1, bra2, ket1, ket2]);
        }
        if permutation.swaps_any() {
            unpermute_quartet(
                buffers,
                permutation,
                canonical.map(Shell::size),
                shells.map(Shell::size),
            );
        }

        Ok(buffers.view(shells.iter().map(|shell| shell.size()).product()))
    }
}

impl Clone for TwoBodyEngine {
    /// A fresh engine of the same configuration sharing the auxiliary tables.
    fn clone(&self) -> Self {
        let state = self
            .state
            .as_ref()
            .map(|state| State::build(state.config.clone(), state.auxiliary.clone()));
        Self { state }
    }
}
