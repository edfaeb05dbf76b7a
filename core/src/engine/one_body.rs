use itertools::iproduct;

use crate::{
    atom::PointCharge,
    auxiliary::{AuxiliaryRegistry, BoysEvaluator},
    basis::Shell,
    cartesian::ncart,
    error::{ConfigurationError, EngineError, UnsupportedFeature},
    recurrence::{KernelWorkspace, RecurrenceTable},
    MAX_DERIVATIVE_ORDER,
};

use super::{
    buffers::{BufferPair, Slot},
    canonical::PairPermutation,
    transform::{accumulate_pair, transform_pair},
    EngineConfig, OneBodyOperator,
};

/// Computes overlap, kinetic energy and nuclear attraction integrals over pairs of shells.
///
/// An engine owns all of its buffers. The slice returned by [`OneBodyEngine::compute`]
/// borrows the engine and stays valid until the next call. Use one engine (or a clone) per
/// thread.
///
/// ```
/// use shellint::{basis::Shell, EngineConfig, OneBodyEngine, OneBodyOperator};
///
/// let s = Shell::new([0.0, 0.0, 0.0].into(), 0, false, vec![1.0], vec![1.0]).unwrap();
/// let mut engine = OneBodyEngine::new(EngineConfig::new(OneBodyOperator::Overlap, 1, 0)).unwrap();
/// let overlap = engine.compute(&s, &s).unwrap();
/// assert!((overlap[0] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Default)]
pub struct OneBodyEngine {
    /// `None` for a default-constructed engine
    state: Option<State>,
}

#[derive(Debug)]
struct State {
    config: EngineConfig<OneBodyOperator>,
    table: &'static RecurrenceTable,
    boys: BoysEvaluator,
    charges: Vec<PointCharge>,
    records: Vec<super::PrimitiveRecord>,
    workspace: KernelWorkspace,
    buffers: BufferPair,
}

impl State {
    fn build(config: EngineConfig<OneBodyOperator>, boys: BoysEvaluator) -> Self {
        let max_l = config.max_angular_momentum;
        let order = config
            .operator
            .auxiliary_order(max_l, config.derivative_order);
        let nprim = config.max_primitives;

        Self {
            table: RecurrenceTable::global(),
            boys,
            charges: Vec::new(),
            records: vec![super::PrimitiveRecord::new(order); nprim * nprim],
            workspace: KernelWorkspace::one_body(max_l),
            buffers: BufferPair::new(ncart(max_l).pow(2)),
            config,
        }
    }
}

impl OneBodyEngine {
    /// Builds an engine with its own Boys table.
    pub fn new(config: EngineConfig<OneBodyOperator>) -> Result<Self, EngineError> {
        let order = config
            .operator
            .auxiliary_order(config.max_angular_momentum, config.derivative_order);
        Self::with_registry(config, &AuxiliaryRegistry::new(order))
    }

    /// Builds an engine sharing the tables of `registry`.
    pub fn with_registry(
        config: EngineConfig<OneBodyOperator>,
        registry: &AuxiliaryRegistry,
    ) -> Result<Self, EngineError> {
        let table = RecurrenceTable::global();
        let limit = table.max_angular_momentum(config.operator.kind());

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

        let state = State::build(config, registry.boys());
        log::debug!(
            "one-body {} engine: l <= {}, {} primitives, {} primitive pairs, 2 x {} buffer values",
            state.config.operator.kind(),
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

    pub fn config(&self) -> Option<&EngineConfig<OneBodyOperator>> {
        self.state.as_ref().map(|state| &state.config)
    }

    pub fn operator(&self) -> Option<OneBodyOperator> {
        self.config().map(|config| config.operator)
    }

    /// Replaces the point charges summed over by the nuclear attraction operator.
    ///
    /// Other operators keep the charges but never read them.
    pub fn set_nuclear_charges(
        &mut self,
        charges: impl IntoIterator<Item = PointCharge>,
    ) -> Result<(), EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::Unusable)?;
        state.charges.clear();
        state.charges.extend(charges);
        log::debug!("{} nuclear charges set", state.charges.len());
        Ok(())
    }

    pub fn nuclear_charges(&self) -> &[PointCharge] {
        self.state
            .as_ref()
            .map_or(&[], |state| state.charges.as_slice())
    }

    /// Integrals `(s1|O|s2)`, row-major with the functions of `s1` as rows.
    ///
    /// # Panics
    ///
    /// If a shell has more primitives than the engine was configured for.
    pub fn compute(&mut self, s1: &Shell, s2: &Shell) -> Result<&[f64], EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::Unusable)?;
        let State {
            config,
            table,
            boys,
            charges,
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
        for shell in [s1, s2] {
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

        let operator = config.operator;
        let nuclear = operator == OneBodyOperator::Nuclear;
        if nuclear && charges.is_empty() {
            return Err(ConfigurationError::MissingCharges.into());
        }

        let (l1, l2) = (s1.angular_momentum(), s2.angular_momentum());
        let permutation = PairPermutation::new(table.ordering(), [l1, l2]);
        let [bra, ket] = permutation.apply([s1, s2]);
        let lmax = l1.max(l2);

        let npairs = bra.nprim() * ket.nprim();
        assert!(
            npairs <= records.len(),
            "shell pair has {npairs} primitive pairs, engine was built for {}",
            records.len()
        );

        let kernel = if lmax == 0 {
            None
        } else {
            let am = [bra.angular_momentum(), ket.angular_momentum(), 0, 0];
            let kernel = table.get(operator.kind(), am).ok_or_else(|| {
                ConfigurationError::MissingKernel {
                    operator: operator.kind().to_string(),
                    am,
                }
            })?;
            Some(kernel)
        };

        log::trace!(
            "{} ({l1}|{l2}): swap = {}, {npairs} primitive pairs",
            operator.kind(),
            permutation.swap
        );

        let (nrow, ncol) = (bra.cartesian_size(), ket.cartesian_size());
        let accumulate = permutation.swap || nuclear;
        {
            let (main, scratch) = buffers.both_mut();
            if lmax == 0 {
                main[0] = 0.0;
            } else if accumulate {
                scratch[..nrow * ncol].fill(0.0);
            }
        }

        // one pass per point charge, a single charge-free pass otherwise
        let npasses = if nuclear { charges.len() } else { 1 };

        for pass in 0..npasses {
            let charge = charges.get(pass).filter(|_| nuclear);
            for (record, (pb, pk)) in records
                .iter_mut()
                .zip(iproduct!(0..bra.nprim(), 0..ket.nprim()))
            {
                record.fill_one_body(operator, bra, ket, pb, pk, charge, boys);
            }
            let records = &records[..npairs];

            let (main, scratch) = buffers.both_mut();
            match kernel {
                None => {
                    main[0] += records
                        .iter()
                        .map(|record| match operator {
                            OneBodyOperator::Overlap => record.overlap_ss,
                            OneBodyOperator::Kinetic => record.kinetic_ss,
                            OneBodyOperator::Nuclear => record.aux[0],
                        })
                        .sum::<f64>();
                }
                Some(kernel) => {
                    kernel.run(records, workspace, main);
                    if accumulate {
                        accumulate_pair(main, scratch, nrow, ncol, permutation.swap);
                    }
                }
            }
        }

        buffers.set_current(if accumulate && lmax != 0 {
            Slot::Scratch
        } else {
            Slot::Main
        });
        transform_pair(buffers, s1, s2);

        Ok(buffers.view(s1.size() * s2.size()))
    }
}

impl Clone for OneBodyEngine {
    /// A fresh engine of the same configuration. Point charges are carried over, the Boys
    /// table is shared.
    fn clone(&self) -> Self {
        let state = self.state.as_ref().map(|state| {
            let mut clone = State::build(state.config.clone(), state.boys.clone());
            clone.charges = state.charges.clone();
            clone
        });
        Self { state }
    }
}
