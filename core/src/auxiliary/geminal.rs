use std::{f64::consts::PI, sync::Arc};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{AuxiliaryEvaluator, BoysTable};

/// One Gaussian `coefficient * exp(-exponent * r12^2)` of a contracted geminal.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeminalTerm {
    pub exponent: f64,
    pub coefficient: f64,
}

/// Linear combination of Gaussian geminals, `sum_i c_i exp(-gamma_i r12^2)`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractedGeminal(pub SmallVec<[GeminalTerm; 6]>);

impl ContractedGeminal {
    /// Builds a geminal from `(exponent, coefficient)` pairs.
    pub fn new(terms: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self(
            terms
                .into_iter()
                .map(|(exponent, coefficient)| GeminalTerm {
                    exponent,
                    coefficient,
                })
                .collect(),
        )
    }

    pub fn terms(&self) -> &[GeminalTerm] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rewrites `|grad g|^2` as a sum of `c r12^2 exp(-gamma r12^2)` terms.
    pub fn gradient_squared(&self) -> ContractedGeminal {
        let mut terms = SmallVec::with_capacity(self.0.len() * (self.0.len() + 1) / 2);

        for (b, bra) in self.0.iter().enumerate() {
            for (k, ket) in self.0[..=b].iter().enumerate() {
                let multiplicity = if k == b { 1.0 } else { 2.0 };
                terms.push(GeminalTerm {
                    exponent: bra.exponent + ket.exponent,
                    coefficient: multiplicity
                        * 4.0
                        * bra.exponent
                        * ket.exponent
                        * bra.coefficient
                        * ket.coefficient,
                });
            }
        }

        ContractedGeminal(terms)
    }
}

/// The geminal-type two-body operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeminalKind {
    /// `g(r12)`
    Geminal,
    /// `g(r12) / r12`
    GeminalCoulomb,
    /// `|grad g(r12)|^2`
    GeminalGradientSquared,
}

/// Auxiliary values of the geminal operators, with `rho_i = rho / (rho + gamma_i)` and
/// `g_i = gamma_i / (rho + gamma_i)`:
///
/// * geminal: `G_m = sum_i c_i sqrt(pi) / (2 sqrt(rho)) rho_i^{3/2} exp(-g_i T) g_i^m`
/// * geminal times Coulomb: `G_m = sum_i c_i rho_i exp(-g_i T) sum_k C(m, k) g_i^{m-k} rho_i^k F_k(rho_i T)`
/// * gradient squared, expanded into `c r12^2 exp(-gamma r12^2)` terms:
///   `G_m = sum_i c_i sqrt(pi) / (2 sqrt(rho)) rho_i^{3/2} exp(-g_i T) (g_i^m (3/2 + rho_i T) - m g_i^{m-1} rho_i) / (rho + gamma_i)`
///
/// Every `G_m` equals `(-d/dT)^m G_0`, which is what the two-body recurrence requires.
#[derive(Clone, Debug)]
pub struct GeminalEvaluator {
    kind: GeminalKind,
    terms: ContractedGeminal,
    boys: Arc<BoysTable>,
    /// Boys values of the Coulomb factor
    fm: Vec<f64>,
}

impl GeminalEvaluator {
    pub fn new(kind: GeminalKind, geminal: &ContractedGeminal, boys: Arc<BoysTable>) -> Self {
        let terms = match kind {
            GeminalKind::GeminalGradientSquared => geminal.gradient_squared(),
            GeminalKind::Geminal | GeminalKind::GeminalCoulomb => geminal.clone(),
        };

        Self {
            kind,
            terms,
            fm: vec![0.0; boys.max_order() + 1],
            boys,
        }
    }
}

impl AuxiliaryEvaluator for GeminalEvaluator {
    fn max_order(&self) -> usize {
        self.boys.max_order()
    }

    fn evaluate(&mut self, out: &mut [f64], t: f64, rho: f64, max_order: usize) {
        let out = &mut out[..=max_order];
        out.fill(0.0);

        let sqrt_pi_over_2sqrt_rho = 0.5 * (PI / rho).sqrt();

        for &GeminalTerm {
            exponent: gamma,
            coefficient,
        } in self.terms.terms()
        {
            let oorhog = 1.0 / (rho + gamma);
            let rorg = rho * oorhog;
            let gorg = gamma * oorhog;
            let exp = (-gorg * t).exp();

            match self.kind {
                GeminalKind::Geminal => {
                    let mut value = coefficient * sqrt_pi_over_2sqrt_rho * rorg.powf(1.5) * exp;
                    for g_m in out.iter_mut() {
                        *g_m += value;
                        value *= gorg;
                    }
                }
                GeminalKind::GeminalCoulomb => {
                    self.boys.eval(&mut self.fm, rorg * t, max_order);
                    let scale = coefficient * rorg * exp;

                    for (m, g_m) in out.iter_mut().enumerate() {
                        // sum_k C(m, k) gorg^(m-k) rorg^k F_k
                        let mut binomial = 1.0;
                        let mut sum = 0.0;
                        for k in 0..=m {
                            sum += binomial
                                * gorg.powi((m - k) as i32)
                                * rorg.powi(k as i32)
                                * self.fm[k];
                            binomial = binomial * (m - k) as f64 / (k + 1) as f64;
                        }
                        *g_m += scale * sum;
                    }
                }
                GeminalKind::GeminalGradientSquared => {
                    let scale = coefficient
                        * sqrt_pi_over_2sqrt_rho
                        * rorg.powf(1.5)
                        * exp
                        * oorhog;
                    let polynomial = 1.5 + rorg * t;

                    let mut gorg_m = 1.0;
                    for (m, g_m) in out.iter_mut().enumerate() {
                        let lowered = if m == 0 {
                            0.0
                        } else {
                            m as f64 * gorg.powi(m as i32 - 1) * rorg
                        };
                        *g_m += scale * (gorg_m * polynomial - lowered);
                        gorg_m *= gorg;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn evaluator(kind: GeminalKind, geminal: &ContractedGeminal) -> GeminalEvaluator {
        GeminalEvaluator::new(kind, geminal, Arc::new(BoysTable::new(10)))
    }

    /// `G_{m+1} = -dG_m/dT`, checked with central differences.
    fn assert_derivative_chain(kind: GeminalKind) {
        let geminal = ContractedGeminal::new([(0.8, 0.3), (2.5, -0.7)]);
        let mut evaluator = evaluator(kind, &geminal);

        let (t, rho, h) = (1.3, 0.9, 1e-5);
        let mut at = [0.0; 5];
        let mut above = [0.0; 5];
        let mut below = [0.0; 5];
        evaluator.evaluate(&mut at, t, rho, 4);
        evaluator.evaluate(&mut above, t + h, rho, 4);
        evaluator.evaluate(&mut below, t - h, rho, 4);

        for m in 0..4 {
            let derivative = -(above[m] - below[m]) / (2.0 * h);
            assert_relative_eq!(at[m + 1], derivative, epsilon = 1e-8, max_relative = 1e-6);
        }
    }

    #[test]
    fn geminal_orders_are_derivatives() {
        assert_derivative_chain(GeminalKind::Geminal);
    }

    #[test]
    fn geminal_coulomb_orders_are_derivatives() {
        assert_derivative_chain(GeminalKind::GeminalCoulomb);
    }

    #[test]
    fn gradient_squared_orders_are_derivatives() {
        assert_derivative_chain(GeminalKind::GeminalGradientSquared);
    }

    #[test]
    fn gradient_squared_expansion() {
        let geminal = ContractedGeminal::new([(1.0, 2.0), (3.0, 5.0)]);
        let expanded = geminal.gradient_squared();

        assert_eq!(
            expanded.terms(),
            &[
                GeminalTerm {
                    exponent: 2.0,
                    coefficient: 4.0 * 1.0 * 1.0 * 2.0 * 2.0,
                },
                GeminalTerm {
                    exponent: 4.0,
                    coefficient: 2.0 * 4.0 * 3.0 * 1.0 * 5.0 * 2.0,
                },
                GeminalTerm {
                    exponent: 6.0,
                    coefficient: 4.0 * 3.0 * 3.0 * 5.0 * 5.0,
                },
            ]
        );
    }

    #[test]
    fn geminal_coulomb_reduces_to_boys_for_vanishing_exponent() {
        let geminal = ContractedGeminal::new([(1e-14, 1.0)]);
        let mut evaluator = evaluator(GeminalKind::GeminalCoulomb, &geminal);
        let boys = BoysTable::new(4);

        let mut values = [0.0; 5];
        let mut reference = [0.0; 5];
        evaluator.evaluate(&mut values, 2.2, 0.7, 4);
        boys.eval(&mut reference, 2.2, 4);

        for (value, reference) in values.iter().zip(reference) {
            assert_relative_eq!(*value, reference, max_relative = 1e-10);
        }
    }
}
