use std::f64::consts::PI;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::{cartesian, error::BasisError};

/// One set of contraction coefficients over the primitives of a [`Shell`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contraction {
    /// Angular momentum of the contracted functions
    pub l: usize,
    /// Solid harmonics (`true`) or cartesian components (`false`)
    pub pure: bool,
    /// One coefficient per primitive, normalization included
    pub coefficients: Vec<f64>,
}

/// A group of contracted Gaussian functions sharing a center and a set of primitive exponents.
///
/// Engines consume shells with exactly one contraction. General contractions can be stored
/// here and split with [`Shell::split_contractions`] before they reach an engine.
/// Exponents and contractions are only reachable through the validating constructors, so
/// every contraction holds one coefficient per exponent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawShell")]
pub struct Shell {
    /// The position of this shell, in bohr
    pub center: Vector3<f64>,
    pub(crate) exponents: Vec<f64>,
    pub(crate) contractions: SmallVec<[Contraction; 1]>,
}

#[derive(Deserialize)]
struct RawShell {
    center: Vector3<f64>,
    exponents: Vec<f64>,
    contractions: SmallVec<[Contraction; 1]>,
}

impl TryFrom<RawShell> for Shell {
    type Error = BasisError;

    fn try_from(raw: RawShell) -> Result<Self, Self::Error> {
        Shell::with_contractions(raw.center, raw.exponents, raw.contractions)
    }
}

impl Shell {
    /// Creates a normalized shell: every primitive is normalized, then the contraction is
    /// scaled so the axis-aligned component `x^l` has unit self-overlap.
    pub fn new(
        center: Vector3<f64>,
        l: usize,
        pure: bool,
        exponents: Vec<f64>,
        coefficients: Vec<f64>,
    ) -> Result<Self, BasisError> {
        let mut shell = Self::unnormalized(center, l, pure, exponents, coefficients)?;
        shell.normalize();
        Ok(shell)
    }

    /// Creates a shell that uses the coefficients exactly as given.
    pub fn unnormalized(
        center: Vector3<f64>,
        l: usize,
        pure: bool,
        exponents: Vec<f64>,
        coefficients: Vec<f64>,
    ) -> Result<Self, BasisError> {
        Self::with_contractions(
            center,
            exponents,
            smallvec![Contraction {
                l,
                pure,
                coefficients
            }],
        )
    }

    /// Creates a (possibly generally contracted) shell without touching its coefficients.
    pub fn with_contractions(
        center: Vector3<f64>,
        exponents: Vec<f64>,
        contractions: SmallVec<[Contraction; 1]>,
    ) -> Result<Self, BasisError> {
        if exponents.is_empty() || contractions.is_empty() {
            return Err(BasisError::Empty);
        }

        if let Some(&exponent) = exponents.iter().find(|&&exponent| exponent <= 0.0) {
            return Err(BasisError::NonPositiveExponent(exponent));
        }

        for contraction in &contractions {
            if contraction.coefficients.len() != exponents.len() {
                return Err(BasisError::LengthMismatch {
                    exponents: exponents.len(),
                    coefficients: contraction.coefficients.len(),
                });
            }
        }

        Ok(Self {
            center,
            exponents,
            contractions,
        })
    }

    fn normalize(&mut self) {
        let exponents = &self.exponents;

        for contraction in &mut self.contractions {
            let l = contraction.l;

            for (coefficient, &exponent) in contraction.coefficients.iter_mut().zip(exponents) {
                *coefficient *= primitive_norm(exponent, l);
            }

            // self-overlap of the x^l component of the contracted function
            let double_factorial = double_factorial(2 * l as i64 - 1);
            let mut norm = 0.0;
            for (&ci, &ai) in contraction.coefficients.iter().zip(exponents) {
                for (&cj, &aj) in contraction.coefficients.iter().zip(exponents) {
                    let gamma = ai + aj;
                    norm += ci * cj * (PI / gamma).powf(1.5) * double_factorial
                        / (2.0 * gamma).powi(l as i32);
                }
            }

            let scale = norm.sqrt().recip();
            contraction
                .coefficients
                .iter_mut()
                .for_each(|coefficient| *coefficient *= scale);
        }
    }

    /// Splits a general contraction into one shell per contraction.
    pub fn split_contractions(&self) -> Vec<Shell> {
        self.contractions
            .iter()
            .map(|contraction| Shell {
                center: self.center,
                exponents: self.exponents.clone(),
                contractions: smallvec![contraction.clone()],
            })
            .collect()
    }

    pub fn exponents(&self) -> &[f64] {
        &self.exponents
    }

    pub fn contractions(&self) -> &[Contraction] {
        &self.contractions
    }

    /// The same shell with every contraction switched between solid harmonics and cartesian
    /// components.
    pub fn with_pure(mut self, pure: bool) -> Self {
        self.contractions
            .iter_mut()
            .for_each(|contraction| contraction.pure = pure);
        self
    }

    pub fn nprim(&self) -> usize {
        self.exponents.len()
    }

    pub fn ncontr(&self) -> usize {
        self.contractions.len()
    }

    /// Angular momentum of the first contraction.
    pub fn angular_momentum(&self) -> usize {
        self.contractions[0].l
    }

    pub fn is_pure(&self) -> bool {
        self.contractions[0].pure
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.contractions[0].coefficients
    }

    /// Number of basis functions in the first contraction.
    pub fn size(&self) -> usize {
        cartesian::nfunctions(self.angular_momentum(), self.is_pure())
    }

    pub fn cartesian_size(&self) -> usize {
        cartesian::ncart(self.angular_momentum())
    }

    /// Largest angular momentum over all contractions.
    pub fn max_angular_momentum(&self) -> usize {
        self.contractions
            .iter()
            .map(|contraction| contraction.l)
            .max()
            .unwrap_or_default()
    }
}

/// Normalization constant of `x^l exp(-alpha r^2)`.
fn primitive_norm(exponent: f64, l: usize) -> f64 {
    let two_alpha = 2.0 * exponent;
    f64::sqrt(
        2f64.powi(l as i32) * two_alpha.powf(l as f64 + 1.5)
            / (PI.powf(1.5) * double_factorial(2 * l as i64 - 1)),
    )
}

/// `n!!`, with `(-1)!! = 0!! = 1`.
pub(crate) fn double_factorial(n: i64) -> f64 {
    (1..=n).rev().step_by(2).map(|k| k as f64).product()
}
