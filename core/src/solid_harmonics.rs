//! Cartesian to solid-harmonic transformation coefficients.
//!
//! Solid harmonics of a shell are ordered `m = -l..=l`. For `l = 1` this gives `y, z, x`.
//! Coefficients act on cartesian components normalized like `x^l`, so a shell whose
//! contraction is normalized for `x^l` yields orthonormal solid harmonics.

use std::sync::OnceLock;

use nalgebra::DMatrix;
use smallvec::SmallVec;

pub use transform::{tform, tform_cols, tform_rows, transform_first, transform_inner, transform_last};

use crate::{
    basis::double_factorial,
    cartesian::{self, Component},
    MAX_AM_ONE_BODY, MAX_AM_TWO_BODY,
};

mod transform;

/// Sparse coefficient rows of one angular momentum.
#[derive(Clone, Debug)]
pub struct ShellCoefficients {
    l: usize,
    /// per solid harmonic: (cartesian index, coefficient)
    rows: Vec<SmallVec<[(usize, f64); 8]>>,
}

impl ShellCoefficients {
    pub fn new(l: usize) -> Self {
        let rows = (-(l as i32)..=l as i32)
            .map(|m| {
                cartesian::components(l)
                    .enumerate()
                    .filter_map(|(index, c)| {
                        let value = coefficient(l, m, c);
                        (value != 0.0).then_some((index, value))
                    })
                    .collect()
            })
            .collect();

        Self { l, rows }
    }

    /// Nonzero coefficients of the solid harmonic at position `s` (`m = s - l`).
    #[inline(always)]
    pub fn row(&self, s: usize) -> &[(usize, f64)] {
        &self.rows[s]
    }

    /// Dense `npure x ncart` coefficient matrix.
    pub fn dense(&self) -> DMatrix<f64> {
        let mut matrix = DMatrix::zeros(cartesian::npure(self.l), cartesian::ncart(self.l));
        for (s, row) in self.rows.iter().enumerate() {
            for &(c, value) in row {
                matrix[(s, c)] = value;
            }
        }
        matrix
    }
}

/// Coefficient tables for every angular momentum up to a bound.
#[derive(Clone, Debug)]
pub struct SolidHarmonics {
    shells: Vec<ShellCoefficients>,
}

impl SolidHarmonics {
    pub fn new(max_l: usize) -> Self {
        Self {
            shells: (0..=max_l).map(ShellCoefficients::new).collect(),
        }
    }

    /// Tables covering every angular momentum an engine can be configured for.
    pub fn global() -> &'static SolidHarmonics {
        static TABLE: OnceLock<SolidHarmonics> = OnceLock::new();
        TABLE.get_or_init(|| SolidHarmonics::new(MAX_AM_ONE_BODY.max(MAX_AM_TWO_BODY)))
    }

    #[inline(always)]
    pub fn shell(&self, l: usize) -> &ShellCoefficients {
        &self.shells[l]
    }
}

fn parity(i: i32) -> f64 {
    if i % 2 == 0 {
        1.0
    } else {
        -1.0
    }
}

fn factorial(n: i32) -> f64 {
    (1..=n).map(f64::from).product()
}

fn binomial(n: i32, k: i32) -> f64 {
    if k < 0 || k > n {
        return 0.0;
    }
    factorial(n) / (factorial(k) * factorial(n - k))
}

/// Coefficient of the cartesian component `c` in the real solid harmonic `(l, m)`
/// (Schlegel and Frisch, IJQC 54, 83 (1995)).
pub fn coefficient(l: usize, m: i32, c: Component) -> f64 {
    let [lx, ly, lz] = c.map(|e| e as i32);
    let l = l as i32;
    let abs_m = m.abs();

    if (lx + ly - abs_m) % 2 != 0 {
        return 0.0;
    }
    let j = (lx + ly - abs_m) / 2;
    if j < 0 {
        return 0.0;
    }

    let i = abs_m - lx;
    let comp = if m >= 0 { 1.0 } else { -1.0 };
    if comp != parity(i.abs()) {
        return 0.0;
    }

    let mut pfac = f64::sqrt(
        factorial(2 * lx)
            * factorial(2 * ly)
            * factorial(2 * lz)
            * factorial(l)
            * factorial(l - abs_m)
            / (factorial(2 * l)
                * factorial(lx)
                * factorial(ly)
                * factorial(lz)
                * factorial(l + abs_m)),
    );
    pfac /= f64::from(1 << l) * factorial(l);
    pfac *= if m < 0 {
        parity((i - 1) / 2)
    } else {
        parity(i / 2)
    };

    let mut sum = 0.0;
    for k in j..=(l - abs_m) / 2 {
        let outer = binomial(l, k) * binomial(k, j) * parity(k) * factorial(2 * (l - k))
            / factorial(l - abs_m - 2 * k);

        let mut inner = 0.0;
        for p in ((lx - abs_m) / 2).max(0)..=j.min(lx / 2) {
            if lx - 2 * p <= abs_m {
                inner += binomial(j, p) * binomial(abs_m, lx - 2 * p) * parity(p);
            }
        }
        sum += outer * inner;
    }

    sum *= f64::sqrt(
        double_factorial(2 * l as i64 - 1)
            / (double_factorial(2 * lx as i64 - 1)
                * double_factorial(2 * ly as i64 - 1)
                * double_factorial(2 * lz as i64 - 1)),
    );

    if m == 0 {
        pfac * sum
    } else {
        std::f64::consts::SQRT_2 * pfac * sum
    }
}
