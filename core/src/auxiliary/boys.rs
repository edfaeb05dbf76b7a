use std::{f64::consts::PI, sync::Arc};

use super::AuxiliaryEvaluator;

const GRID_SPACING: f64 = 0.1;
/// Beyond this argument `erf(sqrt(T))` is 1 to machine precision.
const GRID_MAX: f64 = 36.0;
/// Taylor terms used when interpolating from the nearest grid point.
const TAYLOR_TERMS: usize = 8;

/// Tabulated Boys function `F_m(T) = ∫_0^1 t^{2m} exp(-T t^2) dt`.
#[derive(Debug)]
pub struct BoysTable {
    max_order: usize,
    /// orders stored per grid point
    width: usize,
    grid: Vec<f64>,
}

impl BoysTable {
    pub fn new(max_order: usize) -> Self {
        let width = max_order + TAYLOR_TERMS;
        let npoints = (GRID_MAX / GRID_SPACING).round() as usize + 1;
        let mut grid = vec![0.0; npoints * width];

        for (point, row) in grid.chunks_exact_mut(width).enumerate() {
            let t = point as f64 * GRID_SPACING;
            let exp = (-t).exp();

            row[width - 1] = series(width - 1, t);
            for m in (0..width - 1).rev() {
                row[m] = (2.0 * t * row[m + 1] + exp) / (2 * m + 1) as f64;
            }
        }

        Self {
            max_order,
            width,
            grid,
        }
    }

    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// Fills `out[0..=max_order]` with `F_m(t)`.
    pub fn eval(&self, out: &mut [f64], t: f64, max_order: usize) {
        debug_assert!(max_order <= self.max_order);

        let exp = (-t).exp();

        if t > GRID_MAX {
            let oo2t = 0.5 / t;
            out[0] = 0.5 * (PI / t).sqrt();
            for m in 0..max_order {
                out[m + 1] = ((2 * m + 1) as f64 * out[m] - exp) * oo2t;
            }
            return;
        }

        let point = (t / GRID_SPACING).round() as usize;
        let delta = point as f64 * GRID_SPACING - t;
        let row = &self.grid[point * self.width..(point + 1) * self.width];

        // F_m(t0 - d) = sum_k F_{m+k}(t0) d^k / k!
        let mut value = 0.0;
        let mut factor = 1.0;
        for k in 0..TAYLOR_TERMS {
            value += row[max_order + k] * factor;
            factor *= delta / (k + 1) as f64;
        }
        out[max_order] = value;

        for m in (0..max_order).rev() {
            out[m] = (2.0 * t * out[m + 1] + exp) / (2 * m + 1) as f64;
        }
    }
}

/// `F_m(t) = exp(-t) sum_k (2t)^k / ((2m+1)(2m+3)...(2m+2k+1))`, convergent for every `t`.
pub(crate) fn series(m: usize, t: f64) -> f64 {
    let mut term = 1.0 / (2 * m + 1) as f64;
    let mut sum = term;
    let mut k = 1;
    while term > sum * 1e-17 {
        term *= 2.0 * t / (2 * m + 2 * k + 1) as f64;
        sum += term;
        k += 1;
    }
    (-t).exp() * sum
}

/// Auxiliary values of the Coulomb and nuclear attraction operators: `G_m = F_m(T)`.
#[derive(Clone, Debug)]
pub struct BoysEvaluator {
    table: Arc<BoysTable>,
}

impl BoysEvaluator {
    pub fn new(table: Arc<BoysTable>) -> Self {
        Self { table }
    }
}

impl AuxiliaryEvaluator for BoysEvaluator {
    fn max_order(&self) -> usize {
        self.table.max_order()
    }

    #[inline]
    fn evaluate(&mut self, out: &mut [f64], t: f64, _rho: f64, max_order: usize) {
        self.table.eval(out, t, max_order)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn matches_series_definition() {
        let table = BoysTable::new(12);
        let mut out = [0.0; 13];

        for &t in &[0.0, 1e-9, 0.037, 0.55, 1.0, 4.26, 11.9, 29.95, 35.99] {
            table.eval(&mut out, t, 12);
            for (m, &value) in out.iter().enumerate() {
                assert_relative_eq!(value, series(m, t), max_relative = 1e-13);
            }
        }
    }

    #[test]
    fn asymptotic_region() {
        let table = BoysTable::new(6);
        let mut out = [0.0; 7];

        for &t in &[36.5, 50.0, 120.0] {
            table.eval(&mut out, t, 6);
            for (m, &value) in out.iter().enumerate() {
                assert_relative_eq!(value, series(m, t), max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn zero_argument_is_exact() {
        let table = BoysTable::new(8);
        let mut out = [0.0; 9];
        table.eval(&mut out, 0.0, 8);
        for (m, &value) in out.iter().enumerate() {
            assert_eq!(value, 1.0 / (2 * m + 1) as f64);
        }
    }

    #[test]
    fn agrees_with_boys_crate() {
        // the crate is only accurate to a few digits
        let table = BoysTable::new(4);
        let mut out = [0.0; 5];
        for &t in &[0.5, 2.0, 10.0] {
            table.eval(&mut out, t, 4);
            for (m, &value) in out.iter().enumerate() {
                assert_relative_eq!(value, ::boys::micb25::boys(m as u64, t), epsilon = 1e-3);
            }
        }
    }
}
