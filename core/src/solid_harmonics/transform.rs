//! Separable cartesian to solid-harmonic transforms of dense row-major blocks.
//!
//! Every transform acts on one axis of a tensor viewed as `[n1][ncart(l)][n2]`, leaving the
//! outer (`n1`) and inner (`n2`) extents untouched.

use crate::cartesian::{ncart, npure};

use super::SolidHarmonics;

/// `[n1][ncart(l)][n2] -> [n1][npure(l)][n2]`
pub fn transform_inner(n1: usize, l: usize, n2: usize, src: &[f64], tgt: &mut [f64]) {
    let coefficients = SolidHarmonics::global().shell(l);
    let (nc, ns) = (ncart(l), npure(l));

    debug_assert!(src.len() >= n1 * nc * n2);
    debug_assert!(tgt.len() >= n1 * ns * n2);

    for i1 in 0..n1 {
        let src = &src[i1 * nc * n2..(i1 + 1) * nc * n2];

        for s in 0..ns {
            let tgt = &mut tgt[(i1 * ns + s) * n2..(i1 * ns + s + 1) * n2];
            tgt.fill(0.0);

            for &(c, value) in coefficients.row(s) {
                let src = &src[c * n2..(c + 1) * n2];
                tgt.iter_mut()
                    .zip(src)
                    .for_each(|(tgt, src)| *tgt += value * src);
            }
        }
    }
}

/// `[ncart(l)][n2] -> [npure(l)][n2]`
pub fn transform_first(l: usize, n2: usize, src: &[f64], tgt: &mut [f64]) {
    transform_inner(1, l, n2, src, tgt)
}

/// `[n1][ncart(l)] -> [n1][npure(l)]`
pub fn transform_last(n1: usize, l: usize, src: &[f64], tgt: &mut [f64]) {
    transform_inner(n1, l, 1, src, tgt)
}

/// Transforms both axes of a `[ncart(l1)][ncart(l2)]` block.
pub fn tform(l1: usize, l2: usize, src: &[f64], tgt: &mut [f64]) {
    let table = SolidHarmonics::global();
    let (rows, cols) = (table.shell(l1), table.shell(l2));
    let nc2 = ncart(l2);
    let ns2 = npure(l2);

    for s1 in 0..npure(l1) {
        for s2 in 0..ns2 {
            let mut value = 0.0;
            for &(c1, v1) in rows.row(s1) {
                for &(c2, v2) in cols.row(s2) {
                    value += v1 * v2 * src[c1 * nc2 + c2];
                }
            }
            tgt[s1 * ns2 + s2] = value;
        }
    }
}

/// Transforms the rows of a `[ncart(l1)][n2]` block.
pub fn tform_rows(l1: usize, n2: usize, src: &[f64], tgt: &mut [f64]) {
    transform_first(l1, n2, src, tgt)
}

/// Transforms the columns of a `[n1][ncart(l2)]` block.
pub fn tform_cols(n1: usize, l2: usize, src: &[f64], tgt: &mut [f64]) {
    transform_last(n1, l2, src, tgt)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn random_block(rng: &mut StdRng, rows: usize, cols: usize) -> DMatrix<f64> {
        DMatrix::from_fn(rows, cols, |_, _| rng.gen_range(-1.0..1.0))
    }

    fn row_major(matrix: &DMatrix<f64>) -> Vec<f64> {
        matrix.transpose().as_slice().to_vec()
    }

    #[test]
    fn two_index_transforms_match_matrix_products() {
        let mut rng = StdRng::seed_from_u64(11);
        let table = SolidHarmonics::global();

        for (l1, l2) in itertools::iproduct!(0..=4, 0..=4) {
            let block = random_block(&mut rng, ncart(l1), ncart(l2));
            let src = row_major(&block);
            let (c1, c2) = (table.shell(l1).dense(), table.shell(l2).dense());

            let mut both = vec![0.0; npure(l1) * npure(l2)];
            tform(l1, l2, &src, &mut both);
            let expected = row_major(&(&c1 * &block * c2.transpose()));
            for (value, expected) in both.iter().zip(&expected) {
                assert_relative_eq!(*value, *expected, epsilon = 1e-12);
            }

            let mut rows = vec![0.0; npure(l1) * ncart(l2)];
            tform_rows(l1, ncart(l2), &src, &mut rows);
            let expected = row_major(&(&c1 * &block));
            for (value, expected) in rows.iter().zip(&expected) {
                assert_relative_eq!(*value, *expected, epsilon = 1e-12);
            }

            let mut cols = vec![0.0; ncart(l1) * npure(l2)];
            tform_cols(ncart(l1), l2, &src, &mut cols);
            let expected = row_major(&(&block * c2.transpose()));
            for (value, expected) in cols.iter().zip(&expected) {
                assert_relative_eq!(*value, *expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn inner_transform_leaves_other_axes() {
        let mut rng = StdRng::seed_from_u64(5);
        let (n1, l, n2) = (3, 3, 4);
        let src: Vec<f64> = (0..n1 * ncart(l) * n2)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();

        let mut tgt = vec![0.0; n1 * npure(l) * n2];
        transform_inner(n1, l, n2, &src, &mut tgt);

        let coefficients = SolidHarmonics::global().shell(l).dense();
        for (i1, s, i2) in itertools::iproduct!(0..n1, 0..npure(l), 0..n2) {
            let expected: f64 = (0..ncart(l))
                .map(|c| coefficients[(s, c)] * src[(i1 * ncart(l) + c) * n2 + i2])
                .sum();
            assert_relative_eq!(tgt[(i1 * npure(l) + s) * n2 + i2], expected, epsilon = 1e-13);
        }
    }
}
