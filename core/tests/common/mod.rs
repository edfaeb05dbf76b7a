#![allow(dead_code)]

use nalgebra::{DMatrix, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use shellint::{basis::Shell, cartesian, solid_harmonics::SolidHarmonics};

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

pub fn random_center(rng: &mut StdRng) -> Vector3<f64> {
    Vector3::new(
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-1.5..1.5),
        rng.gen_range(-1.5..1.5),
    )
}

/// A normalized contracted shell with random exponents, coefficients and center.
pub fn random_shell(rng: &mut StdRng, l: usize, pure: bool, nprim: usize) -> Shell {
    let center = random_center(rng);
    let exponents = (0..nprim).map(|_| rng.gen_range(0.2..4.0)).collect();
    let coefficients = (0..nprim).map(|_| rng.gen_range(0.2..1.0)).collect();
    Shell::new(center, l, pure, exponents, coefficients).unwrap()
}

/// `x^i y^j z^k exp(-exponent r^2)` with a unit coefficient.
pub fn primitive(center: Vector3<f64>, l: usize, exponent: f64) -> Shell {
    Shell::unnormalized(center, l, false, vec![exponent], vec![1.0]).unwrap()
}

/// The same shell in its cartesian form.
pub fn as_cartesian(shell: &Shell) -> Shell {
    shell.clone().with_pure(false)
}

/// Cartesian to shell-basis matrix, the identity for cartesian shells.
pub fn basis_matrix(shell: &Shell) -> DMatrix<f64> {
    let l = shell.angular_momentum();
    if shell.is_pure() {
        SolidHarmonics::global().shell(l).dense()
    } else {
        DMatrix::identity(cartesian::ncart(l), cartesian::ncart(l))
    }
}

/// Transforms a row-major cartesian block over four shells into the shells' own bases.
pub fn transform_quartet(cartesian: &[f64], shells: [&Shell; 4]) -> Vec<f64> {
    let m = shells.map(basis_matrix);
    let (c1, c2, c3, c4) = (m[0].ncols(), m[1].ncols(), m[2].ncols(), m[3].ncols());
    let (n1, n2, n3, n4) = (m[0].nrows(), m[1].nrows(), m[2].nrows(), m[3].nrows());

    let mut out = vec![0.0; n1 * n2 * n3 * n4];
    for i1 in 0..n1 {
        for i2 in 0..n2 {
            for i3 in 0..n3 {
                for i4 in 0..n4 {
                    let mut sum = 0.0;
                    for a in 0..c1 {
                        for b in 0..c2 {
                            for c in 0..c3 {
                                for d in 0..c4 {
                                    sum += m[0][(i1, a)]
                                        * m[1][(i2, b)]
                                        * m[2][(i3, c)]
                                        * m[3][(i4, d)]
                                        * cartesian[((a * c2 + b) * c3 + c) * c4 + d];
                                }
                            }
                        }
                    }
                    out[((i1 * n2 + i2) * n3 + i3) * n4 + i4] = sum;
                }
            }
        }
    }
    out
}

/// `block[(i, j, k, l)]` of a row-major four-index block with the given dimensions.
pub fn at(block: &[f64], [_, n2, n3, n4]: [usize; 4], [i, j, k, l]: [usize; 4]) -> f64 {
    block[((i * n2 + j) * n3 + k) * n4 + l]
}
