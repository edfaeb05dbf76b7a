mod common;

use std::f64::consts::PI;

use approx::assert_relative_eq;
use nalgebra::Vector3;
use rand::Rng;
use shellint::{
    auxiliary::{
        AuxiliaryEvaluator, AuxiliaryRegistry, BoysTable, ContractedGeminal, GeminalEvaluator,
    },
    basis::Shell,
    cartesian::{self, components, raised},
    engine::PrimitiveRecord,
    matrix::{shell_offsets, ElectronTensor},
    recurrence::{KernelWorkspace, RecurrenceTable},
    ConfigurationError, EngineConfig, EngineError, TwoBodyEngine, TwoBodyKernel,
};

use common::*;

fn engine(kernel: TwoBodyKernel, max_primitives: usize, max_l: usize) -> TwoBodyEngine {
    TwoBodyEngine::new(EngineConfig::new(kernel, max_primitives, max_l)).unwrap()
}

fn geminal() -> ContractedGeminal {
    ContractedGeminal::new([(0.8, 0.3), (2.5, -0.7)])
}

fn kernels() -> [TwoBodyKernel; 4] {
    [
        TwoBodyKernel::Coulomb,
        TwoBodyKernel::Geminal(geminal()),
        TwoBodyKernel::GeminalCoulomb(geminal()),
        TwoBodyKernel::GeminalGradientSquared(geminal()),
    ]
}

#[test]
fn ssss_of_separated_primitives() {
    let exponents = [0.5, 1.1, 0.8, 2.0];
    let centers = [
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 1.2),
        Vector3::new(0.7, -0.3, 0.4),
        Vector3::new(-0.6, 0.2, 0.0),
    ];
    let shells: Vec<_> = (0..4).map(|i| primitive(centers[i], 0, exponents[i])).collect();

    let (p, q) = (exponents[0] + exponents[1], exponents[2] + exponents[3]);
    let centroid_p = (exponents[0] * centers[0] + exponents[1] * centers[1]) / p;
    let centroid_q = (exponents[2] * centers[2] + exponents[3] * centers[3]) / q;
    let k1 = (-exponents[0] * exponents[1] / p * (centers[0] - centers[1]).norm_squared()).exp();
    let k2 = (-exponents[2] * exponents[3] / q * (centers[2] - centers[3]).norm_squared()).exp();
    let rho = p * q / (p + q);

    let mut f0 = [0.0];
    BoysTable::new(0).eval(&mut f0, rho * (centroid_p - centroid_q).norm_squared(), 0);
    let expected = 2.0 * PI.powf(2.5) / (p * q * (p + q).sqrt()) * k1 * k2 * f0[0];

    let value = engine(TwoBodyKernel::Coulomb, 1, 0)
        .compute(&shells[0], &shells[1], &shells[2], &shells[3])
        .unwrap()[0];
    assert_relative_eq!(value, expected, epsilon = 1e-13);
}

/// Concentric `(ss|ss)` values, integrated over the relative coordinate:
/// `(pi/(p+q))^{3/2} int exp(-rho r^2) O(r) d^3r`.
#[test]
fn geminal_kernels_at_zero_separation() {
    let a = 0.9;
    let s = primitive(Vector3::new(0.1, 0.2, 0.3), 0, a);
    let (p, q) = (2.0 * a, 2.0 * a);
    let rho = p * q / (p + q);
    let frame = (PI / (p + q)).powf(1.5);
    let terms = geminal();

    let coulomb = frame * 2.0 * PI / rho;
    let gaussian: f64 = terms
        .terms()
        .iter()
        .map(|t| t.coefficient * frame * (PI / (rho + t.exponent)).powf(1.5))
        .sum();
    let gaussian_coulomb: f64 = terms
        .terms()
        .iter()
        .map(|t| t.coefficient * frame * 2.0 * PI / (rho + t.exponent))
        .sum();
    // |grad g|^2 = 4 r^2 sum_ij c_i c_j g_i g_j exp(-(g_i + g_j) r^2)
    let gradient_squared: f64 = itertools::iproduct!(terms.terms(), terms.terms())
        .map(|(ti, tj)| {
            let beta = rho + ti.exponent + tj.exponent;
            4.0 * ti.coefficient
                * tj.coefficient
                * ti.exponent
                * tj.exponent
                * frame
                * 1.5
                * PI.powf(1.5)
                / beta.powf(2.5)
        })
        .sum();

    for (kernel, expected) in kernels().into_iter().zip([
        coulomb,
        gaussian,
        gaussian_coulomb,
        gradient_squared,
    ]) {
        let value = engine(kernel, 1, 0).compute(&s, &s, &s, &s).unwrap()[0];
        assert_relative_eq!(value, expected, epsilon = 1e-12, max_relative = 1e-12);
    }
}

/// Raising the angular momentum of one operand is differentiation by its center:
/// `d/dA_k (c ...) = 2a (c + 1_k ...) - c_k (c - 1_k ...)`.
#[test]
fn raising_matches_center_derivatives() {
    let exponents = [0.7, 1.2, 0.9, 1.5];
    let centers = [
        Vector3::new(0.1, -0.4, 0.3),
        Vector3::new(-0.5, 0.6, 0.2),
        Vector3::new(0.4, 0.3, -0.6),
        Vector3::new(0.0, -0.2, 0.5),
    ];
    let h = 1e-5;

    for kernel in kernels() {
        let mut engine = engine(kernel, 1, 4);

        for (slot, l) in itertools::iproduct!(0..4, 0..=3) {
            let a = exponents[slot];

            // the block with shell `slot` replaced by a primitive of angular momentum `l`
            let mut block = |l: usize, center: Vector3<f64>| {
                let shells: [Shell; 4] = std::array::from_fn(|i| {
                    if i == slot {
                        primitive(center, l, a)
                    } else {
                        primitive(centers[i], 0, exponents[i])
                    }
                });
                engine
                    .compute(&shells[0], &shells[1], &shells[2], &shells[3])
                    .unwrap()
                    .to_vec()
            };

            let raised_block = block(l + 1, centers[slot]);
            let lowered_block = if l > 0 {
                block(l - 1, centers[slot])
            } else {
                Vec::new()
            };

            for axis in 0..3 {
                let mut shifted = centers[slot];
                shifted[axis] += h;
                let plus = block(l, shifted);
                shifted[axis] -= 2.0 * h;
                let minus = block(l, shifted);

                for (i, c) in components(l).enumerate() {
                    let derivative = (plus[i] - minus[i]) / (2.0 * h);
                    let mut expected =
                        2.0 * a * raised_block[cartesian::index(raised(c, axis))];
                    if c[axis] > 0 {
                        let mut down = c;
                        down[axis] -= 1;
                        expected -= c[axis] as f64 * lowered_block[cartesian::index(down)];
                    }
                    assert_relative_eq!(
                        derivative,
                        expected,
                        epsilon = 1e-6,
                        max_relative = 1e-6
                    );
                }
            }
        }
    }
}

#[test]
fn permutational_symmetry() {
    let mut rng = rng();

    for kernel in kernels() {
        let mut engine = engine(kernel, 2, 3);

        for _ in 0..40 {
            let shells: Vec<_> = (0..4)
                .map(|_| {
                    let l = rng.gen_range(0..=3);
                    let pure = rng.gen_bool(0.5);
                    random_shell(&mut rng, l, pure, 2)
                })
                .collect();
            let [a, b, c, d] = [&shells[0], &shells[1], &shells[2], &shells[3]];
            let n = [a.size(), b.size(), c.size(), d.size()];

            let reference = engine.compute(a, b, c, d).unwrap().to_vec();
            let images: [([&Shell; 4], fn([usize; 4]) -> [usize; 4]); 7] = [
                ([b, a, c, d], |[i, j, k, l]| [j, i, k, l]),
                ([a, b, d, c], |[i, j, k, l]| [i, j, l, k]),
                ([b, a, d, c], |[i, j, k, l]| [j, i, l, k]),
                ([c, d, a, b], |[i, j, k, l]| [k, l, i, j]),
                ([d, c, a, b], |[i, j, k, l]| [l, k, i, j]),
                ([c, d, b, a], |[i, j, k, l]| [k, l, j, i]),
                ([d, c, b, a], |[i, j, k, l]| [l, k, j, i]),
            ];

            for (operands, index) in images {
                let dims = index(n);
                let image = engine
                    .compute(operands[0], operands[1], operands[2], operands[3])
                    .unwrap()
                    .to_vec();

                for (i, j, k, l) in itertools::iproduct!(0..n[0], 0..n[1], 0..n[2], 0..n[3]) {
                    assert_relative_eq!(
                        at(&reference, n, [i, j, k, l]),
                        at(&image, dims, index([i, j, k, l])),
                        epsilon = 1e-12,
                        max_relative = 1e-11
                    );
                }
            }
        }
    }
}

#[test]
fn pure_blocks_match_brute_force_transform() {
    let mut rng = rng();
    let mut engine = engine(TwoBodyKernel::Coulomb, 2, 2);

    for _ in 0..30 {
        let shells: Vec<_> = (0..4)
            .map(|_| {
                let l = rng.gen_range(0..=2);
                random_shell(&mut rng, l, true, 2)
            })
            .collect();
        let operands = [&shells[0], &shells[1], &shells[2], &shells[3]];
        let cartesian: Vec<_> = shells.iter().map(as_cartesian).collect();

        let block = engine
            .compute(&cartesian[0], &cartesian[1], &cartesian[2], &cartesian[3])
            .unwrap();
        let expected = transform_quartet(block, operands);

        let block = engine
            .compute(operands[0], operands[1], operands[2], operands[3])
            .unwrap();
        assert_eq!(block.len(), expected.len());
        for (value, expected) in block.iter().zip(&expected) {
            assert_relative_eq!(value, expected, epsilon = 1e-12, max_relative = 1e-10);
        }
    }
}

#[test]
fn ssss_fast_path_matches_registry_kernel() {
    let mut rng = rng();
    let shells: Vec<_> = (0..4).map(|_| random_shell(&mut rng, 0, false, 3)).collect();
    let operands = [&shells[0], &shells[1], &shells[2], &shells[3]];
    let registry = AuxiliaryRegistry::new(0);

    for kernel in kernels() {
        let fast = engine(kernel.clone(), 3, 0)
            .compute(operands[0], operands[1], operands[2], operands[3])
            .unwrap()[0];

        let records: Vec<_> = match kernel.geminal() {
            None => fill_records(operands, &mut registry.boys()),
            Some((kind, geminal)) => fill_records(
                operands,
                &mut GeminalEvaluator::new(kind, geminal, registry.boys_table().clone()),
            ),
        };

        let recurrence = RecurrenceTable::global().get(kernel.kind(), [0; 4]).unwrap();
        let mut out = [0.0];
        recurrence.run(&records, &mut KernelWorkspace::two_body(0), &mut out);

        assert_relative_eq!(fast, out[0], epsilon = 1e-14, max_relative = 1e-13);
    }
}

fn fill_records(
    operands: [&Shell; 4],
    aux: &mut impl AuxiliaryEvaluator,
) -> Vec<PrimitiveRecord> {
    let nprim = operands.map(Shell::nprim);
    itertools::iproduct!(0..nprim[0], 0..nprim[1], 0..nprim[2], 0..nprim[3])
        .map(|(p0, p1, p2, p3)| {
            let mut record = PrimitiveRecord::new(0);
            record.fill_two_body(operands, [p0, p1, p2, p3], 0, &mut *aux);
            record
        })
        .collect()
}

#[test]
fn tensor_matches_blocks() {
    let mut rng = rng();
    let shells: Vec<_> = [0, 1, 2, 1]
        .into_iter()
        .map(|l| random_shell(&mut rng, l, l > 1, 2))
        .collect();
    let offsets = shell_offsets(&shells);

    let mut engine = engine(TwoBodyKernel::Coulomb, 2, 2);
    let tensor = ElectronTensor::from_shells(&shells, &mut engine).unwrap();
    assert_eq!(tensor.size(), offsets[shells.len()]);

    for quartet in itertools::iproduct!(0..4, 0..4, 0..4, 0..4) {
        let [a, b, c, d] = [quartet.0, quartet.1, quartet.2, quartet.3];
        let n = [a, b, c, d].map(|s| shells[s].size());
        let block = engine
            .compute(&shells[a], &shells[b], &shells[c], &shells[d])
            .unwrap();

        for (i, j, k, l) in itertools::iproduct!(0..n[0], 0..n[1], 0..n[2], 0..n[3]) {
            let index = (
                offsets[a] + i,
                offsets[b] + j,
                offsets[c] + k,
                offsets[d] + l,
            );
            assert_relative_eq!(
                tensor[index],
                at(block, n, [i, j, k, l]),
                epsilon = 1e-12,
                max_relative = 1e-11
            );
        }
    }
}

#[test]
fn clones_share_configuration_not_buffers() {
    let mut rng = rng();
    let shells: Vec<_> = (0..4).map(|l| random_shell(&mut rng, l % 3, true, 2)).collect();
    let registry = AuxiliaryRegistry::new(8);

    let mut engine = TwoBodyEngine::with_registry(
        EngineConfig::new(TwoBodyKernel::GeminalCoulomb(geminal()), 2, 2),
        &registry,
    )
    .unwrap();
    let mut clone = engine.clone();
    assert_eq!(clone.config(), engine.config());

    let first = engine
        .compute(&shells[0], &shells[1], &shells[2], &shells[3])
        .unwrap()
        .to_vec();
    // an unrelated call on the clone leaves the original's result untouched
    clone
        .compute(&shells[3], &shells[2], &shells[1], &shells[0])
        .unwrap();
    let again = clone
        .compute(&shells[0], &shells[1], &shells[2], &shells[3])
        .unwrap();
    assert_eq!(again, first.as_slice());
}

#[test]
fn configuration_errors() {
    assert_eq!(
        TwoBodyEngine::new(EngineConfig::new(TwoBodyKernel::Coulomb, 1, 5)).unwrap_err(),
        EngineError::from(ConfigurationError::AngularMomentumLimit {
            requested: 5,
            limit: 4
        })
    );
    assert_eq!(
        TwoBodyEngine::new(EngineConfig::new(
            TwoBodyKernel::GeminalGradientSquared(ContractedGeminal::default()),
            1,
            1
        ))
        .unwrap_err(),
        EngineError::from(ConfigurationError::EmptyGeminal)
    );
    assert_eq!(
        TwoBodyEngine::with_registry(
            EngineConfig::new(TwoBodyKernel::Coulomb, 1, 2),
            &AuxiliaryRegistry::new(4)
        )
        .unwrap_err(),
        EngineError::from(ConfigurationError::AuxiliaryOrder {
            required: 8,
            available: 4
        })
    );

    let mut rng = rng();
    let d = random_shell(&mut rng, 2, true, 1);
    let s = random_shell(&mut rng, 0, false, 1);
    assert_eq!(
        engine(TwoBodyKernel::Coulomb, 1, 1)
            .compute(&s, &s, &d, &s)
            .unwrap_err(),
        EngineError::from(ConfigurationError::AngularMomentumExceedsEngine {
            requested: 2,
            max: 1
        })
    );
    assert_eq!(
        TwoBodyEngine::default().compute(&s, &s, &s, &s).unwrap_err(),
        EngineError::Unusable
    );
}
