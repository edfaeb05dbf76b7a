//! Per-primitive data consumed by the recurrence kernels.

use std::f64::consts::PI;

use nalgebra::Vector3;
use smallvec::{smallvec, SmallVec};

use crate::{atom::PointCharge, auxiliary::AuxiliaryEvaluator, basis::Shell};

use super::OneBodyOperator;

/// `2 pi^{5/2}`
const TWO_PI_TO_FIVE_HALVES: f64 = 34.986836655249725693;
/// `2 / sqrt(pi)`
const TWO_OVER_SQRT_PI: f64 = 1.12837916709551257389615890312;

/// Auxiliary orders stored without spilling to the heap.
const AUX_INLINE: usize = 20;

/// Geometric factors and fundamental integrals of one primitive pair (one-body) or quartet
/// (two-body). Only the fields the operator's recurrence reads are written.
#[derive(Clone, Debug)]
pub struct PrimitiveRecord {
    /// `P - A`
    pub pa: Vector3<f64>,
    /// `P - B`
    pub pb: Vector3<f64>,
    /// `A - B`
    pub ab: Vector3<f64>,
    /// `1 / 2p`
    pub oo2z: f64,

    pub rho12_over_alpha1: f64,
    pub rho12_over_alpha2: f64,
    pub two_rho12: f64,

    /// `P - C` for the current point charge
    pub pc: Vector3<f64>,

    /// `Q - C`
    pub qc: Vector3<f64>,
    /// `Q - D`
    pub qd: Vector3<f64>,
    /// `C - D`
    pub cd: Vector3<f64>,
    /// `W - P`
    pub wp: Vector3<f64>,
    /// `W - Q`
    pub wq: Vector3<f64>,
    /// `1 / 2q`
    pub oo2e: f64,
    /// `1 / 2(p + q)`
    pub oo2ze: f64,
    /// `rho / p`
    pub roz: f64,
    /// `rho / q`
    pub roe: f64,

    /// `(s|s)` overlap including contraction coefficients
    pub overlap_ss: f64,
    /// `(s|T|s)` including contraction coefficients
    pub kinetic_ss: f64,
    /// Auxiliary values `G_m`, scaled by the primitive prefactor, for `m = 0..=mmax`
    pub aux: SmallVec<[f64; AUX_INLINE]>,
}

impl PrimitiveRecord {
    /// A zeroed record able to hold auxiliary orders `0..=max_order`.
    pub fn new(max_order: usize) -> Self {
        Self {
            pa: Vector3::zeros(),
            pb: Vector3::zeros(),
            ab: Vector3::zeros(),
            oo2z: 0.0,
            rho12_over_alpha1: 0.0,
            rho12_over_alpha2: 0.0,
            two_rho12: 0.0,
            pc: Vector3::zeros(),
            qc: Vector3::zeros(),
            qd: Vector3::zeros(),
            cd: Vector3::zeros(),
            wp: Vector3::zeros(),
            wq: Vector3::zeros(),
            oo2e: 0.0,
            oo2ze: 0.0,
            roz: 0.0,
            roe: 0.0,
            overlap_ss: 0.0,
            kinetic_ss: 0.0,
            aux: smallvec![0.0; max_order + 1],
        }
    }

    /// Fills the record for primitive `pb` of `bra` and `pk` of `ket`.
    ///
    /// `charge` must be given for the nuclear attraction operator.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_one_body(
        &mut self,
        operator: OneBodyOperator,
        bra: &Shell,
        ket: &Shell,
        pb: usize,
        pk: usize,
        charge: Option<&PointCharge>,
        aux: &mut impl AuxiliaryEvaluator,
    ) {
        let (a, b) = (&bra.center, &ket.center);
        let (alpha1, alpha2) = (bra.exponents[pb], ket.exponents[pk]);
        let (c1, c2) = (bra.coefficients()[pb], ket.coefficients()[pk]);

        let gammap = alpha1 + alpha2;
        let oogammap = gammap.recip();
        let rhop = alpha1 * alpha2 * oogammap;
        let p = (alpha1 * a + alpha2 * b) * oogammap;

        self.ab = a - b;
        let ab2 = self.ab.norm_squared();
        self.pa = p - a;
        self.pb = p - b;
        self.oo2z = 0.5 * oogammap;

        self.overlap_ss = (PI * oogammap).powf(1.5) * (-rhop * ab2).exp() * c1 * c2;

        match operator {
            OneBodyOperator::Overlap => {}
            OneBodyOperator::Kinetic => {
                self.rho12_over_alpha1 = alpha2 * oogammap;
                self.rho12_over_alpha2 = alpha1 * oogammap;
                self.two_rho12 = 2.0 * rhop;
                self.kinetic_ss = rhop * (3.0 - 2.0 * rhop * ab2) * self.overlap_ss;
            }
            OneBodyOperator::Nuclear => {
                let Some(charge) = charge else {
                    debug_assert!(false, "nuclear primitive data without a point charge");
                    return;
                };

                self.pc = p - charge.position;
                let u = gammap * self.pc.norm_squared();
                let ltot = bra.angular_momentum() + ket.angular_momentum();
                aux.evaluate(&mut self.aux, u, 0.0, ltot);

                let pfac = -charge.charge * gammap.sqrt() * TWO_OVER_SQRT_PI * self.overlap_ss;
                self.aux[..=ltot].iter_mut().for_each(|fm| *fm *= pfac);
            }
        }
    }

    /// Fills the record for one primitive of each of the four canonical operands.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_two_body(
        &mut self,
        [bra1, bra2, ket1, ket2]: [&Shell; 4],
        [p0, p1, p2, p3]: [usize; 4],
        derivative_order: usize,
        aux: &mut impl AuxiliaryEvaluator,
    ) {
        let (a, b, c, d) = (&bra1.center, &bra2.center, &ket1.center, &ket2.center);
        let (alpha0, alpha1) = (bra1.exponents[p0], bra2.exponents[p1]);
        let (alpha2, alpha3) = (ket1.exponents[p2], ket2.exponents[p3]);
        let coefficients = bra1.coefficients()[p0]
            * bra2.coefficients()[p1]
            * ket1.coefficients()[p2]
            * ket2.coefficients()[p3];

        let amtot = bra1.angular_momentum()
            + bra2.angular_momentum()
            + ket1.angular_momentum()
            + ket2.angular_momentum();

        let gammap = alpha0 + alpha1;
        let oogammap = gammap.recip();
        let rhop = alpha0 * alpha1 * oogammap;
        let p = (alpha0 * a + alpha1 * b) * oogammap;
        let ab = a - b;

        let gammaq = alpha2 + alpha3;
        let oogammaq = gammaq.recip();
        let rhoq = alpha2 * alpha3 * oogammaq;
        let q = (alpha2 * c + alpha3 * d) * oogammaq;
        let cd = c - d;

        let gammapq = gammap + gammaq;
        let oogammapq = gammapq.recip();
        let rho = gammap * gammaq * oogammapq;
        let pq2 = (p - q).norm_squared();

        let k1 = (-rhop * ab.norm_squared()).exp();
        let k2 = (-rhoq * cd.norm_squared()).exp();
        let pfac = TWO_PI_TO_FIVE_HALVES
            * k1
            * k2
            * oogammap
            * oogammaq
            * gammapq.sqrt()
            * oogammapq
            * coefficients;

        let mmax = amtot + derivative_order;
        aux.evaluate(&mut self.aux, pq2 * rho, rho, mmax);
        self.aux[..=mmax].iter_mut().for_each(|gm| *gm *= pfac);

        if mmax == 0 {
            return;
        }

        self.pa = p - a;
        self.pb = p - b;
        self.qc = q - c;
        self.qd = q - d;
        self.ab = ab;
        self.cd = cd;

        let w = (gammap * p + gammaq * q) * oogammapq;
        self.wp = w - p;
        self.wq = w - q;

        self.oo2z = 0.5 * oogammap;
        self.oo2e = 0.5 * oogammaq;
        self.oo2ze = 0.5 * oogammapq;
        self.roz = rho * oogammap;
        self.roe = rho * oogammaq;
    }
}
