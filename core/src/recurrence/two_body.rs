//! Head-Gordon-Pople scheme for the two-body kernels.
//!
//! The vertical recurrence builds `[e0|f0]^(0)` on the first bra and first ket centers
//! from the auxiliary values, primitives are contracted, and the horizontal transfer moves
//! angular momentum to the second bra and then the second ket center.

use crate::{
    cartesian::{components, cumulative, direction, global_index, lowered, ncart},
    engine::PrimitiveRecord,
};

use super::{hrr, KernelWorkspace};

pub(super) fn electron_repulsion(
    records: &[PrimitiveRecord],
    [la, lb, lc, ld]: [usize; 4],
    workspace: &mut KernelWorkspace,
    out: &mut [f64],
) {
    let (lab, lcd) = (la + lb, lc + ld);
    let ltot = lab + lcd;
    let (ne, nf) = (cumulative(lab + 1), cumulative(lcd + 1));
    let (e_lower, f_lower) = (cumulative(la), cumulative(lc));
    let nfc = nf - f_lower;
    let at = |m: usize, e: usize, f: usize| (m * ne + e) * nf + f;

    let KernelWorkspace { vrr, hrr } = workspace;
    let acc = &mut hrr[0][..(ne - e_lower) * nfc];
    acc.fill(0.0);

    for record in records {
        for m in 0..=ltot {
            vrr[at(m, 0, 0)] = record.aux[m];
        }

        // [e0|00]^(m) = PA_i [e-1_i]^(m) + WP_i [e-1_i]^(m+1)
        //             + N_i(e-1_i) / 2p ([e-2_i]^(m) - rho/p [e-2_i]^(m+1))
        for l in 1..=lab {
            for t in components(l) {
                let i = direction(t);
                let target = global_index(t);
                let e1 = global_index(lowered(t, i, 1));
                let e2 = (t[i] >= 2).then(|| global_index(lowered(t, i, 2)));
                let factor = record.oo2z * (t[i] - 1) as f64;
                let (pa, wp) = (record.pa[i], record.wp[i]);

                for m in 0..=ltot - l {
                    let mut value = pa * vrr[at(m, e1, 0)] + wp * vrr[at(m + 1, e1, 0)];
                    if let Some(e2) = e2 {
                        value += factor * (vrr[at(m, e2, 0)] - record.roz * vrr[at(m + 1, e2, 0)]);
                    }
                    vrr[at(m, target, 0)] = value;
                }
            }
        }

        // [e0|f0]^(m) = QC_i [e|f-1_i]^(m) + WQ_i [e|f-1_i]^(m+1)
        //             + N_i(f-1_i) / 2q ([e|f-2_i]^(m) - rho/q [e|f-2_i]^(m+1))
        //             + N_i(e) / 2(p+q) [e-1_i|f-1_i]^(m+1)
        for lf in 1..=lcd {
            for u in components(lf) {
                let i = direction(u);
                let target = global_index(u);
                let f1 = global_index(lowered(u, i, 1));
                let f2 = (u[i] >= 2).then(|| global_index(lowered(u, i, 2)));
                let f_factor = record.oo2e * (u[i] - 1) as f64;
                let (qc, wq) = (record.qc[i], record.wq[i]);

                for le in 0..=lab {
                    for t in components(le) {
                        let e = global_index(t);
                        let e1 = (t[i] > 0).then(|| global_index(lowered(t, i, 1)));
                        let e_factor = record.oo2ze * t[i] as f64;

                        for m in 0..=ltot - le - lf {
                            let mut value =
                                qc * vrr[at(m, e, f1)] + wq * vrr[at(m + 1, e, f1)];
                            if let Some(f2) = f2 {
                                value += f_factor
                                    * (vrr[at(m, e, f2)] - record.roe * vrr[at(m + 1, e, f2)]);
                            }
                            if let Some(e1) = e1 {
                                value += e_factor * vrr[at(m + 1, e1, f1)];
                            }
                            vrr[at(m, e, target)] = value;
                        }
                    }
                }
            }
        }

        for e in e_lower..ne {
            let row = &mut acc[(e - e_lower) * nfc..(e - e_lower + 1) * nfc];
            row.iter_mut()
                .zip(&vrr[at(0, e, f_lower)..at(0, e, nf)])
                .for_each(|(acc, value)| *acc += value);
        }
    }

    let (ab, cd) = (&records[0].ab, &records[0].cd);
    hrr::horizontal(hrr, 1, la, lb, nfc, ab);
    hrr::horizontal(hrr, ncart(la) * ncart(lb), lc, ld, 1, cd);

    let n = ncart(la) * ncart(lb) * ncart(lc) * ncart(ld);
    out[..n].copy_from_slice(&hrr[0][..n]);
}
