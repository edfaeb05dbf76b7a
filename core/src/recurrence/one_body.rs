//! Obara-Saika recurrences for the one-body operators.

use crate::{
    cartesian::{
        components, components_between, cumulative, direction, global_index, lowered, ncart,
    },
    engine::PrimitiveRecord,
};

use super::{hrr, KernelWorkspace};

/// Overlap: vertical recurrence on the first center, horizontal transfer to the second.
pub(super) fn overlap(
    records: &[PrimitiveRecord],
    [la, lb, ..]: [usize; 4],
    workspace: &mut KernelWorkspace,
    out: &mut [f64],
) {
    let lsum = la + lb;
    let lower = cumulative(la);
    let upper = cumulative(lsum + 1);
    let KernelWorkspace { vrr, hrr } = workspace;

    let acc = &mut hrr[0][..upper - lower];
    acc.fill(0.0);

    for record in records {
        vrr[0] = record.overlap_ss;

        for t in components_between(1, lsum) {
            let i = direction(t);
            let mut value = record.pa[i] * vrr[global_index(lowered(t, i, 1))];
            if t[i] >= 2 {
                value += record.oo2z
                    * (t[i] - 1) as f64
                    * vrr[global_index(lowered(t, i, 2))];
            }
            vrr[global_index(t)] = value;
        }

        acc.iter_mut()
            .zip(&vrr[lower..upper])
            .for_each(|(acc, value)| *acc += value);
    }

    finish(hrr, la, lb, &records[0], out);
}

/// Nuclear attraction: vertical recurrence over auxiliary orders on the first center,
/// horizontal transfer to the second.
pub(super) fn nuclear(
    records: &[PrimitiveRecord],
    [la, lb, ..]: [usize; 4],
    workspace: &mut KernelWorkspace,
    out: &mut [f64],
) {
    let lsum = la + lb;
    let lower = cumulative(la);
    let upper = cumulative(lsum + 1);
    let at = |m: usize, e: usize| m * upper + e;
    let KernelWorkspace { vrr, hrr } = workspace;

    let acc = &mut hrr[0][..upper - lower];
    acc.fill(0.0);

    for record in records {
        for m in 0..=lsum {
            vrr[at(m, 0)] = record.aux[m];
        }

        for l in 1..=lsum {
            for t in components(l) {
                let i = direction(t);
                let target = global_index(t);
                let e1 = global_index(lowered(t, i, 1));
                let (pa, pc) = (record.pa[i], record.pc[i]);

                if t[i] >= 2 {
                    let e2 = global_index(lowered(t, i, 2));
                    let factor = record.oo2z * (t[i] - 1) as f64;
                    for m in 0..=lsum - l {
                        vrr[at(m, target)] = pa * vrr[at(m, e1)] - pc * vrr[at(m + 1, e1)]
                            + factor * (vrr[at(m, e2)] - vrr[at(m + 1, e2)]);
                    }
                } else {
                    for m in 0..=lsum - l {
                        vrr[at(m, target)] = pa * vrr[at(m, e1)] - pc * vrr[at(m + 1, e1)];
                    }
                }
            }
        }

        acc.iter_mut()
            .zip(&vrr[lower..upper])
            .for_each(|(acc, value)| *acc += value);
    }

    finish(hrr, la, lb, &records[0], out);
}

fn finish(
    hrr: &mut [Vec<f64>; 2],
    la: usize,
    lb: usize,
    record: &PrimitiveRecord,
    out: &mut [f64],
) {
    hrr::horizontal(hrr, 1, la, lb, 1, &record.ab);
    let n = ncart(la) * ncart(lb);
    out[..n].copy_from_slice(&hrr[0][..n]);
}

/// Kinetic energy: one-dimensional overlap and kinetic recurrences on both centers. The
/// kinetic operator does not commute with the horizontal transfer.
pub(super) fn kinetic(
    records: &[PrimitiveRecord],
    [la, lb, ..]: [usize; 4],
    workspace: &mut KernelWorkspace,
    out: &mut [f64],
) {
    let (na, nb) = (la + 1, lb + 1);
    let n = na * nb;
    let at = |i: usize, j: usize| i * nb + j;

    let ncb = ncart(lb);
    let out = &mut out[..ncart(la) * ncb];
    out.fill(0.0);

    for record in records {
        let (s, k) = workspace.vrr[..6 * n].split_at_mut(3 * n);
        let rho = 0.5 * record.two_rho12;

        for axis in 0..3 {
            let s = &mut s[axis * n..(axis + 1) * n];
            let k = &mut k[axis * n..(axis + 1) * n];
            let (pa, pb, ab) = (record.pa[axis], record.pb[axis], record.ab[axis]);
            let oo2z = record.oo2z;

            s[at(0, 0)] = 1.0;
            for i in 0..la {
                let mut value = pa * s[at(i, 0)];
                if i > 0 {
                    value += oo2z * i as f64 * s[at(i - 1, 0)];
                }
                s[at(i + 1, 0)] = value;
            }
            for j in 0..lb {
                for i in 0..na {
                    let mut value = pb * s[at(i, j)];
                    if i > 0 {
                        value += oo2z * i as f64 * s[at(i - 1, j)];
                    }
                    if j > 0 {
                        value += oo2z * j as f64 * s[at(i, j - 1)];
                    }
                    s[at(i, j + 1)] = value;
                }
            }

            k[at(0, 0)] = rho * (1.0 - 2.0 * rho * ab * ab);
            for i in 0..la {
                let mut value = pa * k[at(i, 0)] + record.two_rho12 * s[at(i + 1, 0)];
                if i > 0 {
                    value += oo2z * i as f64 * k[at(i - 1, 0)]
                        - record.rho12_over_alpha1 * i as f64 * s[at(i - 1, 0)];
                }
                k[at(i + 1, 0)] = value;
            }
            for j in 0..lb {
                for i in 0..na {
                    let mut value = pb * k[at(i, j)] + record.two_rho12 * s[at(i, j + 1)];
                    if i > 0 {
                        value += oo2z * i as f64 * k[at(i - 1, j)];
                    }
                    if j > 0 {
                        value += oo2z * j as f64 * k[at(i, j - 1)]
                            - record.rho12_over_alpha2 * j as f64 * s[at(i, j - 1)];
                    }
                    k[at(i, j + 1)] = value;
                }
            }
        }

        let (sx, sy, sz) = (&s[..n], &s[n..2 * n], &s[2 * n..]);
        let (kx, ky, kz) = (&k[..n], &k[n..2 * n], &k[2 * n..]);

        for (ia, a) in components(la).enumerate() {
            for (ib, b) in components(lb).enumerate() {
                let (x, y, z) = (at(a[0], b[0]), at(a[1], b[1]), at(a[2], b[2]));
                out[ia * ncb + ib] += record.overlap_ss
                    * (kx[x] * sy[y] * sz[z] + sx[x] * ky[y] * sz[z] + sx[x] * sy[y] * kz[z]);
            }
        }
    }
}
