//! Horizontal transfer `(a, b + 1_i| = (a + 1_i, b| + AB_i (a, b|`.

use nalgebra::Vector3;

use crate::cartesian::{
    components, components_between, cumulative, direction, global_index, index, lowered, ncart,
    raised,
};

/// Moves angular momentum `lb` from the first to the second center of a pair.
///
/// On entry `buffers[0]` holds `[outer][a][inner]` for every component `a` with
/// `la <= |a| <= la + lb`. On return it holds `[outer][ncart(la)][ncart(lb)][inner]`.
pub(crate) fn horizontal(
    buffers: &mut [Vec<f64>; 2],
    outer: usize,
    la: usize,
    lb: usize,
    inner: usize,
    ab: &Vector3<f64>,
) {
    for level in 1..=lb {
        let [src, dst] = &mut *buffers;
        transfer(src, dst, outer, la, la + lb, level, ab, inner);
        buffers.swap(0, 1);
    }
}

/// One step: `[outer][a][ncart(level - 1)][inner] -> [outer][a][ncart(level)][inner]`, where
/// `a` runs over `la <= |a| <= lsum - level` on output.
#[allow(clippy::too_many_arguments)]
fn transfer(
    src: &[f64],
    dst: &mut [f64],
    outer: usize,
    la: usize,
    lsum: usize,
    level: usize,
    ab: &Vector3<f64>,
    inner: usize,
) {
    let base = cumulative(la);
    let na_src = cumulative(lsum - level + 2) - base;
    let nb_src = ncart(level - 1);
    let na_dst = cumulative(lsum - level + 1) - base;
    let nb_dst = ncart(level);

    for o in 0..outer {
        for a in components_between(la, lsum - level) {
            let ia = global_index(a) - base;

            for b in components(level) {
                let i = direction(b);
                let ib1 = index(lowered(b, i, 1));
                let ia1 = global_index(raised(a, i)) - base;

                let target = ((o * na_dst + ia) * nb_dst + index(b)) * inner;
                let up = ((o * na_src + ia1) * nb_src + ib1) * inner;
                let same = ((o * na_src + ia) * nb_src + ib1) * inner;

                for k in 0..inner {
                    dst[target + k] = src[up + k] + ab[i] * src[same + k];
                }
            }
        }
    }
}
