//! Brings kernel output into the caller's operand order and basis.

use crate::{
    basis::Shell,
    solid_harmonics::{tform, tform_cols, tform_rows, transform_first, transform_inner, transform_last},
};

use super::{
    buffers::BufferPair,
    canonical::QuartetPermutation,
};

/// Adds a canonical `[nrow][ncol]` block into `tgt`, which is laid out in caller order:
/// `[ncol][nrow]` when the operands were swapped, `[nrow][ncol]` otherwise.
pub(crate) fn accumulate_pair(src: &[f64], tgt: &mut [f64], nrow: usize, ncol: usize, swap: bool) {
    if swap {
        for r in 0..nrow {
            for c in 0..ncol {
                tgt[c * nrow + r] += src[r * ncol + c];
            }
        }
    } else {
        tgt[..nrow * ncol]
            .iter_mut()
            .zip(&src[..nrow * ncol])
            .for_each(|(tgt, src)| *tgt += src);
    }
}

/// Solid-harmonic transform of a cartesian block of `(s1|s2)` in the current buffer.
pub(crate) fn transform_pair(buffers: &mut BufferPair, s1: &Shell, s2: &Shell) {
    let (l1, l2) = (s1.angular_momentum(), s2.angular_momentum());

    match (s1.is_pure(), s2.is_pure()) {
        (false, false) => return,
        (true, true) => {
            let (src, tgt) = buffers.split();
            tform(l1, l2, src, tgt);
        }
        (true, false) => {
            let (src, tgt) = buffers.split();
            tform_rows(l1, s2.cartesian_size(), src, tgt);
        }
        (false, true) => {
            let (src, tgt) = buffers.split();
            tform_cols(s1.cartesian_size(), l2, src, tgt);
        }
    }

    buffers.swap();
}

/// Per-axis solid-harmonic transform of a canonical `(bra1 bra2|ket1 ket2)` cartesian block.
pub(crate) fn transform_quartet(buffers: &mut BufferPair, [bra1, bra2, ket1, ket2]: [&Shell; 4]) {
    let nr2_cart = bra2.cartesian_size();
    let nc2_cart = ket2.cartesian_size();
    let ncol_cart = ket1.cartesian_size() * nc2_cart;

    if bra1.is_pure() {
        let (src, tgt) = buffers.split();
        transform_first(bra1.angular_momentum(), nr2_cart * ncol_cart, src, tgt);
        buffers.swap();
    }
    if bra2.is_pure() {
        let (src, tgt) = buffers.split();
        transform_inner(bra1.size(), bra2.angular_momentum(), ncol_cart, src, tgt);
        buffers.swap();
    }
    if ket1.is_pure() {
        let (src, tgt) = buffers.split();
        transform_inner(
            bra1.size() * bra2.size(),
            ket1.angular_momentum(),
            nc2_cart,
            src,
            tgt,
        );
        buffers.swap();
    }
    if ket2.is_pure() {
        let (src, tgt) = buffers.split();
        transform_last(
            bra1.size() * bra2.size() * ket1.size(),
            ket2.angular_momentum(),
            src,
            tgt,
        );
        buffers.swap();
    }
}

/// Undoes the canonical reordering of a two-body block.
///
/// `canonical` are the function counts of the canonical operands, `target` those of the
/// operands in caller order. Every canonical bra row `(r1, r2)` is a `[nc1][nc2]` block that
/// lands, possibly transposed, in a row of the target or, after a bra-ket swap, in a
/// strided column.
pub(crate) fn unpermute_quartet(
    buffers: &mut BufferPair,
    permutation: QuartetPermutation,
    [nr1, nr2, nc1, nc2]: [usize; 4],
    [nr1_tgt, nr2_tgt, nc1_tgt, nc2_tgt]: [usize; 4],
) {
    let QuartetPermutation {
        swap_bra,
        swap_ket,
        swap_braket,
    } = permutation;

    let ncol = nc1 * nc2;
    let ncol_tgt = nc1_tgt * nc2_tgt;

    let (src, tgt) = buffers.split();

    for r1 in 0..nr1 {
        for r2 in 0..nr2 {
            let row = &src[(r1 * nr2 + r2) * ncol..(r1 * nr2 + r2 + 1) * ncol];

            if swap_braket {
                let col = if swap_ket { r2 * nr1 + r1 } else { r1 * nr2 + r2 };
                for i in 0..nr1_tgt {
                    for j in 0..nr2_tgt {
                        let value = if swap_bra {
                            row[j * nc2 + i]
                        } else {
                            row[i * nc2 + j]
                        };
                        tgt[(i * nr2_tgt + j) * ncol_tgt + col] = value;
                    }
                }
            } else {
                let tgt_row = if swap_bra { r2 * nr1 + r1 } else { r1 * nr2 + r2 };
                let block = &mut tgt[tgt_row * ncol..(tgt_row + 1) * ncol];
                if swap_ket {
                    for i in 0..nc1_tgt {
                        for j in 0..nc2_tgt {
                            block[i * nc2_tgt + j] = row[j * nc2 + i];
                        }
                    }
                } else {
                    block.copy_from_slice(row);
                }
            }
        }
    }

    buffers.swap();
}
