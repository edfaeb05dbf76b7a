//! Assembly of full matrices and tensors over a list of shells.
//!
//! Every unique shell pair (quartet) is computed once and mirrored to its symmetric images.
//! With the `rayon` feature the blocks are distributed over worker threads, each owning a
//! clone of the caller's engine.

use std::ops::Index;

use nalgebra::DMatrix;

use crate::{
    basis::Shell,
    engine::{OneBodyEngine, TwoBodyEngine},
    error::EngineError,
};

/// Offset of the first function of every shell, followed by the total function count.
pub fn shell_offsets(shells: &[Shell]) -> Vec<usize> {
    std::iter::once(0)
        .chain(shells.iter().scan(0, |offset, shell| {
            *offset += shell.size();
            Some(*offset)
        }))
        .collect()
}

/// Unique shell pairs `(i, j)` with `i >= j`.
fn shell_pairs(nshells: usize) -> Vec<(usize, usize)> {
    (0..nshells)
        .flat_map(|i| (0..=i).map(move |j| (i, j)))
        .collect()
}

/// Unique shell quartets `(i j|k l)` with `i >= j`, `k >= l` and `(i j) >= (k l)`.
fn shell_quartets(nshells: usize) -> Vec<[usize; 4]> {
    let mut quartets = Vec::new();
    for i in 0..nshells {
        for j in 0..=i {
            for k in 0..=i {
                let lmax = if k == i { j } else { k };
                for l in 0..=lmax {
                    quartets.push([i, j, k, l]);
                }
            }
        }
    }
    quartets
}

/// The symmetric one-body matrix `(i|O|j)` over all functions of `shells`.
pub fn one_body_matrix(
    shells: &[Shell],
    engine: &mut OneBodyEngine,
) -> Result<DMatrix<f64>, EngineError> {
    let offsets = shell_offsets(shells);
    let n = offsets[shells.len()];
    let mut matrix = DMatrix::zeros(n, n);

    let mut scatter = |(i, j): (usize, usize), block: &[f64]| {
        let (ni, nj) = (shells[i].size(), shells[j].size());
        for fi in 0..ni {
            for fj in 0..nj {
                let value = block[fi * nj + fj];
                matrix[(offsets[i] + fi, offsets[j] + fj)] = value;
                matrix[(offsets[j] + fj, offsets[i] + fi)] = value;
            }
        }
    };

    let pairs = shell_pairs(shells.len());

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;

        let blocks = pairs
            .par_iter()
            .map_init(
                || engine.clone(),
                |engine, &(i, j)| {
                    engine
                        .compute(&shells[i], &shells[j])
                        .map(|block| ((i, j), block.to_vec()))
                },
            )
            .collect::<Result<Vec<_>, _>>()?;

        for (pair, block) in blocks {
            scatter(pair, &block);
        }
    }

    #[cfg(not(feature = "rayon"))]
    for (i, j) in pairs {
        let block = engine.compute(&shells[i], &shells[j])?;
        scatter((i, j), block);
    }

    Ok(matrix)
}

/// Dense two-electron tensor `(ij|kl)` over all functions of a list of shells.
#[derive(Clone, Debug)]
pub struct ElectronTensor {
    data: Vec<f64>,
    /// side length
    size: usize,
}

impl ElectronTensor {
    pub fn from_shells(shells: &[Shell], engine: &mut TwoBodyEngine) -> Result<Self, EngineError> {
        let offsets = shell_offsets(shells);
        let size = offsets[shells.len()];
        let mut tensor = Self {
            data: vec![0.0; size.pow(4)],
            size,
        };

        let quartets = shell_quartets(shells.len());
        log::debug!(
            "electron tensor: {} shells, {size} functions, {} unique quartets",
            shells.len(),
            quartets.len()
        );

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;

            let blocks = quartets
                .par_chunks(64)
                .map_init(
                    || engine.clone(),
                    |engine, chunk| {
                        chunk
                            .iter()
                            .map(|&quartet| {
                                let [i, j, k, l] = quartet.map(|s| &shells[s]);
                                engine
                                    .compute(i, j, k, l)
                                    .map(|block| (quartet, block.to_vec()))
                            })
                            .collect::<Result<Vec<_>, _>>()
                    },
                )
                .collect::<Result<Vec<_>, _>>()?;

            for (quartet, block) in blocks.into_iter().flatten() {
                tensor.scatter(shells, &offsets, quartet, &block);
            }
        }

        #[cfg(not(feature = "rayon"))]
        for quartet in quartets {
            let [i, j, k, l] = quartet.map(|s| &shells[s]);
            let block = engine.compute(i, j, k, l)?;
            tensor.scatter(shells, &offsets, quartet, block);
        }

        Ok(tensor)
    }

    /// Writes a quartet block to its eight symmetric images.
    fn scatter(&mut self, shells: &[Shell], offsets: &[usize], quartet: [usize; 4], block: &[f64]) {
        let [n1, n2, n3, n4] = quartet.map(|s| shells[s].size());
        let [o1, o2, o3, o4] = quartet.map(|s| offsets[s]);

        let mut values = block.iter().copied();
        for f1 in 0..n1 {
            for f2 in 0..n2 {
                for f3 in 0..n3 {
                    for f4 in 0..n4 {
                        let (i, j, k, l) = (o1 + f1, o2 + f2, o3 + f3, o4 + f4);
                        let value = values.next().unwrap_or_default();
                        for index in [
                            (i, j, k, l),
                            (j, i, k, l),
                            (i, j, l, k),
                            (j, i, l, k),
                            (k, l, i, j),
                            (l, k, i, j),
                            (k, l, j, i),
                            (l, k, j, i),
                        ] {
                            let linear = self.linear(index);
                            self.data[linear] = value;
                        }
                    }
                }
            }
        }
    }

    #[inline(always)]
    fn linear(&self, (i, j, k, l): (usize, usize, usize, usize)) -> usize {
        ((i * self.size + j) * self.size + k) * self.size + l
    }

    /// Number of basis functions.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major `n^4` data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl Index<(usize, usize, usize, usize)> for ElectronTensor {
    type Output = f64;

    fn index(&self, index: (usize, usize, usize, usize)) -> &Self::Output {
        &self.data[self.linear(index)]
    }
}
