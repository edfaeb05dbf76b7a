//! Cartesian component bookkeeping.
//!
//! Components of a shell with angular momentum `l` are the monomials `x^i y^j z^k` with
//! `i + j + k = l`, ordered by descending `i`, then descending `j`:
//! `xx, xy, xz, yy, yz, zz` for `l = 2`. The same ordering is used by every kernel and by
//! the solid-harmonic coefficients, so blocks produced by one can be consumed by the other.

/// Exponents `[i, j, k]` of a cartesian monomial.
pub type Component = [usize; 3];

/// Number of cartesian components in a shell.
#[inline(always)]
pub const fn ncart(l: usize) -> usize {
    (l + 1) * (l + 2) / 2
}

/// Number of solid harmonics in a shell.
#[inline(always)]
pub const fn npure(l: usize) -> usize {
    2 * l + 1
}

/// Number of functions in a shell, cartesian or pure.
#[inline(always)]
pub const fn nfunctions(l: usize, pure: bool) -> usize {
    if pure {
        npure(l)
    } else {
        ncart(l)
    }
}

/// Number of cartesian components of every degree strictly below `l`.
#[inline(always)]
pub const fn cumulative(l: usize) -> usize {
    l * (l + 1) * (l + 2) / 6
}

/// Position of a component within its own shell.
#[inline(always)]
pub const fn index(c: Component) -> usize {
    let lx = c[1] + c[2];
    lx * (lx + 1) / 2 + c[2]
}

/// Position of a component among all components of degree `0..=l`.
#[inline(always)]
pub const fn global_index(c: Component) -> usize {
    cumulative(c[0] + c[1] + c[2]) + index(c)
}

/// The cartesian direction a recurrence should lower: the first axis with a nonzero exponent.
#[inline(always)]
pub fn direction(c: Component) -> usize {
    if c[0] > 0 {
        0
    } else if c[1] > 0 {
        1
    } else {
        2
    }
}

/// `c` with the exponent along `axis` decreased by `by`.
#[inline(always)]
pub fn lowered(mut c: Component, axis: usize, by: usize) -> Component {
    c[axis] -= by;
    c
}

/// `c` with the exponent along `axis` increased by one.
#[inline(always)]
pub fn raised(mut c: Component, axis: usize) -> Component {
    c[axis] += 1;
    c
}

/// Ordered iterator over the components of a shell. Does not allocate.
pub fn components(l: usize) -> Components {
    Components { l, i: l, j: 0, done: false }
}

/// Ordered iterator over the components of every degree in `lo..=hi`.
pub fn components_between(lo: usize, hi: usize) -> impl Iterator<Item = Component> {
    (lo..=hi).flat_map(components)
}

#[derive(Clone, Debug)]
pub struct Components {
    l: usize,
    i: usize,
    j: usize,
    done: bool,
}

impl Iterator for Components {
    type Item = Component;

    fn next(&mut self) -> Option<Component> {
        if self.done {
            return None;
        }

        let item = [self.i, self.j, self.l - self.i - self.j];

        if self.j > 0 {
            self.j -= 1;
        } else if self.i > 0 {
            self.i -= 1;
            self.j = self.l - self.i;
        } else {
            self.done = true;
        }

        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn d_shell_order() {
        let d: Vec<_> = components(2).collect();
        assert_eq!(
            d,
            vec![[2, 0, 0], [1, 1, 0], [1, 0, 1], [0, 2, 0], [0, 1, 1], [0, 0, 2]]
        );
    }

    #[test]
    fn index_matches_iteration_order() {
        for l in 0..=8 {
            let mut count = 0;
            for (position, c) in components(l).enumerate() {
                assert_eq!(index(c), position);
                assert_eq!(global_index(c), cumulative(l) + position);
                count += 1;
            }
            assert_eq!(count, ncart(l));
        }
    }

    #[test]
    fn cumulative_counts() {
        for l in 0..10 {
            assert_eq!(cumulative(l + 1) - cumulative(l), ncart(l));
        }
    }
}
