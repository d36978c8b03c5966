//! Partitioning of a sorted alive population into slices.
//!
//! Both partitioners take the ascending alive longitudinal coordinates and
//! a resolved [`Window`], and produce a [`Partition`]. Intervals are
//! half-open `[b_i, b_{i+1})` except the last, which also contains the head
//! cut point: every particle with `dz == head` lands in the final slice.
//! The head is located with an upper-bound search, so the policy does not
//! depend on spotting a single exactly-equal coordinate.

use std::ops::Range;

use rand::seq::index;
use rand::Rng;

use crate::window::Window;

/// The outcome of one update: boundaries, per-slice counts, and cuts.
///
/// `counts.iter().sum() + cut_tail + cut_head` always equals the alive
/// particle count that was partitioned.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    boundaries: Vec<f64>,
    counts: Vec<usize>,
    cut_tail: usize,
    cut_head: usize,
}

impl Partition {
    /// `n_slices + 1` non-decreasing boundaries.
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Particle count per slice.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Alive particles below the window.
    pub fn cut_tail(&self) -> usize {
        self.cut_tail
    }

    /// Alive particles above the window.
    pub fn cut_head(&self) -> usize {
        self.cut_head
    }

    /// Number of slices.
    pub fn n_slices(&self) -> usize {
        self.counts.len()
    }

    /// Alive particles accounted for: slices plus both cuts.
    pub fn n_alive(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.cut_tail + self.cut_head
    }

    /// Midpoints of consecutive boundaries.
    pub fn centers(&self) -> Vec<f64> {
        centers(&self.boundaries)
    }

    /// Index range of each slice into the sorted alive prefix.
    pub fn slice_ranges(&self) -> Vec<Range<usize>> {
        let mut start = self.cut_tail;
        self.counts
            .iter()
            .map(|&count| {
                let range = start..start + count;
                start += count;
                range
            })
            .collect()
    }
}

/// Midpoints of consecutive boundaries.
pub(crate) fn centers(boundaries: &[f64]) -> Vec<f64> {
    boundaries
        .windows(2)
        .map(|w| w[0] + (w[1] - w[0]) / 2.0)
        .collect()
}

/// `n + 1` equally spaced points from `tail` to `head`, both exact.
pub(crate) fn linspace(tail: f64, head: f64, n: usize) -> Vec<f64> {
    let width = head - tail;
    (0..=n)
        .map(|i| {
            if i == n {
                head
            } else {
                (tail + width * i as f64 / n as f64).min(head)
            }
        })
        .collect()
}

/// First index in `dz` with `dz[i] >= z`.
fn lower_bound(dz: &[f64], z: f64) -> usize {
    dz.partition_point(|&v| v < z)
}

/// First index in `dz` with `dz[i] > z`.
fn upper_bound(dz: &[f64], z: f64) -> usize {
    dz.partition_point(|&v| v <= z)
}

/// Equal-width slices over `window`.
///
/// Deterministic: identical input always yields an identical partition.
pub fn constant_space(dz: &[f64], window: Window, n_slices: usize) -> Partition {
    let boundaries = linspace(window.tail, window.head, n_slices);
    let mut first_index: Vec<usize> = boundaries[..n_slices]
        .iter()
        .map(|&b| lower_bound(dz, b))
        .collect();
    first_index.push(upper_bound(dz, window.head));

    let counts = first_index.windows(2).map(|w| w[1] - w[0]).collect();
    Partition {
        boundaries,
        counts,
        cut_tail: first_index[0],
        cut_head: dz.len() - first_index[n_slices],
    }
}

/// Equal-count slices over `window`.
///
/// Each slice receives `q0 / n_slices` particles, where `q0` is the number
/// of alive particles inside the window; the `q0 % n_slices` leftovers go
/// one each to a subset of slices drawn uniformly without replacement from
/// `rng`. Internal boundaries sit halfway between the last particle of one
/// slice and the first of the next. A boundary with no window particle
/// below it (leading empty slices) is pinned to `tail`, and one with none
/// above it to `head`.
pub fn constant_charge<R>(dz: &[f64], window: Window, n_slices: usize, rng: &mut R) -> Partition
where
    R: Rng + ?Sized,
{
    let lo = lower_bound(dz, window.tail);
    let hi = upper_bound(dz, window.head).max(lo);
    let q0 = hi - lo;

    let mut counts = vec![q0 / n_slices; n_slices];
    for slice in index::sample(rng, n_slices, q0 % n_slices).iter() {
        counts[slice] += 1;
    }

    let mut boundaries = Vec::with_capacity(n_slices + 1);
    boundaries.push(window.tail);
    let mut start = lo;
    for &count in &counts[..n_slices - 1] {
        start += count;
        let edge = if start == lo {
            window.tail
        } else if start == hi {
            window.head
        } else {
            let (below, above) = (dz[start - 1], dz[start]);
            below + (above - below) / 2.0
        };
        boundaries.push(edge);
    }
    boundaries.push(window.head);

    Partition {
        boundaries,
        counts,
        cut_tail: lo,
        cut_head: dz.len() - hi,
    }
}
