//! Structure-of-arrays macro-particle population.

use beamslice_core::{BeamParams, Channel, ParticleLedger, SliceError};
use tracing::{debug, trace};

/// A bunch of macro-particles with alive/lost bookkeeping.
///
/// # Examples
///
/// ```
/// use beamslice_core::physics::M_P;
/// use beamslice_core::{BeamParams, Channel};
/// use beamslice_ledger::{Bunch, ParticleLedger};
///
/// let beam = BeamParams::from_gamma(M_P, 27.7).unwrap();
/// let mut bunch = Bunch::longitudinal(vec![0.3, -0.1, 0.2], beam);
/// bunch.sort_particles();
/// assert_eq!(bunch.alive(Channel::Dz), &[-0.1, 0.2, 0.3]);
///
/// let lost = bunch.lose_where(|p| p[Channel::Dz.index()] > 0.25);
/// assert_eq!(lost, 1);
/// assert_eq!(bunch.n_alive(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Bunch {
    coords: [Vec<f64>; Channel::COUNT],
    n_lost: usize,
    beam: BeamParams,
}

impl Bunch {
    /// Create a bunch from six index-aligned coordinate arrays, ordered
    /// as [`Channel::ALL`]. Every particle starts alive.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Configuration`] if the arrays differ in length.
    pub fn from_channels(
        coords: [Vec<f64>; Channel::COUNT],
        beam: BeamParams,
    ) -> Result<Self, SliceError> {
        let n = coords[0].len();
        if let Some(ch) = Channel::ALL.iter().find(|ch| coords[ch.index()].len() != n) {
            return Err(SliceError::configuration(format!(
                "channel {ch} has {} particles, expected {n}",
                coords[ch.index()].len()
            )));
        }
        Ok(Self {
            coords,
            n_lost: 0,
            beam,
        })
    }

    /// Create a bunch with only longitudinal positions; every other
    /// channel is zero.
    pub fn longitudinal(dz: Vec<f64>, beam: BeamParams) -> Self {
        let n = dz.len();
        let mut coords: [Vec<f64>; Channel::COUNT] = Default::default();
        for ch in Channel::ALL {
            coords[ch.index()] = if ch == Channel::Dz {
                dz.clone()
            } else {
                vec![0.0; n]
            };
        }
        Self {
            coords,
            n_lost: 0,
            beam,
        }
    }

    /// Mutable access to a channel, e.g. for a tracker applying kicks.
    ///
    /// Writing `Dz` invalidates the sort order; the slicing engine re-sorts
    /// before every partition.
    pub fn channel_mut(&mut self, channel: Channel) -> &mut [f64] {
        &mut self.coords[channel.index()]
    }

    /// Mark every alive particle for which `pred` returns `true` as lost.
    ///
    /// The predicate sees one particle's coordinates indexed by
    /// [`Channel::index`]. Survivors keep their relative order at the
    /// front; newly lost particles are placed directly after them, ahead
    /// of previously lost ones. Returns the number of newly lost particles.
    pub fn lose_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&[f64; Channel::COUNT]) -> bool,
    {
        let n_alive = self.n_alive();
        let mut survivors = Vec::with_capacity(n_alive);
        let mut casualties = Vec::new();
        for i in 0..n_alive {
            let particle = self.particle(i);
            if pred(&particle) {
                casualties.push(i);
            } else {
                survivors.push(i);
            }
        }
        if casualties.is_empty() {
            return 0;
        }

        let newly_lost = casualties.len();
        survivors.extend(casualties);
        self.permute_prefix(&survivors);
        self.n_lost += newly_lost;
        debug!(newly_lost, n_lost = self.n_lost, "macro-particles lost");
        newly_lost
    }

    /// Coordinates of particle `i`, indexed by [`Channel::index`].
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_macroparticles()`.
    pub fn particle(&self, i: usize) -> [f64; Channel::COUNT] {
        let mut out = [0.0; Channel::COUNT];
        for ch in Channel::ALL {
            out[ch.index()] = self.coords[ch.index()][i];
        }
        out
    }

    /// Reorder the first `order.len()` particles of every channel so that
    /// new position `k` holds old particle `order[k]`.
    fn permute_prefix(&mut self, order: &[usize]) {
        let mut scratch = Vec::with_capacity(order.len());
        for values in self.coords.iter_mut() {
            scratch.clear();
            scratch.extend(order.iter().map(|&i| values[i]));
            values[..order.len()].copy_from_slice(&scratch);
        }
    }

    fn is_sorted(&self) -> bool {
        self.alive(Channel::Dz)
            .windows(2)
            .all(|w| w[0].total_cmp(&w[1]).is_le())
    }
}

impl ParticleLedger for Bunch {
    fn n_macroparticles(&self) -> usize {
        self.coords[0].len()
    }

    fn n_lost(&self) -> usize {
        self.n_lost
    }

    fn coords(&self, channel: Channel) -> &[f64] {
        &self.coords[channel.index()]
    }

    fn sort_particles(&mut self) {
        if self.is_sorted() {
            return;
        }
        let dz = self.alive(Channel::Dz);
        let mut order: Vec<usize> = (0..dz.len()).collect();
        order.sort_by(|&a, &b| dz[a].total_cmp(&dz[b]));
        self.permute_prefix(&order);
        trace!(n_alive = order.len(), "macro-particles sorted by dz");
    }

    fn beam(&self) -> &BeamParams {
        &self.beam
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamslice_core::physics::M_P;

    fn beam() -> BeamParams {
        BeamParams::from_gamma(M_P, 10.0).unwrap()
    }

    fn tagged(dz: &[f64]) -> Bunch {
        // x carries the starting index so permutations can be traced.
        let n = dz.len();
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let xp: Vec<f64> = (0..n).map(|i| 10.0 * i as f64).collect();
        Bunch::from_channels(
            [x, xp, vec![0.0; n], vec![0.0; n], dz.to_vec(), vec![0.0; n]],
            beam(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = Bunch::from_channels(
            [
                vec![0.0; 3],
                vec![0.0; 3],
                vec![0.0; 3],
                vec![0.0; 2],
                vec![0.0; 3],
                vec![0.0; 3],
            ],
            beam(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("yp"), "{err}");
    }

    #[test]
    fn sort_keeps_channels_aligned() {
        let mut b = tagged(&[0.5, -0.5, 0.0]);
        b.sort_particles();
        assert_eq!(b.alive(Channel::Dz), &[-0.5, 0.0, 0.5]);
        assert_eq!(b.alive(Channel::X), &[1.0, 2.0, 0.0]);
        assert_eq!(b.alive(Channel::Xp), &[10.0, 20.0, 0.0]);
    }

    #[test]
    fn sort_is_stable_for_equal_coordinates() {
        let mut b = tagged(&[1.0, 0.0, 1.0, 0.0]);
        b.sort_particles();
        assert_eq!(b.alive(Channel::X), &[1.0, 3.0, 0.0, 2.0]);
    }

    #[test]
    fn lose_where_moves_lost_to_tail() {
        let mut b = tagged(&[0.1, 0.9, 0.2, 0.8]);
        let lost = b.lose_where(|p| p[Channel::Dz.index()] > 0.5);
        assert_eq!(lost, 2);
        assert_eq!(b.n_alive(), 2);
        assert_eq!(b.n_lost(), 2);
        assert_eq!(b.alive(Channel::X), &[0.0, 2.0]);
        assert_eq!(b.coords(Channel::X), &[0.0, 2.0, 1.0, 3.0]);
    }

    #[test]
    fn sort_leaves_lost_particles_untouched() {
        let mut b = tagged(&[0.3, 5.0, 0.1, 0.2]);
        b.lose_where(|p| p[Channel::Dz.index()] > 1.0);
        b.sort_particles();
        assert_eq!(b.coords(Channel::Dz), &[0.1, 0.2, 0.3, 5.0]);
        assert_eq!(b.coords(Channel::X), &[2.0, 3.0, 0.0, 1.0]);
    }

    #[test]
    fn repeated_losses_accumulate() {
        let mut b = tagged(&[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(b.lose_where(|p| p[Channel::Dz.index()] >= 3.0), 1);
        assert_eq!(b.lose_where(|p| p[Channel::Dz.index()] >= 3.0), 0);
        assert_eq!(b.lose_where(|p| p[Channel::Dz.index()] >= 2.0), 1);
        assert_eq!(b.n_lost(), 2);
        // Newly lost sit ahead of previously lost.
        assert_eq!(b.coords(Channel::Dz), &[0.0, 1.0, 2.0, 3.0]);
    }
}
