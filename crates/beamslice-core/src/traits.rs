//! The read/sort seam between a particle population and the engine.

use crate::channel::Channel;
use crate::physics::BeamParams;

/// A macro-particle population the slicing engine can partition.
///
/// All six coordinate arrays are index-aligned and have length
/// [`n_macroparticles`](ParticleLedger::n_macroparticles). Alive particles
/// occupy the prefix `[0, n_alive)`; lost particles are kept after them.
/// After [`sort_particles`](ParticleLedger::sort_particles) the alive prefix
/// of the [`Channel::Dz`] array is ascending.
pub trait ParticleLedger {
    /// Total number of stored macro-particles, alive or lost.
    fn n_macroparticles(&self) -> usize;

    /// Number of lost macro-particles stored at the tail of the arrays.
    fn n_lost(&self) -> usize;

    /// Number of alive macro-particles.
    fn n_alive(&self) -> usize {
        self.n_macroparticles() - self.n_lost()
    }

    /// The full coordinate array for a channel.
    fn coords(&self, channel: Channel) -> &[f64];

    /// The alive prefix of a channel's coordinate array.
    fn alive(&self, channel: Channel) -> &[f64] {
        &self.coords(channel)[..self.n_alive()]
    }

    /// Sort the alive particles ascending by longitudinal coordinate,
    /// permuting every channel together.
    fn sort_particles(&mut self);

    /// Relativistic parameters of the beam this population belongs to.
    fn beam(&self) -> &BeamParams;
}
