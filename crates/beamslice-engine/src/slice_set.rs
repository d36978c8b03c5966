//! The slice set: per-turn partition and statistics of a particle ledger.
//!
//! # Lifecycle
//!
//! A [`SliceSet`] is built once per simulation and driven once per turn:
//! [`update`](SliceSet::update) sorts the ledger and partitions it,
//! [`compute_statistics`](SliceSet::compute_statistics) fills the moments.
//! Results are only readable in states where they are current; anything
//! else is a [`SliceError::State`]. Moments are never served stale.
//!
//! An update that fails leaves every field exactly as the last successful
//! update left it.

use std::ops::Range;

use beamslice_core::{Channel, ParticleLedger, SliceError, SliceState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::config::{SliceConfig, SliceMode, WindowPolicy};
use crate::partition::{self, Partition};
use crate::stats::{self, SliceMoments};
use crate::window::{self, Window};

/// Longitudinal slices of a beam and their per-slice moments.
///
/// # Examples
///
/// ```
/// use beamslice_core::physics::M_P;
/// use beamslice_core::BeamParams;
/// use beamslice_engine::{SliceConfig, SliceMode, SliceSet, WindowPolicy};
/// use beamslice_ledger::Bunch;
///
/// let beam = BeamParams::from_gamma(M_P, 27.7).unwrap();
/// let dz: Vec<f64> = (0..100).map(|i| -1.0 + 0.02 * i as f64 + 0.01).collect();
/// let mut bunch = Bunch::longitudinal(dz, beam);
///
/// let config = SliceConfig::new(4, SliceMode::ConstantSpace)
///     .with_window(WindowPolicy::Fixed { tail: -1.0, head: 1.0 });
/// let mut slices = SliceSet::new(config).unwrap();
///
/// slices.update(&mut bunch).unwrap();
/// assert_eq!(slices.counts().unwrap(), &[25, 25, 25, 25]);
///
/// let moments = slices.compute_statistics(&bunch).unwrap();
/// assert_eq!(moments.n_slices(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct SliceSet {
    config: SliceConfig,
    state: SliceState,
    boundaries: Vec<f64>,
    centers: Vec<f64>,
    window: Option<Window>,
    partition: Option<Partition>,
    moments: Option<SliceMoments>,
    rng: ChaCha8Rng,
    turn: u64,
}

impl SliceSet {
    /// Create a slice set, seeding its remainder RNG from `config.seed`.
    ///
    /// With a [`WindowPolicy::Fixed`] window the equal-width boundaries are
    /// valid immediately, before the first update.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Configuration`] if `config` fails validation.
    pub fn new(config: SliceConfig) -> Result<Self, SliceError> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self::with_rng(config, rng)
    }

    /// Create a slice set drawing remainder assignments from `rng`.
    pub fn with_rng(config: SliceConfig, rng: ChaCha8Rng) -> Result<Self, SliceError> {
        config.validate()?;
        let (boundaries, window) = match config.window {
            WindowPolicy::Fixed { tail, head } => (
                partition::linspace(tail, head, config.n_slices),
                Some(Window { tail, head }),
            ),
            WindowPolicy::Dynamic { .. } => (Vec::new(), None),
        };
        let centers = partition::centers(&boundaries);
        Ok(Self {
            config,
            state: SliceState::Uninitialized,
            boundaries,
            centers,
            window,
            partition: None,
            moments: None,
            rng,
            turn: 0,
        })
    }

    /// The configuration this set was built with.
    pub fn config(&self) -> &SliceConfig {
        &self.config
    }

    /// Number of slices.
    pub fn n_slices(&self) -> usize {
        self.config.n_slices
    }

    /// Slicing mode.
    pub fn mode(&self) -> SliceMode {
        self.config.mode
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SliceState {
        self.state
    }

    /// Number of successful updates so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    // ── Transitions ────────────────────────────────────────────

    /// Sort `ledger` and partition its alive particles.
    ///
    /// Moves the set to [`SliceState::Partitioned`] and discards the
    /// previous turn's moments.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::DegenerateInput`] if an alive coordinate is
    /// not finite, or if a dynamic window is requested with no alive
    /// particles. The set is left untouched in that case.
    pub fn update<L>(&mut self, ledger: &mut L) -> Result<&Partition, SliceError>
    where
        L: ParticleLedger + ?Sized,
    {
        ledger.sort_particles();
        let dz = ledger.alive(Channel::Dz);

        let window = window::check_finite(dz)
            .and_then(|()| window::resolve_window(&self.config.window, dz))
            .inspect_err(|e| warn!(turn = self.turn, error = %e, "slice update rejected"))?;
        trace!(tail = window.tail, head = window.head, "slicing window resolved");

        let n_slices = self.config.n_slices;
        let partition = match self.config.mode {
            SliceMode::ConstantSpace => partition::constant_space(dz, window, n_slices),
            SliceMode::ConstantCharge => {
                partition::constant_charge(dz, window, n_slices, &mut self.rng)
            }
        };

        debug!(
            turn = self.turn,
            mode = %self.config.mode,
            n_alive = dz.len(),
            cut_tail = partition.cut_tail(),
            cut_head = partition.cut_head(),
            tail = window.tail,
            head = window.head,
            "slices updated"
        );

        self.boundaries = partition.boundaries().to_vec();
        self.centers = partition.centers();
        self.window = Some(window);
        self.moments = None;
        self.state = SliceState::Partitioned;
        self.turn += 1;
        Ok(self.partition.insert(partition))
    }

    /// Compute per-slice moments of `ledger` over the current partition.
    ///
    /// `ledger` must be the population passed to the last
    /// [`update`](Self::update), unchanged since.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::State`] before the first update, and
    /// [`SliceError::LedgerMismatch`] if the ledger's alive count differs
    /// from the partitioned one.
    pub fn compute_statistics<L>(&mut self, ledger: &L) -> Result<&SliceMoments, SliceError>
    where
        L: ParticleLedger + ?Sized,
    {
        let partition = self.require_partition("compute statistics")?;
        let expected = partition.n_alive();
        if ledger.n_alive() != expected {
            return Err(SliceError::LedgerMismatch {
                expected,
                actual: ledger.n_alive(),
            });
        }
        let moments = stats::compute_moments(ledger, &partition.slice_ranges())?;
        trace!(turn = self.turn, "slice statistics computed");
        self.state = SliceState::StatisticsComputed;
        Ok(self.moments.insert(moments))
    }

    /// One full turn: [`update`](Self::update) then
    /// [`compute_statistics`](Self::compute_statistics).
    pub fn slice_turn<L>(&mut self, ledger: &mut L) -> Result<&SliceMoments, SliceError>
    where
        L: ParticleLedger + ?Sized,
    {
        self.update(ledger)?;
        self.compute_statistics(ledger)
    }

    // ── Results ────────────────────────────────────────────────

    /// The `n_slices + 1` slice boundaries.
    ///
    /// Available after construction with a fixed window, otherwise after
    /// the first update.
    pub fn boundaries(&self) -> Result<&[f64], SliceError> {
        self.require_boundaries("read boundaries")?;
        Ok(&self.boundaries)
    }

    /// The `n_slices` slice centres.
    pub fn centers(&self) -> Result<&[f64], SliceError> {
        self.require_boundaries("read centers")?;
        Ok(&self.centers)
    }

    /// The window used by the last update, or the fixed window.
    pub fn window(&self) -> Result<Window, SliceError> {
        self.window.ok_or(SliceError::State {
            operation: "read window",
            actual: self.state,
        })
    }

    /// The full partition from the last update.
    pub fn partition(&self) -> Result<&Partition, SliceError> {
        self.require_partition("read partition")
    }

    /// Particle count per slice.
    pub fn counts(&self) -> Result<&[usize], SliceError> {
        Ok(self.require_partition("read counts")?.counts())
    }

    /// Alive particles below the window.
    pub fn cut_tail(&self) -> Result<usize, SliceError> {
        Ok(self.require_partition("read cut_tail")?.cut_tail())
    }

    /// Alive particles above the window.
    pub fn cut_head(&self) -> Result<usize, SliceError> {
        Ok(self.require_partition("read cut_head")?.cut_head())
    }

    /// Index range of each slice into the sorted alive particles.
    pub fn slice_ranges(&self) -> Result<Vec<Range<usize>>, SliceError> {
        Ok(self.require_partition("read slice ranges")?.slice_ranges())
    }

    /// Moments from the last statistics pass.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::State`] unless statistics were computed after
    /// the most recent update.
    pub fn moments(&self) -> Result<&SliceMoments, SliceError> {
        match (&self.moments, self.state) {
            (Some(m), SliceState::StatisticsComputed) => Ok(m),
            _ => Err(SliceError::State {
                operation: "read moments",
                actual: self.state,
            }),
        }
    }

    fn require_partition(&self, operation: &'static str) -> Result<&Partition, SliceError> {
        self.partition.as_ref().ok_or(SliceError::State {
            operation,
            actual: self.state,
        })
    }

    fn require_boundaries(&self, operation: &'static str) -> Result<(), SliceError> {
        if self.boundaries.is_empty() {
            return Err(SliceError::State {
                operation,
                actual: self.state,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamslice_test_utils::{constant_bunch, evenly_spaced_bunch, gaussian_bunch};

    fn fixed(n_slices: usize, mode: SliceMode, tail: f64, head: f64) -> SliceConfig {
        SliceConfig::new(n_slices, mode).with_window(WindowPolicy::Fixed { tail, head })
    }

    fn assert_state_error<T: std::fmt::Debug>(r: Result<T, SliceError>) {
        match r {
            Err(SliceError::State { .. }) => {}
            other => panic!("expected State error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_config_fails_construction() {
        let err = SliceSet::new(SliceConfig::new(0, SliceMode::ConstantSpace)).unwrap_err();
        assert!(matches!(err, SliceError::Configuration { .. }));
    }

    #[test]
    fn fixed_window_seeds_boundaries_before_update() {
        let s = SliceSet::new(fixed(4, SliceMode::ConstantSpace, 0.0, 1.0)).unwrap();
        assert_eq!(s.state(), SliceState::Uninitialized);
        assert_eq!(s.boundaries().unwrap(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(s.centers().unwrap(), &[0.125, 0.375, 0.625, 0.875]);
        assert_state_error(s.counts());
        assert_state_error(s.moments());
    }

    #[test]
    fn dynamic_window_has_no_results_before_update() {
        let s = SliceSet::new(SliceConfig::new(4, SliceMode::ConstantSpace)).unwrap();
        assert_state_error(s.boundaries());
        assert_state_error(s.centers());
        assert_state_error(s.window());
        assert_state_error(s.cut_tail());
        assert_state_error(s.partition());
    }

    #[test]
    fn statistics_before_update_is_a_state_error() {
        let bunch = evenly_spaced_bunch(10, 0.0, 1.0);
        let mut s = SliceSet::new(SliceConfig::new(2, SliceMode::ConstantSpace)).unwrap();
        assert_state_error(s.compute_statistics(&bunch));
        assert_eq!(s.state(), SliceState::Uninitialized);
    }

    #[test]
    fn state_machine_walks_through_a_turn() {
        let mut bunch = gaussian_bunch(500, 0.3, 5);
        let mut s = SliceSet::new(SliceConfig::new(8, SliceMode::ConstantSpace)).unwrap();

        s.update(&mut bunch).unwrap();
        assert_eq!(s.state(), SliceState::Partitioned);
        assert_state_error(s.moments());

        s.compute_statistics(&bunch).unwrap();
        assert_eq!(s.state(), SliceState::StatisticsComputed);
        assert!(s.moments().is_ok());

        // Next turn invalidates moments until recomputed.
        s.update(&mut bunch).unwrap();
        assert_eq!(s.state(), SliceState::Partitioned);
        assert_state_error(s.moments());
        assert_eq!(s.turn(), 2);
    }

    #[test]
    fn full_extent_window_cuts_nothing() {
        let mut bunch = gaussian_bunch(1_000, 0.3, 9);
        let mut s = SliceSet::new(SliceConfig::new(16, SliceMode::ConstantSpace)).unwrap();
        s.update(&mut bunch).unwrap();
        assert_eq!(s.cut_tail().unwrap(), 0);
        assert_eq!(s.cut_head().unwrap(), 0);
        assert_eq!(s.counts().unwrap().iter().sum::<usize>(), 1_000);
    }

    #[test]
    fn degenerate_update_keeps_previous_turn() {
        let mut bunch = gaussian_bunch(200, 0.3, 1);
        let mut s = SliceSet::new(SliceConfig::new(5, SliceMode::ConstantCharge)).unwrap();
        s.slice_turn(&mut bunch).unwrap();
        let before_bounds = s.boundaries().unwrap().to_vec();
        let before_counts = s.counts().unwrap().to_vec();
        let before_moments = s.moments().unwrap().clone();

        bunch.lose_where(|_| true);
        let err = s.update(&mut bunch).unwrap_err();
        assert!(matches!(err, SliceError::DegenerateInput { .. }));

        assert_eq!(s.state(), SliceState::StatisticsComputed);
        assert_eq!(s.boundaries().unwrap(), before_bounds.as_slice());
        assert_eq!(s.counts().unwrap(), before_counts.as_slice());
        assert_eq!(s.moments().unwrap(), &before_moments);
        assert_eq!(s.turn(), 1);
    }

    #[test]
    fn non_finite_coordinate_is_degenerate() {
        let mut bunch = evenly_spaced_bunch(10, 0.0, 1.0);
        bunch.channel_mut(Channel::Dz)[3] = f64::NAN;
        let mut s = SliceSet::new(fixed(2, SliceMode::ConstantSpace, 0.0, 1.0)).unwrap();
        let err = s.update(&mut bunch).unwrap_err();
        assert!(matches!(err, SliceError::DegenerateInput { .. }));
        assert_eq!(s.state(), SliceState::Uninitialized);
    }

    #[test]
    fn fixed_window_with_no_alive_particles_is_valid() {
        let mut bunch = evenly_spaced_bunch(10, 0.0, 1.0);
        bunch.lose_where(|_| true);
        let mut s = SliceSet::new(fixed(3, SliceMode::ConstantCharge, 0.0, 1.0)).unwrap();
        s.slice_turn(&mut bunch).unwrap();
        assert_eq!(s.counts().unwrap(), &[0, 0, 0]);
        assert!(s.moments().unwrap().epsn_z().iter().all(|&e| e == 0.0));
    }

    #[test]
    fn statistics_reject_a_different_population() {
        let mut bunch = gaussian_bunch(300, 0.3, 2);
        let mut s = SliceSet::new(SliceConfig::new(4, SliceMode::ConstantSpace)).unwrap();
        s.update(&mut bunch).unwrap();
        bunch.lose_where(|p| p[Channel::Dz.index()] > 0.0);
        let err = s.compute_statistics(&bunch).unwrap_err();
        assert!(err.is_state_error());
        assert_eq!(s.state(), SliceState::Partitioned);
    }

    #[test]
    fn statistics_may_be_recomputed_on_same_partition() {
        let mut bunch = gaussian_bunch(300, 0.3, 4);
        let mut s = SliceSet::new(SliceConfig::new(4, SliceMode::ConstantSpace)).unwrap();
        s.update(&mut bunch).unwrap();
        let first = s.compute_statistics(&bunch).unwrap().clone();
        let second = s.compute_statistics(&bunch).unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn constant_bunch_collapses_into_last_slice() {
        // Full-extent window of identical coordinates: tail == head.
        let mut bunch = constant_bunch(50, 0.25);
        let mut s = SliceSet::new(SliceConfig::new(4, SliceMode::ConstantSpace)).unwrap();
        s.slice_turn(&mut bunch).unwrap();
        assert_eq!(s.counts().unwrap(), &[0, 0, 0, 50]);
        assert_eq!(s.boundaries().unwrap(), &[0.25; 5]);
        let m = s.moments().unwrap();
        assert_eq!(m.sigma(Channel::Dz)[3], 0.0);
        assert_eq!(m.mean(Channel::Dz)[3], 0.25);
    }

    #[test]
    fn slice_set_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SliceSet>();
    }
}
