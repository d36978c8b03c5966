//! Slice-set configuration and validation.
//!
//! [`SliceConfig`] is fixed for the lifetime of a
//! [`SliceSet`](crate::SliceSet). [`validate()`](SliceConfig::validate)
//! checks it once at construction; configuration errors are never retried.

use std::fmt;

use beamslice_core::SliceError;

// ── SliceMode ─────────────────────────────────────────────────────

/// How the slicing window is divided into slices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SliceMode {
    /// Equal-width slices; particle counts vary.
    ConstantSpace,
    /// Equal particle counts (within one); slice widths vary.
    ConstantCharge,
}

impl fmt::Display for SliceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstantSpace => write!(f, "constant_space"),
            Self::ConstantCharge => write!(f, "constant_charge"),
        }
    }
}

// ── WindowPolicy ──────────────────────────────────────────────────

/// Where the slicing window `[tail, head]` comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowPolicy {
    /// Cut points fixed at construction. Boundaries are valid immediately.
    Fixed {
        /// Lower cut point.
        tail: f64,
        /// Upper cut point.
        head: f64,
    },
    /// Cut points recomputed from the alive population on every update.
    ///
    /// With `n_sigma_z: None` the window spans the extreme alive
    /// coordinates; with `Some(k)` it is `mean ± k·σ`.
    Dynamic {
        /// Half-width of the window in rms bunch lengths.
        n_sigma_z: Option<f64>,
    },
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::Dynamic { n_sigma_z: None }
    }
}

// ── SliceConfig ───────────────────────────────────────────────────

/// Construction-time parameters of a slice set.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceConfig {
    /// Number of slices. Must be at least 1.
    pub n_slices: usize,
    /// Slicing mode.
    pub mode: SliceMode,
    /// Window policy. Default: dynamic over the full alive extent.
    pub window: WindowPolicy,
    /// Seed for the remainder distribution in
    /// [`SliceMode::ConstantCharge`]. Default: 0.
    pub seed: u64,
}

impl SliceConfig {
    /// A config with a dynamic full-extent window and seed 0.
    pub fn new(n_slices: usize, mode: SliceMode) -> Self {
        Self {
            n_slices,
            mode,
            window: WindowPolicy::default(),
            seed: 0,
        }
    }

    /// Replace the window policy.
    pub fn with_window(mut self, window: WindowPolicy) -> Self {
        self.window = window;
        self
    }

    /// Replace the remainder-distribution seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build a config from the flat option surface: an optional
    /// `n_sigma_z` and optional fixed cut points.
    ///
    /// Supplying both cut points selects [`WindowPolicy::Fixed`];
    /// supplying neither selects [`WindowPolicy::Dynamic`].
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Configuration`] if only one cut point is given,
    /// if cut points and `n_sigma_z` are both given, or if the resulting
    /// config fails [`validate()`](Self::validate).
    pub fn from_options(
        n_slices: usize,
        mode: SliceMode,
        n_sigma_z: Option<f64>,
        fixed_tail: Option<f64>,
        fixed_head: Option<f64>,
    ) -> Result<Self, SliceError> {
        let window = match (fixed_tail, fixed_head, n_sigma_z) {
            (Some(tail), Some(head), None) => WindowPolicy::Fixed { tail, head },
            (Some(_), Some(_), Some(_)) => {
                return Err(SliceError::configuration(
                    "fixed cut points and n_sigma_z are mutually exclusive",
                ))
            }
            (None, None, n_sigma_z) => WindowPolicy::Dynamic { n_sigma_z },
            _ => {
                return Err(SliceError::configuration(
                    "fixed_tail and fixed_head must be supplied together",
                ))
            }
        };
        let config = Self::new(n_slices, mode).with_window(window);
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`SliceError::Configuration`] if `n_slices == 0`, fixed cut
    /// points are non-finite or not strictly ordered, or `n_sigma_z` is not
    /// finite and positive.
    pub fn validate(&self) -> Result<(), SliceError> {
        if self.n_slices < 1 {
            return Err(SliceError::configuration("n_slices must be at least 1"));
        }
        match self.window {
            WindowPolicy::Fixed { tail, head } => {
                if !tail.is_finite() || !head.is_finite() {
                    return Err(SliceError::configuration(format!(
                        "cut points must be finite, got tail={tail} head={head}"
                    )));
                }
                if tail >= head {
                    return Err(SliceError::configuration(format!(
                        "tail cut {tail} must be below head cut {head}"
                    )));
                }
            }
            WindowPolicy::Dynamic {
                n_sigma_z: Some(k),
            } => {
                if !k.is_finite() || k <= 0.0 {
                    return Err(SliceError::configuration(format!(
                        "n_sigma_z must be finite and > 0, got {k}"
                    )));
                }
            }
            WindowPolicy::Dynamic { n_sigma_z: None } => {}
        }
        Ok(())
    }
}
