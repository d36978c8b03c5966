//! Resolution of the slicing window `[tail, head]` for one update.

use beamslice_core::SliceError;

use crate::config::WindowPolicy;
use crate::stats::Welford;

/// The longitudinal window partitioned by one update.
///
/// Alive particles below `tail` are cut at the tail, those above `head`
/// are cut at the head. A particle at exactly `head` is inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    /// Lower cut point.
    pub tail: f64,
    /// Upper cut point, inclusive.
    pub head: f64,
}

impl Window {
    /// Width of the window.
    pub fn width(&self) -> f64 {
        self.head - self.tail
    }
}

/// Resolve the window for `dz`, the ascending alive longitudinal
/// coordinates.
///
/// # Errors
///
/// Returns [`SliceError::DegenerateInput`] if a dynamic window is
/// requested with no alive particles.
pub fn resolve_window(policy: &WindowPolicy, dz: &[f64]) -> Result<Window, SliceError> {
    match *policy {
        WindowPolicy::Fixed { tail, head } => Ok(Window { tail, head }),
        WindowPolicy::Dynamic { n_sigma_z } => {
            let (Some(&first), Some(&last)) = (dz.first(), dz.last()) else {
                return Err(SliceError::degenerate(
                    "no alive particles to derive a dynamic window from",
                ));
            };
            match n_sigma_z {
                None => Ok(Window {
                    tail: first,
                    head: last,
                }),
                Some(k) => {
                    let mut acc = Welford::new();
                    dz.iter().for_each(|&z| acc.update(z));
                    let (mean, sigma) = (acc.mean(), acc.std_dev());
                    Ok(Window {
                        tail: mean - k * sigma,
                        head: mean + k * sigma,
                    })
                }
            }
        }
    }
}

/// Reject populations whose alive coordinates cannot be ordered.
pub(crate) fn check_finite(dz: &[f64]) -> Result<(), SliceError> {
    match dz.iter().position(|z| !z.is_finite()) {
        Some(i) => Err(SliceError::degenerate(format!(
            "alive particle {i} has non-finite dz {}",
            dz[i]
        ))),
        None => Ok(()),
    }
}
