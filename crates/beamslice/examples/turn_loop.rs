//! A tracking-style turn loop driving two slice sets.
//!
//! Demonstrates:
//!   1. Building a Gaussian bunch
//!   2. Slicing it each turn in constant-space and constant-charge modes
//!   3. Losing particles at an aperture between turns
//!   4. Reading per-slice moments and handling degenerate turns
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example turn_loop

use beamslice::prelude::*;
use beamslice_test_utils::gaussian_bunch;
use tracing_subscriber::EnvFilter;

// ─── Parameters ─────────────────────────────────────────────────

const PARTICLES: usize = 50_000;
const SIGMA_Z: f64 = 0.3;
const TURNS: usize = 5;
const APERTURE: f64 = 0.9;

fn main() -> Result<(), SliceError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut bunch = gaussian_bunch(PARTICLES, SIGMA_Z, 2024);

    let mut space = SliceSet::new(
        SliceConfig::new(20, SliceMode::ConstantSpace)
            .with_window(WindowPolicy::Dynamic { n_sigma_z: Some(3.0) }),
    )?;
    let mut charge = SliceSet::new(SliceConfig::new(10, SliceMode::ConstantCharge).with_seed(7))?;

    for turn in 0..TURNS {
        // Shrink the aperture a little every turn.
        let limit = APERTURE * (1.0 - 0.05 * turn as f64);
        let lost = bunch.lose_where(|p| p[Channel::Dz.index()].abs() > limit);

        match space.slice_turn(&mut bunch) {
            Ok(_) => {}
            Err(e @ SliceError::DegenerateInput { .. }) => {
                println!("turn {turn}: skipped ({e})");
                continue;
            }
            Err(e) => return Err(e),
        }
        let peak = space
            .moments()?
            .mean(Channel::Dz)
            .iter()
            .zip(space.counts()?)
            .max_by_key(|&(_, &count)| count)
            .map(|(&z, _)| z)
            .unwrap_or_default();
        println!(
            "turn {turn}: alive={} lost={lost} cut=({}, {}) peak slice at dz={peak:+.3}",
            bunch.n_alive(),
            space.cut_tail()?,
            space.cut_head()?,
        );

        charge.slice_turn(&mut bunch)?;
        let mean_epsn_z =
            charge.moments()?.epsn_z().iter().sum::<f64>() / charge.n_slices() as f64;
        let widths: Vec<String> = charge
            .boundaries()?
            .windows(2)
            .map(|w| format!("{:.3}", w[1] - w[0]))
            .collect();
        println!(
            "          constant-charge widths [{}], mean epsn_z {:.3e} eVs",
            widths.join(" "),
            mean_epsn_z,
        );
    }

    Ok(())
}
