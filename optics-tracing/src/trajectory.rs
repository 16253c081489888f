//! Helpers around traced trajectories
//!
//! Units follow the tracer: lengths in mm, times in ns, energies in eV.

use ndarray::{Array1, ArrayView2};

use crate::error::{Result, TracingError};
use crate::ray::direction_scale;

/// Speed of an electron with 1 eV kinetic energy, in mm/ns
///
/// Non-relativistic: `sqrt(2 e / m_e)`. Speed scales with the square root of the energy.
pub const ELECTRON_SPEED_PER_SQRT_EV: f64 = 0.5930969604919433;

/// Energy above which the non-relativistic speed is off by more than a few percent
const RELATIVISTIC_WARNING_EV: f64 = 40_000.0;

/// Velocity of an electron with kinetic energy `energy_ev` moving along `direction`
///
/// `direction` may have any number of components (2 for meridian-plane tracing, 3 for
/// full 3D) and need not be normalized.
pub fn velocity_vec(energy_ev: f64, direction: &[f64]) -> Result<Array1<f64>> {
    if !(energy_ev.is_finite() && energy_ev > 0.0) {
        return Err(TracingError::InvalidEnergy { energy_ev });
    }
    if energy_ev > RELATIVISTIC_WARNING_EV {
        log::warn!(
            "{} eV is beyond the non-relativistic range, velocity will be overestimated",
            energy_ev
        );
    }

    let scale = direction_scale(direction, 0)?;
    let norm = direction.iter().map(|v| (v / scale).powi(2)).sum::<f64>().sqrt();

    let speed = ELECTRON_SPEED_PER_SQRT_EV * energy_ev.sqrt();
    Ok(direction.iter().map(|v| speed * (v / scale) / norm).collect())
}

/// 3D velocity from energy and spherical angles
///
/// `theta` is measured from the optical (z) axis and `phi` from the x axis, so the
/// direction is `(sinθ cosφ, sinθ sinφ, cosθ)`.
pub fn velocity_vec_spherical(energy_ev: f64, theta: f64, phi: f64) -> Result<Array1<f64>> {
    velocity_vec(
        energy_ev,
        &[theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos()],
    )
}

/// Axial coordinate where a trajectory crosses the optical axis
///
/// `positions` holds one sample per row. Column 0 is the radial (x) coordinate; the axial
/// coordinate is column 1 for rows of width 2 or 4 (meridian tracing, optionally followed
/// by velocities) and column 2 for rows of width 3 or 6.
///
/// The crossing is taken just before the first sample that lies strictly on the same side
/// of the axis as the final sample, and the axial coordinate is linearly interpolated to
/// `x = 0`. Returns `Ok(None)` if the trajectory never crosses.
pub fn axis_intersection(positions: ArrayView2<'_, f64>) -> Result<Option<f64>> {
    let z_col = match positions.ncols() {
        2 | 4 => 1,
        3 | 6 => 2,
        len => {
            return Err(TracingError::InvalidStateLength {
                len,
                expected: "2, 3, 4 or 6",
            });
        }
    };

    let n = positions.nrows();
    if n == 0 {
        return Ok(None);
    }

    let final_side_negative = positions[[n - 1, 0]] <= 0.0;
    let on_final_side = |x: f64| if final_side_negative { x < 0.0 } else { x > 0.0 };

    let Some(idx) = (0..n).find(|&i| on_final_side(positions[[i, 0]])) else {
        return Ok(None);
    };
    if idx == 0 {
        return Ok(None);
    }

    let (x1, z1) = (positions[[idx - 1, 0]], positions[[idx - 1, z_col]]);
    let (x2, z2) = (positions[[idx, 0]], positions[[idx, z_col]]);
    Ok(Some(z1 + (z2 - z1) * x1 / (x1 - x2)))
}
