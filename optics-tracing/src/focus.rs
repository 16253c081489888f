//! Multi-ray focal-point estimation
//!
//! The focus of a set of rays is the point `X` minimizing the summed squared perpendicular
//! distance to every ray line. With `M_i = I - d_i d_iᵀ / (d_i·d_i)` the projector onto the
//! complement of ray `i`'s direction and `a_i` its anchor, the minimizer solves the normal
//! equation
//!
//! ```text
//! (Σ M_i) X = Σ M_i a_i
//! ```
//!
//! [`focus_position`] solves it in the meridian plane, dropping the transverse `y`
//! component of every ray, which is exact for axially symmetric beams sampled in `y = 0`.
//! [`focus_position_3d`] solves the same problem in three dimensions for beams without that
//! symmetry.
//!
//! The system is singular exactly when all directions are parallel. Singularity is judged
//! by the LU pivots relative to the largest entry of `Σ M_i`, with
//! [`FocusConfig::singular_tolerance`] as threshold, so the test does not depend on the
//! number of rays or the length of their direction vectors.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use electron_optics_solvers::direct::lu_solve_with_tolerance;
use electron_optics_solvers::{DEFAULT_PIVOT_TOLERANCE, parallel_map};

use crate::error::{Result, TracingError};
use crate::ray::{Ray, check_anchor, unit_max_direction};

/// Focal-point estimator settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Relative pivot threshold below which the ray set is reported as degenerate
    #[serde(default = "default_singular_tolerance")]
    pub singular_tolerance: f64,
}

fn default_singular_tolerance() -> f64 {
    DEFAULT_PIVOT_TOLERANCE
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            singular_tolerance: default_singular_tolerance(),
        }
    }
}

/// Focus in the meridian plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusPoint {
    /// Radial coordinate
    pub x: f64,
    /// Axial coordinate
    pub z: f64,
}

/// Focus in three dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusPoint3 {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate (optical axis)
    pub z: f64,
}

/// Least-squares crossing point of `rays` in the meridian plane
pub fn focus_position(rays: &[Ray]) -> Result<FocusPoint> {
    focus_position_with(rays, &FocusConfig::default())
}

/// [`focus_position`] with explicit settings
pub fn focus_position_with(rays: &[Ray], config: &FocusConfig) -> Result<FocusPoint> {
    let reduced: Vec<([f64; 2], [f64; 2])> = rays.iter().map(Ray::meridian).collect();
    let x = solve_least_squares(&reduced, config)?;
    Ok(FocusPoint { x: x[0], z: x[1] })
}

/// Least-squares crossing point of `rays` in three dimensions
pub fn focus_position_3d(rays: &[Ray]) -> Result<FocusPoint3> {
    focus_position_3d_with(rays, &FocusConfig::default())
}

/// [`focus_position_3d`] with explicit settings
pub fn focus_position_3d_with(rays: &[Ray], config: &FocusConfig) -> Result<FocusPoint3> {
    let full: Vec<([f64; 3], [f64; 3])> = rays.iter().map(|r| (r.anchor, r.direction)).collect();
    let x = solve_least_squares(&full, config)?;
    Ok(FocusPoint3 {
        x: x[0],
        y: x[1],
        z: x[2],
    })
}

/// Meridian focus of the final states of traced trajectories
///
/// Each trajectory holds one tracer state per row, 4 columns `(x, z, vx, vz)` or 6 columns
/// `(x, y, z, vx, vy, vz)`. The last row of each becomes a ray.
pub fn focus_from_trajectories(trajectories: &[Array2<f64>]) -> Result<FocusPoint> {
    let rays = trajectories
        .iter()
        .enumerate()
        .map(|(index, trajectory)| {
            let last = trajectory
                .rows()
                .into_iter()
                .last()
                .ok_or(TracingError::EmptyTrajectory { index })?;
            Ray::from_phase_space(&last.to_vec())
        })
        .collect::<Result<Vec<_>>>()?;
    focus_position(&rays)
}

/// Meridian focus of several independent ray sets
///
/// Sets are evaluated in parallel when the `native` feature is enabled; results keep the
/// input order.
pub fn focus_positions(ray_sets: &[Vec<Ray>], config: &FocusConfig) -> Vec<Result<FocusPoint>> {
    parallel_map(ray_sets, |rays| focus_position_with(rays, config))
}

/// Perpendicular distance from `point` to the meridian projection of `ray`
pub fn residual_distance(point: &FocusPoint, ray: &Ray) -> f64 {
    let ([ax, az], [dx, dz]) = ray.meridian();
    let (px, pz) = (point.x - ax, point.z - az);
    (px * dz - pz * dx).abs() / dx.hypot(dz)
}

/// Solve `(Σ M_i) X = Σ M_i a_i` for rays given as `(anchor, direction)` in `N` dimensions
fn solve_least_squares<const N: usize>(
    rays: &[([f64; N], [f64; N])],
    config: &FocusConfig,
) -> Result<Array1<f64>> {
    let (first_anchor, _) = rays.first().ok_or(TracingError::EmptyRaySet)?;

    let mut a = Array2::<f64>::zeros((N, N));
    let mut b = Array1::<f64>::zeros(N);

    for (index, (anchor, direction)) in rays.iter().enumerate() {
        check_anchor(anchor, index)?;
        // M does not depend on the length of d
        let d = unit_max_direction(direction, index)?;
        let norm2: f64 = d.iter().map(|v| v * v).sum();

        // M = I - d dᵀ / (d·d)
        let mut m = Array2::<f64>::eye(N);
        for i in 0..N {
            for j in 0..N {
                m[[i, j]] -= d[i] * d[j] / norm2;
            }
        }

        a += &m;
        b += &m.dot(&Array1::from(anchor.to_vec()));
    }

    if rays.len() == 1 {
        log::debug!("Single ray: focus is its anchor");
        return Ok(Array1::from(first_anchor.to_vec()));
    }

    lu_solve_with_tolerance(&a, &b, config.singular_tolerance).map_err(|source| {
        log::debug!("Focus solve failed for {} rays: {}", rays.len(), source);
        TracingError::DegenerateRaySet {
            num_rays: rays.len(),
            source,
        }
    })
}
