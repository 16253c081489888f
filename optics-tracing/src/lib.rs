//! # Electron-optics tracing: focal points and trajectory helpers
//!
//! Post-processing of particle trajectories produced by an external tracer:
//!
//! - [`focus_position`]: least-squares common crossing point of a set of rays in the
//!   meridian plane, with [`focus_position_3d`] for beams without axial symmetry
//! - [`focus_from_trajectories`]: the same, starting from the final tracer states
//! - [`velocity_vec`] / [`velocity_vec_spherical`]: initial velocities from energies
//! - [`axis_intersection`]: where a trajectory crosses the optical axis
//!
//! ```ignore
//! use electron_optics_tracing::{Ray, focus_position, velocity_vec};
//!
//! let v1 = velocity_vec(10.0, &[-1e-3, -1.0])?;
//! let v2 = velocity_vec(10.0, &[1e-3, -1.0])?;
//! let rays = [
//!     Ray::from_phase_space(&[3.0 * v1[0], 3.0 * v1[1], v1[0], v1[1]])?,
//!     Ray::from_phase_space(&[3.0 * v2[0], 3.0 * v2[1], v2[0], v2[1]])?,
//! ];
//! let focus = focus_position(&rays)?; // ≈ (0, 0)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod focus;
pub mod ray;
pub mod trajectory;

// Re-exports
pub use error::{Result, TracingError};
pub use focus::{
    FocusConfig, FocusPoint, FocusPoint3, focus_from_trajectories, focus_position,
    focus_position_3d, focus_position_3d_with, focus_position_with, focus_positions,
    residual_distance,
};
pub use ray::Ray;
pub use trajectory::{
    ELECTRON_SPEED_PER_SQRT_EV, axis_intersection, velocity_vec, velocity_vec_spherical,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
