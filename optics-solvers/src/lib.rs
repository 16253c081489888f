//! Small dense solvers for electron-optics post-processing
//!
//! This crate collects the numerical plumbing shared by the focal-point estimator and
//! other consumers of traced trajectories:
//!
//! - **Direct Solvers**: LU decomposition with partial pivoting and a pivot threshold
//!   relative to the matrix scale, so that nearly singular normal equations are rejected
//!   instead of producing huge garbage solutions
//! - **Parallel helpers**: map over independent inputs with rayon (`native` feature) or
//!   sequentially
//!
//! # Example
//!
//! ```ignore
//! use electron_optics_solvers::lu_solve;
//! use ndarray::array;
//!
//! let a = array![[4.0, 1.0], [1.0, 3.0]];
//! let b = array![1.0, 2.0];
//! let x = lu_solve(&a, &b)?;
//! ```

pub mod direct;
pub mod parallel;

// Re-export direct solvers
pub use direct::{DEFAULT_PIVOT_TOLERANCE, LuError, LuFactorization, lu_solve};
pub use parallel::{is_parallel_available, parallel_map};
