//! # Electron-optics BEM: excitation and active-element compaction
//!
//! Pre-processing core of a boundary-element electron-optics simulator. A meshed
//! [`Geometry`] carries named element groups (electrodes, dielectric interfaces, floating
//! conductors); an [`Excitation`] assigns a boundary condition to some of them and compacts
//! the element list to the elements the solver has to take into account.
//!
//! ## Features
//!
//! - Fixed and position-dependent voltages, dielectrics and floating conductors
//! - Order-preserving compaction with an explicit old-to-new index table
//! - JSON configuration of constant excitations
//!
//! ```ignore
//! use electron_optics_bem::{Excitation, Geometry};
//!
//! let mut exc = Excitation::new(&geometry);
//! exc.add_voltage([("inner", 1.0), ("outer", 0.0)])?;
//! exc.add_dielectric([("dielectric", 2.0)])?;
//! let active = exc.compact();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;

// Re-exports
pub use crate::core::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
