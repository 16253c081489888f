//! Excitation layer of the boundary-element solver
//!
//! This module turns a meshed geometry plus named boundary conditions into the compacted
//! set of elements the boundary-element solver works on.
//!
//! ## Architecture
//!
//! - `types`: Geometry (points, element connectivity, named groups) and symmetry tag
//! - `excitation`: Boundary condition kinds and the per-group registry
//! - `compaction`: Old-to-new index table and the active-element set
//! - `config`: JSON configuration of constant excitations
//! - `error`: Error type shared by the above

pub mod compaction;
pub mod config;
pub mod error;
pub mod excitation;
pub mod types;

// Re-exports for convenience
pub use compaction::{ActiveElements, IndexRemap};
pub use config::ExcitationConfig;
pub use error::{ExcitationError, Result};
pub use excitation::{Excitation, ExcitationKind, GroupState, Voltage, VoltageFn};
pub use types::{Geometry, Symmetry};
