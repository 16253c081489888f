//! Error types for ray construction and focal-point estimation.

use electron_optics_solvers::LuError;
use thiserror::Error;

/// Errors that can occur while building rays or estimating a focus.
#[derive(Debug, Error)]
pub enum TracingError {
    /// The ray directions are (numerically) parallel, no unique crossing exists.
    #[error("degenerate ray set: {num_rays} rays are parallel within tolerance")]
    DegenerateRaySet {
        /// Number of rays in the set
        num_rays: usize,
        /// Solver failure that exposed the degeneracy
        #[source]
        source: LuError,
    },

    /// No rays were given.
    #[error("ray set is empty")]
    EmptyRaySet,

    /// A direction vector is zero (or zero once projected on the solve plane).
    #[error("ray {index} has a zero or non-finite direction")]
    ZeroDirection {
        /// Position of the offending ray or vector
        index: usize,
    },

    /// An anchor point is not finite.
    #[error("ray {index} has a non-finite anchor")]
    NonFiniteAnchor {
        /// Position of the offending ray
        index: usize,
    },

    /// A trajectory has no samples.
    #[error("trajectory {index} has no samples")]
    EmptyTrajectory {
        /// Position of the trajectory
        index: usize,
    },

    /// A tracer state row has an unsupported width.
    #[error("invalid state length: {len} (expected {expected})")]
    InvalidStateLength {
        /// Width that was given
        len: usize,
        /// Accepted widths
        expected: &'static str,
    },

    /// Kinetic energy must be finite and positive.
    #[error("invalid energy: {energy_ev} eV (must be > 0)")]
    InvalidEnergy {
        /// The rejected energy
        energy_ev: f64,
    },
}

/// A specialized `Result` type for tracing operations.
pub type Result<T> = std::result::Result<T, TracingError>;

impl TracingError {
    /// Returns `true` if the ray set has no unique crossing point.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, TracingError::DegenerateRaySet { .. })
    }

    /// Returns `true` if an input value (ray, state row, energy) was rejected.
    ///
    /// This includes every variant except `DegenerateRaySet`.
    pub fn is_input_error(&self) -> bool {
        !self.is_degenerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TracingError::InvalidStateLength {
            len: 5,
            expected: "4 or 6",
        };
        assert_eq!(err.to_string(), "invalid state length: 5 (expected 4 or 6)");

        let err = TracingError::InvalidEnergy { energy_ev: -1.0 };
        assert_eq!(err.to_string(), "invalid energy: -1 eV (must be > 0)");
    }

    #[test]
    fn test_error_categories() {
        let degenerate = TracingError::DegenerateRaySet {
            num_rays: 2,
            source: LuError::SingularMatrix {
                column: 1,
                pivot: 0.0,
                scale: 2.0,
            },
        };
        assert!(degenerate.is_degenerate());
        assert!(!degenerate.is_input_error());
        assert!(std::error::Error::source(&degenerate).is_some());
        assert!(TracingError::EmptyRaySet.is_input_error());
    }
}
