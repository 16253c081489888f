//! Direct solvers for small dense linear systems

mod lu;

pub use lu::{
    DEFAULT_PIVOT_TOLERANCE, LuError, LuFactorization, Result, lu_factorize_with_tolerance,
    lu_solve, lu_solve_with_tolerance,
};
