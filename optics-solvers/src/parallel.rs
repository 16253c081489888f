//! Parallel utilities with feature-gated implementations
//!
//! Batch work here (one focal point per ray set) is made of independent calls with
//! private state, so a plain parallel map is all that is needed. With the `native`
//! feature the map runs on the rayon pool; otherwise it falls back to sequential
//! iteration with the same signature.

/// Check if parallel processing is available
#[cfg(feature = "native")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "native"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Parallel map over a slice, preserving input order
#[cfg(feature = "native")]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

/// Sequential map (fallback when parallel is not available)
#[cfg(not(feature = "native"))]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    data.iter().map(f).collect()
}
