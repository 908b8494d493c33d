//! Bounded worker pools for parallel sections.

use crate::error::{ForecastError, Result};
use rayon::ThreadPoolBuilder;

/// Run `op` on a dedicated pool of `n_jobs` threads, or on the global rayon
/// pool when `n_jobs` is `None`.
///
/// Parallel iterators started inside `op` use the chosen pool.
pub fn run_with_workers<T, F>(n_jobs: Option<usize>, op: F) -> Result<T>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    match n_jobs {
        None => Ok(op()),
        Some(0) => Err(ForecastError::InvalidParameter(
            "n_jobs must be at least 1".to_string(),
        )),
        Some(n) => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| {
                    ForecastError::ComputationError(format!("failed to build worker pool: {}", e))
                })?;
            Ok(pool.install(op))
        }
    }
}
