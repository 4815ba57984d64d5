//! Conjugate-pair matching for floating roots.

use num_complex::Complex64;
use tracing::trace;

/// Removes and returns the pool entry closest to `conj(root)`.
///
/// Distance is Euclidean; the first minimum in pool order wins, so the
/// result is deterministic for a given ordering. `None` for an empty pool.
pub fn pop_conjugate(root: Complex64, pool: &mut Vec<Complex64>) -> Option<Complex64> {
    let target = root.conj();
    let mut best: Option<(usize, f64)> = None;
    for (i, r) in pool.iter().enumerate() {
        let dist = (target - r).norm();
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }
    let (index, dist) = best?;
    trace!(?root, index, dist, "paired conjugate root");
    Some(pool.remove(index))
}
