//! Reduction of per-chunk partial results.

/// Total of `partials` by sequential addition in index order.
///
/// The fixed order makes a partitioned result reproducible for a given input
/// and degree, whatever order the workers finished in.
pub fn combine(partials: &[f64]) -> f64 {
    partials.iter().fold(0.0, |total, &partial| total + partial)
}
