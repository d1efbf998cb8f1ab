//! Goodness-of-fit helpers for weighted selection tests.

/// Upper critical values of the chi-square distribution at p = 0.001 for one
/// to ten degrees of freedom.
pub const CHI_SQUARE_CRITICAL_P001: [f64; 10] = [
    10.828, 13.816, 16.266, 18.467, 20.515, 22.458, 24.322, 26.124, 27.877, 29.588,
];

/// Pearson's chi-square statistic of `observed` counts against the
/// distribution implied by `weights`.
///
/// Both slices must have the same length and the weights a positive sum.
pub fn chi_square(observed: &[u64], weights: &[f64]) -> f64 {
    assert_eq!(observed.len(), weights.len(), "one weight per bucket");
    let total: u64 = observed.iter().sum();
    let weight_sum: f64 = weights.iter().sum();
    assert!(weight_sum > 0.0, "weights must have a positive sum");

    observed
        .iter()
        .zip(weights)
        .map(|(&seen, &weight)| {
            let expected = total as f64 * weight / weight_sum;
            let diff = seen as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Critical value for `buckets` categories, if tabulated.
pub fn chi_square_critical(buckets: usize) -> Option<f64> {
    let df = buckets.checked_sub(1)?;
    df.checked_sub(1)
        .and_then(|i| CHI_SQUARE_CRITICAL_P001.get(i))
        .copied()
}

/// Whether `observed` fits `weights` at p = 0.001.
pub fn fits_weights(observed: &[u64], weights: &[f64]) -> bool {
    match chi_square_critical(observed.len()) {
        Some(critical) => chi_square(observed, weights) < critical,
        None => false,
    }
}
