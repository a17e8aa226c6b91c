/// Share of `part` in `whole` as a percentage rounded to two decimals
///
/// An empty whole yields `0.0` rather than `NaN`.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Pearson chi-squared statistic of observed counts against expected weights
///
/// Expected counts are the weights scaled to the observed total. Categories
/// with zero expectation are skipped.
pub fn chi_squared(observed: &[usize], weights: &[f64]) -> f64 {
    let total_observed: usize = observed.iter().sum();
    let total_weight: f64 = weights.iter().sum();
    if total_observed == 0 || total_weight <= 0.0 {
        return 0.0;
    }

    observed
        .iter()
        .zip(weights)
        .filter(|&(_, &weight)| weight > 0.0)
        .map(|(&count, &weight)| {
            let expected = weight / total_weight * total_observed as f64;
            let delta = count as f64 - expected;
            delta * delta / expected
        })
        .sum()
}

/// Upper critical value of the chi-squared distribution at the 0.1% level
///
/// Tabulated for 1 to 10 degrees of freedom; larger values fall back to the
/// Wilson-Hilferty approximation.
pub fn chi_squared_critical_999(degrees_of_freedom: usize) -> f64 {
    const TABLE: [f64; 10] = [
        10.828, 13.816, 16.266, 18.467, 20.515, 22.458, 24.322, 26.124, 27.877, 29.588,
    ];
    if let Some(&value) = degrees_of_freedom.checked_sub(1).and_then(|i| TABLE.get(i)) {
        return value;
    }

    let k = degrees_of_freedom.max(1) as f64;
    let z = 3.090_f64;
    let term = 2.0 / (9.0 * k);
    k * (z.mul_add(term.sqrt(), 1.0 - term)).powi(3)
}
