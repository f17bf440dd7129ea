//! Descriptive summaries of simulated variance distributions.

use tln_sampling::variance::sample_variance;

/// Arithmetic mean. Empty input returns `NaN`.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Quantile for sorted data via linear interpolation.
///
/// - `q=0` returns min
/// - `q=1` returns max
/// - empty input returns `NaN`
pub fn quantile_linear_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let i = pos.floor() as usize;
    let j = pos.ceil() as usize;
    if i == j {
        return sorted[i];
    }
    let t = pos - i as f64;
    (1.0 - t) * sorted[i] + t * sorted[j]
}

/// Quantile via sorting + linear interpolation.
pub fn quantile_linear(data: &[f64], q: f64) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let mut v = data.to_vec();
    v.sort_by(f64::total_cmp);
    quantile_linear_sorted(&v, q)
}

/// Median via [`quantile_linear`].
pub fn median(data: &[f64]) -> f64 {
    quantile_linear(data, 0.5)
}

/// Z-score of an empirical value against a simulated distribution:
/// `(emp - mean(sims)) / sd(sims)`, with `sd` using Bessel's correction.
pub fn z_score(emp: f64, sims: &[f64]) -> f64 {
    let sd = sample_variance(sims).sqrt();
    (emp - mean(sims)) / sd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_linear_sorted_edges() {
        let s = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((quantile_linear_sorted(&s, 0.0) - 1.0).abs() < 1e-12);
        assert!((quantile_linear_sorted(&s, 1.0) - 5.0).abs() < 1e-12);
        assert!((quantile_linear_sorted(&s, 0.5) - 3.0).abs() < 1e-12);
        assert!((quantile_linear_sorted(&s, 0.25) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn median_of_even_length_interpolates() {
        assert!((median(&[4.0, 1.0, 3.0, 2.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn z_score_of_the_simulated_mean_is_zero() {
        let sims = [1.0, 2.0, 3.0, 4.0];
        let z = z_score(mean(&sims), &sims);
        assert!(z.abs() < 1e-12, "z = {z}");
    }

    #[test]
    fn z_score_scales_by_bessel_sd() {
        // sims sd (ddof=1) of [0, 2] is sqrt(2); emp one sd above the mean.
        let sims = [0.0, 2.0];
        let z = z_score(1.0 + 2.0_f64.sqrt(), &sims);
        assert!((z - 1.0).abs() < 1e-12, "z = {z}");
    }
}
