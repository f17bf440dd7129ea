//! Simple linear regression for the Taylor's Law fit.
//!
//! `fit_loglog` regresses `ln(var)` on `ln(mean)` and reports slope,
//! intercept, R², the two-sided p-value of the slope (t statistic with
//! n - 2 degrees of freedom), and the slope standard error.

use statrs::distribution::{ContinuousCDF, StudentsT};
use tln_core::{Error, Result};

/// Result of a simple linear regression `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinFit {
    /// Fitted slope.
    pub slope: f64,
    /// Fitted intercept.
    pub intercept: f64,
    /// Coefficient of determination.
    pub r2: f64,
    /// Two-sided p-value for a slope of zero.
    pub p_value: f64,
    /// Standard error of the slope.
    pub std_err: f64,
}

fn t_dist(df: f64) -> StudentsT {
    StudentsT::new(0.0, 1.0, df).expect("valid df for t-distribution")
}

/// Ordinary least squares of `y` on `x` with slope significance test.
pub fn linregress(x: &[f64], y: &[f64]) -> Result<LinFit> {
    if x.len() != y.len() {
        return Err(Error::Validation(format!(
            "x and y must have equal length (got {} and {})",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 3 {
        return Err(Error::Validation(format!(
            "regression needs at least 3 points, got {}",
            x.len()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(Error::Validation("regression inputs must be finite".to_string()));
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    if sxx <= 0.0 {
        return Err(Error::Computation("regression x values are all identical".to_string()));
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r = if syy > 0.0 { sxy / (sxx * syy).sqrt() } else { 0.0 };
    let r2 = r * r;

    let df = n - 2.0;
    let one_minus_r2 = 1.0 - r2;
    let (p_value, std_err) = if one_minus_r2 <= f64::EPSILON {
        // Perfect fit: t statistic diverges.
        (0.0, 0.0)
    } else {
        let t = r * (df / one_minus_r2).sqrt();
        let p = 2.0 * (1.0 - t_dist(df).cdf(t.abs()));
        let se = ((syy / sxx - slope * slope) / df).max(0.0).sqrt();
        (p, se)
    };

    Ok(LinFit { slope, intercept, r2, p_value, std_err })
}

/// Fit `ln(var) = b * ln(mean) + intercept`.
///
/// All means and variances must be strictly positive; callers drop
/// zero-variance rows before fitting.
pub fn fit_loglog(means: &[f64], vars: &[f64]) -> Result<LinFit> {
    if means.iter().chain(vars.iter()).any(|&v| v <= 0.0) {
        return Err(Error::Validation(
            "log-log regression requires strictly positive means and variances".to_string(),
        ));
    }
    let x: Vec<f64> = means.iter().map(|&m| m.ln()).collect();
    let y: Vec<f64> = vars.iter().map(|&v| v.ln()).collect();
    linregress(&x, &y)
}
