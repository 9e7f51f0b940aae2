//! Single-variable ordinary least squares.
//!
//! The forecaster fits `count = intercept + slope * day_index`. With one
//! explanatory variable the normal equations have a closed form, so no
//! matrix solver is involved:
//!
//! ```text
//! slope     = Σ (x_i - x̄)(y_i - ȳ) / Σ (x_i - x̄)^2
//! intercept = ȳ - slope * x̄
//! ```

/// Fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit a line through `(x_i, y_i)`.
///
/// Returns `None` for fewer than two points, mismatched lengths, or when all
/// `x` are equal (the slope is undefined).
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        sxy += dx * (yi - y_mean);
        sxx += dx * dx;
    }

    if sxx.abs() < f64::EPSILON {
        return None;
    }

    let slope = sxy / sxx;
    Some(LinearFit {
        intercept: y_mean - slope * x_mean,
        slope,
    })
}
