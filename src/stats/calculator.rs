//! Statistics Calculator Module
//! Numeric kernels: Pearson correlation, single-variable least squares,
//! RMSE and significance testing.

use polars::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for association tests
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Least-squares fit of y on a single x.
#[derive(Debug, Clone, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Root mean squared residual of the fitted line.
    pub rmse: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Handles statistical calculations over paired samples.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn mean(values: &[f64]) -> f64 {
        if values.is_empty() {
            return f64::NAN;
        }
        values.iter().sum::<f64>() / values.len() as f64
    }

    /// Sample standard deviation (n-1 denominator).
    ///
    /// Doubles as the RMSE of the mean-only baseline model.
    pub fn sample_std(values: &[f64]) -> f64 {
        let n = values.len();
        if n < 2 {
            return f64::NAN;
        }
        let mean = Self::mean(values);
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    }

    /// Pearson correlation coefficient.
    ///
    /// NaN when fewer than two pairs or either side is constant.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len();
        if n != y.len() || n < 2 {
            return f64::NAN;
        }

        let mx = Self::mean(x);
        let my = Self::mean(y);

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        let mut syy = 0.0;
        for (xi, yi) in x.iter().zip(y.iter()) {
            let dx = xi - mx;
            let dy = yi - my;
            sxy += dx * dy;
            sxx += dx * dx;
            syy += dy * dy;
        }

        if sxx == 0.0 || syy == 0.0 {
            return f64::NAN;
        }
        sxy / (sxx.sqrt() * syy.sqrt())
    }

    /// Ordinary least squares of y on x.
    ///
    /// None when fewer than two pairs or x is constant. `r_squared` is NaN
    /// when y is constant (no variance to explain).
    pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LinearFit> {
        let n = x.len();
        if n != y.len() || n < 2 {
            return None;
        }

        let mx = Self::mean(x);
        let my = Self::mean(y);

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (xi, yi) in x.iter().zip(y.iter()) {
            sxy += (xi - mx) * (yi - my);
            sxx += (xi - mx) * (xi - mx);
        }
        if sxx == 0.0 {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = my - slope * mx;

        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (xi, yi) in x.iter().zip(y.iter()) {
            let residual = yi - (intercept + slope * xi);
            ss_res += residual * residual;
            ss_tot += (yi - my) * (yi - my);
        }

        let r_squared = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else {
            f64::NAN
        };
        let rmse = (ss_res / n as f64).sqrt();

        Some(LinearFit {
            slope,
            intercept,
            r_squared,
            rmse,
            n,
        })
    }

    /// Two-tailed p-value for the null of no linear association, from the
    /// t statistic r * sqrt((n-2) / (1-r^2)) with n-2 degrees of freedom.
    pub fn correlation_p_value(r: f64, n: usize) -> f64 {
        if r.is_nan() || n < 3 {
            return f64::NAN;
        }
        let denom = 1.0 - r * r;
        if denom <= 0.0 {
            return 0.0; // perfect correlation
        }

        let df = (n - 2) as f64;
        let t = r * (df / denom).sqrt();

        if let Ok(dist) = StudentsT::new(0.0, 1.0, df) {
            2.0 * (1.0 - dist.cdf(t.abs()))
        } else {
            f64::NAN
        }
    }

    /// Column as floats, nulls preserved.
    pub fn column_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
        let series = df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(series.f64()?.into_iter().collect())
    }

    /// Rows where both columns are present, as paired vectors.
    pub fn paired_values(
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
    ) -> PolarsResult<(Vec<f64>, Vec<f64>)> {
        let xs = Self::column_values(df, x_col)?;
        let ys = Self::column_values(df, y_col)?;

        let mut x_out = Vec::with_capacity(xs.len());
        let mut y_out = Vec::with_capacity(ys.len());
        for (x, y) in xs.into_iter().zip(ys.into_iter()) {
            if let (Some(x), Some(y)) = (x, y) {
                if !x.is_nan() && !y.is_nan() {
                    x_out.push(x);
                    y_out.push(y);
                }
            }
        }
        Ok((x_out, y_out))
    }
}
