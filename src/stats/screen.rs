//! Outcome Screening Module
//! Screens every dictionary variable against a chosen outcome column:
//! correlation, single-variable regression and RMSE comparison.

use crate::data::ColumnDictionary;
use crate::stats::calculator::StatsCalculator;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Outcome column '{0}' not found in table")]
    MissingOutcome(String),
    #[error("Outcome column '{0}' is not numeric")]
    OutcomeNotNumeric(String),
}

/// Screening knobs. Variables whose original code starts with an excluded
/// prefix are not screened (mortality outcomes compete with the target).
#[derive(Debug, Clone)]
pub struct ScreenOptions {
    pub outcome: String,
    pub exclude_prefixes: Vec<String>,
}

/// Association of one variable with the outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenResult {
    pub variable: String,
    pub description: String,
    pub n: usize,
    pub correlation: f64,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub rmse: f64,
    /// RMSE relative to the mean-only baseline (below 1.0 improves on it).
    pub rmse_ratio: f64,
    pub p_value: f64,
}

/// Full screening report, ranked by |correlation| descending.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenReport {
    pub outcome: String,
    /// Sample standard deviation of the outcome: the mean-only model RMSE.
    pub baseline_rmse: f64,
    pub results: Vec<ScreenResult>,
}

/// Runs the variable screen over a merged table.
pub struct OutcomeScreen;

impl OutcomeScreen {
    pub fn run(
        df: &DataFrame,
        dict: &ColumnDictionary,
        opts: &ScreenOptions,
    ) -> Result<ScreenReport, ScreenError> {
        if df.column(&opts.outcome).is_err() {
            return Err(ScreenError::MissingOutcome(opts.outcome.clone()));
        }
        let outcome_values: Vec<f64> = StatsCalculator::column_values(df, &opts.outcome)
            .map_err(|_| ScreenError::OutcomeNotNumeric(opts.outcome.clone()))?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        let baseline_rmse = StatsCalculator::sample_std(&outcome_values);

        let candidates: Vec<(&str, &str)> = dict
            .codes_sorted()
            .into_iter()
            .filter(|entry| entry.name != opts.outcome)
            .filter(|entry| {
                !opts
                    .exclude_prefixes
                    .iter()
                    .any(|prefix| entry.code.starts_with(prefix.as_str()))
            })
            .map(|entry| (entry.name.as_str(), entry.description.as_str()))
            .collect();

        let mut results: Vec<ScreenResult> = candidates
            .par_iter()
            .filter_map(|&(name, description)| {
                Self::screen_variable(df, name, description, &opts.outcome, baseline_rmse)
            })
            .collect();

        results.sort_by(|a, b| {
            b.correlation
                .abs()
                .partial_cmp(&a.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(ScreenReport {
            outcome: opts.outcome.clone(),
            baseline_rmse,
            results,
        })
    }

    fn screen_variable(
        df: &DataFrame,
        name: &str,
        description: &str,
        outcome: &str,
        baseline_rmse: f64,
    ) -> Option<ScreenResult> {
        if df.column(name).is_err() {
            warn!("skipping column '{}', not available", name);
            return None;
        }

        let (x, y) = match StatsCalculator::paired_values(df, name, outcome) {
            Ok(pairs) => pairs,
            Err(err) => {
                warn!("skipping column '{}': {}", name, err);
                return None;
            }
        };

        let correlation = StatsCalculator::pearson(&x, &y);
        if correlation.is_nan() {
            return None;
        }
        let fit = StatsCalculator::fit_line(&x, &y)?;
        let p_value = StatsCalculator::correlation_p_value(correlation, x.len());
        let rmse_ratio = if baseline_rmse > 0.0 {
            fit.rmse / baseline_rmse
        } else {
            f64::NAN
        };

        Some(ScreenResult {
            variable: name.to_string(),
            description: description.to_string(),
            n: x.len(),
            correlation,
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            rmse: fit.rmse,
            rmse_ratio,
            p_value,
        })
    }
}
