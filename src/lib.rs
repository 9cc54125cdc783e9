//! countystat - County Health Survey Ingestion, Merge & Exploratory Statistics
//!
//! A linear batch pipeline over census-style county health survey files:
//! read per-topic extracts, normalize column names through the survey's
//! column dictionary, merge into one wide table keyed by county / sex /
//! area code, then screen every variable against a chosen outcome
//! (correlation, single-variable regression, RMSE comparison) and plot.

pub mod charts;
pub mod cli;
pub mod commands;
pub mod data;
pub mod stats;
