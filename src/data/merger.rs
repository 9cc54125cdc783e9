//! Extract Merger Module
//! Joins normalized per-topic extracts into one wide table.

use crate::data::loader::KEY_COLUMNS;
use polars::prelude::*;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("No extracts to merge")]
    NoFrames,
}

/// Inner-join all extracts on (County, Sex, Xiang), left to right.
///
/// A single frame is returned unchanged. Rows missing from any extract
/// drop out of the merged table.
pub fn merge_extracts(frames: Vec<DataFrame>) -> Result<DataFrame, MergeError> {
    let mut iter = frames.into_iter();
    let mut merged = iter.next().ok_or(MergeError::NoFrames)?;

    for right in iter {
        let keys: Vec<Expr> = KEY_COLUMNS.iter().map(|k| col(*k)).collect();
        merged = merged
            .lazy()
            .join(
                right.lazy(),
                keys.clone(),
                keys,
                JoinArgs::new(JoinType::Inner),
            )
            .collect()?;
    }

    info!(rows = merged.height(), cols = merged.width(), "merged extracts");
    Ok(merged)
}
