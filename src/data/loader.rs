//! Extract Loader Module
//! Reads per-topic survey extracts and normalizes them: schema validation,
//! missing-value conversion and renaming via the column dictionary.

use crate::data::dictionary::ColumnDictionary;
use glob::glob;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Merge keys present in every extract.
pub const KEY_COLUMNS: [&str; 3] = ["County", "Sex", "Xiang"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Invalid extract pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Unexpected column name '{0}'")]
    UnexpectedColumn(String),
    #[error("Column '{column}' has non-numeric value '{value}'")]
    BadNumeric { column: String, value: String },
    #[error("Column '{column}' has non-integer area code '{value}'")]
    BadAreaCode { column: String, value: String },
}

/// Find the extract files for one dataset (`CH<dataset>*.CSV`), sorted.
pub fn discover_extracts(data_dir: &Path, dataset: &str) -> Result<Vec<PathBuf>, LoaderError> {
    let pattern = data_dir.join(format!("CH{}*.CSV", dataset));
    let mut paths: Vec<PathBuf> = glob(&pattern.to_string_lossy())?
        .filter_map(Result::ok)
        .collect();
    paths.sort();
    Ok(paths)
}

/// Load one extract and normalize it.
///
/// All cells are read as strings; conversion is explicit. A final column
/// whose name trims to nothing is an exporter artifact and is dropped.
/// Every remaining column must be a key column or a dictionary code; data
/// columns are converted to floats (`"."` and `""` are missing) and renamed
/// to their normalized names. Source column order is preserved.
pub fn load_extract(path: &Path, dict: &ColumnDictionary) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(path.to_string_lossy().to_string())
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    // Trailing dummy column from the exporter
    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    let df = match names.last() {
        Some(last) if last.trim().is_empty() => df.drop(last)?,
        _ => df,
    };

    let mut cleaned: Vec<Column> = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let name = column.name().trim().to_string();
        let series = column.as_materialized_series();

        if name == "County" || name == "Sex" {
            cleaned.push(trimmed_string_column(&name, series)?);
        } else if name == "Xiang" {
            cleaned.push(area_code_column(&name, series)?);
        } else if let Some(nice) = dict.nice_name(&name) {
            cleaned.push(numeric_column(nice, &name, series)?);
        } else {
            return Err(LoaderError::UnexpectedColumn(name));
        }
    }

    let cleaned = DataFrame::new(cleaned)?;
    info!(
        path = %path.display(),
        rows = cleaned.height(),
        cols = cleaned.width(),
        "loaded extract"
    );
    Ok(cleaned)
}

fn trimmed_string_column(name: &str, series: &Series) -> Result<Column, LoaderError> {
    let ca = series.str()?;
    let values: Vec<Option<String>> = ca
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()))
        .collect();
    Ok(Column::new(name.into(), values))
}

fn area_code_column(name: &str, series: &Series) -> Result<Column, LoaderError> {
    let ca = series.str()?;
    let mut values: Vec<Option<i64>> = Vec::with_capacity(ca.len());
    for v in ca.into_iter() {
        match v.map(str::trim) {
            None | Some("") | Some(".") => values.push(None),
            Some(cell) => match cell.parse::<i64>() {
                Ok(code) => values.push(Some(code)),
                Err(_) => {
                    return Err(LoaderError::BadAreaCode {
                        column: name.to_string(),
                        value: cell.to_string(),
                    })
                }
            },
        }
    }
    Ok(Column::new(name.into(), values))
}

fn numeric_column(nice: &str, orig: &str, series: &Series) -> Result<Column, LoaderError> {
    let ca = series.str()?;
    let mut values: Vec<Option<f64>> = Vec::with_capacity(ca.len());
    for v in ca.into_iter() {
        match v.map(str::trim) {
            None | Some("") | Some(".") => values.push(None),
            Some(cell) => match cell.parse::<f64>() {
                Ok(x) => values.push(Some(x)),
                Err(_) => {
                    return Err(LoaderError::BadNumeric {
                        column: orig.to_string(),
                        value: cell.to_string(),
                    })
                }
            },
        }
    }
    Ok(Column::new(nice.into(), values))
}
