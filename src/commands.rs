//! Subcommand implementations
//! One function per subcommand; report tables go to stdout, progress and
//! shapes to the log.

use crate::charts::ScatterPlotter;
use crate::data::{discover_extracts, load_extract, merge_extracts, ColumnDictionary};
use crate::stats::{OutcomeScreen, ScreenOptions, ScreenReport, StatsCalculator};
use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::fs;
use std::path::Path;
use tracing::info;

/// Datasets converted when none are named on the command line.
pub const DEFAULT_DATASETS: [&str; 4] = ["83", "89", "93", "TAI"];

pub fn convert(
    data_dir: &Path,
    out_dir: &Path,
    dictionary: &str,
    datasets: &[String],
) -> Result<()> {
    let dict_path = data_dir.join(dictionary);
    let dict = ColumnDictionary::load(&dict_path)
        .with_context(|| format!("loading dictionary '{}'", dict_path.display()))?;
    info!(columns = dict.len(), "loaded column dictionary");

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory '{}'", out_dir.display()))?;

    let datasets: Vec<String> = if datasets.is_empty() {
        DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect()
    } else {
        datasets.to_vec()
    };

    for dataset in &datasets {
        let paths = discover_extracts(data_dir, dataset)?;
        if paths.is_empty() {
            bail!(
                "no extract files match CH{}*.CSV under '{}'",
                dataset,
                data_dir.display()
            );
        }

        let frames = paths
            .iter()
            .map(|path| load_extract(path, &dict))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("loading extracts for dataset {}", dataset))?;

        let mut merged = merge_extracts(frames)?;

        let out_path = out_dir.join(format!("{}.csv", dataset));
        write_csv(&mut merged, &out_path)?;
        info!(dataset = %dataset, path = %out_path.display(), "wrote merged table");
    }

    Ok(())
}

pub fn analyze(
    input: &Path,
    dictionary: &Path,
    outcome: &str,
    sex: &str,
    xiang: i64,
    exclude_prefixes: &[String],
    json: Option<&Path>,
) -> Result<()> {
    let dict = ColumnDictionary::load(dictionary)
        .with_context(|| format!("loading dictionary '{}'", dictionary.display()))?;
    let df = read_merged(input)?;
    let df = filter_aggregate_rows(df, sex, xiang)?;
    if df.height() == 0 {
        bail!(
            "no rows left after Sex == '{}' / Xiang == {} filter",
            sex,
            xiang
        );
    }
    info!(rows = df.height(), "screening aggregate rows");

    let opts = ScreenOptions {
        outcome: outcome.to_string(),
        exclude_prefixes: exclude_prefixes.to_vec(),
    };
    let report = OutcomeScreen::run(&df, &dict, &opts)?;

    print_report(&report);

    if let Some(path) = json {
        let payload = serde_json::to_string_pretty(&report)?;
        fs::write(path, payload)
            .with_context(|| format!("writing JSON report '{}'", path.display()))?;
        info!(path = %path.display(), "wrote JSON report");
    }

    Ok(())
}

pub fn plot(
    input: &Path,
    x_col: &str,
    y_col: &str,
    output: &Path,
    sex: &str,
    xiang: i64,
    fit: bool,
) -> Result<()> {
    let df = read_merged(input)?;
    let df = filter_aggregate_rows(df, sex, xiang)?;

    let (xs, ys) = StatsCalculator::paired_values(&df, x_col, y_col)
        .with_context(|| format!("extracting '{}' and '{}'", x_col, y_col))?;
    if xs.is_empty() {
        bail!("no rows with both '{}' and '{}' present", x_col, y_col);
    }

    let points: Vec<(f64, f64)> = xs.iter().copied().zip(ys.iter().copied()).collect();
    let line = if fit {
        StatsCalculator::fit_line(&xs, &ys)
    } else {
        None
    };

    ScatterPlotter::render_scatter(&points, x_col, y_col, line.as_ref(), output)?;
    info!(path = %output.display(), points = points.len(), "wrote scatter plot");
    Ok(())
}

pub fn columns(dictionary: &Path, json: bool) -> Result<()> {
    let dict = ColumnDictionary::load(dictionary)
        .with_context(|| format!("loading dictionary '{}'", dictionary.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(dict.entries())?);
        return Ok(());
    }

    println!("{:<16}{:<10}description", "variable", "code");
    for entry in dict.entries() {
        println!("{:<16}{:<10}{}", entry.name, entry.code, entry.description);
    }
    Ok(())
}

/// Read a merged table back with type inference.
fn read_merged(path: &Path) -> Result<DataFrame> {
    let df = LazyCsvReader::new(path.to_string_lossy().to_string())
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()
        .and_then(|lazy| lazy.collect())
        .with_context(|| format!("reading merged table '{}'", path.display()))?;
    Ok(df)
}

/// Keep only the aggregate rows of the requested stratum.
fn filter_aggregate_rows(df: DataFrame, sex: &str, xiang: i64) -> Result<DataFrame> {
    let filtered = df
        .lazy()
        .filter(
            col("Sex")
                .eq(lit(sex.to_string()))
                .and(col("Xiang").eq(lit(xiang))),
        )
        .collect()
        .context("filtering aggregate rows (are 'Sex' and 'Xiang' present?)")?;
    Ok(filtered)
}

fn print_report(report: &ScreenReport) {
    println!(
        "{:<16}{:>6}{:>10}{:>12}{:>9}{:>11}{:>9}{:>11}  {}",
        "variable", "n", "corr", "slope", "r2", "rmse", "rmse/sd", "p", "description"
    );
    for r in &report.results {
        println!(
            "{:<16}{:>6}{:>10.3}{:>12.3}{:>9.3}{:>11.3}{:>9.3}{:>11.4}  {}",
            r.variable,
            r.n,
            r.correlation,
            r.slope,
            r.r_squared,
            r.rmse,
            r.rmse_ratio,
            r.p_value,
            r.description
        );
    }
    println!();
    println!(
        "outcome: {}  baseline rmse (mean-only model): {:.3}  variables ranked: {}",
        report.outcome,
        report.baseline_rmse,
        report.results.len()
    );
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = fs::File::create(path)
        .with_context(|| format!("creating '{}'", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("writing '{}'", path.display()))?;
    Ok(())
}
