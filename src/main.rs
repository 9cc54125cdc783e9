use clap::Parser;
use countystat::cli::{Cli, Commands};
use countystat::commands;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Convert {
            data_dir,
            out_dir,
            dictionary,
            datasets,
        } => commands::convert(&data_dir, &out_dir, &dictionary, &datasets),
        Commands::Analyze {
            input,
            dictionary,
            outcome,
            sex,
            xiang,
            exclude_prefixes,
            json,
        } => commands::analyze(
            &input,
            &dictionary,
            &outcome,
            &sex,
            xiang,
            &exclude_prefixes,
            json.as_deref(),
        ),
        Commands::Plot {
            input,
            x,
            y,
            output,
            sex,
            xiang,
            fit,
        } => commands::plot(&input, &x, &y, &output, &sex, xiang, fit),
        Commands::Columns { dictionary, json } => commands::columns(&dictionary, json),
    };

    if let Err(err) = result {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
