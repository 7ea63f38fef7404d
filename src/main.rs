//! Galley CLI — recipes, prep list and meal plans in plain text files.

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "galley",
    version,
    about = "Recipes, prep list and meal plans kept in plain text files"
)]
struct Cli {
    #[command(subcommand)]
    command: galley::cli::Commands,

    /// Directory holding the data files
    #[arg(long, global = true, env = "GALLEY_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Prep list file name inside the data directory (e.g. meal_prep.txt)
    #[arg(long, global = true)]
    prep_file: Option<String>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "galley=debug" } else { "galley=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = galley::core::config::DataPaths::resolve(&cli.data_dir, cli.prep_file.as_deref())
        .map_err(galley::cli::CliError::from)
        .and_then(|paths| galley::cli::dispatch(cli.command, &paths));

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red(), e);
        std::process::exit(1);
    }
}
