use clap::Parser;
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use trello_csv::process;
use trello_csv::utils::ConvertConfig;

/// Convert Trello board exports (JSON) into CSV, one row per card.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// A Trello JSON export, or a directory of them.
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// CSV file to write (single file), or directory for the CSV files (directory input).
    /// Defaults to a file named after the board, next to the input.
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/trello-csv/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start each CSV with a UTF-8 byte-order mark (helps Excel detect the encoding).
    #[arg(long, overrides_with = "no_bom")]
    bom: bool,

    /// Never write a byte-order mark, even if the config file asks for one.
    #[arg(long, overrides_with = "bom")]
    no_bom: bool,

    /// Print each file written.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress progress and the final summary. Errors are still printed.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    output_dir: Option<PathBuf>,
    bom: Option<bool>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        dirs::config_dir()
            .map(|d| d.join("trello-csv/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

/// `--x` / `--no-x` pair: `None` when neither was given.
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // CLI > config file > defaults
    let file_cfg = load_file_config(cli.config.as_deref())?;

    let config = ConvertConfig {
        input: cli.input,
        output: cli.output,
        output_dir: file_cfg.output_dir,
        bom: flag(cli.bom, cli.no_bom)
            .or(file_cfg.bom)
            .unwrap_or(false),
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let summary = process::run(&config)?;

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
