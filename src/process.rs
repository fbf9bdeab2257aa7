use crate::board::parse_board;
use crate::error::{ConvertError, Result};
use crate::exporter::write_csv;
use crate::output::{OutputTarget, persist_output};
use crate::projector::project_board;
use crate::utils::ConvertConfig;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of the files picked up in directory mode (matched case-insensitively).
pub const INPUT_EXTENSION: &str = "json";

/// How the destination of one conversion is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Write exactly here, replacing any existing file.
    Explicit(PathBuf),
    /// Name the file after the board, inside `dir`.
    BoardName { dir: PathBuf },
    /// Name the file after the input file's stem, inside `dir`.
    FileStem { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub output: PathBuf,
    pub rows: usize,
}

#[derive(Debug)]
pub enum FileOutcome {
    Converted { input: PathBuf, converted: Converted },
    Failed { input: PathBuf, error: ConvertError },
}

#[derive(Debug, Default)]
pub struct Summary {
    pub outcomes: Vec<FileOutcome>,
}

impl Summary {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Converted { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ConvertError> {
        self.outcomes.iter().filter_map(|o| match o {
            FileOutcome::Failed { error, .. } => Some(error),
            FileOutcome::Converted { .. } => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Convert one board export file to CSV.
pub fn convert_file(input: &Path, destination: &Destination, bom: bool) -> Result<Converted> {
    let bytes = fs::read(input).map_err(|source| ConvertError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let board = parse_board(&bytes).map_err(|source| ConvertError::Parse {
        path: input.to_path_buf(),
        source,
    })?;

    let target = match destination {
        Destination::Explicit(path) => OutputTarget::Explicit(path.clone()),
        Destination::BoardName { dir } => OutputTarget::derived(dir, board.name.as_deref()),
        Destination::FileStem { dir } => OutputTarget::derived(
            dir,
            input.file_stem().map(|s| s.to_string_lossy()).as_deref(),
        ),
    };

    let records = project_board(&board);
    let output = persist_output(&target, |w| write_csv(w, &records, bom))?;

    Ok(Converted {
        output,
        rows: records.len(),
    })
}

/// Board export files directly inside `dir`, sorted by file name.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| ConvertError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut inputs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION))
        })
        .collect();
    inputs.sort();
    Ok(inputs)
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Entry point: converts a single file or every export in a directory.
///
/// Single-file failures are returned as `Err`. In directory mode each file's failure is
/// recorded in the returned [`Summary`] and the remaining files are still processed.
pub fn run(config: &ConvertConfig) -> Result<Summary> {
    let input = &config.input;
    if input.is_dir() {
        return run_directory(config);
    }
    if !input.exists() {
        return Err(ConvertError::NoInput {
            path: input.clone(),
        });
    }

    let destination = match (&config.output, &config.output_dir) {
        (Some(out), _) if out.is_dir() => Destination::BoardName { dir: out.clone() },
        (Some(out), _) => Destination::Explicit(out.clone()),
        (None, Some(dir)) => Destination::BoardName { dir: dir.clone() },
        (None, None) => Destination::BoardName {
            dir: parent_dir(input),
        },
    };

    let converted = convert_file(input, &destination, config.bom)?;
    if !config.quiet {
        eprintln!(
            "Converted: {} → {} ({} cards)",
            input.display(),
            converted.output.display(),
            converted.rows
        );
    }

    Ok(Summary {
        outcomes: vec![FileOutcome::Converted {
            input: input.clone(),
            converted,
        }],
    })
}

fn run_directory(config: &ConvertConfig) -> Result<Summary> {
    let inputs = discover_inputs(&config.input)?;
    if inputs.is_empty() {
        if !config.quiet {
            eprintln!("No JSON files found in directory: {}", config.input.display());
        }
        return Ok(Summary::default());
    }

    let dir = config
        .output
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| config.input.clone());
    let destination = Destination::FileStem { dir };

    let pb = if config.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(inputs.len() as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
        ) {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar.println(format!("Found {} JSON files.", inputs.len()));
        bar
    };

    let mut summary = Summary::default();
    for input in inputs {
        let outcome = match convert_file(&input, &destination, config.bom) {
            Ok(converted) => {
                if config.verbose {
                    pb.println(format!(
                        "Converted: {} → {} ({} cards)",
                        input.display(),
                        converted.output.display(),
                        converted.rows
                    ));
                }
                FileOutcome::Converted { input, converted }
            }
            Err(error) => {
                // Errors go to stderr even when the bar is hidden.
                pb.suspend(|| eprintln!("Error: {error}"));
                FileOutcome::Failed { input, error }
            }
        };
        summary.outcomes.push(outcome);
        pb.inc(1);
    }

    pb.finish_and_clear();

    if !config.quiet {
        let mut line = format!(
            "Processed {} JSON files: {} converted",
            summary.outcomes.len(),
            summary.succeeded()
        );
        if summary.failed() > 0 {
            line.push_str(&format!(", {} failed (see errors above)", summary.failed()));
        }
        line.push('.');
        eprintln!("{line}");
    }

    Ok(summary)
}
