use std::path::PathBuf;

/// Configuration required to run a conversion.
/// This decouples the logic from how the arguments were parsed (CLI/Config file).
#[derive(Clone, Debug, Default)]
pub struct ConvertConfig {
    /// A board export file, or a directory of them.
    pub input: PathBuf,
    /// Explicit output: a CSV path for a single file, a directory for a batch.
    pub output: Option<PathBuf>,
    /// Fallback output directory when `output` is not given.
    pub output_dir: Option<PathBuf>,
    pub bom: bool,
    pub verbose: bool,
    pub quiet: bool,
}
