use crate::error::{ConvertError, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Base name used when a board has no usable name.
pub const DEFAULT_BASE_NAME: &str = "trello_export";

/// Where a converted board should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Used verbatim; an existing file is replaced.
    Explicit(PathBuf),
    /// `<dir>/<base>.csv`, or the first free `<dir>/<base>_N.csv`.
    Derived { dir: PathBuf, base: String },
}

impl OutputTarget {
    /// A derived target whose base name is sanitized (and defaulted when empty).
    pub fn derived(dir: impl Into<PathBuf>, raw_name: Option<&str>) -> Self {
        let base = raw_name.map(sanitize_filename).unwrap_or_default();
        let base = if base.trim().is_empty() {
            DEFAULT_BASE_NAME.to_string()
        } else {
            base
        };
        Self::Derived {
            dir: dir.into(),
            base,
        }
    }

    fn dir(&self) -> &Path {
        match self {
            Self::Explicit(path) => match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            },
            Self::Derived { dir, .. } => dir,
        }
    }

    /// The path a write would use right now. Derived targets are probed against the
    /// filesystem, so the answer can go stale before the file is written.
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            Self::Explicit(path) => Ok(path.clone()),
            Self::Derived { dir, base } => next_free_path(dir, base),
        }
    }
}

/// Replace every character that is not a letter, digit, space, `-` or `_` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// First of `<base>.csv`, `<base>_1.csv`, `<base>_2.csv`, … that does not exist in `dir`.
pub fn next_free_path(dir: &Path, base: &str) -> Result<PathBuf> {
    let mut counter = 0usize;
    loop {
        let candidate = if counter == 0 {
            dir.join(format!("{base}.csv"))
        } else {
            dir.join(format!("{base}_{counter}.csv"))
        };
        match candidate.try_exists() {
            Ok(false) => return Ok(candidate),
            Ok(true) => counter += 1,
            Err(e) => {
                return Err(ConvertError::Path {
                    path: candidate,
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Create `dir` (and parents) if needed.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    if dir.exists() {
        return Err(ConvertError::Path {
            path: dir.to_path_buf(),
            reason: "exists but is not a directory".into(),
        });
    }
    fs::create_dir_all(dir).map_err(|e| ConvertError::Path {
        path: dir.to_path_buf(),
        reason: format!("could not create directory: {e}"),
    })
}

/// Run `write` against a temporary file next to the destination, then move it into place.
///
/// Explicit targets replace whatever is there. Derived targets are claimed with a
/// no-clobber rename, so a file that appears between probing and writing is never
/// overwritten; the next suffix is tried instead. If `write` fails nothing is left behind.
pub fn persist_output<F>(target: &OutputTarget, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = target.dir();
    ensure_dir(dir)?;

    let mut candidate = target.resolve()?;
    // An overwritten file keeps its mode; new files get the usual umask-filtered one.
    let existing = match target {
        OutputTarget::Explicit(path) => fs::metadata(path)
            .ok()
            .filter(|m| m.is_file())
            .map(|m| m.permissions()),
        OutputTarget::Derived { .. } => None,
    };

    let mut builder = Builder::new();
    builder.prefix(".trello-csv").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(|e| ConvertError::Path {
            path: dir.to_path_buf(),
            reason: format!("could not create temporary file: {e}"),
        })?;

    fill(&mut tmp, write).map_err(|source| ConvertError::Write {
        path: candidate.clone(),
        source,
    })?;

    let OutputTarget::Derived { dir, base } = target else {
        tmp.persist(&candidate).map_err(|e| ConvertError::Write {
            path: candidate.clone(),
            source: e.error,
        })?;
        if let Some(perms) = existing {
            fs::set_permissions(&candidate, perms).map_err(|source| ConvertError::Write {
                path: candidate.clone(),
                source,
            })?;
        }
        return Ok(candidate);
    };

    loop {
        match tmp.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                tmp = e.file;
                candidate = next_free_path(dir, base)?;
            }
            Err(e) => {
                return Err(ConvertError::Write {
                    path: candidate,
                    source: e.error,
                });
            }
        }
    }
}

fn fill<F>(tmp: &mut NamedTempFile, write: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let file: &mut File = tmp.as_file_mut();
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush()
}
