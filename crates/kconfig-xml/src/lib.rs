//! Conditional config XML normalizer.
//!
//! Rewrites `android-base-conditional.xml` style files from the kernel
//! configs repository into the form the framework compatibility matrix
//! expects. Each input produces a `-parsed.xml` file; a file is written only
//! if its version tag line is well-formed.

mod fixup;

pub use fixup::{fixup_str, FixedUpXml, LtsVersion};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Suffix appended to the file stem of a rewritten file.
pub const PARSED_SUFFIX: &str = "-parsed.xml";

#[derive(Debug, thiserror::Error)]
pub enum FixupError {
    #[error("Malformatted kernel conditional config file: first line is {0:?}")]
    MalformedVersionTag(String),

    #[error("Could not open {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// One source file and where its outputs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixupJob {
    pub source: PathBuf,
    pub matrix: PathBuf,
    /// Optional file receiving the bare `major.minor.tiny` string.
    pub version: Option<PathBuf>,
}

/// Derive `<stem>-parsed.xml` from `path`, keeping its directories.
pub fn parsed_file_name(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}{}", stem, PARSED_SUFFIX))
}

/// Inputs and destinations for a fixup run.
#[derive(Debug, Clone, Default)]
pub struct FixupRequest {
    /// Root the inputs are relative to.
    pub repo_root: Option<PathBuf>,
    /// Directory receiving outputs; inputs' relative directories are kept.
    pub output_dir: Option<PathBuf>,
    /// Explicit matrix destination (single input only).
    pub output_matrix: Option<PathBuf>,
    /// Version file destination (single input only).
    pub output_version: Option<PathBuf>,
    pub inputs: Vec<PathBuf>,
}

impl FixupRequest {
    /// Expand the request into per-file jobs.
    pub fn jobs(&self) -> Result<Vec<FixupJob>, FixupError> {
        if self.inputs.is_empty() {
            return Err(FixupError::InvalidRequest(
                "at least one input file is required".to_string(),
            ));
        }
        if self.inputs.len() > 1 && self.output_matrix.is_some() {
            return Err(FixupError::InvalidRequest(
                "--output-matrix requires exactly one input".to_string(),
            ));
        }
        if self.inputs.len() > 1 && self.output_version.is_some() {
            return Err(FixupError::InvalidRequest(
                "--output-version requires exactly one input".to_string(),
            ));
        }
        if self.output_matrix.is_some() && self.output_dir.is_some() {
            return Err(FixupError::InvalidRequest(
                "--output-matrix and --output-dir are mutually exclusive".to_string(),
            ));
        }

        let jobs = self
            .inputs
            .iter()
            .map(|input| {
                let source = match &self.repo_root {
                    Some(root) => root.join(input),
                    None => input.clone(),
                };
                let matrix = match (&self.output_matrix, &self.output_dir) {
                    (Some(matrix), _) => matrix.clone(),
                    (None, Some(dir)) if input.is_absolute() => {
                        dir.join(parsed_file_name(Path::new(input.file_name().unwrap_or_default())))
                    }
                    (None, Some(dir)) => dir.join(parsed_file_name(input)),
                    (None, None) => parsed_file_name(&source),
                };
                FixupJob {
                    source,
                    matrix,
                    version: self.output_version.clone(),
                }
            })
            .collect();
        Ok(jobs)
    }
}

/// Rewrite one file. Nothing is written unless the source is well-formed.
pub fn fixup_file(job: &FixupJob) -> Result<LtsVersion, FixupError> {
    let source = fs::read_to_string(&job.source).map_err(|source| FixupError::Read {
        path: job.source.clone(),
        source,
    })?;
    let fixed = fixup_str(&source)?;

    write_output(&job.matrix, &fixed.body)?;
    info!(
        source = %job.source.display(),
        matrix = %job.matrix.display(),
        lts = %fixed.lts,
        "rewrote conditional config"
    );

    if let Some(version_path) = &job.version {
        write_output(version_path, &format!("{}\n", fixed.lts))?;
        debug!(path = %version_path.display(), "wrote version file");
    }

    Ok(fixed.lts)
}

fn write_output(path: &Path, content: &str) -> Result<(), FixupError> {
    let write_err = |source: io::Error| FixupError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, content).map_err(write_err)
}
