//! Source-control provenance for meta-records.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use crate::common::{EXE_DATE_FORMAT, GIT_DESCRIBE_ARGS, GIT_PROGRAM};
use crate::errors::{ErrorKind, SirangError, SirangResult};

/// Produces the source-control revision recorded in meta-records.
pub trait RevisionSource: Send + Sync {
    /// Returns the current revision.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::ProvenanceUnavailable] when no revision can be
    /// determined.
    fn revision(&self) -> SirangResult<String>;
}

/// Runs `git describe --always` and reports its trimmed output.
///
/// The command runs in the configured working directory, or the process's
/// working directory when none is set.
#[derive(Clone, Debug)]
pub struct GitDescribe {
    program: String,
    working_dir: Option<PathBuf>,
}

impl Default for GitDescribe {
    fn default() -> Self {
        GitDescribe {
            program: GIT_PROGRAM.to_string(),
            working_dir: None,
        }
    }
}

impl GitDescribe {
    pub fn new() -> Self {
        GitDescribe::default()
    }

    /// Runs `program` instead of `git`.
    pub fn with_program(mut self, program: &str) -> Self {
        self.program = program.to_string();
        self
    }

    /// Runs the command in `dir` instead of the process's working directory.
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

impl RevisionSource for GitDescribe {
    fn revision(&self) -> SirangResult<String> {
        let mut command = Command::new(&self.program);
        command.args(GIT_DESCRIBE_ARGS);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|err| {
            log::error!("Failed to launch {}: {}", self.program, err);
            SirangError::new_with_cause(
                &format!("Failed to launch {}", self.program),
                ErrorKind::ProvenanceUnavailable,
                err.into(),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::error!(
                "{} describe exited with {}: {}",
                self.program,
                output.status,
                stderr.trim_end()
            );
            return Err(SirangError::new(
                &format!(
                    "{} describe exited with {}: {}",
                    self.program,
                    output.status,
                    stderr.trim_end()
                ),
                ErrorKind::ProvenanceUnavailable,
            ));
        }

        let revision = String::from_utf8(output.stdout)?.trim_end().to_string();
        if revision.is_empty() {
            log::error!("{} describe returned no revision", self.program);
            return Err(SirangError::new(
                &format!("{} describe returned no revision", self.program),
                ErrorKind::ProvenanceUnavailable,
            ));
        }
        Ok(revision)
    }
}

/// A revision fixed at construction.
///
/// For environments without source control, and for tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedRevision(String);

impl FixedRevision {
    pub fn new(revision: &str) -> Self {
        FixedRevision(revision.to_string())
    }
}

impl RevisionSource for FixedRevision {
    fn revision(&self) -> SirangResult<String> {
        if self.0.is_empty() {
            return Err(SirangError::new(
                "Fixed revision is empty",
                ErrorKind::ProvenanceUnavailable,
            ));
        }
        Ok(self.0.clone())
    }
}

/// A shareable [RevisionSource].
pub type SharedRevisionSource = Arc<dyn RevisionSource>;

/// Current local wall-clock time, as recorded in the `exe-date` field.
pub fn exe_date() -> String {
    chrono::Local::now().format(EXE_DATE_FORMAT).to_string()
}
