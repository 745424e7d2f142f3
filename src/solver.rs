/// External field solver invocation
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::SweepError;
use crate::profile_scope;

/// Anything that can turn the current config file into a set of fixed-name outputs.
pub trait Solver {
    /// Run once against `config_path` and block until it finishes.
    ///
    /// A solver that runs but fails is not an error here: its failure shows up
    /// as missing outputs when the run is archived.
    fn run(&mut self, config_path: &Path) -> Result<(), SweepError>;
}

/// The solver executable, run as `<path> <config> <quiet_flag>` with all
/// standard streams discarded.
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    path: PathBuf,
    quiet_flag: String,
}

impl ExternalSolver {
    pub fn new(path: impl Into<PathBuf>, quiet_flag: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            quiet_flag: quiet_flag.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Solver for ExternalSolver {
    fn run(&mut self, config_path: &Path) -> Result<(), SweepError> {
        profile_scope!("solver_run");
        let mut command = Command::new(&self.path);
        command.arg(config_path);
        if !self.quiet_flag.is_empty() {
            command.arg(&self.quiet_flag);
        }
        // No timeout: a hung solver hangs the sweep
        let status = command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| SweepError::Solver {
                path: self.path.clone(),
                source,
            })?;

        if status.success() {
            tracing::debug!("solver exited cleanly");
        } else {
            tracing::debug!("solver exited with {}, checking outputs anyway", status);
        }
        Ok(())
    }
}
