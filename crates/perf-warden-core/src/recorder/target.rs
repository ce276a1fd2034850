use crate::{CoreResult, RecorderError};

use std::{
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use nix::unistd::{AccessFlags, access};
use tracing::debug;

/// What to record: existing processes, or a fresh executable launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    /// Attach to a set of already-running process ids.
    Attach {
        /// Process ids handed to `perf record --pid`. Must be non-empty.
        pids: Vec<u32>,
    },
    /// Launch an executable and record it from the start.
    Launch {
        /// Executable path, or a bare name resolved on the search path.
        exe: PathBuf,
        /// Arguments passed to the launched executable.
        args: Vec<String>,
    },
}

impl RecordTarget {
    /// Validate the target and render it into `perf record` arguments.
    ///
    /// Attach targets become `--pid <p1,p2,...>`; launch targets become
    /// the resolved absolute executable path followed by its arguments.
    ///
    /// # Errors
    ///
    /// `NoTargetProcesses` for an empty pid set; `ExecutableNotFound`,
    /// `NotAFile` or `NotExecutable` when the launch target does not
    /// resolve to an existing, regular, executable file. No process is
    /// spawned on any of these paths.
    #[track_caller]
    pub(crate) fn resolve(&self) -> CoreResult<Vec<String>> {
        match self {
            RecordTarget::Attach { pids } => {
                if pids.is_empty() {
                    return Err(RecorderError::NoTargetProcesses {
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                let joined = pids
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                Ok(vec!["--pid".to_string(), joined])
            }
            RecordTarget::Launch { exe, args } => {
                let resolved = resolve_executable(exe)?;
                debug!(exe = %resolved.display(), "Launch target resolved");

                let mut rendered = vec![resolved.display().to_string()];
                rendered.extend(args.iter().cloned());
                Ok(rendered)
            }
        }
    }
}

/// Resolve a launch target to an absolute, existing, executable file.
///
/// The literal path is tried first, then the process search path.
#[track_caller]
fn resolve_executable(exe: &Path) -> CoreResult<PathBuf> {
    let candidate = if exe.exists() {
        exe.to_path_buf()
    } else {
        which::which(exe).map_err(|_| RecorderError::ExecutableNotFound {
            path: exe.display().to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?
    };

    if !candidate.is_file() {
        return Err(RecorderError::NotAFile {
            path: candidate.display().to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    if access(&candidate, AccessFlags::X_OK).is_err() {
        return Err(RecorderError::NotExecutable {
            path: candidate.display().to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(std::path::absolute(&candidate)?)
}
