use error_location::ErrorLocation;
use thiserror::Error;

/// Recording supervision errors with source location tracking.
///
/// Every failure that reaches the front end is also rendered into a
/// [`RecorderEvent::Failed`](crate::RecorderEvent) reason string, so the
/// variants here exist for callers that want to branch on the failure
/// class rather than parse messages.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Attach target contained no process ids.
    #[error("Process does not exist {location}")]
    NoTargetProcesses {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Launch target not found, neither literally nor on the search path.
    #[error("File '{path}' does not exist {location}")]
    ExecutableNotFound {
        /// The path or name that failed to resolve.
        path: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Launch target resolved to something other than a regular file.
    #[error("'{path}' is not a file {location}")]
    NotAFile {
        /// The resolved path.
        path: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Launch target is a regular file but not executable.
    #[error("File '{path}' is not executable {location}")]
    NotExecutable {
        /// The resolved path.
        path: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Output directory does not exist.
    #[error("Folder '{dir}' does not exist {location}")]
    OutputDirMissing {
        /// The missing directory.
        dir: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Output path's parent is not a directory.
    #[error("'{dir}' is not a folder {location}")]
    OutputDirNotADirectory {
        /// The offending path.
        dir: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Output directory is not writable by the current user.
    #[error("Folder '{dir}' is not writable {location}")]
    OutputDirNotWritable {
        /// The read-only directory.
        dir: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Elevated recording was requested but no helper or username could
    /// be resolved to build the command line.
    #[error("Cannot record with elevated privileges: {reason} {location}")]
    ElevationUnavailable {
        /// What was missing (helper binary or username).
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The OS refused to spawn the recording subprocess.
    #[error("Failed to launch recording process: {source} {location}")]
    SpawnFailed {
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An operation that requires a live recording subprocess was called
    /// without one. This is a caller bug, not a runtime condition.
    #[error("No recording in progress {location}")]
    NoActiveRecording {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from filesystem or pipe operations.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

// Manual From<io::Error> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<std::io::Error> for RecorderError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        RecorderError::Io {
            source,
            location: ErrorLocation::from(std::panic::Location::caller()),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
