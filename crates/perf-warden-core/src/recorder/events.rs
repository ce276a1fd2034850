use std::path::PathBuf;

/// Lifecycle notifications sent from the recorder to its front end.
///
/// Any number of [`RecorderEvent::Output`] events may interleave before
/// the terminal [`RecorderEvent::Finished`] or [`RecorderEvent::Failed`],
/// which fires exactly once per recording session.
#[derive(Debug, Clone)]
pub enum RecorderEvent {
    /// A recording subprocess was configured and is being spawned.
    Started {
        /// The resolved binary being executed (perf itself, or the
        /// privilege escalation helper when recording elevated).
        program: PathBuf,
        /// The full argument list, for display and audit.
        args: Vec<String>,
    },
    /// Incremental subprocess output, stdout and stderr interleaved.
    ///
    /// Chunk boundaries are arbitrary; no line-splitting is performed.
    Output {
        /// Decoded text as read from the subprocess pipes.
        chunk: String,
    },
    /// The recording completed and the data file is readable.
    Finished {
        /// Path to the produced data file.
        output_path: PathBuf,
    },
    /// The recording could not start, or ended unsuccessfully.
    Failed {
        /// Human-readable description of what went wrong.
        reason: String,
    },
}
