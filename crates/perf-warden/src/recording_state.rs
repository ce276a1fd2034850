use std::time::Instant;

use uuid::Uuid;

/// Recording state for the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Not currently recording.
    Idle,
    /// A recording subprocess is live.
    Recording {
        /// When recording started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
    /// A graceful stop was requested; waiting for the terminal event.
    Stopping {
        /// Session ID of the recording being stopped.
        session_id: Uuid,
    },
}
