use crate::{
    CoreResult, RecorderError,
    recorder::{RecordCommand, RecordTarget, elevation, events::RecorderEvent},
};

use std::{
    os::unix::process::ExitStatusExt,
    panic::Location,
    path::{Path, PathBuf},
    process::Stdio,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use error_location::ErrorLocation;
use nix::{
    sys::signal::{Signal, kill},
    unistd::{AccessFlags, Pid, access},
};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    process::{Child, ChildStdin, Command},
    sync::mpsc,
    task::JoinHandle,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// How long `shutdown` waits for the monitor task to observe process
/// exit before discarding it. A graceful stop was already requested at
/// that point; anything slower is force-killed via the dropped handle.
const TEARDOWN_GRACE: Duration = Duration::from_millis(100);

/// Size of the relay read buffer. Output is forwarded verbatim with
/// arbitrary chunk boundaries, so the size only affects event granularity.
const OUTPUT_CHUNK_BYTES: usize = 4096;

/// Supervises a single `perf record` subprocess.
///
/// At most one subprocess is live at a time; starting a new recording
/// force-kills and discards any previous one without waiting for it.
/// Lifecycle notifications are delivered on the event channel handed to
/// [`PerfRecorder::new`]; see [`RecorderEvent`] for the ordering
/// guarantees.
///
/// The recorder itself runs no threads. The subprocess is observed by one
/// spawned monitor task which communicates only through the event channel
/// and the shared user-terminated flag.
pub struct PerfRecorder {
    perf_binary: PathBuf,
    attach_window: Option<u64>,
    events: mpsc::Sender<RecorderEvent>,
    /// Distinguishes an intentional stop from an unexpected process
    /// death. Set by `stop`, read and cleared by the monitor task.
    user_terminated: Arc<AtomicBool>,
    active: Option<ActiveSession>,
    last_command: Option<RecordCommand>,
}

/// The currently supervised subprocess, if any.
struct ActiveSession {
    pid: Option<Pid>,
    stdin: Option<ChildStdin>,
    monitor: JoinHandle<()>,
    session_id: Uuid,
}

impl PerfRecorder {
    /// Create a recorder that reports lifecycle events on `events`.
    pub fn new(events: mpsc::Sender<RecorderEvent>) -> Self {
        Self {
            perf_binary: PathBuf::from("perf"),
            attach_window: None,
            events,
            user_terminated: Arc::new(AtomicBool::new(false)),
            active: None,
            last_command: None,
        }
    }

    /// Override the perf binary to invoke (default: `perf` on the search
    /// path).
    #[must_use]
    pub fn with_perf_binary(mut self, perf_binary: impl Into<PathBuf>) -> Self {
        self.perf_binary = perf_binary.into();
        self
    }

    /// Window id the escalation helper's credential dialog should attach
    /// to, when a windowing front end drives the recorder.
    pub fn set_attach_window(&mut self, window: Option<u64>) {
        self.attach_window = window;
    }

    /// Record a set of already-running processes.
    ///
    /// # Errors
    ///
    /// `NoTargetProcesses` for an empty pid set, plus every failure class
    /// of [`PerfRecorder::record`].
    pub async fn record_attach(
        &mut self,
        perf_options: &[String],
        output_path: &Path,
        elevated: bool,
        pids: &[u32],
    ) -> CoreResult<()> {
        let target = RecordTarget::Attach {
            pids: pids.to_vec(),
        };
        self.record(perf_options, output_path, elevated, target, None)
            .await
    }

    /// Launch an executable and record it from the start.
    ///
    /// # Errors
    ///
    /// `ExecutableNotFound`/`NotAFile`/`NotExecutable` when the target
    /// does not resolve, plus every failure class of
    /// [`PerfRecorder::record`].
    pub async fn record_launch(
        &mut self,
        perf_options: &[String],
        output_path: &Path,
        elevated: bool,
        exe: &Path,
        exe_args: &[String],
        working_dir: Option<&Path>,
    ) -> CoreResult<()> {
        let target = RecordTarget::Launch {
            exe: exe.to_path_buf(),
            args: exe_args.to_vec(),
        };
        self.record(perf_options, output_path, elevated, target, working_dir)
            .await
    }

    /// Start a recording session for `target`.
    ///
    /// Validates the target and the output directory, discards any
    /// previous subprocess, assembles the (optionally escalated) command
    /// line, emits [`RecorderEvent::Started`] and spawns asynchronously.
    /// Every failure emits [`RecorderEvent::Failed`] with a human-readable
    /// reason and returns the typed error; no process is spawned on
    /// validation failures.
    ///
    /// # Errors
    ///
    /// Target and output-directory validation errors,
    /// `ElevationUnavailable` when elevated assembly cannot resolve a
    /// helper or username, and `SpawnFailed` when the OS refuses the
    /// subprocess.
    #[instrument(skip(self, perf_options, target))]
    pub async fn record(
        &mut self,
        perf_options: &[String],
        output_path: &Path,
        elevated: bool,
        target: RecordTarget,
        working_dir: Option<&Path>,
    ) -> CoreResult<()> {
        let target_args = match target.resolve() {
            Ok(args) => args,
            Err(e) => return self.fail(e).await,
        };
        if let Err(e) = validate_output_dir(output_path) {
            return self.fail(e).await;
        }

        // The previous handle is killed and discarded without waiting;
        // only the new session reports on the event channel from here on.
        self.discard_active();
        self.user_terminated.store(false, Ordering::Release);

        let command = if elevated {
            match self.elevated_command(perf_options, output_path, &target_args) {
                Ok(command) => command,
                Err(e) => return self.fail(e).await,
            }
        } else {
            RecordCommand::direct(&self.perf_binary, perf_options, output_path, &target_args)
        };

        let session_id = Uuid::new_v4();
        info!(
            session_id = %session_id,
            command = %command.display_string(),
            "Recording starting"
        );
        let _ = self
            .events
            .send(RecorderEvent::Started {
                program: command.program.clone(),
                args: command.args.clone(),
            })
            .await;

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            process.current_dir(dir);
        }

        self.last_command = Some(command);

        let mut child = match process.spawn() {
            Ok(child) => child,
            Err(source) => {
                if !self.user_terminated.load(Ordering::Acquire) {
                    let _ = self
                        .events
                        .send(RecorderEvent::Failed {
                            reason: source.to_string(),
                        })
                        .await;
                }
                return Err(RecorderError::SpawnFailed {
                    source,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let pid = child.id().map(|id| Pid::from_raw(id as i32));
        let stdin = child.stdin.take();
        let monitor = tokio::spawn(monitor_session(
            child,
            self.events.clone(),
            Arc::clone(&self.user_terminated),
            output_path.to_path_buf(),
            self.attach_window,
            session_id,
        ));

        self.active = Some(ActiveSession {
            pid,
            stdin,
            monitor,
            session_id,
        });

        Ok(())
    }

    /// Request graceful termination of the current recording.
    ///
    /// Marks the session as user-terminated, then sends SIGTERM so perf
    /// can flush its data file. The session's terminal event arrives via
    /// the monitor task once the subprocess actually exits. No-op when
    /// nothing is recording.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if let Some(active) = &self.active {
            if !active.monitor.is_finished() {
                self.user_terminated.store(true, Ordering::Release);
                if let Some(pid) = active.pid {
                    let _ = kill(pid, Signal::SIGTERM);
                }
                info!(session_id = %active.session_id, "Graceful stop requested");
            }
        }
    }

    /// Write raw bytes to the recording subprocess's stdin.
    ///
    /// # Errors
    ///
    /// `NoActiveRecording` when no subprocess is live — calling this
    /// without an active recording is a caller bug.
    pub async fn send_input(&mut self, input: &[u8]) -> CoreResult<()> {
        let stdin = self
            .active
            .as_mut()
            .and_then(|active| active.stdin.as_mut())
            .ok_or_else(|| RecorderError::NoActiveRecording {
                location: ErrorLocation::from(Location::caller()),
            })?;
        stdin.write_all(input).await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Descriptive string of the command last configured, for display.
    ///
    /// Empty before the first recording. Survives session end; a pure
    /// accessor with no side effects.
    pub fn perf_command(&self) -> String {
        self.last_command
            .as_ref()
            .map(RecordCommand::display_string)
            .unwrap_or_default()
    }

    /// Cooperative teardown: request a graceful stop, wait briefly for
    /// the subprocess to exit, then discard the handle.
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(active) = self.active.take() {
            let mut monitor = active.monitor;
            if !monitor.is_finished()
                && tokio::time::timeout(TEARDOWN_GRACE, &mut monitor)
                    .await
                    .is_err()
            {
                warn!(session_id = %active.session_id, "Recording did not exit in time, discarding");
                monitor.abort();
            }
        }
    }

    /// Kill and forget the previous subprocess, if any. Non-blocking:
    /// nothing waits for the old process, and its monitor is aborted so
    /// it emits no further events.
    fn discard_active(&mut self) {
        if let Some(previous) = self.active.take() {
            if !previous.monitor.is_finished() {
                // Aborting drops the Child; kill_on_drop reaps it.
                previous.monitor.abort();
                if let Some(pid) = previous.pid {
                    let _ = kill(pid, Signal::SIGKILL);
                }
                debug!(session_id = %previous.session_id, "Previous recording discarded");
            }
        }
    }

    fn elevated_command(
        &self,
        perf_options: &[String],
        output_path: &Path,
        target_args: &[String],
    ) -> CoreResult<RecordCommand> {
        let helper =
            elevation::escalation_helper().ok_or_else(|| RecorderError::ElevationUnavailable {
                reason: "no graphical sudo utility found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;
        let username =
            elevation::current_username().ok_or_else(|| RecorderError::ElevationUnavailable {
                reason: "current username could not be resolved".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(RecordCommand::elevated(
            &helper,
            self.attach_window,
            &self.perf_binary,
            perf_options,
            output_path,
            &username,
            target_args,
        ))
    }

    /// Report `error` as a failure notification, then hand it back to the
    /// caller as the typed error.
    async fn fail(&self, error: RecorderError) -> CoreResult<()> {
        warn!(reason = %error, "Recording rejected");
        let _ = self
            .events
            .send(RecorderEvent::Failed {
                reason: error.to_string(),
            })
            .await;
        Err(error)
    }
}

impl Drop for PerfRecorder {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            // Dropping the monitor's Child force-kills the subprocess.
            active.monitor.abort();
        }
    }
}

/// Outcome of the once-per-session exit classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitClassification {
    Success,
    Failure {
        /// Raw exit code (or signal number) embedded in the report.
        code: i32,
    },
}

/// Classify subprocess exit, invoked exactly once when it terminates.
///
/// Success requires the output file to exist, combined with any of: a
/// zero exit code, a terminate-signal exit while the user requested the
/// stop, or a nonzero data file. The nonzero-size arm counts as success
/// even when the exit code disagrees; perf can die after flushing usable
/// samples.
pub(crate) fn classify_exit(
    code: Option<i32>,
    signal: Option<i32>,
    user_terminated: bool,
    output_path: &Path,
) -> ExitClassification {
    // Death by signal carries no exit code; fold the signal number in so
    // a SIGTERM-killed perf and a helper exiting with code 15 classify
    // the same way.
    let code = code.or(signal).unwrap_or(-1);

    let data_len = std::fs::metadata(output_path).map(|m| m.len()).ok();
    let stopped_by_user = code == Signal::SIGTERM as i32 && user_terminated;
    let salvageable = data_len.is_some_and(|len| len > 0);

    if data_len.is_some() && (code == 0 || stopped_by_user || salvageable) {
        ExitClassification::Success
    } else {
        ExitClassification::Failure { code }
    }
}

/// Check the output path's parent directory: must exist, be a directory,
/// and be writable by the current user.
#[track_caller]
fn validate_output_dir(output_path: &Path) -> CoreResult<()> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !dir.exists() {
        return Err(RecorderError::OutputDirMissing {
            dir: dir.display().to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    if !dir.is_dir() {
        return Err(RecorderError::OutputDirNotADirectory {
            dir: dir.display().to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    if access(&dir, AccessFlags::W_OK).is_err() {
        return Err(RecorderError::OutputDirNotWritable {
            dir: dir.display().to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(())
}

/// Observe one subprocess to completion: relay its merged output, then
/// classify the exit and emit the session's single terminal event.
async fn monitor_session(
    mut child: Child,
    events: mpsc::Sender<RecorderEvent>,
    user_terminated: Arc<AtomicBool>,
    output_path: PathBuf,
    attach_window: Option<u64>,
    session_id: Uuid,
) {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // stdout and stderr interleave on the same event stream; the relays
    // drain to EOF while wait() reaps the process.
    let (status, (), ()) = tokio::join!(
        child.wait(),
        relay_output(stdout, events.clone()),
        relay_output(stderr, events.clone()),
    );

    let was_user_terminated = user_terminated.load(Ordering::Acquire);
    // The next session starts from a clean flag.
    user_terminated.store(false, Ordering::Release);

    let event = match status {
        Ok(status) => {
            debug!(
                session_id = %session_id,
                code = ?status.code(),
                signal = ?status.signal(),
                "Recording process exited"
            );
            finish_session(
                status.code(),
                status.signal(),
                was_user_terminated,
                output_path,
                attach_window,
            )
            .await
        }
        Err(e) if was_user_terminated => {
            // Expected signal noise from a user-requested stop; classify
            // from the data file alone so the terminal event still fires.
            debug!(session_id = %session_id, error = %e, "Process error after user stop ignored");
            finish_session(None, None, true, output_path, attach_window).await
        }
        Err(e) => RecorderEvent::Failed {
            reason: e.to_string(),
        },
    };

    let _ = events.send(event).await;
}

/// Turn the classification into the session's terminal event, repairing
/// data file ownership on success.
async fn finish_session(
    code: Option<i32>,
    signal: Option<i32>,
    user_terminated: bool,
    output_path: PathBuf,
    attach_window: Option<u64>,
) -> RecorderEvent {
    match classify_exit(code, signal, user_terminated, &output_path) {
        ExitClassification::Success => {
            let path = output_path.clone();
            // ensure_file_readable blocks on the escalation helper.
            let readable =
                tokio::task::spawn_blocking(move || elevation::ensure_file_readable(&path, attach_window))
                    .await
                    .unwrap_or(false);
            if readable {
                info!(output_path = %output_path.display(), "Recording finished");
                RecorderEvent::Finished { output_path }
            } else {
                RecorderEvent::Failed {
                    reason: "Unable to make data file readable.".to_string(),
                }
            }
        }
        ExitClassification::Failure { code } => RecorderEvent::Failed {
            reason: format!("Failed to record perf data, error code {code}."),
        },
    }
}

/// Forward raw subprocess output as text events until EOF.
async fn relay_output<R: AsyncRead + Unpin>(
    stream: Option<R>,
    events: mpsc::Sender<RecorderEvent>,
) {
    let Some(mut stream) = stream else {
        return;
    };
    let mut buf = [0u8; OUTPUT_CHUNK_BYTES];
    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let chunk = String::from_utf8_lossy(&buf[..n]).into_owned();
                if events.send(RecorderEvent::Output { chunk }).await.is_err() {
                    break;
                }
            }
        }
    }
}
