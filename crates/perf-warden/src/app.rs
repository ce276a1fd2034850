use crate::{AppResult, Cli, RecordingState, config::Config};

use std::{io::Write, process::ExitCode, time::Instant};

use perf_warden_core::{PerfRecorder, RecorderEvent};
use tokio::{signal, sync::mpsc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Buffered events between the recorder's monitor task and the run loop.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Main application state.
///
/// Owns the recorder and its event channel; runs a select loop relaying
/// recorder lifecycle to the terminal and Ctrl-C to a graceful stop.
pub struct App {
    cli: Cli,
    config: Config,
    recorder: PerfRecorder,
    events_rx: mpsc::Receiver<RecorderEvent>,
    state: RecordingState,
}

impl App {
    /// Wire up the recorder with its event channel.
    pub(crate) fn new(cli: Cli, config: Config) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let recorder =
            PerfRecorder::new(events_tx).with_perf_binary(config.recording.perf_binary.clone());

        Self {
            cli,
            config,
            recorder,
            events_rx,
            state: RecordingState::Idle,
        }
    }

    /// Run one recording session to completion.
    ///
    /// The returned exit code mirrors the session's terminal event:
    /// success for `Finished`, failure for `Failed`.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<ExitCode> {
        let target = self.cli.record_target()?;
        let perf_options = self
            .cli
            .perf_options(&self.config.recording.default_options)?;
        let output_path = self
            .cli
            .output
            .clone()
            .unwrap_or_else(|| self.config.recording.default_output.clone());
        let elevated = self.cli.elevate || self.config.elevation.elevate_by_default;

        let session_id = Uuid::new_v4();
        if self
            .recorder
            .record(
                &perf_options,
                &output_path,
                elevated,
                target,
                self.cli.cwd.as_deref(),
            )
            .await
            .is_err()
        {
            // The failure reason already went out on the event channel;
            // drain up to it so it reaches the log below.
            while let Some(event) = self.events_rx.recv().await {
                if let RecorderEvent::Failed { reason } = event {
                    error!(session_id = %session_id, reason = %reason, "Recording rejected");
                    break;
                }
            }
            return Ok(ExitCode::FAILURE);
        }
        self.state = RecordingState::Recording {
            started_at: Instant::now(),
            session_id,
        };

        let code = loop {
            tokio::select! {
                maybe_event = self.events_rx.recv() => {
                    match maybe_event {
                        Some(RecorderEvent::Started { .. }) => {
                            info!(
                                session_id = %session_id,
                                command = %self.recorder.perf_command(),
                                "Recording started"
                            );
                        }
                        Some(RecorderEvent::Output { chunk }) => {
                            print!("{chunk}");
                            let _ = std::io::stdout().flush();
                        }
                        Some(RecorderEvent::Finished { output_path }) => {
                            if let RecordingState::Recording { started_at, .. } = self.state {
                                info!(
                                    session_id = %session_id,
                                    duration_ms = started_at.elapsed().as_millis(),
                                    output_path = %output_path.display(),
                                    "Recording finished"
                                );
                            } else {
                                info!(
                                    session_id = %session_id,
                                    output_path = %output_path.display(),
                                    "Recording finished"
                                );
                            }
                            break ExitCode::SUCCESS;
                        }
                        Some(RecorderEvent::Failed { reason }) => {
                            error!(session_id = %session_id, reason = %reason, "Recording failed");
                            break ExitCode::FAILURE;
                        }
                        None => {
                            error!(session_id = %session_id, "Event channel closed unexpectedly");
                            break ExitCode::FAILURE;
                        }
                    }
                }

                _ = signal::ctrl_c() => {
                    match self.state {
                        RecordingState::Recording { .. } => {
                            info!(session_id = %session_id, "Stop requested, finishing recording");
                            self.recorder.stop();
                            self.state = RecordingState::Stopping { session_id };
                        }
                        _ => {
                            warn!(session_id = %session_id, "Forced teardown");
                            break ExitCode::FAILURE;
                        }
                    }
                }
            }
        };

        self.state = RecordingState::Idle;
        self.recorder.shutdown().await;

        Ok(code)
    }
}
