//! Command line interface for perf-warden.

use crate::{AppError, AppResult};

use std::{panic::Location, path::PathBuf};

use clap::Parser;
use error_location::ErrorLocation;
use perf_warden_core::RecordTarget;

/// Record a perf profile of a fresh command or of running processes.
#[derive(Debug, Parser)]
#[command(name = "perf-warden", version, about)]
pub struct Cli {
    /// Output file for the recorded profile data.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Attach to already-running process ids (repeat or comma separate).
    #[arg(short, long, value_delimiter = ',', conflicts_with = "command")]
    pub pid: Vec<u32>,

    /// Extra options for perf record, as one shell-quoted string.
    #[arg(long, value_name = "STRING", allow_hyphen_values = true)]
    pub perf_options: Option<String>,

    /// Record through the graphical privilege escalation helper.
    #[arg(long)]
    pub elevate: bool,

    /// Working directory for the launched command.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Command to launch and record, with its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Build the recording target from the parsed arguments.
    ///
    /// # Errors
    ///
    /// `InvalidArguments` when neither a pid set nor a launch command was
    /// given.
    #[track_caller]
    pub(crate) fn record_target(&self) -> AppResult<RecordTarget> {
        if !self.pid.is_empty() {
            return Ok(RecordTarget::Attach {
                pids: self.pid.clone(),
            });
        }
        match self.command.split_first() {
            Some((exe, args)) => Ok(RecordTarget::Launch {
                exe: PathBuf::from(exe),
                args: args.to_vec(),
            }),
            None => Err(AppError::InvalidArguments {
                reason: "give --pid or a command to launch".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Combine configured default perf options with the CLI extras.
    ///
    /// # Errors
    ///
    /// `InvalidArguments` when `--perf-options` has unbalanced quoting.
    #[track_caller]
    pub(crate) fn perf_options(&self, defaults: &[String]) -> AppResult<Vec<String>> {
        let mut options = defaults.to_vec();
        if let Some(raw) = &self.perf_options {
            let extra = shlex::split(raw).ok_or_else(|| AppError::InvalidArguments {
                reason: format!("unbalanced quoting in --perf-options: {raw}"),
                location: ErrorLocation::from(Location::caller()),
            })?;
            options.extend(extra);
        }
        Ok(options)
    }
}
