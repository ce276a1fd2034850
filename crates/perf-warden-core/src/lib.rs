//! Perf-warden Core Library
//!
//! Supervises a `perf record` subprocess and relays its lifecycle
//! (started, output, finished, failed) to a front end over an async
//! channel. Supports attaching to running processes or launching a fresh
//! executable, optional privilege escalation through a graphical sudo
//! helper, and post-recording ownership repair of the produced data file.
//!
//! # Example
//!
//! ```no_run
//! use perf_warden_core::{CoreResult, PerfRecorder, RecorderEvent};
//!
//! use std::path::Path;
//!
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let (events_tx, mut events_rx) = mpsc::channel(64);
//!     let mut recorder = PerfRecorder::new(events_tx);
//!
//!     recorder
//!         .record_launch(&[], Path::new("perf.data"), false, Path::new("sleep"), &["1".into()], None)
//!         .await?;
//!
//!     while let Some(event) = events_rx.recv().await {
//!         match event {
//!             RecorderEvent::Output { chunk } => print!("{chunk}"),
//!             RecorderEvent::Finished { output_path } => {
//!                 println!("wrote {}", output_path.display());
//!                 break;
//!             }
//!             RecorderEvent::Failed { reason } => {
//!                 eprintln!("{reason}");
//!                 break;
//!             }
//!             RecorderEvent::Started { .. } => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod recorder;

pub use {
    error::RecorderError,
    error::Result as CoreResult,
    recorder::{PerfRecorder, RecordTarget, RecorderEvent},
};

#[cfg(test)]
mod tests;
