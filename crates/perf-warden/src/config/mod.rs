#[allow(clippy::module_inception)]
mod config;
mod elevation_config;
mod recording_config;

pub(crate) use {
    config::Config, elevation_config::ElevationConfig, recording_config::RecordingConfig,
};

use std::path::PathBuf;

pub(crate) const DEFAULT_PERF_BINARY: &str = "perf";
pub(crate) const DEFAULT_OUTPUT_FILE: &str = "perf.data";

pub(crate) fn default_perf_binary() -> PathBuf {
    PathBuf::from(DEFAULT_PERF_BINARY)
}

pub(crate) fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}
