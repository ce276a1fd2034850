use crate::config::{default_output_file, default_perf_binary};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// perf invocation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// perf binary to invoke; a bare name resolves on the search path.
    #[serde(default = "default_perf_binary")]
    pub perf_binary: PathBuf,

    /// Options always passed to `perf record`, ahead of any CLI extras.
    #[serde(default)]
    pub default_options: Vec<String>,

    /// Output file used when `-o` is not given.
    #[serde(default = "default_output_file")]
    pub default_output: PathBuf,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            perf_binary: default_perf_binary(),
            default_options: Vec::new(),
            default_output: default_output_file(),
        }
    }
}
