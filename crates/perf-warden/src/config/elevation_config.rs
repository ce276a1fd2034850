use serde::{Deserialize, Serialize};

/// Privilege escalation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElevationConfig {
    /// Always record through the privilege escalation helper, without
    /// requiring `--elevate` on every invocation.
    #[serde(default)]
    pub elevate_by_default: bool,
}
