//! Runtime policy configuration

use cinder_core::Result;
use serde::{Deserialize, Serialize};

/// What happens when a timer is armed with a resulting duration of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDurationPolicy {
    /// The timer expires silently: the next advance latches it without an alarm.
    #[default]
    Discard,
    /// The alarm fires during the next timer phase, as if armed for one frame.
    NextAdvance,
}

/// Policies the room environment applies while running frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Zero-duration behavior given to every timer of every spawned instance
    pub zero_duration: ZeroDurationPolicy,
    /// Clamp `health` into `[0, 100]` after every hook call
    pub clamp_health: bool,
}

impl RuntimeConfig {
    /// Parse from a TOML string. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
