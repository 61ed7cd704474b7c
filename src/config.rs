//! Engine settings. Read from the environment by the binary, passed explicitly everywhere else.

use serde::{Deserialize, Serialize};

/// K-factor used when none is configured.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Players per playoff group (a quarterfinal bracket).
pub const PLAYOFF_GROUP_SIZE: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// ELO K-factor: maximum rating swing of a single match.
    pub k_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
        }
    }
}

impl EngineConfig {
    /// `ELO_K_FACTOR` from the environment, falling back to the default when unset or invalid.
    pub fn from_env() -> Self {
        let k_factor = std::env::var("ELO_K_FACTOR")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|k| k.is_finite() && *k > 0.0)
            .unwrap_or(DEFAULT_K_FACTOR);
        Self { k_factor }
    }
}
