use std::env;
use std::time::Duration;

/// Access gate tuning.
#[derive(Clone, Debug)]
pub struct GateConfig {
    /// Upper bound on a single authorization check, in milliseconds. A
    /// check that exceeds it is treated as a failure and denied.
    pub authorize_timeout_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            authorize_timeout_ms: 2_000,
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Self {
        Self {
            authorize_timeout_ms: env::var("AUTHORIZE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2_000), // 2 seconds
        }
    }

    pub fn authorize_timeout(&self) -> Duration {
        Duration::from_millis(self.authorize_timeout_ms)
    }
}
