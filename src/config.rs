use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Settings for one run. Validated by whoever builds it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerConfig {
    /// Time allowed for each probe, in milliseconds
    pub timeout_ms: u64,
    /// Accept streams and playlists served with unverifiable TLS certificates
    pub insecure: bool,
    /// Only affects log verbosity
    pub debug: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            insecure: false,
            debug: false,
        }
    }
}

impl CheckerConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Whole seconds handed to `ffprobe`, truncated like an integer division.
    /// Never zero so that a probe stays bounded
    #[must_use]
    pub const fn timeout_secs(&self) -> u64 {
        let secs = self.timeout_ms / 1000;
        if secs == 0 { 1 } else { secs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_floored_to_seconds() {
        let config = |timeout_ms| CheckerConfig {
            timeout_ms,
            ..CheckerConfig::default()
        };

        assert_eq!(CheckerConfig::default().timeout_secs(), 60);
        assert_eq!(config(2_999).timeout_secs(), 2);
        assert_eq!(config(1_000).timeout_secs(), 1);
        assert_eq!(config(500).timeout_secs(), 1);
    }
}
