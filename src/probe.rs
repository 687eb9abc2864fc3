use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::playlist::PlaylistEntry;

/// Checks whether a stream is reachable.
///
/// An implementation issues exactly one attempt per call and always resolves,
/// turning transport errors and timeouts into [`ProbeStatus::Offline`].
pub trait Prober {
    fn probe(&self, entry: &PlaylistEntry) -> impl Future<Output = ProbeOutcome> + Send;
}

impl<P: Prober> Prober for &P {
    fn probe(&self, entry: &PlaylistEntry) -> impl Future<Output = ProbeOutcome> + Send {
        (**self).probe(entry)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    pub checked_at: DateTime<Utc>,
    /// Timeout the probe ran with, in milliseconds
    pub timeout_ms: u64,
    #[serde(flatten)]
    pub status: ProbeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ProbeStatus {
    Online { metadata: ProbeMetadata },
    Offline { reason: String },
}

impl ProbeOutcome {
    #[must_use]
    pub fn online(timeout_ms: u64, metadata: ProbeMetadata) -> Self {
        Self {
            checked_at: Utc::now(),
            timeout_ms,
            status: ProbeStatus::Online { metadata },
        }
    }

    #[must_use]
    pub fn offline(timeout_ms: u64, reason: impl Into<String>) -> Self {
        Self {
            checked_at: Utc::now(),
            timeout_ms,
            status: ProbeStatus::Offline {
                reason: reason.into(),
            },
        }
    }

    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self.status, ProbeStatus::Online { .. })
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            ProbeStatus::Offline { reason } => Some(reason),
            ProbeStatus::Online { .. } => None,
        }
    }
}

/// What `ffprobe -show_format -show_streams` reports about a stream.
/// Unknown fields are dropped
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeMetadata {
    #[serde(default)]
    pub streams: Vec<StreamInfo>,
    pub format: Option<FormatInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub index: Option<u32>,
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub sample_rate: Option<String>,
    pub bit_rate: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatInfo {
    pub format_name: Option<String>,
    pub format_long_name: Option<String>,
    pub nb_streams: Option<u32>,
    pub bit_rate: Option<String>,
    pub duration: Option<String>,
}
