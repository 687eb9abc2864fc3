use serde::Serialize;

use crate::{
    error::CheckError,
    playlist::PlaylistEntry,
    probe::{ProbeOutcome, ProbeStatus},
    sink::Sink,
    stats::RunStats,
};

/// Which output a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Online,
    Offline,
    Duplicate,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Duplicate => "duplicate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    /// URL was already checked earlier in the run
    Duplicate,
    Probed(ProbeOutcome),
}

/// A playlist entry together with what the run decided about it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub entry: PlaylistEntry,
    pub status: Classification,
}

impl ClassifiedRecord {
    #[must_use]
    pub const fn category(&self) -> Category {
        match &self.status {
            Classification::Duplicate => Category::Duplicate,
            Classification::Probed(outcome) => match outcome.status {
                ProbeStatus::Online { .. } => Category::Online,
                ProbeStatus::Offline { .. } => Category::Offline,
            },
        }
    }

    /// Why the stream is offline
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            Classification::Probed(outcome) => outcome.reason(),
            Classification::Duplicate => None,
        }
    }
}

/// Records a repeated URL without probing it
///
/// # Errors
/// When the sink cannot be written
pub async fn classify_duplicate<S: Sink>(
    entry: PlaylistEntry,
    stats: &mut RunStats,
    sink: &mut S,
) -> Result<ClassifiedRecord, CheckError> {
    let record = ClassifiedRecord {
        entry,
        status: Classification::Duplicate,
    };
    persist(&record, sink).await?;
    stats.duplicates += 1;
    Ok(record)
}

/// Records the outcome of a probe as online or offline
///
/// # Errors
/// When the sink cannot be written
pub async fn classify_outcome<S: Sink>(
    entry: PlaylistEntry,
    outcome: ProbeOutcome,
    stats: &mut RunStats,
    sink: &mut S,
) -> Result<ClassifiedRecord, CheckError> {
    let online = outcome.is_online();
    let record = ClassifiedRecord {
        entry,
        status: Classification::Probed(outcome),
    };
    persist(&record, sink).await?;
    if online {
        stats.online += 1;
    } else {
        stats.offline += 1;
    }
    Ok(record)
}

async fn persist<S: Sink>(record: &ClassifiedRecord, sink: &mut S) -> Result<(), CheckError> {
    sink.write(record)
        .await
        .map_err(|source| CheckError::Sink {
            category: record.category().as_str(),
            source,
        })
}
