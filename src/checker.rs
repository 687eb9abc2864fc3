use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    cache::DedupCache,
    classify::{ClassifiedRecord, classify_duplicate, classify_outcome},
    error::CheckError,
    playlist::PlaylistEntry,
    probe::{ProbeStatus, Prober},
    sink::Sink,
    stats::RunStats,
};

/// Everything a finished run produced
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// One record per entry that had a URL, in playlist order
    pub records: Vec<ClassifiedRecord>,
    pub stats: RunStats,
}

/// Walks a playlist one entry at a time, probing every URL once and sending
/// each result to the sink
#[derive(Debug)]
pub struct Checker<P, S> {
    prober: P,
    sink: S,
    progress: Option<ProgressBar>,
}

impl<P: Prober, S: Sink> Checker<P, S> {
    pub const fn new(prober: P, sink: S) -> Self {
        Self {
            prober,
            sink,
            progress: None,
        }
    }

    /// Ticks `bar` once per entry
    #[must_use]
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Checks `entries` in order. The dedup cache only lives for this call
    ///
    /// # Errors
    /// When a record cannot be written to the sink. Unreachable streams are
    /// not errors, they are classified offline
    #[instrument(skip_all, fields(total = entries.len()))]
    pub async fn run(&mut self, entries: Vec<PlaylistEntry>) -> Result<Report, CheckError> {
        let mut stats = RunStats::new(entries.len());
        let mut cache = DedupCache::new();
        let mut records = Vec::with_capacity(entries.len());

        debug!("Checking {} items...", stats.total);
        if let Some(bar) = &self.progress {
            bar.set_length(u64::try_from(stats.total).unwrap_or(u64::MAX));
        }

        for entry in entries {
            if let Some(bar) = &self.progress {
                bar.inc(1);
            }

            if !entry.has_url() {
                debug!("Skipping {:?}: no URL", entry.name);
                stats.skipped += 1;
                continue;
            }

            if cache.contains(&entry) {
                debug!("{} (duplicate)", entry.url);
                records.push(classify_duplicate(entry, &mut stats, &mut self.sink).await?);
                continue;
            }

            cache.insert(&entry);

            let outcome = self.prober.probe(&entry).await;
            match &outcome.status {
                ProbeStatus::Online { .. } => debug!("{} (online)", entry.url),
                ProbeStatus::Offline { reason } => debug!("{} ({reason})", entry.url),
            }

            records.push(classify_outcome(entry, outcome, &mut stats, &mut self.sink).await?);
        }

        self.sink
            .finish()
            .await
            .map_err(|source| CheckError::Sink {
                category: "playlist",
                source,
            })?;

        if let Some(bar) = &self.progress {
            bar.finish_and_clear();
        }

        Ok(Report { records, stats })
    }
}
