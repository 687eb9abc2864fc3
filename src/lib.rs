#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::cargo)]
#![warn(clippy::perf)]
#![warn(clippy::complexity)]
#![warn(clippy::style)]
#![allow(clippy::multiple_crate_versions)]

//! Sorts the entries of an `.m3u` playlist into online, offline and duplicate
//! streams by probing each URL with `ffprobe`.

pub mod cache;
pub mod checker;
pub mod classify;
pub mod config;
pub mod error;
pub mod ffprobe;
pub mod playlist;
pub mod probe;
pub mod sink;
pub mod stats;
pub mod util;

pub use checker::{Checker, Report};
pub use classify::{Category, Classification, ClassifiedRecord};
pub use config::CheckerConfig;
pub use error::{CheckError, ParseError};
pub use ffprobe::Ffprobe;
pub use playlist::{PlaylistEntry, PlaylistSource};
pub use probe::{ProbeOutcome, ProbeStatus, Prober};
pub use sink::{M3uFiles, NullSink, Sink};
pub use stats::RunStats;

/// Loads `source` and checks every entry, returning the records in playlist order.
/// Nothing is written to disk.
///
/// # Errors
/// When the playlist cannot be read or parsed
pub async fn check(
    source: PlaylistSource,
    config: &CheckerConfig,
) -> Result<Vec<ClassifiedRecord>, CheckError> {
    let entries = source.load(config).await?;
    let mut checker = Checker::new(Ffprobe::new(config), NullSink);
    Ok(checker.run(entries).await?.records)
}
