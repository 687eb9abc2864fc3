use std::path::PathBuf;

use thiserror::Error;

/// The playlist could not be read or is not a playlist at all.
/// Always fatal to a run.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unable to read playlist file {path:?}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to read playlist from stdin")]
    ReadStdin(#[source] std::io::Error),

    #[error("Unable to fetch playlist from {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetching playlist from {url} returned HTTP {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("Playlist is not valid: missing #EXTM3U header")]
    MissingHeader,
}

/// Errors that terminate a run
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Unable to write {category} record")]
    Sink {
        category: &'static str,
        #[source]
        source: std::io::Error,
    },
}
