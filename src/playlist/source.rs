use std::path::PathBuf;

use tokio::io::AsyncReadExt;
use tracing::{debug, instrument};

use super::{PlaylistEntry, parse};
use crate::{config::CheckerConfig, error::ParseError, util::init_http_client};

/// Where a run's playlist comes from
#[derive(Debug, Clone)]
pub enum PlaylistSource {
    Stdin,
    File(PathBuf),
    Remote(String),
    /// Entries that were already parsed by the caller
    Entries(Vec<PlaylistEntry>),
}

impl PlaylistSource {
    /// Interprets a command line argument. No argument or `-` reads stdin
    #[must_use]
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Self::Stdin,
            Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
                Self::Remote(s.to_string())
            }
            Some(s) => Self::File(PathBuf::from(s)),
        }
    }

    /// Reads and parses the playlist
    ///
    /// # Errors
    /// Any failure to read, fetch or parse the playlist
    #[instrument(skip_all)]
    pub async fn load(self, config: &CheckerConfig) -> Result<Vec<PlaylistEntry>, ParseError> {
        let bytes = match self {
            Self::Entries(entries) => return Ok(entries),
            Self::File(path) => tokio::fs::read(&path)
                .await
                .map_err(|source| ParseError::ReadFile { path, source })?,
            Self::Stdin => {
                let mut bytes = Vec::new();
                tokio::io::stdin()
                    .read_to_end(&mut bytes)
                    .await
                    .map_err(ParseError::ReadStdin)?;
                bytes
            }
            Self::Remote(url) => fetch(&url, config).await?,
        };

        debug!("Read {} bytes of playlist", bytes.len());
        // Playlists in legacy encodings still list valid URLs
        parse(&String::from_utf8_lossy(&bytes))
    }
}

async fn fetch(url: &str, config: &CheckerConfig) -> Result<Vec<u8>, ParseError> {
    let fetch_error = |source| ParseError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = init_http_client(config.insecure, config.timeout()).map_err(fetch_error)?;
    let res = client.get(url).send().await.map_err(fetch_error)?;

    if !res.status().is_success() {
        return Err(ParseError::FetchStatus {
            url: url.to_string(),
            status: res.status().as_u16(),
        });
    }

    Ok(res.bytes().await.map_err(fetch_error)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_from_arg() {
        assert!(matches!(PlaylistSource::from_arg(None), PlaylistSource::Stdin));
        assert!(matches!(PlaylistSource::from_arg(Some("-")), PlaylistSource::Stdin));
        assert!(matches!(
            PlaylistSource::from_arg(Some("https://iptv-org.github.io/iptv/index.m3u")),
            PlaylistSource::Remote(_)
        ));
        assert!(matches!(
            PlaylistSource::from_arg(Some("./list.m3u")),
            PlaylistSource::File(_)
        ));
    }

    #[tokio::test]
    async fn loads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.m3u");
        tokio::fs::write(&path, "#EXTM3U\n#EXTINF:-1,A\nhttp://a/1.ts\n")
            .await
            .unwrap();

        let entries = PlaylistSource::File(path)
            .load(&CheckerConfig::default())
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn non_utf8_titles_are_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.m3u");
        tokio::fs::write(&path, b"#EXTM3U\n#EXTINF:-1,Caf\xe9 TV\nhttp://a/cafe.ts\n")
            .await
            .unwrap();

        let entries = PlaylistSource::File(path)
            .load(&CheckerConfig::default())
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name.as_deref(), Some("Caf\u{fffd} TV"));
        assert_eq!(entries[0].url, "http://a/cafe.ts");
    }

    #[tokio::test]
    async fn missing_file_is_a_parse_error() {
        let err = PlaylistSource::File(PathBuf::from("/nonexistent/list.m3u"))
            .load(&CheckerConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::ReadFile { .. }));
    }
}
