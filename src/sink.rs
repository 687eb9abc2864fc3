use std::{io, path::Path};

use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, instrument};

use crate::classify::{Category, ClassifiedRecord};

pub const PLAYLIST_HEADER: &str = "#EXTM3U\n";

pub const ONLINE_FILE: &str = "online.m3u";
pub const OFFLINE_FILE: &str = "offline.m3u";
pub const DUPLICATES_FILE: &str = "duplicates.m3u";

/// Append-only destination for classified records
pub trait Sink {
    fn write(&mut self, record: &ClassifiedRecord) -> impl Future<Output = io::Result<()>> + Send;

    /// Called once after the last record of a run
    fn finish(&mut self) -> impl Future<Output = io::Result<()>> + Send {
        async { Ok(()) }
    }
}

/// Discards everything. For callers that only want the returned records
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    async fn write(&mut self, _record: &ClassifiedRecord) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for Vec<ClassifiedRecord> {
    async fn write(&mut self, record: &ClassifiedRecord) -> io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// `online.m3u`, `offline.m3u` and `duplicates.m3u` inside an output directory
#[derive(Debug)]
pub struct M3uFiles {
    online: File,
    offline: File,
    duplicates: File,
}

impl M3uFiles {
    /// Creates the directory if needed and starts every playlist with an `#EXTM3U` header,
    /// replacing files left by a previous run
    ///
    /// # Errors
    /// When the directory or one of the files cannot be created
    #[instrument]
    pub async fn create(dir: &Path) -> io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        Ok(Self {
            online: create_playlist(&dir.join(ONLINE_FILE)).await?,
            offline: create_playlist(&dir.join(OFFLINE_FILE)).await?,
            duplicates: create_playlist(&dir.join(DUPLICATES_FILE)).await?,
        })
    }
}

async fn create_playlist(path: &Path) -> io::Result<File> {
    debug!("Creating {path:?}");
    let mut file = File::create(path).await?;
    file.write_all(PLAYLIST_HEADER.as_bytes()).await?;
    Ok(file)
}

impl Sink for M3uFiles {
    async fn write(&mut self, record: &ClassifiedRecord) -> io::Result<()> {
        let file = match record.category() {
            Category::Online => &mut self.online,
            Category::Offline => &mut self.offline,
            Category::Duplicate => &mut self.duplicates,
        };
        file.write_all(record.entry.to_m3u(record.reason()).as_bytes())
            .await
    }

    async fn finish(&mut self) -> io::Result<()> {
        self.online.flush().await?;
        self.offline.flush().await?;
        self.duplicates.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        classify::Classification,
        playlist::PlaylistEntry,
        probe::{ProbeMetadata, ProbeOutcome},
    };

    fn record(url: &str, status: Classification) -> ClassifiedRecord {
        ClassifiedRecord {
            entry: PlaylistEntry::new(url).with_name(url),
            status,
        }
    }

    #[tokio::test]
    async fn writes_each_category_to_its_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let mut files = M3uFiles::create(&out).await.unwrap();
        files
            .write(&record(
                "http://a/1.ts",
                Classification::Probed(ProbeOutcome::online(1_000, ProbeMetadata::default())),
            ))
            .await
            .unwrap();
        files
            .write(&record(
                "http://a/2.ts",
                Classification::Probed(ProbeOutcome::offline(1_000, "Connection refused")),
            ))
            .await
            .unwrap();
        files.finish().await.unwrap();

        let online = tokio::fs::read_to_string(out.join(ONLINE_FILE)).await.unwrap();
        let offline = tokio::fs::read_to_string(out.join(OFFLINE_FILE)).await.unwrap();
        let duplicates = tokio::fs::read_to_string(out.join(DUPLICATES_FILE))
            .await
            .unwrap();

        assert_eq!(online, "#EXTM3U\n#EXTINF:-1,http://a/1.ts\nhttp://a/1.ts\n");
        assert_eq!(
            offline,
            "#EXTM3U\n#EXTINF:-1,http://a/2.ts (Connection refused)\nhttp://a/2.ts\n"
        );
        assert_eq!(duplicates, PLAYLIST_HEADER);
    }

    #[tokio::test]
    async fn create_truncates_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(ONLINE_FILE), "stale")
            .await
            .unwrap();

        let mut files = M3uFiles::create(dir.path()).await.unwrap();
        files.finish().await.unwrap();

        let online = tokio::fs::read_to_string(dir.path().join(ONLINE_FILE))
            .await
            .unwrap();
        assert_eq!(online, PLAYLIST_HEADER);
    }
}
