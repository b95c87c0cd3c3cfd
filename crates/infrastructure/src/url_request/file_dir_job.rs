use async_trait::async_trait;
use netstack_application::ports::{DirectoryEntry, JobKind, JobOutcome, UrlRequestJob};
use netstack_domain::NetError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lists a local directory.
pub struct UrlRequestFileDirJob {
    path: PathBuf,
    cancelled: bool,
}

impl UrlRequestFileDirJob {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cancelled: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UrlRequestJob for UrlRequestFileDirJob {
    fn kind(&self) -> JobKind {
        JobKind::FileDirectory
    }

    async fn start(&mut self) -> Result<JobOutcome, NetError> {
        if self.cancelled {
            return Err(NetError::Aborted);
        }
        list_directory(&self.path)
            .await
            .map(JobOutcome::DirectoryListing)
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Entries sorted by name.
pub(crate) async fn list_directory(path: &Path) -> Result<Vec<DirectoryEntry>, NetError> {
    let mut reader = tokio::fs::read_dir(path).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let metadata = entry.metadata().await?;
        entries.push(DirectoryEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: metadata.is_dir(),
            size: if metadata.is_dir() { 0 } else { metadata.len() },
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(path = %path.display(), entries = entries.len(), "Directory listed");
    Ok(entries)
}
