use super::file_dir_job::list_directory;
use super::file_url::with_trailing_slash;
use async_trait::async_trait;
use netstack_application::ports::{JobKind, JobOutcome, UrlRequestJob};
use netstack_domain::{NetError, UrlRequest};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a local file. A path that turns out to be a directory is
/// redirected to the slash-terminated URL.
pub struct UrlRequestFileJob {
    request: UrlRequest,
    path: PathBuf,
    cancelled: bool,
}

impl UrlRequestFileJob {
    pub fn new(request: UrlRequest, path: PathBuf) -> Self {
        Self {
            request,
            path,
            cancelled: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UrlRequestJob for UrlRequestFileJob {
    fn kind(&self) -> JobKind {
        JobKind::File
    }

    async fn start(&mut self) -> Result<JobOutcome, NetError> {
        if self.cancelled {
            return Err(NetError::Aborted);
        }
        // Invalid file names map to an empty path.
        if self.path.as_os_str().is_empty() {
            return Err(NetError::FileNotFound);
        }

        let metadata = tokio::fs::metadata(&self.path).await?;
        if metadata.is_dir() {
            if self.request.url().path().ends_with('/') {
                return list_directory(&self.path)
                    .await
                    .map(JobOutcome::DirectoryListing);
            }
            let target = UrlRequest::new(with_trailing_slash(self.request.url()));
            debug!(from = %self.request, to = %target, "Redirecting to directory URL");
            return Ok(JobOutcome::Redirect(target));
        }

        let data = tokio::fs::read(&self.path).await?;
        debug!(path = %self.path.display(), bytes = data.len(), "File read");
        Ok(JobOutcome::Data(data))
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }
}
