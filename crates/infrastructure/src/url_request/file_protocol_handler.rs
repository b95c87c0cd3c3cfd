use super::error_job::UrlRequestErrorJob;
use super::file_dir_job::UrlRequestFileDirJob;
use super::file_job::UrlRequestFileJob;
use super::file_url::{ends_with_separator, file_url_to_path};
use netstack_application::ports::{NetworkDelegate, ProtocolHandler, UrlRequestJob};
use netstack_domain::{NetError, UrlRequest};
use std::path::Path;
use tracing::debug;

/// Handler for the `file:` scheme.
///
/// The job shape is decided from the URL alone: no filesystem call happens
/// until the job is started.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileProtocolHandler;

impl FileProtocolHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ProtocolHandler for FileProtocolHandler {
    fn maybe_create_job(
        &self,
        request: &UrlRequest,
        network_delegate: Option<&dyn NetworkDelegate>,
    ) -> Box<dyn UrlRequestJob> {
        let path = file_url_to_path(request.url()).unwrap_or_default();

        let allowed = network_delegate.is_some_and(|d| d.can_access_file(request, &path));
        if !allowed {
            debug!(url = %request, "No file access, creating error job");
            return Box::new(UrlRequestErrorJob::new(NetError::AccessDenied));
        }

        if is_directory_path(&path) {
            Box::new(UrlRequestFileDirJob::new(path))
        } else {
            Box::new(UrlRequestFileJob::new(request.clone(), path))
        }
    }
}

fn is_directory_path(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_absolute() && ends_with_separator(path)
}
