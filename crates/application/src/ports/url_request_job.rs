use super::NetworkDelegate;
use async_trait::async_trait;
use netstack_domain::{NetError, UrlRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Fails with the carried error as soon as it is started.
    Error(NetError),
    File,
    FileDirectory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Data(Vec<u8>),
    DirectoryListing(Vec<DirectoryEntry>),
    /// The job found that another URL should serve this request.
    Redirect(UrlRequest),
}

#[async_trait]
pub trait UrlRequestJob: Send {
    fn kind(&self) -> JobKind;

    async fn start(&mut self) -> Result<JobOutcome, NetError>;

    /// After cancel, `start` fails with `NetError::Aborted`.
    fn cancel(&mut self);
}

/// Builds the job for one URL scheme.
pub trait ProtocolHandler: Send + Sync {
    fn maybe_create_job(
        &self,
        request: &UrlRequest,
        network_delegate: Option<&dyn NetworkDelegate>,
    ) -> Box<dyn UrlRequestJob>;
}

/// Routes a request to the handler registered for its scheme.
pub trait UrlRequestJobFactory: Send + Sync {
    fn create_job(
        &self,
        request: &UrlRequest,
        network_delegate: Option<&dyn NetworkDelegate>,
    ) -> Box<dyn UrlRequestJob>;

    fn is_handled_scheme(&self, scheme: &str) -> bool;
}
