use async_trait::async_trait;
use netstack_application::ports::{JobKind, JobOutcome, UrlRequestJob};
use netstack_domain::NetError;

/// Job that fails with a fixed error as soon as it starts.
pub struct UrlRequestErrorJob {
    error: NetError,
}

impl UrlRequestErrorJob {
    pub fn new(error: NetError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl UrlRequestJob for UrlRequestErrorJob {
    fn kind(&self) -> JobKind {
        JobKind::Error(self.error)
    }

    async fn start(&mut self) -> Result<JobOutcome, NetError> {
        Err(self.error)
    }

    fn cancel(&mut self) {
        self.error = NetError::Aborted;
    }
}
