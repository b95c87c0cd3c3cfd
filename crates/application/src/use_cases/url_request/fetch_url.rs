use crate::ports::{JobKind, JobOutcome, NetworkDelegate, UrlRequestJobFactory};
use netstack_domain::{NetError, UrlRequest};
use std::sync::Arc;
use tracing::{debug, warn};

const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// The URL that finally produced the outcome, after redirects.
    pub final_request: UrlRequest,
    pub job_kind: JobKind,
    pub outcome: JobOutcome,
}

/// Dispatches a request, runs the job and follows job-issued redirects.
pub struct FetchUrlUseCase {
    jobs: Arc<dyn UrlRequestJobFactory>,
    network_delegate: Option<Arc<dyn NetworkDelegate>>,
}

impl FetchUrlUseCase {
    pub fn new(
        jobs: Arc<dyn UrlRequestJobFactory>,
        network_delegate: Option<Arc<dyn NetworkDelegate>>,
    ) -> Self {
        Self {
            jobs,
            network_delegate,
        }
    }

    pub async fn execute(&self, url: &str) -> Result<FetchResult, NetError> {
        let mut request = UrlRequest::parse(url)?;

        for _ in 0..=MAX_REDIRECTS {
            let mut job = self
                .jobs
                .create_job(&request, self.network_delegate.as_deref());
            let job_kind = job.kind();

            match job.start().await {
                Ok(JobOutcome::Redirect(next)) => {
                    debug!(from = %request, to = %next, "Following job redirect");
                    request = next;
                }
                Ok(outcome) => {
                    return Ok(FetchResult {
                        final_request: request,
                        job_kind,
                        outcome,
                    });
                }
                Err(e) => {
                    warn!(url = %request, error = %e, code = e.code(), "Request failed");
                    return Err(e);
                }
            }
        }

        warn!(url = %request, "Too many redirects");
        Err(NetError::Failed)
    }
}
