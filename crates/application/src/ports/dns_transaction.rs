use netstack_domain::{DnsQuery, DomainError, RecordType};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::debug;

/// Answer delivered by a completed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    /// The name that was actually answered, after search-list expansion.
    pub qname: Arc<str>,
    pub record_type: RecordType,
    pub addresses: Vec<IpAddr>,
    pub cname: Option<String>,
    pub min_ttl: Option<u32>,
    pub server: SocketAddr,
    pub transaction_id: u16,
    pub via_tcp: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Pending,
    Completed,
    Cancelled,
}

pub type TransactionResult = Result<DnsAnswer, DomainError>;

/// Caller-side handle of one in-flight query.
///
/// The result is delivered at most once: `result` consumes the handle.
/// Dropping a pending handle cancels the query.
pub struct DnsTransaction {
    id: u16,
    query: DnsQuery,
    result_rx: Option<oneshot::Receiver<TransactionResult>>,
    task: AbortHandle,
    cancelled: bool,
}

impl DnsTransaction {
    pub fn new(
        id: u16,
        query: DnsQuery,
        result_rx: oneshot::Receiver<TransactionResult>,
        task: AbortHandle,
    ) -> Self {
        Self {
            id,
            query,
            result_rx: Some(result_rx),
            task,
            cancelled: false,
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn hostname(&self) -> &str {
        &self.query.domain
    }

    pub fn record_type(&self) -> RecordType {
        self.query.record_type
    }

    pub fn state(&self) -> TransactionState {
        if self.cancelled {
            TransactionState::Cancelled
        } else if self.task.is_finished() {
            TransactionState::Completed
        } else {
            TransactionState::Pending
        }
    }

    /// Stops the query. The attempt task is aborted, which drops its socket
    /// guard, and no result will be delivered afterwards.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.task.abort();
        self.result_rx = None;
        debug!(id = self.id, domain = %self.query.domain, "Transaction cancelled");
    }

    /// Waits for the outcome.
    pub async fn result(mut self) -> TransactionResult {
        let Some(rx) = self.result_rx.take() else {
            return Err(DomainError::Cancelled);
        };
        rx.await.unwrap_or(Err(DomainError::Cancelled))
    }
}

impl Drop for DnsTransaction {
    fn drop(&mut self) {
        // No-op once the task has finished.
        self.task.abort();
    }
}

impl std::fmt::Debug for DnsTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsTransaction")
            .field("id", &self.id)
            .field("query", &self.query)
            .field("state", &self.state())
            .finish()
    }
}

/// Creates transactions bound to one session.
pub trait DnsTransactionFactory: Send + Sync {
    /// Allocates a transaction and starts the query immediately. Must be
    /// called from within a tokio runtime.
    fn create_transaction(
        &self,
        hostname: &str,
        record_type: RecordType,
    ) -> Result<DnsTransaction, DomainError>;
}
