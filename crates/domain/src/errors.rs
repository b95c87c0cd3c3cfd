use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid DNS configuration: {0}")]
    InvalidConfiguration(String),

    #[error("No valid DNS configuration")]
    NoConfiguration,

    #[error("Socket pool exhausted for {server}")]
    PoolExhausted { server: SocketAddr },

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Response mismatch: {0}")]
    ResponseMismatch(String),

    #[error("Domain not found (NXDOMAIN)")]
    NxDomain,

    #[error("Server failure: {0}")]
    ServerFailed(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transaction cancelled")]
    Cancelled,
}

impl DomainError {
    /// Errors that end the whole transaction instead of moving on to the
    /// next attempt.
    pub fn is_fatal_for_transaction(&self) -> bool {
        matches!(
            self,
            DomainError::PoolExhausted { .. }
                | DomainError::InvalidDomainName(_)
                | DomainError::NoConfiguration
                | DomainError::Cancelled
        )
    }
}
