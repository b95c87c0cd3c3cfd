mod address_sorter;
mod dns_client;
mod dns_transaction;
mod network_delegate;
mod randomness;
mod socket_factory;
mod url_request_job;

pub use address_sorter::AddressSorter;
pub use dns_client::DnsClient;
pub use dns_transaction::{DnsAnswer, DnsTransaction, DnsTransactionFactory, TransactionState};
pub use network_delegate::NetworkDelegate;
pub use randomness::RandIntFn;
pub use socket_factory::{ClientSocketFactory, DatagramSocket, StreamSocket};
pub use url_request_job::{
    DirectoryEntry, JobKind, JobOutcome, ProtocolHandler, UrlRequestJob, UrlRequestJobFactory,
};

// Re-export for convenience
pub use netstack_domain::{DnsQuery, UrlRequest};
