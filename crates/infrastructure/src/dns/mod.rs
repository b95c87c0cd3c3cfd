pub mod address_sorter;
pub mod client;
pub mod forwarding;
pub mod rand;
pub mod search;
pub mod session;
pub mod socket_pool;
pub mod transaction;
pub mod transport;

pub use address_sorter::{
    Rfc6724AddressSorter, SourceAddress, SourceAddressLookup, SystemSourceLookup,
};
pub use client::DnsClientImpl;
pub use rand::crypto_rand_int;
pub use session::DnsSession;
pub use socket_pool::{DnsSocketPool, PoolStats, PooledSocket};
pub use transaction::DnsTransactionFactoryImpl;
pub use transport::UdpSocketFactory;
