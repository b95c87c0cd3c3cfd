//! netstack domain layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod net_error;
pub mod url_request;

pub use config::{
    CliOverrides, Config, ConfigError, DnsConfig, FileAccessConfig, LoggingConfig,
    SocketPoolConfig,
};
pub use dns_query::DnsQuery;
pub use dns_record::RecordType;
pub use errors::DomainError;
pub use net_error::NetError;
pub use url_request::UrlRequest;
