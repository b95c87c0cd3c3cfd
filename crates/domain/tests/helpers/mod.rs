pub mod builders;

pub use builders::DnsConfigBuilder;
