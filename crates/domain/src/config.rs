pub mod dns;
pub mod errors;
pub mod files;
pub mod logging;
pub mod root;

pub use dns::{DnsConfig, SocketPoolConfig};
pub use errors::ConfigError;
pub use files::FileAccessConfig;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
