pub mod dispatcher;
pub mod error_job;
pub mod file_dir_job;
pub mod file_job;
pub mod file_protocol_handler;
pub mod file_url;
pub mod network_delegate;

pub use dispatcher::ProtocolDispatcher;
pub use error_job::UrlRequestErrorJob;
pub use file_dir_job::UrlRequestFileDirJob;
pub use file_job::UrlRequestFileJob;
pub use file_protocol_handler::FileProtocolHandler;
pub use network_delegate::PathPrefixNetworkDelegate;
