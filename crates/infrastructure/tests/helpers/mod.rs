pub mod builders;
pub mod dns_server_mock;
pub mod memory_sockets;

pub use builders::*;
pub use dns_server_mock::*;
pub use memory_sockets::*;
