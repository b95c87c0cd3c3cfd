pub mod tcp;
pub mod udp;

pub use tcp::{read_with_length_prefix, send_with_length_prefix, TcpStreamSocket};
pub use udp::{UdpDatagramSocket, UdpSocketFactory};
