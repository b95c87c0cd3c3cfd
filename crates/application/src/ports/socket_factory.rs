use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

/// A datagram socket connected toward a single server.
#[async_trait]
pub trait DatagramSocket: Send + Sync {
    async fn send(&self, buf: &[u8]) -> io::Result<usize>;

    /// Receives one datagram and reports where it came from so callers can
    /// reject replies that did not originate from the queried server.
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;

    fn peer_addr(&self) -> SocketAddr;
}

#[async_trait]
pub trait StreamSocket: Send {
    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    async fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()>;
}

/// Source of raw sockets. The resolution core never opens sockets itself.
#[async_trait]
pub trait ClientSocketFactory: Send + Sync {
    fn create_datagram_socket(&self, server: SocketAddr) -> io::Result<Box<dyn DatagramSocket>>;

    async fn connect_stream_socket(
        &self,
        server: SocketAddr,
        timeout: Duration,
    ) -> io::Result<Box<dyn StreamSocket>>;
}
