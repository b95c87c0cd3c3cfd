//! UDP transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Sockets are connected to a single server so the kernel filters most
//! foreign datagrams; the transaction still checks every source address.

use super::tcp::TcpStreamSocket;
use async_trait::async_trait;
use netstack_application::ports::{ClientSocketFactory, DatagramSocket, StreamSocket};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{TcpStream, UdpSocket};
use tracing::debug;

const RECV_BUFFER_SIZE: usize = 256 * 1024;
const SEND_BUFFER_SIZE: usize = 128 * 1024;

pub struct UdpDatagramSocket {
    socket: UdpSocket,
    peer: SocketAddr,
}

#[async_trait]
impl DatagramSocket for UdpDatagramSocket {
    async fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.socket.send(buf).await
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        self.socket.recv_from(buf).await
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

/// Opens real OS sockets. Must be used from within a tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpSocketFactory;

impl UdpSocketFactory {
    pub fn new() -> Self {
        Self
    }

    fn open(server: SocketAddr) -> io::Result<std::net::UdpSocket> {
        let domain = if server.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_recv_buffer_size(RECV_BUFFER_SIZE)?;
        socket.set_send_buffer_size(SEND_BUFFER_SIZE)?;

        let bind_addr: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        socket.bind(&bind_addr.into())?;
        socket.connect(&server.into())?;
        socket.set_nonblocking(true)?;

        Ok(socket.into())
    }
}

#[async_trait]
impl ClientSocketFactory for UdpSocketFactory {
    fn create_datagram_socket(&self, server: SocketAddr) -> io::Result<Box<dyn DatagramSocket>> {
        let socket = UdpSocket::from_std(Self::open(server)?)?;
        debug!(server = %server, local = ?socket.local_addr().ok(), "Opened UDP socket");
        Ok(Box::new(UdpDatagramSocket {
            socket,
            peer: server,
        }))
    }

    async fn connect_stream_socket(
        &self,
        server: SocketAddr,
        timeout: Duration,
    ) -> io::Result<Box<dyn StreamSocket>> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(server))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("Timeout connecting to TCP server {}", server),
                )
            })??;
        stream.set_nodelay(true)?;
        debug!(server = %server, "Opened TCP connection");
        Ok(Box::new(TcpStreamSocket::new(stream)))
    }
}
