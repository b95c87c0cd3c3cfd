#![allow(dead_code)]
use async_trait::async_trait;
use netstack_application::ports::{ClientSocketFactory, DatagramSocket, StreamSocket};
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Produces the datagrams "received" after a send: `(payload, source)`.
pub type Responder = Arc<dyn Fn(&[u8], SocketAddr) -> Vec<(Vec<u8>, SocketAddr)> + Send + Sync>;

/// Produces the reply message for one TCP query, without length prefix.
pub type StreamResponder = Arc<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;

/// Socket factory that never touches the network.
pub struct MemorySocketFactory {
    responder: Responder,
    stream_responder: Option<StreamResponder>,
    created: AtomicUsize,
}

impl MemorySocketFactory {
    /// Sockets that swallow queries and never answer.
    pub fn silent() -> Arc<Self> {
        Self::with_responder(Arc::new(|_: &[u8], _: SocketAddr| Vec::new()))
    }

    pub fn with_responder(responder: Responder) -> Arc<Self> {
        Arc::new(Self {
            responder,
            stream_responder: None,
            created: AtomicUsize::new(0),
        })
    }

    /// Stream connections succeed and answer through `stream_responder`.
    pub fn with_stream_responder(
        responder: Responder,
        stream_responder: StreamResponder,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder,
            stream_responder: Some(stream_responder),
            created: AtomicUsize::new(0),
        })
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientSocketFactory for MemorySocketFactory {
    fn create_datagram_socket(&self, server: SocketAddr) -> io::Result<Box<dyn DatagramSocket>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Box::new(MemoryDatagramSocket {
            peer: server,
            responder: Arc::clone(&self.responder),
            tx,
            rx: Mutex::new(rx),
        }))
    }

    async fn connect_stream_socket(
        &self,
        _server: SocketAddr,
        _timeout: Duration,
    ) -> io::Result<Box<dyn StreamSocket>> {
        match &self.stream_responder {
            Some(responder) => Ok(Box::new(MemoryStreamSocket {
                responder: Arc::clone(responder),
                written: Vec::new(),
                readable: Vec::new(),
            })),
            None => Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "no streams in memory",
            )),
        }
    }
}

/// Answers every complete length-prefixed message written to it.
struct MemoryStreamSocket {
    responder: StreamResponder,
    written: Vec<u8>,
    readable: Vec<u8>,
}

#[async_trait]
impl StreamSocket for MemoryStreamSocket {
    async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(buf);
        while self.written.len() >= 2 {
            let len = u16::from_be_bytes([self.written[0], self.written[1]]) as usize;
            if self.written.len() < 2 + len {
                break;
            }
            let message: Vec<u8> = self.written.drain(..2 + len).skip(2).collect();
            let reply = (self.responder)(&message);
            self.readable
                .extend_from_slice(&(reply.len() as u16).to_be_bytes());
            self.readable.extend_from_slice(&reply);
        }
        Ok(())
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        if self.readable.len() < buf.len() {
            return Err(io::ErrorKind::UnexpectedEof.into());
        }
        let chunk: Vec<u8> = self.readable.drain(..buf.len()).collect();
        buf.copy_from_slice(&chunk);
        Ok(())
    }
}

struct MemoryDatagramSocket {
    peer: SocketAddr,
    responder: Responder,
    tx: mpsc::UnboundedSender<(Vec<u8>, SocketAddr)>,
    rx: Mutex<mpsc::UnboundedReceiver<(Vec<u8>, SocketAddr)>>,
}

#[async_trait]
impl DatagramSocket for MemoryDatagramSocket {
    async fn send(&self, buf: &[u8]) -> io::Result<usize> {
        for datagram in (self.responder)(buf, self.peer) {
            let _ = self.tx.send(datagram);
        }
        Ok(buf.len())
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        let mut rx = self.rx.lock().await;
        match rx.recv().await {
            Some((payload, from)) => {
                let len = payload.len().min(buf.len());
                buf[..len].copy_from_slice(&payload[..len]);
                Ok((len, from))
            }
            None => std::future::pending().await,
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}
