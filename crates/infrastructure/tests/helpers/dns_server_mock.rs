#![allow(dead_code)]
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

const RCODE_NOERROR: u8 = 0;
const RCODE_SERVFAIL: u8 = 2;
const RCODE_NXDOMAIN: u8 = 3;

/// How the mock server reacts to each query.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Answer(Ipv4Addr),
    /// Answers only this name; NXDOMAIN for everything else.
    AnswerName(String, Ipv4Addr),
    /// Sends a reply with a corrupted ID, then the real one.
    WrongIdThenAnswer { decoy: Ipv4Addr, answer: Ipv4Addr },
    Silent,
    NxDomain,
    ServFail,
    /// Sets TC over UDP; the full answer is served over TCP on the same port.
    Truncated(Ipv4Addr),
}

pub struct MockDnsServer {
    addr: SocketAddr,
    qnames: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let tcp = match behavior {
            MockBehavior::Truncated(_) => Some(TcpListener::bind(addr).await?),
            _ => None,
        };

        let qnames = Arc::new(Mutex::new(Vec::new()));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        if let (Some(listener), MockBehavior::Truncated(ip)) = (tcp, behavior.clone()) {
            tokio::spawn(serve_tcp(listener, ip));
        }

        let seen = Arc::clone(&qnames);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let query = &buf[..len];
                            let qname = parse_qname(query);
                            seen.lock().unwrap().push(qname.clone());
                            for response in Self::respond(&behavior, query, &qname) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            qnames,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Names queried so far, in arrival order.
    pub fn qnames(&self) -> Vec<String> {
        self.qnames.lock().unwrap().clone()
    }

    fn respond(behavior: &MockBehavior, query: &[u8], qname: &str) -> Vec<Vec<u8>> {
        match behavior {
            MockBehavior::Answer(ip) => {
                vec![build_response(query, RCODE_NOERROR, false, Some(*ip))]
            }
            MockBehavior::AnswerName(name, ip) if name == qname => {
                vec![build_response(query, RCODE_NOERROR, false, Some(*ip))]
            }
            MockBehavior::AnswerName(_, _) | MockBehavior::NxDomain => {
                vec![build_response(query, RCODE_NXDOMAIN, false, None)]
            }
            MockBehavior::WrongIdThenAnswer { decoy, answer } => {
                let mut wrong = build_response(query, RCODE_NOERROR, false, Some(*decoy));
                wrong[0] ^= 0xFF;
                wrong[1] ^= 0xFF;
                vec![
                    wrong,
                    build_response(query, RCODE_NOERROR, false, Some(*answer)),
                ]
            }
            MockBehavior::Silent => vec![],
            MockBehavior::ServFail => vec![build_response(query, RCODE_SERVFAIL, false, None)],
            MockBehavior::Truncated(_) => vec![build_response(query, RCODE_NOERROR, true, None)],
        }
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve_tcp(listener: TcpListener, ip: Ipv4Addr) {
    while let Ok((mut stream, _)) = listener.accept().await {
        tokio::spawn(async move {
            let mut len = [0u8; 2];
            if stream.read_exact(&mut len).await.is_err() {
                return;
            }
            let mut query = vec![0u8; u16::from_be_bytes(len) as usize];
            if stream.read_exact(&mut query).await.is_err() {
                return;
            }
            let response = build_response(&query, RCODE_NOERROR, false, Some(ip));
            let _ = stream
                .write_all(&(response.len() as u16).to_be_bytes())
                .await;
            let _ = stream.write_all(&response).await;
        });
    }
}

/// Lower-cased question name of a query, without the trailing dot.
pub fn parse_qname(query: &[u8]) -> String {
    let mut labels = Vec::new();
    let mut pos = 12;
    while let Some(&len) = query.get(pos) {
        if len == 0 {
            break;
        }
        let start = pos + 1;
        let end = start + len as usize;
        let Some(label) = query.get(start..end) else {
            break;
        };
        labels.push(String::from_utf8_lossy(label).to_ascii_lowercase());
        pos = end;
    }
    labels.join(".")
}

/// Reply echoing the query's ID and question, optionally with one A record.
pub fn build_response(
    query: &[u8],
    rcode: u8,
    truncated: bool,
    answer: Option<Ipv4Addr>,
) -> Vec<u8> {
    if query.len() < 12 {
        return vec![];
    }

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&query[0..2]);
    response.push(if truncated { 0x83 } else { 0x81 });
    response.push(0x80 | rcode);
    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(&[0x00, u8::from(answer.is_some())]);
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    response.extend_from_slice(&query[12..]);

    if let Some(ip) = answer {
        response.extend_from_slice(&[
            0xc0, 0x0c, // pointer to question name
            0x00, 0x01, // A
            0x00, 0x01, // IN
            0x00, 0x00, 0x00, 0x3c, // TTL 60
            0x00, 0x04,
        ]);
        response.extend_from_slice(&ip.octets());
    }

    response
}
