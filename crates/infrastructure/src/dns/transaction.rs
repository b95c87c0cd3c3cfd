use super::forwarding::{DnsResponse, MessageBuilder, ResponseMatcher, ResponseParser};
use super::search;
use super::session::DnsSession;
use super::transport::{read_with_length_prefix, send_with_length_prefix};
use hickory_proto::op::ResponseCode;
use netstack_application::ports::{DnsAnswer, DnsTransaction, DnsTransactionFactory};
use netstack_domain::{DnsQuery, DomainError, RecordType};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

const MAX_DOMAIN_LEN: usize = 253;

/// Creates transactions bound to one session.
pub struct DnsTransactionFactoryImpl {
    session: Arc<DnsSession>,
}

impl DnsTransactionFactoryImpl {
    pub fn create_factory(session: Arc<DnsSession>) -> Arc<dyn DnsTransactionFactory> {
        Arc::new(Self { session })
    }

    pub fn session(&self) -> &Arc<DnsSession> {
        &self.session
    }
}

impl DnsTransactionFactory for DnsTransactionFactoryImpl {
    fn create_transaction(
        &self,
        hostname: &str,
        record_type: RecordType,
    ) -> Result<DnsTransaction, DomainError> {
        validate_hostname(hostname)?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| DomainError::IoError(format!("No async runtime: {}", e)))?;

        let query = DnsQuery::new(hostname, record_type);
        let id = self.session.next_query_id()?;
        let (tx, rx) = oneshot::channel();

        let session = Arc::clone(&self.session);
        let task_query = query.clone();
        let task = runtime.spawn(async move {
            let result = run(&session, &task_query, id).await;
            if let Err(e) = &result {
                debug!(id, domain = %task_query.domain, error = %e, "Transaction failed");
            }
            // The handle may be gone; nobody is waiting then.
            let _ = tx.send(result);
        });

        debug!(id, domain = %hostname, record_type = %record_type, "Transaction started");

        Ok(DnsTransaction::new(id, query, rx, task.abort_handle()))
    }
}

fn validate_hostname(hostname: &str) -> Result<(), DomainError> {
    let name = hostname.strip_suffix('.').unwrap_or(hostname);
    if name.is_empty()
        || name.len() > MAX_DOMAIN_LEN
        || name.split('.').any(|label| label.is_empty())
    {
        return Err(DomainError::InvalidDomainName(hostname.to_string()));
    }
    Ok(())
}

/// Walks the search list; only NXDOMAIN moves on to the next candidate name.
async fn run(session: &DnsSession, query: &DnsQuery, id: u16) -> Result<DnsAnswer, DomainError> {
    let qnames = search::qnames(query, session.config());
    if qnames.is_empty() {
        return Err(DomainError::InvalidDomainName(query.domain.to_string()));
    }
    let first_server = session.next_first_server_index();

    for qname in &qnames {
        match resolve_qname(session, qname, query.record_type, id, first_server).await {
            Err(DomainError::NxDomain) => {
                debug!(id, qname = %qname, "NXDOMAIN, trying next name");
            }
            other => return other,
        }
    }

    Err(DomainError::NxDomain)
}

async fn resolve_qname(
    session: &DnsSession,
    qname: &str,
    record_type: RecordType,
    id: u16,
    first_server: usize,
) -> Result<DnsAnswer, DomainError> {
    let request = MessageBuilder::build_query(id, qname, record_type)?;
    let config = session.config();
    let servers = config.nameservers.len();
    let mut last_failure: Option<DomainError> = None;

    for attempt in 0..config.total_attempts() {
        let server_index = (first_server + attempt) % servers;
        let server = config.nameservers[server_index];
        let timeout = session.next_timeout(attempt);

        let outcome = match udp_attempt(session, server_index, &request, timeout).await {
            Ok(response) if response.truncated => {
                debug!(id, server = %server, "Truncated UDP answer, retrying over TCP");
                tcp_attempt(session, server, &request, timeout)
                    .await
                    .map(|response| (response, true))
            }
            other => other.map(|response| (response, false)),
        };

        match outcome {
            Ok((response, via_tcp)) if response.rcode == ResponseCode::NoError => {
                return Ok(DnsAnswer {
                    qname: Arc::from(qname),
                    record_type,
                    addresses: response.addresses,
                    cname: response.cname,
                    min_ttl: response.min_ttl,
                    server,
                    transaction_id: id,
                    via_tcp,
                });
            }
            Ok((response, _)) if response.is_nxdomain() => return Err(DomainError::NxDomain),
            Ok((response, _)) => {
                let status = ResponseParser::rcode_to_status(response.rcode);
                warn!(id, server = %server, rcode = status, "Server failure");
                last_failure = Some(DomainError::ServerFailed(format!(
                    "{} from {}",
                    status, server
                )));
            }
            Err(e) if e.is_fatal_for_transaction() => return Err(e),
            Err(DomainError::QueryTimeout | DomainError::ResponseMismatch(_)) => {
                debug!(
                    id,
                    server = %server,
                    attempt,
                    timeout_ms = timeout.as_millis() as u64,
                    "Attempt timed out"
                );
            }
            Err(e) => {
                warn!(id, server = %server, attempt, error = %e, "Attempt failed");
                if !matches!(last_failure, Some(DomainError::ServerFailed(_))) {
                    last_failure = Some(e);
                }
            }
        }
    }

    Err(last_failure.unwrap_or(DomainError::QueryTimeout))
}

/// One UDP round trip. Datagrams that fail validation are logged and
/// skipped until the attempt deadline.
async fn udp_attempt(
    session: &DnsSession,
    server_index: usize,
    request: &[u8],
    timeout: Duration,
) -> Result<DnsResponse, DomainError> {
    let mut socket = session.allocate_socket(server_index)?;
    let server = socket.server();
    let matcher = ResponseMatcher::new(server, request);
    let deadline = Instant::now() + timeout;

    if let Err(e) = socket.socket().send(request).await {
        socket.mark_errored();
        return Err(DomainError::IoError(format!(
            "Failed to send UDP query to {}: {}",
            server, e
        )));
    }

    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    loop {
        let received =
            tokio::time::timeout_at(deadline, socket.socket().recv_from(&mut recv_buf)).await;

        let (len, from) = match received {
            Err(_) => return Err(DomainError::QueryTimeout),
            Ok(Err(e)) => {
                socket.mark_errored();
                return Err(DomainError::IoError(format!(
                    "Failed to receive UDP response from {}: {}",
                    server, e
                )));
            }
            Ok(Ok(received)) => received,
        };

        let response = &recv_buf[..len];
        match matcher.check(from, response) {
            Ok(()) => return ResponseParser::parse(response),
            Err(mismatch) => {
                debug!(
                    server = %server,
                    from = %from,
                    reason = %mismatch,
                    "Ignoring unmatched datagram"
                );
            }
        }
    }
}

async fn tcp_attempt(
    session: &DnsSession,
    server: SocketAddr,
    request: &[u8],
    timeout: Duration,
) -> Result<DnsResponse, DomainError> {
    let exchange = async {
        let mut stream = session
            .socket_pool()
            .socket_factory()
            .connect_stream_socket(server, timeout)
            .await
            .map_err(|e| {
                DomainError::IoError(format!("Connection to TCP server {} failed: {}", server, e))
            })?;

        send_with_length_prefix(stream.as_mut(), request).await?;
        read_with_length_prefix(stream.as_mut()).await
    };

    let response = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| DomainError::QueryTimeout)??;

    // A stream carries exactly one reply, so a mismatch leaves nothing to
    // wait for; the attempt counts as timed out.
    if let Err(mismatch) = ResponseMatcher::new(server, request).check_message(&response) {
        debug!(server = %server, reason = %mismatch, "Ignoring unmatched TCP response");
        return Err(DomainError::QueryTimeout);
    }

    let parsed = ResponseParser::parse(&response)?;
    debug!(server = %server, response_len = response.len(), "TCP response received");
    Ok(parsed)
}
