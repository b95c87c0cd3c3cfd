use super::socket_pool::{DnsSocketPool, PooledSocket};
use netstack_application::ports::RandIntFn;
use netstack_domain::{DnsConfig, DomainError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Everything transactions of one configuration share: the validated
/// config, the socket pool and the randomness source for query IDs.
///
/// Built by the client for every accepted configuration and never mutated
/// afterwards, apart from the rotation cursor.
pub struct DnsSession {
    config: DnsConfig,
    socket_pool: Arc<DnsSocketPool>,
    rand_int: RandIntFn,
    next_server: AtomicUsize,
}

impl DnsSession {
    pub fn new(config: DnsConfig, socket_pool: Arc<DnsSocketPool>, rand_int: RandIntFn) -> Self {
        Self {
            config,
            socket_pool,
            rand_int,
            next_server: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &DnsConfig {
        &self.config
    }

    pub fn socket_pool(&self) -> &Arc<DnsSocketPool> {
        &self.socket_pool
    }

    /// Fresh query ID. Fails when the random source fails or answers
    /// outside the requested range.
    pub fn next_query_id(&self) -> Result<u16, DomainError> {
        (self.rand_int)(0, u16::MAX as i32)
            .and_then(|id| u16::try_from(id).ok())
            .ok_or_else(|| DomainError::IoError("random source unavailable".to_string()))
    }

    /// Server that the next transaction starts with. Always the first one
    /// unless `rotate` is set.
    pub fn next_first_server_index(&self) -> usize {
        if !self.config.rotate || self.config.nameservers.is_empty() {
            return 0;
        }
        self.next_server.fetch_add(1, Ordering::Relaxed) % self.config.nameservers.len()
    }

    /// Timeout for attempt `attempt`: the base timeout doubles after every
    /// full round over the servers, capped at the configured maximum.
    pub fn next_timeout(&self, attempt: usize) -> Duration {
        let servers = self.config.nameservers.len().max(1);
        let round = (attempt / servers) as u32;
        let factor = 1u64.checked_shl(round).unwrap_or(u64::MAX);
        let millis = self
            .config
            .timeout_ms
            .saturating_mul(factor)
            .min(self.config.max_timeout_ms);
        Duration::from_millis(millis)
    }

    pub fn allocate_socket(&self, server_index: usize) -> Result<PooledSocket, DomainError> {
        let server = self
            .config
            .nameservers
            .get(server_index)
            .copied()
            .ok_or(DomainError::NoConfiguration)?;
        self.socket_pool.acquire(server)
    }
}

impl std::fmt::Debug for DnsSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsSession")
            .field("nameservers", &self.config.nameservers)
            .field("pool", &self.socket_pool.stats())
            .finish()
    }
}
