use dashmap::DashMap;
use netstack_application::ports::{ClientSocketFactory, DatagramSocket};
use netstack_domain::{DomainError, SocketPoolConfig};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Bounded pool of datagram sockets keyed by destination server.
///
/// Every live socket, idle or handed out, has taken one permit out of
/// `capacity`; the permit is given back when the socket is closed.
/// Acquisition never waits: when no permit is free and no idle socket of
/// another server can be evicted, it fails with `PoolExhausted`.
pub struct DnsSocketPool {
    socket_factory: Arc<dyn ClientSocketFactory>,

    idle: DashMap<SocketAddr, Vec<Arc<dyn DatagramSocket>>>,

    capacity: Semaphore,

    max_sockets: usize,

    max_idle_per_server: usize,

    total_created: AtomicU64,

    total_reused: AtomicU64,

    total_discarded: AtomicU64,
}

impl DnsSocketPool {
    pub fn new(socket_factory: Arc<dyn ClientSocketFactory>, config: &SocketPoolConfig) -> Self {
        info!(
            max_sockets = config.max_sockets,
            max_idle_per_server = config.max_idle_per_server,
            "Initializing DNS socket pool"
        );

        Self {
            socket_factory,
            idle: DashMap::new(),
            capacity: Semaphore::new(config.max_sockets),
            max_sockets: config.max_sockets,
            max_idle_per_server: config.max_idle_per_server,
            total_created: AtomicU64::new(0),
            total_reused: AtomicU64::new(0),
            total_discarded: AtomicU64::new(0),
        }
    }

    pub fn socket_factory(&self) -> &Arc<dyn ClientSocketFactory> {
        &self.socket_factory
    }

    /// Hands out a socket connected to `server` for exclusive use.
    ///
    /// The socket goes back to the pool when the returned guard drops.
    pub fn acquire(self: &Arc<Self>, server: SocketAddr) -> Result<PooledSocket, DomainError> {
        if let Some(mut entry) = self.idle.get_mut(&server) {
            if let Some(socket) = entry.pop() {
                self.total_reused.fetch_add(1, Ordering::Relaxed);
                debug!(server = %server, "Reusing DNS socket from pool");
                return Ok(self.guard(server, socket));
            }
        }

        let permit = match self.capacity.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                if !self.evict_one_idle() {
                    debug!(server = %server, "DNS socket pool exhausted");
                    return Err(DomainError::PoolExhausted { server });
                }
                self.capacity
                    .try_acquire()
                    .map_err(|_| DomainError::PoolExhausted { server })?
            }
        };

        // Dropping the permit on a failed open hands the slot straight back.
        let socket = self
            .socket_factory
            .create_datagram_socket(server)
            .map_err(|e| {
                DomainError::IoError(format!("Failed to open socket to {}: {}", server, e))
            })?;
        permit.forget();
        self.total_created.fetch_add(1, Ordering::Relaxed);

        debug!(server = %server, "Created new DNS socket");

        Ok(self.guard(server, Arc::from(socket)))
    }

    fn guard(
        self: &Arc<Self>,
        server: SocketAddr,
        socket: Arc<dyn DatagramSocket>,
    ) -> PooledSocket {
        PooledSocket {
            socket,
            server,
            pool: Arc::clone(self),
            errored: false,
        }
    }

    fn close(&self, server: SocketAddr, socket: Arc<dyn DatagramSocket>) {
        drop(socket);
        self.capacity.add_permits(1);
        self.total_discarded.fetch_add(1, Ordering::Relaxed);
        debug!(server = %server, "Closed DNS socket");
    }

    /// Closes one idle socket, of any server, to free its capacity slot.
    fn evict_one_idle(&self) -> bool {
        let mut evicted = None;
        for mut entry in self.idle.iter_mut() {
            if let Some(socket) = entry.value_mut().pop() {
                evicted = Some((*entry.key(), socket));
                break;
            }
        }

        match evicted {
            Some((server, socket)) => {
                debug!(server = %server, "Evicting idle DNS socket");
                self.close(server, socket);
                true
            }
            None => false,
        }
    }

    fn release(&self, server: SocketAddr, socket: Arc<dyn DatagramSocket>, errored: bool) {
        if errored {
            debug!(server = %server, "Discarding errored DNS socket");
            self.close(server, socket);
            return;
        }

        let overflow = {
            let mut entry = self.idle.entry(server).or_default();
            if entry.len() < self.max_idle_per_server {
                entry.push(socket);
                debug!(
                    server = %server,
                    pool_size = entry.len(),
                    "Returned DNS socket to pool"
                );
                None
            } else {
                Some(socket)
            }
        };

        if let Some(socket) = overflow {
            debug!(server = %server, "Pool full, dropping socket");
            self.close(server, socket);
        }
    }

    pub fn stats(&self) -> PoolStats {
        let idle: usize = self.idle.iter().map(|e| e.len()).sum();
        let live = self.max_sockets - self.capacity.available_permits();

        PoolStats {
            total_created: self.total_created.load(Ordering::Relaxed),
            total_reused: self.total_reused.load(Ordering::Relaxed),
            total_discarded: self.total_discarded.load(Ordering::Relaxed),
            idle,
            in_use: live.saturating_sub(idle),
        }
    }
}

/// Exclusive handle on a pooled socket for the duration of one attempt.
pub struct PooledSocket {
    socket: Arc<dyn DatagramSocket>,
    server: SocketAddr,
    pool: Arc<DnsSocketPool>,
    errored: bool,
}

impl PooledSocket {
    pub fn socket(&self) -> &dyn DatagramSocket {
        self.socket.as_ref()
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    /// The socket will be closed instead of returned to the pool.
    pub fn mark_errored(&mut self) {
        self.errored = true;
    }
}

impl Drop for PooledSocket {
    fn drop(&mut self) {
        self.pool
            .release(self.server, Arc::clone(&self.socket), self.errored);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub total_created: u64,
    pub total_reused: u64,
    pub total_discarded: u64,
    pub idle: usize,
    pub in_use: usize,
}
