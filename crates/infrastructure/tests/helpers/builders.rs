#![allow(dead_code)]
use netstack_application::ports::{ClientSocketFactory, RandIntFn};
use netstack_domain::{DnsConfig, SocketPoolConfig};
use netstack_infrastructure::dns::{DnsSession, DnsSocketPool};
use std::net::SocketAddr;
use std::sync::Arc;

pub struct DnsConfigBuilder {
    config: DnsConfig,
}

impl DnsConfigBuilder {
    /// Short timeouts and a single round so failing tests finish quickly.
    pub fn new(nameservers: Vec<SocketAddr>) -> Self {
        Self {
            config: DnsConfig {
                nameservers,
                timeout_ms: 200,
                max_timeout_ms: 400,
                attempts: 1,
                ..DnsConfig::default()
            },
        }
    }

    pub fn attempts(mut self, attempts: u8) -> Self {
        self.config.attempts = attempts;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64, max_timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self.config.max_timeout_ms = max_timeout_ms;
        self
    }

    pub fn search(mut self, search: &[&str]) -> Self {
        self.config.search = search.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn rotate(mut self) -> Self {
        self.config.rotate = true;
        self
    }

    pub fn pool(mut self, max_sockets: usize, max_idle_per_server: usize) -> Self {
        self.config.socket_pool = SocketPoolConfig {
            max_sockets,
            max_idle_per_server,
        };
        self
    }

    pub fn build(self) -> DnsConfig {
        self.config
    }
}

pub fn fixed_rand(value: i32) -> RandIntFn {
    Arc::new(move |_: i32, _: i32| Some(value))
}

/// A random source whose generator always fails.
pub fn failing_rand() -> RandIntFn {
    Arc::new(|_: i32, _: i32| None)
}

pub fn session(
    config: DnsConfig,
    socket_factory: Arc<dyn ClientSocketFactory>,
    rand_int: RandIntFn,
) -> Arc<DnsSession> {
    let pool = Arc::new(DnsSocketPool::new(socket_factory, &config.socket_pool));
    Arc::new(DnsSession::new(config, pool, rand_int))
}

pub fn pool(
    socket_factory: Arc<dyn ClientSocketFactory>,
    max_sockets: usize,
    max_idle_per_server: usize,
) -> Arc<DnsSocketPool> {
    Arc::new(DnsSocketPool::new(
        socket_factory,
        &SocketPoolConfig {
            max_sockets,
            max_idle_per_server,
        },
    ))
}
