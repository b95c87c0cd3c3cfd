#![allow(dead_code)]
use netstack_domain::{DnsConfig, SocketPoolConfig};
use std::net::SocketAddr;

pub struct DnsConfigBuilder {
    config: DnsConfig,
}

impl DnsConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: DnsConfig::with_nameservers(vec!["192.0.2.53:53".parse().unwrap()]),
        }
    }

    pub fn nameserver(mut self, addr: &str) -> Self {
        self.config.nameservers.push(addr.parse::<SocketAddr>().unwrap());
        self
    }

    pub fn no_nameservers(mut self) -> Self {
        self.config.nameservers.clear();
        self
    }

    pub fn search(mut self, domain: &str) -> Self {
        self.config.search.push(domain.to_string());
        self
    }

    pub fn ndots(mut self, ndots: u8) -> Self {
        self.config.ndots = ndots;
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    pub fn max_timeout_ms(mut self, max_timeout_ms: u64) -> Self {
        self.config.max_timeout_ms = max_timeout_ms;
        self
    }

    pub fn attempts(mut self, attempts: u8) -> Self {
        self.config.attempts = attempts;
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
