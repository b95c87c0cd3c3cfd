use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Highest `ndots` value resolv.conf accepts.
const MAX_NDOTS: u8 = 15;

const MAX_DOMAIN_LEN: usize = 253;

const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SocketPoolConfig {
    /// Upper bound on sockets alive at once, idle or in use.
    #[serde(default = "default_max_sockets")]
    pub max_sockets: usize,

    #[serde(default = "default_max_idle_per_server")]
    pub max_idle_per_server: usize,
}

impl Default for SocketPoolConfig {
    fn default() -> Self {
        Self {
            max_sockets: default_max_sockets(),
            max_idle_per_server: default_max_idle_per_server(),
        }
    }
}

/// Stub resolver configuration. One session is built per valid value.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DnsConfig {
    #[serde(default)]
    pub nameservers: Vec<SocketAddr>,

    #[serde(default)]
    pub search: Vec<String>,

    #[serde(default = "default_ndots")]
    pub ndots: u8,

    #[serde(default = "default_true")]
    pub append_to_multi_label_name: bool,

    /// Initial per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_timeout_ms")]
    pub max_timeout_ms: u64,

    /// Rounds over the full nameserver list.
    #[serde(default = "default_attempts")]
    pub attempts: u8,

    #[serde(default)]
    pub rotate: bool,

    #[serde(default)]
    pub socket_pool: SocketPoolConfig,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            nameservers: vec![],
            search: vec![],
            ndots: default_ndots(),
            append_to_multi_label_name: true,
            timeout_ms: default_timeout_ms(),
            max_timeout_ms: default_max_timeout_ms(),
            attempts: default_attempts(),
            rotate: false,
            socket_pool: SocketPoolConfig::default(),
        }
    }
}

impl DnsConfig {
    pub fn with_nameservers(nameservers: Vec<SocketAddr>) -> Self {
        Self {
            nameservers,
            ..Self::default()
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.nameservers.is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "no nameservers configured".to_string(),
            ));
        }
        if self.attempts == 0 {
            return Err(DomainError::InvalidConfiguration(
                "attempts must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(DomainError::InvalidConfiguration(
                "timeout must be non-zero".to_string(),
            ));
        }
        if self.max_timeout_ms < self.timeout_ms {
            return Err(DomainError::InvalidConfiguration(format!(
                "max timeout {}ms is below timeout {}ms",
                self.max_timeout_ms, self.timeout_ms
            )));
        }
        if self.ndots > MAX_NDOTS {
            return Err(DomainError::InvalidConfiguration(format!(
                "ndots {} exceeds {}",
                self.ndots, MAX_NDOTS
            )));
        }
        if self.socket_pool.max_sockets == 0 {
            return Err(DomainError::InvalidConfiguration(
                "socket pool must allow at least one socket".to_string(),
            ));
        }
        if let Some(bad) = self
            .search
            .iter()
            .find(|s| !is_valid_search_domain(s))
        {
            return Err(DomainError::InvalidConfiguration(format!(
                "invalid search domain '{}'",
                bad
            )));
        }
        Ok(())
    }

    /// Total number of attempts a single qname gets across all servers.
    pub fn total_attempts(&self) -> usize {
        self.attempts as usize * self.nameservers.len()
    }
}

/// Dotted name with a single optional trailing dot and labels of 1..=63
/// bytes.
fn is_valid_search_domain(domain: &str) -> bool {
    let name = domain.strip_suffix('.').unwrap_or(domain);
    !name.is_empty()
        && name.len() <= MAX_DOMAIN_LEN
        && name
            .split('.')
            .all(|label| !label.is_empty() && label.len() <= MAX_LABEL_LEN)
}

fn default_true() -> bool {
    true
}

fn default_ndots() -> u8 {
    1
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_max_timeout_ms() -> u64 {
    5000
}

fn default_attempts() -> u8 {
    2
}

fn default_max_sockets() -> usize {
    32
}

fn default_max_idle_per_server() -> usize {
    4
}
