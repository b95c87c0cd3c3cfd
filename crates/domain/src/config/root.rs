use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::files::FileAccessConfig;
use super::logging::LoggingConfig;

const LOCAL_CONFIG_PATH: &str = "netstack.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/netstack/config.toml";

/// Main configuration structure for netstack
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Stub resolver configuration
    #[serde(default)]
    pub dns: DnsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// `file:` access policy
    #[serde(default)]
    pub files: FileAccessConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. netstack.toml in current directory
    /// 3. /etc/netstack/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if !overrides.nameservers.is_empty() {
            self.dns.nameservers = overrides.nameservers;
        }
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.dns.timeout_ms = timeout_ms;
            self.dns.max_timeout_ms = self.dns.max_timeout_ms.max(timeout_ms);
        }
        if let Some(attempts) = overrides.attempts {
            self.dns.attempts = attempts;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dns
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if let Some(root) = self.files.allowed_roots.iter().find(|r| !r.is_absolute()) {
            return Err(ConfigError::Validation(format!(
                "file root '{}' must be absolute",
                root.display()
            )));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub nameservers: Vec<SocketAddr>,
    pub timeout_ms: Option<u64>,
    pub attempts: Option<u8>,
    pub log_level: Option<String>,
}
