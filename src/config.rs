//! Configuration management for RAX FTP Publisher
//!
//! Host descriptors and the optional publish job are read from
//! `publisher.toml` with `RAX_PUBLISH__*` environment overrides.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::transfer::TransferSpec;

pub const DEFAULT_PORT: u16 = 21;
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// FTPS parameters of a host.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// Secure the socket before the greeting instead of sending `AUTH TLS`.
    #[serde(default)]
    pub implicit: bool,

    /// PEM bundle of trusted certificates.
    #[serde(default)]
    pub trust_store: Option<PathBuf>,

    /// One extra trusted certificate, PEM encoded.
    #[serde(default)]
    pub certificate: Option<String>,
}

/// A remote FTP endpoint.
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Registry key for this host.
    pub name: String,

    pub hostname: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Empty, relative or absolute. Absolute roots skip the PWD query.
    #[serde(default)]
    pub remote_root_dir: Option<String>,

    /// Connect, control read and data read/write timeout. Zero waits forever.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub use_active_data: bool,

    #[serde(default)]
    pub control_encoding: Option<String>,

    /// Refuse MKD for names containing `/` instead of sending them.
    #[serde(default)]
    pub disable_make_nested_dirs: bool,

    /// Allow passive data connections to a host other than the control peer.
    #[serde(default)]
    pub disable_remote_verification: bool,

    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

impl HostConfig {
    /// A plain FTP host with default port, timeout and passive mode.
    pub fn new(name: &str, hostname: &str, username: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            hostname: hostname.to_string(),
            port: DEFAULT_PORT,
            username: username.to_string(),
            password: password.to_string(),
            remote_root_dir: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            use_active_data: false,
            control_encoding: None,
            disable_make_nested_dirs: false,
            disable_remote_verification: false,
            tls: None,
        }
    }

    pub fn hostname_trimmed(&self) -> &str {
        self.hostname.trim()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Configured encoding with surrounding whitespace removed; blank means unset.
    pub fn control_encoding(&self) -> Option<&str> {
        self.control_encoding
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Checks the invariants a session relies on.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.name.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "host name cannot be empty".into(),
            ));
        }

        if self.hostname_trimmed().is_empty() {
            return Err(config::ConfigError::Message(format!(
                "hostname cannot be empty for host {}",
                self.name
            )));
        }

        if self.port == 0 {
            return Err(config::ConfigError::Message(format!(
                "port cannot be 0 for host {}",
                self.name
            )));
        }

        if let Some(label) = self.control_encoding() {
            if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
                return Err(config::ConfigError::Message(format!(
                    "unknown control encoding {} for host {}",
                    label, self.name
                )));
            }
        }

        Ok(())
    }
}

impl fmt::Debug for HostConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostConfig")
            .field("name", &self.name)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"****")
            .field("remote_root_dir", &self.remote_root_dir)
            .field("timeout_ms", &self.timeout_ms)
            .field("use_active_data", &self.use_active_data)
            .field("control_encoding", &self.control_encoding)
            .field("disable_make_nested_dirs", &self.disable_make_nested_dirs)
            .field(
                "disable_remote_verification",
                &self.disable_remote_verification,
            )
            .field("tls", &self.tls)
            .finish()
    }
}

/// Username and password that replace a host's own for one login.
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// The upload job run by the binary.
#[derive(Debug, Deserialize, Clone)]
pub struct PublishConfig {
    /// Name of the host in `hosts`.
    pub host: String,

    pub transfer: TransferSpec,

    /// Replaces the host's credentials for this run.
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

/// Complete publisher configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct PublisherConfig {
    #[serde(default)]
    pub hosts: Vec<HostConfig>,

    #[serde(default)]
    pub publish: Option<PublishConfig>,
}

impl PublisherConfig {
    /// Load configuration from publisher.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_paths = [
            "rax-ftp-publisher/publisher", // Container layout
            "publisher",                   // Local development: ./publisher.toml
        ];

        let mut last_error = None;

        for config_path in &config_paths {
            match Self::load_from(config_path) {
                Ok(config) => return Ok(config),
                // Missing file: try the next location
                Err(e @ (config::ConfigError::NotFound(_) | config::ConfigError::Foreign(_))) => {
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            config::ConfigError::Message(format!(
                "no configuration found, tried {config_paths:?}"
            ))
        }))
    }

    /// Load one configuration file (extension optional) plus environment overrides.
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("RAX_PUBLISH").separator("__"))
            .build()?;
        let config: PublisherConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        let mut seen = HashSet::new();
        for host in &self.hosts {
            host.validate()?;
            if !seen.insert(host.name.as_str()) {
                return Err(config::ConfigError::Message(format!(
                    "duplicate host name {}",
                    host.name
                )));
            }
        }

        if let Some(publish) = &self.publish {
            if !self.hosts.iter().any(|h| h.name == publish.host) {
                return Err(config::ConfigError::Message(format!(
                    "publish refers to unknown host {}",
                    publish.host
                )));
            }
        }

        Ok(())
    }
}

/// Lookup of host configurations by name.
pub struct HostRegistry {
    hosts: HashMap<String, HostConfig>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self {
            hosts: HashMap::new(),
        }
    }

    pub fn from_hosts(hosts: impl IntoIterator<Item = HostConfig>) -> Self {
        let mut registry = Self::new();
        for host in hosts {
            registry.insert(host);
        }
        registry
    }

    /// Adds a host, returning the configuration it replaced.
    pub fn insert(&mut self, host: HostConfig) -> Option<HostConfig> {
        self.hosts.insert(host.name.clone(), host)
    }

    pub fn get(&self, name: &str) -> Option<&HostConfig> {
        self.hosts.get(name)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self::new()
    }
}
