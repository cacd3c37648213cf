//! # Configuration Management
//!
//! Centralized configuration for the chat protocol library.
//!
//! This module provides structured configuration for servers and clients:
//! bind/connect addresses, protocol-edge timeouts, the server MOTD, and
//! logging options.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()` / `from_toml()`
//! - Environment-specific overrides via `from_env()`
//! - Direct instantiation with defaults

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Default address servers bind and clients connect to.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:7878";

/// Username the server signs system-authored lines with (MOTD, kick
/// warnings). Not a reserved name; a client using it only confuses peers.
pub const SYSTEM_SENDER: &str = "server";

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_handshake_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_motd() -> String {
    "Welcome to the server!".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top-level configuration holding every configurable area.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ChatConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("failed to parse TOML: {e}")))
    }

    /// Defaults overridden from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("CHAT_PROTOCOL_ADDRESS") {
            config.server.address = addr.clone();
            config.client.server_address = addr;
        }

        if let Ok(motd) = std::env::var("CHAT_PROTOCOL_MOTD") {
            config.server.motd = motd;
        }

        if let Ok(username) = std::env::var("CHAT_PROTOCOL_USERNAME") {
            config.client.username = username;
        }

        if let Ok(timeout) = std::env::var("CHAT_PROTOCOL_HANDSHAKE_TIMEOUT_MS") {
            if let Ok(val) = timeout.parse::<u64>() {
                config.server.handshake_timeout = Duration::from_millis(val);
            }
        }

        if let Ok(level) = std::env::var("CHAT_PROTOCOL_LOG_LEVEL") {
            config.logging.level = level;
        }

        config
    }

    /// Validate every area, collecting all problems rather than stopping
    /// at the first.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.server.validate();
        errors.extend(self.client.validate());
        errors
    }
}

/// Server-side configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address to bind the listening socket to. Use port 0 to let the OS
    /// pick one (useful in tests).
    #[serde(default = "default_address")]
    pub address: String,

    /// Upper bound on how long a freshly accepted connection may take to
    /// deliver its handshake before being dropped unregistered.
    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout: Duration,

    /// Greeting sent to every client that completes the handshake. An
    /// empty string disables the greeting.
    #[serde(default = "default_motd")]
    pub motd: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            handshake_timeout: default_handshake_timeout(),
            motd: default_motd(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.address.is_empty() {
            errors.push("server address cannot be empty".to_string());
        } else if !self.address.contains(':') {
            errors.push(format!(
                "server address '{}' is missing a port",
                self.address
            ));
        }

        if self.handshake_timeout.is_zero() {
            errors.push("handshake timeout cannot be zero".to_string());
        }

        errors
    }

    pub(crate) fn ensure_valid(&self) -> Result<()> {
        collect(self.validate())
    }
}

/// Client-side configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Address of the server to connect to.
    #[serde(default = "default_address")]
    pub server_address: String,

    /// Username announced in the handshake.
    #[serde(default)]
    pub username: String,

    /// Bound on the TCP connect.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_address: default_address(),
            username: String::new(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl ClientConfig {
    /// Validate client configuration.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.server_address.is_empty() {
            errors.push("client server address cannot be empty".to_string());
        }

        if self.username.is_empty() {
            errors.push("client username cannot be empty".to_string());
        } else if self.username.contains(['\n', '\r']) {
            errors.push("client username cannot contain line breaks".to_string());
        }

        if self.connect_timeout.is_zero() {
            errors.push("connect timeout cannot be zero".to_string());
        }

        errors
    }

    pub(crate) fn ensure_valid(&self) -> Result<()> {
        collect(self.validate())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level directive, e.g. `"info"` or `"chat_protocol=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted log lines instead of human-readable ones.
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

fn collect(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ProtocolError::ConfigError(errors.join("; ")))
    }
}
