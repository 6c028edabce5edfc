//! Configuration management
//!
//! Settings are resolved in the following priority order:
//! 1. Environment variables
//! 2. `plex-mcp.toml` configuration file
//! 3. Default values
//!
//! Inside the configuration file, `${VAR_NAME}` is expanded from the environment.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// Default configuration file name looked up in the working directory
pub const CONFIG_FILE: &str = "plex-mcp.toml";

/// Plex upstream configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    /// Base URL of the Plex Media Server
    #[serde(default = "default_plex_url")]
    pub url: String,

    /// X-Plex-Token used for every upstream request
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PlexConfig {
    fn default() -> Self {
        Self {
            url: default_plex_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for PlexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlexConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds of silence before an SSE keepalive event is sent
    #[serde(default = "default_keepalive_secs")]
    pub sse_keepalive_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            sse_keepalive_secs: default_keepalive_secs(),
        }
    }
}

/// Main configuration for plex-mcp-server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plex: PlexConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Log verbosity (`TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plex: PlexConfig::default(),
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

fn default_plex_url() -> String {
    "http://localhost:32400".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_keepalive_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "INFO".to_string()
}

impl Config {
    /// Expand `${VAR_NAME}` references from the environment.
    ///
    /// Unset variables expand to an empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;
        cfg.apply_env_overrides();

        Ok(cfg)
    }

    /// Parse TOML content (after `${VAR}` expansion) without env overrides
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded_content = Self::expand_env_vars(content);

        let toml: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        Ok(Self::from_toml_config(toml))
    }

    /// Load configuration from the default locations
    ///
    /// Uses `./plex-mcp.toml` when present, environment variables otherwise.
    pub fn load() -> crate::Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Ok(Self::from_env())
    }

    fn from_toml_config(toml: TomlConfig) -> Self {
        let plex = toml.plex.unwrap_or_default();
        let server = toml.server.unwrap_or_default();
        let log = toml.log.unwrap_or_default();

        Config {
            plex: PlexConfig {
                url: plex.url.unwrap_or_else(default_plex_url),
                token: plex.token.filter(|t| !t.is_empty()),
                timeout_secs: plex.timeout_secs.unwrap_or_else(default_timeout_secs),
            },
            server: ServerConfig {
                host: server.host.unwrap_or_else(default_host),
                port: server.port.unwrap_or_else(default_port),
                sse_keepalive_secs: server
                    .sse_keepalive_secs
                    .unwrap_or_else(default_keepalive_secs),
            },
            log_level: log.level.unwrap_or_else(default_log_level),
        }
    }

    /// Override settings with any environment variables that are set
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PLEX_URL") {
            if !url.is_empty() {
                self.plex.url = url;
            }
        }
        if let Ok(token) = std::env::var("PLEX_TOKEN") {
            if !token.is_empty() {
                self.plex.token = Some(token);
            }
        }
        if let Some(secs) = env_parse("PLEX_TIMEOUT_SECS") {
            self.plex.timeout_secs = secs;
        }

        if let Ok(host) = std::env::var("HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }
        if let Some(port) = env_parse("PORT") {
            self.server.port = port;
        }
        if let Some(secs) = env_parse("SSE_KEEPALIVE_SECS") {
            self.server.sse_keepalive_secs = secs;
        }

        if let Ok(level) = std::env::var("LOG_LEVEL") {
            if !level.is_empty() {
                self.log_level = level;
            }
        }
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    /// Check required settings
    pub fn validate(&self) -> crate::Result<()> {
        if self.plex.token.as_deref().is_none_or(str::is_empty) {
            return Err(Error::Config(
                "PLEX_TOKEN environment variable is required".to_string(),
            ));
        }

        reqwest::Url::parse(&self.plex.url)
            .map_err(|e| Error::Config(format!("Invalid PLEX_URL '{}': {}", self.plex.url, e)))?;

        if self.plex.timeout_secs == 0 {
            return Err(Error::Config(
                "PLEX_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        if self.server.sse_keepalive_secs == 0 {
            return Err(Error::Config(
                "SSE_KEEPALIVE_SECS must be greater than 0".to_string(),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(Error::Config("HOST must not be empty".to_string()));
        }

        Ok(())
    }

    /// Host and port the HTTP transport binds to; the host may be a name
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.server.host.trim(), self.server.port)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

// ============================================================================
// TOML file layout
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    plex: Option<TomlPlexConfig>,
    server: Option<TomlServerConfig>,
    log: Option<TomlLogConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlPlexConfig {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlServerConfig {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    sse_keepalive_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlLogConfig {
    #[serde(default)]
    level: Option<String>,
}
