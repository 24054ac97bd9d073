//! # Configuration
//!
//! Runtime configuration for the Cinelog binary.
//!
//! Values are layered, later layers winning:
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config <file>` or `CINELOG_CONFIG`)
//! 3. `CINELOG_*` environment variables
//! 4. Command-line flags
//!
//! ## Example
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 9000
//!
//! [storage]
//! backend = "redb"
//! database = "movies.redb"
//!
//! [security]
//! api_key = "secret"
//! rate_limit = 50
//! cors_origins = "http://localhost:3000"
//! ```

use cinelog_core::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CINELOG_CONFIG";

/// Default rate limit: requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

// =============================================================================
// BACKEND
// =============================================================================

/// Which storage backend the catalog runs on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Volatile in-memory storage.
    #[default]
    Memory,
    /// redb database file.
    Redb,
}

impl FromStr for Backend {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redb" => Ok(Self::Redb),
            other => Err(CatalogError::InvalidInput(format!(
                "Unknown backend '{}' (expected 'memory' or 'redb')",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Redb => f.write_str("redb"),
        }
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// The `host:port` bind address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            database: PathBuf::from("cinelog.db"),
        }
    }
}

/// `[security]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Bearer key required on every route but `/health`. `None` disables auth.
    pub api_key: Option<String>,
    /// Global requests per second, `0` disables rate limiting.
    pub rate_limit: u32,
    /// Comma separated allowed origins, `*` for any. `None` means localhost only.
    pub cors_origins: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
        }
    }
}

// =============================================================================
// CINELOG CONFIG
// =============================================================================

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CinelogConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
}

impl CinelogConfig {
    /// Load configuration from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::IoError(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, CatalogError> {
        toml::from_str(text)
            .map_err(|e| CatalogError::InvalidInput(format!("Invalid config: {}", e)))
    }

    /// Override values from `CINELOG_*` variables returned by `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), CatalogError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("CINELOG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("CINELOG_PORT") {
            self.server.port = parse_number("CINELOG_PORT", &port)?;
        }
        if let Some(backend) = get("CINELOG_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(database) = get("CINELOG_DATABASE") {
            self.storage.database = PathBuf::from(database);
        }
        if let Some(key) = get("CINELOG_API_KEY") {
            self.security.api_key = Some(key);
        }
        if let Some(limit) = get("CINELOG_RATE_LIMIT") {
            self.security.rate_limit = parse_number("CINELOG_RATE_LIMIT", &limit)?;
        }
        if let Some(origins) = get("CINELOG_CORS_ORIGINS") {
            self.security.cors_origins = Some(origins);
        }
        Ok(())
    }
}

/// Resolve the config file path from the flag or `CINELOG_CONFIG`.
pub fn resolve_config_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, CatalogError> {
    value.trim().parse().map_err(|_| {
        CatalogError::InvalidInput(format!("{} must be a number, got '{}'", key, value))
    })
}

// =============================================================================
// TESTS
// =============================================================================
