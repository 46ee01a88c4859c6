// File: src/config.rs
// Purpose: Configuration parsing from egresados.toml, with environment overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Project metadata, shown in the page header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub institution: Option<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite:...` or `postgres://...`
    #[serde(default = "default_database_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    #[serde(default = "default_backup_dir")]
    pub dir: PathBuf,

    /// Backups older than this are pruned
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,

    /// 0 disables the in-server schedule
    #[serde(default)]
    pub interval_hours: u64,

    /// Tried in order with `--version`; the first that answers is used
    #[serde(default = "default_pg_dump_candidates")]
    pub pg_dump_candidates: Vec<String>,

    /// Upper bound for a single dump
    #[serde(default = "default_backup_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Served under `/static`; the wasm bundle lives in `<dir>/pkg`
    #[serde(default = "default_assets_dir")]
    pub dir: PathBuf,
}

// Default values
fn default_name() -> String {
    "Control de Egresados".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_database_url() -> String {
    "sqlite:egresados.db?mode=rwc".to_string()
}

fn default_cookie_name() -> String {
    "egresados_session".to_string()
}

fn default_session_ttl() -> u64 {
    8 * 60
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_retention_days() -> u64 {
    30
}

fn default_pg_dump_candidates() -> Vec<String> {
    vec!["pg_dump".to_string()]
}

fn default_backup_timeout() -> u64 {
    300
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            institution: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            dir: default_backup_dir(),
            retention_days: default_retention_days(),
            interval_hours: 0,
            pg_dump_candidates: default_pg_dump_candidates(),
            timeout_secs: default_backup_timeout(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: default_assets_dir(),
        }
    }
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }
}

impl BackupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `None` when scheduling is disabled
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_hours > 0).then(|| Duration::from_secs(self.interval_hours * 3600))
    }
}

impl AppConfig {
    /// Load configuration from egresados.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./egresados.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("egresados.toml")
    }

    /// Apply `DATABASE_URL`, `EGRESADOS_HOST` and `EGRESADOS_PORT` from the process environment
    pub fn with_env(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment in production, a map in tests)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }

        if let Some(host) = lookup("EGRESADOS_HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }

        if let Some(port) = lookup("EGRESADOS_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("EGRESADOS_PORT is not a valid port: {:?}", port))?;
        }

        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
