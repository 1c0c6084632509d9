use anyhow::{Context, Result};
use serde::Deserialize;
use anyhow::anyhow;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Prefix every route is mounted under, e.g. `/domo/datastores/v1`.
    #[serde(default)]
    pub base_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4), base_path: String::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Document operations create missing collections when true.
    #[serde(default = "default_auto_create")]
    pub auto_create: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), auto_create: default_auto_create() }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_auto_create() -> bool { true }

/// `CONFIG_PATH` if set, otherwise `config.toml` in the working directory.
pub fn config_path() -> PathBuf {
    std::env::var("CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("config.toml"))
}

pub fn load_from_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load from `config_path()`, normalized and validated.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// The file at `path` if it exists, otherwise environment variables.
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = if path.exists() {
            load_from_file(path).with_context(|| format!("invalid config file {}", path.display()))?
        } else {
            Self::from_env()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Self {
        let defaults = AppConfig::default();
        let server = ServerConfig {
            host: std::env::var("SERVER_HOST").unwrap_or(defaults.server.host),
            port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(defaults.server.port),
            worker_threads: std::env::var("TOKIO_WORKER_THREADS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .or(defaults.server.worker_threads),
            base_path: std::env::var("BASE_PATH").unwrap_or_default(),
        };
        let storage = StorageConfig {
            data_dir: std::env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.storage.data_dir),
            auto_create: std::env::var("AUTO_CREATE_COLLECTIONS")
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(defaults.storage.auto_create),
        };
        AppConfig { server, storage }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 storage
        self.storage.normalize();
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        self.base_path = normalize_base_path(&self.base_path);
        Ok(())
    }
}

impl StorageConfig {
    fn normalize(&mut self) {
        if self.data_dir.as_os_str().is_empty() {
            self.data_dir = default_data_dir();
        }
    }
}

/// `""` or `/segment[/segment]` without a trailing slash.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
