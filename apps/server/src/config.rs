use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;

/// Backend holding the datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Csv,
    Memory,
}

impl FromStr for StorageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(StorageKind::Csv),
            "memory" => Ok(StorageKind::Memory),
            other => anyhow::bail!("Unknown storage backend '{other}' (expected csv or memory)"),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub storage: StorageKind,
    pub users_file: PathBuf,
    pub secret_key: String,
    pub token_ttl: Duration,
    pub extra_strategies: Vec<String>,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("FB_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid FB_LISTEN_ADDR")?;
        let data_dir = PathBuf::from(env_or("FB_DATA_DIR", "./data"));
        let storage: StorageKind = env_or("FB_STORAGE", "csv").parse()?;
        let users_file = std::env::var("FB_USERS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("users.json"));
        let secret_key =
            std::env::var("FB_SECRET_KEY").context("FB_SECRET_KEY must be set")?;
        let ttl_secs: u64 = env_or("FB_TOKEN_TTL_SECS", "3600")
            .parse()
            .context("Invalid FB_TOKEN_TTL_SECS")?;
        let extra_strategies = split_list(&env_or("FB_STRATEGIES", ""));
        let cors_allow = split_list(&env_or("FB_CORS_ALLOW_ORIGINS", "*"));
        let timeout_ms: u64 = env_or("FB_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);
        Ok(Self {
            listen_addr,
            data_dir,
            storage,
            users_file,
            secret_key,
            token_ttl: Duration::from_secs(ttl_secs),
            extra_strategies,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
