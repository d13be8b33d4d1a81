use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Value of `FIREWATCH_DB_PATH` that selects the in-memory backend.
pub const MEMORY_DB: &str = ":memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Sqlite(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub addr: SocketAddr,
    /// Built dashboard assets, served for any path the API does not claim.
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("FIREWATCH_DB_PATH").unwrap_or_else(|| "firewatch.db".into());
        let host = lookup("FIREWATCH_HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port: u16 = lookup("FIREWATCH_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("FIREWATCH_PORT must be a port number")?;

        let storage = if db_path == MEMORY_DB {
            StorageConfig::Memory
        } else {
            StorageConfig::Sqlite(PathBuf::from(db_path))
        };

        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        Ok(Self {
            storage,
            addr,
            static_dir: lookup("FIREWATCH_STATIC_DIR")
                .filter(|d| !d.is_empty())
                .map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_bind_loopback_with_sqlite_file() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cfg.storage, StorageConfig::Sqlite(PathBuf::from("firewatch.db")));
        assert_eq!(cfg.static_dir, None);
    }

    #[test]
    fn memory_backend_and_static_dir() {
        let cfg = config(&[
            ("FIREWATCH_DB_PATH", ":memory:"),
            ("FIREWATCH_PORT", "8080"),
            ("FIREWATCH_STATIC_DIR", "dist"),
        ])
        .unwrap();
        assert_eq!(cfg.storage, StorageConfig::Memory);
        assert_eq!(cfg.addr.port(), 8080);
        assert_eq!(cfg.static_dir, Some(PathBuf::from("dist")));
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("FIREWATCH_PORT", "http")]).is_err());
    }
}
