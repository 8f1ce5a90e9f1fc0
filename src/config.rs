use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_PORT: u16 = 8050;
pub const DEFAULT_DATA_PATH: &str = "data/Student_Mental_health.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_values(
            std::env::var("PORT").ok(),
            std::env::var("DASHBOARD_DATA").ok(),
        )
    }

    pub fn from_values(port: Option<String>, data_path: Option<String>) -> anyhow::Result<Self> {
        let port = match port {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got `{value}`"))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            data_path: resolve_data_path(None, data_path),
            port,
        })
    }

    pub fn with_overrides(mut self, data_path: Option<PathBuf>, port: Option<u16>) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// Dataset location for commands that never bind a socket; `PORT` is not read.
pub fn data_path_from_env(flag: Option<PathBuf>) -> PathBuf {
    resolve_data_path(flag, std::env::var("DASHBOARD_DATA").ok())
}

pub fn resolve_data_path(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| env.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}
