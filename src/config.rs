use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Endpoints are kept in memory when unset.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    Memory,
    Postgres(String),
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let db_max_connections: u32 = env_or("MOCKPOINT_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid MOCKPOINT_DB_MAX_CONNECTIONS: {e}"))?;

        let host: IpAddr = env_or("MOCKPOINT_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid MOCKPOINT_HOST: {e}"))?;

        let port: u16 = env_or("MOCKPOINT_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid MOCKPOINT_PORT: {e}"))?;

        let max_body_size: usize = env_or("MOCKPOINT_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid MOCKPOINT_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("MOCKPOINT_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            db_max_connections,
            host,
            port,
            max_body_size,
            log_level,
        })
    }

    pub fn storage(&self) -> StorageBackend {
        match &self.database_url {
            Some(url) => StorageBackend::Postgres(url.clone()),
            None => StorageBackend::Memory,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            db_max_connections: 10,
            host: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            max_body_size: 1_048_576,
            log_level: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
