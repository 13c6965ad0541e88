//! Process settings read from the environment.

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// Entity routes answer 500 while this is unset.
    pub table_name: Option<String>,
    pub entity: String,
    pub schema_path: Option<PathBuf>,
    pub store_backend: StoreBackend,
    pub dynamodb_endpoint: Option<String>,
    pub bind_addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store_backend = match get("STORE_BACKEND").as_deref() {
            None | Some("dynamodb") => StoreBackend::DynamoDb,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORE_BACKEND",
                    value: other.to_string(),
                })
            }
        };
        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;
        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "MAX_BODY_BYTES",
                value: raw.clone(),
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            table_name: get("TABLE_NAME"),
            entity: get("ENTITY").unwrap_or_else(|| crate::config::presets::ACTORS.to_string()),
            schema_path: get("SCHEMA_PATH").map(PathBuf::from),
            store_backend,
            dynamodb_endpoint: get("DYNAMODB_ENDPOINT"),
            bind_addr,
            max_body_bytes,
        })
    }

    pub fn require_table_name(&self) -> Result<&str, ConfigError> {
        self.table_name.as_deref().ok_or(ConfigError::Missing("TABLE_NAME"))
    }
}
