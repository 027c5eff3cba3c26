use crate::utils::error::AppError;
use std::env;

const DEFAULT_DATABASE_NAME: &str = "message_board";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

/// Service configuration, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub database_name: String,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| AppError::ConfigError(format!("PORT must be a valid port, got '{}'", raw)))?,
            None => 3000,
        };

        let storage = match lookup("STORAGE").as_deref().map(str::trim) {
            None | Some("mongo") | Some("mongodb") => StorageBackend::Mongo,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(AppError::ConfigError(format!(
                    "STORAGE must be 'mongo' or 'memory', got '{}'",
                    other
                )))
            }
        };

        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());
        if storage == StorageBackend::Mongo && database_url.is_none() {
            return Err(AppError::ConfigError(
                "DATABASE_URL must be set when STORAGE=mongo".to_string(),
            ));
        }

        let database_name = lookup("DATABASE_NAME")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| database_url.as_deref().and_then(database_name_from_uri))
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]);

        Ok(Self {
            host,
            port,
            storage,
            database_url,
            database_name,
            cors_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Extract database name from URI path (`mongodb://host:27017/name?opts`)
fn database_name_from_uri(uri: &str) -> Option<String> {
    let without_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    let (_, path) = without_scheme.split_once('/')?;
    let name = path.split('?').next().unwrap_or("");
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
