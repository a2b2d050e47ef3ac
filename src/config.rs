/// Configuration management for StudyShelf
use crate::error::{ShelfError, ShelfResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub upload_dir: PathBuf,
    pub backend: StorageKind,
    pub db_location: PathBuf,
}

/// Which metadata backend to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Json,
    Sqlite,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Every key is defaulted so the binary runs with zero configuration.
    pub fn from_env() -> ShelfResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("SHELF_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("SHELF_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ShelfError::Validation("Invalid port number".to_string()))?;
        let max_upload_bytes = env::var("SHELF_MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "524288000".to_string())
            .parse()
            .unwrap_or(524_288_000);

        let data_directory: PathBuf = env::var("SHELF_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let upload_dir = env::var("SHELF_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("uploads"));
        let db_location = env::var("SHELF_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("studyshelf.sqlite"));

        let backend = env::var("SHELF_STORAGE_BACKEND")
            .unwrap_or_else(|_| "sqlite".to_string())
            .parse()?;

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                max_upload_bytes,
            },
            storage: StorageConfig {
                data_directory,
                upload_dir,
                backend,
                db_location,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ShelfResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ShelfError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.service.max_upload_bytes == 0 {
            return Err(ShelfError::Validation(
                "Upload size limit cannot be zero".to_string(),
            ));
        }

        Ok(())
    }
}

impl std::str::FromStr for StorageKind {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StorageKind::Sqlite),
            "json" => Ok(StorageKind::Json),
            other => Err(ShelfError::Validation(format!(
                "Unknown storage backend: {}",
                other
            ))),
        }
    }
}
