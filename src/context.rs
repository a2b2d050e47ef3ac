/// Application context and dependency injection
use crate::{
    blob_store::BlobStore,
    comments::CommentService,
    config::ServerConfig,
    error::{ShelfError, ShelfResult},
    resources::ResourceService,
    storage,
};
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub blob_store: Arc<BlobStore>,
    pub resources: Arc<ResourceService>,
    pub comments: Arc<CommentService>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ShelfResult<Self> {
        config.validate()?;

        // Create data directories if they don't exist
        Self::ensure_directories(&config).await?;

        let storage = storage::open(&config.storage).await?;
        let blob_store = Arc::new(BlobStore::new(config.storage.upload_dir.clone()));

        let resources = Arc::new(ResourceService::new(
            Arc::clone(&storage),
            Arc::clone(&blob_store),
            config.service.max_upload_bytes,
        ));
        let comments = Arc::new(CommentService::new(storage));

        Ok(Self {
            config: Arc::new(config),
            blob_store,
            resources,
            comments,
        })
    }

    /// Ensure required directories exist
    async fn ensure_directories(config: &ServerConfig) -> ShelfResult<()> {
        let dirs = vec![&config.storage.data_directory, &config.storage.upload_dir];

        for dir in dirs {
            if !dir.exists() {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    ShelfError::Internal(format!("Failed to create directory {:?}: {}", dir, e))
                })?;
            }
        }

        Ok(())
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
