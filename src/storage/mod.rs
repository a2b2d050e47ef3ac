/// Storage backends for catalog metadata
///
/// Resource and comment records persist through one of two interchangeable
/// stores selected at startup: a JSON document store that rewrites whole
/// collection files, and a SQLite store issuing per-operation statements.
pub mod json;
pub mod models;
pub mod sqlite;

pub use models::{
    Comment, Grade, NewComment, NewResource, Resource, ResourceFilter, Subject,
};

use crate::config::{StorageConfig, StorageKind};
use crate::error::ShelfResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Persistence interface shared by both backend variants
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// List resources matching the filter, newest first
    async fn list_resources(&self, filter: &ResourceFilter) -> ShelfResult<Vec<Resource>>;

    /// Fetch a single resource
    async fn get_resource(&self, id: &str) -> ShelfResult<Option<Resource>>;

    /// Persist a new resource with a store-assigned id and timestamp
    async fn create_resource(&self, new: NewResource) -> ShelfResult<Resource>;

    /// Bump the download counter; a missing id is a tolerated no-op
    async fn increment_download_count(&self, id: &str) -> ShelfResult<()>;

    /// Remove a resource record; fails `NotFound` if the id is absent
    async fn delete_resource(&self, id: &str) -> ShelfResult<()>;

    /// List comments for a resource, newest first
    async fn list_comments(&self, resource_id: &str) -> ShelfResult<Vec<Comment>>;

    /// Persist a new comment with a store-assigned id and timestamp
    async fn create_comment(&self, new: NewComment) -> ShelfResult<Comment>;
}

/// Open the metadata backend selected by the configuration
pub async fn open(config: &StorageConfig) -> ShelfResult<Arc<dyn StorageBackend>> {
    match config.backend {
        StorageKind::Json => {
            let resources_path = config.data_directory.join("resources.json");
            let comments_path = config.data_directory.join("comments.json");
            tracing::info!(
                "Using JSON document store at {}",
                config.data_directory.display()
            );
            Ok(Arc::new(json::JsonStore::new(resources_path, comments_path)))
        }
        StorageKind::Sqlite => {
            tracing::info!("Using SQLite store at {}", config.db_location.display());
            let pool = sqlite::create_pool(&config.db_location).await?;
            let store = sqlite::SqliteStore::new(pool);
            store.init_schema().await?;
            Ok(Arc::new(store))
        }
    }
}
