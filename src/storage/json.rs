/// JSON document store
///
/// The source of truth is two pretty-printed JSON arrays on disk,
/// `resources.json` and `comments.json`. Every operation loads the whole
/// document, mutates it in memory, and rewrites the whole file; a
/// per-document mutex serializes those read-modify-write cycles. Reads
/// take the same lock because the rewrite is not atomic.
use crate::error::{ShelfError, ShelfResult};
use crate::storage::{
    Comment, NewComment, NewResource, Resource, ResourceFilter, StorageBackend,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Document store over two JSON collection files
pub struct JsonStore {
    resources_path: PathBuf,
    comments_path: PathBuf,
    resources_lock: Mutex<()>,
    comments_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(resources_path: PathBuf, comments_path: PathBuf) -> Self {
        Self {
            resources_path,
            comments_path,
            resources_lock: Mutex::new(()),
            comments_lock: Mutex::new(()),
        }
    }

    /// Load a whole collection document
    ///
    /// A missing file is an empty collection. An unparseable one is logged
    /// and also read as empty; the next write replaces it.
    async fn read_document<T: DeserializeOwned>(path: &Path) -> ShelfResult<Vec<T>> {
        let raw = match fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ShelfError::Storage(format!(
                    "Failed to read document {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::error!("Unreadable document {}: {}", path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    /// Rewrite a whole collection document, creating its directory if needed
    async fn write_document<T: Serialize>(path: &Path, records: &[T]) -> ShelfResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let raw = serde_json::to_vec_pretty(records)?;
        fs::write(path, raw).await.map_err(|e| {
            ShelfError::Storage(format!("Failed to write document {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl StorageBackend for JsonStore {
    async fn list_resources(&self, filter: &ResourceFilter) -> ShelfResult<Vec<Resource>> {
        let _guard = self.resources_lock.lock().await;
        let mut resources: Vec<Resource> = Self::read_document(&self.resources_path).await?;

        resources.retain(|r| filter.matches(r));
        resources.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

        Ok(resources)
    }

    async fn get_resource(&self, id: &str) -> ShelfResult<Option<Resource>> {
        let _guard = self.resources_lock.lock().await;
        let resources: Vec<Resource> = Self::read_document(&self.resources_path).await?;

        Ok(resources.into_iter().find(|r| r.id == id))
    }

    async fn create_resource(&self, new: NewResource) -> ShelfResult<Resource> {
        let _guard = self.resources_lock.lock().await;
        let mut resources: Vec<Resource> = Self::read_document(&self.resources_path).await?;

        let resource = Resource {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            description: new.description,
            subject: new.subject,
            grade: new.grade,
            uploader: new.uploader,
            file_name: new.file_name,
            file_type: new.file_type,
            file_size: new.file_size,
            download_count: 0,
            uploaded_at: Utc::now(),
        };

        resources.push(resource.clone());
        Self::write_document(&self.resources_path, &resources).await?;

        Ok(resource)
    }

    async fn increment_download_count(&self, id: &str) -> ShelfResult<()> {
        let _guard = self.resources_lock.lock().await;
        let mut resources: Vec<Resource> = Self::read_document(&self.resources_path).await?;

        // A missing id is tolerated; the record may have been deleted
        // between lookup and increment.
        if let Some(resource) = resources.iter_mut().find(|r| r.id == id) {
            resource.download_count += 1;
            Self::write_document(&self.resources_path, &resources).await?;
        }

        Ok(())
    }

    async fn delete_resource(&self, id: &str) -> ShelfResult<()> {
        let _guard = self.resources_lock.lock().await;
        let mut resources: Vec<Resource> = Self::read_document(&self.resources_path).await?;

        let before = resources.len();
        resources.retain(|r| r.id != id);
        if resources.len() == before {
            return Err(ShelfError::NotFound(format!("Resource not found: {}", id)));
        }

        Self::write_document(&self.resources_path, &resources).await?;

        Ok(())
    }

    async fn list_comments(&self, resource_id: &str) -> ShelfResult<Vec<Comment>> {
        let _guard = self.comments_lock.lock().await;
        let mut comments: Vec<Comment> = Self::read_document(&self.comments_path).await?;

        comments.retain(|c| c.resource_id == resource_id);
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(comments)
    }

    async fn create_comment(&self, new: NewComment) -> ShelfResult<Comment> {
        let _guard = self.comments_lock.lock().await;
        let mut comments: Vec<Comment> = Self::read_document(&self.comments_path).await?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            resource_id: new.resource_id,
            author: new.author,
            content: new.content,
            rating: new.rating,
            created_at: Utc::now(),
        };

        comments.push(comment.clone());
        Self::write_document(&self.comments_path, &comments).await?;

        Ok(comment)
    }
}
