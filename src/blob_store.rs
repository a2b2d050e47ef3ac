/// Blob storage for uploaded file content
///
/// Raw file bytes live on disk under a single content directory,
/// independent of the metadata records that describe them. Stored names
/// are generated (timestamp plus entropy), never taken from the client.
use crate::error::{ShelfError, ShelfResult};
use chrono::Utc;
use rand::Rng;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Characters used for stored-name entropy
const NAME_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random portion of a stored name
const NAME_ENTROPY_LEN: usize = 13;

/// Disk-backed blob store
#[derive(Debug, Clone)]
pub struct BlobStore {
    content_dir: PathBuf,
}

impl BlobStore {
    /// Create a blob store over a content directory
    pub fn new(content_dir: PathBuf) -> Self {
        Self { content_dir }
    }

    /// Generate a stored name for an uploaded file
    ///
    /// Millisecond timestamp, a dash, 13 characters of lowercase base-36
    /// entropy, then the original extension if there is one. Collisions
    /// are treated as negligible; no existence check is made.
    pub fn generate_name(original_name: &str) -> String {
        let mut rng = rand::thread_rng();
        let entropy: String = (0..NAME_ENTROPY_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..NAME_CHARSET.len());
                NAME_CHARSET[idx] as char
            })
            .collect();

        let stamp = Utc::now().timestamp_millis();
        match Path::new(original_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}-{}.{}", stamp, entropy, ext),
            None => format!("{}-{}", stamp, entropy),
        }
    }

    /// Resolve a stored name to its path under the content directory
    ///
    /// Names must stay relative: parent and root components are rejected
    /// before anything touches the filesystem, since the inline-serving
    /// endpoint passes client-supplied paths through here.
    fn blob_path(&self, stored_name: &str) -> ShelfResult<PathBuf> {
        let relative = Path::new(stored_name);
        let safe = !stored_name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !safe {
            return Err(ShelfError::NotFound(format!(
                "Blob not found: {}",
                stored_name
            )));
        }

        Ok(self.content_dir.join(relative))
    }

    /// Write blob bytes, creating the content directory if needed
    pub async fn save(&self, stored_name: &str, data: &[u8]) -> ShelfResult<()> {
        let path = self.blob_path(stored_name)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ShelfError::BlobStorage(format!("Failed to create content directory: {}", e))
            })?;
        }

        fs::write(&path, data).await.map_err(|e| {
            ShelfError::BlobStorage(format!("Failed to write blob {}: {}", stored_name, e))
        })?;

        Ok(())
    }

    /// Read blob bytes; fails `NotFound` if the file is absent
    pub async fn read(&self, stored_name: &str) -> ShelfResult<Vec<u8>> {
        let path = self.blob_path(stored_name)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ShelfError::NotFound(
                format!("Blob not found: {}", stored_name),
            )),
            Err(e) => Err(ShelfError::BlobStorage(format!(
                "Failed to read blob {}: {}",
                stored_name, e
            ))),
        }
    }

    /// Delete a blob
    ///
    /// A missing file is not an error; other I/O failures are returned so
    /// the caller can decide whether to continue.
    pub async fn delete(&self, stored_name: &str) -> ShelfResult<()> {
        let path = match self.blob_path(stored_name) {
            Ok(path) => path,
            // A name that cannot resolve has nothing on disk to remove
            Err(_) => return Ok(()),
        };

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ShelfError::BlobStorage(format!(
                "Failed to delete blob {}: {}",
                stored_name, e
            ))),
        }
    }

    /// Check whether a blob exists
    pub async fn exists(&self, stored_name: &str) -> ShelfResult<bool> {
        let path = self.blob_path(stored_name)?;
        Ok(path.exists())
    }
}
