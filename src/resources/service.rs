/// Resource service: coordinates file bytes and metadata records
use crate::blob_store::BlobStore;
use crate::classify::classify;
use crate::error::{ShelfError, ShelfResult};
use crate::resources::UploadForm;
use crate::storage::{Grade, NewResource, Resource, ResourceFilter, StorageBackend, Subject};
use std::sync::Arc;

/// Orchestrates the blob store and the metadata backend
///
/// This is the only component allowed to touch both; everything above it
/// sees a resource as one unit.
pub struct ResourceService {
    store: Arc<dyn StorageBackend>,
    blob_store: Arc<BlobStore>,
    max_upload_bytes: usize,
}

impl ResourceService {
    pub fn new(
        store: Arc<dyn StorageBackend>,
        blob_store: Arc<BlobStore>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            blob_store,
            max_upload_bytes,
        }
    }

    /// Validate, classify, store the bytes, then persist the record
    ///
    /// The blob is written before the metadata record: a crash in between
    /// leaves an orphaned file, never a record pointing at nothing.
    pub async fn upload(
        &self,
        form: UploadForm,
        original_name: &str,
        data: Vec<u8>,
    ) -> ShelfResult<Resource> {
        if form.title.trim().is_empty()
            || form.subject.trim().is_empty()
            || form.grade.trim().is_empty()
            || form.uploader.trim().is_empty()
        {
            return Err(ShelfError::Validation("缺少必填字段".to_string()));
        }

        if data.len() > self.max_upload_bytes {
            return Err(ShelfError::Validation(format!(
                "文件过大，最大限制 {}MB",
                self.max_upload_bytes / (1024 * 1024)
            )));
        }

        let subject: Subject = form.subject.trim().parse().map_err(ShelfError::Validation)?;
        let grade: Grade = form.grade.trim().parse().map_err(ShelfError::Validation)?;

        let (file_type, _) = classify(original_name);
        let stored_name = BlobStore::generate_name(original_name);
        let file_size = data.len() as i64;

        self.blob_store.save(&stored_name, &data).await?;

        let resource = self
            .store
            .create_resource(NewResource {
                title: form.title,
                description: form.description,
                subject,
                grade,
                uploader: form.uploader,
                file_name: stored_name,
                file_type,
                file_size,
            })
            .await?;

        tracing::info!(
            "Uploaded resource {} ({} bytes) as {}",
            resource.id,
            file_size,
            resource.file_name
        );

        Ok(resource)
    }

    /// List resources, optionally filtered by subject and grade labels
    ///
    /// Blank labels mean no restriction; unknown labels match nothing.
    pub async fn list(
        &self,
        subject: Option<&str>,
        grade: Option<&str>,
    ) -> ShelfResult<Vec<Resource>> {
        let subject = subject.filter(|s| !s.trim().is_empty());
        let grade = grade.filter(|g| !g.trim().is_empty());

        let mut filter = ResourceFilter::default();
        if let Some(raw) = subject {
            match raw.parse::<Subject>() {
                Ok(subject) => filter.subject = Some(subject),
                Err(_) => return Ok(Vec::new()),
            }
        }
        if let Some(raw) = grade {
            match raw.parse::<Grade>() {
                Ok(grade) => filter.grade = Some(grade),
                Err(_) => return Ok(Vec::new()),
            }
        }

        self.store.list_resources(&filter).await
    }

    /// Fetch a single resource; fails `NotFound` if absent
    pub async fn get(&self, id: &str) -> ShelfResult<Resource> {
        self.store
            .get_resource(id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("资源不存在".to_string()))
    }

    /// Serve a download: fetch metadata, read the blob, count the download
    ///
    /// The counter only moves once the bytes are actually in hand.
    pub async fn download(&self, id: &str) -> ShelfResult<(Resource, Vec<u8>)> {
        let resource = self.get(id).await?;

        let data = match self.blob_store.read(&resource.file_name).await {
            Ok(data) => data,
            Err(ShelfError::NotFound(_)) => {
                return Err(ShelfError::NotFound("文件不存在".to_string()))
            }
            Err(e) => return Err(e),
        };

        self.store.increment_download_count(id).await?;

        Ok((resource, data))
    }

    /// Delete a resource: blob first (best-effort), then the record
    pub async fn delete(&self, id: &str) -> ShelfResult<()> {
        let resource = self.get(id).await?;

        // Blob removal must not block metadata cleanup
        if let Err(e) = self.blob_store.delete(&resource.file_name).await {
            tracing::warn!("Failed to delete blob {}: {}", resource.file_name, e);
        }

        self.store.delete_resource(id).await?;
        tracing::info!("Deleted resource {}", id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::FileCategory;
    use crate::storage::json::JsonStore;
    use std::path::Path;

    fn service_with_limit(dir: &Path, max_upload_bytes: usize) -> ResourceService {
        let store = Arc::new(JsonStore::new(
            dir.join("resources.json"),
            dir.join("comments.json"),
        ));
        let blob_store = Arc::new(BlobStore::new(dir.join("uploads")));
        ResourceService::new(store, blob_store, max_upload_bytes)
    }

    fn test_service(dir: &Path) -> ResourceService {
        service_with_limit(dir, 1024 * 1024)
    }

    fn valid_form() -> UploadForm {
        UploadForm {
            title: "有理数运算".to_string(),
            description: "第一章练习".to_string(),
            subject: "数学".to_string(),
            grade: "七上".to_string(),
            uploader: "王老师".to_string(),
        }
    }

    fn uploads_dir_is_empty(dir: &Path) -> bool {
        let uploads = dir.join("uploads");
        !uploads.exists() || std::fs::read_dir(uploads).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_upload_creates_record_and_blob() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        let resource = service
            .upload(valid_form(), "练习.pdf", b"pdf bytes".to_vec())
            .await
            .unwrap();

        assert_eq!(resource.title, "有理数运算");
        assert_eq!(resource.subject, Subject::Math);
        assert_eq!(resource.grade, Grade::G7Term1);
        assert_eq!(resource.file_type, FileCategory::Pdf);
        assert_eq!(resource.file_size, 9);
        assert_eq!(resource.download_count, 0);
        assert_ne!(resource.file_name, "练习.pdf");
        assert!(resource.file_name.ends_with(".pdf"));

        let fetched = service.get(&resource.id).await.unwrap();
        assert_eq!(fetched.id, resource.id);

        let stored = dir.path().join("uploads").join(&resource.file_name);
        assert_eq!(std::fs::read(stored).unwrap(), b"pdf bytes");
    }

    #[tokio::test]
    async fn test_upload_rejects_blank_required_fields() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        let blank_each = [
            UploadForm { title: String::new(), ..valid_form() },
            UploadForm { subject: String::new(), ..valid_form() },
            UploadForm { grade: String::new(), ..valid_form() },
            UploadForm { uploader: "   ".to_string(), ..valid_form() },
        ];

        for form in blank_each {
            let err = service
                .upload(form, "a.pdf", b"x".to_vec())
                .await
                .unwrap_err();
            match err {
                ShelfError::Validation(message) => assert_eq!(message, "缺少必填字段"),
                other => panic!("unexpected error: {}", other),
            }
        }

        // Nothing was persisted
        assert!(service.list(None, None).await.unwrap().is_empty());
        assert!(uploads_dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_labels() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        let form = UploadForm {
            subject: "体育".to_string(),
            ..valid_form()
        };
        let err = service.upload(form, "a.pdf", b"x".to_vec()).await.unwrap_err();
        assert!(matches!(err, ShelfError::Validation(_)));

        let form = UploadForm {
            grade: "十上".to_string(),
            ..valid_form()
        };
        let err = service.upload(form, "a.pdf", b"x".to_vec()).await.unwrap_err();
        assert!(matches!(err, ShelfError::Validation(_)));

        assert!(uploads_dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_limit(dir.path(), 16 * 1024 * 1024);

        let data = vec![0u8; 16 * 1024 * 1024 + 1];
        let err = service.upload(valid_form(), "big.mp4", data).await.unwrap_err();
        match err {
            ShelfError::Validation(message) => {
                assert_eq!(message, "文件过大，最大限制 16MB")
            }
            other => panic!("unexpected error: {}", other),
        }

        assert!(service.list(None, None).await.unwrap().is_empty());
        assert!(uploads_dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_download_returns_bytes_and_increments() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        let resource = service
            .upload(valid_form(), "clip.mp4", b"video bytes".to_vec())
            .await
            .unwrap();

        let (served, data) = service.download(&resource.id).await.unwrap();
        assert_eq!(served.title, resource.title);
        assert_eq!(data, b"video bytes");
        assert_eq!(service.get(&resource.id).await.unwrap().download_count, 1);

        service.download(&resource.id).await.unwrap();
        assert_eq!(service.get(&resource.id).await.unwrap().download_count, 2);
    }

    #[tokio::test]
    async fn test_download_missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        let err = service.download("no-such-id").await.unwrap_err();
        match err {
            ShelfError::NotFound(message) => assert_eq!(message, "资源不存在"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_download_with_missing_blob_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        let resource = service
            .upload(valid_form(), "a.png", b"img".to_vec())
            .await
            .unwrap();
        std::fs::remove_file(dir.path().join("uploads").join(&resource.file_name)).unwrap();

        let err = service.download(&resource.id).await.unwrap_err();
        match err {
            ShelfError::NotFound(message) => assert_eq!(message, "文件不存在"),
            other => panic!("unexpected error: {}", other),
        }

        // The failed serve must not move the counter
        assert_eq!(service.get(&resource.id).await.unwrap().download_count, 0);
    }

    #[tokio::test]
    async fn test_delete_removes_blob_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        let resource = service
            .upload(valid_form(), "old.docx", b"doc".to_vec())
            .await
            .unwrap();

        service.delete(&resource.id).await.unwrap();

        let err = service.get(&resource.id).await.unwrap_err();
        assert!(matches!(err, ShelfError::NotFound(_)));
        assert!(!dir.path().join("uploads").join(&resource.file_name).exists());
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        let err = service.delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, ShelfError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_proceeds_when_blob_already_gone() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        let resource = service
            .upload(valid_form(), "stray.pdf", b"pdf".to_vec())
            .await
            .unwrap();
        std::fs::remove_file(dir.path().join("uploads").join(&resource.file_name)).unwrap();

        service.delete(&resource.id).await.unwrap();
        assert!(matches!(
            service.get(&resource.id).await.unwrap_err(),
            ShelfError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_list_handles_filter_labels() {
        let dir = tempfile::tempdir().unwrap();
        let service = test_service(dir.path());

        service
            .upload(valid_form(), "a.pdf", b"x".to_vec())
            .await
            .unwrap();
        let english = UploadForm {
            subject: "英语".to_string(),
            grade: "八下".to_string(),
            ..valid_form()
        };
        service.upload(english, "b.pdf", b"y".to_vec()).await.unwrap();

        assert_eq!(service.list(None, None).await.unwrap().len(), 2);
        assert_eq!(service.list(Some("数学"), None).await.unwrap().len(), 1);
        assert_eq!(
            service.list(Some("英语"), Some("八下")).await.unwrap().len(),
            1
        );

        // Blank labels mean no restriction
        assert_eq!(service.list(Some(""), Some("")).await.unwrap().len(), 2);

        // Unknown labels match nothing instead of erroring
        assert!(service.list(Some("体育"), None).await.unwrap().is_empty());
        assert!(service.list(None, Some("大一")).await.unwrap().is_empty());
    }
}
