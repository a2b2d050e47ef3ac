/// Resource catalog management
///
/// Handles the upload pipeline, listing, detail fetch, download, and
/// delete for shared teaching materials.
mod service;

pub use service::ResourceService;

/// Fields collected from the multipart upload form
///
/// All fields arrive as raw strings; validation and label parsing happen
/// in the service.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub grade: String,
    pub uploader: String,
}
