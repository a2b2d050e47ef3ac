/// Inline file serving
///
/// Serves stored files straight from the content directory so the
/// frontend can embed previews (images, PDFs, video).
use crate::{
    classify::classify,
    context::AppContext,
    error::{ShelfError, ShelfResult},
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};

/// Build inline serving routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/uploads/*path", get(serve_upload))
}

/// Serve a stored file inline with its MIME type
///
/// The path is client-supplied; the blob store rejects anything that
/// would escape the content directory.
async fn serve_upload(
    State(ctx): State<AppContext>,
    Path(path): Path<String>,
) -> ShelfResult<Response> {
    let data = match ctx.blob_store.read(&path).await {
        Ok(data) => data,
        Err(ShelfError::NotFound(_)) => {
            return Err(ShelfError::NotFound("文件不存在".to_string()))
        }
        Err(e) => return Err(e),
    };

    let (_, mime) = classify(&path);
    let content_type = mime.unwrap_or("application/octet-stream");
    let disposition = format!("inline; filename=\"{}\"", urlencoding::encode(&path));

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(data))
        .unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_created() {
        let _router = routes();
        // Just verify it compiles
    }
}
