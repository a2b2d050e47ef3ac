/// Resource catalog endpoints
use crate::{
    api::ApiEnvelope,
    context::AppContext,
    error::{ShelfError, ShelfResult},
    resources::UploadForm,
    storage::Resource,
};
use axum::{
    body::Body,
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

/// Build resource routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/resources", get(list_resources))
        .route("/resources/upload", post(upload_resource))
        .route("/resources/:id", get(get_resource))
        .route("/resources/:id/delete", delete(delete_resource))
        .route("/resources/:id/download", get(download_resource))
}

/// Catalog filter query parameters
#[derive(Debug, Deserialize)]
struct ListParams {
    subject: Option<String>,
    grade: Option<String>,
}

/// List resources, optionally filtered by subject and grade
async fn list_resources(
    State(ctx): State<AppContext>,
    Query(params): Query<ListParams>,
) -> ShelfResult<Json<ApiEnvelope<Vec<Resource>>>> {
    let resources = ctx
        .resources
        .list(params.subject.as_deref(), params.grade.as_deref())
        .await?;

    Ok(Json(ApiEnvelope::data(resources)))
}

/// Fetch one resource
async fn get_resource(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ShelfResult<Json<ApiEnvelope<Resource>>> {
    let resource = ctx.resources.get(&id).await?;

    Ok(Json(ApiEnvelope::data(resource)))
}

/// Accept a multipart upload and create a catalog entry
///
/// Expects fields `file`, `title`, `subject`, `grade`, `uploader` and an
/// optional `description`.
async fn upload_resource(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> ShelfResult<impl IntoResponse> {
    let mut form = UploadForm::default();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ShelfError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        ShelfError::Validation(format!("Failed to read file field: {}", e))
                    })?
                    .to_vec();
                file = Some((original_name, data));
            }
            Some("title") => form.title = text_field(field).await?,
            Some("description") => form.description = text_field(field).await?,
            Some("subject") => form.subject = text_field(field).await?,
            Some("grade") => form.grade = text_field(field).await?,
            Some("uploader") => form.uploader = text_field(field).await?,
            _ => {}
        }
    }

    let (original_name, data) =
        file.ok_or_else(|| ShelfError::Validation("缺少必填字段".to_string()))?;

    let resource = ctx.resources.upload(form, &original_name, data).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::data_with_message(resource, "上传成功")),
    ))
}

/// Read a text field from the multipart form
async fn text_field(field: Field<'_>) -> ShelfResult<String> {
    field
        .text()
        .await
        .map_err(|e| ShelfError::Validation(format!("Failed to read form field: {}", e)))
}

/// Delete a resource and its stored file
async fn delete_resource(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ShelfResult<Json<ApiEnvelope<()>>> {
    ctx.resources.delete(&id).await?;

    Ok(Json(ApiEnvelope::message("删除成功")))
}

/// Stream a resource's file as an attachment and count the download
async fn download_resource(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ShelfResult<Response> {
    let (resource, data) = ctx.resources.download(&id).await?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&resource.title),
        )
        .body(Body::from(data))
        .unwrap())
}

/// Content-Disposition for a download, suggesting the human title as the
/// filename (URL-encoded, the way browsers expect non-ASCII names here)
fn attachment_disposition(title: &str) -> String {
    format!("attachment; filename=\"{}\"", urlencoding::encode(title))
}
