/// Comment endpoints
use crate::{
    api::ApiEnvelope,
    comments::AddCommentRequest,
    context::AppContext,
    error::{ShelfError, ShelfResult},
    storage::Comment,
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

/// Build comment routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/comments", get(list_comments))
        .route("/comments", post(add_comment))
}

/// Comment listing query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentListParams {
    resource_id: Option<String>,
}

/// List comments for one resource, newest first
async fn list_comments(
    State(ctx): State<AppContext>,
    Query(params): Query<CommentListParams>,
) -> ShelfResult<Json<ApiEnvelope<Vec<Comment>>>> {
    let resource_id = params
        .resource_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ShelfError::Validation("缺少 resourceId 参数".to_string()))?;

    let comments = ctx.comments.list(&resource_id).await?;

    Ok(Json(ApiEnvelope::data(comments)))
}

/// Create a comment on a resource
///
/// The body is extracted fallibly: an unparseable body must still answer
/// with the envelope 400, not axum's plain-text rejection.
async fn add_comment(
    State(ctx): State<AppContext>,
    body: Result<Json<AddCommentRequest>, JsonRejection>,
) -> ShelfResult<impl IntoResponse> {
    let Json(req) =
        body.map_err(|e| ShelfError::Validation(format!("Malformed JSON request: {}", e)))?;

    let comment = ctx.comments.add(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::data_with_message(comment, "评论成功")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_created() {
        let _router = routes();
        // Just verify it compiles
    }

    #[test]
    fn test_request_accepts_camel_case_wire_fields() {
        let req: AddCommentRequest = serde_json::from_str(
            r#"{"resourceId":"res-1","author":"李同学","content":"清楚","rating":4}"#,
        )
        .unwrap();
        assert_eq!(req.resource_id, "res-1");
        assert_eq!(req.rating, Some(4));
    }

    #[test]
    fn test_request_tolerates_missing_fields() {
        // Validation decides what is required, not deserialization
        let req: AddCommentRequest = serde_json::from_str(r#"{"author":"李同学"}"#).unwrap();
        assert!(req.resource_id.is_empty());
        assert!(req.rating.is_none());
    }
}
