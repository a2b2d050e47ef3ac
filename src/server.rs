/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{ShelfError, ShelfResult},
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
/// Returns Router<()> because state is already provided
pub fn build_router(ctx: AppContext) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // The body limit sits above the upload ceiling so oversize files get
    // the service's 400 message instead of a bare 413; the margin covers
    // the other multipart fields.
    let body_limit = ctx.config.service.max_upload_bytes + 1024 * 1024;

    Router::new()
        // Health check endpoint (no middleware)
        .route("/health", get(health_check))
        // API routes - merge before with_state
        .merge(crate::api::routes())
        // Provide state - converts Router<AppContext> to Router<()>
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .fallback(not_found)
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> ShelfResult<()> {
    let addr = format!("{}:{}", ctx.config.service.hostname, ctx.config.service.port);

    info!("🚀 StudyShelf listening on {}", addr);
    info!("   Service URL: {}", ctx.service_url());
    info!("   Storage backend: {:?}", ctx.config.storage.backend);
    info!(
        "   Upload directory: {}",
        ctx.config.storage.upload_dir.display()
    );

    let app = build_router(ctx);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ShelfError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    // Axum 0.7: Router<()> can be passed directly to serve
    axum::serve(listener, app)
        .await
        .map_err(|e| ShelfError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, ServiceConfig, StorageConfig, StorageKind};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn test_context(dir: &std::path::Path) -> AppContext {
        let config = ServerConfig {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 0,
                max_upload_bytes: 1024 * 1024,
            },
            storage: StorageConfig {
                data_directory: dir.to_path_buf(),
                upload_dir: dir.join("uploads"),
                backend: StorageKind::Json,
                db_location: dir.join("studyshelf.sqlite"),
            },
        };
        AppContext::new(config).await.unwrap()
    }

    #[tokio::test]
    async fn test_router_builds_with_full_context() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path()).await;
        let _router = build_router(ctx);
    }

    async fn post_comment_body(app: Router, body: &'static str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/comments")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_unparseable_comment_body_answers_with_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = test_context(dir.path()).await;
        let app = build_router(ctx);

        // Wrong type for rating: fails deserialization, not validation
        let (status, value) = post_comment_body(
            app.clone(),
            r#"{"resourceId":"res-1","author":"李同学","content":"清楚","rating":"5"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["success"], false);
        assert!(value["message"]
            .as_str()
            .unwrap()
            .starts_with("Malformed JSON request"));

        let (status, value) = post_comment_body(app, "not json at all").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["success"], false);
    }
}
