/// StudyShelf - educational resource sharing server
///
/// A small axum service for uploading, browsing, downloading, and
/// commenting on teaching materials, with pluggable JSON-document or
/// SQLite metadata storage.

mod api;
mod blob_store;
mod classify;
mod comments;
mod config;
mod context;
mod error;
mod resources;
mod server;
mod storage;

use config::ServerConfig;
use context::AppContext;
use error::ShelfResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ShelfResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studyshelf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Print banner
    print_banner();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
   _____ __            __      _____ __         __ ____
  / ___// /___  ______/ /_  __/ ___// /_  ___  / // __/
  \__ \/ __/ / / / __  / / / /\__ \/ __ \/ _ \/ // /_
 ___/ / /_/ /_/ / /_/ / /_/ /___/ / / / /  __/ // __/
/____/\__/\__,_/\__,_/\__, //____/_/ /_/\___/_//_/

        Educational Resource Server v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
