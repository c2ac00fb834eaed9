//! Book search service
//!
//! Searches OpenLibrary by title, author or subject and serves display-ready
//! book records over HTTP.

pub mod modules;

use anyhow::Context;
use booksearch_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::*;

/// Run the HTTP server until Ctrl-C, driving every module's lifecycle.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &settings)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = booksearch_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry
        .stop_all()
        .await
        .with_context(|| "failed to stop modules")?;

    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => tracing::error!(error = %e, "failed to listen for shutdown signal"),
    }
}
