use anyhow::Context;
use booksearch_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load settings")?;
    booksearch_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        openlibrary = %settings.openlibrary.search_url,
        "booksearch-app bootstrap starting"
    );

    booksearch_app::serve(settings).await
}
