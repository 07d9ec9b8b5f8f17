use anyhow::{Context, Result};
use course_localizer::{
    config::Config, db::PgCourseRepository, glossary::GlossaryIndex, renderer::ExerciseRenderer,
    server,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when not present)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("course_localizer=info".parse()?),
        )
        .init();

    info!("Starting course localizer");

    let config = Config::from_env()?;

    // Glossaries are indexed once, before serving, and never mutated after
    let index = GlossaryIndex::build(&config.content_root);
    info!("✓ {} glossaries loaded", index.len());

    let repository =
        PgCourseRepository::connect(&config.database_url, config.database_max_connections).await?;

    let renderer = Arc::new(ExerciseRenderer::new(Arc::new(index), Arc::new(repository)));
    let app = server::router(renderer);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("✓ Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
