use anyhow::Context;
use lp_points::datasource::{GraphQlDataSource, GraphQlSettings};
use lp_points::{api, config::Config, DataSource, PointsPipeline};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("configuration error")?;
    let port = config.port;

    let datasource: Arc<dyn DataSource> = Arc::new(
        GraphQlDataSource::new(config.graphql_url.clone(), GraphQlSettings::from_config(&config))
            .context("failed to build subgraph client")?,
    );
    tracing::info!(
        url = %config.graphql_url,
        page_size = config.page_size,
        max_retries = config.max_retries,
        "subgraph client ready"
    );

    let pipeline = Arc::new(PointsPipeline::new(datasource, config));
    let app = api::create_router(api::AppState::new(pipeline));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
