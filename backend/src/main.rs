//! Search service entry point.

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::Request, middleware::Next};
use backend::{
    api::{search::admin_filter::AdminCatalog, thumbnails::ItemThumbnailSource},
    config::SearchConfig,
    db_utils::{clickhouse_utils::ClickhouseAdminCatalog, item_locator::UdpItemLocator, solr_utils::SolrClient},
    server_extra::search_routes::{AppState, router},
    tables::SearchTables,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SearchConfig::from_env();
    tracing::info!("config: {:?}", config);

    let admin_catalog = config
        .clickhouse
        .as_ref()
        .map(|clickhouse| Arc::new(ClickhouseAdminCatalog::new(clickhouse)) as Arc<dyn AdminCatalog>);
    let listing_http = reqwest::Client::builder()
        .timeout(config.engine_timeout)
        .build()
        .context("failed to build listing client")?;

    let state = AppState {
        client: Arc::new(SolrClient::new(&config).context("failed to build engine client")?),
        tables: Arc::new(SearchTables::new()),
        admin_catalog,
        thumbnails: Arc::new(ItemThumbnailSource::new(
            Arc::new(UdpItemLocator::new(config.item_locator_port)),
            listing_http,
        )),
    };

    let app = router(state).layer(axum::middleware::from_fn(|request: Request, next: Next| async move {
        let path = request.uri().path().to_string();
        let res = next.run(request).await;
        tracing::debug!("{} -> {}", path, res.status());
        res
    }));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
