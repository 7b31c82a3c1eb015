use std::collections::HashMap;

use async_trait::async_trait;

use crate::{api::search::admin_filter::AdminCatalog, config::ClickhouseConfig};

pub fn get_clickhouse_client(config: &ClickhouseConfig) -> clickhouse::Client {
    clickhouse::Client::default()
        .with_url(&config.url)
        .with_user(&config.user)
        .with_password(&config.password)
        .with_database(&config.database)
}

/// Admin flags kept in the `admin_item_flags(identifier, flagged)` table.
pub struct ClickhouseAdminCatalog {
    client: clickhouse::Client,
}

impl ClickhouseAdminCatalog {
    pub fn new(config: &ClickhouseConfig) -> Self {
        Self { client: get_clickhouse_client(config) }
    }
}

#[async_trait]
impl AdminCatalog for ClickhouseAdminCatalog {
    async fn flags(&self, identifiers: &[String]) -> anyhow::Result<HashMap<String, bool>> {
        let sql = "
        SELECT identifier, flagged
        FROM admin_item_flags
        WHERE identifier IN ?
        ";
        let rows = self
            .client
            .query(sql)
            .bind(identifiers)
            .fetch_all::<(String, u8)>()
            .await?;
        Ok(rows.into_iter().map(|(identifier, flagged)| (identifier, flagged != 0)).collect())
    }
}
