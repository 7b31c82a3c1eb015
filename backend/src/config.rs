//! Runtime configuration, read from the environment.

use std::{fmt, time::Duration};

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub solr_url: String,
    pub engine_timeout: Duration,
    pub bind_addr: String,
    pub item_locator_port: u16,
    /// enables the admin catalog when set
    pub clickhouse: Option<ClickhouseConfig>,
}

#[derive(Clone)]
pub struct ClickhouseConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl fmt::Debug for ClickhouseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickhouseConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let solr_url = lookup("SOLR_URL").unwrap_or("http://localhost:6081/solr".to_string());
        let timeout_ms = lookup("ENGINE_TIMEOUT_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(4000);
        let bind_addr = lookup("BIND_ADDR").unwrap_or("0.0.0.0:8081".to_string());
        let item_locator_port = lookup("ITEM_LOCATOR_PORT")
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8010);
        let clickhouse = lookup("CLICKHOUSE_URL").filter(|v| !v.is_empty()).map(|url| ClickhouseConfig {
            url,
            user: lookup("CLICKHOUSE_USER").unwrap_or("default".to_string()),
            password: lookup("CLICKHOUSE_PASSWORD").unwrap_or_default(),
            database: lookup("CLICKHOUSE_DATABASE").unwrap_or("default".to_string()),
        });
        Self {
            solr_url: solr_url.trim_end_matches('/').to_string(),
            engine_timeout: Duration::from_millis(timeout_ms),
            bind_addr,
            item_locator_port,
            clickhouse,
        }
    }
}
