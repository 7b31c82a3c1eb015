//! Engine response model and the HTTP client that fetches it.

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{api::search::engine_query::EngineRequest, config::SearchConfig, error::EngineError};

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct RawSearchResult {
    #[serde(default)]
    pub response: RawSearchResultHits,
    #[serde(default)]
    pub facet_counts: Option<RawFacetCounts>,
    /// document id -> field -> snippets
    #[serde(default)]
    pub highlighting: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub spellcheck: Option<RawSpellcheck>,
}

impl RawSearchResult {
    pub fn num_found(&self) -> u64 {
        self.response.num_found
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct RawSearchResultHits {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// `json.nl=arrarr` turns every named list into `[[name, value], ...]`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct RawFacetCounts {
    #[serde(default)]
    pub facet_fields: BTreeMap<String, Vec<(serde_json::Value, u64)>>,
    #[serde(default)]
    pub facet_ranges: BTreeMap<String, RawFacetRange>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct RawFacetRange {
    #[serde(default)]
    pub counts: Vec<(String, u64)>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct RawSpellcheck {
    /// kept loose: entries are `[word, {startOffset, endOffset, suggestion}]`
    /// mixed with flags like `["correctlySpelled", false]`
    #[serde(default)]
    pub suggestions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct EngineResponse {
    pub result: RawSearchResult,
    pub elapsed: Duration,
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    fn base_url(&self) -> &str;

    async fn execute(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError>;
}

pub struct SolrClient {
    base_url: String,
    http: reqwest::Client,
}

impl SolrClient {
    pub fn new(config: &SearchConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.engine_timeout)
            .timeout(config.engine_timeout)
            .build()?;
        Ok(Self { base_url: config.solr_url.clone(), http })
    }
}

#[async_trait]
impl SearchClient for SolrClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError> {
        let url = request.to_url(&self.base_url);
        debug!("SEARCH REQUEST: {}", url);
        let t0 = std::time::Instant::now();

        let response = self.http.get(&url).send().await.map_err(|e| EngineError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;
        let status = response.status();
        let response_txt = response.text().await.map_err(|e| EngineError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;
        let elapsed = t0.elapsed();
        if status.is_client_error() || status.is_server_error() {
            return Err(EngineError::Status { status: status.as_u16(), body: response_txt });
        }
        info!("SEARCH RESPONSE: len = {} ({}ms)", response_txt.len(), elapsed.as_millis());

        let result = decode_engine_body(&response_txt)?;
        Ok(EngineResponse { result, elapsed })
    }
}

pub fn decode_engine_body(body: &str) -> Result<RawSearchResult, EngineError> {
    serde_json::from_str::<RawSearchResult>(body).map_err(|e| EngineError::Decode {
        message: e.to_string(),
        raw_body: body.to_string(),
    })
}

/// Display strings for a stored field: scalars become one entry, arrays one
/// entry per element.
pub fn value_to_strings(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(items) => items.iter().flat_map(value_to_strings).collect(),
        other => vec![other.to_string()],
    }
}

/// Loose truthiness for flag fields that may be stored as bool, number or text.
pub fn value_is_truthy(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(serde_json::Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        Some(serde_json::Value::Array(items)) => items.iter().any(|item| value_is_truthy(Some(item))),
        _ => false,
    }
}
