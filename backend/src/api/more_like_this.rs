//! Documents similar to one item, by the engine's more-like-this handler.

use common::search_result::MoreLikeThisResult;

use crate::{
    api::search::{
        collection_titles::{get_collection_titles, mark_restricted, referenced_collection_ids},
        engine_query::EngineRequest,
        search_for_results::document_items,
    },
    db_utils::solr_utils::SearchClient,
    tables::SearchTables,
};

pub async fn more_like_this<C: SearchClient + ?Sized>(
    client: &C,
    tables: &SearchTables,
    identifier: &str,
) -> anyhow::Result<MoreLikeThisResult> {
    let request = EngineRequest::more_like_this(identifier, tables.default_fields());
    let response = client.execute(&request).await?;

    let lookup = get_collection_titles(client, &referenced_collection_ids(&response.result)).await?;
    let mut results = document_items(&response.result);
    mark_restricted(&mut results, &lookup.collections);

    Ok(MoreLikeThisResult {
        identifier: identifier.to_string(),
        engine_url: request.to_url(client.base_url()),
        results,
        collections: lookup.collections,
        engine_time_ms: (response.elapsed + lookup.engine_time).as_millis() as u64,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::search::engine_query::EngineHandler,
        db_utils::solr_utils::{EngineResponse, decode_engine_body},
        error::EngineError,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::{sync::Mutex, time::Duration};

    #[derive(Default)]
    struct RecordingClient {
        requests: Mutex<Vec<EngineRequest>>,
    }

    #[async_trait]
    impl SearchClient for RecordingClient {
        fn base_url(&self) -> &str {
            "http://solr"
        }

        async fn execute(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError> {
            self.requests.lock().unwrap().push(request.clone());
            let body = match request.handler {
                EngineHandler::MoreLikeThis => json!({"response": {"numFound": 2, "docs": [
                    {"identifier": "apollo12", "title": "Apollo 12", "collection": ["nasa"]},
                    {"identifier": "apollo13", "title": "Apollo 13"}
                ]}}),
                EngineHandler::Select => json!({"response": {"numFound": 1, "docs": [
                    {"identifier": "nasa", "title": "NASA Images"}
                ]}}),
            };
            Ok(EngineResponse { result: decode_engine_body(&body.to_string())?, elapsed: Duration::from_millis(4) })
        }
    }

    #[tokio::test]
    async fn similar_items_come_with_collection_titles() {
        let client = RecordingClient::default();
        let result = more_like_this(&client, &SearchTables::new(), "apollo11").await.unwrap();

        assert_eq!(result.results.len(), 2);
        assert_eq!(result.results[0].title, "Apollo 12");
        assert_eq!(result.collections["nasa"].title, "NASA Images");
        assert_eq!(result.engine_time_ms, 8);
        assert!(result.engine_url.starts_with("http://solr/mlt?"));
        assert!(result.engine_url.contains("q=identifier%3A%22apollo11%22"));
        assert!(result.engine_url.contains("rows=20"));

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].handler, EngineHandler::MoreLikeThis);
    }
}
