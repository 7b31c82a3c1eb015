//! Batch resolution of collection identifiers to titles and flags.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use common::{
    search_const::COLLECTION_LOOKUP_BATCH,
    search_result::{CollectionRef, SearchResultDocumentItem},
};
use futures::future::try_join_all;
use tracing::debug;

use crate::{
    api::search::{engine_query::EngineRequest, facet_filters::escape_filter_value},
    db_utils::solr_utils::{RawSearchResult, SearchClient, value_is_truthy, value_to_strings},
    error::EngineError,
};

const COLLECTION_FIELDS: &[&str] = &["identifier", "title", "noindex", "access-restricted"];

#[derive(Debug, Clone, Default)]
pub struct CollectionLookup {
    pub collections: BTreeMap<String, CollectionRef>,
    /// summed over every batch
    pub engine_time: Duration,
    pub lookups: usize,
}

/// Collections named by the collection facet and by every document.
pub fn referenced_collection_ids(result: &RawSearchResult) -> BTreeSet<String> {
    let mut ids = BTreeSet::new();
    if let Some(buckets) = result.facet_counts.as_ref().and_then(|f| f.facet_fields.get("collection")) {
        for (value, _count) in buckets {
            ids.extend(value_to_strings(value));
        }
    }
    for doc in &result.response.docs {
        if let Some(collection) = doc.get("collection") {
            ids.extend(value_to_strings(collection));
        }
    }
    ids.retain(|id| !id.is_empty());
    ids
}

/// One engine lookup per batch of at most [`COLLECTION_LOOKUP_BATCH`] ids,
/// run concurrently. No ids, no engine call.
pub async fn get_collection_titles<C: SearchClient + ?Sized>(
    client: &C,
    ids: &BTreeSet<String>,
) -> Result<CollectionLookup, EngineError> {
    if ids.is_empty() {
        return Ok(CollectionLookup::default());
    }

    let ids = ids.iter().collect::<Vec<_>>();
    let requests = ids
        .chunks(COLLECTION_LOOKUP_BATCH)
        .map(|batch| {
            let query = batch.iter().map(|id| escape_filter_value(id)).collect::<Vec<_>>().join(" OR ");
            EngineRequest::lookup(query, "identifier", COLLECTION_FIELDS, batch.len() as u64)
        })
        .collect::<Vec<_>>();
    debug!("resolving {} collections in {} lookups", ids.len(), requests.len());

    let responses = try_join_all(requests.iter().map(|request| client.execute(request))).await?;

    let mut lookup = CollectionLookup { lookups: responses.len(), ..Default::default() };
    for response in responses {
        lookup.engine_time += response.elapsed;
        for doc in &response.result.response.docs {
            let Some(identifier) = doc.get("identifier").and_then(|v| v.as_str()) else {
                continue;
            };
            let title = doc.get("title").map(value_to_strings).unwrap_or_default().join(" ");
            lookup.collections.insert(
                identifier.to_string(),
                CollectionRef {
                    identifier: identifier.to_string(),
                    title,
                    hidden: value_is_truthy(doc.get("noindex")),
                    access_restricted: value_is_truthy(doc.get("access-restricted")),
                },
            );
        }
    }
    Ok(lookup)
}

/// Flags every document that belongs to an access-restricted collection.
pub fn mark_restricted(docs: &mut [SearchResultDocumentItem], collections: &BTreeMap<String, CollectionRef>) {
    for doc in docs.iter_mut() {
        doc.restricted = doc
            .collections
            .iter()
            .any(|id| collections.get(id).is_some_and(|c| c.access_restricted));
    }
}
