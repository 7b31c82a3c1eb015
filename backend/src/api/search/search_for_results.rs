//! Search endpoint for result lists: primary query, optional spelling retry,
//! then result assembly.

use std::time::Duration;

use common::{
    search_const::PAGER_WINDOW,
    search_query::SearchQuery,
    search_result::{SearchPhase, SearchResultDocumentItem, SearchResultDocuments, SuggestionToken},
};
use tracing::info;

use crate::{
    api::{
        formatting::group_thousands,
        search::{
            collection_titles::{get_collection_titles, mark_restricted, referenced_collection_ids},
            engine_query::{QueryAttempt, compile_search_request, page_size},
            pager::build_pager,
            search_facets::{assemble_facets, facets_for_view},
            suggestions::{corrected_query, parse_suggestions, spelling_proposals},
        },
    },
    db_utils::{
        decompose_spans::decompose_text_into_spans,
        solr_utils::{RawSearchResult, SearchClient, value_to_strings},
    },
    tables::SearchTables,
};

/// Where the search ended up after the primary attempt.
fn classify(num_found: u64, did_you_mean: &[SuggestionToken]) -> SearchPhase {
    if num_found > 0 {
        SearchPhase::HasResults
    } else if did_you_mean.is_empty() {
        SearchPhase::ZeroNoSuggestions
    } else {
        SearchPhase::ZeroWithSuggestions
    }
}

pub async fn search_for_results<C: SearchClient + ?Sized>(
    client: &C,
    tables: &SearchTables,
    query: SearchQuery,
) -> anyhow::Result<SearchResultDocuments> {
    let primary_request = compile_search_request(&query, tables, QueryAttempt::Primary, &query.query_string);
    let primary = client.execute(&primary_request).await?;
    let mut engine_time = primary.elapsed;

    let proposals = spelling_proposals(primary.result.spellcheck.as_ref());
    let did_you_mean = if proposals.is_empty() {
        Vec::new()
    } else {
        parse_suggestions(&query.query_string, &proposals)
    };
    let mut phase = classify(primary.result.num_found(), &did_you_mean);

    let (request, result, alt_results) = if phase == SearchPhase::ZeroWithSuggestions && !query.no_fallback {
        let corrected = corrected_query(&did_you_mean);
        info!("no results for {:?}, retrying as {:?}", query.query_string, corrected);
        let retry_request = compile_search_request(&query, tables, QueryAttempt::Corrected, &corrected);
        let retry = client.execute(&retry_request).await?;
        engine_time += retry.elapsed;
        phase = SearchPhase::RetrySent;
        (retry_request, retry.result, true)
    } else {
        (primary_request, primary.result, false)
    };

    let collection_ids = referenced_collection_ids(&result);
    let lookup = get_collection_titles(client, &collection_ids).await?;
    engine_time += lookup.engine_time;

    let mut results = document_items(&result);
    mark_restricted(&mut results, &lookup.collections);

    let facets = assemble_facets(result.facet_counts.as_ref(), &query, tables, &lookup.collections);
    let facets = facets_for_view(facets, &query);

    let num_found = result.num_found();
    let pager = build_pager(num_found, query.current_page(), page_size(&query), PAGER_WINDOW);

    Ok(SearchResultDocuments {
        engine_url: request.to_url(client.base_url()),
        results,
        facets,
        did_you_mean,
        alt_results,
        pager,
        collections: lookup.collections,
        num_found,
        num_found_display: group_thousands(num_found as i64),
        engine_time_ms: duration_ms(engine_time),
        phase,
        query,
    })
}

/// Engine documents with their highlight snippets, in engine order.
pub fn document_items(result: &RawSearchResult) -> Vec<SearchResultDocumentItem> {
    result
        .response
        .docs
        .iter()
        .enumerate()
        .map(|(index, doc)| {
            let first = |field: &str| doc.get(field).map(value_to_strings).and_then(|v| v.into_iter().next());
            let identifier = first("identifier").unwrap_or_default();
            let highlights = result
                .highlighting
                .get(&identifier)
                .map(|fields| {
                    fields
                        .iter()
                        .filter(|(_, snippets)| !snippets.is_empty())
                        .map(|(field, snippets)| (field.clone(), decompose_text_into_spans(&snippets.join(" "))))
                        .collect()
                })
                .unwrap_or_default();

            SearchResultDocumentItem {
                title: first("title").unwrap_or_else(|| identifier.clone()),
                mediatype: first("mediatype"),
                collections: doc.get("collection").map(value_to_strings).unwrap_or_default(),
                fields: doc.iter().map(|(k, v)| (k.clone(), value_to_strings(v))).collect(),
                highlights,
                restricted: false,
                admin_flagged: None,
                thumbnails: None,
                image_thumbnail: None,
                result_index_in_page: index as u64,
                identifier,
            }
        })
        .collect()
}

fn duration_ms(d: Duration) -> u64 {
    d.as_millis().min(u64::MAX as u128) as u64
}
