//! Admin flag annotation and filtering of a result page.

use std::collections::HashMap;

use async_trait::async_trait;
use common::search_result::SearchResultDocuments;
use tracing::info;

/// Identifier to admin flag lookup. Identifiers missing from the answer are
/// treated as unflagged.
#[async_trait]
pub trait AdminCatalog: Send + Sync {
    async fn flags(&self, identifiers: &[String]) -> anyhow::Result<HashMap<String, bool>>;
}

/// Annotates every document with its flag, then keeps only the documents the
/// requested filter admits. Without a filter the page is left untouched.
pub async fn apply_admin_filter<A: AdminCatalog + ?Sized>(
    results: &mut SearchResultDocuments,
    catalog: &A,
) -> anyhow::Result<()> {
    let Some(filter) = results.query.admin_filter else {
        return Ok(());
    };
    if results.results.is_empty() {
        return Ok(());
    }

    let identifiers = results.results.iter().map(|doc| doc.identifier.clone()).collect::<Vec<_>>();
    let flags = catalog.flags(&identifiers).await?;

    for doc in results.results.iter_mut() {
        doc.admin_flagged = Some(flags.get(&doc.identifier).copied().unwrap_or(false));
    }
    let before = results.results.len();
    results.results.retain(|doc| filter.keeps(doc.admin_flagged.unwrap_or(false)));
    for (index, doc) in results.results.iter_mut().enumerate() {
        doc.result_index_in_page = index as u64;
    }
    info!("admin filter {:?}: kept {} of {} documents", filter, results.results.len(), before);
    Ok(())
}
