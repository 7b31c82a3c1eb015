use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{search_query::SearchQuery, text_highlight::HighlightTextSpan};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultDocuments {
    pub query: SearchQuery,
    /// literal engine request, kept for diagnostics
    pub engine_url: String,
    pub results: Vec<SearchResultDocumentItem>,
    pub facets: Vec<SearchResultFacets>,
    pub did_you_mean: Vec<SuggestionToken>,
    /// true when `results` come from the spelling-corrected retry
    pub alt_results: bool,
    pub pager: PagerWindow,
    pub collections: BTreeMap<String, CollectionRef>,
    pub num_found: u64,
    pub num_found_display: String,
    pub engine_time_ms: u64,
    pub phase: SearchPhase,
}

impl SearchResultDocuments {
    /// Response for a request without query text: nothing was searched.
    pub fn empty(query: SearchQuery) -> Self {
        Self {
            query,
            engine_url: String::new(),
            results: Vec::new(),
            facets: Vec::new(),
            did_you_mean: Vec::new(),
            alt_results: false,
            pager: PagerWindow::single(),
            collections: BTreeMap::new(),
            num_found: 0,
            num_found_display: "0".to_string(),
            engine_time_ms: 0,
            phase: SearchPhase::NotSearched,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchResultDocumentItem {
    pub identifier: String,
    pub title: String,
    pub mediatype: Option<String>,
    pub collections: Vec<String>,
    /// every projected field, flattened to display strings
    pub fields: BTreeMap<String, Vec<String>>,
    pub highlights: BTreeMap<String, Vec<HighlightTextSpan>>,
    /// member of at least one access-restricted collection
    pub restricted: bool,
    pub admin_flagged: Option<bool>,
    pub thumbnails: Option<ThumbnailSet>,
    /// single preview image for non-movie items in the grid view
    pub image_thumbnail: Option<String>,
    pub result_index_in_page: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    pub base_url: String,
    pub images: Vec<String>,
    pub picked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultFacets {
    pub facet_field: String,
    pub facet_values: Vec<SearchResultFacetItem>,
}

impl SearchResultFacets {
    pub fn empty(facet_field: impl Into<String>) -> Self {
        Self { facet_field: facet_field.into(), facet_values: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultFacetItem {
    pub display_string: String,
    pub original_value: String,
    pub count: u64,
    pub selected: bool,
    /// query string that toggles this value; filled in at the HTTP edge
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum SuggestionToken {
    Orig(String),
    Fix(String),
}

impl SuggestionToken {
    pub fn text(&self) -> &str {
        match self {
            SuggestionToken::Orig(text) | SuggestionToken::Fix(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerWindow {
    pub total_pages: u64,
    pub pages: Vec<u64>,
    pub links: Vec<PageLink>,
}

impl PagerWindow {
    pub fn single() -> Self {
        Self { total_pages: 1, pages: vec![1], links: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub page: u64,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub identifier: String,
    pub title: String,
    pub hidden: bool,
    pub access_restricted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    NotSearched,
    HasResults,
    ZeroWithSuggestions,
    ZeroNoSuggestions,
    RetrySent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoreLikeThisResult {
    pub identifier: String,
    pub engine_url: String,
    pub results: Vec<SearchResultDocumentItem>,
    pub collections: BTreeMap<String, CollectionRef>,
    pub engine_time_ms: u64,
}
