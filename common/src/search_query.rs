//! Shared search query models and helpers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::search_const::{GRID_RESULTS_PER_PAGE, RESULTS_PER_PAGE};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    pub query_string: String,
    /// facet field -> the single active value selected for it
    pub facet_filters: BTreeMap<String, String>,
    pub date: DateParams,
    pub page: u64,
    pub rows: Option<u64>,
    pub sort: Option<String>,
    pub view: SearchView,
    pub field_set: Option<String>,
    pub fields: Option<String>,
    pub extra: Option<String>,
    pub debug: bool,
    /// `nfpr`: never fall back to a spelling-corrected query
    pub no_fallback: bool,
    /// facet browsed by the facet view
    pub facet: Option<String>,
    pub admin_filter: Option<AdminFilter>,
    /// known field names passed as bare parameters; shown as extra columns
    pub implicit_fields: Vec<String>,
    /// parameter names that are neither control parameters nor known fields
    pub unknown_params: Vec<String>,
}

impl SearchQuery {
    pub fn current_page(&self) -> u64 {
        self.page.max(1)
    }
}

/// Raw date selection exactly as it came in; resolved by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DateParams {
    pub date_range: Option<String>,
    pub date_facet: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchView {
    #[default]
    Search,
    Grid,
    ThumbCompare,
    Facet,
    Collection,
}

impl SearchView {
    /// Unknown view names fall back to the plain result list.
    pub fn parse(name: &str) -> Self {
        match name {
            "grid" => SearchView::Grid,
            "thumb_compare" => SearchView::ThumbCompare,
            "facet" => SearchView::Facet,
            "collection" => SearchView::Collection,
            _ => SearchView::Search,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchView::Search => "search",
            SearchView::Grid => "grid",
            SearchView::ThumbCompare => "thumb_compare",
            SearchView::Facet => "facet",
            SearchView::Collection => "collection",
        }
    }

    pub fn default_rows(&self) -> u64 {
        match self {
            SearchView::Grid => GRID_RESULTS_PER_PAGE,
            // the facet view only shows counts
            SearchView::Facet => 0,
            SearchView::Search | SearchView::ThumbCompare | SearchView::Collection => RESULTS_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminFilter {
    Flagged,
    Unflagged,
}

impl AdminFilter {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "flagged" => Some(AdminFilter::Flagged),
            "unflagged" => Some(AdminFilter::Unflagged),
            _ => None,
        }
    }

    pub fn keeps(&self, flagged: bool) -> bool {
        match self {
            AdminFilter::Flagged => flagged,
            AdminFilter::Unflagged => !flagged,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_view_falls_back_to_search() {
        assert_eq!(SearchView::parse("grid"), SearchView::Grid);
        assert_eq!(SearchView::parse("thumb_compare"), SearchView::ThumbCompare);
        assert_eq!(SearchView::parse("gallery"), SearchView::Search);
        assert_eq!(SearchView::parse(""), SearchView::Search);
    }

    #[test]
    fn grid_requests_more_rows_than_search() {
        assert!(SearchView::Grid.default_rows() > SearchView::Search.default_rows());
        assert_eq!(SearchView::Facet.default_rows(), 0);
    }

    #[test]
    fn page_is_never_below_one() {
        let query = SearchQuery::default();
        assert_eq!(query.current_page(), 1);
        let query = SearchQuery { page: 7, ..Default::default() };
        assert_eq!(query.current_page(), 7);
    }

    #[test]
    fn query_deserializes_with_missing_fields() {
        let query: SearchQuery = serde_json::from_str(r#"{"query_string":"moon","view":"grid"}"#).unwrap();
        assert_eq!(query.query_string, "moon");
        assert_eq!(query.view, SearchView::Grid);
        assert!(query.facet_filters.is_empty());
    }

    #[test]
    fn admin_filter_keeps_matching_documents() {
        assert!(AdminFilter::Flagged.keeps(true));
        assert!(!AdminFilter::Flagged.keeps(false));
        assert!(AdminFilter::Unflagged.keeps(false));
        assert_eq!(AdminFilter::parse("other"), None);
    }
}
