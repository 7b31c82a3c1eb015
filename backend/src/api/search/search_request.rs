//! Inbound parameters to a [`SearchQuery`].

use common::{
    search_const::MAX_ROWS,
    search_query::{AdminFilter, DateParams, SearchQuery, SearchView},
};
use tracing::warn;

use crate::{
    api::search::param_codec::QueryParams,
    tables::{ParamKind, SearchTables},
};

pub fn parse_search_query(params: &QueryParams, tables: &SearchTables) -> SearchQuery {
    let owned = |key: &str| params.get_non_empty(key).map(String::from);

    let mut query = SearchQuery {
        query_string: params.get("q").unwrap_or("").trim().to_string(),
        page: params
            .get_non_empty("page")
            .and_then(|p| p.parse::<u64>().ok())
            .unwrap_or(1)
            .max(1),
        rows: params
            .get_non_empty("rows")
            .and_then(|r| r.parse::<u64>().ok())
            .map(|r| r.min(MAX_ROWS)),
        sort: owned("sort"),
        view: params.get("view").map(SearchView::parse).unwrap_or_default(),
        field_set: owned("field_set"),
        fields: owned("fields"),
        extra: owned("extra"),
        debug: params
            .get_non_empty("debug")
            .is_some_and(|d| !matches!(d, "0" | "false" | "no")),
        no_fallback: params.contains("nfpr"),
        facet: owned("facet"),
        admin_filter: params.get_non_empty("admin_filter").and_then(AdminFilter::parse),
        date: DateParams {
            date_range: owned("date_range"),
            date_facet: owned("date_facet"),
            date_from: owned("date_from"),
            date_to: owned("date_to"),
        },
        ..Default::default()
    };

    for (key, value) in params.pairs() {
        match tables.classify_param(key) {
            ParamKind::Reserved => {}
            ParamKind::FacetFilter => {
                let value = value.trim();
                if !value.is_empty() && !query.facet_filters.contains_key(key) {
                    query.facet_filters.insert(key.clone(), value.to_string());
                }
            }
            ParamKind::ImplicitField => {
                if !query.implicit_fields.contains(key) {
                    query.implicit_fields.push(key.clone());
                }
            }
            ParamKind::UnknownField => {
                if !query.unknown_params.contains(key) {
                    warn!("ignoring unknown search parameter {:?}", key);
                    query.unknown_params.push(key.clone());
                }
            }
        }
    }

    query
}


#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> SearchQuery {
        parse_search_query(&QueryParams::decode(raw), &SearchTables::new())
    }

    #[test]
    fn control_parameters_are_read() {
        let query = parse("q=moon+landing&page=3&rows=20&sort=downloads+desc&view=grid&debug=1&nfpr=1");
        assert_eq!(query.query_string, "moon landing");
        assert_eq!(query.page, 3);
        assert_eq!(query.rows, Some(20));
        assert_eq!(query.sort.as_deref(), Some("downloads desc"));
        assert_eq!(query.view, SearchView::Grid);
        assert!(query.debug);
        assert!(query.no_fallback);
    }

    #[test]
    fn bad_numbers_use_defaults() {
        let query = parse("q=x&page=zero&rows=999999");
        assert_eq!(query.page, 1);
        assert_eq!(query.rows, Some(MAX_ROWS));
        let query = parse("q=x&page=0");
        assert_eq!(query.page, 1);
    }

    #[test]
    fn facet_parameters_become_filters() {
        let query = parse("q=x&mediatype=movies&collection=&mediatype=texts");
        assert_eq!(query.facet_filters.get("mediatype").map(String::as_str), Some("movies"));
        assert!(!query.facet_filters.contains_key("collection"));
    }

    #[test]
    fn known_fields_become_columns_and_the_rest_is_rejected() {
        let query = parse("q=x&publicdate=&imagecount=1&fq=evil:*&fq=again");
        assert_eq!(query.implicit_fields, vec!["publicdate", "imagecount"]);
        assert_eq!(query.unknown_params, vec!["fq"]);
        assert!(query.facet_filters.is_empty());
    }

    #[test]
    fn date_parameters_are_kept_raw() {
        let query = parse("q=x&date_range=1950-1960&date_facet=1970");
        assert_eq!(query.date.date_range.as_deref(), Some("1950-1960"));
        assert_eq!(query.date.date_facet.as_deref(), Some("1970"));
        assert_eq!(query.date.date_from, None);
    }

    #[test]
    fn admin_filter_is_parsed() {
        assert_eq!(parse("q=x&admin_filter=flagged").admin_filter, Some(AdminFilter::Flagged));
        assert_eq!(parse("q=x&admin_filter=maybe").admin_filter, None);
    }
}
