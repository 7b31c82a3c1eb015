//! Facet counts to display facets.

use std::collections::{BTreeMap, HashSet};

use common::{
    search_const::YEAR_GAP,
    search_query::{SearchQuery, SearchView},
    search_result::{CollectionRef, SearchResultFacetItem, SearchResultFacets},
};

use crate::{
    api::{formatting::fmt_licenseurl, search::param_codec::{ParamValue, QueryParams}},
    db_utils::solr_utils::RawFacetCounts,
    tables::SearchTables,
};

const DATE_FACET: &str = "date";

/// Display facets in facet table order, followed by the date buckets when
/// the engine returned them.
pub fn assemble_facets(
    raw: Option<&RawFacetCounts>,
    query: &SearchQuery,
    tables: &SearchTables,
    collections: &BTreeMap<String, CollectionRef>,
) -> Vec<SearchResultFacets> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut result = Vec::new();
    for field in tables.facet_fields().iter().map(String::as_str) {
        let Some(buckets) = raw.facet_fields.get(field) else {
            continue;
        };
        let mut facet = SearchResultFacets::empty(field);
        let mut present_values = HashSet::new();
        for (value, count) in buckets {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => continue,
                other => other.to_string(),
            };
            if !present_values.insert(value.clone()) {
                continue;
            }
            if field == "collection" && collections.get(&value).is_some_and(|c| c.hidden) {
                continue;
            }
            facet.facet_values.push(SearchResultFacetItem {
                display_string: display_string(field, &value, tables, collections),
                selected: query.facet_filters.get(field) == Some(&value),
                original_value: value,
                count: *count,
                link: None,
            });
        }
        result.push(facet);
    }

    if let Some(range) = raw.facet_ranges.get(DATE_FACET) {
        let mut facet = SearchResultFacets::empty(DATE_FACET);
        for (start, count) in &range.counts {
            if *count == 0 {
                continue;
            }
            let Some(year) = start.get(..4).and_then(|y| y.parse::<u32>().ok()) else {
                continue;
            };
            let value = format!("{year:04}");
            facet.facet_values.push(SearchResultFacetItem {
                display_string: format!("{year}-{}", year + YEAR_GAP - 1),
                selected: query.date.date_facet.as_deref() == Some(value.as_str()),
                original_value: value,
                count: *count,
                link: None,
            });
        }
        result.push(facet);
    }

    result
}

/// Facet lookup by name: the plain field, then its `_facet` variant.
/// A name matching neither yields an empty facet.
pub fn find_facet(facets: &[SearchResultFacets], name: &str) -> SearchResultFacets {
    let suffixed = format!("{name}_facet");
    facets
        .iter()
        .find(|f| f.facet_field == name)
        .or_else(|| facets.iter().find(|f| f.facet_field == suffixed))
        .cloned()
        .unwrap_or_else(|| SearchResultFacets::empty(name))
}

/// The facets a view shows.
pub fn facets_for_view(facets: Vec<SearchResultFacets>, query: &SearchQuery) -> Vec<SearchResultFacets> {
    match query.view {
        SearchView::Facet => vec![find_facet(&facets, query.facet.as_deref().unwrap_or("collection"))],
        SearchView::Collection => vec![find_facet(&facets, "collection")],
        SearchView::Search | SearchView::Grid | SearchView::ThumbCompare => facets,
    }
}

/// Toggle links: a selected value removes its filter, any other value
/// selects it. Both reset to page 1.
pub fn attach_facet_links(facets: &mut [SearchResultFacets], params: &QueryParams) {
    for facet in facets.iter_mut() {
        let key = if facet.facet_field == DATE_FACET { "date_facet" } else { facet.facet_field.as_str() };
        let key = key.to_string();
        for item in facet.facet_values.iter_mut() {
            let value = if item.selected { None } else { Some(ParamValue::from(item.original_value.as_str())) };
            let mut updates = vec![(key.as_str(), value), ("page", None)];
            if key == "date_facet" {
                updates.push(("date_range", None));
            }
            item.link = Some(params.changed(&updates).encode());
        }
    }
}

fn display_string(field: &str, value: &str, tables: &SearchTables, collections: &BTreeMap<String, CollectionRef>) -> String {
    match field {
        "language" | "language_facet" => tables.language_label(value).to_string(),
        "licenseurl" => fmt_licenseurl(value),
        "collection" => collections
            .get(value)
            .map(|c| c.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or(value.to_string()),
        _ => value.to_string(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_utils::solr_utils::RawFacetRange;
    use serde_json::json;

    fn raw_facets() -> RawFacetCounts {
        RawFacetCounts {
            facet_fields: BTreeMap::from([
                ("mediatype".to_string(), vec![(json!("movies"), 10), (json!("texts"), 4), (json!("movies"), 1)]),
                ("language_facet".to_string(), vec![(json!("eng"), 7), (json!("xyz"), 1)]),
                ("collection".to_string(), vec![(json!("nasa"), 5), (json!("secret"), 2), (json!("misc"), 1)]),
                ("licenseurl".to_string(), vec![(json!("http://creativecommons.org/licenses/by/3.0/"), 2)]),
            ]),
            facet_ranges: BTreeMap::from([(
                DATE_FACET.to_string(),
                RawFacetRange { counts: vec![("1950-01-01T00:00:00Z".into(), 3), ("1960-01-01T00:00:00Z".into(), 0)] },
            )]),
        }
    }

    fn collections() -> BTreeMap<String, CollectionRef> {
        let entry = |id: &str, title: &str, hidden: bool| {
            (id.to_string(), CollectionRef { identifier: id.into(), title: title.into(), hidden, access_restricted: false })
        };
        BTreeMap::from([entry("nasa", "NASA Images", false), entry("secret", "Secret", true)])
    }

    fn assemble(query: &SearchQuery) -> Vec<SearchResultFacets> {
        assemble_facets(Some(&raw_facets()), query, &SearchTables::new(), &collections())
    }

    #[test]
    fn values_get_display_strings() {
        let facets = assemble(&SearchQuery::default());
        let language = find_facet(&facets, "language");
        assert_eq!(language.facet_field, "language_facet");
        assert_eq!(language.facet_values[0].display_string, "English");
        assert_eq!(language.facet_values[1].display_string, "xyz");

        let license = find_facet(&facets, "licenseurl");
        assert_eq!(license.facet_values[0].display_string, "CC BY 3.0");

        let collection = find_facet(&facets, "collection");
        let titles = collection.facet_values.iter().map(|v| v.display_string.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["NASA Images", "misc"]);
    }

    #[test]
    fn duplicate_buckets_are_dropped() {
        let facets = assemble(&SearchQuery::default());
        let mediatype = find_facet(&facets, "mediatype");
        assert_eq!(mediatype.facet_values.len(), 2);
        assert_eq!(mediatype.facet_values[0].count, 10);
    }

    #[test]
    fn date_buckets_skip_zero() {
        let facets = assemble(&SearchQuery::default());
        let dates = find_facet(&facets, DATE_FACET);
        assert_eq!(dates.facet_values.len(), 1);
        assert_eq!(dates.facet_values[0].display_string, "1950-1959");
    }

    #[test]
    fn selected_values_are_marked() {
        let query = SearchQuery {
            facet_filters: BTreeMap::from([("mediatype".to_string(), "texts".to_string())]),
            ..Default::default()
        };
        let mediatype = find_facet(&assemble(&query), "mediatype");
        assert!(!mediatype.facet_values[0].selected);
        assert!(mediatype.facet_values[1].selected);
    }

    #[test]
    fn unrecognized_facet_is_empty() {
        let facets = assemble(&SearchQuery::default());
        let missing = find_facet(&facets, "camera");
        assert_eq!(missing.facet_field, "camera");
        assert!(missing.facet_values.is_empty());
    }

    #[test]
    fn facet_view_keeps_only_the_requested_facet() {
        let query = SearchQuery { view: SearchView::Facet, facet: Some("language".into()), ..Default::default() };
        let facets = facets_for_view(assemble(&query), &query);
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].facet_field, "language_facet");
    }

    #[test]
    fn links_toggle_the_filter() {
        let query = SearchQuery {
            facet_filters: BTreeMap::from([("mediatype".to_string(), "texts".to_string())]),
            ..Default::default()
        };
        let mut facets = vec![find_facet(&assemble(&query), "mediatype")];
        attach_facet_links(&mut facets, &QueryParams::decode("q=moon&mediatype=texts&page=4"));
        assert_eq!(facets[0].facet_values[0].link.as_deref(), Some("q=moon&mediatype=movies"));
        assert_eq!(facets[0].facet_values[1].link.as_deref(), Some("q=moon"));
    }

    #[test]
    fn no_facet_counts_means_no_facets() {
        let facets = assemble_facets(None, &SearchQuery::default(), &SearchTables::new(), &BTreeMap::new());
        assert!(facets.is_empty());
    }
}
