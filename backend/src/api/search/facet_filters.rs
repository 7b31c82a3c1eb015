//! Filter clauses for the active facet selections.

use common::{search_const::NULL_FILTER_SENTINEL, search_query::SearchQuery};

use crate::tables::SearchTables;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// already escaped literal
    Exact(String),
    /// the field has no value
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: String,
    pub value: FilterValue,
    /// always the field name, so the field's own facet can exclude it
    pub tag: String,
}

impl FilterClause {
    pub fn new(field: &str, raw_value: &str) -> Self {
        let value = if raw_value == NULL_FILTER_SENTINEL {
            FilterValue::Missing
        } else {
            FilterValue::Exact(escape_filter_value(raw_value))
        };
        Self { field: field.to_string(), value, tag: field.to_string() }
    }

    /// `fq` value sent to the engine.
    pub fn to_engine_param(&self) -> String {
        let field = &self.field;
        match &self.value {
            FilterValue::Exact(value) => format!("{{!tag={}}}{field}:\"{value}\"", self.tag),
            FilterValue::Missing => format!("{{!tag={}}}(*:* -{field}:*)", self.tag),
        }
    }
}

/// Backslash-escape the characters the engine's query parser treats as syntax.
pub fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '[' | ']' | ':' | '(' | ')' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// One clause per recognized facet field with a non-empty selection,
/// in facet table order.
pub fn build_filter_clauses(query: &SearchQuery, tables: &SearchTables) -> Vec<FilterClause> {
    tables
        .facet_fields()
        .iter()
        .filter_map(|field| {
            let value = query.facet_filters.get(field)?;
            if value.is_empty() {
                return None;
            }
            Some(FilterClause::new(field, value))
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn query_with(filters: &[(&str, &str)]) -> SearchQuery {
        SearchQuery {
            query_string: "test".into(),
            facet_filters: filters.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn special_characters_are_escaped() {
        assert_eq!(escape_filter_value("a[b]c:d(e)f"), "a\\[b\\]c\\:d\\(e\\)f");
        assert_eq!(escape_filter_value("plain value"), "plain value");
    }

    #[test]
    fn trailing_backslash_cannot_close_the_quote() {
        let clause = FilterClause::new("creator", "foo\\");
        assert_eq!(clause.to_engine_param(), "{!tag=creator}creator:\"foo\\\\\"");
    }

    /// Undoes the escaping; `None` when a syntax character is left bare.
    fn unescape(escaped: &str) -> Option<String> {
        let mut plain = String::new();
        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => plain.push(chars.next()?),
                '[' | ']' | ':' | '(' | ')' | '"' => return None,
                other => plain.push(other),
            }
        }
        Some(plain)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn every_syntax_character_is_escaped(value in r#"[a-z \\\[\]:()"]{0,24}"#) {
            let escaped = escape_filter_value(&value);
            prop_assert_eq!(unescape(&escaped), Some(value.clone()));
        }

        #[test]
        fn arbitrary_values_survive_escaping(value in ".*") {
            prop_assert_eq!(unescape(&escape_filter_value(&value)), Some(value.clone()));
        }
    }

    #[test]
    fn clause_is_tagged_with_its_field() {
        let clause = FilterClause::new("collection", "prelinger:archive");
        assert_eq!(clause.tag, "collection");
        assert_eq!(clause.to_engine_param(), "{!tag=collection}collection:\"prelinger\\:archive\"");
    }

    #[test]
    fn null_sentinel_becomes_missing_value_clause() {
        let clause = FilterClause::new("language_facet", "NULL");
        assert_eq!(clause.value, FilterValue::Missing);
        assert_eq!(clause.to_engine_param(), "{!tag=language_facet}(*:* -language_facet:*)");
    }

    #[test]
    fn only_recognized_non_empty_facets_compile() {
        let tables = SearchTables::new();
        let query = query_with(&[("mediatype", "movies"), ("collection", ""), ("bogus", "x")]);
        let clauses = build_filter_clauses(&query, &tables);
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].field, "mediatype");
    }

    #[test]
    fn clauses_follow_facet_table_order() {
        let tables = SearchTables::new();
        let query = query_with(&[("video_codec", "h264"), ("mediatype", "movies")]);
        let fields = build_filter_clauses(&query, &tables).into_iter().map(|c| c.field).collect::<Vec<_>>();
        assert_eq!(fields, vec!["mediatype", "video_codec"]);
    }
}
