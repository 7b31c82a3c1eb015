//! Output field list for a request.

use common::search_query::SearchQuery;
use tracing::warn;

use crate::tables::SearchTables;

/// Extra fields are inserted in front of the first of these.
const ANCHOR_FIELDS: [&str; 2] = ["mediatype", "identifier"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldProjection {
    fields: Vec<String>,
}

impl FieldProjection {
    /// `field_set`, else `fields`, else the default list; `extra` spliced in;
    /// implicit field columns appended.
    pub fn resolve(query: &SearchQuery, tables: &SearchTables) -> Self {
        let named_set = query.field_set.as_deref().and_then(|name| {
            let set = tables.field_set(name);
            if set.is_none() {
                warn!("unknown field_set {:?}, ignoring", name);
            }
            set
        });

        let base = match (named_set, query.fields.as_deref()) {
            (Some(set), _) => set.to_vec(),
            (None, Some(list)) if !split_field_list(list).is_empty() => split_field_list(list),
            _ => tables.default_fields().to_vec(),
        };

        let mut fields = Vec::with_capacity(base.len());
        for field in base {
            push_unique(&mut fields, field);
        }

        if let Some(extra) = query.extra.as_deref() {
            let mut extras = Vec::new();
            for field in split_field_list(extra) {
                if !fields.contains(&field) {
                    push_unique(&mut extras, field);
                }
            }
            let at = fields
                .iter()
                .position(|f| ANCHOR_FIELDS.contains(&f.as_str()))
                .unwrap_or(0);
            fields.splice(at..at, extras);
        }

        for field in &query.implicit_fields {
            push_unique(&mut fields, field.clone());
        }

        Self { fields }
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

fn split_field_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(String::from)
        .collect()
}

fn push_unique(fields: &mut Vec<String>, field: String) {
    if !fields.contains(&field) {
        fields.push(field);
    }
}
