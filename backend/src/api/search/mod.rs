//! Search pipeline: parameters in, engine requests out, display results back.

pub mod admin_filter;
pub mod collection_titles;
pub mod date_constraint;
pub mod engine_query;
pub mod facet_filters;
pub mod field_projection;
pub mod pager;
pub mod param_codec;
pub mod search_facets;
pub mod search_for_results;
pub mod search_request;
pub mod suggestions;
