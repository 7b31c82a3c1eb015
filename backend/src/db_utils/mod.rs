pub mod clickhouse_utils;
pub mod decompose_spans;
pub mod item_locator;
pub mod solr_utils;
