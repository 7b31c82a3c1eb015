//! Constants shared by the query compiler and the result assembler.

/// Rows requested for the plain result list.
pub const RESULTS_PER_PAGE: u64 = 50;

/// Rows requested by the bulk grid view.
pub const GRID_RESULTS_PER_PAGE: u64 = 200;

/// Upper bound for an explicit `rows` parameter.
pub const MAX_ROWS: u64 = 1000;

/// Width of one date facet bucket, in years.
pub const YEAR_GAP: u32 = 10;

/// Number of page links shown by the pager.
pub const PAGER_WINDOW: u64 = 10;

/// The engine refuses identifier lookups larger than this.
pub const COLLECTION_LOOKUP_BATCH: usize = 50;

/// Facet values requested per field for the normal views.
pub const FACET_LIMIT: i64 = 30;

/// Facet values requested when a single facet is browsed on its own.
pub const FACET_VIEW_LIMIT: i64 = 1000;

/// Filter value meaning "field has no value at all".
pub const NULL_FILTER_SENTINEL: &str = "NULL";

/// Thumbnails shown per movie.
pub const THUMBNAILS_PER_ITEM: usize = 4;

/// Leading thumbnails skipped when sampling (title cards, black frames).
pub const THUMBNAILS_LEADING_SKIP: usize = 3;
