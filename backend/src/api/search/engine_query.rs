//! Compiles a [`SearchQuery`] into one outbound engine request.

use std::sync::LazyLock;

use common::{
    search_const::{FACET_LIMIT, FACET_VIEW_LIMIT, RESULTS_PER_PAGE, YEAR_GAP},
    search_query::{SearchQuery, SearchView},
};
use regex::Regex;
use url::form_urlencoded;

use crate::{
    api::search::{
        date_constraint::DateConstraint,
        facet_filters::{FilterClause, build_filter_clauses},
        field_projection::FieldProjection,
    },
    tables::SearchTables,
};

static FIELD_WILDCARD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w.-]+:\*$").expect("valid field wildcard regex"));

const HIGHLIGHT_FIELDS: &str = "title,creator,subject,collection,description,case-name";
const HIGHLIGHT_PRE: &str = "{{{";
const HIGHLIGHT_POST: &str = "}}}";
const CURATED_BOOST: &str = "(*:* -collection:ourmedia -collection:opensource* collection:*)^10";
const SIMILARITY_FIELDS: &str = "creator,title,subject,collection,mediatype,description,case-name,sponsor";
const SIMILAR_ROWS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineHandler {
    Select,
    MoreLikeThis,
}

impl EngineHandler {
    fn path(&self) -> &'static str {
        match self {
            EngineHandler::Select => "select",
            EngineHandler::MoreLikeThis => "mlt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetFieldDecl {
    pub field: String,
    /// set exactly when the field has an active filter
    pub exclude_tag: Option<String>,
}

impl FacetFieldDecl {
    fn to_engine_param(&self) -> String {
        match &self.exclude_tag {
            Some(tag) => format!("{{!ex={tag}}}{}", self.field),
            None => self.field.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryAttempt {
    Primary,
    /// retry with the spelling-corrected text; never asks for new suggestions
    Corrected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRequest {
    pub handler: EngineHandler,
    pub query: String,
    pub query_fields: String,
    pub filter_clauses: Vec<FilterClause>,
    pub date_clause: Option<String>,
    pub facet_fields: Vec<FacetFieldDecl>,
    pub facet_limit: i64,
    pub fields: Vec<String>,
    pub highlight: bool,
    pub spellcheck: bool,
    pub boost_curated: bool,
    pub sort: Option<String>,
    pub start: u64,
    pub rows: u64,
    pub debug: bool,
}

impl EngineRequest {
    /// Plain lookup without facets, highlighting or spellcheck.
    pub fn lookup(query: String, query_fields: &str, fields: &[&str], rows: u64) -> Self {
        Self {
            handler: EngineHandler::Select,
            query,
            query_fields: query_fields.to_string(),
            filter_clauses: Vec::new(),
            date_clause: None,
            facet_fields: Vec::new(),
            facet_limit: FACET_LIMIT,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            highlight: false,
            spellcheck: false,
            boost_curated: false,
            sort: None,
            start: 0,
            rows,
            debug: false,
        }
    }

    pub fn more_like_this(identifier: &str, fields: &[String]) -> Self {
        Self {
            handler: EngineHandler::MoreLikeThis,
            fields: fields.to_vec(),
            ..Self::lookup(format!("identifier:{}", quote_term(identifier)), "identifier", &[], SIMILAR_ROWS)
        }
    }

    /// Engine parameters in a fixed order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = Vec::new();
        let mut push = |k: &str, v: String| params.push((k.to_string(), v));

        push("wt", "json".into());
        push("json.nl", "arrarr".into());
        push("q", self.query.clone());
        match self.handler {
            EngineHandler::Select => {
                push("defType", "edismax".into());
                push("qf", self.query_fields.clone());
                push("q.op", "AND".into());
            }
            EngineHandler::MoreLikeThis => {
                push("mlt.fl", SIMILARITY_FIELDS.into());
                push("mlt.mintf", "1".into());
            }
        }
        if !self.fields.is_empty() {
            push("fl", self.fields.join(","));
        }
        push("start", self.start.to_string());
        push("rows", self.rows.to_string());
        if let Some(sort) = &self.sort {
            push("sort", sort.clone());
        }
        for clause in &self.filter_clauses {
            push("fq", clause.to_engine_param());
        }
        if let Some(date_clause) = &self.date_clause {
            push("fq", date_clause.clone());
        }
        if self.boost_curated {
            push("bq", CURATED_BOOST.into());
        }
        if !self.facet_fields.is_empty() {
            push("facet", "true".into());
            push("facet.limit", self.facet_limit.to_string());
            push("facet.mincount", "1".into());
            push("facet.range", "date".into());
            push("f.date.facet.range.start", "0000-01-01T00:00:00Z".into());
            push("f.date.facet.range.end", "NOW/YEAR+1YEAR".into());
            push("f.date.facet.range.gap", format!("+{YEAR_GAP}YEAR"));
            for facet in &self.facet_fields {
                push("facet.field", facet.to_engine_param());
            }
        }
        if self.highlight {
            push("hl", "true".into());
            push("hl.snippets", "1".into());
            push("hl.fragsize", "0".into());
            push("hl.fl", HIGHLIGHT_FIELDS.into());
            push("hl.simple.pre", HIGHLIGHT_PRE.into());
            push("hl.simple.post", HIGHLIGHT_POST.into());
            push("f.description.hl.fragsize", "200".into());
        }
        if self.spellcheck {
            push("spellcheck", "true".into());
            push("spellcheck.count", "1".into());
        }
        if self.debug {
            push("debugQuery", "true".into());
        }
        params
    }

    /// Literal request URL; also what the diagnostics show.
    pub fn to_url(&self, base_url: &str) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.to_params() {
            serializer.append_pair(&k, &v);
        }
        format!("{}/{}?{}", base_url.trim_end_matches('/'), self.handler.path(), serializer.finish())
    }
}

pub fn compile_search_request(query: &SearchQuery, tables: &SearchTables, attempt: QueryAttempt, query_text: &str) -> EngineRequest {
    let filter_clauses = build_filter_clauses(query, tables);
    let date_clause = DateConstraint::resolve(&query.date, YEAR_GAP).to_filter_clause();
    let fields = FieldProjection::resolve(query, tables).into_fields();

    let facet_fields = tables
        .facet_fields()
        .iter()
        .map(|field| FacetFieldDecl {
            field: field.clone(),
            exclude_tag: filter_clauses
                .iter()
                .find(|clause| &clause.field == field)
                .map(|clause| clause.tag.clone()),
        })
        .collect();

    let rows = query.rows.unwrap_or(query.view.default_rows());
    let facet_limit = match query.view {
        SearchView::Facet => FACET_VIEW_LIMIT,
        _ => FACET_LIMIT,
    };

    EngineRequest {
        handler: EngineHandler::Select,
        query: query_text.to_string(),
        query_fields: "text".to_string(),
        filter_clauses,
        date_clause,
        facet_fields,
        facet_limit,
        fields,
        highlight: wants_highlighting(query_text),
        spellcheck: attempt == QueryAttempt::Primary,
        boost_curated: true,
        sort: query.sort.clone(),
        start: rows.saturating_mul(query.current_page() - 1),
        rows,
        debug: query.debug,
    }
}

/// Page size used by the pager; a zero-row view still pages by the default.
pub fn page_size(query: &SearchQuery) -> u64 {
    match query.rows.unwrap_or(query.view.default_rows()) {
        0 => RESULTS_PER_PAGE,
        rows => rows,
    }
}

/// Bare wildcards and `field:*` patterns have nothing to highlight.
fn wants_highlighting(query_text: &str) -> bool {
    let text = query_text.trim();
    !(text.is_empty() || text == "*" || text == "*:*" || FIELD_WILDCARD.is_match(text))
}

fn quote_term(term: &str) -> String {
    format!("\"{}\"", term.replace('\\', "\\\\").replace('"', "\\\""))
}
