//! Resolution of the mutually exclusive date filter forms.

use std::sync::LazyLock;

use chrono::NaiveDate;
use common::search_query::DateParams;
use regex::Regex;

static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)-(\d+)$").expect("valid date range regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateConstraint {
    ExplicitRange { start_year: u32, end_year: u32 },
    BucketExpand { anchor_year: u32, gap: u32 },
    OpenRange { from_date: Option<NaiveDate>, to_date: Option<NaiveDate> },
    None,
}

impl DateConstraint {
    /// First form that parses wins: `date_range`, then `date_facet`, then
    /// `date_from`/`date_to`.
    pub fn resolve(params: &DateParams, gap: u32) -> Self {
        if let Some((start_year, end_year)) = params.date_range.as_deref().and_then(parse_year_range) {
            return DateConstraint::ExplicitRange { start_year, end_year };
        }
        if let Some(anchor_year) = params.date_facet.as_deref().and_then(parse_year) {
            return DateConstraint::BucketExpand { anchor_year, gap };
        }
        let from_date = params.date_from.as_deref().and_then(parse_day);
        let to_date = params.date_to.as_deref().and_then(parse_day);
        if from_date.is_some() || to_date.is_some() {
            return DateConstraint::OpenRange { from_date, to_date };
        }
        DateConstraint::None
    }

    pub fn to_filter_clause(&self) -> Option<String> {
        match self {
            DateConstraint::ExplicitRange { start_year, end_year } => Some(format!(
                "date:[{start_year:04}-01-01T00:00:00Z TO {end_year:04}-01-01T00:00:00Z}}"
            )),
            // same boundaries as the date range facet buckets
            DateConstraint::BucketExpand { anchor_year, gap } => Some(format!(
                "date:([{anchor_year:04}-01-01T00:00:00Z TO {anchor_year:04}-01-01T00:00:00Z+{gap}YEAR] NOT \"{anchor_year:04}-01-01T00:00:00Z+{gap}YEAR\")"
            )),
            DateConstraint::OpenRange { from_date, to_date } => {
                let from = from_date
                    .map(|d| format!("{}T00:00:00Z", d.format("%Y-%m-%d")))
                    .unwrap_or("*".to_string());
                let to = to_date
                    .map(|d| format!("{}T23:59:59Z", d.format("%Y-%m-%d")))
                    .unwrap_or("*".to_string());
                Some(format!("date:[{from} TO {to}]"))
            }
            DateConstraint::None => None,
        }
    }
}

fn parse_year_range(value: &str) -> Option<(u32, u32)> {
    let captures = DATE_RANGE.captures(value.trim())?;
    let start = captures.get(1)?.as_str().parse().ok()?;
    let end = captures.get(2)?.as_str().parse().ok()?;
    Some((start, end))
}

fn parse_year(value: &str) -> Option<u32> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}
