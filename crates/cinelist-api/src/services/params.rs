//! Query parameters for each catalog endpoint.
//!
//! Date windows take `today` explicitly so they can be checked without a clock.

use chrono::{Datelike, Months, NaiveDate};
use cinelist_config::Config;
use serde_json::{json, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Request defaults shared by every catalog call.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSettings {
    pub language: String,
    pub region: String,
    pub popular_min_votes: u32,
    pub upcoming_months: u32,
    pub release_types: String,
}

impl CatalogSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.api.language.clone(),
            region: config.api.region.clone(),
            popular_min_votes: config.discover.popular_min_votes,
            upcoming_months: config.discover.upcoming_months,
            release_types: config.discover.release_types.clone(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// First and last day of the month containing `today`.
pub fn month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(today);
    (first, last)
}

/// `today` through `today + months`, clamped to the end of shorter months.
pub fn upcoming_window(today: NaiveDate, months: u32) -> (NaiveDate, NaiveDate) {
    let end = today
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX);
    (today, end)
}

pub fn now_playing(settings: &CatalogSettings, page: u32, sort_by: &str, today: NaiveDate) -> Value {
    let (from, to) = month_window(today);
    json!({
        "page": page,
        "language": settings.language,
        "sort_by": sort_by,
        "with_release_type": settings.release_types,
        "release_date.gte": from.format(DATE_FORMAT).to_string(),
        "release_date.lte": to.format(DATE_FORMAT).to_string(),
        "region": settings.region,
    })
}

pub fn popular(settings: &CatalogSettings, page: u32, sort_by: &str) -> Value {
    json!({
        "page": page,
        "language": settings.language,
        "sort_by": sort_by,
        "vote_count.gte": settings.popular_min_votes,
    })
}

pub fn upcoming(settings: &CatalogSettings, page: u32, sort_by: &str, today: NaiveDate) -> Value {
    let (from, to) = upcoming_window(today, settings.upcoming_months);
    json!({
        "page": page,
        "language": settings.language,
        "sort_by": sort_by,
        "with_release_type": settings.release_types,
        "release_date.gte": from.format(DATE_FORMAT).to_string(),
        "release_date.lte": to.format(DATE_FORMAT).to_string(),
        "region": settings.region,
    })
}

pub fn search(settings: &CatalogSettings, query: &str, page: u32) -> Value {
    json!({
        "query": query,
        "page": page,
        "language": settings.language,
        "include_adult": false,
    })
}

/// Detail lookups also pull the per-country release dates used for certifications.
pub fn details(settings: &CatalogSettings) -> Value {
    json!({
        "language": settings.language,
        "append_to_response": "release_dates",
    })
}

pub fn credits(settings: &CatalogSettings) -> Value {
    json!({ "language": settings.language })
}

pub fn recommendations(settings: &CatalogSettings, page: u32) -> Value {
    json!({
        "page": page,
        "language": settings.language,
    })
}
