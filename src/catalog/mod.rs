//! The book catalog domain: typed records and the per-request aggregation
//! pipeline that assembles them.

mod service;

pub use service::{CatalogError, CatalogService};

use serde::Serialize;
use std::collections::HashMap;

/// One entry of a user's shelf, normalized from the scraped page.
///
/// `external_id` is the catalog site's native numeric book id and is always
/// present on a parsed record; every other field may be null when its source
/// text could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub title: String,
    pub author: String,
    pub pages: Option<u32>,
    pub rating: Option<f64>,
    pub ratings_count: Option<u64>,
    pub publication_year: Option<i32>,
    pub read: bool,
    pub external_id: String,
}

/// A catalog record combined with its resolved tag list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: CatalogRecord,
    pub tags: Vec<String>,
}

/// Left-join catalog records with a tag mapping on the external id.
///
/// Total over its inputs: every record appears exactly once in the output,
/// with an empty tag list when the mapping has no entry for its id.
pub fn join_tags(
    records: Vec<CatalogRecord>,
    tags: &HashMap<String, Vec<String>>,
) -> Vec<EnrichedRecord> {
    records
        .into_iter()
        .map(|record| {
            let tags = tags.get(&record.external_id).cloned().unwrap_or_default();
            EnrichedRecord { record, tags }
        })
        .collect()
}
