//! Per-request catalog assembly: paginate the shelf, enrich with tags, join.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::{join_tags, CatalogRecord, EnrichedRecord};
use crate::goodreads::normalize::normalize_row;
use crate::goodreads::{ShelfError, ShelfSource};
use crate::hardcover::{MetadataServiceError, TagSource};

/// Failure of the whole aggregation. There are no partial results: a failure
/// on any page, or in the tag lookup, aborts the request.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Shelf(#[from] ShelfError),

    #[error(transparent)]
    Metadata(#[from] MetadataServiceError),
}

/// Assembles a user's enriched catalog from the two upstream sources.
///
/// Everything runs sequentially within one request: pages are fetched one at
/// a time in order, then one batched tag lookup, then an in-memory join.
pub struct CatalogService {
    shelf: Arc<dyn ShelfSource>,
    tags: Arc<dyn TagSource>,
}

impl CatalogService {
    pub fn new(shelf: Arc<dyn ShelfSource>, tags: Arc<dyn TagSource>) -> Self {
        Self { shelf, tags }
    }

    /// Collect the user's full shelf across all pages.
    ///
    /// Walks pages from 1 until the first empty page, normalizing rows as they
    /// arrive and preserving page and in-page order.
    pub async fn collect_shelf(&self, user: &str) -> Result<Vec<CatalogRecord>, ShelfError> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            info!("Fetching {}'s page {}...", user, page);
            let rows = self.shelf.fetch_page(user, page).await?;
            if rows.is_empty() {
                info!("Page {} is empty.", page);
                break;
            }
            records.extend(rows.into_iter().filter_map(normalize_row));
            page += 1;
        }

        Ok(records)
    }

    /// Collect the shelf and left-join it with tags from the metadata source.
    pub async fn enriched_shelf(&self, user: &str) -> Result<Vec<EnrichedRecord>, CatalogError> {
        let records = self.collect_shelf(user).await?;

        let ids: Vec<String> = records
            .iter()
            .map(|record| record.external_id.clone())
            .collect();
        let mapping = if ids.is_empty() {
            HashMap::new()
        } else {
            self.tags.tags_for(&ids).await?
        };

        Ok(join_tags(records, &mapping))
    }
}
