//! Shelf scraping for the Goodreads review list.
//!
//! The review list is served as an HTML table, so everything here is an
//! adapter around that page structure: [`client::GoodreadsClient`] fetches and
//! parses one page into [`RawShelfRow`]s, and [`normalize`] turns raw cells
//! into typed catalog records. Page structure knowledge stays inside this
//! module; the rest of the crate only sees the [`ShelfSource`] trait.

pub mod client;
pub mod normalize;

pub use client::GoodreadsClient;

use async_trait::async_trait;
use thiserror::Error;

/// Base URL of the public shelf catalog site.
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com";

/// One cell of a shelf row: flattened display text plus the first embedded
/// link, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCell {
    pub text: String,
    pub link: Option<String>,
}

/// One row of the shelf table, still in page form.
///
/// Only the title cell carries its link; the review list embeds the book link
/// there and the other columns are plain display text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawShelfRow {
    pub title: RawCell,
    pub author: String,
    pub pages: String,
    pub rating: String,
    pub ratings_count: String,
    pub publication: String,
    pub times_read: String,
}

/// Errors reaching the shelf catalog site at all.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to the shelf catalog site failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("shelf catalog site returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Errors reading the expected table structure out of a fetched page.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("shelf table not found in page markup")]
    MissingTable,

    #[error("shelf table is missing its header row")]
    MissingHeader,

    #[error("shelf table is missing the '{0}' column")]
    MissingColumn(&'static str),
}

/// Failure of a single shelf page request, fatal to the whole aggregation.
#[derive(Debug, Error)]
pub enum ShelfError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A source of shelf pages for a user.
///
/// Page numbers are 1-based. An empty result means the page number is past
/// the end of the shelf; that is the pagination termination signal, not an
/// error.
#[async_trait]
pub trait ShelfSource: Send + Sync {
    async fn fetch_page(&self, user: &str, page: u32) -> Result<Vec<RawShelfRow>, ShelfError>;
}
