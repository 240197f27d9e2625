//! HTTP client for the shelf catalog site.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{FetchError, ParseError, RawCell, RawShelfRow, ShelfError, ShelfSource};

const USER_AGENT: &str = concat!("bookblend-server/", env!("CARGO_PKG_VERSION"));

lazy_static! {
    static ref TABLE_SELECTOR: Selector = Selector::parse("table#books").unwrap();
    static ref ROW_SELECTOR: Selector = Selector::parse("tr").unwrap();
    static ref HEADER_CELL_SELECTOR: Selector = Selector::parse("th").unwrap();
    static ref DATA_CELL_SELECTOR: Selector = Selector::parse("td").unwrap();
    static ref LINK_SELECTOR: Selector = Selector::parse("a[href]").unwrap();
}

/// HTTP client for fetching a user's review list pages.
pub struct GoodreadsClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoodreadsClient {
    /// Create a new shelf client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the catalog site (e.g., "https://www.goodreads.com")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: impl Into<String>, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .user_agent(USER_AGENT)
            .build()?;

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Get the base URL of the catalog site.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ShelfSource for GoodreadsClient {
    async fn fetch_page(&self, user: &str, page: u32) -> Result<Vec<RawShelfRow>, ShelfError> {
        let url = format!(
            "{}/review/list/{}?page={}",
            self.base_url,
            urlencoding::encode(user),
            page
        );
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(FetchError::from)?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()).into());
        }

        let body = response.text().await.map_err(FetchError::from)?;
        Ok(parse_shelf_page(&body)?)
    }
}

/// Column positions of the shelf table, resolved from its header row.
struct ShelfColumns {
    title: usize,
    author: usize,
    pages: usize,
    rating: usize,
    ratings_count: usize,
    publication: usize,
    times_read: usize,
}

impl ShelfColumns {
    fn resolve(headers: &[String]) -> Result<Self, ParseError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or(ParseError::MissingColumn(name))
        };

        Ok(Self {
            title: find("title")?,
            author: find("author")?,
            pages: find("pages")?,
            rating: find("rating")?,
            ratings_count: find("ratings")?,
            publication: find("pub")?,
            times_read: find("votes")?,
        })
    }

    fn extract(&self, cells: &[ElementRef]) -> RawShelfRow {
        let text = |index: usize| cells.get(index).map(flatten_text).unwrap_or_default();

        let title_cell = cells.get(self.title);
        RawShelfRow {
            title: RawCell {
                text: title_cell.map(flatten_text).unwrap_or_default(),
                link: title_cell.and_then(first_link),
            },
            author: text(self.author),
            pages: text(self.pages),
            rating: text(self.rating),
            ratings_count: text(self.ratings_count),
            publication: text(self.publication),
            times_read: text(self.times_read),
        }
    }
}

/// Parse one review list page into raw shelf rows.
///
/// Zero rows is a valid result: it signals the page number is past the end of
/// the shelf.
pub fn parse_shelf_page(html: &str) -> Result<Vec<RawShelfRow>, ParseError> {
    let document = Html::parse_document(html);

    let table = document
        .select(&TABLE_SELECTOR)
        .next()
        .ok_or(ParseError::MissingTable)?;

    let header_row = table
        .select(&ROW_SELECTOR)
        .find(|row| row.select(&HEADER_CELL_SELECTOR).next().is_some())
        .ok_or(ParseError::MissingHeader)?;
    let headers: Vec<String> = header_row
        .select(&HEADER_CELL_SELECTOR)
        .map(|cell| flatten_text(&cell))
        .collect();
    let columns = ShelfColumns::resolve(&headers)?;

    let mut rows = Vec::new();
    for row in table.select(&ROW_SELECTOR) {
        let cells: Vec<ElementRef> = row.select(&DATA_CELL_SELECTOR).collect();
        if cells.is_empty() {
            // Header row or decorative spacer
            continue;
        }
        rows.push(columns.extract(&cells));
    }

    Ok(rows)
}

/// Flatten an element's text content into one whitespace-normalized string.
fn flatten_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_link(el: &ElementRef) -> Option<String> {
    el.select(&LINK_SELECTOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.to_string())
}
