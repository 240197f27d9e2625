//! Turns raw shelf rows into typed catalog records.
//!
//! The review list renders every cell as display text with a leading column
//! label, so each rule here strips the label and pulls the typed value out of
//! whatever format the site used. Any cell that fails to parse degrades to a
//! null field; the one exception is the book id embedded in the title link,
//! which is required as the join key for tag enrichment.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::RawShelfRow;
use crate::catalog::CatalogRecord;

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+").unwrap();
    static ref DECIMAL: Regex = Regex::new(r"\d+\.\d+").unwrap();
    // A standalone year, skipping a leading day-of-month ("Jan 5, 1999" -> 1999).
    static ref PUB_YEAR: Regex = Regex::new(r"(?:\b\d{1,2},\s)?(\d{1,4})\b").unwrap();
}

/// Normalize one raw row into a [`CatalogRecord`].
///
/// Returns `None` (with a warning) when the title cell carries no embedded id
/// link; such a row has no join key and is excluded from the record set.
pub fn normalize_row(raw: RawShelfRow) -> Option<CatalogRecord> {
    let external_id = raw.title.link.as_deref().and_then(first_digit_run);
    let external_id = match external_id {
        Some(id) => id,
        None => {
            warn!(
                "Dropping shelf row without an embedded book id (title cell: {:?})",
                raw.title.text
            );
            return None;
        }
    };

    Some(CatalogRecord {
        title: raw.title.text.replacen("title ", "", 1),
        author: raw
            .author
            .replacen("author ", "", 1)
            .replacen(" *", "", 1),
        pages: first_int(&raw.pages),
        rating: first_decimal(&raw.rating),
        ratings_count: first_int(&raw.ratings_count.replace(',', "")),
        publication_year: publication_year(&raw.publication),
        read: first_int::<u64>(&raw.times_read).map(|n| n > 0).unwrap_or(false),
        external_id,
    })
}

fn first_digit_run(text: &str) -> Option<String> {
    DIGIT_RUN.find(text).map(|m| m.as_str().to_string())
}

fn first_int<T: std::str::FromStr>(text: &str) -> Option<T> {
    DIGIT_RUN.find(text).and_then(|m| m.as_str().parse().ok())
}

fn first_decimal(text: &str) -> Option<f64> {
    DECIMAL.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Extract a publication year from the many date formats the site uses.
///
/// The label prefix is stripped first; the regex then prefers a standalone
/// year over a day-in-month number.
fn publication_year(text: &str) -> Option<i32> {
    let text = text.replacen("date pub ", "", 1);
    PUB_YEAR
        .captures(&text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
