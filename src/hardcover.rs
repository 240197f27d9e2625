//! GraphQL client for the Hardcover tag metadata service.
//!
//! One request resolves tags for a whole batch of book ids: the ids are
//! inlined into a `book_mappings` query filtered to the Goodreads platform,
//! and the nested taggings come back flattened into an id -> tags map.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Production GraphQL endpoint of the tag metadata service.
pub const DEFAULT_GRAPHQL_URL: &str = "https://hardcover-production.hasura.app/v1/graphql";

/// Platform id under which the service files Goodreads book mappings.
const GOODREADS_PLATFORM_ID: u8 = 1;

/// Failure of the batched tag lookup, fatal to the whole request.
#[derive(Debug, Error)]
pub enum MetadataServiceError {
    #[error("request to the tag metadata service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("tag metadata service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("tag metadata service response is missing the expected shape")]
    MalformedResponse,
}

/// A source of tag metadata keyed by external book id.
///
/// Ids with no known tags are absent from the returned map, not present with
/// an empty list. Duplicate input ids are permitted.
#[async_trait]
pub trait TagSource: Send + Sync {
    async fn tags_for(
        &self,
        external_ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, MetadataServiceError>;
}

pub struct HardcoverClient {
    client: reqwest::Client,
    url: String,
    bearer_token: String,
}

#[derive(Deserialize)]
struct GraphqlResponse {
    data: Option<QueryData>,
}

#[derive(Deserialize)]
struct QueryData {
    book_mappings: Vec<BookMapping>,
}

#[derive(Deserialize)]
struct BookMapping {
    external_id: String,
    book: MappedBook,
}

#[derive(Deserialize)]
struct MappedBook {
    #[serde(default)]
    taggings: Vec<Tagging>,
}

#[derive(Deserialize)]
struct Tagging {
    tag: TagLabel,
}

#[derive(Deserialize)]
struct TagLabel {
    tag: String,
}

impl HardcoverClient {
    /// Create a new tag metadata client.
    ///
    /// # Arguments
    /// * `url` - Full URL of the GraphQL endpoint
    /// * `bearer_token` - Bearer token sent in the Authorization header
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(url: impl Into<String>, bearer_token: String, timeout_sec: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            bearer_token,
        })
    }
}

fn build_query(external_ids: &[String]) -> String {
    let ids = external_ids
        .iter()
        .map(|id| format!("\"{}\"", id))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"query BookMappingsByExternalIds {{
  book_mappings(
    where: {{platform: {{id: {{_eq: {platform}}}}}, external_id: {{_in: [{ids}]}}}}
  ) {{
    external_id
    book {{
      taggings {{
        tag {{
          tag
        }}
      }}
    }}
  }}
}}"#,
        platform = GOODREADS_PLATFORM_ID,
        ids = ids
    )
}

fn flatten_mappings(data: QueryData) -> HashMap<String, Vec<String>> {
    data.book_mappings
        .into_iter()
        .map(|mapping| {
            let tags = mapping
                .book
                .taggings
                .into_iter()
                .map(|tagging| tagging.tag.tag)
                .collect();
            (mapping.external_id, tags)
        })
        .collect()
}

#[async_trait]
impl TagSource for HardcoverClient {
    async fn tags_for(
        &self,
        external_ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, MetadataServiceError> {
        let body = serde_json::json!({
            "query": build_query(external_ids),
            "variables": {},
        });
        debug!("Resolving tags for {} ids", external_ids.len());

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.bearer_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MetadataServiceError::Status(response.status()));
        }

        let parsed: GraphqlResponse = response.json().await?;
        let data = parsed.data.ok_or(MetadataServiceError::MalformedResponse)?;

        Ok(flatten_mappings(data))
    }
}
