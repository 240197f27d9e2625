//! Stub upstream services for end-to-end tests.
//!
//! The shelf stub serves canned review-list pages and records which page
//! numbers were requested; the tag stub serves one canned GraphQL response
//! and records the request it saw.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// One book row of a stub shelf page.
#[derive(Clone)]
pub struct StubBook {
    pub id: &'static str,
    pub title: &'static str,
    pub author: &'static str,
    pub pages: &'static str,
    pub rating: &'static str,
    pub ratings: &'static str,
    pub published: &'static str,
    pub times_read: &'static str,
}

impl Default for StubBook {
    fn default() -> Self {
        Self {
            id: "1",
            title: "Some Book",
            author: "Somebody",
            pages: "123 pp",
            rating: "avg 4.00",
            ratings: "1,000",
            published: "date pub Jan 1, 2000",
            times_read: "# times read  1",
        }
    }
}

/// Render a review-list page the way the catalog site does: one table with
/// labeled cells, the book link embedded in the title cell.
pub fn shelf_page_html(books: &[StubBook]) -> String {
    let mut rows = String::new();
    for book in books {
        rows.push_str(&format!(
            r#"
          <tr class="bookalike review">
            <td class="field title">
              <label>title</label>
              <div class="value"><a href="/book/show/{id}.A_Book">{title}</a></div>
            </td>
            <td class="field author">
              <label>author</label>
              <div class="value">{author} *</div>
            </td>
            <td class="field num_pages">
              <label>pages</label>
              <div class="value">{pages}</div>
            </td>
            <td class="field avg_rating">
              <label>rating</label>
              <div class="value">{rating}</div>
            </td>
            <td class="field num_ratings">
              <label>ratings</label>
              <div class="value">{ratings}</div>
            </td>
            <td class="field date_pub">
              <label>pub</label>
              <div class="value">{published}</div>
            </td>
            <td class="field votes">
              <label>votes</label>
              <div class="value">{times_read}</div>
            </td>
          </tr>"#,
            id = book.id,
            title = book.title,
            author = book.author,
            pages = book.pages,
            rating = book.rating,
            ratings = book.ratings,
            published = book.published,
            times_read = book.times_read,
        ));
    }

    format!(
        r#"<html><body>
        <table id="books">
          <tr>
            <th>title</th><th>author</th><th>pages</th><th>rating</th>
            <th>ratings</th><th>pub</th><th>votes</th>
          </tr>{rows}
        </table>
        </body></html>"#,
        rows = rows
    )
}

/// Build a GraphQL tag response for the given (id, tags) pairs.
pub fn tag_mappings(entries: &[(&str, &[&str])]) -> serde_json::Value {
    let mappings: Vec<serde_json::Value> = entries
        .iter()
        .map(|(id, tags)| {
            let taggings: Vec<serde_json::Value> = tags
                .iter()
                .map(|tag| serde_json::json!({"tag": {"tag": tag}}))
                .collect();
            serde_json::json!({
                "external_id": id,
                "book": {"taggings": taggings},
            })
        })
        .collect();

    serde_json::json!({"data": {"book_mappings": mappings}})
}

// ============================================================================
// Shelf stub
// ============================================================================

#[derive(Clone)]
struct StubShelfState {
    pages: Arc<Vec<String>>,
    requested_pages: Arc<Mutex<Vec<u32>>>,
    fail_on_page: Option<u32>,
}

async fn review_list(
    State(state): State<StubShelfState>,
    Path(_user): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    state.requested_pages.lock().unwrap().push(page);

    if state.fail_on_page == Some(page) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match state.pages.get((page - 1) as usize) {
        Some(html) => Html(html.clone()).into_response(),
        None => Html(shelf_page_html(&[])).into_response(),
    }
}

/// Spawn a stub shelf site. Returns its base URL and the shared log of
/// requested page numbers.
pub async fn spawn_stub_shelf(
    pages: Vec<String>,
    fail_on_page: Option<u32>,
) -> (String, Arc<Mutex<Vec<u32>>>) {
    let requested_pages = Arc::new(Mutex::new(Vec::new()));
    let state = StubShelfState {
        pages: Arc::new(pages),
        requested_pages: requested_pages.clone(),
        fail_on_page,
    };

    let app = Router::new()
        .route("/review/list/{user}", get(review_list))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub shelf");
    let addr = listener.local_addr().expect("Failed to get stub address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub shelf failed");
    });

    (format!("http://{}", addr), requested_pages)
}

// ============================================================================
// Tag metadata stub
// ============================================================================

/// What the tag stub saw in the last request it served.
pub struct RecordedTagRequest {
    pub authorization: Option<String>,
    pub query: String,
}

#[derive(Clone)]
struct StubTagsState {
    response: Arc<serde_json::Value>,
    lookups: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<RecordedTagRequest>>>,
}

async fn graphql(
    State(state): State<StubTagsState>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    state.lookups.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().unwrap() = Some(RecordedTagRequest {
        authorization: headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(String::from),
        query: body["query"].as_str().unwrap_or_default().to_string(),
    });

    Json((*state.response).clone())
}

/// Spawn a stub tag metadata service. Returns its GraphQL URL, the lookup
/// counter and the recorded last request.
pub async fn spawn_stub_tags(
    response: serde_json::Value,
) -> (
    String,
    Arc<AtomicUsize>,
    Arc<Mutex<Option<RecordedTagRequest>>>,
) {
    let lookups = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(Mutex::new(None));
    let state = StubTagsState {
        response: Arc::new(response),
        lookups: lookups.clone(),
        last_request: last_request.clone(),
    };

    let app = Router::new()
        .route("/v1/graphql", post(graphql))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub tags");
    let addr = listener.local_addr().expect("Failed to get stub address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub tags failed");
    });

    (
        format!("http://{}/v1/graphql", addr),
        lookups,
        last_request,
    )
}
