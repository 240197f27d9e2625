use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::error;

use crate::catalog::CatalogService;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::api_key::ApiKey;
use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(stats)
}

async fn get_user_books(
    _key: ApiKey,
    State(catalog): State<GuardedCatalogService>,
    Path(user): Path<String>,
) -> Response {
    match catalog.enriched_shelf(&user).await {
        Ok(books) => Json(books).into_response(),
        Err(err) => {
            error!("Failed to assemble {}'s catalog: {}", user, err);
            (StatusCode::BAD_GATEWAY, format!("{}", err)).into_response()
        }
    }
}

impl ServerState {
    fn new(config: ServerConfig, catalog: Arc<CatalogService>) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog,
        }
    }
}

pub fn make_app(config: ServerConfig, catalog: Arc<CatalogService>) -> Router {
    let state = ServerState::new(config, catalog);

    let app: Router = Router::new()
        .route("/", get(home))
        .route("/books/{user}", get(get_user_books))
        .with_state(state.clone());

    app.layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(config: ServerConfig, catalog: Arc<CatalogService>) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
