use super::state::ServerState;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::IntoResponse,
};
use tracing::debug;

pub const HEADER_API_KEY: &str = "X-API-Key";

/// Body returned on every rejected request, matching what API consumers were
/// built against.
const INVALID_KEY_BODY: &str = "401: Invalid API Key";

/// Extractor proving the request carried the pre-shared API key.
///
/// Handlers that take an `ApiKey` argument never run for unauthenticated
/// requests, so no upstream call can happen before the key check.
#[derive(Debug)]
pub struct ApiKey;

pub enum ApiKeyRejection {
    Invalid,
}

impl IntoResponse for ApiKeyRejection {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiKeyRejection::Invalid => {
                (StatusCode::UNAUTHORIZED, INVALID_KEY_BODY).into_response()
            }
        }
    }
}

impl FromRequestParts<ServerState> for ApiKey {
    type Rejection = ApiKeyRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(HEADER_API_KEY)
            .and_then(|value| value.to_str().ok());

        match presented {
            Some(key) if key == ctx.config.api_key => Ok(ApiKey),
            Some(_) => {
                debug!("Rejecting request with a wrong API key");
                Err(ApiKeyRejection::Invalid)
            }
            None => {
                debug!("Rejecting request without an API key");
                Err(ApiKeyRejection::Invalid)
            }
        }
    }
}
