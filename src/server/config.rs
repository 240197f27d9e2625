use super::RequestsLoggingLevel;

/// Settings the HTTP layer needs at request time.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub requests_logging_level: RequestsLoggingLevel,
    /// Pre-shared key expected in the `X-API-Key` header.
    pub api_key: String,
}
