//! RMV HAFAS HTTP client.
//!
//! Sends station board requests and decodes the JSON responses. The client
//! is blocking; the board pipeline runs on a blocking thread.

use std::time::Duration;

use tracing::debug;

use super::error::RmvError;
use super::request::StationBoardRequest;
use super::types::BoardResponse;

/// Default base URL for the RMV HAFAS API.
pub const DEFAULT_BASE_URL: &str = "https://www.rmv.de/hapi";

/// Configuration for the RMV client.
#[derive(Debug, Clone)]
pub struct RmvConfig {
    /// Access token sent with every request
    pub api_token: String,
    /// Base URL for the API (defaults to production RMV)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RmvConfig {
    /// Create a new config with the given API token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// RMV HAFAS API client.
#[derive(Debug, Clone)]
pub struct RmvClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_token: String,
}

impl RmvClient {
    /// Create a new RMV client with the given configuration.
    pub fn new(config: RmvConfig) -> Result<Self, RmvError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token,
        })
    }

    /// Fetch the board described by `request`.
    pub fn board(&self, request: &StationBoardRequest) -> Result<BoardResponse, RmvError> {
        request.validate()?;

        let url = format!("{}/{}", self.base_url, request.kind().api_path());
        let mut query = request.parameters();
        query.push(("accessId", self.api_token.clone()));
        query.push(("format", "json".to_string()));

        debug!(%url, params = ?request.parameters(), "Requesting station board");

        let response = self.http.get(&url).query(&query).send()?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RmvError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RmvError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text()?;

        serde_json::from_str(&body).map_err(|e| RmvError::Json {
            message: e.to_string(),
        })
    }
}
