//! Transport seam between the client and the Wolai open API.
//!
//! [`Transport`] covers the four endpoints this crate uses. Implementations
//! decode responses into [`Block`]s before returning, so callers never see
//! the JSON envelope. `HttpTransport` is the real thing; `MemoryTransport`
//! (tests only) keeps a fake knowledge base in memory.

use async_trait::async_trait;
use serde_json::Value;

use crate::block::{Block, BlockPayload};

// ============================================================================
// Error Type
// ============================================================================

/// Errors from talking to the Wolai API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} is not set. Set it in your MCP config env or via set_wolai_credentials tool.")]
    MissingConfig(&'static str),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for a well-formed non-success HTTP response, as opposed to a
    /// transport, decode, or configuration failure.
    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }

    /// HTTP status code, if this is a status error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ============================================================================
// Transport
// ============================================================================

/// App credentials exchanged for an app token.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub app_id: String,
    pub app_secret: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        }
    }
}

/// Raw access to the Wolai endpoints used by this crate.
///
/// Every method except [`Transport::request_token`] takes the app token;
/// caching it is the session's job, not the transport's.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Base URL, for display.
    fn api_url(&self) -> &str;

    /// `POST /token`: exchange credentials for an app token.
    async fn request_token(&self, credentials: &Credentials) -> Result<String, ApiError>;

    /// `GET /blocks/{id}`.
    async fn get_block(&self, token: &str, block_id: &str) -> Result<Block, ApiError>;

    /// `GET /blocks/{id}/children`, all pages.
    async fn get_children(&self, token: &str, block_id: &str) -> Result<Vec<Block>, ApiError>;

    /// `POST /blocks`: append `blocks` under `parent_id`.
    ///
    /// Returns the response's `data` entries (one per created block, usually
    /// a URL whose fragment is the new ID).
    async fn create_blocks(
        &self,
        token: &str,
        parent_id: &str,
        blocks: &[BlockPayload],
    ) -> Result<Vec<Value>, ApiError>;
}

/// Pull the new block ID out of a `POST /blocks` response.
///
/// Entries are URLs like `https://www.wolai.com/<page>#<block>`: the fragment
/// wins, else the last path segment. Object entries use their `id`.
pub fn created_block_id(data: &[Value]) -> String {
    match data.first() {
        Some(Value::String(url)) => match url.rsplit_once('#') {
            Some((_, fragment)) => fragment.to_string(),
            None => url.rsplit('/').next().unwrap_or(url).to_string(),
        },
        Some(Value::Object(fields)) => fields
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        _ => "unknown".to_string(),
    }
}
