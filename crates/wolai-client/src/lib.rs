//! Wolai open API client library
//!
//! Talks to the Wolai knowledge base over HTTP and turns its block model into
//! text: rich-text parsing, block payload building, token caching, and
//! page-tree navigation (title search, breadcrumbs).

pub mod block;
pub mod client;
pub mod constants;
pub mod content;
pub mod http;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod navigator;
pub mod session;
pub mod transport;

use std::sync::Arc;

pub use block::{
    Block, BlockAlias, BlockPayload, BlockType, Span, build_block, build_code_block, build_page,
    is_divider_alias, resolve_alias,
};
pub use client::{SessionStatus, WolaiClient};
pub use content::parse_content;
pub use http::HttpTransport;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryTransport;
pub use navigator::{SearchHit, breadcrumbs, search_titles};
pub use session::Session;
pub use transport::{ApiError, Credentials, Transport, created_block_id};

/// Build a client for the live API.
///
/// This is the main entry point. Credentials may be blank; that only
/// surfaces as an error on the first authenticated call.
pub fn connect_http(
    api_url: &str,
    credentials: Credentials,
    root_id: Option<String>,
) -> Result<WolaiClient, ApiError> {
    let transport = HttpTransport::new(api_url)?;
    Ok(WolaiClient::new(Arc::new(transport), Session::new(credentials, root_id)))
}
