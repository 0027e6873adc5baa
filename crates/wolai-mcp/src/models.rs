//! MCP request types.
//!
//! These types define the API for the Wolai MCP server tools.

use rmcp::schemars;
use serde::Deserialize;

use wolai_client::constants::DEFAULT_SEARCH_DEPTH;

// ============================================================================
// Configuration Requests
// ============================================================================

/// Replace the Wolai app credentials for this session.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetCredentialsRequest {
    /// Wolai App ID
    #[schemars(description = "Your Wolai App ID (get from https://www.wolai.com/dev)")]
    pub app_id: String,
    /// Wolai App Secret
    #[schemars(description = "Your Wolai App Secret")]
    pub app_secret: String,
}

/// Change the default root page.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetRootPageRequest {
    #[schemars(description = "The Wolai page ID to use as the new root")]
    pub root_id: String,
}

// ============================================================================
// Read Requests
// ============================================================================

/// Any tool that targets a single block.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BlockIdRequest {
    #[schemars(description = "The ID of the block/page")]
    pub block_id: String,
}

/// Title search over the page tree.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Keyword to look for in titles
    #[schemars(description = "The keyword to search for in page titles (case-insensitive)")]
    pub query: String,
    /// Start page (defaults to the root)
    #[schemars(description = "The ID to start searching from (default: the configured root page)")]
    #[serde(default)]
    pub start_id: Option<String>,
    /// Levels to descend
    #[schemars(description = "How many levels deep to search (default 2; each level costs requests)")]
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_max_depth() -> u32 {
    DEFAULT_SEARCH_DEPTH
}

// ============================================================================
// Write Requests
// ============================================================================

/// Create an empty sub-page.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreatePageRequest {
    #[schemars(description = "The title of the new page")]
    pub title: String,
    #[schemars(description = "ID of the parent page (default: the configured root page)")]
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Append text blocks to a page.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddBlockRequest {
    #[schemars(description = "The page or block ID to append content to")]
    pub parent_id: String,
    #[schemars(description = "The text content. Each non-blank line becomes its own block")]
    pub content: String,
    #[schemars(
        description = "Block type: text (default); heading/h1/heading_1, h2/heading_2, h3/heading_3; bullet/bulleted_list/ul; ol/numbered_list; todo/checkbox; toggle/toggle_list; quote; callout; divider/hr; math/equation/block_equation; image, video, bookmark (content = URL)"
    )]
    #[serde(default = "default_block_type")]
    pub block_type: String,
}

fn default_block_type() -> String {
    "text".to_string()
}

/// Append a code block.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddCodeBlockRequest {
    #[schemars(description = "The page or block ID to append the code to")]
    pub parent_id: String,
    #[schemars(description = "The source code content")]
    pub code: String,
    #[schemars(
        description = "Programming language for syntax highlighting (e.g. python, javascript, rust, sql, bash, json). Default: python"
    )]
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "python".to_string()
}
