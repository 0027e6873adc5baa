//! MCP server exposing a Wolai knowledge base.
//!
//! Provides tools for reading, searching, and appending to Wolai pages via
//! Model Context Protocol, so agents like Claude Code, Gemini CLI, and
//! opencode can use a Wolai workspace as their notebook.
//!
//! Every tool returns plain text. Failures are rendered into the reply
//! (`Error ...`, `❌ ...`) instead of surfacing as protocol errors, since the
//! host expects one text answer per call.
//!
//! ## Module Structure
//!
//! - `models`: Request types for MCP tools
//! - `helpers`: Markdown rendering and config formatting

mod helpers;
mod models;

use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use wolai_client::constants::BREADCRUMB_SEPARATOR;
use wolai_client::{
    ApiError, Credentials, WolaiClient, breadcrumbs, build_block, build_code_block, build_page,
    created_block_id, is_divider_alias, search_titles,
};

pub use models::*;
use helpers::*;

// ============================================================================
// WolaiMcp Server
// ============================================================================

/// MCP server exposing a Wolai knowledge base.
#[derive(Clone)]
pub struct WolaiMcp {
    client: WolaiClient,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for WolaiMcp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WolaiMcp")
            .field("client", &self.client)
            .field("tool_router", &self.tool_router)
            .finish()
    }
}

impl WolaiMcp {
    /// Create a new MCP server around an authenticated client.
    pub fn new(client: WolaiClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// The underlying client (shared session).
    pub fn client(&self) -> &WolaiClient {
        &self.client
    }
}

#[tool_router]
impl WolaiMcp {
    // ========================================================================
    // Configuration Tools
    // ========================================================================

    #[tool(description = "Set or update the Wolai API credentials at runtime. Allows switching accounts without restarting the server. Credentials last for the current session only and are verified immediately.")]
    async fn set_wolai_credentials(&self, Parameters(req): Parameters<SetCredentialsRequest>) -> String {
        if req.app_id.is_empty() || req.app_secret.is_empty() {
            return "❌ Both app_id and app_secret are required.".to_string();
        }

        match self.client.set_credentials(Credentials::new(req.app_id, req.app_secret)).await {
            Ok(()) => "✅ Wolai credentials set and verified! Authentication successful.".to_string(),
            Err(e) => format!("❌ Credential verification failed: {e}. Credentials were not saved."),
        }
    }

    #[tool(description = "Change the root page ID used as the starting point for searches, page creation, and navigation.")]
    async fn set_root_page(&self, Parameters(req): Parameters<SetRootPageRequest>) -> String {
        let root_id = req.root_id;
        if root_id.is_empty() {
            return "❌ root_id is required.".to_string();
        }
        self.client.set_root_id(&root_id).await;

        match self.client.get_block(&root_id).await {
            Ok(block) => format!("✅ Root page set to: '{}' (ID: {root_id})", block.text()),
            Err(ApiError::Status { status, .. }) => {
                format!("⚠️ Root page set to {root_id}, but could not verify (status {status})")
            }
            Err(e) => format!("⚠️ Root page set to {root_id}, but verification failed: {e}"),
        }
    }

    #[tool(description = "Show the current Wolai MCP configuration status (credentials masked).")]
    async fn get_wolai_config(&self) -> String {
        render_config(&self.client.status().await)
    }

    // ========================================================================
    // Read Tools
    // ========================================================================

    #[tool(description = "Returns the current root page ID and its title.")]
    async fn get_root_info(&self) -> String {
        let Some(root_id) = self.client.root_id().await else {
            return "❌ WOLAI_ROOT_ID is not set. Use set_root_page or set it in your MCP config env."
                .to_string();
        };

        match self.client.get_block(&root_id).await {
            Ok(block) => format!("Current Root Directory: '{}' (ID: {root_id})", block.text()),
            Err(e) => {
                tracing::debug!(root_id = %root_id, "root lookup failed: {e}");
                format!("Default Root ID: {root_id}")
            }
        }
    }

    #[tool(description = "Retrieves the content of a Wolai page or block by ID, rendered as markdown (title plus one line per child block).")]
    async fn get_page_content(&self, Parameters(req): Parameters<BlockIdRequest>) -> String {
        let block_id = req.block_id;
        let result = async {
            let page = self.client.get_block(&block_id).await?;
            let children = self.client.get_children(&block_id).await?;
            Ok::<_, ApiError>(render_page(&page, &block_id, &children))
        }
        .await;

        result.unwrap_or_else(|e| format!("Error reading page {block_id}: {e}"))
    }

    #[tool(description = "Lists the immediate child blocks/pages of a block, with their types and IDs.")]
    async fn list_child_blocks(&self, Parameters(req): Parameters<BlockIdRequest>) -> String {
        match self.client.get_children(&req.block_id).await {
            Ok(children) if children.is_empty() => "No children found.".to_string(),
            Ok(children) => children
                .iter()
                .map(render_child_entry)
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => format!("Error listing children for {}: {e}", req.block_id),
        }
    }

    #[tool(description = "Finds pages whose titles contain the query, exploring the page tree breadth-first from a start page (Wolai has no global search API). Only page, heading_1 and heading_2 blocks are descended into.")]
    async fn search_pages_by_title(&self, Parameters(req): Parameters<SearchRequest>) -> String {
        let start_id = match req.start_id.filter(|s| !s.is_empty()) {
            Some(id) => id,
            None => match self.client.root_id().await {
                Some(root) => root,
                None => return "❌ No root page set. Use set_root_page or provide start_id.".to_string(),
            },
        };

        match search_titles(&self.client, &req.query, &start_id, req.max_depth).await {
            Ok(hits) if hits.is_empty() => format!(
                "No pages matching '{}' found within depth {} of {start_id}.",
                req.query, req.max_depth
            ),
            Ok(hits) => hits
                .iter()
                .map(|hit| format!("- FOUND: {} (ID: {}) at depth {}", hit.title, hit.id, hit.depth))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => format!("Search error: {e}"),
        }
    }

    #[tool(description = "Returns the full path from the root to a block, e.g. \"Root > Projects > My Project > Today's Note\".")]
    async fn get_breadcrumbs(&self, Parameters(req): Parameters<BlockIdRequest>) -> String {
        match breadcrumbs(&self.client, &req.block_id).await {
            Ok(crumbs) if crumbs.is_empty() => format!("Could not resolve path for {}", req.block_id),
            Ok(crumbs) => crumbs.join(BREADCRUMB_SEPARATOR),
            Err(e) => format!("Error getting breadcrumbs: {e}"),
        }
    }

    // ========================================================================
    // Write Tools
    // ========================================================================

    #[tool(description = "Creates a new empty sub-page under a parent page (default: the root page).")]
    async fn create_page(&self, Parameters(req): Parameters<CreatePageRequest>) -> String {
        let parent_id = match req.parent_id.filter(|p| !p.is_empty()) {
            Some(id) => id,
            None => match self.client.root_id().await {
                Some(root) => root,
                None => return "❌ No parent_id provided and WOLAI_ROOT_ID is not set.".to_string(),
            },
        };

        match self.client.create_blocks(&parent_id, &[build_page(&req.title)]).await {
            Ok(data) => {
                let new_id = created_block_id(&data);
                tracing::info!(new_id = %new_id, parent_id = %parent_id, "page created");
                format!(
                    "✅ Page '{}' created successfully (ID: {new_id}, parent: {parent_id})",
                    req.title
                )
            }
            Err(e) => format!("❌ Failed to create page: {e}"),
        }
    }

    #[tool(description = "Appends content blocks to a page. Each non-blank line becomes its own block of the given type. Divider (divider/hr) always adds a single block.")]
    async fn add_block(&self, Parameters(req): Parameters<AddBlockRequest>) -> String {
        let blocks = if is_divider_alias(&req.block_type) {
            vec![build_block("", &req.block_type)]
        } else {
            let lines = content_lines(&req.content);
            if lines.is_empty() {
                return "⚠️ No content provided.".to_string();
            }
            lines.iter().map(|line| build_block(line, &req.block_type)).collect()
        };

        match self.client.create_blocks(&req.parent_id, &blocks).await {
            Ok(data) => format!(
                "✅ Added {} block(s) of type '{}' to {}",
                data.len(),
                req.block_type,
                req.parent_id
            ),
            Err(e) => format!("❌ Failed to add block: {e}"),
        }
    }

    #[tool(description = "Appends a code block with syntax highlighting to a page.")]
    async fn add_code_block(&self, Parameters(req): Parameters<AddCodeBlockRequest>) -> String {
        let block = build_code_block(&req.code, &req.language);
        match self.client.create_blocks(&req.parent_id, &[block]).await {
            Ok(_) => format!("✅ Added code block ({}) to {}", req.language, req.parent_id),
            Err(e) => format!("❌ Failed to add code block: {e}"),
        }
    }
}

#[tool_handler]
impl ServerHandler for WolaiMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_instructions(
                "Wolai knowledge base MCP server. Read pages, list children, search titles, resolve breadcrumbs, and append pages or blocks. Configure with set_wolai_credentials / set_root_page or WOLAI_* env vars.",
            )
    }
}
