//! Block model: decoding API responses and building creation payloads.
//!
//! ## Reading
//!
//! [`Block::from_json`] is the one place raw API JSON becomes a typed value.
//! Missing or wrong-typed fields turn into defaults here so nothing
//! downstream has to poke at `serde_json::Value` again (except `content`,
//! which is kept raw for [`parse_content`]).
//!
//! ## Writing
//!
//! [`build_block`] maps a user-facing alias (`h2`, `todo`, `hr`, ...) to the
//! API's block type and produces a [`BlockPayload`] for `POST /blocks`.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use strum::EnumString;

use crate::content::parse_content;

// ============================================================================
// Read side
// ============================================================================

/// Decoded block type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockType {
    Text,
    /// Heading with level 1..=3.
    Heading(u8),
    BulletedList,
    NumberedList,
    TodoList,
    ToggleList,
    Quote,
    Callout,
    Divider,
    Page,
    Code,
    Image,
    Video,
    Bookmark,
    Equation,
    /// Anything this client doesn't know about, kept verbatim.
    Other(String),
}

impl BlockType {
    /// Decode an API type name. `level` is only consulted for the bare
    /// `heading` type, which carries its level in a separate field.
    pub fn from_api(name: &str, level: Option<u8>) -> Self {
        match name {
            "text" => BlockType::Text,
            "heading" => BlockType::Heading(level.unwrap_or(1).clamp(1, 3)),
            "heading_1" => BlockType::Heading(1),
            "heading_2" => BlockType::Heading(2),
            "heading_3" => BlockType::Heading(3),
            "bulleted_list" | "bull_list" => BlockType::BulletedList,
            "numbered_list" | "enum_list" => BlockType::NumberedList,
            "todo_list" => BlockType::TodoList,
            "toggle_list" => BlockType::ToggleList,
            "quote" => BlockType::Quote,
            "callout" => BlockType::Callout,
            "divider" => BlockType::Divider,
            "page" => BlockType::Page,
            // Older pages report code blocks under their language name.
            "code" | "python" | "javascript" | "java" => BlockType::Code,
            "image" => BlockType::Image,
            "video" => BlockType::Video,
            "bookmark" => BlockType::Bookmark,
            "block_equation" | "equation" => BlockType::Equation,
            other => BlockType::Other(other.to_string()),
        }
    }
}

/// A block as returned by `GET /blocks/{id}` or the children endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub id: String,
    /// Type name exactly as the API sent it (`"unknown"` when absent).
    pub raw_type: String,
    pub block_type: BlockType,
    /// Raw rich-text spans; see [`Block::text`].
    pub content: Value,
    pub parent_id: Option<String>,
    pub level: Option<u8>,
    pub checked: Option<bool>,
    pub language: Option<String>,
}

impl Block {
    /// Whether the title search descends into this block.
    ///
    /// Matches on the API type name: a bare `heading` is not followed even
    /// when its level is 1 or 2.
    pub fn is_navigable(&self) -> bool {
        matches!(self.raw_type.as_str(), "page" | "heading_1" | "heading_2")
    }

    /// Decode a block object, defaulting anything absent or malformed.
    pub fn from_json(value: &Value) -> Self {
        let str_field = |key: &str| -> Option<String> {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let level = value
            .get("level")
            .and_then(Value::as_u64)
            .and_then(|l| u8::try_from(l).ok());
        let raw_type = str_field("type").unwrap_or_else(|| "unknown".to_string());
        let block_type = BlockType::from_api(&raw_type, level);

        Self {
            id: str_field("id").unwrap_or_default(),
            raw_type,
            block_type,
            content: value.get("content").cloned().unwrap_or(Value::Null),
            parent_id: str_field("parent_id"),
            level,
            checked: value.get("checked").and_then(Value::as_bool),
            language: str_field("language"),
        }
    }

    /// Flattened display text of the block's content.
    pub fn text(&self) -> String {
        parse_content(&self.content)
    }
}

// ============================================================================
// Write side
// ============================================================================

/// One rich-text span in a creation payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Span {
    pub title: String,
}

/// Body of a single block in `POST /blocks`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BlockPayload {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Span>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl BlockPayload {
    fn with_text(block_type: &str, text: &str) -> Self {
        Self {
            block_type: block_type.to_string(),
            content: Some(vec![Span { title: text.to_string() }]),
            level: None,
            checked: None,
            language: None,
        }
    }
}

/// User-facing block type aliases accepted by the write tools.
///
/// NOTE: `bullet`/`ul` resolve to `enum_list` and `ol` to `bull_list`. That
/// pairing looks inverted but is what the API accepted when last checked
/// against the live service; confirm before flipping it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
pub enum BlockAlias {
    #[strum(serialize = "heading", serialize = "heading_1", serialize = "h1")]
    Heading1,
    #[strum(serialize = "heading_2", serialize = "h2")]
    Heading2,
    #[strum(serialize = "heading_3", serialize = "h3")]
    Heading3,
    #[strum(serialize = "bullet", serialize = "bulleted_list", serialize = "ul")]
    Bulleted,
    #[strum(serialize = "numbered_list", serialize = "ol")]
    Numbered,
    #[strum(serialize = "todo", serialize = "checkbox")]
    Todo,
    #[strum(serialize = "toggle", serialize = "toggle_list")]
    Toggle,
    #[strum(serialize = "math", serialize = "equation", serialize = "block_equation")]
    Equation,
    #[strum(serialize = "hr")]
    Rule,
}

impl BlockAlias {
    /// Parse an alias; `None` for names that pass through unchanged.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// API type name and heading level this alias stands for.
    pub fn resolve(self) -> (&'static str, Option<u8>) {
        match self {
            BlockAlias::Heading1 => ("heading", Some(1)),
            BlockAlias::Heading2 => ("heading", Some(2)),
            BlockAlias::Heading3 => ("heading", Some(3)),
            BlockAlias::Bulleted => ("enum_list", None),
            BlockAlias::Numbered => ("bull_list", None),
            BlockAlias::Todo => ("todo_list", None),
            BlockAlias::Toggle => ("toggle_list", None),
            BlockAlias::Equation => ("block_equation", None),
            BlockAlias::Rule => ("divider", None),
        }
    }
}

/// Resolve an alias to `(api_type, level)`; unknown names pass through.
pub fn resolve_alias(alias: &str) -> (String, Option<u8>) {
    match BlockAlias::from_str(alias) {
        Some(known) => {
            let (name, level) = known.resolve();
            (name.to_string(), level)
        }
        None => (alias.to_string(), None),
    }
}

/// Whether an alias produces a divider (which never splits per line).
pub fn is_divider_alias(alias: &str) -> bool {
    resolve_alias(alias).0 == "divider"
}

/// Build a creation payload from one line of text and a type alias.
pub fn build_block(text: &str, alias: &str) -> BlockPayload {
    let (block_type, level) = resolve_alias(alias);
    let mut block = BlockPayload::with_text(&block_type, text);

    match block_type.as_str() {
        "heading" => block.level = Some(level.unwrap_or(1)),
        "todo_list" => block.checked = Some(false),
        "divider" => block.content = None,
        _ => {}
    }
    block
}

/// Build a code block payload; the language is lowercased.
pub fn build_code_block(code: &str, language: &str) -> BlockPayload {
    let mut block = BlockPayload::with_text("code", code);
    block.language = Some(language.to_lowercase());
    block
}

/// Build an empty sub-page payload.
pub fn build_page(title: &str) -> BlockPayload {
    BlockPayload::with_text("page", title)
}
