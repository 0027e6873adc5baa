//! Text rendering helpers for tool output.

use wolai_client::constants::CREDENTIALS_URL;
use wolai_client::{Block, BlockType, SessionStatus};

// ============================================================================
// Block Rendering
// ============================================================================

/// Render one child block of a page as a markdown line.
///
/// Returns `None` for blocks with no text (dividers excepted).
pub fn render_block_line(block: &Block) -> Option<String> {
    let text = block.text();
    if text.is_empty() && block.block_type != BlockType::Divider {
        return None;
    }

    let line = match &block.block_type {
        BlockType::Heading(level) => format!("{} {text}", "#".repeat(usize::from(*level))),
        BlockType::Text => text,
        // Untyped blocks read as plain text.
        BlockType::Other(name) if name == "unknown" => text,
        BlockType::BulletedList => format!("- {text}"),
        BlockType::NumberedList => format!("1. {text}"),
        BlockType::TodoList => {
            let mark = if block.checked.unwrap_or(false) { "x" } else { " " };
            format!("- [{mark}] {text}")
        }
        BlockType::ToggleList => format!("▸ {text}"),
        BlockType::Quote => format!("> {text}"),
        BlockType::Callout => format!("> 💡 {text}"),
        BlockType::Code => {
            let language = block.language.as_deref().unwrap_or("");
            format!("```{language}\n{text}\n```")
        }
        BlockType::Page => format!("📄 [Child Page]: {text} (ID: {})", block.id),
        BlockType::Divider => "---".to_string(),
        BlockType::Equation => format!("$${text}$$"),
        BlockType::Image | BlockType::Video | BlockType::Bookmark | BlockType::Other(_) => {
            format!("[{}]: {text}", block.raw_type)
        }
    };
    Some(line)
}

/// Render a page title plus its children, separated by blank lines.
pub fn render_page(page: &Block, block_id: &str, children: &[Block]) -> String {
    let mut lines = vec![format!("# Page: {} (ID: {block_id})", page.text())];
    lines.extend(children.iter().filter_map(render_block_line));
    lines.join("\n\n")
}

/// One line of a child listing: `- [type] text (ID: id)`.
pub fn render_child_entry(block: &Block) -> String {
    let mut text = block.text();
    if text.is_empty() {
        let placeholder = if block.block_type == BlockType::Divider { "---" } else { "(Empty)" };
        text = placeholder.to_string();
    }
    format!("- [{}] {text} (ID: {})", block.raw_type, block.id)
}

// ============================================================================
// Input Helpers
// ============================================================================

/// Non-blank lines of multi-line tool input.
pub fn content_lines(content: &str) -> Vec<&str> {
    content.split('\n').filter(|line| !line.trim().is_empty()).collect()
}

// ============================================================================
// Config Rendering
// ============================================================================

/// First `n` characters followed by `...`.
fn mask_head(value: &str, n: usize) -> String {
    format!("{}...", value.chars().take(n).collect::<String>())
}

/// `...` followed by the last `n` characters.
fn mask_tail(value: &str, n: usize) -> String {
    let skip = value.chars().count().saturating_sub(n);
    format!("...{}", value.chars().skip(skip).collect::<String>())
}

/// Human-readable configuration summary with secrets masked.
pub fn render_config(status: &SessionStatus) -> String {
    let id_status = if status.app_id.is_empty() {
        "❌ Not set".to_string()
    } else {
        format!("✅ {}", mask_head(&status.app_id, 8))
    };
    let secret_status = if status.app_secret.is_empty() {
        "❌ Not set".to_string()
    } else {
        format!("✅ {}", mask_tail(&status.app_secret, 8))
    };
    let root_status = match status.root_id {
        Some(ref root) => format!("✅ {root}"),
        None => "❌ Not set".to_string(),
    };
    let auth_status = if status.authenticated {
        "✅ Authenticated"
    } else {
        "⏳ Not yet authenticated"
    };

    format!(
        "🔧 Wolai MCP Configuration\n\
         ━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n  \
         App ID:      {id_status}\n  \
         App Secret:  {secret_status}\n  \
         Root Page:   {root_status}\n  \
         Auth Token:  {auth_status}\n  \
         API URL:     {}\n  \
         Get credentials: {CREDENTIALS_URL}",
        status.api_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block(value: serde_json::Value) -> Block {
        Block::from_json(&value)
    }

    #[test]
    fn test_render_headings_and_lists() {
        let h = block(json!({"type": "heading", "level": 3, "content": [{"title": "Deep"}]}));
        assert_eq!(render_block_line(&h).unwrap(), "### Deep");

        let h2 = block(json!({"type": "heading_2", "content": [{"title": "Mid"}]}));
        assert_eq!(render_block_line(&h2).unwrap(), "## Mid");

        let bullet = block(json!({"type": "bull_list", "content": [{"title": "a"}]}));
        assert_eq!(render_block_line(&bullet).unwrap(), "- a");

        let num = block(json!({"type": "enum_list", "content": [{"title": "b"}]}));
        assert_eq!(render_block_line(&num).unwrap(), "1. b");

        let todo = block(json!({"type": "todo_list", "checked": true, "content": [{"title": "done"}]}));
        assert_eq!(render_block_line(&todo).unwrap(), "- [x] done");
    }

    #[test]
    fn test_render_special_blocks() {
        let code = block(json!({"type": "code", "language": "rust", "content": [{"title": "let x = 1;"}]}));
        assert_eq!(render_block_line(&code).unwrap(), "```rust\nlet x = 1;\n```");

        let page = block(json!({"id": "p9", "type": "page", "content": [{"title": "Sub"}]}));
        assert_eq!(render_block_line(&page).unwrap(), "📄 [Child Page]: Sub (ID: p9)");

        let divider = block(json!({"type": "divider"}));
        assert_eq!(render_block_line(&divider).unwrap(), "---");

        let callout = block(json!({"type": "callout", "content": [{"title": "Tip"}]}));
        assert_eq!(render_block_line(&callout).unwrap(), "> 💡 Tip");

        let odd = block(json!({"type": "mystery", "content": [{"title": "?"}]}));
        assert_eq!(render_block_line(&odd).unwrap(), "[mystery]: ?");

        let untyped = block(json!({"id": "u", "content": [{"title": "loose note"}]}));
        assert_eq!(render_block_line(&untyped).unwrap(), "loose note");
        assert_eq!(render_child_entry(&untyped), "- [unknown] loose note (ID: u)");
    }

    #[test]
    fn test_empty_blocks_skipped() {
        let empty = block(json!({"type": "text", "content": []}));
        assert_eq!(render_block_line(&empty), None);
    }

    #[test]
    fn test_render_page_layout() {
        let page = block(json!({"id": "p", "type": "page", "content": [{"title": "Home"}]}));
        let children = vec![
            block(json!({"type": "text", "content": [{"title": "hello"}]})),
            block(json!({"type": "text", "content": []})),
            block(json!({"type": "quote", "content": [{"title": "wise"}]})),
        ];
        assert_eq!(render_page(&page, "p", &children), "# Page: Home (ID: p)\n\nhello\n\n> wise");
    }

    #[test]
    fn test_child_entries() {
        let divider = block(json!({"id": "d", "type": "divider"}));
        assert_eq!(render_child_entry(&divider), "- [divider] --- (ID: d)");

        let blank = block(json!({"id": "t"}));
        assert_eq!(render_child_entry(&blank), "- [unknown] (Empty) (ID: t)");
    }

    #[test]
    fn test_content_lines_drop_blanks() {
        assert_eq!(content_lines("one\n\n  \ntwo\n"), ["one", "two"]);
        assert!(content_lines(" \n\t").is_empty());
    }

    #[test]
    fn test_config_masks_secrets() {
        let status = SessionStatus {
            app_id: "abcdefghijkl".into(),
            app_secret: "s3cr3t-0123456789".into(),
            root_id: None,
            authenticated: false,
            api_url: "https://openapi.wolai.com/v1".into(),
        };
        let text = render_config(&status);
        assert!(text.contains("App ID:      ✅ abcdefgh..."));
        assert!(text.contains("App Secret:  ✅ ...23456789"));
        assert!(text.contains("Root Page:   ❌ Not set"));
        assert!(text.contains("⏳ Not yet authenticated"));
        assert!(!text.contains("s3cr3t"));
    }

    #[test]
    fn test_config_unset_credentials() {
        let status = SessionStatus {
            app_id: String::new(),
            app_secret: String::new(),
            root_id: Some("root1".into()),
            authenticated: true,
            api_url: "u".into(),
        };
        let text = render_config(&status);
        assert!(text.contains("App ID:      ❌ Not set"));
        assert!(text.contains("Root Page:   ✅ root1"));
        assert!(text.contains("✅ Authenticated"));
    }
}
