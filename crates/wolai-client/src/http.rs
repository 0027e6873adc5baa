//! `reqwest`-backed [`Transport`] for the live Wolai open API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use serde_json::{Value, json};

use crate::block::{Block, BlockPayload};
use crate::constants::{CHILDREN_PAGE_SIZE, MAX_CHILDREN_PAGES, USER_AGENT};
use crate::transport::{ApiError, Credentials, Transport};

/// HTTP transport against the Wolai open API (see [`crate::constants::DEFAULT_API_URL`]).
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: Client,
    api_url: String,
}

impl HttpTransport {
    /// Create a transport for the given base URL (trailing `/` ignored).
    pub fn new(api_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authed(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder
            .header(header::AUTHORIZATION, token)
            .header(header::CONTENT_TYPE, "application/json")
    }

    /// Send a request and return the parsed JSON body, mapping non-2xx to
    /// [`ApiError::Status`].
    async fn send(&self, builder: RequestBuilder) -> Result<Value, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("invalid JSON: {e}")))
    }
}

/// Prefer the API's own `message` field; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl Transport for HttpTransport {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn request_token(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let body = json!({
            "appId": credentials.app_id,
            "appSecret": credentials.app_secret,
        });
        let response = self.send(self.http.post(self.url("/token")).json(&body)).await?;

        response
            .pointer("/data/app_token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Auth(format!("Failed to retrieve token: {response}")))
    }

    async fn get_block(&self, token: &str, block_id: &str) -> Result<Block, ApiError> {
        tracing::debug!(block_id, "GET block");
        let request = self.authed(self.http.get(self.url(&format!("/blocks/{block_id}"))), token);
        let response = self.send(request).await?;

        match response.get("data") {
            Some(data @ Value::Object(_)) => Ok(Block::from_json(data)),
            // Missing data degrades to an empty block rather than failing the call.
            _ => Ok(Block::from_json(&Value::Null)),
        }
    }

    async fn get_children(&self, token: &str, block_id: &str) -> Result<Vec<Block>, ApiError> {
        tracing::debug!(block_id, "GET children");
        let url = self.url(&format!("/blocks/{block_id}/children"));

        collect_pages(block_id, |cursor| {
            let mut request = self
                .authed(self.http.get(&url), token)
                .query(&[("page_size", CHILDREN_PAGE_SIZE.to_string())]);
            if let Some(c) = cursor {
                request = request.query(&[("start_cursor", c)]);
            }
            self.send(request)
        })
        .await
    }

    async fn create_blocks(
        &self,
        token: &str,
        parent_id: &str,
        blocks: &[BlockPayload],
    ) -> Result<Vec<Value>, ApiError> {
        tracing::debug!(parent_id, count = blocks.len(), "POST blocks");
        let body = json!({
            "parent_id": parent_id,
            "blocks": blocks,
        });
        let request = self.authed(self.http.post(self.url("/blocks")), token).json(&body);
        let response = self.send(request).await?;

        Ok(created_entries(&response))
    }
}

/// Decode one page of a children listing into its blocks and the cursor for
/// the next page. The cursor is `None` unless `has_more` is set and a
/// non-empty `next_cursor` came with it.
fn children_page(response: &Value) -> (Vec<Block>, Option<String>) {
    let blocks = match response.get("data") {
        Some(Value::Array(items)) => items.iter().map(Block::from_json).collect(),
        _ => Vec::new(),
    };
    let has_more = response.get("has_more").and_then(Value::as_bool).unwrap_or(false);
    let cursor = response
        .get("next_cursor")
        .and_then(Value::as_str)
        .filter(|c| has_more && !c.is_empty())
        .map(str::to_string);
    (blocks, cursor)
}

/// Follow `next_cursor` across pages, stopping after [`MAX_CHILDREN_PAGES`].
async fn collect_pages<F, Fut>(block_id: &str, mut fetch: F) -> Result<Vec<Block>, ApiError>
where
    F: FnMut(Option<&str>) -> Fut,
    Fut: Future<Output = Result<Value, ApiError>>,
{
    let mut children = Vec::new();
    let mut cursor: Option<String> = None;

    for _ in 0..MAX_CHILDREN_PAGES {
        let response = fetch(cursor.as_deref()).await?;
        let (blocks, next) = children_page(&response);
        children.extend(blocks);
        match next {
            Some(next) => cursor = Some(next),
            None => return Ok(children),
        }
    }

    tracing::warn!(block_id, pages = MAX_CHILDREN_PAGES, "children listing truncated");
    Ok(children)
}

/// Normalize the `data` of a create response to a list of entries.
fn created_entries(response: &Value) -> Vec<Value> {
    match response.get("data") {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::ready;

    fn page(ids: &[&str], has_more: bool, next_cursor: &str) -> Value {
        let data: Vec<Value> = ids.iter().map(|id| json!({"id": id, "type": "text"})).collect();
        json!({"data": data, "has_more": has_more, "next_cursor": next_cursor})
    }

    fn ids(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn test_children_page_cursor() {
        let (blocks, cursor) = children_page(&page(&["a", "b"], true, "c1"));
        assert_eq!(ids(&blocks), ["a", "b"]);
        assert_eq!(cursor.as_deref(), Some("c1"));

        // has_more without a usable cursor ends the listing
        assert_eq!(children_page(&page(&["a"], true, "")).1, None);
        assert_eq!(children_page(&json!({"data": [], "has_more": true})).1, None);

        // a stale cursor on the last page is ignored
        assert_eq!(children_page(&page(&["a"], false, "c9")).1, None);

        let (blocks, cursor) = children_page(&json!({"data": null}));
        assert!(blocks.is_empty());
        assert_eq!(cursor, None);
    }

    #[tokio::test]
    async fn test_collect_pages_follows_cursor() {
        let mut seen = Vec::new();
        let children = collect_pages("p", |cursor| {
            seen.push(cursor.map(str::to_string));
            ready(Ok(match cursor {
                None => page(&["a", "b"], true, "c1"),
                Some("c1") => page(&["c"], true, "c2"),
                _ => page(&["d"], false, ""),
            }))
        })
        .await
        .unwrap();

        assert_eq!(ids(&children), ["a", "b", "c", "d"]);
        assert_eq!(seen, [None, Some("c1".to_string()), Some("c2".to_string())]);
    }

    #[tokio::test]
    async fn test_collect_pages_stops_on_empty_cursor() {
        let mut calls = 0;
        let children = collect_pages("p", |_| {
            calls += 1;
            ready(Ok(page(&["a"], true, "")))
        })
        .await
        .unwrap();

        assert_eq!(ids(&children), ["a"]);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_collect_pages_truncates() {
        let mut calls = 0;
        let children = collect_pages("p", |_| {
            calls += 1;
            ready(Ok(page(&["x"], true, "again")))
        })
        .await
        .unwrap();

        assert_eq!(calls, MAX_CHILDREN_PAGES);
        assert_eq!(children.len(), MAX_CHILDREN_PAGES);
    }

    #[tokio::test]
    async fn test_collect_pages_propagates_errors() {
        let result = collect_pages("p", |cursor| {
            ready(match cursor {
                None => Ok(page(&["a"], true, "c1")),
                Some(_) => Err(ApiError::Status { status: 500, message: "boom".into() }),
            })
        })
        .await;

        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
    }

    #[test]
    fn test_created_entries_normalized() {
        let urls = json!({"data": ["https://www.wolai.com/p#n1", "https://www.wolai.com/p#n2"]});
        assert_eq!(created_entries(&urls).len(), 2);

        assert!(created_entries(&json!({"data": null})).is_empty());
        assert!(created_entries(&json!({})).is_empty());

        let single = json!({"data": "https://www.wolai.com/p#n1"});
        assert_eq!(created_entries(&single), [json!("https://www.wolai.com/p#n1")]);
    }

    #[test]
    fn test_error_message_prefers_api_message() {
        let body = r#"{"message": "block not found", "error_code": 17003}"#;
        assert_eq!(error_message(body), "block not found");
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let transport = HttpTransport::new("https://example.test/v1/").unwrap();
        assert_eq!(transport.api_url(), "https://example.test/v1");
        assert_eq!(transport.url("/token"), "https://example.test/v1/token");
    }
}
