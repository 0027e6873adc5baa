//! In-memory [`Transport`] for tests.
//!
//! Holds a fake knowledge base (blocks plus ordered child lists), counts
//! every call, and can be told to fail specific IDs. Child lists are
//! independent of `parent_id`, so fixtures can build diamonds and cycles that
//! a well-behaved server would never return.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::block::{Block, BlockPayload};
use crate::transport::{ApiError, Credentials, Transport};

#[derive(Default)]
struct State {
    blocks: HashMap<String, Value>,
    children: HashMap<String, Vec<String>>,
    status_failures: HashMap<String, u16>,
    hard_failures: HashSet<String>,
    created: Vec<(String, BlockPayload)>,
    next_id: usize,
}

/// Fake Wolai API backed by a `HashMap`.
pub struct MemoryTransport {
    credentials: Mutex<Credentials>,
    state: Mutex<State>,
    token_requests: AtomicUsize,
    block_fetches: AtomicUsize,
    children_fetches: AtomicUsize,
}

impl MemoryTransport {
    /// Accepts credentials `("test-app", "test-secret")`.
    pub fn new() -> Self {
        Self {
            credentials: Mutex::new(Credentials::new("test-app", "test-secret")),
            state: Mutex::new(State::default()),
            token_requests: AtomicUsize::new(0),
            block_fetches: AtomicUsize::new(0),
            children_fetches: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("memory transport mutex poisoned")
    }

    /// Change which credentials the fake token endpoint accepts.
    pub fn accept_credentials(&self, credentials: Credentials) {
        *self.credentials.lock().expect("credentials mutex poisoned") = credentials;
    }

    /// Insert a page titled `title`, listed under `parent` when given.
    pub fn add_page(&self, id: &str, title: &str, parent: Option<&str>) {
        self.add_block(id, "page", title, parent);
    }

    /// Insert a block with plain-text content, listed under `parent` when given.
    pub fn add_block(&self, id: &str, block_type: &str, title: &str, parent: Option<&str>) {
        let mut value = json!({
            "id": id,
            "type": block_type,
            "content": [{"title": title}],
        });
        if let Some(parent) = parent {
            value["parent_id"] = json!(parent);
        }
        self.insert_json(value, parent);
    }

    /// Insert an arbitrary block object (must carry a string `id`).
    pub fn insert_json(&self, value: Value, parent: Option<&str>) {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .expect("fixture block needs an id")
            .to_string();
        let mut state = self.state();
        if let Some(parent) = parent {
            state.children.entry(parent.to_string()).or_default().push(id.clone());
        }
        state.blocks.insert(id, value);
    }

    /// List `child` under `parent` without touching the child's `parent_id`.
    pub fn link_child(&self, parent: &str, child: &str) {
        self.state()
            .children
            .entry(parent.to_string())
            .or_default()
            .push(child.to_string());
    }

    /// Overwrite a block's `parent_id` (for cyclic parent chains).
    pub fn set_parent(&self, id: &str, parent: &str) {
        if let Some(block) = self.state().blocks.get_mut(id) {
            block["parent_id"] = json!(parent);
        }
    }

    /// Make every request for `id` answer with HTTP `status`.
    pub fn fail_with_status(&self, id: &str, status: u16) {
        self.state().status_failures.insert(id.to_string(), status);
    }

    /// Make every request for `id` fail below the HTTP layer.
    pub fn fail_hard(&self, id: &str) {
        self.state().hard_failures.insert(id.to_string());
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests.load(Ordering::SeqCst)
    }

    pub fn block_fetches(&self) -> usize {
        self.block_fetches.load(Ordering::SeqCst)
    }

    pub fn children_fetches(&self) -> usize {
        self.children_fetches.load(Ordering::SeqCst)
    }

    /// Every payload accepted by `create_blocks`, with its parent.
    pub fn created(&self) -> Vec<(String, BlockPayload)> {
        self.state().created.clone()
    }

    fn check(&self, token: &str, id: &str) -> Result<(), ApiError> {
        if token.is_empty() {
            return Err(ApiError::Status { status: 401, message: "missing token".into() });
        }
        let state = self.state();
        if state.hard_failures.contains(id) {
            return Err(ApiError::Decode(format!("connection reset fetching {id}")));
        }
        if let Some(&status) = state.status_failures.get(id) {
            return Err(ApiError::Status { status, message: format!("cannot access {id}") });
        }
        Ok(())
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    fn api_url(&self) -> &str {
        "memory://wolai"
    }

    async fn request_token(&self, credentials: &Credentials) -> Result<String, ApiError> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        let accepted = self.credentials.lock().expect("credentials mutex poisoned").clone();
        if *credentials == accepted {
            Ok(format!("token-{}", credentials.app_id))
        } else {
            Err(ApiError::Status { status: 401, message: "invalid app credentials".into() })
        }
    }

    async fn get_block(&self, token: &str, block_id: &str) -> Result<Block, ApiError> {
        self.block_fetches.fetch_add(1, Ordering::SeqCst);
        self.check(token, block_id)?;
        self.state()
            .blocks
            .get(block_id)
            .map(Block::from_json)
            .ok_or_else(|| ApiError::Status { status: 404, message: format!("{block_id} not found") })
    }

    async fn get_children(&self, token: &str, block_id: &str) -> Result<Vec<Block>, ApiError> {
        self.children_fetches.fetch_add(1, Ordering::SeqCst);
        self.check(token, block_id)?;
        let state = self.state();
        if !state.blocks.contains_key(block_id) {
            return Err(ApiError::Status { status: 404, message: format!("{block_id} not found") });
        }
        Ok(state
            .children
            .get(block_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.blocks.get(id))
            .map(Block::from_json)
            .collect())
    }

    async fn create_blocks(
        &self,
        token: &str,
        parent_id: &str,
        blocks: &[BlockPayload],
    ) -> Result<Vec<Value>, ApiError> {
        self.check(token, parent_id)?;
        let mut state = self.state();
        if !state.blocks.contains_key(parent_id) {
            return Err(ApiError::Status { status: 404, message: format!("{parent_id} not found") });
        }

        let mut urls = Vec::with_capacity(blocks.len());
        for payload in blocks {
            state.next_id += 1;
            let id = format!("new{}", state.next_id);
            let mut value = serde_json::to_value(payload)
                .map_err(|e| ApiError::Decode(e.to_string()))?;
            value["id"] = json!(id);
            value["parent_id"] = json!(parent_id);

            state.children.entry(parent_id.to_string()).or_default().push(id.clone());
            state.blocks.insert(id.clone(), value);
            state.created.push((parent_id.to_string(), payload.clone()));
            urls.push(json!(format!("https://www.wolai.com/{parent_id}#{id}")));
        }
        Ok(urls)
    }
}
