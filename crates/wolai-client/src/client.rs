//! Authenticated client: a [`Transport`] plus the shared [`Session`].
//!
//! Cloning is cheap; clones share the same session, so a credential change
//! through one clone invalidates the token for all of them.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use crate::block::{Block, BlockPayload};
use crate::session::Session;
use crate::transport::{ApiError, Credentials, Transport};

/// Read-only view of the session for status reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStatus {
    pub app_id: String,
    pub app_secret: String,
    pub root_id: Option<String>,
    pub authenticated: bool,
    pub api_url: String,
}

#[derive(Clone)]
pub struct WolaiClient {
    transport: Arc<dyn Transport>,
    session: Arc<Mutex<Session>>,
}

impl std::fmt::Debug for WolaiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WolaiClient")
            .field("api_url", &self.transport.api_url())
            .finish()
    }
}

impl WolaiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Session) -> Self {
        Self {
            transport,
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub fn api_url(&self) -> &str {
        self.transport.api_url()
    }

    /// Current app token, fetching one if none is cached.
    ///
    /// The session lock is held across the token request, so a concurrent
    /// credential change waits for it rather than racing it.
    pub async fn token(&self) -> Result<String, ApiError> {
        let mut session = self.session.lock().await;
        session.token(self.transport.as_ref()).await
    }

    /// Replace the credentials and verify them by fetching a token.
    ///
    /// On failure the previous credentials are restored (with an empty token
    /// cache) and the error is returned.
    pub async fn set_credentials(&self, credentials: Credentials) -> Result<(), ApiError> {
        let mut session = self.session.lock().await;
        let previous = session.replace_credentials(credentials);

        match session.token(self.transport.as_ref()).await {
            Ok(_) => {
                tracing::info!(app_id = %session.credentials().app_id, "Wolai credentials updated");
                Ok(())
            }
            Err(e) => {
                session.replace_credentials(previous);
                Err(e)
            }
        }
    }

    pub async fn root_id(&self) -> Option<String> {
        self.session.lock().await.root_id().map(str::to_string)
    }

    pub async fn set_root_id(&self, root_id: &str) {
        tracing::info!(root_id, "root page changed");
        self.session.lock().await.set_root_id(root_id);
    }

    pub async fn status(&self) -> SessionStatus {
        let session = self.session.lock().await;
        SessionStatus {
            app_id: session.credentials().app_id.clone(),
            app_secret: session.credentials().app_secret.clone(),
            root_id: session.root_id().map(str::to_string),
            authenticated: session.is_authenticated(),
            api_url: self.transport.api_url().to_string(),
        }
    }

    pub async fn get_block(&self, block_id: &str) -> Result<Block, ApiError> {
        let token = self.token().await?;
        self.transport.get_block(&token, block_id).await
    }

    pub async fn get_children(&self, block_id: &str) -> Result<Vec<Block>, ApiError> {
        let token = self.token().await?;
        self.transport.get_children(&token, block_id).await
    }

    pub async fn create_blocks(
        &self,
        parent_id: &str,
        blocks: &[BlockPayload],
    ) -> Result<Vec<Value>, ApiError> {
        let token = self.token().await?;
        self.transport.create_blocks(&token, parent_id, blocks).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;

    fn client_with(transport: Arc<MemoryTransport>) -> WolaiClient {
        WolaiClient::new(
            transport,
            Session::new(Credentials::new("test-app", "test-secret"), Some("root".into())),
        )
    }

    #[tokio::test]
    async fn test_calls_share_one_token() {
        let transport = Arc::new(MemoryTransport::new());
        transport.add_page("root", "Root", None);
        let client = client_with(transport.clone());

        client.get_block("root").await.unwrap();
        client.get_children("root").await.unwrap();
        client.clone().get_block("root").await.unwrap();
        assert_eq!(transport.token_requests(), 1);
    }

    #[tokio::test]
    async fn test_set_credentials_verifies_and_refetches() {
        let transport = Arc::new(MemoryTransport::new());
        let client = client_with(transport.clone());
        client.token().await.unwrap();

        transport.accept_credentials(Credentials::new("new-app", "new-secret"));
        client
            .set_credentials(Credentials::new("new-app", "new-secret"))
            .await
            .unwrap();
        assert_eq!(transport.token_requests(), 2);
        assert_eq!(client.token().await.unwrap(), "token-new-app");
        assert_eq!(transport.token_requests(), 2);
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_rolled_back() {
        let transport = Arc::new(MemoryTransport::new());
        let client = client_with(transport.clone());

        let err = client
            .set_credentials(Credentials::new("bad", "creds"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));

        let status = client.status().await;
        assert_eq!(status.app_id, "test-app");
        assert!(!status.authenticated);
        client.token().await.unwrap();
    }

    #[tokio::test]
    async fn test_status_reflects_root_and_auth() {
        let transport = Arc::new(MemoryTransport::new());
        let client = client_with(transport);
        assert!(!client.status().await.authenticated);

        client.set_root_id("elsewhere").await;
        client.token().await.unwrap();

        let status = client.status().await;
        assert_eq!(status.root_id.as_deref(), Some("elsewhere"));
        assert!(status.authenticated);
        assert_eq!(status.api_url, "memory://wolai");
    }
}
