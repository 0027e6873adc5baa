//! Auth session: credentials, default root page, and the cached app token.
//!
//! The token is fetched lazily on first use and reused until the credentials
//! change. It only ever lives in memory.

use crate::constants::{ENV_APP_ID, ENV_APP_SECRET};
use crate::transport::{ApiError, Credentials, Transport};

/// Per-process session state. Owned by [`crate::WolaiClient`] behind a mutex.
#[derive(Clone, Debug, Default)]
pub struct Session {
    credentials: Credentials,
    root_id: Option<String>,
    token: Option<String>,
}

impl Session {
    pub fn new(credentials: Credentials, root_id: Option<String>) -> Self {
        Self {
            credentials,
            root_id: root_id.filter(|r| !r.is_empty()),
            token: None,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root_id.as_deref()
    }

    pub fn set_root_id(&mut self, root_id: impl Into<String>) {
        self.root_id = Some(root_id.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Swap in new credentials and drop the cached token. Returns the old ones.
    pub fn replace_credentials(&mut self, credentials: Credentials) -> Credentials {
        self.token = None;
        std::mem::replace(&mut self.credentials, credentials)
    }

    /// Return the cached token, or request and cache a new one.
    ///
    /// Any failure leaves the cache empty and comes back as
    /// [`ApiError::Auth`] (or [`ApiError::MissingConfig`] when an ID or
    /// secret is blank).
    pub async fn token(&mut self, transport: &dyn Transport) -> Result<String, ApiError> {
        if let Some(ref token) = self.token {
            return Ok(token.clone());
        }

        if self.credentials.app_id.is_empty() {
            return Err(ApiError::MissingConfig(ENV_APP_ID));
        }
        if self.credentials.app_secret.is_empty() {
            return Err(ApiError::MissingConfig(ENV_APP_SECRET));
        }

        match transport.request_token(&self.credentials).await {
            Ok(token) if !token.is_empty() => {
                tracing::debug!("acquired app token");
                self.token = Some(token.clone());
                Ok(token)
            }
            Ok(_) => Err(auth_failed(ApiError::Auth("empty app_token".into()))),
            Err(e) => Err(auth_failed(e)),
        }
    }
}

fn auth_failed(error: ApiError) -> ApiError {
    tracing::error!("Auth error: {error}");
    match error {
        ApiError::Auth(_) => error,
        other => ApiError::Auth(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTransport;

    fn valid() -> Credentials {
        Credentials::new("test-app", "test-secret")
    }

    #[tokio::test]
    async fn test_token_cached_after_first_fetch() {
        let transport = MemoryTransport::new();
        let mut session = Session::new(valid(), None);

        let first = session.token(&transport).await.unwrap();
        assert_eq!(transport.token_requests(), 1);

        let second = session.token(&transport).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(transport.token_requests(), 1);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_credential_change_forces_one_refetch() {
        let transport = MemoryTransport::new();
        let mut session = Session::new(valid(), None);
        session.token(&transport).await.unwrap();

        transport.accept_credentials(Credentials::new("other", "pw"));
        let old = session.replace_credentials(Credentials::new("other", "pw"));
        assert_eq!(old, valid());
        assert!(!session.is_authenticated());

        let token = session.token(&transport).await.unwrap();
        assert_eq!(token, "token-other");
        assert_eq!(transport.token_requests(), 2);
    }

    #[tokio::test]
    async fn test_failure_leaves_cache_empty() {
        let transport = MemoryTransport::new();
        let mut session = Session::new(Credentials::new("test-app", "wrong"), None);

        let err = session.token(&transport).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));
        assert!(!session.is_authenticated());

        // Not cached: the next call tries again.
        session.token(&transport).await.unwrap_err();
        assert_eq!(transport.token_requests(), 2);
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_network() {
        let transport = MemoryTransport::new();
        let mut session = Session::new(Credentials::new("", "secret"), None);
        let err = session.token(&transport).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingConfig(ENV_APP_ID)));

        let mut session = Session::new(Credentials::new("id", ""), None);
        let err = session.token(&transport).await.unwrap_err();
        assert!(matches!(err, ApiError::MissingConfig(ENV_APP_SECRET)));
        assert_eq!(transport.token_requests(), 0);
    }

    #[test]
    fn test_blank_root_is_unset() {
        assert_eq!(Session::new(valid(), Some(String::new())).root_id(), None);
        assert_eq!(Session::new(valid(), Some("r".into())).root_id(), Some("r"));
    }
}
