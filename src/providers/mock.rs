//! Mock identity provider for testing.
//!
//! In-memory fixtures with per-operation error injection and call counting,
//! so tests can assert exactly when the resolver goes upstream.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identity::{AssumedSession, RoleDescriptor};
use crate::provider::IdentityProvider;
use crate::{ProxyError, Result};

/// Mock identity provider.
///
/// Unknown roles and ARNs fail the same way the real provider does, with an
/// upstream error. Injected failures take precedence over fixtures.
///
/// # Example
///
/// ```
/// use metadataproxy::providers::mock::MockProvider;
/// use metadataproxy::{IdentityProvider, RoleDescriptor};
///
/// #[tokio::main]
/// async fn main() -> metadataproxy::Result<()> {
///     let provider = MockProvider::new();
///     provider
///         .set_role(RoleDescriptor::new(
///             "deploy-bot",
///             "arn:aws:iam::123:role/deploy-bot",
///             "AROAEXAMPLEID",
///             "/",
///         ))
///         .await;
///
///     let role = provider.describe_role("deploy-bot").await?;
///     assert_eq!(role.name, "deploy-bot");
///     assert_eq!(provider.describe_calls(), 1);
///
///     Ok(())
/// }
/// ```
pub struct MockProvider {
    roles: RwLock<HashMap<String, RoleDescriptor>>,
    sessions: RwLock<HashMap<String, AssumedSession>>,
    describe_failure: RwLock<Option<String>>,
    assume_failure: RwLock<Option<String>>,
    describe_calls: AtomicUsize,
    assume_calls: AtomicUsize,
    last_session_name: RwLock<Option<String>>,
}

impl MockProvider {
    /// Creates a provider with no fixtures.
    pub fn new() -> Self {
        Self {
            roles: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            describe_failure: RwLock::new(None),
            assume_failure: RwLock::new(None),
            describe_calls: AtomicUsize::new(0),
            assume_calls: AtomicUsize::new(0),
            last_session_name: RwLock::new(None),
        }
    }

    /// Pre-populates a role descriptor, keyed by its name.
    pub async fn set_role(&self, role: RoleDescriptor) {
        self.roles.write().await.insert(role.name.clone(), role);
    }

    /// Pre-populates the session returned for a role ARN.
    pub async fn set_session(&self, role_arn: impl Into<String>, session: AssumedSession) {
        self.sessions.write().await.insert(role_arn.into(), session);
    }

    /// Makes every `describe_role` call fail with the given provider message.
    pub async fn fail_describe(&self, message: impl Into<String>) {
        *self.describe_failure.write().await = Some(message.into());
    }

    /// Makes every `assume_role` call fail with the given provider message.
    pub async fn fail_assume(&self, message: impl Into<String>) {
        *self.assume_failure.write().await = Some(message.into());
    }

    /// Clears injected failures; fixtures apply again.
    pub async fn clear_failures(&self) {
        *self.describe_failure.write().await = None;
        *self.assume_failure.write().await = None;
    }

    /// Number of `describe_role` calls that reached this provider.
    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::Relaxed)
    }

    /// Number of `assume_role` calls that reached this provider.
    pub fn assume_calls(&self) -> usize {
        self.assume_calls.load(Ordering::Relaxed)
    }

    /// Session name passed to the most recent `assume_role` call.
    pub async fn last_session_name(&self) -> Option<String> {
        self.last_session_name.read().await.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn describe_role(&self, role_name: &str) -> Result<RoleDescriptor> {
        self.describe_calls.fetch_add(1, Ordering::Relaxed);

        if let Some(message) = self.describe_failure.read().await.clone() {
            return Err(ProxyError::upstream("get-role", role_name, message));
        }

        self.roles
            .read()
            .await
            .get(role_name)
            .cloned()
            .ok_or_else(|| {
                ProxyError::upstream("get-role", role_name, "NoSuchEntity: role not found")
            })
    }

    async fn assume_role(&self, role_arn: &str, session_name: &str) -> Result<AssumedSession> {
        self.assume_calls.fetch_add(1, Ordering::Relaxed);
        *self.last_session_name.write().await = Some(session_name.to_string());

        if let Some(message) = self.assume_failure.read().await.clone() {
            return Err(ProxyError::upstream("assume-role", role_arn, message));
        }

        self.sessions
            .read()
            .await
            .get(role_arn)
            .cloned()
            .ok_or_else(|| {
                ProxyError::upstream(
                    "assume-role",
                    role_arn,
                    "AccessDenied: not authorized to assume role",
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session() -> AssumedSession {
        AssumedSession {
            access_key_id: "AKIAMOCK".to_string(),
            secret_access_key: "mock-secret".to_string(),
            session_token: "mock-token".to_string(),
            expiration: Utc::now() + chrono::Duration::minutes(15),
        }
    }

    #[tokio::test]
    async fn test_describe_role_fixture() {
        let provider = MockProvider::new();
        provider
            .set_role(RoleDescriptor::new("deploy-bot", "arn:aws:iam::123:role/deploy-bot", "AROA1", "/"))
            .await;

        let role = provider.describe_role("deploy-bot").await.unwrap();
        assert_eq!(role.arn, "arn:aws:iam::123:role/deploy-bot");
        assert_eq!(provider.describe_calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_role_is_upstream_error() {
        let provider = MockProvider::new();

        let result = provider.describe_role("missing").await;
        assert!(matches!(result, Err(ProxyError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_assume_role_records_session_name() {
        let provider = MockProvider::new();
        provider.set_session("arn:aws:iam::123:role/deploy-bot", session()).await;

        provider
            .assume_role("arn:aws:iam::123:role/deploy-bot", "metadataproxy")
            .await
            .unwrap();

        assert_eq!(provider.last_session_name().await.as_deref(), Some("metadataproxy"));
        assert_eq!(provider.assume_calls(), 1);
    }

    #[tokio::test]
    async fn test_error_injection_and_clear() {
        let provider = MockProvider::new();
        provider
            .set_role(RoleDescriptor::new("deploy-bot", "arn:aws:iam::123:role/deploy-bot", "AROA1", "/"))
            .await;
        provider.fail_describe("Throttling: rate exceeded").await;

        let result = provider.describe_role("deploy-bot").await;
        assert!(matches!(result, Err(ProxyError::Upstream { .. })));

        provider.clear_failures().await;
        assert!(provider.describe_role("deploy-bot").await.is_ok());
        assert_eq!(provider.describe_calls(), 2);
    }
}
