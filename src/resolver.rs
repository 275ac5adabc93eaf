//! Cache-aside resolution of role descriptors and assumed-role sessions.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::identity::{AssumedSession, RoleDescriptor};
use crate::provider::IdentityProvider;
use crate::validation::{validate_role_arn, validate_role_name};
use crate::Result;

/// Resolution context: the identity-provider handle plus the two caches.
///
/// Constructed once at startup and shared by reference across concurrent
/// request paths; both operations take `&self`. There is no request
/// coalescing: concurrent misses on the same key may each call the provider,
/// and the last write wins. Entries are immutable values, so the races waste
/// provider calls but cannot corrupt state.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use metadataproxy::providers::mock::MockProvider;
/// use metadataproxy::{Config, Resolver};
///
/// #[tokio::main]
/// async fn main() -> metadataproxy::Result<()> {
///     let provider = Arc::new(MockProvider::new());
///     let resolver = Resolver::new(provider, &Config::default());
///
///     let role = resolver.get_role("deploy-bot").await?;
///     let session = resolver.assume_role(&role.arn).await?;
///     println!("session valid until {}", session.expiration);
///
///     Ok(())
/// }
/// ```
pub struct Resolver {
    provider: Arc<dyn IdentityProvider>,
    roles: TtlCache<RoleDescriptor>,
    sessions: TtlCache<AssumedSession>,
    role_ttl: Duration,
    safety_margin: Duration,
    session_name: String,
}

impl Resolver {
    /// Builds the context from a provider handle and configuration.
    ///
    /// Spawns the two cache sweep tasks, so this must be called from within
    /// a Tokio runtime.
    pub fn new(provider: Arc<dyn IdentityProvider>, config: &Config) -> Self {
        Self {
            provider,
            roles: TtlCache::new(config.role_cache_ttl, config.role_cache_sweep),
            sessions: TtlCache::new(config.credential_cache_ttl, config.credential_cache_sweep),
            role_ttl: config.role_ttl,
            safety_margin: config.safety_margin,
            session_name: config.session_name.clone(),
        }
    }

    /// Resolves a role descriptor by friendly name.
    ///
    /// Served from the role cache when possible; on a miss the provider is
    /// queried and the descriptor cached under the fixed role TTL. Provider
    /// failures propagate unchanged and cache nothing; no retry is
    /// performed here.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::InvalidRoleName`](crate::ProxyError::InvalidRoleName):
    ///   the name fails boundary validation (no provider call is made)
    /// - [`ProxyError::Upstream`](crate::ProxyError::Upstream): the provider
    ///   rejected or failed the call
    pub async fn get_role(&self, role_name: &str) -> Result<RoleDescriptor> {
        validate_role_name(role_name)?;

        debug!(role = role_name, "looking up IAM role");

        if let Some(role) = self.roles.get(role_name).await {
            debug!(role = role_name, "IAM role served from cache");
            return Ok(role);
        }

        info!(role = role_name, "requesting IAM role from the identity provider");
        let role = self.provider.describe_role(role_name).await?;

        self.roles
            .insert_with_ttl(role_name, role.clone(), self.role_ttl)
            .await;

        Ok(role)
    }

    /// Resolves temporary session credentials for a role ARN.
    ///
    /// Served from the credential cache when possible; on a miss the
    /// provider's assume-role operation is called with this resolver's
    /// session name. A fetched session is cached for its remaining lifetime
    /// minus the safety margin, so callers never receive credentials within
    /// the margin of real expiry. A session already inside the margin is
    /// returned but not cached; the next lookup refetches.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::InvalidRoleArn`](crate::ProxyError::InvalidRoleArn):
    ///   the ARN fails boundary validation (no provider call is made)
    /// - [`ProxyError::Upstream`](crate::ProxyError::Upstream): the provider
    ///   rejected or failed the call
    pub async fn assume_role(&self, role_arn: &str) -> Result<AssumedSession> {
        validate_role_arn(role_arn)?;

        debug!(arn = role_arn, "looking up assumed-role session");

        if let Some(session) = self.sessions.get(role_arn).await {
            debug!(arn = role_arn, "assumed-role session served from cache");
            return Ok(session);
        }

        info!(
            arn = role_arn,
            "requesting assumed-role session from the identity provider"
        );
        let session = self
            .provider
            .assume_role(role_arn, &self.session_name)
            .await?;

        match self.session_cache_ttl(&session) {
            Some(ttl) => {
                info!(
                    arn = role_arn,
                    ttl_secs = ttl.as_secs(),
                    "caching assumed-role session"
                );
                self.sessions
                    .insert_with_ttl(role_arn, session.clone(), ttl)
                    .await;
            }
            None => {
                info!(
                    arn = role_arn,
                    "session already within the expiry margin, not caching"
                );
            }
        }

        Ok(session)
    }

    /// Remaining lifetime minus the safety margin, or `None` when the
    /// session is already inside the margin and must not be cached.
    ///
    /// The TTL is computed against the wall clock once, here, then applied
    /// as a monotonic deadline inside the cache, so later clock jumps
    /// cannot resurrect an expired session.
    fn session_cache_ttl(&self, session: &AssumedSession) -> Option<Duration> {
        let lifetime = session.expiration.signed_duration_since(Utc::now());
        let margin = chrono::Duration::seconds(self.safety_margin.as_secs() as i64);

        match (lifetime - margin).to_std() {
            Ok(ttl) if ttl > Duration::ZERO => Some(ttl),
            _ => None,
        }
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::providers::mock::MockProvider;

    fn session_expiring_in(lifetime: chrono::Duration) -> AssumedSession {
        AssumedSession {
            access_key_id: "AKIATEST".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: "token".to_string(),
            expiration: Utc::now() + lifetime,
        }
    }

    async fn resolver() -> Resolver {
        Resolver::new(Arc::new(MockProvider::new()), &Config::default())
    }

    #[tokio::test]
    async fn test_session_ttl_is_lifetime_minus_margin() {
        let resolver = resolver().await;
        let session = session_expiring_in(chrono::Duration::minutes(15));

        let ttl = resolver.session_cache_ttl(&session).unwrap();

        // 15 minutes out, 1 minute margin: effective TTL of 14 minutes, give
        // or take the time spent building the fixture.
        assert!(ttl <= Duration::from_secs(14 * 60));
        assert!(ttl > Duration::from_secs(14 * 60 - 5));
    }

    #[tokio::test]
    async fn test_session_inside_margin_gets_no_ttl() {
        let resolver = resolver().await;

        let session = session_expiring_in(chrono::Duration::seconds(30));
        assert_eq!(resolver.session_cache_ttl(&session), None);

        let session = session_expiring_in(chrono::Duration::seconds(60));
        assert_eq!(resolver.session_cache_ttl(&session), None);
    }

    #[tokio::test]
    async fn test_already_expired_session_gets_no_ttl() {
        let resolver = resolver().await;
        let session = session_expiring_in(chrono::Duration::minutes(-5));

        assert_eq!(resolver.session_cache_ttl(&session), None);
    }
}
