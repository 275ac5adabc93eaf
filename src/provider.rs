//! Identity-provider capability consumed by the resolver.
//!
//! The resolver depends only on this narrow trait, so unit tests can swap in
//! a deterministic fake and the concrete SDK client stays behind a feature
//! flag.

use crate::identity::{AssumedSession, RoleDescriptor};
use crate::Result;
use async_trait::async_trait;

/// The two upstream operations the resolver needs.
///
/// Calls are synchronous from the caller's point of view: no timeout, no
/// retry, no cancellation is applied here. A slow provider call blocks only
/// the calling request path.
///
/// All implementations must be `Send + Sync` to support concurrent access
/// across async tasks.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetches the descriptor for a role by friendly name.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Upstream`](crate::ProxyError::Upstream) if the
    /// provider rejects or fails the call.
    async fn describe_role(&self, role_name: &str) -> Result<RoleDescriptor>;

    /// Exchanges a role ARN for temporary session credentials.
    ///
    /// `session_name` identifies this proxy as the caller in the provider's
    /// audit trail. The returned session always carries an expiration
    /// timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Upstream`](crate::ProxyError::Upstream) if the
    /// provider rejects or fails the call.
    async fn assume_role(&self, role_arn: &str, session_name: &str) -> Result<AssumedSession>;
}
