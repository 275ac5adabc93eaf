//! Metadataproxy - credential resolution core for a metadata interception
//! proxy.
//!
//! Many co-located callers (typically containers on one host) hit the
//! metadata endpoint asking for the same IAM role or the same temporary
//! credentials within a short window. This crate shields the upstream
//! identity provider from that load with two independently tuned TTL caches
//! and cache-aside resolution:
//!
//! - **Role descriptors** are cached under a fixed 6-hour TTL per entry.
//! - **Assumed-role sessions** are cached for their remaining lifetime minus
//!   a safety margin, derived from the provider's own expiration timestamp.
//!
//! # Features
//!
//! - **Cache-aside**: a hit never touches the provider; a miss queries it
//!   synchronously and populates the cache on success only
//! - **Expiry correctness**: lookups enforce TTLs themselves; the background
//!   sweep only reclaims memory
//! - **Async/Await**: built on tokio for non-blocking shared caches
//! - **Narrow provider seam**: resolvers depend on a two-method trait, so
//!   tests run against a deterministic fake
//! - **Error transparency**: provider failures propagate to the caller
//!   unchanged in kind, are never cached, and are never retried here
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use metadataproxy::providers::mock::MockProvider;
//! use metadataproxy::{Config, Resolver};
//!
//! #[tokio::main]
//! async fn main() -> metadataproxy::Result<()> {
//!     metadataproxy::logging::init_logging()?;
//!
//!     let provider = Arc::new(MockProvider::new());
//!     let resolver = Resolver::new(provider, &Config::default());
//!
//!     // Resolve a role descriptor, then credentials for it.
//!     let role = resolver.get_role("deploy-bot").await?;
//!     let session = resolver.assume_role(&role.arn).await?;
//!
//!     println!("{} valid until {}", session.access_key_id, session.expiration);
//!     Ok(())
//! }
//! ```
//!
//! # Providers
//!
//! | Provider | Feature Flag | Notes |
//! |----------|-------------|-------|
//! | Mock | `mock` (default) | In-memory fixtures, error injection, call counting |
//! | AWS | `aws` | IAM `GetRole` + STS `AssumeRole` via the official SDK |
//!
//! The AWS provider is constructed once at startup from ambient
//! configuration; if that fails the process must not serve requests. Enable
//! it in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! metadataproxy = { version = "0.1", features = ["aws"] }
//! ```
//!
//! # Known characteristics
//!
//! Concurrent misses on one key are not coalesced: each caller may query the
//! provider independently and the last write wins. This wastes provider
//! calls under load but cannot corrupt the caches, whose entries are
//! immutable values.

pub mod cache;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod validation;

pub use cache::TtlCache;
pub use config::Config;
pub use error::{ProxyError, Result};
pub use identity::{AssumedSession, RoleDescriptor};
pub use provider::IdentityProvider;
pub use resolver::Resolver;

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "mock")]
    #[tokio::test]
    async fn test_resolver_smoke() {
        use providers::mock::MockProvider;
        use std::sync::Arc;

        let provider = Arc::new(MockProvider::new());
        provider
            .set_role(RoleDescriptor::new(
                "deploy-bot",
                "arn:aws:iam::123:role/deploy-bot",
                "AROAEXAMPLEID",
                "/",
            ))
            .await;

        let resolver = Resolver::new(provider, &Config::default());

        let role = resolver.get_role("deploy-bot").await.unwrap();
        assert_eq!(role.arn, "arn:aws:iam::123:role/deploy-bot");
    }
}
