//! Configuration for the resolver and its caches.

use std::time::Duration;

/// Tuning knobs for the resolver.
///
/// Use the builder pattern for ergonomic configuration:
///
/// ```
/// use std::time::Duration;
/// use metadataproxy::Config;
///
/// let config = Config::new()
///     .with_region("us-west-2")
///     .with_session_name("metadataproxy-prod")
///     .with_safety_margin(Duration::from_secs(120));
/// ```
///
/// The defaults reflect the two workloads: role descriptors change rarely
/// and get a long fixed TTL on every write, while session entries almost
/// always carry an explicit TTL derived from their expiration timestamp, so
/// that cache's default is short and its sweep relaxed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default expiration for role cache entries (default: 1 hour)
    pub role_cache_ttl: Duration,

    /// How often the role cache sweeps expired entries (default: 15 minutes)
    pub role_cache_sweep: Duration,

    /// Default expiration for credential cache entries (default: 5 minutes)
    pub credential_cache_ttl: Duration,

    /// How often the credential cache sweeps expired entries
    /// (default: 10 minutes)
    pub credential_cache_sweep: Duration,

    /// Fixed TTL applied to every cached role descriptor, overriding the
    /// role cache default (default: 6 hours)
    pub role_ttl: Duration,

    /// Subtracted from a session's remaining lifetime when computing its
    /// cache TTL, so callers never receive credentials this close to real
    /// expiry (default: 1 minute)
    pub safety_margin: Duration,

    /// Session name identifying this proxy in assume-role calls
    pub session_name: String,

    /// AWS region override (default: ambient configuration)
    pub region: Option<String>,

    /// Custom endpoint URL for the AWS clients (for LocalStack testing)
    pub endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            role_cache_ttl: Duration::from_secs(3600),
            role_cache_sweep: Duration::from_secs(15 * 60),
            credential_cache_ttl: Duration::from_secs(5 * 60),
            credential_cache_sweep: Duration::from_secs(10 * 60),
            role_ttl: Duration::from_secs(6 * 3600),
            safety_margin: Duration::from_secs(60),
            session_name: "metadataproxy".to_string(),
            region: None,
            endpoint: None,
        }
    }
}

impl Config {
    /// Creates a configuration with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AWS region override.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets a custom endpoint URL for the AWS clients.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the assume-role session name.
    pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = name.into();
        self
    }

    /// Sets the fixed TTL applied to cached role descriptors.
    pub fn with_role_ttl(mut self, ttl: Duration) -> Self {
        self.role_ttl = ttl;
        self
    }

    /// Sets the safety margin subtracted from session lifetimes.
    pub fn with_safety_margin(mut self, margin: Duration) -> Self {
        self.safety_margin = margin;
        self
    }

    /// Tunes the role cache's default expiration and sweep interval.
    pub fn with_role_cache(mut self, default_ttl: Duration, sweep: Duration) -> Self {
        self.role_cache_ttl = default_ttl;
        self.role_cache_sweep = sweep;
        self
    }

    /// Tunes the credential cache's default expiration and sweep interval.
    pub fn with_credential_cache(mut self, default_ttl: Duration, sweep: Duration) -> Self {
        self.credential_cache_ttl = default_ttl;
        self.credential_cache_sweep = sweep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.role_ttl, Duration::from_secs(21_600));
        assert_eq!(config.safety_margin, Duration::from_secs(60));
        assert_eq!(config.session_name, "metadataproxy");
        assert!(config.region.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new()
            .with_region("eu-west-1")
            .with_endpoint("http://localhost:4566")
            .with_session_name("metadataproxy-test")
            .with_role_cache(Duration::from_secs(10), Duration::from_secs(5));

        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.session_name, "metadataproxy-test");
        assert_eq!(config.role_cache_ttl, Duration::from_secs(10));
        assert_eq!(config.role_cache_sweep, Duration::from_secs(5));
    }
}
