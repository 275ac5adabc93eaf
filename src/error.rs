//! Error types for credential resolution.

use thiserror::Error;

/// Result type alias using [`ProxyError`].
pub type Result<T> = std::result::Result<T, ProxyError>;

/// Errors that can occur while resolving roles and sessions.
///
/// All errors implement `std::error::Error` and can be chained with `source()`.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Ambient cloud configuration could not produce a usable client.
    ///
    /// This is a startup failure. The embedding process must treat it as
    /// fatal; the resolver never re-initializes lazily.
    #[error("configuration error: {0}")]
    Config(String),

    /// The identity provider rejected or failed a call (access denied,
    /// throttling, network failure). Propagated to the caller unchanged;
    /// never cached; never retried here.
    #[error("identity provider: {operation} {target}: {message}")]
    Upstream {
        /// Operation name ("get-role", "assume-role")
        operation: String,
        /// Role name or ARN the operation targeted
        target: String,
        /// Provider-reported failure
        message: String,
    },

    /// Role name failed boundary validation.
    #[error("invalid role name: {0}")]
    InvalidRoleName(String),

    /// Role ARN failed boundary validation.
    #[error("invalid role ARN: {0}")]
    InvalidRoleArn(String),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProxyError {
    /// Creates an upstream error with operation and target context.
    ///
    /// # Example
    ///
    /// ```
    /// use metadataproxy::ProxyError;
    ///
    /// let err = ProxyError::upstream("get-role", "deploy-bot", "AccessDenied");
    ///
    /// assert_eq!(
    ///     err.to_string(),
    ///     "identity provider: get-role deploy-bot: AccessDenied"
    /// );
    /// ```
    pub fn upstream(
        operation: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Upstream {
            operation: operation.into(),
            target: target.into(),
            message: message.into(),
        }
    }
}
