//! Process logging setup from the environment.
//!
//! `LOG_LEVEL` takes a level or filter directive (`RUST_LOG` syntax) and
//! defaults to `info`. `LOG_FORMAT` selects `text` (the default) or `json`.

use tracing_subscriber::EnvFilter;

use crate::{ProxyError, Result};

/// Installs the global tracing subscriber.
///
/// Intended to be called once at process startup, before the resolver is
/// constructed. A malformed `LOG_LEVEL` or unknown `LOG_FORMAT` is a
/// configuration error the embedding process must treat as fatal.
///
/// # Errors
///
/// Returns [`ProxyError::Config`] if either variable is invalid or a global
/// subscriber is already installed.
pub fn init_logging() -> Result<()> {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    // Validate eagerly; EnvFilter::new silently drops bad directives.
    EnvFilter::try_new(&level)
        .map_err(|e| ProxyError::Config(format!("unknown LOG_LEVEL {level:?}: {e}")))?;

    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let result = match format.as_str() {
        "text" => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&level))
            .try_init(),
        "json" => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&level))
            .json()
            .try_init(),
        other => {
            return Err(ProxyError::Config(format!(
                "unknown LOG_FORMAT {other:?} (text or json)"
            )))
        }
    };

    result.map_err(|e| ProxyError::Config(format!("failed to install logging subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so both rejection paths run in one test
    // to avoid races. Each returns before a subscriber is installed.

    #[test]
    fn test_invalid_environment_is_config_error() {
        std::env::set_var("LOG_FORMAT", "gelf");
        let result = init_logging();
        std::env::remove_var("LOG_FORMAT");

        match result {
            Err(ProxyError::Config(message)) => assert!(message.contains("LOG_FORMAT")),
            other => panic!("expected config error, got {other:?}"),
        }

        std::env::set_var("LOG_LEVEL", "not=a=level");
        let result = init_logging();
        std::env::remove_var("LOG_LEVEL");

        match result {
            Err(ProxyError::Config(message)) => assert!(message.contains("LOG_LEVEL")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
