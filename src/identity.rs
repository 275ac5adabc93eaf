//! Value types returned by the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptor for an IAM role, as reported by the identity provider.
///
/// Immutable once fetched; the resolver caches whole descriptors and hands
/// out clones. Serialized field names follow the provider's wire shape so the
/// front-end can render descriptors into metadata documents directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleDescriptor {
    /// Friendly role name (unique per account)
    #[serde(rename = "RoleName")]
    pub name: String,

    /// Full resource name of the role
    pub arn: String,

    /// Stable provider-issued identifier
    pub role_id: String,

    /// Path prefix the role was created under
    pub path: String,

    /// When the role was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_date: Option<DateTime<Utc>>,

    /// Maximum session duration in seconds permitted when assuming this role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_session_duration: Option<i32>,
}

impl RoleDescriptor {
    /// Creates a descriptor with the required identity fields.
    ///
    /// # Example
    ///
    /// ```
    /// use metadataproxy::RoleDescriptor;
    ///
    /// let role = RoleDescriptor::new(
    ///     "deploy-bot",
    ///     "arn:aws:iam::123:role/deploy-bot",
    ///     "AROAEXAMPLEID",
    ///     "/",
    /// );
    /// assert_eq!(role.name, "deploy-bot");
    /// ```
    pub fn new(
        name: impl Into<String>,
        arn: impl Into<String>,
        role_id: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            arn: arn.into(),
            role_id: role_id.into(),
            path: path.into(),
            create_date: None,
            max_session_duration: None,
        }
    }
}

/// Temporary credentials obtained by assuming a role.
///
/// The `expiration` timestamp is authoritative: all caching decisions derive
/// from it, never from a fixed policy.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssumedSession {
    /// Access key identifier
    pub access_key_id: String,

    /// Secret signing key
    pub secret_access_key: String,

    /// Session token accompanying the key pair
    pub session_token: String,

    /// When the provider will stop honoring these credentials
    pub expiration: DateTime<Utc>,
}

// Secret material must never reach logs through a stray {:?}.
impl std::fmt::Debug for AssumedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssumedSession")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}
