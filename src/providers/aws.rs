//! AWS identity provider backed by IAM and STS.

use async_trait::async_trait;
use aws_sdk_iam::Client as IamClient;
use aws_sdk_sts::Client as StsClient;
use tracing::info;

use crate::config::Config;
use crate::identity::{AssumedSession, RoleDescriptor};
use crate::provider::IdentityProvider;
use crate::{ProxyError, Result};

/// Identity provider over the AWS SDK: `GetRole` on IAM, `AssumeRole` on STS.
///
/// Both clients are built once from ambient configuration (environment,
/// profile, instance metadata). Construction failure is fatal to the
/// embedding process; there is no lazy re-initialization.
pub struct AwsProvider {
    iam: IamClient,
    sts: StsClient,
}

impl AwsProvider {
    /// Loads ambient AWS configuration and constructs the IAM and STS
    /// clients.
    ///
    /// `config.region` overrides the ambient region; `config.endpoint`
    /// points both clients at a custom endpoint (for LocalStack testing).
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Config`] if no region can be resolved. The
    /// caller must treat this as a startup failure.
    pub async fn new(config: &Config) -> Result<Self> {
        info!("creating AWS IAM and STS clients");

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(ref region) = config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }

        if let Some(ref endpoint) = config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        if sdk_config.region().is_none() {
            return Err(ProxyError::Config(
                "no AWS region configured (set AWS_REGION or Config::with_region)".to_string(),
            ));
        }

        Ok(Self {
            iam: IamClient::new(&sdk_config),
            sts: StsClient::new(&sdk_config),
        })
    }
}

#[async_trait]
impl IdentityProvider for AwsProvider {
    async fn describe_role(&self, role_name: &str) -> Result<RoleDescriptor> {
        let response = self
            .iam
            .get_role()
            .role_name(role_name)
            .send()
            .await
            .map_err(|e| ProxyError::upstream("get-role", role_name, e.to_string()))?;

        let role = response.role().ok_or_else(|| {
            ProxyError::upstream("get-role", role_name, "response carried no role")
        })?;

        Ok(RoleDescriptor {
            name: role.role_name().to_string(),
            arn: role.arn().to_string(),
            role_id: role.role_id().to_string(),
            path: role.path().to_string(),
            create_date: chrono::DateTime::from_timestamp(
                role.create_date().secs(),
                role.create_date().subsec_nanos(),
            ),
            max_session_duration: role.max_session_duration(),
        })
    }

    async fn assume_role(&self, role_arn: &str, session_name: &str) -> Result<AssumedSession> {
        let response = self
            .sts
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .send()
            .await
            .map_err(|e| ProxyError::upstream("assume-role", role_arn, e.to_string()))?;

        let credentials = response.credentials().ok_or_else(|| {
            ProxyError::upstream("assume-role", role_arn, "response carried no credentials")
        })?;

        let expiration = chrono::DateTime::from_timestamp(
            credentials.expiration().secs(),
            credentials.expiration().subsec_nanos(),
        )
        .ok_or_else(|| {
            ProxyError::upstream("assume-role", role_arn, "credential expiration out of range")
        })?;

        Ok(AssumedSession {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration,
        })
    }
}
