//! Boundary validation for role names and ARNs.
//!
//! Lookup keys arrive from untrusted co-located callers through the
//! interception front-end. Rejecting malformed input here keeps garbage out
//! of both caches and avoids pointless provider calls.

use crate::{ProxyError, Result};

/// IAM limits role names to 64 characters.
const MAX_ROLE_NAME_LENGTH: usize = 64;

/// Characters IAM permits in role names besides ASCII alphanumerics.
const ROLE_NAME_EXTRA_CHARS: &str = "+=,.@_-";

/// Validates a friendly role name against the IAM charset.
///
/// # Errors
///
/// Returns [`ProxyError::InvalidRoleName`] if validation fails.
///
/// # Example
///
/// ```
/// use metadataproxy::validation::validate_role_name;
///
/// assert!(validate_role_name("deploy-bot").is_ok());
/// assert!(validate_role_name("svc.ci@prod").is_ok());
///
/// assert!(validate_role_name("").is_err());
/// assert!(validate_role_name("deploy bot").is_err());
/// assert!(validate_role_name("role/with/path").is_err());
/// ```
pub fn validate_role_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ProxyError::InvalidRoleName(
            "name cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_ROLE_NAME_LENGTH {
        return Err(ProxyError::InvalidRoleName(format!(
            "name exceeds maximum length of {} characters",
            MAX_ROLE_NAME_LENGTH
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || ROLE_NAME_EXTRA_CHARS.contains(c))
    {
        return Err(ProxyError::InvalidRoleName(format!(
            "name contains characters outside the IAM role charset: {name:?}"
        )));
    }

    Ok(())
}

/// Validates a role ARN of the form
/// `arn:<partition>:iam::<account>:role/<path...><name>`.
///
/// # Errors
///
/// Returns [`ProxyError::InvalidRoleArn`] if validation fails.
pub fn validate_role_arn(arn: &str) -> Result<()> {
    let parts: Vec<&str> = arn.splitn(6, ':').collect();

    let [prefix, partition, service, region, account, resource] = parts.as_slice() else {
        return Err(ProxyError::InvalidRoleArn(format!(
            "expected six colon-separated segments: {arn:?}"
        )));
    };

    if *prefix != "arn" {
        return Err(ProxyError::InvalidRoleArn(format!(
            "must start with \"arn:\": {arn:?}"
        )));
    }

    if partition.is_empty() {
        return Err(ProxyError::InvalidRoleArn(format!(
            "missing partition: {arn:?}"
        )));
    }

    if *service != "iam" {
        return Err(ProxyError::InvalidRoleArn(format!(
            "service must be \"iam\": {arn:?}"
        )));
    }

    // IAM is a global service; the region segment stays empty.
    if !region.is_empty() {
        return Err(ProxyError::InvalidRoleArn(format!(
            "unexpected region segment: {arn:?}"
        )));
    }

    if account.is_empty() || !account.chars().all(|c| c.is_ascii_digit()) {
        return Err(ProxyError::InvalidRoleArn(format!(
            "account must be numeric: {arn:?}"
        )));
    }

    let Some(role_path) = resource.strip_prefix("role/") else {
        return Err(ProxyError::InvalidRoleArn(format!(
            "resource must start with \"role/\": {arn:?}"
        )));
    };

    // The final path segment is the role name proper.
    let name = role_path.rsplit('/').next().unwrap_or_default();
    validate_role_name(name)
        .map_err(|_| ProxyError::InvalidRoleArn(format!("malformed role name segment: {arn:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_role_names() {
        assert!(validate_role_name("deploy-bot").is_ok());
        assert!(validate_role_name("Admin_Role.2024").is_ok());
        assert!(validate_role_name("svc+ci=prod,a@b").is_ok());
    }

    #[test]
    fn test_empty_role_name() {
        let result = validate_role_name("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_role_name_too_long() {
        let long_name = "a".repeat(65);
        let result = validate_role_name(&long_name);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_role_name_bad_characters() {
        for name in [
            "deploy bot",
            "role/with/path",
            "role;injection",
            "röle",
            "role\0null",
            "arn:aws:iam::123:role/full-arn",
        ] {
            let result = validate_role_name(name);
            assert!(result.is_err(), "expected {name:?} to fail validation");
        }
    }

    #[test]
    fn test_valid_role_arns() {
        assert!(validate_role_arn("arn:aws:iam::123456789012:role/deploy-bot").is_ok());
        assert!(validate_role_arn("arn:aws:iam::123:role/deploy-bot").is_ok());
        assert!(validate_role_arn("arn:aws-cn:iam::123456789012:role/service/ci-runner").is_ok());
    }

    #[test]
    fn test_invalid_role_arns() {
        for arn in [
            "",
            "deploy-bot",
            "arn:aws:iam::123456789012:user/someone",
            "arn:aws:sts::123456789012:role/deploy-bot",
            "arn:aws:iam:us-east-1:123456789012:role/deploy-bot",
            "arn:aws:iam::not-a-number:role/deploy-bot",
            "arn:aws:iam::123456789012:role/",
            "arn::iam::123456789012:role/deploy-bot",
        ] {
            let result = validate_role_arn(arn);
            assert!(result.is_err(), "expected {arn:?} to fail validation");
        }
    }
}
