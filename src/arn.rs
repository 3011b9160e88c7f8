//! ARN construction and validation.
//!
//! All ARN strings embedded in the manifest are built here, so the shape of
//! every identifier lives in one place. Validation is opt-in (strict mode):
//! the lenient default embeds whatever it was handed, exactly like the
//! original composition, and leaves rejection to the provisioning engine.

use crate::context::Environment;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// IAM role ARN: `arn:{partition}:iam::{account}:role/{name}`.
pub fn role_arn(env: &Environment, role_name: &str) -> String {
    format!(
        "arn:{}:iam::{}:role/{}",
        env.partition, env.account, role_name
    )
}

/// S3 bucket ARN: `arn:{partition}:s3:::{name}`.
pub fn bucket_arn(env: &Environment, bucket_name: &str) -> String {
    format!("arn:{}:s3:::{}", env.partition, bucket_name)
}

/// S3 access point ARN:
/// `arn:{partition}:s3:{region}:{account}:accesspoint/{name}`.
pub fn access_point_arn(env: &Environment, ap_name: &str) -> String {
    format!(
        "arn:{}:s3:{}:{}:accesspoint/{}",
        env.partition, env.region, env.account, ap_name
    )
}

/// Object resource pattern scoped to one access point and one key prefix:
/// `arn:{partition}:s3:{region}:{account}:accesspoint/{name}/object/{prefix}/*`.
///
/// This pattern, not a bare bucket ARN, is what makes the authorization
/// model least-privilege-by-prefix.
pub fn access_point_object_pattern(env: &Environment, ap_name: &str, prefix: &str) -> String {
    format!("{}/object/{}/*", access_point_arn(env, ap_name), prefix)
}

static ROLE_ARN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^arn:[a-z][a-z-]*:iam::\d{12}:role/[\w+=,.@/-]+$").unwrap()
});

// S3 access point naming rules: 3-50 chars, lowercase letters, digits and
// hyphens, must begin and end with a letter or digit.
static AP_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").unwrap());

/// Validate IAM role ARN syntax (strict mode). Existence of the role is
/// never checked; that is the identity engine's concern at apply time.
pub fn validate_role_arn(arn: &str) -> Result<()> {
    if ROLE_ARN_RE.is_match(arn) {
        Ok(())
    } else {
        Err(Error::InvalidArn {
            value: arn.to_string(),
            message: "expected arn:<partition>:iam::<account>:role/<name>".to_string(),
        })
    }
}

/// Validate an access point name against the provider naming rules
/// (strict mode).
pub fn validate_access_point_name(name: &str) -> Result<()> {
    if AP_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier {
            kind: "access point name".to_string(),
            value: name.to_string(),
            message: "must be 3-50 lowercase alphanumeric or hyphen characters, starting and ending with a letter or digit".to_string(),
        })
    }
}

/// Validate a key prefix for use in an access point resource pattern
/// (strict mode). The prefix must be non-empty, carry no leading or trailing
/// separator, and contain no wildcard of its own.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    let reject = |message: &str| {
        Err(Error::InvalidIdentifier {
            kind: "key prefix".to_string(),
            value: prefix.to_string(),
            message: message.to_string(),
        })
    };

    if prefix.is_empty() {
        return reject("must not be empty");
    }
    if prefix.starts_with('/') || prefix.ends_with('/') {
        return reject("must not start or end with '/'");
    }
    if prefix.contains('*') || prefix.contains('?') {
        return reject("must not contain wildcards");
    }
    Ok(())
}

/// Whether two key prefixes overlap: equal, or one is a path-wise parent of
/// the other. Used by strict-mode disjointness checking.
pub fn prefixes_overlap(a: &str, b: &str) -> bool {
    a == b
        || a.strip_prefix(b).is_some_and(|rest| rest.starts_with('/'))
        || b.strip_prefix(a).is_some_and(|rest| rest.starts_with('/'))
}
