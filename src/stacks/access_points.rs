//! Access point authorization stack.
//!
//! The core of the access-control design: one access point per
//! principal×prefix pair, each carrying a policy document with exactly one
//! allow statement. The statement names one principal, grants object read
//! and write, and scopes the resource to the access point's own prefix
//! through the `accesspoint/{name}/object/{prefix}/*` pattern. No access
//! point ever grants cross-prefix or cross-principal access, and no
//! statement mixes resource scopes.
//!
//! In lenient mode (the default) the stack embeds whatever identifiers it
//! was handed, exactly like the original composition; the provisioning
//! engine rejects malformed input at apply time. Strict mode closes that
//! gap locally: ARN syntax, naming rules, prefix shape, and prefix
//! disjointness are all checked at declaration time.

use crate::app::App;
use crate::arn;
use crate::context::ValidationMode;
use crate::error::{Error, Result};
use crate::manifest::Resource;
use crate::policy::{actions, PolicyDocument, Principal, Statement};
use crate::stacks::{pascal_case, BucketHandle, RoleHandle};
use indexmap::IndexMap;
use serde_json::json;

/// One intended consumer: (access point name, key prefix, principal role).
#[derive(Debug, Clone)]
pub struct AccessPointSpec {
    /// Access point name, unique within an account and region.
    pub name: String,
    /// The sole key prefix this access point authorizes.
    pub prefix: String,
    /// The single principal granted access.
    pub principal: RoleHandle,
}

impl AccessPointSpec {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, principal: RoleHandle) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            principal,
        }
    }
}

/// The declared authorization stack.
#[derive(Debug)]
pub struct AccessPointStack {
    /// Fully qualified access point ARN per access point name, in
    /// declaration order. Exposed for external verification.
    pub access_point_arns: IndexMap<String, String>,
}

impl AccessPointStack {
    /// Declare one access point per spec against the given bucket.
    pub fn new(app: &mut App, bucket: &BucketHandle, specs: &[AccessPointSpec]) -> Result<Self> {
        let strict = app.context().validation == ValidationMode::Strict;
        if strict {
            validate_specs(specs)?;
        }

        let mut access_point_arns = IndexMap::new();
        for spec in specs {
            if spec.name.is_empty() {
                return Err(Error::MissingArgument {
                    component: "access point stack".to_string(),
                    argument: "name".to_string(),
                });
            }
            if spec.prefix.is_empty() {
                return Err(Error::MissingArgument {
                    component: "access point stack".to_string(),
                    argument: "prefix".to_string(),
                });
            }
            if spec.principal.arn.is_empty() {
                return Err(Error::MissingArgument {
                    component: "access point stack".to_string(),
                    argument: "principal".to_string(),
                });
            }

            let policy = PolicyDocument::single(Statement::allow(
                Principal::Aws(spec.principal.arn.clone()),
                &[actions::GET_OBJECT, actions::PUT_OBJECT],
                arn::access_point_object_pattern(app.env(), &spec.name, &spec.prefix),
            ));

            // Access points must be provisioned after the bucket they front
            // and the role their policy names, when those live in this
            // manifest. External handles carry no edge.
            let mut resource = Resource::new(
                "AWS::S3::AccessPoint",
                json!({
                    "Bucket": bucket.name,
                    "Name": spec.name,
                    "Policy": serde_json::to_value(&policy)?
                }),
            );
            if !bucket.logical_id.is_empty() {
                resource = resource.depends_on(&[bucket.logical_id.as_str()]);
            }
            if !spec.principal.logical_id.is_empty() {
                resource = resource.depends_on(&[spec.principal.logical_id.as_str()]);
            }

            let logical_id = format!("{}AccessPoint", pascal_case(&spec.name));
            app.add_resource(&logical_id, resource)?;

            let ap_arn = arn::access_point_arn(app.env(), &spec.name);
            app.add_output(
                &format!("{}AccessPointArn", pascal_case(&spec.name)),
                ap_arn.clone(),
                format!(
                    "Access point on '{}' scoped to prefix '{}'",
                    bucket.name, spec.prefix
                ),
            )?;

            tracing::debug!(
                name = %spec.name,
                prefix = %spec.prefix,
                principal = %spec.principal.arn,
                "declared access point"
            );
            access_point_arns.insert(spec.name.clone(), ap_arn);
        }

        Ok(Self { access_point_arns })
    }
}

/// Strict-mode checks: identifier syntax and pairwise prefix disjointness.
fn validate_specs(specs: &[AccessPointSpec]) -> Result<()> {
    for (index, spec) in specs.iter().enumerate() {
        arn::validate_access_point_name(&spec.name)?;
        arn::validate_prefix(&spec.prefix)?;
        arn::validate_role_arn(&spec.principal.arn)?;

        for earlier in &specs[..index] {
            if arn::prefixes_overlap(&earlier.prefix, &spec.prefix) {
                return Err(Error::PrefixOverlap {
                    first: earlier.prefix.clone(),
                    second: spec.prefix.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SynthContext;
    use crate::settings::GlobalSettings;

    fn app_with(validation: ValidationMode) -> App {
        let context = SynthContext {
            validation,
            ..SynthContext::default()
        };
        App::new(context, GlobalSettings::new())
    }

    fn bucket() -> BucketHandle {
        BucketHandle::external("sales-events-bkt", "arn:aws:s3:::sales-events-bkt")
    }

    fn role(name: &str) -> RoleHandle {
        RoleHandle::external(name, format!("arn:aws:iam::123456789012:role/{name}"))
    }

    #[test]
    fn test_policy_has_single_scoped_statement() {
        let mut app = app_with(ValidationMode::Lenient);
        let specs = [AccessPointSpec::new("ec2-consumer", "sales_event", role("ec2-role"))];
        AccessPointStack::new(&mut app, &bucket(), &specs).unwrap();

        let manifest = app.synth().unwrap();
        let policy = &manifest.resources["Ec2ConsumerAccessPoint"].properties["Policy"];
        let statements = policy["Statement"].as_array().unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0]["Principal"]["AWS"],
            "arn:aws:iam::123456789012:role/ec2-role"
        );
        assert_eq!(
            statements[0]["Resource"],
            "arn:aws:s3:us-east-1:123456789012:accesspoint/ec2-consumer/object/sales_event/*"
        );
    }

    #[test]
    fn test_lenient_mode_embeds_malformed_arn_verbatim() {
        let mut app = app_with(ValidationMode::Lenient);
        let malformed = RoleHandle::external("bogus", "not-an-arn");
        let specs = [AccessPointSpec::new("ec2-consumer", "sales_event", malformed)];
        let stack = AccessPointStack::new(&mut app, &bucket(), &specs).unwrap();
        assert_eq!(stack.access_point_arns.len(), 1);
    }

    #[test]
    fn test_strict_mode_rejects_malformed_arn() {
        let mut app = app_with(ValidationMode::Strict);
        let malformed = RoleHandle::external("bogus", "not-an-arn");
        let specs = [AccessPointSpec::new("ec2-consumer", "sales_event", malformed)];
        let err = AccessPointStack::new(&mut app, &bucket(), &specs).unwrap_err();
        assert!(matches!(err, Error::InvalidArn { .. }));
    }

    #[test]
    fn test_strict_mode_rejects_overlapping_prefixes() {
        let mut app = app_with(ValidationMode::Strict);
        let specs = [
            AccessPointSpec::new("ap-one", "events", role("one")),
            AccessPointSpec::new("ap-two", "events/sales", role("two")),
        ];
        let err = AccessPointStack::new(&mut app, &bucket(), &specs).unwrap_err();
        assert!(matches!(err, Error::PrefixOverlap { .. }));
    }

    #[test]
    fn test_missing_principal_rejected_in_any_mode() {
        let mut app = app_with(ValidationMode::Lenient);
        let empty = RoleHandle::external("empty", "");
        let specs = [AccessPointSpec::new("ec2-consumer", "sales_event", empty)];
        let err = AccessPointStack::new(&mut app, &bucket(), &specs).unwrap_err();
        assert!(matches!(err, Error::MissingArgument { .. }));
    }
}
