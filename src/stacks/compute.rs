//! Compute consumer stack: an EC2 instance and its identity role.
//!
//! The instance never references the bucket. Its storage access is mediated
//! entirely through the access point declared later, so the consumer holds
//! no permission at all until the authorization stack grants one.

use crate::app::App;
use crate::arn;
use crate::error::{Error, Result};
use crate::manifest::Resource;
use crate::policy::{PolicyDocument, Statement};
use crate::stacks::{RoleHandle, VpcHandle};
use serde_json::json;

const ROLE_LOGICAL_ID: &str = "Ec2ConsumerRole";
const PROFILE_LOGICAL_ID: &str = "Ec2ConsumerInstanceProfile";
const INSTANCE_LOGICAL_ID: &str = "Ec2ConsumerInstance";

/// Instance sizing parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstanceSize {
    /// `t3.micro`
    #[default]
    Micro,
    /// `t3.small`
    Small,
    /// `t3.medium`
    Medium,
    /// `t3.large`
    Large,
}

impl InstanceSize {
    /// Parse a size keyword.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "micro" => Ok(InstanceSize::Micro),
            "small" => Ok(InstanceSize::Small),
            "medium" => Ok(InstanceSize::Medium),
            "large" => Ok(InstanceSize::Large),
            _ => Err(Error::InvalidIdentifier {
                kind: "instance size".to_string(),
                value: s.to_string(),
                message: "valid sizes: micro, small, medium, large".to_string(),
            }),
        }
    }

    /// The provider instance type this size maps to.
    pub fn instance_type(self) -> &'static str {
        match self {
            InstanceSize::Micro => "t3.micro",
            InstanceSize::Small => "t3.small",
            InstanceSize::Medium => "t3.medium",
            InstanceSize::Large => "t3.large",
        }
    }
}

/// Construction parameters for the compute consumer stack.
#[derive(Debug, Clone, Default)]
pub struct ComputeProps {
    /// Instance sizing.
    pub size: InstanceSize,
}

/// The declared compute consumer stack.
#[derive(Debug)]
pub struct ComputeConsumerStack {
    /// Handle to the consumer role, the principal of the EC2 access point.
    pub role: RoleHandle,
}

impl ComputeConsumerStack {
    /// Declare the consumer role, instance profile, and instance.
    pub fn new(app: &mut App, vpc: &VpcHandle, props: &ComputeProps) -> Result<Self> {
        let Some(subnet_id) = vpc.subnet_ids.first() else {
            return Err(Error::MissingArgument {
                component: "compute consumer stack".to_string(),
                argument: "subnet".to_string(),
            });
        };
        let subnet_id = subnet_id.clone();

        let role_name = format!("{}-ec2-consumer-role", app.context().project);
        let partition = app.env().partition.clone();
        let trust = PolicyDocument::single(Statement::allow_assume("ec2.amazonaws.com"));

        app.add_resource(
            ROLE_LOGICAL_ID,
            Resource::new(
                "AWS::IAM::Role",
                json!({
                    "RoleName": role_name,
                    "AssumeRolePolicyDocument": serde_json::to_value(&trust)?,
                    "ManagedPolicyArns": [
                        format!("arn:{partition}:iam::aws:policy/AmazonSSMManagedInstanceCore")
                    ]
                }),
            )
            .taggable(),
        )?;

        let profile_name = format!("{role_name}-profile");
        app.add_resource(
            PROFILE_LOGICAL_ID,
            Resource::new(
                "AWS::IAM::InstanceProfile",
                json!({
                    "InstanceProfileName": profile_name,
                    "Roles": [role_name]
                }),
            )
            .depends_on(&[ROLE_LOGICAL_ID]),
        )?;

        app.add_resource(
            INSTANCE_LOGICAL_ID,
            Resource::new(
                "AWS::EC2::Instance",
                json!({
                    "InstanceType": props.size.instance_type(),
                    "IamInstanceProfile": profile_name,
                    "SubnetId": { "Ref": subnet_id }
                }),
            )
            .depends_on(&[PROFILE_LOGICAL_ID])
            .taggable(),
        )?;

        let role_arn = arn::role_arn(app.env(), &role_name);
        app.add_output(
            "Ec2ConsumerRoleArn",
            role_arn.clone(),
            "Identity of the EC2 consumer; principal of its access point policy",
        )?;

        Ok(Self {
            role: RoleHandle {
                logical_id: ROLE_LOGICAL_ID.to_string(),
                name: role_name,
                arn: role_arn,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SynthContext;
    use crate::settings::GlobalSettings;
    use crate::stacks::network::{NetworkProps, NetworkStack};

    fn app() -> App {
        App::new(SynthContext::default(), GlobalSettings::new())
    }

    #[test]
    fn test_instance_size_parsing() {
        assert_eq!(InstanceSize::from_str("micro").unwrap(), InstanceSize::Micro);
        assert_eq!(InstanceSize::from_str("LARGE").unwrap(), InstanceSize::Large);
        assert!(InstanceSize::from_str("xlarge").is_err());
        assert_eq!(InstanceSize::Medium.instance_type(), "t3.medium");
    }

    #[test]
    fn test_consumer_exposes_role_only() {
        let mut app = app();
        let network = NetworkStack::new(&mut app, &NetworkProps::default()).unwrap();
        let stack = ComputeConsumerStack::new(&mut app, &network.vpc, &ComputeProps::default()).unwrap();

        assert_eq!(
            stack.role.arn,
            "arn:aws:iam::123456789012:role/stackforge-ec2-consumer-role"
        );

        // The instance properties never mention a bucket; access is granted
        // later, through the access point.
        let manifest = app.synth().unwrap();
        let instance = serde_json::to_string(&manifest.resources["Ec2ConsumerInstance"]).unwrap();
        assert!(!instance.contains("bkt"));
    }

    #[test]
    fn test_consumer_requires_a_subnet() {
        let mut app = app();
        let vpc = VpcHandle {
            logical_id: "ConsumerVpc".to_string(),
            subnet_ids: vec![],
        };
        let err = ComputeConsumerStack::new(&mut app, &vpc, &ComputeProps::default()).unwrap_err();
        assert!(matches!(err, Error::MissingArgument { .. }));
    }
}
