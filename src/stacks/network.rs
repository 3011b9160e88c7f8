//! Network stack: an isolated multi-zone VPC for compute workloads.
//!
//! Only the compute consumer stack reads the handle this stack exposes.

use crate::app::App;
use crate::error::{Error, Result};
use crate::manifest::Resource;
use crate::stacks::VpcHandle;
use serde_json::json;

const VPC_LOGICAL_ID: &str = "ConsumerVpc";

/// Construction parameters for the network stack.
#[derive(Debug, Clone)]
pub struct NetworkProps {
    /// Number of availability zones to span (one subnet per zone).
    pub max_azs: u8,
    /// VPC CIDR block.
    pub cidr: String,
}

impl Default for NetworkProps {
    fn default() -> Self {
        Self {
            max_azs: 2,
            cidr: "10.0.0.0/16".to_string(),
        }
    }
}

/// The declared network stack.
#[derive(Debug)]
pub struct NetworkStack {
    /// Handle to the VPC and its subnets.
    pub vpc: VpcHandle,
}

impl NetworkStack {
    /// Declare the VPC and one subnet per availability zone.
    pub fn new(app: &mut App, props: &NetworkProps) -> Result<Self> {
        if props.max_azs == 0 || props.max_azs > 26 {
            return Err(Error::InvalidIdentifier {
                kind: "availability zone count".to_string(),
                value: props.max_azs.to_string(),
                message: "must be between 1 and 26".to_string(),
            });
        }

        app.add_resource(
            VPC_LOGICAL_ID,
            Resource::new(
                "AWS::EC2::VPC",
                json!({
                    "CidrBlock": props.cidr,
                    "EnableDnsSupport": true,
                    "EnableDnsHostnames": true
                }),
            )
            .taggable(),
        )?;

        // Subnet CIDRs are carved per zone index from the first two octets
        // of the VPC block.
        let base = props
            .cidr
            .split('.')
            .take(2)
            .collect::<Vec<_>>()
            .join(".");

        let region = app.env().region.clone();
        let mut subnet_ids = Vec::with_capacity(usize::from(props.max_azs));
        for index in 0..props.max_azs {
            let logical_id = format!("{VPC_LOGICAL_ID}Subnet{}", index + 1);
            let zone = format!("{region}{}", char::from(b'a' + index));

            app.add_resource(
                &logical_id,
                Resource::new(
                    "AWS::EC2::Subnet",
                    json!({
                        "VpcId": { "Ref": VPC_LOGICAL_ID },
                        "AvailabilityZone": zone,
                        "CidrBlock": format!("{base}.{index}.0/24"),
                        "MapPublicIpOnLaunch": false
                    }),
                )
                .depends_on(&[VPC_LOGICAL_ID])
                .taggable(),
            )?;

            subnet_ids.push(logical_id);
        }

        app.add_output(
            "ConsumerVpc",
            props.cidr.clone(),
            format!("Isolated network spanning {} availability zones", props.max_azs),
        )?;

        Ok(Self {
            vpc: VpcHandle {
                logical_id: VPC_LOGICAL_ID.to_string(),
                subnet_ids,
            },
        })
    }
}
