//! Storage stack: the single event bucket.
//!
//! One bucket holds both logical event streams, partitioned by key prefix
//! by convention only; nothing at the storage layer enforces the split. The
//! scoping happens later, in the access point policies.

use crate::app::App;
use crate::arn;
use crate::error::{Error, Result};
use crate::manifest::Resource;
use crate::stacks::BucketHandle;
use serde_json::json;

/// Key prefix of the sales event stream, read by the EC2 consumer.
pub const SALES_EVENT_PREFIX: &str = "sales_event";

/// Key prefix of the inventory event stream, written by the Lambda producer.
pub const INVENTORY_EVENT_PREFIX: &str = "inventory_event";

const BUCKET_LOGICAL_ID: &str = "SalesEventsBucket";

/// Construction parameters for the storage stack.
#[derive(Debug, Clone, Default)]
pub struct StorageProps {
    /// Explicit bucket name. `None` derives `{project}-sales-events-bkt`.
    pub bucket_name: Option<String>,
}

/// The declared storage stack.
#[derive(Debug)]
pub struct StorageStack {
    /// Handle to the event bucket, passed to the producer and access point
    /// stacks.
    pub bucket: BucketHandle,
}

impl StorageStack {
    /// Declare the event bucket.
    ///
    /// No pre-flight uniqueness check is performed; a name collision
    /// surfaces only at apply time, from the provisioning engine.
    pub fn new(app: &mut App, props: &StorageProps) -> Result<Self> {
        let name = match &props.bucket_name {
            Some(name) if name.is_empty() => {
                return Err(Error::MissingArgument {
                    component: "storage stack".to_string(),
                    argument: "bucket_name".to_string(),
                })
            }
            Some(name) => name.clone(),
            None => format!("{}-sales-events-bkt", app.context().project),
        };

        app.add_resource(
            BUCKET_LOGICAL_ID,
            Resource::new(
                "AWS::S3::Bucket",
                json!({
                    "BucketName": name,
                    "PublicAccessBlockConfiguration": {
                        "BlockPublicAcls": true,
                        "BlockPublicPolicy": true,
                        "IgnorePublicAcls": true,
                        "RestrictPublicBuckets": true
                    }
                }),
            )
            .taggable(),
        )?;

        app.add_output(
            "SalesEventsBucketName",
            name.clone(),
            format!(
                "Event bucket holding the '{SALES_EVENT_PREFIX}' and '{INVENTORY_EVENT_PREFIX}' streams"
            ),
        )?;

        let arn = arn::bucket_arn(app.env(), &name);
        Ok(Self {
            bucket: BucketHandle {
                logical_id: BUCKET_LOGICAL_ID.to_string(),
                name,
                arn,
            },
        })
    }
}
