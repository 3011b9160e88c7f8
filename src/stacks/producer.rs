//! Event producer stack: a Lambda function and its identity role.
//!
//! The function writes inventory events through its access point, which it
//! knows only by name at declaration time; the ARN is resolved by the
//! function's code at runtime. Keeping storage access behind the access
//! point is a runtime contract with that code, not something this stack can
//! verify.

use crate::app::App;
use crate::arn;
use crate::error::{Error, Result};
use crate::manifest::Resource;
use crate::policy::{PolicyDocument, Statement};
use crate::stacks::{BucketHandle, RoleHandle};
use crate::stacks::storage::INVENTORY_EVENT_PREFIX;
use serde_json::json;

const ROLE_LOGICAL_ID: &str = "InventoryEventProducerRole";
const FUNCTION_LOGICAL_ID: &str = "InventoryEventProducerFunction";
const LOG_GROUP_LOGICAL_ID: &str = "InventoryEventProducerLogGroup";

// Placeholder handler shipped inline; addresses objects through the access
// point, never the bucket ARN.
const INLINE_HANDLER: &str = r#"import boto3, datetime, json, os

def handler(event, context):
    ap = os.environ["ACCESS_POINT_NAME"]
    key = f"{os.environ['EVENT_PREFIX']}/{datetime.datetime.utcnow().isoformat()}.json"
    boto3.client("s3").put_object(Bucket=ap, Key=key, Body=json.dumps(event))
    return {"statusCode": 200, "body": key}
"#;

/// Construction parameters for the event producer stack.
#[derive(Debug, Clone)]
pub struct ProducerProps {
    /// Name of the access point the function will write through. A naming
    /// convention at this stage; the authorization stack declares it later.
    pub access_point_name: String,
    /// Function memory, in MB.
    pub memory_mb: u32,
    /// Function timeout, in seconds.
    pub timeout_secs: u32,
    /// Log retention, in days.
    pub log_retention_days: u16,
}

impl Default for ProducerProps {
    fn default() -> Self {
        Self {
            access_point_name: crate::app::LAMBDA_ACCESS_POINT_NAME.to_string(),
            memory_mb: 128,
            timeout_secs: 3,
            log_retention_days: 14,
        }
    }
}

/// The declared event producer stack.
#[derive(Debug)]
pub struct EventProducerStack {
    /// Handle to the producer role, the principal of the Lambda access point.
    pub role: RoleHandle,
}

impl EventProducerStack {
    /// Declare the producer role, function, and log group.
    pub fn new(app: &mut App, bucket: &BucketHandle, props: &ProducerProps) -> Result<Self> {
        if props.access_point_name.is_empty() {
            return Err(Error::MissingArgument {
                component: "event producer stack".to_string(),
                argument: "access_point_name".to_string(),
            });
        }

        let role_name = format!("{}-inventory-producer-role", app.context().project);
        let partition = app.env().partition.clone();
        let trust = PolicyDocument::single(Statement::allow_assume("lambda.amazonaws.com"));

        app.add_resource(
            ROLE_LOGICAL_ID,
            Resource::new(
                "AWS::IAM::Role",
                json!({
                    "RoleName": role_name,
                    "AssumeRolePolicyDocument": serde_json::to_value(&trust)?,
                    "ManagedPolicyArns": [
                        format!("arn:{partition}:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole")
                    ]
                }),
            )
            .taggable(),
        )?;

        let role_arn = arn::role_arn(app.env(), &role_name);
        let function_name = format!("{}-inventory-event-producer", app.context().project);

        let mut function = Resource::new(
            "AWS::Lambda::Function",
            json!({
                "FunctionName": function_name,
                "Handler": "index.handler",
                "Runtime": "python3.12",
                "MemorySize": props.memory_mb,
                "Timeout": props.timeout_secs,
                "Role": role_arn,
                "Environment": {
                    "Variables": {
                        "BUCKET_NAME": bucket.name,
                        "ACCESS_POINT_NAME": props.access_point_name,
                        "EVENT_PREFIX": INVENTORY_EVENT_PREFIX,
                        "LOG_LEVEL": "INFO"
                    }
                },
                "Code": { "ZipFile": INLINE_HANDLER }
            }),
        )
        .depends_on(&[ROLE_LOGICAL_ID])
        .taggable();
        if !bucket.logical_id.is_empty() {
            function = function.depends_on(&[bucket.logical_id.as_str()]);
        }
        app.add_resource(FUNCTION_LOGICAL_ID, function)?;

        app.add_resource(
            LOG_GROUP_LOGICAL_ID,
            Resource::new(
                "AWS::Logs::LogGroup",
                json!({
                    "LogGroupName": format!("/aws/lambda/{function_name}"),
                    "RetentionInDays": props.log_retention_days
                }),
            )
            .depends_on(&[FUNCTION_LOGICAL_ID]),
        )?;

        app.add_output(
            "InventoryEventProducerRoleArn",
            role_arn.clone(),
            "Identity of the Lambda producer; principal of its access point policy",
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
