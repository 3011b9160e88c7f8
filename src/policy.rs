//! Policy document model.
//!
//! Resource-based authorization documents in the provider's JSON wire shape
//! (PascalCase keys, `2012-10-17` version). The model is deliberately
//! narrower than the full policy grammar: one principal per statement, one
//! resource pattern per statement, no conditions. Single-purpose statements
//! keep the synthesized policies auditable.

use serde::{Deserialize, Serialize};

/// The policy language version every document carries.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Actions used by the access point authorization model.
pub mod actions {
    /// Read an object.
    pub const GET_OBJECT: &str = "s3:GetObject";
    /// Write an object.
    pub const PUT_OBJECT: &str = "s3:PutObject";
    /// Assume a role (trust policies).
    pub const ASSUME_ROLE: &str = "sts:AssumeRole";
}

/// Statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Grant the listed actions.
    Allow,
    /// Deny the listed actions.
    Deny,
}

/// The single principal a statement grants to.
///
/// Serializes to the provider's externally-tagged shape, e.g.
/// `{"AWS": "arn:aws:iam::111122223333:role/ec2-role"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    /// An account identity (role or user) by ARN.
    #[serde(rename = "AWS")]
    Aws(String),
    /// A service principal, e.g. `ec2.amazonaws.com`.
    #[serde(rename = "Service")]
    Service(String),
}

/// One policy statement: (effect, principal, actions, resource).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Optional statement id.
    #[serde(rename = "Sid", skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// Allow or Deny.
    #[serde(rename = "Effect")]
    pub effect: Effect,

    /// Exactly one principal. Never a list.
    #[serde(rename = "Principal")]
    pub principal: Principal,

    /// Granted actions.
    #[serde(rename = "Action")]
    pub actions: Vec<String>,

    /// Resource pattern the actions apply to. Trust policies carry none.
    #[serde(rename = "Resource", skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl Statement {
    /// An Allow statement granting `actions` on `resource` to one principal.
    pub fn allow(principal: Principal, actions: &[&str], resource: impl Into<String>) -> Self {
        Self {
            sid: None,
            effect: Effect::Allow,
            principal,
            actions: actions.iter().map(|a| (*a).to_string()).collect(),
            resource: Some(resource.into()),
        }
    }

    /// An Allow statement with no resource, as used in role trust policies.
    pub fn allow_assume(service: impl Into<String>) -> Self {
        Self {
            sid: None,
            effect: Effect::Allow,
            principal: Principal::Service(service.into()),
            actions: vec![actions::ASSUME_ROLE.to_string()],
            resource: None,
        }
    }
}

/// A versioned list of statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Policy language version.
    #[serde(rename = "Version")]
    pub version: String,

    /// Statements, in declaration order.
    #[serde(rename = "Statement")]
    pub statements: Vec<Statement>,
}

impl PolicyDocument {
    /// A document holding exactly one statement.
    pub fn single(statement: Statement) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statements: vec![statement],
        }
    }
}
