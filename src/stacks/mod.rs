//! Infrastructure stacks.
//!
//! Each stack is a one-shot constructor: it declares its resources into the
//! [`App`](crate::app::App) it is handed, then exposes handles (names, ARNs,
//! logical ids) for later stacks to reference. Handles are plain data, so
//! the dependency graph between stacks is visible in the composition code
//! rather than hidden in shared state.
//!
//! Construction order is fixed by the composition: storage, network, compute
//! consumer, event producer, access points. Nothing here mutates an entity
//! after it is declared.

pub mod access_points;
pub mod compute;
pub mod network;
pub mod producer;
pub mod storage;

/// Handle to a declared bucket: weak reference by name and ARN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketHandle {
    /// Logical id of the bucket resource in the manifest.
    pub logical_id: String,
    /// Bucket name.
    pub name: String,
    /// Bucket ARN.
    pub arn: String,
}

impl BucketHandle {
    /// Reference a bucket that lives outside this manifest. No dependency
    /// edge is recorded for it.
    pub fn external(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            logical_id: String::new(),
            name: name.into(),
            arn: arn.into(),
        }
    }
}

/// Handle to a declared IAM role: weak reference by name and ARN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHandle {
    /// Logical id of the role resource in the manifest.
    pub logical_id: String,
    /// Role name.
    pub name: String,
    /// Role ARN, as embedded into policy principals.
    pub arn: String,
}

impl RoleHandle {
    /// Reference a role that lives outside this manifest. No dependency
    /// edge is recorded for it.
    pub fn external(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            logical_id: String::new(),
            name: name.into(),
            arn: arn.into(),
        }
    }
}

/// Handle to the declared network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpcHandle {
    /// Logical id of the VPC resource in the manifest.
    pub logical_id: String,
    /// Logical ids of the subnets, one per availability zone.
    pub subnet_ids: Vec<String>,
}

/// Turn a kebab- or snake-case identifier into a PascalCase output name,
/// e.g. `ec2-consumer` into `Ec2Consumer`.
pub(crate) fn pascal_case(name: &str) -> String {
    name.split(|c| c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("ec2-consumer"), "Ec2Consumer");
        assert_eq!(pascal_case("lambda-consumer"), "LambdaConsumer");
        assert_eq!(pascal_case("sales_event"), "SalesEvent");
        assert_eq!(pascal_case("single"), "Single");
    }
}
