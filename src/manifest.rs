//! Deployment manifest model.
//!
//! The manifest is the sole artifact this crate produces: an ordered,
//! deterministic description of desired cloud state handed to an external
//! provisioning engine. `IndexMap` keeps serialization order equal to
//! declaration order, which gives two load-bearing properties:
//!
//! - re-running synthesis with identical inputs yields a byte-identical
//!   manifest (no hidden randomness, no timestamps)
//! - the dependency graph can be checked positionally: nothing references a
//!   resource declared later

use crate::context::Tag;
use crate::error::{Error, Result};
use crate::settings::GlobalSettings;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifying metadata stamped into every manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Tool that produced the manifest.
    #[serde(rename = "Generator")]
    pub generator: String,
    /// Owning automation identity.
    #[serde(rename = "Owner")]
    pub owner: String,
    /// Where to read more about this automation.
    #[serde(rename = "SourceInfo")]
    pub source_info: String,
    /// Composition version stamp.
    #[serde(rename = "Version")]
    pub version: String,
    /// Project name from the synthesis context.
    #[serde(rename = "Project")]
    pub project: String,
    /// Support contacts.
    #[serde(rename = "SupportEmails")]
    pub support_emails: Vec<String>,
}

impl Metadata {
    /// Build metadata from the settings record and project name.
    pub fn new(settings: &GlobalSettings, project: &str) -> Self {
        Self {
            generator: format!("{} {}", settings.repo_name, settings.version),
            owner: settings.owner.clone(),
            source_info: settings.source_info.clone(),
            version: settings.version.clone(),
            project: project.to_string(),
            support_emails: settings.support_emails.clone(),
        }
    }
}

/// One declared resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Provider resource type, e.g. `AWS::S3::AccessPoint`.
    #[serde(rename = "Type")]
    pub resource_type: String,

    /// Provider-shaped properties.
    #[serde(rename = "Properties")]
    pub properties: Value,

    /// Logical ids this resource must be provisioned after.
    #[serde(rename = "DependsOn", default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Whether the uniform tag set may be injected into `Properties.Tags`.
    #[serde(skip)]
    pub taggable: bool,
}

impl Resource {
    /// A resource with no intra-manifest dependencies.
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
            taggable: false,
        }
    }

    /// Add intra-manifest dependencies.
    #[must_use]
    pub fn depends_on(mut self, ids: &[&str]) -> Self {
        self.depends_on
            .extend(ids.iter().map(|id| (*id).to_string()));
        self
    }

    /// Mark the resource as accepting the uniform tag set.
    #[must_use]
    pub fn taggable(mut self) -> Self {
        self.taggable = true;
        self
    }
}

/// One manifest output: a descriptive string for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Output value.
    #[serde(rename = "Value")]
    pub value: String,
    /// Human-readable description.
    #[serde(rename = "Description")]
    pub description: String,
}

/// The full deployment manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Identifying metadata.
    #[serde(rename = "Metadata")]
    pub metadata: Metadata,

    /// Resources in declaration order.
    #[serde(rename = "Resources")]
    pub resources: IndexMap<String, Resource>,

    /// Outputs in declaration order.
    #[serde(rename = "Outputs")]
    pub outputs: IndexMap<String, Output>,
}

impl Manifest {
    /// An empty manifest carrying only metadata.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            resources: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }

    /// Add a resource under a unique logical id, injecting the uniform tag
    /// set into taggable resources. An empty tag set injects nothing.
    pub fn add_resource(&mut self, logical_id: &str, mut resource: Resource, tags: &[Tag]) -> Result<()> {
        if self.resources.contains_key(logical_id) {
            return Err(Error::DuplicateLogicalId(logical_id.to_string()));
        }

        if resource.taggable && !tags.is_empty() {
            let rendered: Vec<Value> = tags
                .iter()
                .map(|t| serde_json::json!({ "Key": t.key, "Value": t.value }))
                .collect();
            resource.properties["Tags"] = Value::Array(rendered);
        }

        self.resources.insert(logical_id.to_string(), resource);
        Ok(())
    }

    /// Add an output under a unique name.
    pub fn add_output(
        &mut self,
        name: &str,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        if self.outputs.contains_key(name) {
            return Err(Error::DuplicateOutput(name.to_string()));
        }
        self.outputs.insert(
            name.to_string(),
            Output {
                value: value.into(),
                description: description.into(),
            },
        );
        Ok(())
    }

    /// Serialize to pretty-printed JSON with a trailing newline. This is the
    /// single serialization point; identical manifests produce identical
    /// bytes.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Check that no resource references a logical id declared after it.
    ///
    /// Covers both explicit `DependsOn` entries and structural `{"Ref": id}`
    /// values embedded in properties. Cross-entity handles (bucket names,
    /// role ARNs) are resolved to literal strings at declaration time and
    /// are not part of this graph.
    pub fn verify_ordering(&self) -> Result<()> {
        for (index, (logical_id, resource)) in self.resources.iter().enumerate() {
            let mut referenced: Vec<String> = resource.depends_on.clone();
            collect_refs(&resource.properties, &mut referenced);

            for target in referenced {
                match self.resources.get_index_of(&target) {
                    Some(target_index) if target_index < index => {}
                    _ => {
                        return Err(Error::OrderingViolation {
                            resource: logical_id.clone(),
                            referenced: target,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Collect every `{"Ref": "<id>"}` object in a property tree.
fn collect_refs(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(Value::String(id)) = map.get("Ref") {
                    out.push(id.clone());
                    return;
                }
            }
            for child in map.values() {
                collect_refs(child, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_refs(child, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> Metadata {
        Metadata::new(&GlobalSettings::new(), "test")
    }

    #[test]
    fn test_duplicate_logical_id_rejected() {
        let mut manifest = Manifest::new(metadata());
        let res = Resource::new("AWS::S3::Bucket", json!({"BucketName": "b"}));
        manifest.add_resource("Bucket", res.clone(), &[]).unwrap();
        let err = manifest.add_resource("Bucket", res, &[]).unwrap_err();
        assert!(matches!(err, Error::DuplicateLogicalId(_)));
    }

    #[test]
    fn test_tags_injected_only_when_taggable_and_present() {
        let tags = vec![Tag::new("team", "data")];
        let mut manifest = Manifest::new(metadata());

        manifest
            .add_resource(
                "Tagged",
                Resource::new("AWS::S3::Bucket", json!({"BucketName": "a"})).taggable(),
                &tags,
            )
            .unwrap();
        manifest
            .add_resource(
                "Untagged",
                Resource::new("AWS::S3::AccessPoint", json!({"Name": "ap"})),
                &tags,
            )
            .unwrap();
        manifest
            .add_resource(
                "NoTags",
                Resource::new("AWS::S3::Bucket", json!({"BucketName": "b"})).taggable(),
                &[],
            )
            .unwrap();

        assert_eq!(
            manifest.resources["Tagged"].properties["Tags"],
            json!([{"Key": "team", "Value": "data"}])
        );
        assert!(manifest.resources["Untagged"].properties.get("Tags").is_none());
        assert!(manifest.resources["NoTags"].properties.get("Tags").is_none());
    }

    #[test]
    fn test_ordering_violation_detected() {
        let mut manifest = Manifest::new(metadata());
        manifest
            .add_resource(
                "Instance",
                Resource::new("AWS::EC2::Instance", json!({"SubnetId": {"Ref": "Subnet"}})),
                &[],
            )
            .unwrap();
        manifest
            .add_resource("Subnet", Resource::new("AWS::EC2::Subnet", json!({})), &[])
            .unwrap();

        let err = manifest.verify_ordering().unwrap_err();
        assert!(matches!(err, Error::OrderingViolation { .. }));
    }

    #[test]
    fn test_ordering_holds_for_declared_before_use() {
        let mut manifest = Manifest::new(metadata());
        manifest
            .add_resource("Vpc", Resource::new("AWS::EC2::VPC", json!({})), &[])
            .unwrap();
        manifest
            .add_resource(
                "Subnet",
                Resource::new("AWS::EC2::Subnet", json!({"VpcId": {"Ref": "Vpc"}}))
                    .depends_on(&["Vpc"]),
                &[],
            )
            .unwrap();

        manifest.verify_ordering().unwrap();
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let build = || {
            let mut manifest = Manifest::new(metadata());
            manifest
                .add_resource("Vpc", Resource::new("AWS::EC2::VPC", json!({})), &[])
                .unwrap();
            manifest.add_output("VpcId", "vpc", "the vpc").unwrap();
            manifest.to_json_pretty().unwrap()
        };
        assert_eq!(build(), build());
    }
}
