//! Entry composition.
//!
//! [`App`] owns the manifest under construction together with the synthesis
//! context and global settings. Stacks declare resources into it and hand
//! back plain handles; [`synthesize`] wires the whole composition in the one
//! valid order:
//!
//! ```text
//! Storage ──► Network ──► Compute Consumer ──► Event Producer ──► Access Points
//!    │                          │                     │                ▲
//!    │ bucket handle            │ role handle         │ role handle    │
//!    └──────────────────────────┴─────────────────────┴────────────────┘
//! ```
//!
//! Synthesis is a pure single pass: identical context and settings yield a
//! byte-identical manifest. Diffing against previously applied state is the
//! external reconciler's job, never ours.

use crate::context::{Environment, SynthContext};
use crate::error::Result;
use crate::manifest::{Manifest, Metadata, Resource};
use crate::settings::GlobalSettings;
use crate::stacks::access_points::{AccessPointSpec, AccessPointStack};
use crate::stacks::compute::{ComputeConsumerStack, ComputeProps};
use crate::stacks::network::{NetworkProps, NetworkStack};
use crate::stacks::producer::{EventProducerStack, ProducerProps};
use crate::stacks::storage::{StorageProps, StorageStack, INVENTORY_EVENT_PREFIX, SALES_EVENT_PREFIX};

/// Access point name granted to the EC2 consumer.
pub const EC2_ACCESS_POINT_NAME: &str = "ec2-consumer";

/// Access point name granted to the Lambda event producer.
pub const LAMBDA_ACCESS_POINT_NAME: &str = "lambda-consumer";

/// The composition under construction.
#[derive(Debug)]
pub struct App {
    context: SynthContext,
    settings: GlobalSettings,
    manifest: Manifest,
}

impl App {
    /// Start an empty composition.
    pub fn new(context: SynthContext, settings: GlobalSettings) -> Self {
        let metadata = Metadata::new(&settings, &context.project);
        let mut manifest = Manifest::new(metadata);

        // First output of every manifest, matching the per-stack convention
        // of the original automation.
        manifest
            .add_output(
                "AutomationFrom",
                settings.source_info.clone(),
                "To know more about this automation, check out our repository page.",
            )
            .ok();

        Self {
            context,
            settings,
            manifest,
        }
    }

    /// The synthesis context.
    pub fn context(&self) -> &SynthContext {
        &self.context
    }

    /// The deployment environment ARNs are rendered against.
    pub fn env(&self) -> &Environment {
        &self.context.env
    }

    /// The global settings record.
    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    /// Declare a resource, injecting the uniform tag set where applicable.
    pub fn add_resource(&mut self, logical_id: &str, resource: Resource) -> Result<()> {
        tracing::debug!(logical_id, kind = %resource.resource_type, "declaring resource");
        let tags = self.context.tags.clone();
        self.manifest.add_resource(logical_id, resource, &tags)
    }

    /// Declare a manifest output.
    pub fn add_output(
        &mut self,
        name: &str,
        value: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        self.manifest.add_output(name, value, description)
    }

    /// Finish the composition: check declaration ordering and hand over the
    /// manifest.
    pub fn synth(self) -> Result<Manifest> {
        self.manifest.verify_ordering()?;
        tracing::info!(
            resources = self.manifest.resources.len(),
            outputs = self.manifest.outputs.len(),
            "synthesis complete"
        );
        Ok(self.manifest)
    }
}

/// Build the full composition and return its manifest.
///
/// The construction order is the only control flow in this crate and is
/// fixed: the bucket must exist before any access point fronts it, and the
/// consumer roles must exist before any policy names them as principal.
pub fn synthesize(context: SynthContext, settings: GlobalSettings) -> Result<Manifest> {
    let mut app = App::new(context, settings);

    let storage = StorageStack::new(&mut app, &StorageProps::default())?;
    let network = NetworkStack::new(&mut app, &NetworkProps::default())?;
    let consumer = ComputeConsumerStack::new(&mut app, &network.vpc, &ComputeProps::default())?;
    let producer = EventProducerStack::new(&mut app, &storage.bucket, &ProducerProps::default())?;

    let specs = [
        AccessPointSpec::new(EC2_ACCESS_POINT_NAME, SALES_EVENT_PREFIX, consumer.role.clone()),
        AccessPointSpec::new(
            LAMBDA_ACCESS_POINT_NAME,
            INVENTORY_EVENT_PREFIX,
            producer.role.clone(),
        ),
    ];
    AccessPointStack::new(&mut app, &storage.bucket, &specs)?;

    app.synth()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_composition_synthesizes() {
        let manifest = synthesize(SynthContext::default(), GlobalSettings::new()).unwrap();
        assert!(!manifest.resources.is_empty());
        assert!(manifest.outputs.contains_key("AutomationFrom"));
        manifest.verify_ordering().unwrap();
    }

    #[test]
    fn test_stack_construction_order() {
        let manifest = synthesize(SynthContext::default(), GlobalSettings::new()).unwrap();
        let ids: Vec<&str> = manifest.resources.keys().map(String::as_str).collect();

        let position = |id: &str| ids.iter().position(|x| *x == id).unwrap();
        assert!(position("SalesEventsBucket") < position("ConsumerVpc"));
        assert!(position("ConsumerVpc") < position("Ec2ConsumerInstance"));
        assert!(position("Ec2ConsumerRole") < position("Ec2ConsumerAccessPoint"));
        assert!(position("InventoryEventProducerRole") < position("LambdaConsumerAccessPoint"));
    }
}
