//! # Stackforge - A Declarative AWS Stack Synthesizer
//!
//! Stackforge evaluates a declarative composition of AWS infrastructure
//! stacks in a single synchronous pass and serializes the result into a
//! deterministic deployment manifest. The manifest is handed to an external
//! provisioning engine, which performs all real orchestration (dependency
//! ordering against live APIs, retries, rollback) outside this crate.
//!
//! ## Core Concepts
//!
//! - **Stacks**: one-shot declarative components (storage, network, compute
//!   consumer, event producer, access points) that register resources and
//!   expose handles
//! - **Handles**: plain-data references (bucket name, role ARN) threaded
//!   between stacks at declaration time, making the dependency graph explicit
//! - **Access Points**: named, prefix-scoped views onto the single event
//!   bucket, each carrying a least-privilege policy for exactly one principal
//! - **Manifest**: the ordered, deterministic description of desired state;
//!   the only artifact this crate produces
//! - **Context**: externally supplied configuration (project name, tags,
//!   environment, validation mode), every part of it optional
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CLI Interface                          │
//! │                (clap-based command parsing)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Entry Composition                        │
//! │   Storage → Network → Consumer → Producer → Access Points    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ handles (names, ARNs)
//!                              ▼
//! ┌──────────────────┐  ┌──────────────────┐  ┌─────────────────┐
//! │  Policy Builder  │  │   ARN Builder    │  │    Tag Set      │
//! └──────────────────┘  └──────────────────┘  └─────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Deployment Manifest (JSON)                  │
//! │        consumed by the external provisioning engine          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust
//! use stackforge::prelude::*;
//!
//! # fn main() -> stackforge::error::Result<()> {
//! let context = SynthContext::default();
//! let manifest = synthesize(context, GlobalSettings::new())?;
//! println!("{}", manifest.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::app::{synthesize, App};
    pub use crate::context::{Environment, SynthContext, Tag, ValidationMode};
    pub use crate::error::{Error, Result};
    pub use crate::manifest::{Manifest, Output, Resource};
    pub use crate::policy::{Effect, PolicyDocument, Principal, Statement};
    pub use crate::settings::GlobalSettings;
    pub use crate::stacks::access_points::{AccessPointSpec, AccessPointStack};
    pub use crate::stacks::compute::{ComputeConsumerStack, ComputeProps, InstanceSize};
    pub use crate::stacks::network::{NetworkProps, NetworkStack};
    pub use crate::stacks::producer::{EventProducerStack, ProducerProps};
    pub use crate::stacks::storage::{StorageProps, StorageStack};
    pub use crate::stacks::{BucketHandle, RoleHandle, VpcHandle};
}

/// Error types and result alias for declaration-time failures.
pub mod error;

/// Immutable global settings record (owner, repo, version, support).
pub mod settings;

/// External configuration context: project name, tags, environment,
/// validation mode.
pub mod context;

/// ARN construction and strict-mode validation.
pub mod arn;

/// Policy document model in the provider's JSON wire shape.
pub mod policy;

/// Deployment manifest model with deterministic ordering.
pub mod manifest;

/// Infrastructure stacks: storage, network, compute consumer, event
/// producer, access point authorization.
pub mod stacks;

/// Entry composition and the fixed construction order.
pub mod app;

/// Command-line interface definitions.
pub mod cli;
