//! Global settings record.
//!
//! Identifying constants (owner, repository, version, support contacts) that
//! annotate every synthesized manifest. Constructed once at process start and
//! passed explicitly to the composition; never ambient static state.

use serde::{Deserialize, Serialize};

/// Process-wide identifying constants, embedded into manifest metadata and
/// the `AutomationFrom` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Owning team or automation identity.
    pub owner: String,
    /// Repository name this composition is maintained in.
    pub repo_name: String,
    /// Where to read more about this automation.
    pub source_info: String,
    /// Version stamp of the composition.
    pub version: String,
    /// Support contacts for operators.
    pub support_emails: Vec<String>,
}

impl GlobalSettings {
    /// Build the standard settings record for this crate.
    pub fn new() -> Self {
        let repo_name = "stackforge".to_string();
        Self {
            owner: "StackforgeAutomation".to_string(),
            source_info: format!("https://github.com/stackforge/{repo_name}"),
            repo_name,
            version: env!("CARGO_PKG_VERSION").to_string(),
            support_emails: vec!["support@stackforge.dev".to_string()],
        }
    }
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self::new()
    }
}
