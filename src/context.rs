//! External configuration context.
//!
//! Handles loading and merging the synthesis context from multiple sources:
//! - Built-in defaults
//! - An optional context file (YAML or JSON)
//! - `--context key=value` command-line overrides
//!
//! Every source is optional; synthesis with no context at all uses defaults,
//! applies zero tags, and names resources with the default project prefix.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default account id used when no environment is configured.
pub const DEFAULT_ACCOUNT: &str = "123456789012";

/// Default region used when no environment is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default ARN partition.
pub const DEFAULT_PARTITION: &str = "aws";

/// Deployment environment the manifest's ARNs are rendered against.
///
/// The external reconciler resolves account and region at apply time in the
/// original model; a pure synthesizer renders concrete ARNs instead, so the
/// environment must be known up front. Defaults keep synthesis deterministic
/// when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Twelve-digit account id.
    pub account: String,
    /// Region code, e.g. `us-east-1`.
    pub region: String,
    /// ARN partition, e.g. `aws` or `aws-cn`.
    pub partition: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            account: DEFAULT_ACCOUNT.to_string(),
            region: DEFAULT_REGION.to_string(),
            partition: DEFAULT_PARTITION.to_string(),
        }
    }
}

/// A single tag key/value pair, applied uniformly to taggable resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Convenience constructor.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// How much local validation synthesis performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// No local checks; malformed ARNs and prefixes are embedded verbatim
    /// and rejected (if at all) by the provisioning engine at apply time.
    /// This mirrors the original behavior.
    #[default]
    Lenient,
    /// Reject malformed role ARNs, invalid access point names, malformed
    /// key prefixes, and overlapping prefixes at declaration time.
    Strict,
}

impl ValidationMode {
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lenient" | "off" | "none" => Ok(ValidationMode::Lenient),
            "strict" | "on" => Ok(ValidationMode::Strict),
            _ => Err(Error::ContextOverride {
                entry: format!("validation={s}"),
                message: "valid modes: lenient, strict".to_string(),
            }),
        }
    }
}

/// The externally supplied synthesis context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthContext {
    /// Project name, prefixed onto generated resource identifiers.
    pub project: String,

    /// Deployment environment for ARN rendering.
    pub env: Environment,

    /// Tags applied to every taggable resource, in declaration order.
    /// Empty means no tag annotations anywhere in the manifest.
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Validation mode for the access point authorization stack.
    #[serde(default)]
    pub validation: ValidationMode,
}

impl Default for SynthContext {
    fn default() -> Self {
        Self {
            project: "stackforge".to_string(),
            env: Environment::default(),
            tags: Vec::new(),
            validation: ValidationMode::default(),
        }
    }
}

impl SynthContext {
    /// Load the context from an optional file. `None` yields defaults.
    ///
    /// The format is chosen by extension: `.json` parses as JSON, anything
    /// else as YAML (YAML is a superset, so `.yml`/`.yaml` and extensionless
    /// files all go through the YAML parser).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|e| Error::ContextLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let ctx = if is_json {
            serde_json::from_str(&raw).map_err(|e| Error::ContextLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&raw).map_err(|e| Error::ContextLoad {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        Ok(ctx)
    }

    /// Apply a single `key=value` override on top of the loaded context.
    ///
    /// Supported keys: `project`, `env.account`, `env.region`,
    /// `env.partition`, `validation`, and `tags.<key>` (which appends or
    /// replaces the tag named `<key>`).
    pub fn apply_override(&mut self, entry: &str) -> Result<()> {
        let (key, value) = entry.split_once('=').ok_or_else(|| Error::ContextOverride {
            entry: entry.to_string(),
            message: "expected key=value".to_string(),
        })?;

        match key {
            "project" => self.project = value.to_string(),
            "env.account" => self.env.account = value.to_string(),
            "env.region" => self.env.region = value.to_string(),
            "env.partition" => self.env.partition = value.to_string(),
            "validation" => self.validation = ValidationMode::from_str(value)?,
            _ => {
                if let Some(tag_key) = key.strip_prefix("tags.") {
                    if let Some(existing) =
                        self.tags.iter_mut().find(|t| t.key == tag_key)
                    {
                        existing.value = value.to_string();
                    } else {
                        self.tags.push(Tag::new(tag_key, value));
                    }
                } else {
                    return Err(Error::ContextOverride {
                        entry: entry.to_string(),
                        message: format!("unknown context key '{key}'"),
                    });
                }
            }
        }

        Ok(())
    }

    /// Load a context file (if any) and apply overrides in order.
    pub fn resolve(path: Option<&Path>, overrides: &[String]) -> Result<Self> {
        let mut ctx = Self::load(path)?;
        for entry in overrides {
            ctx.apply_override(entry)?;
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_context() {
        let ctx = SynthContext::default();
        assert_eq!(ctx.project, "stackforge");
        assert_eq!(ctx.env.account, DEFAULT_ACCOUNT);
        assert_eq!(ctx.env.region, DEFAULT_REGION);
        assert_eq!(ctx.env.partition, DEFAULT_PARTITION);
        assert!(ctx.tags.is_empty());
        assert_eq!(ctx.validation, ValidationMode::Lenient);
    }

    #[test]
    fn test_load_none_is_default() {
        let ctx = SynthContext::load(None).unwrap();
        assert_eq!(ctx, SynthContext::default());
    }

    #[test]
    fn test_load_yaml_context() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(
            file,
            "project: retail\nenv:\n  account: \"111122223333\"\n  region: eu-west-1\ntags:\n  - key: team\n    value: data"
        )
        .unwrap();

        let ctx = SynthContext::load(Some(file.path())).unwrap();
        assert_eq!(ctx.project, "retail");
        assert_eq!(ctx.env.account, "111122223333");
        assert_eq!(ctx.env.region, "eu-west-1");
        // Unset fields fall back to defaults
        assert_eq!(ctx.env.partition, DEFAULT_PARTITION);
        assert_eq!(ctx.tags, vec![Tag::new("team", "data")]);
    }

    #[test]
    fn test_load_json_context() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"project": "retail", "validation": "strict"}}"#).unwrap();

        let ctx = SynthContext::load(Some(file.path())).unwrap();
        assert_eq!(ctx.project, "retail");
        assert_eq!(ctx.validation, ValidationMode::Strict);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = SynthContext::load(Some(Path::new("/nonexistent/ctx.yml"))).unwrap_err();
        assert!(matches!(err, Error::ContextLoad { .. }));
    }

    #[test]
    fn test_overrides() {
        let mut ctx = SynthContext::default();
        ctx.apply_override("project=retail").unwrap();
        ctx.apply_override("env.account=111122223333").unwrap();
        ctx.apply_override("tags.team=data").unwrap();
        ctx.apply_override("tags.team=platform").unwrap();
        ctx.apply_override("validation=strict").unwrap();

        assert_eq!(ctx.project, "retail");
        assert_eq!(ctx.env.account, "111122223333");
        assert_eq!(ctx.tags, vec![Tag::new("team", "platform")]);
        assert_eq!(ctx.validation, ValidationMode::Strict);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut ctx = SynthContext::default();
        assert!(ctx.apply_override("no-equals-sign").is_err());
        assert!(ctx.apply_override("bogus.key=1").is_err());
        assert!(ctx.apply_override("validation=sometimes").is_err());
    }
}
