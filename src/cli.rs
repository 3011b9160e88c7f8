//! CLI definitions for the `stackforge` binary.
//!
//! Argument parsing only; command execution lives in `main.rs`. The context
//! surface mirrors the provider tooling convention: an optional context file
//! plus repeatable `key=value` overrides.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stackforge - a declarative AWS stack synthesizer
///
/// Evaluates the infrastructure composition and emits a deterministic
/// deployment manifest for an external provisioning engine.
#[derive(Parser, Debug, Clone)]
#[command(name = "stackforge")]
#[command(author = "Stackforge Contributors")]
#[command(version)]
#[command(about = "Synthesize AWS stack compositions into deployment manifests", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a context file (YAML or JSON)
    #[arg(short = 'c', long = "context-file", global = true, env = "STACKFORGE_CONTEXT")]
    pub context_file: Option<PathBuf>,

    /// Context overrides (key=value, e.g. env.account=111122223333)
    #[arg(short = 'C', long = "context", global = true, value_name = "KEY=VALUE", action = clap::ArgAction::Append)]
    pub context: Vec<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Current verbosity level.
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Synthesize the composition into a deployment manifest
    Synth(SynthArgs),
    /// Synthesize with strict validation and report findings
    Validate(ValidateArgs),
}

/// Arguments for the `synth` subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct SynthArgs {
    /// Write the manifest to a file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `validate` subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {}
