//! Error types for Stackforge.
//!
//! This module defines the error types used throughout Stackforge. All errors
//! are declaration-time errors: synthesis either completes fully or halts on
//! the first invalid argument, leaving no partially-built manifest behind.
//! Apply-time failures (naming collisions, quota limits, policy rejection)
//! belong to the external provisioning engine and never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Stackforge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Stackforge.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Declaration Errors
    // ========================================================================
    /// A required construction argument was missing or empty.
    #[error("Missing required argument '{argument}' for {component}")]
    MissingArgument {
        /// Component being constructed
        component: String,
        /// Name of the missing argument
        argument: String,
    },

    /// An identifier failed validation (strict mode only).
    #[error("Invalid {kind} '{value}': {message}")]
    InvalidIdentifier {
        /// Kind of identifier (access point name, key prefix, ...)
        kind: String,
        /// The offending value
        value: String,
        /// What was wrong with it
        message: String,
    },

    /// An ARN failed syntax validation (strict mode only).
    #[error("Invalid ARN '{value}': {message}")]
    InvalidArn {
        /// The offending ARN string
        value: String,
        /// What was wrong with it
        message: String,
    },

    /// Two access points declared overlapping key prefixes (strict mode only).
    #[error("Key prefix '{second}' overlaps prefix '{first}' declared by an earlier access point")]
    PrefixOverlap {
        /// Prefix declared first
        first: String,
        /// Prefix that overlaps it
        second: String,
    },

    /// Two resources were declared under the same logical id.
    #[error("Duplicate logical id '{0}' in manifest")]
    DuplicateLogicalId(String),

    /// Two outputs were declared under the same name.
    #[error("Duplicate output '{0}' in manifest")]
    DuplicateOutput(String),

    /// A resource referenced a logical id declared later (or never).
    #[error("Resource '{resource}' references '{referenced}' before its declaration")]
    OrderingViolation {
        /// Resource holding the reference
        resource: String,
        /// The forward or dangling reference
        referenced: String,
    },

    // ========================================================================
    // Context Errors
    // ========================================================================
    /// Error loading the external configuration context.
    #[error("Failed to load context from '{path}': {message}")]
    ContextLoad {
        /// Path to the context file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A `--context key=value` override could not be applied.
    #[error("Invalid context override '{entry}': {message}")]
    ContextOverride {
        /// The raw override string
        entry: String,
        /// Why it was rejected
        message: String,
    },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// Error serializing the manifest or a policy document.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O error reading context files or writing the manifest.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
