//! Kernel configuration

use std::path::{Path, PathBuf};

use governance_kernel_state::ConstraintPattern;
use serde::{Deserialize, Serialize};

use crate::error::{KernelError, Result};

/// Kernel configuration.
///
/// Loaded by layering defaults, an optional file, and `GOVERNANCE_*`
/// environment variables (nested keys use `__`, e.g.
/// `GOVERNANCE_LOGGING__LEVEL=debug`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Block on any violation. When false, only constitutional invariants block.
    #[serde(default = "default_true")]
    pub strict_mode: bool,

    /// Record every verification in the audit trail
    #[serde(default = "default_true")]
    pub enable_audit: bool,

    /// Append audit entries to this JSON-lines file
    #[serde(default)]
    pub audit_log_file: Option<PathBuf>,

    /// Continue the chain in an existing audit file instead of starting fresh
    #[serde(default)]
    pub resume_audit_log: bool,

    /// Verification latency above this logs a warning
    #[serde(default = "default_latency_budget")]
    pub latency_budget_us: u64,

    /// Hard constraints enforced on every call, in addition to the context's
    #[serde(default)]
    pub hard_constraints: Vec<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            strict_mode: true,
            enable_audit: true,
            audit_log_file: None,
            resume_audit_log: false,
            latency_budget_us: default_latency_budget(),
            hard_constraints: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,

    /// Include timestamps
    #[serde(default = "default_true")]
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            timestamps: true,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_latency_budget() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl KernelConfig {
    /// Load configuration, then validate it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&KernelConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        // Add environment variables with GOVERNANCE_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("GOVERNANCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("hard_constraints"),
        );

        let config: KernelConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject malformed hard constraint names.
    pub fn validate(&self) -> Result<()> {
        validate_constraints(&self.hard_constraints)
    }

    /// Configuration for tests and embedding: no audit trail.
    pub fn unaudited() -> Self {
        Self {
            enable_audit: false,
            ..Default::default()
        }
    }
}

pub(crate) fn validate_constraints(constraints: &[String]) -> Result<()> {
    for name in constraints {
        ConstraintPattern::validate(name).map_err(|reason| KernelError::InvalidConstraint {
            name: name.clone(),
            reason,
        })?;
    }
    Ok(())
}
