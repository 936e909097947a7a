//! Guard configuration
//!
//! Named argument policies for the guarded operations of a type, loadable
//! from TOML:
//!
//! ```toml
//! [operations.combine]
//! receiver = "survivor"
//! fixed = ["consumed"]
//!
//! [operations.combine_many]
//! receiver = "survivor"
//! tail = "consumed"
//! ```
//!
//! Cloners are functions and cannot be configured here; attach them to the
//! guard built by [`GuardConfig::guard`].

use crate::errors::{GuardError, Result};
use crate::guards::{ArgumentPolicy, TransferGuard};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Operation name → argument policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Policies keyed by operation name
    #[serde(default)]
    pub operations: BTreeMap<String, ArgumentPolicy>,
}

impl GuardConfig {
    /// Configuration with no operations.
    pub fn empty() -> Self {
        Self {
            operations: BTreeMap::new(),
        }
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GuardError::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(
            path = %path.display(),
            operations = config.operations.len(),
            "Loaded guard configuration"
        );
        Ok(config)
    }

    /// Register or replace the policy for `name`.
    pub fn insert(&mut self, name: impl Into<String>, policy: ArgumentPolicy) -> &mut Self {
        self.operations.insert(name.into(), policy);
        self
    }

    /// Merge with another configuration; `other` wins per operation.
    pub fn merge_with(&mut self, other: &Self) {
        for (name, policy) in &other.operations {
            self.operations.insert(name.clone(), policy.clone());
        }
    }

    /// Validate every policy.
    pub fn validate(&self) -> Result<()> {
        for (name, policy) in &self.operations {
            policy.validate().map_err(|err| match err {
                GuardError::InvalidPolicy { message } => {
                    GuardError::invalid_policy(format!("operation '{name}': {message}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    /// Policy registered for `name`.
    pub fn policy(&self, name: &str) -> Result<&ArgumentPolicy> {
        self.operations
            .get(name)
            .ok_or_else(|| GuardError::unknown_operation(name))
    }

    /// Build a guard for `name` from its registered policy.
    pub fn guard<T>(&self, name: &str) -> Result<TransferGuard<T>> {
        TransferGuard::new(name, self.policy(name)?.clone())
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        let mut config = Self::empty();
        config
            .insert("combine", ArgumentPolicy::pair())
            .insert("combine_many", ArgumentPolicy::variadic());
        config
    }
}
