//! Rollup configuration.
//!
//! The only knob the engine needs: which role tags mark an employee as an
//! individual contributor. Contributors are the rows whose coverage metric
//! and sales lines seed the tree; every other role starts at zero and earns
//! its numbers through the rollup.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollupConfig {
    /// Role tags treated as individual contributors at seeding time.
    pub contributor_roles: Vec<String>,
}

impl Default for RollupConfig {
    fn default() -> Self {
        // "BE" is the field-executive tag the source data uses.
        Self {
            contributor_roles: vec!["BE".to_string()],
        }
    }
}

impl RollupConfig {
    /// Load from a JSON file. The runner falls back to `Default` when no
    /// config path is given; tests use `Default` directly.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: RollupConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Whether a row's role tag classifies the employee as an individual
    /// contributor. A missing role never does.
    pub fn is_contributor(&self, role: Option<&str>) -> bool {
        match role {
            Some(tag) => self.contributor_roles.iter().any(|r| r == tag),
            None => false,
        }
    }
}
