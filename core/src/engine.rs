//! Engine — one call from backing rows to a finished, aggregated tree.

use crate::builder::{self, BuildDiagnostics};
use crate::config::RollupConfig;
use crate::error::RollupResult;
use crate::node::OrgNode;
use crate::rollup;
use crate::source::RowSource;
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything one `hierarchy` call produces: the root mapping (empty when
/// the requested name matched nobody) plus the build diagnostics.
#[derive(Debug, Serialize)]
pub struct RollupOutcome {
    pub root: BTreeMap<String, OrgNode>,
    pub diagnostics: BuildDiagnostics,
}

/// Ties a row source and a config together behind a single entry point.
pub struct RollupEngine<S: RowSource> {
    source: S,
    config: RollupConfig,
}

impl<S: RowSource> RollupEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: RollupConfig::default(),
        }
    }

    pub fn with_config(source: S, config: RollupConfig) -> Self {
        Self { source, config }
    }

    /// Fetch, build, aggregate: the whole pipeline for one root name.
    pub fn hierarchy(&self, root_name: &str) -> RollupResult<RollupOutcome> {
        let rows = self.source.subtree_rows(root_name)?;
        log::info!("fetched {} rows for the subtree under '{root_name}'", rows.len());

        let (mut root, diagnostics) = builder::build_tree(root_name, &rows, &self.config)?;
        for node in root.values_mut() {
            let resolved = rollup::aggregate(node);
            log::info!(
                "aggregated '{root_name}': amount {}, total sales {}",
                resolved.amount,
                resolved.total_sales
            );
        }
        if root.is_empty() {
            log::info!("no employee named '{root_name}' in the fetched rows; empty result");
        }
        log::info!(
            "indexed {} employees, dropped {} ({} dangling, {} sibling name collisions)",
            diagnostics.employees_indexed,
            diagnostics.dropped,
            diagnostics.dangling,
            diagnostics.name_collisions
        );

        Ok(RollupOutcome { root, diagnostics })
    }
}
