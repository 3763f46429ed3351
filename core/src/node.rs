//! The in-memory tree node for one employee of a reconstructed subtree.

use crate::row::SaleRecord;
use crate::types::{EmployeeId, Territory};
use serde::Serialize;
use std::collections::BTreeMap;

/// One employee in the subtree. Built fresh per request by the tree builder,
/// aggregated in place by the rollup pass, then serialized and dropped.
///
/// Serializes to the nested shape the API layer hands to clients: `amount`,
/// `territory`, `role`, `children` (display name → node), `totalSales`, plus
/// the stable `employeeId`. The raw sales records stay internal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    /// Coverage metric. Seeded from the row for individual contributors,
    /// 0 for everyone else; managers earn the mean of their children's
    /// amounts during the rollup.
    pub amount: f64,
    pub territory: Option<Territory>,
    pub role: Option<String>,
    pub children: BTreeMap<String, OrgNode>,
    /// Subtree sales total. 0 until the rollup pass resolves it.
    pub total_sales: f64,
    pub employee_id: EmployeeId,
    /// Sales lines grouped from the row fan-out; populated only on
    /// individual-contributor nodes and never serialized.
    #[serde(skip_serializing)]
    pub sales: Vec<SaleRecord>,
}

impl OrgNode {
    /// Leaf status is structural: whatever the role tag claims, a node with
    /// no children aggregates as an individual contributor.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
