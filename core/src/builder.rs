//! Tree builder — turns the flat row fan-out into a rooted reporting subtree.
//!
//! Three passes over an arena of slots addressed by employee id:
//!   1. Index: one slot per distinct employee id, first-seen-wins scalars,
//!      sales lines grouped in row order.
//!   2. Link: resolve each employee's manager by display name and attach,
//!      rejecting any link that would close a reporting cycle.
//!   3. Assemble: move slots out of the arena into the nested node tree,
//!      children keyed by display name.
//!
//! Data-quality anomalies degrade instead of failing: an unknown root yields
//! an empty mapping, a dangling manager reference drops the employee, missing
//! numerics count as zero. Every drop is counted in `BuildDiagnostics` and
//! logged at WARN. The one hard error is a reporting cycle.

use crate::{
    config::RollupConfig,
    error::{RollupError, RollupResult},
    node::OrgNode,
    row::{OrgRow, SaleRecord},
    types::EmployeeId,
};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Observable counts for everything the builder dropped or tolerated.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildDiagnostics {
    /// Rows scanned from the source, sales fan-out duplicates included.
    pub rows_scanned: usize,
    /// Distinct employee ids indexed out of the row set.
    pub employees_indexed: usize,
    /// Employees whose manager name resolved to no indexed employee
    /// (or who carried no manager name at all while not being the root).
    pub dangling: usize,
    /// Siblings shadowed by an earlier child with the same display name.
    pub name_collisions: usize,
    /// Employees indexed but absent from the assembled tree: dangling
    /// employees, their descendants, and shadowed siblings.
    pub dropped: usize,
}

/// An employee mid-construction. Linked by id; display names only matter
/// again at assembly time, when they become the children-map keys.
struct Slot {
    name: String,
    role: Option<String>,
    territory: Option<String>,
    manager_name: Option<String>,
    amount: f64,
    sales: Vec<SaleRecord>,
    contributor: bool,
    parent: Option<EmployeeId>,
    children: Vec<EmployeeId>,
}

/// Build the subtree rooted at `root_name` from the row set.
///
/// Returns the root mapping — one entry keyed by the root's display name, or
/// empty when no row matches the requested name — together with the build
/// diagnostics. Nodes come back unaggregated: `total_sales` is 0 everywhere
/// and manager `amount`s are 0 until [`crate::rollup::aggregate`] runs.
pub fn build_tree(
    root_name: &str,
    rows: &[OrgRow],
    config: &RollupConfig,
) -> RollupResult<(BTreeMap<String, OrgNode>, BuildDiagnostics)> {
    let mut diag = BuildDiagnostics {
        rows_scanned: rows.len(),
        ..BuildDiagnostics::default()
    };

    // ── Index pass ─────────────────────────────────────────────
    let mut arena: HashMap<EmployeeId, Slot> = HashMap::new();
    let mut order: Vec<EmployeeId> = Vec::new();
    let mut name_index: HashMap<String, EmployeeId> = HashMap::new();

    for row in rows {
        let slot = arena.entry(row.employee_id.clone()).or_insert_with(|| {
            order.push(row.employee_id.clone());
            name_index
                .entry(row.employee_name.clone())
                .or_insert_with(|| row.employee_id.clone());
            let contributor = config.is_contributor(row.role.as_deref());
            Slot {
                name: row.employee_name.clone(),
                role: row.role.clone(),
                territory: row.territory.clone(),
                manager_name: row.manager_name.clone(),
                amount: if contributor {
                    row.coverage.unwrap_or(0.0)
                } else {
                    0.0
                },
                sales: Vec::new(),
                contributor,
                parent: None,
                children: Vec::new(),
            }
        });
        // Sales lines accumulate across the whole fan-out, but only onto
        // contributors; manager rows keep an empty sequence.
        if slot.contributor {
            if let Some(line) = row.sales_line() {
                slot.sales.push(line);
            }
        }
    }
    diag.employees_indexed = arena.len();

    let root_id = name_index.get(root_name).cloned();

    // ── Link pass ──────────────────────────────────────────────
    for id in &order {
        if Some(id) == root_id.as_ref() {
            continue;
        }
        let manager_name = match &arena[id].manager_name {
            Some(name) => name.clone(),
            None => {
                diag.dangling += 1;
                log::warn!(
                    "employee '{}' ({id}) has no manager on record; dropped from the tree",
                    arena[id].name
                );
                continue;
            }
        };
        let Some(manager_id) = name_index.get(&manager_name).cloned() else {
            diag.dangling += 1;
            log::warn!(
                "employee '{}' ({id}) reports to unknown manager '{manager_name}'; \
                 dropped from the tree",
                arena[id].name
            );
            continue;
        };
        if links_back(&arena, &manager_id, id) {
            return Err(RollupError::ManagerCycle {
                employee_id: id.clone(),
                employee_name: arena[id].name.clone(),
            });
        }
        if let Some(manager) = arena.get_mut(&manager_id) {
            manager.children.push(id.clone());
        }
        if let Some(slot) = arena.get_mut(id) {
            slot.parent = Some(manager_id);
        }
    }

    // ── Assembly pass ──────────────────────────────────────────
    let mut root = BTreeMap::new();
    let mut in_tree = 0;
    if let Some(root_id) = root_id {
        if let Some((name, node)) = assemble(&root_id, &mut arena, &mut diag) {
            in_tree = subtree_size(&node);
            root.insert(name, node);
        }
    }
    diag.dropped = diag.employees_indexed - in_tree;

    Ok((root, diag))
}

/// True when attaching `child_id` under `manager_id` would close a cycle,
/// i.e. when `child_id` already sits on the manager's ancestor chain (the
/// self-managing employee is the one-link case). Each slot has at most one
/// parent, so the walk is a simple chase up the chain.
fn links_back(
    arena: &HashMap<EmployeeId, Slot>,
    manager_id: &EmployeeId,
    child_id: &EmployeeId,
) -> bool {
    let mut cursor = Some(manager_id);
    while let Some(id) = cursor {
        if id == child_id {
            return true;
        }
        cursor = arena.get(id).and_then(|slot| slot.parent.as_ref());
    }
    false
}

/// Move a slot and its descendants out of the arena into a nested node.
/// Children are keyed by display name; when two siblings share one, the
/// first-assembled child keeps the key and the later one is dropped.
fn assemble(
    id: &EmployeeId,
    arena: &mut HashMap<EmployeeId, Slot>,
    diag: &mut BuildDiagnostics,
) -> Option<(String, OrgNode)> {
    let slot = arena.remove(id)?;
    let mut children = BTreeMap::new();
    for child_id in &slot.children {
        if let Some((child_name, child_node)) = assemble(child_id, arena, diag) {
            match children.entry(child_name) {
                Entry::Vacant(vacant) => {
                    vacant.insert(child_node);
                }
                Entry::Occupied(taken) => {
                    diag.name_collisions += 1;
                    log::warn!(
                        "display name '{}' repeats among siblings; dropping employee {}",
                        taken.key(),
                        child_node.employee_id
                    );
                }
            }
        }
    }
    Some((
        slot.name,
        OrgNode {
            amount: slot.amount,
            territory: slot.territory,
            role: slot.role,
            children,
            total_sales: 0.0,
            employee_id: id.clone(),
            sales: slot.sales,
        },
    ))
}

fn subtree_size(node: &OrgNode) -> usize {
    1 + node.children.values().map(subtree_size).sum::<usize>()
}
