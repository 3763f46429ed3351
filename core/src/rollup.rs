//! Post-order rollup over an assembled subtree.

use crate::node::OrgNode;

/// The pair of figures a finished subtree reports upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub amount: f64,
    pub total_sales: f64,
}

/// Aggregate the subtree in place, bottom-up, and return the root's figures.
///
/// Leaves keep their seeded `amount` and total their own sales lines, a
/// missing line amount counting as zero. Managers take the rounded mean of
/// their children's amounts (`f64::round`, ties away from zero) and the
/// unrounded sum of their children's `total_sales`. Leaf-ness is structural:
/// an employee with no reports is totalled as a leaf whatever the role tag
/// says, and a tagged contributor with reports is averaged like any manager.
///
/// Running it again on an already-aggregated tree is a no-op: every figure
/// recomputes to itself.
pub fn aggregate(node: &mut OrgNode) -> Resolved {
    if node.is_leaf() {
        node.total_sales = node
            .sales
            .iter()
            .map(|line| line.amount.unwrap_or(0.0))
            .sum();
        return Resolved {
            amount: node.amount,
            total_sales: node.total_sales,
        };
    }

    let mut amount_sum = 0.0;
    let mut sales_sum = 0.0;
    let mut reports = 0usize;
    for child in node.children.values_mut() {
        let resolved = aggregate(child);
        amount_sum += resolved.amount;
        sales_sum += resolved.total_sales;
        reports += 1;
    }
    node.amount = (amount_sum / reports as f64).round();
    node.total_sales = sales_sum;
    Resolved {
        amount: node.amount,
        total_sales: node.total_sales,
    }
}
