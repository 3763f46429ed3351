//! The flat input record the row source hands to the engine.
//!
//! One `OrgRow` per (employee, optional sales line) pair: an employee with
//! three sales lines arrives as three rows sharing the same employee id,
//! and an employee with none arrives as a single row with no product pair.
//! The builder regroups this fan-out; nothing upstream is expected to.

use crate::types::{EmployeeId, Territory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgRow {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub role: Option<String>,
    pub manager_name: Option<String>,
    pub territory: Option<Territory>,
    /// Coverage metric; absent counts as 0.
    pub coverage: Option<f64>,
    /// Product of the sales line carried by this row, if any.
    pub product_name: Option<String>,
    /// Amount of that sales line. May be absent even when the product is
    /// present; absent counts as 0 at aggregation time.
    pub sales_amount: Option<f64>,
}

impl OrgRow {
    pub fn new(employee_id: &str, employee_name: &str) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            employee_name: employee_name.to_string(),
            role: None,
            manager_name: None,
            territory: None,
            coverage: None,
            product_name: None,
            sales_amount: None,
        }
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn with_manager(mut self, manager_name: &str) -> Self {
        self.manager_name = Some(manager_name.to_string());
        self
    }

    pub fn with_territory(mut self, territory: &str) -> Self {
        self.territory = Some(territory.to_string());
        self
    }

    pub fn with_coverage(mut self, coverage: f64) -> Self {
        self.coverage = Some(coverage);
        self
    }

    pub fn with_sale(mut self, product_name: &str, amount: Option<f64>) -> Self {
        self.product_name = Some(product_name.to_string());
        self.sales_amount = amount;
        self
    }

    /// The sales line this row carries, if it carries one. A row without a
    /// product name contributes no line, whatever its amount column says.
    pub fn sales_line(&self) -> Option<SaleRecord> {
        self.product_name.as_ref().map(|product| SaleRecord {
            product_name: product.clone(),
            amount: self.sales_amount,
        })
    }
}

/// One (product, amount) sales pair grouped onto a contributor node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub product_name: String,
    pub amount: Option<f64>,
}
