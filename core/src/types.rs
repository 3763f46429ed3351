//! Shared primitive types used across the entire crate.

/// A stable, unique employee identifier (the emp_code of the source system).
pub type EmployeeId = String;

/// A territory label, carried verbatim from the row set.
pub type Territory = String;

/// Identifier of one demo-data load recorded in the store.
pub type BatchId = String;
