//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Everything else goes through store methods — nothing executes SQL directly.

use crate::{
    error::RollupResult,
    row::OrgRow,
    source::RowSource,
    types::BatchId,
};
use rusqlite::{params, Connection};

pub struct OrgStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

/// One employee line from the roster listing.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub emp_code: String,
    pub emp_name: String,
    pub role: Option<String>,
    pub manager_name: Option<String>,
}

impl OrgStore {
    pub fn open(path: &str) -> RollupResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> RollupResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a fresh, isolated database.
    pub fn reopen(&self) -> RollupResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> RollupResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_org.sql"))?;
        Ok(())
    }

    // ── Employee roster ────────────────────────────────────────

    pub fn insert_employee(
        &self,
        emp_code: &str,
        emp_name: &str,
        role: Option<&str>,
        manager_code: Option<&str>,
        manager_name: Option<&str>,
        territory: Option<&str>,
    ) -> RollupResult<()> {
        self.conn.execute(
            "INSERT INTO employee (emp_code, emp_name, role, manager_code, manager_name, territory)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![emp_code, emp_name, role, manager_code, manager_name, territory],
        )?;
        Ok(())
    }

    pub fn employee_count(&self) -> RollupResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))
            .map_err(Into::into)
    }

    pub fn roster(&self) -> RollupResult<Vec<RosterEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT emp_code, emp_name, role, manager_name
             FROM employee ORDER BY emp_name ASC",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(RosterEntry {
                    emp_code: row.get(0)?,
                    emp_name: row.get(1)?,
                    role: row.get(2)?,
                    manager_name: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Coverage and sales ─────────────────────────────────────

    pub fn set_coverage(&self, emp_code: &str, coverage: f64) -> RollupResult<()> {
        self.conn.execute(
            "INSERT INTO coverage (emp_code, coverage) VALUES (?1, ?2)
             ON CONFLICT(emp_code) DO UPDATE SET coverage = excluded.coverage",
            params![emp_code, coverage],
        )?;
        Ok(())
    }

    pub fn insert_sale(
        &self,
        emp_code: &str,
        product_name: &str,
        amount: Option<f64>,
    ) -> RollupResult<()> {
        self.conn.execute(
            "INSERT INTO sales (emp_code, product_name, amount) VALUES (?1, ?2, ?3)",
            params![emp_code, product_name, amount],
        )?;
        Ok(())
    }

    pub fn sales_count(&self) -> RollupResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM sales", [], |row| row.get(0))
            .map_err(Into::into)
    }

    // ── Seed batches ───────────────────────────────────────────

    /// Record one demo-data load, returning its batch id.
    pub fn record_seed_batch(&self, seed: u64, version: &str) -> RollupResult<BatchId> {
        let batch_id = uuid::Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO seed_batch (batch_id, seed, version, loaded_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                batch_id,
                seed as i64,
                version,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        Ok(batch_id)
    }

    // ── Subtree rows ───────────────────────────────────────────

    /// Denormalized rows for the reporting subtree under the named employee:
    /// the downline closes over `manager_code` links, then coverage and sales
    /// join on, fanning each employee out to one row per sales line. UNION
    /// (not UNION ALL) keeps the walk finite even if the stored links loop;
    /// the builder is the one that rejects such data.
    pub fn subtree_rows(&self, root_name: &str) -> RollupResult<Vec<OrgRow>> {
        let mut stmt = self.conn.prepare(
            "WITH RECURSIVE downline(emp_code) AS (
                 SELECT emp_code FROM employee WHERE emp_name = ?1
                 UNION
                 SELECT e.emp_code
                 FROM employee e
                 JOIN downline d ON e.manager_code = d.emp_code
             )
             SELECT e.emp_code, e.emp_name, e.role, e.manager_name, e.territory,
                    c.coverage, sl.product_name, sl.amount
             FROM employee e
             JOIN downline d ON e.emp_code = d.emp_code
             LEFT JOIN coverage c ON c.emp_code = e.emp_code
             LEFT JOIN sales sl ON sl.emp_code = e.emp_code
             ORDER BY e.emp_name ASC, sl.id ASC",
        )?;
        let rows = stmt
            .query_map(params![root_name], |row| {
                Ok(OrgRow {
                    employee_id: row.get(0)?,
                    employee_name: row.get(1)?,
                    role: row.get(2)?,
                    manager_name: row.get(3)?,
                    territory: row.get(4)?,
                    coverage: row.get(5)?,
                    product_name: row.get(6)?,
                    sales_amount: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl RowSource for OrgStore {
    fn subtree_rows(&self, root_name: &str) -> RollupResult<Vec<OrgRow>> {
        OrgStore::subtree_rows(self, root_name)
    }
}
