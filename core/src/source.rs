//! Where rows come from.
//!
//! The engine only ever asks one question of its backing data: "give me the
//! denormalized rows for the subtree under this name". `RowSource` is that
//! question as a trait, so the SQLite store, an in-memory fixture, or
//! anything else can sit behind the same engine.

use crate::error::RollupResult;
use crate::row::OrgRow;

pub trait RowSource {
    /// Fetch every row belonging to the subtree rooted at `root_name`,
    /// including the root's own rows. Sources that cannot scope the fetch
    /// may over-return; the builder ignores rows outside the subtree.
    fn subtree_rows(&self, root_name: &str) -> RollupResult<Vec<OrgRow>>;
}

/// In-memory fixture: hands the whole row set back and lets the builder
/// carve out the requested subtree.
impl RowSource for Vec<OrgRow> {
    fn subtree_rows(&self, _root_name: &str) -> RollupResult<Vec<OrgRow>> {
        Ok(self.clone())
    }
}

impl<S: RowSource + ?Sized> RowSource for &S {
    fn subtree_rows(&self, root_name: &str) -> RollupResult<Vec<OrgRow>> {
        (**self).subtree_rows(root_name)
    }
}
