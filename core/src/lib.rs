//! Sales-hierarchy rollup: rebuild a reporting tree from flat, denormalized
//! rows and total it bottom-up.
//!
//! The pipeline is `source` → `builder` → `rollup`, fronted by
//! [`engine::RollupEngine`]. `store` is the SQLite implementation of
//! [`source::RowSource`]; `demo` seeds it with deterministic data.

pub mod builder;
pub mod config;
pub mod demo;
pub mod engine;
pub mod error;
pub mod node;
pub mod rollup;
pub mod row;
pub mod source;
pub mod store;
pub mod types;
