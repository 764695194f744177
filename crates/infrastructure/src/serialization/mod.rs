//! Deterministic JSON serialization for stored files.
//!
//! Keeps the order store readable and diff-friendly:
//! - Sorting object keys alphabetically (via `BTreeMap` in domain types)
//! - Using 2-space indentation
//! - Adding trailing newline

mod json;

pub use json::*;
