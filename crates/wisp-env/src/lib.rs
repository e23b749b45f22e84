//! The lexical environment, as its own crate per the workspace's
//! one-crate-per-pipeline-stage layout.
//!
//! The `Env` struct itself is defined in `wisp-value::env`: closures capture
//! environments and environments bind closures as ordinary values, so the
//! two types are mutually recursive and Rust's no-cycles-between-crates
//! rule forces them into the same compilation unit. This crate re-exports
//! that module whole, so callers depend on `wisp-env` for the Environment
//! component exactly as the workspace layout describes.

pub use wisp_value::env::{find, get, Env};
