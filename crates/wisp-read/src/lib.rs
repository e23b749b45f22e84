//! Parses a wisp token stream into [`wisp_value::Value`] trees.

pub mod reader;

pub use reader::{read_str, Reader};
