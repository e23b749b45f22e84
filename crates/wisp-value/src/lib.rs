//! The value model: every concrete data kind a wisp program manipulates,
//! plus the lexical environment they're evaluated against.
//!
//! `Env` lives in this crate rather than `wisp-env` — see the doc comment
//! on [`env`] for why — with `wisp-env` re-exporting it as a thin facade.

pub mod callable;
pub mod cmp;
pub mod env;
pub mod map;
pub mod seq;
pub mod value;

pub use callable::{ClosureData, NativeFnData};
pub use cmp::{wisp_cmp, wisp_eq};
pub use env::Env;
pub use map::MapData;
pub use seq::SeqData;
pub use value::Value;
