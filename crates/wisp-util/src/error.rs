//! The error taxonomy shared by every crate in the workspace.
//!
//! `WispError` is generic over its `User` payload so that `wisp-util` never
//! has to depend on `wisp-value` just to describe "a thrown value escaped to
//! the top level" — `wisp-eval` (the only crate that raises `User`) pins the
//! generic parameter to `wisp_value::Value` itself:
//!
//! ```ignore
//! pub type EvalError = wisp_util::WispError<wisp_value::Value>;
//! pub type EvalResult<T> = wisp_util::WispResult<T, wisp_value::Value>;
//! ```
//!
//! Every other crate (`wisp-lex`, `wisp-read`, `wisp-env`) never constructs
//! a `User` variant and is free to use the `String`-payload default.

use std::fmt;
use thiserror::Error;

/// The six error kinds a wisp program can raise, from parsing through
/// evaluation. `U` is the type carried by a `throw`n value; it defaults to
/// `String` for crates (the lexer, the reader) that never throw user values.
#[derive(Debug, Error)]
pub enum WispError<U = String>
where
    U: fmt::Debug + fmt::Display,
{
    /// The lexer or reader could not make sense of the input: an
    /// unterminated string, a stray closing delimiter, an unbalanced form.
    #[error("parse error: {0}")]
    ParseFailure(String),

    /// An operation was applied to a value of the wrong kind, e.g. calling
    /// a non-function or adding a string to an integer.
    #[error("type error: {0}")]
    TypeError(String),

    /// A symbol was looked up but is bound nowhere in the environment chain.
    #[error("'{0}' not found")]
    UndefinedSymbol(String),

    /// A resource limit or external failure: file not found, stack
    /// exhausted, division by zero outside the epsilon tolerance.
    #[error("{0}")]
    Resource(String),

    /// A value thrown by `(throw v)`, propagating until a `catch*` binds it
    /// or it escapes to the top level.
    #[error("{0}")]
    User(U),

    /// The reader ran out of input mid-form (e.g. at an interactive prompt
    /// after an unmatched open paren); distinct from `ParseFailure` so the
    /// REPL can tell "keep reading more lines" from "this input is wrong".
    #[error("unexpected EOF")]
    Eof,
}

/// Result alias used throughout the workspace. `U` defaults to `String` and
/// only needs to be overridden where a thrown wisp value must survive the
/// round trip through `Result`.
pub type WispResult<T, U = String> = std::result::Result<T, WispError<U>>;
