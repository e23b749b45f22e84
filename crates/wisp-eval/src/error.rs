//! The evaluator's error type: [`wisp_util::WispError`] with its `User`
//! payload fixed to [`Value`], since `throw` hands back an arbitrary wisp
//! value rather than a string.

use wisp_util::WispError;
use wisp_value::Value;

pub type EvalError = WispError<Value>;
pub type EvalResult<T> = Result<T, EvalError>;

/// Lifts an error out of the lexer/reader (which never throw a user value,
/// so their `User` payload is always `String`) into the evaluator's error
/// type.
pub fn lift(e: WispError<String>) -> EvalError {
    match e {
        WispError::ParseFailure(s) => EvalError::ParseFailure(s),
        WispError::TypeError(s) => EvalError::TypeError(s),
        WispError::UndefinedSymbol(s) => EvalError::UndefinedSymbol(s),
        WispError::Resource(s) => EvalError::Resource(s),
        WispError::User(s) => EvalError::User(Value::string(s)),
        WispError::Eof => EvalError::Eof,
    }
}
