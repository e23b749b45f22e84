use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::env::Env;
use crate::Value;
use wisp_util::WispResult;

/// A user-defined function created by `fn*`. `is_macro` is a `Cell` rather
/// than a plain `bool` because `defmacro!` flips an *existing* closure value
/// into macro mode in place (the reference does the same by mutating the
/// `is_macro` bitfield on the already-allocated struct) rather than building
/// a new one.
pub struct ClosureData {
    pub env: Rc<std::cell::RefCell<Env>>,
    pub params: Value,
    pub body: Value,
    pub is_macro: Cell<bool>,
    pub meta: Value,
}

impl std::fmt::Debug for ClosureData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureData")
            .field("is_macro", &self.is_macro.get())
            .finish_non_exhaustive()
    }
}

/// A primitive bound in the root environment. The function body is an
/// ordinary Rust closure rather than a bare function pointer so that
/// primitives needing to call back into the evaluator (`apply`, `map`,
/// `swap!`, `eval`) can capture whatever they need from `wisp-eval` at
/// construction time; `wisp-value` itself never calls into the evaluator.
///
/// The closure also receives the environment the call form is being
/// evaluated in. Almost every primitive ignores it; `eval` and `env-keys`
/// need it to walk the caller's own frame chain rather than some frame
/// captured at bootstrap time.
pub struct NativeFnData {
    pub name: &'static str,
    pub func: Box<dyn Fn(&[Value], &Rc<RefCell<Env>>) -> WispResult<Value, Value>>,
}

impl std::fmt::Debug for NativeFnData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFnData").field("name", &self.name).finish()
    }
}
