//! The lexical environment.
//!
//! This lives beside [`Value`](crate::Value) rather than in its own crate
//! because the two are mutually recursive by nature: closures capture an
//! environment, and environments bind symbols to values that are often
//! themselves closures. Rust crates can't form a dependency cycle, so one
//! side of that recursion has to live wherever the other does. The
//! `wisp-env` crate re-exports this module as its public surface, keeping
//! the crate boundary the workspace layout describes while respecting that
//! constraint.

use std::cell::RefCell;
use std::rc::Rc;

use wisp_util::{WispError, WispResult};

use crate::Value;

/// A single binding frame. Bindings are kept in an unsorted `Vec` rather
/// than a `HashMap`: environments are usually small (function parameter
/// lists, a handful of `let*` bindings) and linear scan beats hashing at
/// that size, matching the reference's flat-array dictionary.
#[derive(Debug)]
pub struct Env {
    pub outer: Option<Rc<RefCell<Env>>>,
    bindings: Vec<(Rc<str>, Value)>,
    /// Set on the frame a closure invocation creates for its parameters.
    /// `eval`'s own env-walk (see `wisp-eval`) skips every *consecutive*
    /// such frame to reach the enclosing lexical scope, not just one.
    pub args: bool,
}

impl Env {
    pub fn new_root() -> Rc<RefCell<Env>> {
        Rc::new(RefCell::new(Env {
            outer: None,
            bindings: Vec::new(),
            args: false,
        }))
    }

    /// Builds a child environment from a closure's parameter list and the
    /// arguments it was called with. `binds` is ordinarily a list/vector of
    /// symbols, with `&rest` variadic binding supported exactly as the
    /// reference does: the symbol following a literal `&` collects every
    /// remaining argument into a list. `binds` may also be a bare symbol,
    /// in which case it binds to the entire argument list — used by
    /// `eval`-style primitives that want all their arguments at once.
    pub fn new(
        outer: Rc<RefCell<Env>>,
        binds: &Value,
        exprs: &[Value],
    ) -> WispResult<Rc<RefCell<Env>>, Value> {
        let mut bindings = Vec::new();

        match binds {
            Value::Nil => {}
            Value::List(seq) | Value::Vector(seq) => {
                let params = &seq.items;
                let mut i = 0;
                while i < params.len() {
                    let bind_sym = symbol_name(&params[i])?;

                    if &*bind_sym == "&" {
                        let rest_sym = params.get(i + 1).ok_or_else(|| {
                            WispError::ParseFailure("& without symbol".to_string())
                        })?;
                        let rest_name = symbol_name(rest_sym)?;
                        let rest: Vec<Value> = exprs.get(i..).unwrap_or(&[]).to_vec();
                        log::trace!("variadic bind {rest_name} collects {} args", rest.len());
                        bindings.push((rest_name, Value::list(rest)));
                        i = params.len();
                        break;
                    }

                    let value = exprs.get(i).cloned().unwrap_or(Value::Nil);
                    bindings.push((bind_sym, value));
                    i += 1;
                }
            }
            Value::Sym(name) if !exprs.is_empty() => {
                bindings.push((name.clone(), exprs[0].clone()));
            }
            other => {
                return Err(WispError::TypeError(format!(
                    "environment bindings must be symbols, got {}",
                    other.type_name()
                )))
            }
        }

        Ok(Rc::new(RefCell::new(Env {
            outer: Some(outer),
            bindings,
            args: false,
        })))
    }

    pub fn set(&mut self, key: Rc<str>, value: Value) {
        if let Some(entry) = self.bindings.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.bindings.push((key, value));
        }
    }

    /// Looks a symbol up in this frame only (no parent walk).
    pub fn get_local(&self, key: &str) -> Option<Value> {
        self.bindings
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v.clone())
    }

    /// The symbols bound directly in this frame, in insertion order. Used
    /// by the `env-keys` primitive, which never walks `outer`.
    pub fn local_keys(&self) -> Vec<Rc<str>> {
        self.bindings.iter().map(|(k, _)| k.clone()).collect()
    }
}

fn symbol_name(v: &Value) -> WispResult<Rc<str>, Value> {
    match v {
        Value::Sym(s) => Ok(s.clone()),
        other => Err(WispError::TypeError(format!(
            "environment bindings must be symbols, got {}",
            other.type_name()
        ))),
    }
}

/// Looks `key` up starting at `env`, walking `outer` links until found.
pub fn find(env: &Rc<RefCell<Env>>, key: &str) -> Option<Value> {
    let mut current = env.clone();
    loop {
        let next = {
            let borrowed = current.borrow();
            if let Some(v) = borrowed.get_local(key) {
                return Some(v);
            }
            borrowed.outer.clone()
        };
        current = next?;
    }
}

pub fn get(env: &Rc<RefCell<Env>>, key: &str) -> WispResult<Value, Value> {
    find(env, key).ok_or_else(|| WispError::UndefinedSymbol(key.to_string()))
}
