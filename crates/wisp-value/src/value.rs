use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::callable::{ClosureData, NativeFnData};
use crate::env::Env;
use crate::map::MapData;
use crate::seq::SeqData;

/// Every kind of data a wisp program can hold. `Bool` merges the reference's
/// separate true/false types into one variant, the way any idiomatic Rust
/// enum would; their distinct printed forms live in the printer, not here.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Sym(Rc<str>),
    Keyword(Rc<str>),
    List(Rc<SeqData>),
    Vector(Rc<SeqData>),
    Map(Rc<MapData>),
    Closure(Rc<ClosureData>),
    NativeFn(Rc<NativeFnData>),
    Atom(Rc<RefCell<Value>>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(SeqData::new(items)))
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vector(Rc::new(SeqData::new(items)))
    }

    pub fn map(pairs: &[Value]) -> Value {
        Value::Map(Rc::new(MapData::from_pairs(pairs)))
    }

    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn symbol(s: impl Into<Rc<str>>) -> Value {
        Value::Sym(s.into())
    }

    pub fn keyword(s: impl Into<Rc<str>>) -> Value {
        Value::Keyword(s.into())
    }

    pub fn atom(v: Value) -> Value {
        Value::Atom(Rc::new(RefCell::new(v)))
    }

    pub fn native_fn(
        name: &'static str,
        func: impl Fn(&[Value], &Rc<RefCell<Env>>) -> wisp_util::WispResult<Value, Value> + 'static,
    ) -> Value {
        Value::NativeFn(Rc::new(NativeFnData {
            name,
            func: Box::new(func),
        }))
    }

    pub fn closure(env: Rc<RefCell<Env>>, params: Value, body: Value) -> Value {
        Value::Closure(Rc::new(ClosureData {
            env,
            params,
            body,
            is_macro: Cell::new(false),
            meta: Value::Nil,
        }))
    }

    /// Everything is truthy except `nil` and `false`, matching the
    /// reference's `if`/`cond` short-circuit rule.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_sequential(&self) -> bool {
        matches!(self, Value::List(_) | Value::Vector(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::NativeFn(_))
    }

    pub fn is_macro(&self) -> bool {
        matches!(self, Value::Closure(c) if c.is_macro.get())
    }

    pub fn items(&self) -> Option<&[Value]> {
        match self {
            Value::List(s) | Value::Vector(s) => Some(&s.items),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Sym(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(true) => "true",
            Value::Bool(false) => "false",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Sym(_) => "symbol",
            Value::Keyword(_) => "keyword",
            Value::List(_) => "list",
            Value::Vector(_) => "vector",
            Value::Map(_) => "hashmap",
            Value::Closure(_) => "closure",
            Value::NativeFn(_) => "function",
            Value::Atom(_) => "atom",
        }
    }

    pub fn meta(&self) -> Value {
        match self {
            Value::List(s) | Value::Vector(s) => s.meta.clone(),
            Value::Map(m) => m.meta.clone(),
            Value::Closure(c) => c.meta.clone(),
            _ => Value::Nil,
        }
    }

    /// Returns a new value carrying `meta`, leaving `self` untouched — the
    /// reference never mutates an existing value's `meta` field in place
    /// except through this kind of copy-on-write clone.
    pub fn with_meta(&self, meta: Value) -> Value {
        match self {
            Value::List(s) => Value::List(Rc::new(s.with_meta(meta))),
            Value::Vector(s) => Value::Vector(Rc::new(s.with_meta(meta))),
            Value::Map(m) => Value::Map(Rc::new(m.with_meta(meta))),
            Value::Closure(c) => Value::Closure(Rc::new(ClosureData {
                env: c.env.clone(),
                params: c.params.clone(),
                body: c.body.clone(),
                is_macro: Cell::new(c.is_macro.get()),
                meta,
            })),
            other => other.clone(),
        }
    }
}

/// A minimal display form, used only so a thrown value can appear inside
/// `WispError::User`'s `{0}` message (`thiserror` requires `Display` on the
/// error payload). `wisp-print` owns the real reader/printer-round-trip
/// rendering; this crate can't depend on it without a cycle, so error text
/// gets this simpler approximation instead.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Sym(s) => write!(f, "{s}"),
            Value::Keyword(k) => write!(f, ":{k}"),
            Value::List(seq) => write_seq(f, &seq.items, '(', ')'),
            Value::Vector(seq) => write_seq(f, &seq.items, '[', ']'),
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{k} {v}")?;
                }
                write!(f, "}}")
            }
            Value::Closure(c) if c.is_macro.get() => write!(f, "#<closure:macro>"),
            Value::Closure(_) => write!(f, "#<closure>"),
            Value::NativeFn(_) => write!(f, "#<function>"),
            Value::Atom(cell) => {
                let inner = cell.borrow();
                if matches!(&*inner, Value::Atom(_)) {
                    write!(f, "(atom #atom#)")
                } else {
                    write!(f, "(atom {inner})")
                }
            }
        }
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Value], open: char, close: char) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}
