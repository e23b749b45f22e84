use std::cmp::Ordering;

use crate::Value;

/// Structural equality, matching the reference comparator's behavior:
/// lists and vectors compare equal to each other when their elements match
/// (both are just "sequential" to it), floats and integers compare equal
/// across kinds when numerically equal, and closures/atoms compare equal
/// only by identity.
pub fn wisp_eq(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Nil, Nil) => true,
        (Bool(x), Bool(y)) => x == y,
        (Int(x), Int(y)) => x == y,
        (Float(x), Float(y)) => (x - y).abs() < f64::EPSILON,
        (Int(x), Float(y)) | (Float(y), Int(x)) => (*x as f64 - y).abs() < f64::EPSILON,
        (Str(x), Str(y)) => x == y,
        (Sym(x), Sym(y)) => x == y,
        (Keyword(x), Keyword(y)) => x == y,
        (List(x), List(y)) | (Vector(x), Vector(y)) | (List(x), Vector(y)) | (Vector(x), List(y)) => {
            x.items.len() == y.items.len()
                && x.items.iter().zip(y.items.iter()).all(|(p, q)| wisp_eq(p, q))
        }
        (Map(x), Map(y)) => {
            x.entries.len() == y.entries.len()
                && x.entries
                    .iter()
                    .zip(y.entries.iter())
                    .all(|((ka, va), (kb, vb))| wisp_eq(ka, kb) && wisp_eq(va, vb))
        }
        (Closure(x), Closure(y)) => std::rc::Rc::ptr_eq(x, y),
        (NativeFn(x), NativeFn(y)) => std::rc::Rc::ptr_eq(x, y),
        (Atom(x), Atom(y)) => std::rc::Rc::ptr_eq(x, y),
        _ => false,
    }
}

fn type_rank(v: &Value) -> u8 {
    use Value::*;
    match v {
        Nil => 0,
        Bool(false) => 0,
        Bool(true) => 1,
        Int(_) | Float(_) => 2,
        Str(_) => 3,
        Keyword(_) => 4,
        Sym(_) => 5,
        List(_) | Vector(_) => 6,
        Map(_) => 7,
        Closure(_) | NativeFn(_) => 8,
        Atom(_) => 9,
    }
}

/// A total order over values, used only to keep [`crate::MapData`] entries
/// sorted for binary search. Numbers, strings, keywords and symbols compare
/// by their natural order; everything else falls back to an arbitrary but
/// stable order by allocation identity, since the reference implementation
/// never needs to rank two closures against each other — only to tell
/// whether they're the same one.
pub fn wisp_cmp(a: &Value, b: &Value) -> Ordering {
    use Value::*;
    match (a, b) {
        (Nil, Nil) | (Bool(false), Bool(false)) | (Bool(true), Bool(true)) => Ordering::Equal,
        (Nil, Bool(false)) => Ordering::Equal,
        (Bool(false), Nil) => Ordering::Equal,
        (Int(x), Int(y)) => x.cmp(y),
        (Float(x), Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Int(x), Float(y)) => (*x as f64).partial_cmp(y).unwrap_or(Ordering::Equal),
        (Float(x), Int(y)) => x.partial_cmp(&(*y as f64)).unwrap_or(Ordering::Equal),
        (Str(x), Str(y)) => x.cmp(y),
        (Keyword(x), Keyword(y)) => x.cmp(y),
        (Sym(x), Sym(y)) => x.cmp(y),
        (List(x), List(y)) | (Vector(x), Vector(y)) | (List(x), Vector(y)) | (Vector(x), List(y)) => {
            x.items
                .len()
                .cmp(&y.items.len())
                .then_with(|| {
                    for (p, q) in x.items.iter().zip(y.items.iter()) {
                        let c = wisp_cmp(p, q);
                        if c != Ordering::Equal {
                            return c;
                        }
                    }
                    Ordering::Equal
                })
        }
        (Map(x), Map(y)) => {
            if wisp_eq(a, b) {
                Ordering::Equal
            } else {
                (std::rc::Rc::as_ptr(x) as usize).cmp(&(std::rc::Rc::as_ptr(y) as usize))
            }
        }
        (Closure(x), Closure(y)) => {
            (std::rc::Rc::as_ptr(x) as usize).cmp(&(std::rc::Rc::as_ptr(y) as usize))
        }
        (NativeFn(x), NativeFn(y)) => {
            (std::rc::Rc::as_ptr(x) as usize).cmp(&(std::rc::Rc::as_ptr(y) as usize))
        }
        (Atom(x), Atom(y)) => {
            (std::rc::Rc::as_ptr(x) as usize).cmp(&(std::rc::Rc::as_ptr(y) as usize))
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
