//! Turns a [`Value`] back into text.
//!
//! Every wisp value has two textual forms: *readable*, where strings are
//! quoted and escaped so the result can be fed straight back through the
//! reader, and *display*, where a string prints its own bytes raw. `pr_str`
//! produces the former; `to_display` the latter. Both share one recursive
//! writer so the two modes can never drift apart on how compound values are
//! bracketed.

use std::fmt::Write as _;

use wisp_value::Value;

/// The readable form: `(pr-str ...)` and the REPL's own echo of results.
pub fn pr_str(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, true);
    out
}

/// The display form: `(str ...)` and `(println ...)`.
pub fn to_display(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, false);
    out
}

/// `(pr-str a b c)`-style joining: each argument printed readably and
/// separated by a single space.
pub fn pr_str_join(values: &[Value], readably: bool, separator: &str) -> String {
    values
        .iter()
        .map(|v| {
            let mut out = String::new();
            write_value(&mut out, v, readably);
            out
        })
        .collect::<Vec<_>>()
        .join(separator)
}

fn write_value(out: &mut String, value: &Value, readably: bool) {
    match value {
        Value::Nil => out.push_str("nil"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Float(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Sym(s) => out.push_str(s),
        Value::Keyword(k) => {
            out.push(':');
            out.push_str(k);
        }
        Value::Str(s) => {
            if readably {
                write_escaped_string(out, s);
            } else {
                out.push_str(s);
            }
        }
        Value::List(seq) => write_bracketed(out, &seq.items, '(', ')', readably),
        Value::Vector(seq) => write_bracketed(out, &seq.items, '[', ']', readably),
        Value::Map(map) => {
            out.push('{');
            for (i, (k, v)) in map.entries.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_value(out, k, readably);
                out.push(' ');
                write_value(out, v, readably);
            }
            out.push('}');
        }
        Value::Atom(cell) => {
            out.push_str("(atom ");
            let inner = cell.borrow();
            if matches!(&*inner, Value::Atom(_)) {
                log::trace!("printing a self-referential atom");
                out.push_str("#atom#");
            } else {
                write_value(out, &inner, readably);
            }
            out.push(')');
        }
        Value::Closure(c) if c.is_macro.get() => out.push_str("#<closure:macro>"),
        Value::Closure(_) => out.push_str("#<closure>"),
        Value::NativeFn(_) => out.push_str("#<function>"),
    }
}

fn write_bracketed(out: &mut String, items: &[Value], open: char, close: char, readably: bool) {
    out.push(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_value(out, item, readably);
    }
    out.push(close);
}

/// Escapes `"`, `\` and newline; every other byte passes through untouched.
fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_print_readably() {
        assert_eq!(pr_str(&Value::Nil), "nil");
        assert_eq!(pr_str(&Value::Bool(true)), "true");
        assert_eq!(pr_str(&Value::Int(-7)), "-7");
        assert_eq!(pr_str(&Value::keyword("foo")), ":foo");
    }

    #[test]
    fn strings_escape_quotes_backslash_and_newline() {
        let s = Value::string("a\"b\\c\nd");
        assert_eq!(pr_str(&s), "\"a\\\"b\\\\c\\nd\"");
        assert_eq!(to_display(&s), "a\"b\\c\nd");
    }

    #[test]
    fn list_and_vector_use_distinct_brackets() {
        let l = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let v = Value::vector(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(pr_str(&l), "(1 2)");
        assert_eq!(pr_str(&v), "[1 2]");
    }

    #[test]
    fn map_prints_entries_in_sorted_order() {
        let m = Value::map(&[
            Value::keyword("b"),
            Value::Int(2),
            Value::keyword("a"),
            Value::Int(1),
        ]);
        assert_eq!(pr_str(&m), "{:a 1 :b 2}");
    }

    #[test]
    fn self_referential_atom_prints_a_placeholder() {
        let inner = Value::atom(Value::Int(1));
        let outer = Value::atom(inner.clone());
        if let Value::Atom(cell) = &inner {
            *cell.borrow_mut() = outer.clone();
        }
        assert_eq!(pr_str(&inner), "(atom #atom#)");
    }

    #[test]
    fn closures_and_natives_print_distinguishable_forms() {
        let env = wisp_value::Env::new_root();
        let c = Value::closure(env, Value::list(vec![]), Value::Nil);
        assert_eq!(pr_str(&c), "#<closure>");
        if let Value::Closure(data) = &c {
            data.is_macro.set(true);
        }
        assert_eq!(pr_str(&c), "#<closure:macro>");

        let f = Value::native_fn("+", |_, _| Ok(Value::Nil));
        assert_eq!(pr_str(&f), "#<function>");
    }
}
