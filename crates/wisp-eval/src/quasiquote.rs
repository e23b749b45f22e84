//! Quasiquote template expansion, run once per `(quasiquote X)` form before
//! the trampoline tail-evaluates the result.

use wisp_value::Value;

fn is_pair(v: &Value) -> bool {
    v.items().is_some_and(|items| !items.is_empty())
}

/// Transforms a quasiquote template into an ordinary form built from
/// `quote`, `cons`, and `concat` calls.
pub fn quasiquote(ast: &Value) -> Value {
    if !is_pair(ast) {
        return Value::list(vec![Value::symbol("quote"), ast.clone()]);
    }

    let items = ast.items().expect("is_pair guarantees a sequence");
    let first = &items[0];

    if let Some("unquote") = first.as_symbol() {
        return items.get(1).cloned().unwrap_or(Value::Nil);
    }

    let rest = Value::list(items[1..].to_vec());

    if is_pair(first) {
        let first_items = first.items().expect("is_pair guarantees a sequence");
        if let Some("splice-unquote") = first_items[0].as_symbol() {
            let spliced = first_items.get(1).cloned().unwrap_or(Value::Nil);
            return Value::list(vec![Value::symbol("concat"), spliced, quasiquote(&rest)]);
        }
    }

    Value::list(vec![
        Value::symbol("cons"),
        quasiquote(first),
        quasiquote(&rest),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_value::wisp_eq;

    #[test]
    fn non_pair_becomes_quote() {
        let v = quasiquote(&Value::Int(5));
        assert!(wisp_eq(
            &v,
            &Value::list(vec![Value::symbol("quote"), Value::Int(5)])
        ));
    }

    #[test]
    fn unquote_returns_inner_form_directly() {
        let tmpl = Value::list(vec![Value::symbol("unquote"), Value::symbol("x")]);
        let v = quasiquote(&tmpl);
        assert!(wisp_eq(&v, &Value::symbol("x")));
    }

    #[test]
    fn splice_unquote_expands_to_concat() {
        let tmpl = Value::list(vec![Value::list(vec![
            Value::symbol("splice-unquote"),
            Value::symbol("xs"),
        ])]);
        let v = quasiquote(&tmpl);
        let expected = Value::list(vec![
            Value::symbol("concat"),
            Value::symbol("xs"),
            Value::list(vec![Value::symbol("quote"), Value::list(vec![])]),
        ]);
        assert!(wisp_eq(&v, &expected));
    }

    #[test]
    fn plain_element_expands_to_cons() {
        let tmpl = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let v = quasiquote(&tmpl);
        let expected = Value::list(vec![
            Value::symbol("cons"),
            Value::list(vec![Value::symbol("quote"), Value::Int(1)]),
            Value::list(vec![
                Value::symbol("cons"),
                Value::list(vec![Value::symbol("quote"), Value::Int(2)]),
                Value::list(vec![Value::symbol("quote"), Value::list(vec![])]),
            ]),
        ]);
        assert!(wisp_eq(&v, &expected));
    }
}
