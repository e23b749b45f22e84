//! The trampoline: `eval(ast, env)` walks the value tree, dispatching on
//! special forms and rebinding `ast`/`env` in place for tail positions
//! instead of recursing, so deeply tail-recursive wisp programs don't blow
//! the host stack.

use std::cell::RefCell;
use std::rc::Rc;

use wisp_value::{Env, MapData, Value};

use crate::error::{EvalError, EvalResult};
use crate::quasiquote::quasiquote;

/// Evaluates `ast` in `env`, looping instead of recursing through every
/// tail position (`let*`'s body, `do`'s last form, the taken branch of
/// `if`, `quasiquote`'s expansion, and a closure's body on application).
pub fn eval(mut ast: Value, mut env: Rc<RefCell<Env>>) -> EvalResult<Value> {
    loop {
        log::trace!("eval step: {}", ast.type_name());
        ast = macroexpand(ast, &env)?;

        let items = match &ast {
            Value::List(seq) => seq.items.clone(),
            _ => return eval_ast(&ast, &env),
        };

        if items.is_empty() {
            return Ok(ast);
        }

        if let Some(sym) = items[0].as_symbol() {
            match sym {
                "def!" => return eval_def(&items, &env),
                "defmacro!" => return eval_defmacro(&items, &env),
                "let*" => {
                    let (body, child) = eval_let_star(&items, &env)?;
                    ast = body;
                    env = child;
                    continue;
                }
                "do" => {
                    let forms = &items[1..];
                    let Some((last, init)) = forms.split_last() else {
                        return Ok(Value::Nil);
                    };
                    for form in init {
                        eval(form.clone(), env.clone())?;
                    }
                    ast = last.clone();
                    continue;
                }
                "if" => {
                    let cond_form = items.get(1).cloned().unwrap_or(Value::Nil);
                    let cond = eval(cond_form, env.clone())?;
                    ast = if cond.is_truthy() {
                        items.get(2).cloned().unwrap_or(Value::Nil)
                    } else {
                        items.get(3).cloned().unwrap_or(Value::Nil)
                    };
                    continue;
                }
                "fn*" => {
                    let params = items.get(1).cloned().unwrap_or(Value::Nil);
                    let body = items.get(2).cloned().unwrap_or(Value::Nil);
                    return Ok(Value::closure(env.clone(), params, body));
                }
                "quote" => return Ok(items.get(1).cloned().unwrap_or(Value::Nil)),
                "quasiquote" => {
                    let target = items.get(1).cloned().unwrap_or(Value::Nil);
                    ast = quasiquote(&target);
                    continue;
                }
                "macroexpand" => {
                    let target = items.get(1).cloned().unwrap_or(Value::Nil);
                    return macroexpand(target, &env);
                }
                "throw" => {
                    let payload = items.get(1).cloned().unwrap_or(Value::Nil);
                    let payload = eval(payload, env.clone())?;
                    return Err(EvalError::User(payload));
                }
                _ => {}
            }
        }

        let evaluated = eval_ast(&ast, &env)?;
        let call_items = evaluated
            .items()
            .expect("eval_ast on a List always returns a List");
        let (f, rest) = call_items
            .split_first()
            .expect("emptiness was handled above");

        match f {
            Value::NativeFn(data) => return (data.func)(rest, &env),
            Value::Closure(c) if !c.is_macro.get() => {
                let new_env = Env::new(c.env.clone(), &c.params, rest)?;
                new_env.borrow_mut().args = true;
                ast = c.body.clone();
                env = new_env;
                continue;
            }
            other => {
                return Err(EvalError::TypeError(format!(
                    "cannot call a value of type {}",
                    other.type_name()
                )))
            }
        }
    }
}

/// Invokes `f` with `args` as a single non-tail call: used by primitives
/// (`apply`, `map`, `swap!`) that need a result back immediately rather
/// than rebinding the trampoline's own `ast`/`env`. `caller_env` is handed
/// through to a `NativeFn` unchanged — it's the frame the call form that
/// invoked `apply`/`map`/`swap!` is itself running in, which is exactly
/// what `eval`/`env-keys` need if called this way.
pub fn apply(f: &Value, args: &[Value], caller_env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match f {
        Value::NativeFn(data) => (data.func)(args, caller_env),
        Value::Closure(c) => {
            let new_env = Env::new(c.env.clone(), &c.params, args)?;
            new_env.borrow_mut().args = true;
            eval(c.body.clone(), new_env)
        }
        other => Err(EvalError::TypeError(format!(
            "cannot call a value of type {}",
            other.type_name()
        ))),
    }
}

/// Repeatedly expands `ast` while it is a list call to a macro, i.e. a
/// list whose head symbol resolves to a closure flagged `is_macro`. The
/// macro is applied to the call's unevaluated tail; its result takes the
/// call's place and is itself checked for being a further macro call.
fn macroexpand(mut ast: Value, env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    loop {
        let macro_closure = match &ast {
            Value::List(seq) if !seq.items.is_empty() => match seq.items[0].as_symbol() {
                Some(sym) => match wisp_value::env::find(env, sym) {
                    Some(Value::Closure(c)) if c.is_macro.get() => Some(c),
                    _ => None,
                },
                None => None,
            },
            _ => None,
        };

        let Some(closure) = macro_closure else {
            return Ok(ast);
        };

        let args = &ast.items().expect("matched above")[1..];
        let new_env = Env::new(closure.env.clone(), &closure.params, args)?;
        new_env.borrow_mut().args = true;
        ast = eval(closure.body.clone(), new_env)?;
    }
}

/// The structural half of evaluation: symbols look themselves up, lists
/// and vectors rebuild themselves with every element evaluated, maps
/// evaluate both keys and values (pairwise, in source order) and re-sort,
/// and anything else is self-evaluating.
fn eval_ast(ast: &Value, env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match ast {
        Value::Sym(s) => wisp_value::env::get(env, s),
        Value::List(seq) => {
            let items = seq
                .items
                .iter()
                .map(|item| eval(item.clone(), env.clone()))
                .collect::<EvalResult<Vec<_>>>()?;
            Ok(Value::list(items))
        }
        Value::Vector(seq) => {
            let items = seq
                .items
                .iter()
                .map(|item| eval(item.clone(), env.clone()))
                .collect::<EvalResult<Vec<_>>>()?;
            Ok(Value::vector(items))
        }
        Value::Map(map) => {
            let mut out = MapData::empty();
            for (k, v) in &map.entries {
                let key = eval(k.clone(), env.clone())?;
                let value = eval(v.clone(), env.clone())?;
                out.insert_unsorted(key, value);
            }
            out.sort();
            Ok(Value::Map(Rc::new(out)))
        }
        other => Ok(other.clone()),
    }
}

fn eval_def(items: &[Value], env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let name = items.get(1).and_then(Value::as_symbol).ok_or_else(|| {
        EvalError::TypeError("def! expects a symbol as its first argument".to_string())
    })?;
    let form = items.get(2).cloned().unwrap_or(Value::Nil);
    let value = eval(form, env.clone())?;
    log::debug!("def! {name}");
    env.borrow_mut().set(Rc::from(name), value.clone());
    Ok(value)
}

fn eval_defmacro(items: &[Value], env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let name = items.get(1).and_then(Value::as_symbol).ok_or_else(|| {
        EvalError::TypeError("defmacro! expects a symbol as its first argument".to_string())
    })?;
    let form = items.get(2).cloned().unwrap_or(Value::Nil);
    let value = eval(form, env.clone())?;
    if let Value::Closure(c) = &value {
        c.is_macro.set(true);
    }
    env.borrow_mut().set(Rc::from(name), value.clone());
    Ok(value)
}

/// `let*`'s bindings form may be a list or a vector of alternating
/// symbol/form pairs; each value is evaluated in the new child frame
/// before the next binding is visible, so later bindings can refer to
/// earlier ones.
fn eval_let_star(
    items: &[Value],
    env: &Rc<RefCell<Env>>,
) -> EvalResult<(Value, Rc<RefCell<Env>>)> {
    let binds = items.get(1).ok_or_else(|| {
        EvalError::TypeError("let* expects a bindings form".to_string())
    })?;
    let pairs = binds.items().ok_or_else(|| {
        EvalError::TypeError("let* bindings must be a list or vector".to_string())
    })?;
    let body = items.get(2).cloned().unwrap_or(Value::Nil);

    let child = Env::new(env.clone(), &Value::Nil, &[])?;
    for pair in pairs.chunks(2) {
        let name = pair[0].as_symbol().ok_or_else(|| {
            EvalError::TypeError("let* binding names must be symbols".to_string())
        })?;
        let value_form = pair.get(1).cloned().unwrap_or(Value::Nil);
        let value = eval(value_form, child.clone())?;
        child.borrow_mut().set(Rc::from(name), value);
    }

    Ok((body, child))
}

/// Walks up the frame chain skipping every consecutive frame whose `args`
/// flag is set (the parameter frames closures create on application),
/// stopping at the first lexical frame that isn't one. Used by the `eval`
/// primitive to find "the environment this call-site actually lives in"
/// rather than evaluating in whatever frame happened to be captured when
/// the primitive was constructed.
pub fn skip_arg_frames(env: &Rc<RefCell<Env>>) -> Rc<RefCell<Env>> {
    let mut current = env.clone();
    loop {
        let (is_args, outer) = {
            let borrowed = current.borrow();
            (borrowed.args, borrowed.outer.clone())
        };
        match outer {
            Some(o) if is_args => current = o,
            _ => return current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::root_env;
    use wisp_read::read_str;
    use wisp_value::wisp_eq;

    fn run(env: &Rc<RefCell<Env>>, source: &str) -> Value {
        let form = read_str(source).unwrap().expect("non-empty source");
        eval(form, env.clone()).expect("form should evaluate")
    }

    #[test]
    fn self_evaluating_forms_return_themselves() {
        let env = root_env();
        assert!(wisp_eq(&run(&env, "42"), &Value::Int(42)));
        assert!(wisp_eq(&run(&env, "nil"), &Value::Nil));
        assert!(wisp_eq(&run(&env, "\"hi\""), &Value::string("hi")));
        assert!(wisp_eq(&run(&env, "[1 2]"), &Value::vector(vec![Value::Int(1), Value::Int(2)])));
    }

    #[test]
    fn empty_list_evaluates_to_itself() {
        let env = root_env();
        assert!(wisp_eq(&run(&env, "()"), &Value::list(Vec::new())));
    }

    #[test]
    fn if_with_no_else_branch_defaults_to_nil() {
        let env = root_env();
        assert!(wisp_eq(&run(&env, "(if false 1)"), &Value::Nil));
    }

    #[test]
    fn do_with_no_forms_is_nil() {
        let env = root_env();
        assert!(wisp_eq(&run(&env, "(do)"), &Value::Nil));
    }

    #[test]
    fn let_star_bindings_see_earlier_bindings_in_the_same_form() {
        let env = root_env();
        assert!(wisp_eq(&run(&env, "(let* (a 1 b (+ a 1)) b)"), &Value::Int(2)));
    }

    #[test]
    fn quote_suppresses_evaluation_of_its_argument() {
        let env = root_env();
        let result = run(&env, "(quote (1 2 undefined-sym))");
        assert!(wisp_eq(
            &result,
            &Value::list(vec![Value::Int(1), Value::Int(2), Value::symbol("undefined-sym")])
        ));
    }

    #[test]
    fn tail_recursive_function_does_not_blow_the_host_stack() {
        let env = root_env();
        run(
            &env,
            "(def! f (fn* (n) (if (= n 0) :ok (f (- n 1)))))",
        );
        assert!(wisp_eq(&run(&env, "(f 50000)"), &Value::keyword("ok")));
    }

    #[test]
    fn macro_args_are_passed_unevaluated_and_result_is_evaluated_in_caller_env() {
        let env = root_env();
        run(&env, "(defmacro! m (fn* (x) (list '+ x x)))");
        let result = run(&env, "(m (do (def! a 5) a))");
        assert!(wisp_eq(&result, &Value::Int(10)));
        assert!(wisp_eq(&run(&env, "a"), &Value::Int(5)));
    }

    #[test]
    fn macroexpand_special_form_expands_without_evaluating() {
        let env = root_env();
        run(&env, "(defmacro! ident (fn* (x) x))");
        let result = run(&env, "(macroexpand (ident (+ 1 2)))");
        assert!(wisp_eq(
            &result,
            &Value::list(vec![Value::symbol("+"), Value::Int(1), Value::Int(2)])
        ));
    }

    #[test]
    fn throw_unwinds_as_a_user_error_carrying_its_payload() {
        let env = root_env();
        let form = read_str("(throw \"boom\")").unwrap().unwrap();
        match eval(form, env) {
            Err(EvalError::User(v)) => assert!(wisp_eq(&v, &Value::string("boom"))),
            other => panic!("expected a user error, got {other:?}"),
        }
    }

    #[test]
    fn calling_a_non_function_is_a_type_error() {
        let env = root_env();
        let form = read_str("(1 2 3)").unwrap().unwrap();
        assert!(matches!(eval(form, env), Err(EvalError::TypeError(_))));
    }

    #[test]
    fn undefined_symbol_lookup_fails_with_the_right_kind() {
        let env = root_env();
        let form = read_str("undefined-name").unwrap().unwrap();
        assert!(matches!(eval(form, env), Err(EvalError::UndefinedSymbol(_))));
    }

    #[test]
    fn closures_capture_the_defining_lexical_scope() {
        let env = root_env();
        run(&env, "(def! make-adder (fn* (n) (fn* (x) (+ x n))))");
        run(&env, "(def! add10 (make-adder 10))");
        assert!(wisp_eq(&run(&env, "(add10 5)"), &Value::Int(15)));
    }

    #[test]
    fn hashmap_literal_evaluates_keys_and_values_pairwise() {
        let env = root_env();
        run(&env, "(def! k :a)");
        let result = run(&env, "{k (+ 1 2)}");
        if let Value::Map(m) = &result {
            assert!(wisp_eq(
                m.get(&Value::keyword("a")).unwrap(),
                &Value::Int(3)
            ));
        } else {
            panic!("expected a hashmap");
        }
    }
}
