//! The root environment: every native binding a freshly started interpreter
//! starts with. Grouped the way the reference's `core.c` groups them —
//! arithmetic and comparison, printing, sequence operations, hashmaps,
//! atoms, predicates, and the handful of primitives (`eval`, `swap!`,
//! `apply`, `map`) that need to call back into the evaluator itself.

use std::cell::RefCell;
use std::rc::Rc;

use wisp_value::{wisp_cmp, wisp_eq, Env, MapData, Value};

use crate::error::{lift, EvalError, EvalResult};
use crate::eval::{apply, skip_arg_frames};

/// Builds a fresh root environment with every core primitive bound, plus
/// `*host-language*` naming this implementation (read by the bootstrap
/// banner and by MAL's own `*host-language*`-printing startup message).
pub fn root_env() -> Rc<RefCell<Env>> {
    log::debug!("building root environment with {} primitives", NATIVE_FNS.len());
    let env = Env::new_root();
    for (name, f) in NATIVE_FNS.iter().copied() {
        env.borrow_mut()
            .set(Rc::from(name), Value::native_fn(name, f));
    }
    env.borrow_mut()
        .set(Rc::from("*host-language*"), Value::string("wisp (Rust)"));
    env
}

type NativeFn = fn(&[Value], &Rc<RefCell<Env>>) -> EvalResult<Value>;

static NATIVE_FNS: &[(&str, NativeFn)] = &[
    ("+", plus),
    ("-", minus),
    ("*", star),
    ("/", slash),
    ("=", eq),
    ("<", lt),
    ("<=", lte),
    (">", gt),
    (">=", gte),
    ("pr-str", pr_str_fn),
    ("str", str_fn),
    ("prn", prn),
    ("println", println_fn),
    ("list", list),
    ("list?", is_list),
    ("empty?", is_empty),
    ("count", count),
    ("nth", nth),
    ("first", first),
    ("rest", rest),
    ("cons", cons),
    ("concat", concat),
    ("conj", conj),
    ("seq", seq),
    ("sequential?", is_sequential),
    ("vector", vector),
    ("vector?", is_vector),
    ("hash-map", hash_map),
    ("map?", is_map),
    ("get", get),
    ("contains?", contains),
    ("keys", keys),
    ("vals", vals),
    ("assoc", assoc),
    ("dissoc", dissoc),
    ("atom", atom),
    ("atom?", is_atom),
    ("deref", deref),
    ("reset!", reset),
    ("swap!", swap),
    ("read-string", read_string),
    ("slurp", slurp),
    ("eval", eval_prim),
    ("readline", readline),
    ("apply", apply_prim),
    ("map", map_prim),
    ("nil?", is_nil),
    ("true?", is_true),
    ("false?", is_false),
    ("symbol?", is_symbol),
    ("symbol", symbol),
    ("keyword?", is_keyword),
    ("keyword", keyword),
    ("fn?", is_fn),
    ("macro?", is_macro),
    ("number?", is_number),
    ("string?", is_string),
    ("time-ms", time_ms),
    ("meta", meta),
    ("with-meta", with_meta),
    ("env-keys", env_keys),
];

fn type_err(msg: impl Into<String>) -> EvalError {
    EvalError::TypeError(msg.into())
}

fn user_err(msg: impl Into<String>) -> EvalError {
    EvalError::User(Value::string(msg.into()))
}

// --- Arithmetic -------------------------------------------------------

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        _ => None,
    }
}

/// Folds `args` left to right with `int_op`/`float_op`, promoting the whole
/// computation to `Float` the moment any argument is one — matching the
/// reference's `core_plus_`/`core_minus_`/`core_mult_`, which check
/// `MalType_isfloat` on each operand rather than deciding up front.
fn fold_numeric(
    args: &[Value],
    identity: i64,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    if args.is_empty() {
        return Ok(Value::Int(identity));
    }
    let mut acc = args[0].clone();
    if !acc.is_number() {
        return Err(type_err(format!("{} is not a number", acc.type_name())));
    }
    if args.len() == 1 {
        return Ok(acc);
    }
    for next in &args[1..] {
        if !next.is_number() {
            return Err(type_err(format!("{} is not a number", next.type_name())));
        }
        acc = match (&acc, next) {
            (Value::Int(a), Value::Int(b)) => Value::Int(int_op(*a, *b)),
            _ => Value::Float(float_op(as_f64(&acc).unwrap(), as_f64(next).unwrap())),
        };
    }
    Ok(acc)
}

fn plus(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    fold_numeric(args, 0, |a, b| a.wrapping_add(b), |a, b| a + b)
}

fn minus(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    fold_numeric(args, 0, |a, b| a.wrapping_sub(b), |a, b| a - b)
}

fn star(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    fold_numeric(args, 1, |a, b| a.wrapping_mul(b), |a, b| a * b)
}

fn slash(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    if args.is_empty() {
        return Ok(Value::Int(1));
    }
    let mut acc = args[0].clone();
    if !acc.is_number() {
        return Err(type_err(format!("{} is not a number", acc.type_name())));
    }
    for next in &args[1..] {
        let is_zero = match next {
            Value::Int(0) => true,
            Value::Float(n) => n.abs() < f64::EPSILON,
            Value::Int(_) => false,
            other => return Err(type_err(format!("{} is not a number", other.type_name()))),
        };
        if is_zero {
            return Err(user_err("Division by zero"));
        }
        acc = match (&acc, next) {
            (Value::Int(a), Value::Int(b)) => Value::Int(a / b),
            _ => Value::Float(as_f64(&acc).unwrap() / as_f64(next).unwrap()),
        };
    }
    Ok(acc)
}

// --- Comparison ---------------------------------------------------------
// The reference only ever compares the first two arguments; extra
// arguments are accepted but silently ignored rather than erroring.

fn eq(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match (args.first(), args.get(1)) {
        (Some(a), Some(b)) => Ok(Value::Bool(wisp_eq(a, b))),
        _ => Ok(Value::Bool(false)),
    }
}

fn numeric_cmp(args: &[Value], ok: fn(std::cmp::Ordering) -> bool) -> EvalResult<Value> {
    match (args.first(), args.get(1)) {
        (Some(a), Some(b)) if a.is_number() && b.is_number() => {
            Ok(Value::Bool(ok(wisp_cmp(a, b))))
        }
        _ => Ok(Value::Bool(false)),
    }
}

fn lt(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    numeric_cmp(args, |o| o == std::cmp::Ordering::Less)
}

fn lte(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    numeric_cmp(args, |o| o != std::cmp::Ordering::Greater)
}

fn gt(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    numeric_cmp(args, |o| o == std::cmp::Ordering::Greater)
}

fn gte(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    numeric_cmp(args, |o| o != std::cmp::Ordering::Less)
}

// --- Printing ------------------------------------------------------------

fn pr_str_fn(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::string(wisp_print::pr_str_join(args, true, " ")))
}

fn str_fn(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::string(wisp_print::pr_str_join(args, false, "")))
}

fn prn(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    println!("{}", wisp_print::pr_str_join(args, true, " "));
    Ok(Value::Nil)
}

fn println_fn(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    println!("{}", wisp_print::pr_str_join(args, false, " "));
    Ok(Value::Nil)
}

// --- Sequences -----------------------------------------------------------

fn list(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::list(args.to_vec()))
}

fn is_list(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::List(_)))))
}

fn is_empty(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let empty = match args.first() {
        Some(Value::List(s)) | Some(Value::Vector(s)) => s.items.is_empty(),
        Some(Value::Map(m)) => m.entries.is_empty(),
        _ => true,
    };
    Ok(Value::Bool(empty))
}

fn count(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let n = match args.first() {
        Some(Value::List(s)) | Some(Value::Vector(s)) => s.items.len(),
        Some(Value::Map(m)) => m.entries.len(),
        Some(Value::Str(s)) => s.len(),
        _ => 0,
    };
    Ok(Value::Int(n as i64))
}

fn nth(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let items = args
        .first()
        .and_then(Value::items)
        .ok_or_else(|| type_err("nth expects a list or vector"))?;
    let index = match args.get(1) {
        Some(Value::Int(n)) => *n,
        _ => return Err(type_err("nth expects an integer index")),
    };
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or_else(|| user_err("index out of range"))
}

fn first(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        None | Some(Value::Nil) => Ok(Value::Nil),
        Some(v) => {
            let items = v.items().ok_or_else(|| type_err("first expects a sequence"))?;
            Ok(items.first().cloned().unwrap_or(Value::Nil))
        }
    }
}

fn rest(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        None | Some(Value::Nil) => Ok(Value::list(Vec::new())),
        Some(v) => {
            let items = v.items().ok_or_else(|| type_err("rest expects a sequence"))?;
            Ok(Value::list(items.iter().skip(1).cloned().collect()))
        }
    }
}

fn cons(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let head = args.first().cloned().unwrap_or(Value::Nil);
    let tail = args
        .get(1)
        .and_then(Value::items)
        .ok_or_else(|| type_err("cons expects a list or vector as its second argument"))?;
    let mut out = Vec::with_capacity(tail.len() + 1);
    out.push(head);
    out.extend_from_slice(tail);
    Ok(Value::list(out))
}

fn concat(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let mut out = Vec::new();
    for arg in args {
        let items = arg
            .items()
            .ok_or_else(|| type_err("concat expects only lists or vectors"))?;
        out.extend_from_slice(items);
    }
    Ok(Value::list(out))
}

/// `conj` appends onto a list by prepending the extra arguments in reverse
/// order, and onto a vector by appending them in the order given — matching
/// the reference's two separate loops (`(conj '(3) 1 2)` => `(2 1 3)`, but
/// `(conj [3] 1 2)` => `[3 1 2]`).
fn conj(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        Some(Value::List(seq)) => {
            let mut out: Vec<Value> = args[1..].iter().rev().cloned().collect();
            out.extend(seq.items.iter().cloned());
            Ok(Value::list(out))
        }
        Some(Value::Vector(seq)) => {
            let mut out = seq.items.clone();
            out.extend(args[1..].iter().cloned());
            Ok(Value::vector(out))
        }
        _ => Err(type_err("conj expects a list or vector")),
    }
}

fn seq(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        None | Some(Value::Nil) => Ok(Value::Nil),
        Some(Value::List(s)) => Ok(if s.items.is_empty() {
            Value::Nil
        } else {
            Value::List(s.clone())
        }),
        Some(Value::Vector(s)) => Ok(if s.items.is_empty() {
            Value::Nil
        } else {
            Value::list(s.items.clone())
        }),
        Some(Value::Str(s)) => Ok(if s.is_empty() {
            Value::Nil
        } else {
            Value::list(s.chars().map(|c| Value::string(c.to_string())).collect())
        }),
        Some(other) => Err(type_err(format!("seq does not accept a {}", other.type_name()))),
    }
}

fn is_sequential(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(args.first().is_some_and(Value::is_sequential)))
}

fn vector(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::vector(args.to_vec()))
}

fn is_vector(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Vector(_)))))
}

// --- Hashmaps --------------------------------------------------------------

fn hash_map(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::map(args))
}

fn is_map(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Map(_)))))
}

/// Returns `nil`, not an error, when the first argument isn't a map —
/// mirroring the reference's `core_get_`, which only special-cases `nil`
/// and otherwise assumes a hashmap without checking.
fn get(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match (args.first(), args.get(1)) {
        (Some(Value::Map(m)), Some(key)) => Ok(m.get(key).cloned().unwrap_or(Value::Nil)),
        _ => Ok(Value::Nil),
    }
}

/// Like `get`, a non-map first argument yields `nil` rather than `false` —
/// an intentionally preserved quirk of the reference implementation rather
/// than a bug; see the design notes for why it's pinned instead of fixed.
fn contains(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match (args.first(), args.get(1)) {
        (Some(Value::Map(m)), Some(key)) => Ok(Value::Bool(m.get(key).is_some())),
        _ => Ok(Value::Nil),
    }
}

fn keys(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        Some(Value::Map(m)) => Ok(Value::list(m.entries.iter().map(|(k, _)| k.clone()).collect())),
        _ => Err(type_err("keys expects a hashmap")),
    }
}

fn vals(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        Some(Value::Map(m)) => Ok(Value::list(m.entries.iter().map(|(_, v)| v.clone()).collect())),
        _ => Err(type_err("vals expects a hashmap")),
    }
}

fn assoc(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let base = match args.first() {
        Some(Value::Map(m)) => (**m).entries.clone(),
        _ => return Err(type_err("assoc expects a hashmap")),
    };
    let mut out = MapData::empty();
    for (k, v) in base {
        out.insert_unsorted(k, v);
    }
    for chunk in args[1..].chunks(2) {
        let value = chunk.get(1).cloned().unwrap_or(Value::Nil);
        out.insert_unsorted(chunk[0].clone(), value);
    }
    out.sort();
    Ok(Value::Map(Rc::new(out)))
}

fn dissoc(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let base = match args.first() {
        Some(Value::Map(m)) => (**m).entries.clone(),
        _ => return Err(type_err("dissoc expects a hashmap")),
    };
    let removals = &args[1..];
    let mut out = MapData::empty();
    for (k, v) in base {
        if !removals.iter().any(|r| wisp_eq(r, &k)) {
            out.insert_unsorted(k, v);
        }
    }
    out.sort();
    Ok(Value::Map(Rc::new(out)))
}

// --- Atoms -----------------------------------------------------------------

fn atom(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::atom(args.first().cloned().unwrap_or(Value::Nil)))
}

fn is_atom(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Atom(_)))))
}

fn deref(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        Some(Value::Atom(cell)) => Ok(cell.borrow().clone()),
        _ => Ok(Value::Nil),
    }
}

fn reset(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        Some(Value::Atom(cell)) => {
            let value = args.get(1).cloned().unwrap_or(Value::Nil);
            *cell.borrow_mut() = value.clone();
            Ok(value)
        }
        _ => Err(type_err("reset! expects an atom")),
    }
}

fn swap(args: &[Value], env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let cell = match args.first() {
        Some(Value::Atom(cell)) => cell,
        _ => return Err(type_err("swap! expects an atom")),
    };
    let f = args
        .get(1)
        .ok_or_else(|| type_err("swap! expects a function"))?;
    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(cell.borrow().clone());
    call_args.extend_from_slice(&args[2..]);
    let result = apply(f, &call_args, env)?;
    *cell.borrow_mut() = result.clone();
    Ok(result)
}

// --- I/O and metaprogramming ------------------------------------------------

fn read_string(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let source = match args.first() {
        Some(Value::Str(s)) => s.clone(),
        _ => return Ok(Value::Nil),
    };
    wisp_read::read_str(&source)
        .map_err(lift)
        .map(|form| form.unwrap_or(Value::Nil))
}

fn slurp(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let path = match args.first() {
        Some(Value::Str(s)) => s.clone(),
        _ => return Ok(Value::Nil),
    };
    std::fs::read_to_string(path.as_ref())
        .map(Value::string)
        .map_err(|e| EvalError::Resource(e.to_string()))
}

/// Evaluates `args[0]` in the frame the call to `eval` itself is running
/// in, skipped past any call-argument frames, so that top-level `def!`s
/// issued from inside `eval` land in the enclosing lexical scope rather
/// than a throwaway parameter frame — matching the reference's walk up
/// `env->outer` while `env->args` is set.
fn eval_prim(args: &[Value], env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let form = match args.first() {
        Some(v) => v.clone(),
        None => return Ok(Value::Nil),
    };
    let target = skip_arg_frames(env);
    crate::eval::eval(form, target)
}

fn readline(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let prompt_str = match args.first() {
        Some(Value::Str(s)) => s.to_string(),
        _ => String::new(),
    };
    Ok(match wisp_util::lineedit::prompt(&prompt_str) {
        Some(line) => Value::string(line),
        None => Value::Nil,
    })
}

fn apply_prim(args: &[Value], env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let f = args
        .first()
        .ok_or_else(|| type_err("apply expects a function"))?;
    let Some((last, middle)) = args[1..].split_last() else {
        return apply(f, &[], env);
    };
    let spread = last
        .items()
        .ok_or_else(|| type_err("apply's last argument must be a list or vector"))?;
    let mut call_args = middle.to_vec();
    call_args.extend_from_slice(spread);
    apply(f, &call_args, env)
}

fn map_prim(args: &[Value], env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let f = args
        .first()
        .ok_or_else(|| type_err("map expects a function"))?;
    let items = args
        .get(1)
        .and_then(Value::items)
        .ok_or_else(|| type_err("map expects a list or vector"))?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(apply(f, std::slice::from_ref(item), env)?);
    }
    Ok(Value::list(out))
}

// --- Type predicates and constructors ---------------------------------------

fn is_nil(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Nil))))
}

fn is_true(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Bool(true)))))
}

fn is_false(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Bool(false)))))
}

fn is_symbol(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Sym(_)))))
}

fn symbol(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        Some(Value::Str(s)) => Ok(Value::symbol(s.clone())),
        _ => Err(type_err("symbol expects a string")),
    }
}

fn is_keyword(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Keyword(_)))))
}

fn keyword(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    match args.first() {
        Some(Value::Keyword(k)) => Ok(Value::Keyword(k.clone())),
        Some(Value::Str(s)) => Ok(Value::keyword(s.trim_start_matches(':').to_string())),
        _ => Err(type_err("keyword expects a string")),
    }
}

fn is_fn(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let ok = match args.first() {
        Some(Value::NativeFn(_)) => true,
        Some(Value::Closure(c)) => !c.is_macro.get(),
        _ => false,
    };
    Ok(Value::Bool(ok))
}

fn is_macro(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(args.first().is_some_and(Value::is_macro)))
}

fn is_number(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(args.first().is_some_and(Value::is_number)))
}

fn is_string(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(args.first(), Some(Value::Str(_)))))
}

fn time_ms(_args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    use std::time::{SystemTime, UNIX_EPOCH};
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| EvalError::Resource(e.to_string()))?;
    Ok(Value::Int(since_epoch.as_millis() as i64))
}

fn meta(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    Ok(args.first().map(Value::meta).unwrap_or(Value::Nil))
}

fn with_meta(args: &[Value], _env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let target = args
        .first()
        .ok_or_else(|| type_err("with-meta expects a value"))?;
    let meta_value = args.get(1).cloned().unwrap_or(Value::Nil);
    Ok(target.with_meta(meta_value))
}

/// Returns the symbols bound directly in the calling frame, skipping past
/// any argument frames first — the reference's `core_env_keys_` walks only
/// `env->dict`, never `env->outer`.
fn env_keys(_args: &[Value], env: &Rc<RefCell<Env>>) -> EvalResult<Value> {
    let target = skip_arg_frames(env);
    let names = target
        .borrow()
        .local_keys()
        .into_iter()
        .map(Value::symbol)
        .collect();
    Ok(Value::list(names))
}
