//! wisp-repl - CLI and REPL driver
//!
//! ============================================================================
//! DRIVER OVERVIEW
//! ============================================================================
//!
//! This crate is the program's entry point. It owns the pieces the other
//! crates in the workspace deliberately stay out of:
//!
//! 1. COMMAND LINE PARSING
//!    - `-v` (repeatable) raises the log verbosity
//!    - `-h` prints usage and exits 0 (handled by `clap` itself)
//!    - an optional script path, plus trailing args bound to `*ARGV*`
//!
//! 2. BOOTSTRAPPING
//!    - builds the root environment (`wisp_eval::root_env`)
//!    - evaluates a handful of forms written in wisp itself (`not`,
//!      `load-file`, `cond`, `or`) before any user input is read
//!
//! 3. THE TWO RUN MODES
//!    - script mode: `(load-file SCRIPT)`, then exit
//!    - REPL mode: `user> ` prompts in a loop until EOF, then `goodbye`
//!
//! ============================================================================
//! PIPELINE
//! ============================================================================
//!
//! ```text
//! text ──▶ [lexer] ──▶ tokens ──▶ [reader] ──▶ value tree
//!                                                  │
//!                                                  ▼
//!                                             [evaluator]
//!                                                  │
//!                                                  ▼
//!                                              value ──▶ [printer] ──▶ text
//! ```
//!
//! This driver wires the four crates above end to end; it contains no
//! lexing, reading, evaluation, or printing logic of its own.

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;

use wisp_eval::{root_env, EvalError};
use wisp_value::Value;

/// `prog [-v]* [-h] [SCRIPT [ARG ...]]`
#[derive(Parser, Debug)]
#[command(name = "wisp")]
#[command(about = "a small Lisp interpreter", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Increase verbosity; repeatable (-v, -vv, -vvv).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Script to run. Without one, starts an interactive REPL.
    pub script: Option<PathBuf>,

    /// Arguments passed through to the script as `*ARGV*`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub script_args: Vec<String>,
}

/// `sysexits.h`-style exit codes, matching the reference driver's own use
/// of `EX_OK`/`EX_DATAERR`/`EX_OSERR`.
pub mod exit_code {
    pub const OK: i32 = 0;
    pub const DATAERR: i32 = 65;
    pub const OSERR: i32 = 71;
}

/// Forms evaluated, in order, before any user input — written in wisp
/// itself rather than as primitives, exactly as the reference driver does
/// it. `or` and `cond` are ordinary macros; `not` and `load-file` are
/// ordinary functions built from primitives already in the root env.
const BOOTSTRAP_FORMS: &[&str] = &[
    "(def! not (fn* (a) (if a false true)))",
    r#"(def! load-file (fn* (f) (eval (read-string (str "(do " (slurp f) ")")))))"#,
    "(defmacro! cond (fn* (& xs) (if (> (count xs) 0) (list 'if (first xs) (if (> (count xs) 1) (nth xs 1) (throw \"odd number of forms to cond\")) (cons 'cond (rest (rest xs)))))))",
    "(defmacro! or (fn* (& xs) (if (empty? xs) nil (if (= 1 (count xs)) (first xs) `(let* (or_FIXME ~(first xs)) (if or_FIXME or_FIXME (or ~@(rest xs))))))))",
];

/// Parses and evaluates one form of trusted, hand-written wisp source.
/// Every string in [`BOOTSTRAP_FORMS`] is valid wisp by construction, so a
/// failure here means the driver itself shipped a broken bootstrap form,
/// not something a user could trigger.
fn eval_trusted(env: &std::rc::Rc<std::cell::RefCell<wisp_value::Env>>, source: &str) {
    let form = wisp_read::read_str(source)
        .expect("bootstrap form must lex and parse")
        .expect("bootstrap form must not be empty");
    wisp_eval::eval(form, env.clone()).expect("bootstrap form must evaluate without error");
}

/// Builds a root environment with [`BOOTSTRAP_FORMS`] already evaluated
/// into it. Exposed (not just used internally by [`run`]) so tests can
/// build exactly the environment a running interpreter starts with,
/// `not`/`load-file`/`cond`/`or` included.
pub fn bootstrapped_env() -> std::rc::Rc<std::cell::RefCell<wisp_value::Env>> {
    let env = root_env();
    for form in BOOTSTRAP_FORMS {
        eval_trusted(&env, form);
    }
    env
}

/// Runs the driver to completion and returns the process exit code.
/// `prog_name` seeds the line editor's history file naming, the way the
/// reference's `console_input_init(argv[0])` does.
pub fn run(cli: Cli, prog_name: &str) -> i32 {
    wisp_util::init_logging(cli.verbosity);
    wisp_util::lineedit::init(prog_name);

    let env = bootstrapped_env();

    let argv: Vec<Value> = cli
        .script_args
        .iter()
        .map(|s| Value::string(s.clone()))
        .collect();
    env.borrow_mut()
        .set(Rc::from("*ARGV*"), Value::list(argv));

    let code = match &cli.script {
        Some(script) => run_script(&env, script),
        None => run_interactive(&env),
    };

    wisp_util::lineedit::fini();
    code
}

fn run_script(env: &std::rc::Rc<std::cell::RefCell<wisp_value::Env>>, script: &PathBuf) -> i32 {
    let ast = Value::list(vec![
        Value::symbol("load-file"),
        Value::string(script.display().to_string()),
    ]);
    match wisp_eval::eval(ast, env.clone()) {
        Ok(_) => exit_code::OK,
        Err(e) => {
            eprintln!("{}", describe_error(&e));
            exit_code_for(&e)
        }
    }
}

fn run_interactive(env: &std::rc::Rc<std::cell::RefCell<wisp_value::Env>>) -> i32 {
    eval_trusted(env, r#"(println (str "Mal [" *host-language* "]"))"#);

    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() { "user> " } else { "" };
        let Some(line) = wisp_util::lineedit::prompt(prompt) else {
            break;
        };
        wisp_util::lineedit::history_add(&line);

        if !pending.is_empty() {
            pending.push('\n');
        }
        pending.push_str(&line);

        match wisp_read::read_str(&pending) {
            Ok(None) => {
                pending.clear();
            }
            Ok(Some(form)) => {
                pending.clear();
                match wisp_eval::eval(form, env.clone()) {
                    Ok(value) => println!("{}", wisp_print::pr_str(&value)),
                    Err(e) => eprintln!("{}", describe_error(&e)),
                }
            }
            Err(wisp_util::WispError::Eof) => {
                // The form isn't closed yet; keep the buffer and prompt
                // again for a continuation line instead of discarding it.
            }
            Err(e) => {
                pending.clear();
                eprintln!("{}", describe_error(&wisp_eval::error::lift(e)));
            }
        }
    }

    println!("goodbye");
    exit_code::OK
}

fn describe_error(e: &EvalError) -> String {
    match e {
        EvalError::ParseFailure(_) => "invalid input".to_string(),
        EvalError::TypeError(_) => "type error".to_string(),
        EvalError::UndefinedSymbol(_) => "undefined symbol".to_string(),
        EvalError::Resource(_) => "resources exhausted".to_string(),
        EvalError::User(v) => wisp_print::pr_str(v),
        EvalError::Eof => "unexpected EOF".to_string(),
    }
}

fn exit_code_for(e: &EvalError) -> i32 {
    match e {
        EvalError::Resource(_) => exit_code::OSERR,
        _ => exit_code::DATAERR,
    }
}
