//! Pipeline integration tests: lexer through evaluator, in-process, the way
//! the driver itself composes the crates.

use wisp_print::pr_str;
use wisp_read::read_str;
use wisp_value::Value;

fn eval_one(env: &std::rc::Rc<std::cell::RefCell<wisp_value::Env>>, source: &str) -> Value {
    let form = read_str(source).unwrap().expect("non-empty source");
    wisp_eval::eval(form, env.clone()).expect("form should evaluate")
}

#[test]
fn arithmetic_and_def_round_trip_through_print() {
    let env = wisp_repl::bootstrapped_env();
    let result = eval_one(&env, "(def! x (* (+ 1 2) 3))");
    assert_eq!(pr_str(&result), "9");
    assert_eq!(pr_str(&eval_one(&env, "x")), "9");
}

#[test]
fn closures_capture_their_defining_environment() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(&env, "(def! make-adder (fn* (n) (fn* (x) (+ x n))))");
    eval_one(&env, "(def! add5 (make-adder 5))");
    assert_eq!(pr_str(&eval_one(&env, "(add5 10)")), "15");
}

#[test]
fn tail_calls_do_not_grow_the_host_stack() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(
        &env,
        "(def! count-to (fn* (n acc) (if (= n acc) acc (count-to n (+ acc 1)))))",
    );
    assert_eq!(pr_str(&eval_one(&env, "(count-to 100000 0)")), "100000");
}

#[test]
fn macros_receive_unevaluated_arguments() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(
        &env,
        "(defmacro! unless (fn* (pred a b) `(if ~pred ~b ~a)))",
    );
    assert_eq!(pr_str(&eval_one(&env, "(unless false 7 8)")), "7");
}

#[test]
fn quasiquote_splices_and_quotes() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(&env, "(def! xs (list 2 3))");
    assert_eq!(
        pr_str(&eval_one(&env, "`(1 ~@xs 4)")),
        "(1 2 3 4)"
    );
}

#[test]
fn atoms_mutate_through_swap_and_reset() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(&env, "(def! counter (atom 0))");
    eval_one(&env, "(swap! counter + 1)");
    eval_one(&env, "(swap! counter + 1)");
    assert_eq!(pr_str(&eval_one(&env, "@counter")), "2");
    assert_eq!(pr_str(&eval_one(&env, "(reset! counter 41)")), "41");
}

#[test]
fn cross_kind_list_vector_equality() {
    let env = wisp_repl::bootstrapped_env();
    assert_eq!(pr_str(&eval_one(&env, "(= (list 1 2) [1 2])")), "true");
}

#[test]
fn or_and_cond_bootstrap_macros_short_circuit() {
    let env = wisp_repl::bootstrapped_env();
    assert_eq!(pr_str(&eval_one(&env, "(or false nil 3)")), "3");
    assert_eq!(
        pr_str(&eval_one(&env, "(cond false 1 true 2)")),
        "2"
    );
}

#[test]
fn throw_unwinds_to_the_caller_with_its_payload() {
    let env = wisp_repl::bootstrapped_env();
    let form = read_str("(throw {:msg \"boom\"})").unwrap().unwrap();
    let err = wisp_eval::eval(form, env).unwrap_err();
    match err {
        wisp_eval::EvalError::User(v) => assert_eq!(pr_str(&v), "{:msg \"boom\"}"),
        other => panic!("expected a User error, got {other:?}"),
    }
}

#[test]
fn undefined_symbols_report_their_name() {
    let env = wisp_repl::bootstrapped_env();
    let form = read_str("never-defined").unwrap().unwrap();
    let err = wisp_eval::eval(form, env).unwrap_err();
    assert!(matches!(err, wisp_eval::EvalError::UndefinedSymbol(_)));
}

#[test]
fn division_by_zero_is_a_user_error() {
    let env = wisp_repl::bootstrapped_env();
    let form = read_str("(/ 1 0)").unwrap().unwrap();
    let err = wisp_eval::eval(form, env).unwrap_err();
    assert!(matches!(err, wisp_eval::EvalError::User(_)));
}
