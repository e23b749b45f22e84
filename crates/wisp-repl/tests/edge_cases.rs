//! Edge cases in the evaluator and value model, exercised end to end
//! through `bootstrapped_env` the way the driver actually builds it.

use wisp_print::pr_str;
use wisp_read::read_str;
use wisp_value::Value;

fn eval_one(env: &std::rc::Rc<std::cell::RefCell<wisp_value::Env>>, source: &str) -> Value {
    let form = read_str(source).unwrap().expect("non-empty source");
    wisp_eval::eval(form, env.clone()).expect("form should evaluate")
}

// ==================== ENVIRONMENT ====================

#[test]
fn inner_let_shadows_outer_binding_without_mutating_it() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(&env, "(def! x 1)");
    assert_eq!(pr_str(&eval_one(&env, "(let* (x 2) x)")), "2");
    assert_eq!(pr_str(&eval_one(&env, "x")), "1");
}

#[test]
fn variadic_rest_param_collects_remaining_args_into_a_list() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(&env, "(def! f (fn* (a & more) more))");
    assert_eq!(pr_str(&eval_one(&env, "(f 1 2 3)")), "(2 3)");
    assert_eq!(pr_str(&eval_one(&env, "(f 1)")), "()");
}

// ==================== SEQUENCES ====================

#[test]
fn conj_prepends_onto_lists_and_appends_onto_vectors() {
    let env = wisp_repl::bootstrapped_env();
    assert_eq!(pr_str(&eval_one(&env, "(conj (list 3) 1 2)")), "(2 1 3)");
    assert_eq!(pr_str(&eval_one(&env, "(conj [3] 1 2)")), "[3 1 2]");
}

#[test]
fn first_and_rest_treat_nil_as_the_empty_sequence() {
    let env = wisp_repl::bootstrapped_env();
    assert_eq!(pr_str(&eval_one(&env, "(first nil)")), "nil");
    assert_eq!(pr_str(&eval_one(&env, "(rest nil)")), "()");
}

#[test]
fn nth_out_of_range_is_a_user_error_not_a_panic() {
    let env = wisp_repl::bootstrapped_env();
    let form = read_str("(nth (list 1 2) 5)").unwrap().unwrap();
    let err = wisp_eval::eval(form, env).unwrap_err();
    assert!(matches!(err, wisp_eval::EvalError::User(_)));
}

// ==================== HASHMAPS ====================

#[test]
fn assoc_and_dissoc_return_fresh_maps() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(&env, "(def! m {:a 1})");
    assert_eq!(pr_str(&eval_one(&env, "(assoc m :b 2)")), "{:a 1 :b 2}");
    assert_eq!(pr_str(&eval_one(&env, "m")), "{:a 1}");
    assert_eq!(pr_str(&eval_one(&env, "(dissoc m :a)")), "{}");
}

#[test]
fn contains_on_a_non_map_returns_nil_not_false() {
    // Preserves the reference implementation's own quirk: `contains?`
    // on anything other than a hashmap answers `nil`, never `false`.
    let env = wisp_repl::bootstrapped_env();
    assert_eq!(pr_str(&eval_one(&env, "(contains? [1 2] 0)")), "nil");
}

#[test]
fn get_on_a_non_map_returns_nil() {
    let env = wisp_repl::bootstrapped_env();
    assert_eq!(pr_str(&eval_one(&env, "(get nil :a)")), "nil");
}

// ==================== HIGHER-ORDER PRIMITIVES ====================

#[test]
fn apply_spreads_the_final_sequence_argument() {
    let env = wisp_repl::bootstrapped_env();
    assert_eq!(pr_str(&eval_one(&env, "(apply + 1 2 (list 3 4))")), "10");
}

#[test]
fn map_applies_a_function_across_a_sequence() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(&env, "(def! double (fn* (x) (* x 2)))");
    assert_eq!(pr_str(&eval_one(&env, "(map double (list 1 2 3))")), "(2 4 6)");
}

#[test]
fn eval_runs_in_the_enclosing_scope_not_a_captured_one() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(&env, "(def! set-y (fn* () (eval (list 'def! 'y 99))))");
    eval_one(&env, "(set-y)");
    assert_eq!(pr_str(&eval_one(&env, "y")), "99");
}

// ==================== PREDICATES ====================

#[test]
fn fn_predicate_is_true_for_closures_and_natives_but_not_macros() {
    let env = wisp_repl::bootstrapped_env();
    eval_one(&env, "(def! f (fn* (x) x))");
    eval_one(&env, "(defmacro! m (fn* (x) x))");
    assert_eq!(pr_str(&eval_one(&env, "(fn? f)")), "true");
    assert_eq!(pr_str(&eval_one(&env, "(fn? +)")), "true");
    assert_eq!(pr_str(&eval_one(&env, "(fn? m)")), "false");
    assert_eq!(pr_str(&eval_one(&env, "(macro? m)")), "true");
}

#[test]
fn read_string_parses_without_evaluating() {
    let env = wisp_repl::bootstrapped_env();
    assert_eq!(
        pr_str(&eval_one(&env, "(read-string \"(+ 1 2)\")")),
        "(+ 1 2)"
    );
}
