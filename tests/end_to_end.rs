//! End-to-end tests: real source text through `parse_program`, then
//! `execute` against a fresh `MapEnvironment`. These are the distilled
//! spec's worked scenarios (§8), driven through the actual frontend rather
//! than hand-built graphs — the unit tests under `src/run.rs` cover the
//! dispatcher against hand-built graphs directly.

use stepwise::{CollectStringPrint, Environment, MapEnvironment, ScriptedInput, SemanticError, execute, parse_program};

fn run(source: &str, inputs: Vec<&str>) -> (Result<(), SemanticError>, String, MapEnvironment) {
    let (graph, root) = parse_program(source).expect("source should parse");
    let root = root.expect("source should contain at least one statement");
    let mut env = MapEnvironment::new();
    let mut writer = CollectStringPrint::new();
    let mut input = ScriptedInput::new(inputs);
    let result = execute(&graph, root, &mut env, &mut writer, &mut input);
    (result, writer.into_output(), env)
}

// === Arithmetic and assignment ===

#[test]
fn assignment_and_print() {
    let (result, output, _env) = run("x = 7\ny = 5\nprint(x + y)\n", vec![]);
    result.unwrap();
    assert_eq!(output, "12\n");
}

#[test]
fn nested_expression_is_flattened_through_temporaries() {
    // 2 * 3 must flatten to a `__t0` assignment before `1 + __t0` can run.
    let (result, output, _env) = run("x = 1 + 2 * 3\nprint(x)\n", vec![]);
    result.unwrap();
    assert_eq!(output, "7\n");
}

#[test]
fn unary_minus_lowers_to_zero_minus_operand() {
    let (result, output, _env) = run("x = -5\nprint(x)\n", vec![]);
    result.unwrap();
    assert_eq!(output, "-5\n");
}

#[test]
fn boolean_plus_int_is_a_type_error_not_silently_widened() {
    let (result, output, _env) = run("x = True + 1\nprint(x)\n", vec![]);
    assert_eq!(result.unwrap_err(), SemanticError::TypeError { line: 1 });
    assert!(!output.contains('2'));
}

// === Control flow ===

#[test]
fn while_loop_counts() {
    let (result, output, _env) = run("i = 0\nwhile i < 3:\n    print(i)\n    i = i + 1\n", vec![]);
    result.unwrap();
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn if_elif_else_picks_the_matching_branch() {
    let source = "x = 2\nif x == 1:\n    print(\"one\")\nelif x == 2:\n    print(\"two\")\nelse:\n    print(\"other\")\n";
    let (result, output, _env) = run(source, vec![]);
    result.unwrap();
    assert_eq!(output, "two\n");
}

#[test]
fn if_without_else_falls_through_when_false() {
    let (result, output, _env) = run("x = 0\nif x:\n    print(\"truthy\")\nprint(\"done\")\n", vec![]);
    result.unwrap();
    assert_eq!(output, "done\n");
}

// === Errors halt execution before later statements run ===

#[test]
fn divide_by_zero_halts_before_later_print() {
    let (result, output, _env) = run("a = 10\nb = 0\nc = a / b\nprint(\"after\")\n", vec![]);
    assert_eq!(result.unwrap_err(), SemanticError::DivByZero { line: 3 });
    assert_eq!(output, "**SEMANTIC ERROR: divide by 0 (line 3)\n");
    assert!(!output.contains("after"));
}

#[test]
fn undefined_name_is_reported_with_its_line() {
    let (result, output, _env) = run("print(x)\n", vec![]);
    assert_eq!(result.unwrap_err(), SemanticError::NameUndefined { name: "x".into(), line: 1 });
    assert!(output.starts_with("**SEMANTIC ERROR: name 'x' is not defined"));
}

// === Built-ins ===

#[test]
fn input_then_int_then_arithmetic() {
    let (result, output, env) = run("s = input(\"age? \")\nn = int(s)\nprint(n + 1)\n", vec!["41"]);
    result.unwrap();
    assert!(output.starts_with("age? "));
    assert!(output.ends_with("42\n"));
    assert_eq!(env.read_by_name("s"), Some(&stepwise::Value::Str("41".into())));
}

#[test]
fn int_conversion_parses_leading_digits_and_ignores_trailing_garbage() {
    let (result, output, _env) = run("s = \"42abc\"\nn = int(s)\nprint(n)\n", vec![]);
    result.unwrap();
    assert_eq!(output, "42\n");
}

#[test]
fn float_conversion_of_canonical_zero() {
    let (result, output, _env) = run("s = \"00\"\nn = float(s)\nprint(n)\n", vec![]);
    result.unwrap();
    assert_eq!(output, "0.000000\n");
}

// === Pointer-dereferenced assignment ===

#[test]
fn deref_assignment_writes_through_the_addressed_cell() {
    let (result, _output, env) = run("p = 0\nderef(p) = 9\n", vec![]);
    result.unwrap();
    assert_eq!(env.read_by_addr(0), Some(&stepwise::Value::Int(9)));
}
