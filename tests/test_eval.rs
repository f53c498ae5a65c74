//! End-to-end tests for the bundle script interpreter: parse source text,
//! execute it in a fresh scope, and inspect the resulting bindings.

extern crate understudy;

use understudy::parser::parse_to_ast;
use understudy::runner::ds::error::ScriptError;
use understudy::runner::ds::scope::Scope;
use understudy::runner::ds::value::Value;
use understudy::runner::eval::{execute_body, EvalContext, ExecLimits};

/// Parses and runs a script in a fresh root scope, returning the scope for
/// inspection.
fn run(code: &str) -> Result<Scope, ScriptError> {
    let program = parse_to_ast(code).expect("test script failed to parse");
    let scope = Scope::new_root();
    let mut ctx = EvalContext::default();
    execute_body(&program.body, &scope, &mut ctx)?;
    Ok(scope)
}

/// Runs a script and returns the named binding from the root scope.
fn run_get(code: &str, name: &str) -> Value {
    let scope = run(code).expect("test script failed to run");
    scope
        .lookup(name)
        .unwrap_or_else(|| panic!("binding '{}' not found", name))
}

/// Runs a script that is expected to fail and returns the error.
fn run_err(code: &str) -> ScriptError {
    match run(code) {
        Ok(_) => panic!("script was expected to fail"),
        Err(e) => e,
    }
}

// ============================================================================
// Arithmetic and coercion
// ============================================================================

#[test]
fn test_integer_addition() {
    assert_eq!(run_get("var r = 1 + 2;", "r"), Value::int(3));
}

#[test]
fn test_division_always_floats() {
    assert_eq!(run_get("var r = 7 / 2;", "r"), Value::float(3.5));
}

#[test]
fn test_modulo() {
    assert_eq!(run_get("var r = 7 % 3;", "r"), Value::int(1));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        run_get("var r = 'hello' + ' ' + 'world';", "r"),
        Value::str("hello world")
    );
}

#[test]
fn test_number_string_concatenation() {
    assert_eq!(run_get("var r = 'item ' + 3;", "r"), Value::str("item 3"));
    assert_eq!(run_get("var r = 1 + '2';", "r"), Value::str("12"));
}

#[test]
fn test_unary_minus_and_plus() {
    assert_eq!(run_get("var r = -5;", "r"), Value::int(-5));
    assert_eq!(run_get("var r = +'42';", "r"), Value::int(42));
}

#[test]
fn test_precedence_with_parens() {
    assert_eq!(run_get("var r = 2 * (3 + 4);", "r"), Value::int(14));
    assert_eq!(run_get("var r = 2 + 3 * 4;", "r"), Value::int(14));
}

#[test]
fn test_hex_literal_past_i64_falls_back_to_float() {
    assert_eq!(run_get("var r = 0xFF;", "r"), Value::int(255));
    // 2^64 does not fit an i64 but survives as a float, like an oversized
    // decimal literal.
    assert_eq!(
        run_get("var r = 0x10000000000000000;", "r"),
        Value::float(18446744073709551616.0)
    );
}

#[test]
fn test_string_comparison_is_lexicographic() {
    assert_eq!(run_get("var r = 'apple' < 'banana';", "r"), Value::Boolean(true));
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn test_strict_vs_loose_equality() {
    assert_eq!(run_get("var r = 1 == '1';", "r"), Value::Boolean(true));
    assert_eq!(run_get("var r = 1 === '1';", "r"), Value::Boolean(false));
    assert_eq!(run_get("var r = null == undefined;", "r"), Value::Boolean(true));
    assert_eq!(run_get("var r = null === undefined;", "r"), Value::Boolean(false));
}

#[test]
fn test_object_identity_equality() {
    assert_eq!(
        run_get("var a = {}; var b = {}; var r = a === b;", "r"),
        Value::Boolean(false)
    );
    assert_eq!(
        run_get("var a = {}; var b = a; var r = a === b;", "r"),
        Value::Boolean(true)
    );
}

// ============================================================================
// Variables and assignment
// ============================================================================

#[test]
fn test_var_let_const_declarations() {
    assert_eq!(run_get("var x = 42;", "x"), Value::int(42));
    assert_eq!(run_get("let y = 'hi';", "y"), Value::str("hi"));
    assert_eq!(run_get("const z = true;", "z"), Value::Boolean(true));
}

#[test]
fn test_reassignment_and_compound_assignment() {
    assert_eq!(run_get("var x = 5; x = 10;", "x"), Value::int(10));
    assert_eq!(run_get("var x = 5; x += 3;", "x"), Value::int(8));
    assert_eq!(run_get("var x = 5; x -= 3;", "x"), Value::int(2));
}

#[test]
fn test_const_assignment_fails() {
    match run_err("const x = 1; x = 2;") {
        ScriptError::Type(msg) => assert!(msg.contains("constant")),
        other => panic!("expected a type error, got {:?}", other),
    }
}

#[test]
fn test_const_without_initializer_fails() {
    match run_err("const x;") {
        ScriptError::Syntax(msg) => assert!(msg.contains("missing initializer")),
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_assignment_to_undeclared_fails() {
    match run_err("missing = 1;") {
        ScriptError::Reference(msg) => assert!(msg.contains("not defined")),
        other => panic!("expected a reference error, got {:?}", other),
    }
}

#[test]
fn test_update_expressions() {
    assert_eq!(run_get("var i = 1; i++;", "i"), Value::int(2));
    assert_eq!(run_get("var i = 1; i--;", "i"), Value::int(0));
    // Postfix yields the old value.
    assert_eq!(run_get("var i = 1; var r = i++;", "r"), Value::int(1));
}

// ============================================================================
// Hoisting
// ============================================================================

#[test]
fn test_function_declarations_are_hoisted() {
    assert_eq!(
        run_get("var r = double(21); function double(n) { return n * 2; }", "r"),
        Value::int(42)
    );
}

#[test]
fn test_var_names_are_hoisted_as_undefined() {
    assert_eq!(
        run_get("var r = typeof pending; var pending = 1;", "r"),
        Value::str("undefined")
    );
}

#[test]
fn test_var_hoisting_out_of_blocks() {
    assert_eq!(
        run_get("if (true) { var inner = 7; } var r = inner;", "r"),
        Value::int(7)
    );
}

// ============================================================================
// Control flow
// ============================================================================

#[test]
fn test_if_else() {
    assert_eq!(
        run_get("var r; if (1 < 2) { r = 'yes'; } else { r = 'no'; }", "r"),
        Value::str("yes")
    );
    assert_eq!(
        run_get("var r; if (1 > 2) { r = 'yes'; } else { r = 'no'; }", "r"),
        Value::str("no")
    );
}

#[test]
fn test_while_loop() {
    assert_eq!(
        run_get("var sum = 0; var i = 1; while (i <= 4) { sum += i; i++; }", "sum"),
        Value::int(10)
    );
}

#[test]
fn test_for_loop() {
    assert_eq!(
        run_get("var sum = 0; for (var i = 0; i < 5; i++) { sum += i; }", "sum"),
        Value::int(10)
    );
}

#[test]
fn test_break_and_continue() {
    assert_eq!(
        run_get(
            "var sum = 0; for (var i = 0; i < 10; i++) { if (i === 3) { continue; } if (i === 6) { break; } sum += i; }",
            "sum"
        ),
        // 0 + 1 + 2 + 4 + 5
        Value::int(12)
    );
}

#[test]
fn test_continue_still_runs_for_update() {
    assert_eq!(
        run_get(
            "var hits = 0; for (var i = 0; i < 3; i++) { if (i === 1) { continue; } hits++; }",
            "hits"
        ),
        Value::int(2)
    );
}

#[test]
fn test_break_outside_loop_fails() {
    match run_err("break;") {
        ScriptError::Syntax(msg) => assert!(msg.contains("break")),
        other => panic!("expected a syntax error, got {:?}", other),
    }
}

#[test]
fn test_ternary() {
    assert_eq!(run_get("var r = 5 > 3 ? 'big' : 'small';", "r"), Value::str("big"));
}

#[test]
fn test_logical_short_circuit() {
    assert_eq!(run_get("var r = false && missing();", "r"), Value::Boolean(false));
    assert_eq!(run_get("var r = 'first' || missing();", "r"), Value::str("first"));
    // The right side value flows through.
    assert_eq!(run_get("var r = true && 42;", "r"), Value::int(42));
    assert_eq!(run_get("var r = 0 || 'fallback';", "r"), Value::str("fallback"));
}

#[test]
fn test_top_level_return_stops_execution() {
    let scope = run("var x = 1; return; x = 2;").unwrap();
    assert_eq!(scope.lookup("x"), Some(Value::int(1)));
}

// ============================================================================
// Functions and closures
// ============================================================================

#[test]
fn test_function_call_with_missing_args() {
    assert_eq!(
        run_get("function probe(a, b) { return typeof b; } var r = probe(1);", "r"),
        Value::str("undefined")
    );
}

#[test]
fn test_closure_captures_environment() {
    assert_eq!(
        run_get(
            "function makeCounter() { var n = 0; return function () { n += 1; return n; }; } \
             var tick = makeCounter(); tick(); tick(); var r = tick();",
            "r"
        ),
        Value::int(3)
    );
}

#[test]
fn test_closures_are_independent() {
    assert_eq!(
        run_get(
            "function makeCounter() { var n = 0; return function () { n += 1; return n; }; } \
             var a = makeCounter(); var b = makeCounter(); a(); a(); var r = b();",
            "r"
        ),
        Value::int(1)
    );
}

#[test]
fn test_recursion() {
    assert_eq!(
        run_get(
            "function fact(n) { if (n <= 1) { return 1; } return n * fact(n - 1); } var r = fact(6);",
            "r"
        ),
        Value::int(720)
    );
}

#[test]
fn test_calling_non_function_fails() {
    match run_err("var x = 5; x();") {
        ScriptError::Type(msg) => assert!(msg.contains("not a function")),
        other => panic!("expected a type error, got {:?}", other),
    }
}

// ============================================================================
// Objects, arrays, and member access
// ============================================================================

#[test]
fn test_object_member_read_write() {
    assert_eq!(
        run_get("var o = { a: 1 }; o.b = 2; var r = o.a + o.b;", "r"),
        Value::int(3)
    );
}

#[test]
fn test_computed_member_access() {
    assert_eq!(
        run_get("var o = { width: 10 }; var k = 'width'; var r = o[k];", "r"),
        Value::int(10)
    );
}

#[test]
fn test_missing_property_is_undefined() {
    assert_eq!(
        run_get("var o = {}; var r = typeof o.missing;", "r"),
        Value::str("undefined")
    );
}

#[test]
fn test_member_access_on_undefined_fails() {
    match run_err("var u; u.field;") {
        ScriptError::Type(msg) => assert!(msg.contains("undefined")),
        other => panic!("expected a type error, got {:?}", other),
    }
}

#[test]
fn test_array_length_and_index() {
    assert_eq!(run_get("var a = [10, 20, 30]; var r = a.length;", "r"), Value::int(3));
    assert_eq!(run_get("var a = [10, 20, 30]; var r = a[1];", "r"), Value::int(20));
    assert_eq!(
        run_get("var a = [10]; a[0] = 11; var r = a[0];", "r"),
        Value::int(11)
    );
}

#[test]
fn test_array_push() {
    assert_eq!(
        run_get("var a = []; a.push('x'); a.push('y'); var r = a.length;", "r"),
        Value::int(2)
    );
}

#[test]
fn test_array_write_past_end_grows() {
    assert_eq!(
        run_get("var a = [1]; a[3] = 4; var r = a.length;", "r"),
        Value::int(4)
    );
    assert_eq!(
        run_get("var a = [1]; a[3] = 4; var r = typeof a[1];", "r"),
        Value::str("undefined")
    );
}

#[test]
fn test_nested_structures() {
    assert_eq!(
        run_get(
            "var cfg = { items: [{ name: 'a' }, { name: 'b' }] }; var r = cfg.items[1].name;",
            "r"
        ),
        Value::str("b")
    );
}

// ============================================================================
// this, methods, and constructors
// ============================================================================

#[test]
fn test_method_call_binds_this() {
    assert_eq!(
        run_get(
            "var o = { label: 'box', describe: function () { return this.label; } }; var r = o.describe();",
            "r"
        ),
        Value::str("box")
    );
}

#[test]
fn test_new_with_constructor() {
    assert_eq!(
        run_get(
            "function Point(x, y) { this.x = x; this.y = y; } var p = new Point(3, 4); var r = p.x + p.y;",
            "r"
        ),
        Value::int(7)
    );
}

#[test]
fn test_prototype_method_lookup() {
    assert_eq!(
        run_get(
            "function Point(x) { this.x = x; } \
             Point.prototype.double = function () { return this.x * 2; }; \
             var p = new Point(21); var r = p.double();",
            "r"
        ),
        Value::int(42)
    );
}

#[test]
fn test_function_call_rebinds_this() {
    assert_eq!(
        run_get(
            "function describe() { return this.label; } \
             var target = { label: 'bound' }; var r = describe.call(target);",
            "r"
        ),
        Value::str("bound")
    );
}

#[test]
fn test_typeof_reports_types() {
    assert_eq!(run_get("var r = typeof 1;", "r"), Value::str("number"));
    assert_eq!(run_get("var r = typeof 'a';", "r"), Value::str("string"));
    assert_eq!(run_get("var r = typeof true;", "r"), Value::str("boolean"));
    assert_eq!(run_get("var r = typeof {};", "r"), Value::str("object"));
    assert_eq!(
        run_get("var r = typeof function () {};", "r"),
        Value::str("function")
    );
    // Unresolved names do not fault under typeof.
    assert_eq!(run_get("var r = typeof nothing;", "r"), Value::str("undefined"));
}

// ============================================================================
// Thrown values
// ============================================================================

#[test]
fn test_throw_string() {
    match run_err("throw 'boom';") {
        ScriptError::Thrown { rendered, .. } => assert_eq!(rendered, "boom"),
        other => panic!("expected a thrown value, got {:?}", other),
    }
}

#[test]
fn test_throw_error_shaped_object() {
    match run_err("throw { name: 'RangeError', message: 'too wide' };") {
        ScriptError::Thrown { rendered, .. } => assert_eq!(rendered, "RangeError: too wide"),
        other => panic!("expected a thrown value, got {:?}", other),
    }
}

// ============================================================================
// Execution limits
// ============================================================================

#[test]
fn test_infinite_loop_exhausts_budget() {
    let program = parse_to_ast("while (true) { }").unwrap();
    let scope = Scope::new_root();
    let mut ctx = EvalContext::new(ExecLimits {
        max_steps: 10_000,
        max_depth: 32,
    });
    match execute_body(&program.body, &scope, &mut ctx) {
        Err(ScriptError::BudgetExhausted(steps)) => assert_eq!(steps, 10_000),
        other => panic!("expected budget exhaustion, got {:?}", other.err()),
    }
}

#[test]
fn test_runaway_recursion_hits_depth_limit() {
    let program = parse_to_ast("function f() { return f(); } f();").unwrap();
    let scope = Scope::new_root();
    let mut ctx = EvalContext::new(ExecLimits {
        max_steps: 1_000_000,
        max_depth: 64,
    });
    match execute_body(&program.body, &scope, &mut ctx) {
        Err(ScriptError::StackOverflow(depth)) => assert_eq!(depth, 65),
        other => panic!("expected a stack overflow, got {:?}", other.err()),
    }
}
