mod common;

use pretty_assertions::assert_eq;

use common::{run, run_ok, session};
use treelox::reporter::Reporter;

#[test]
fn test_arithmetic_and_precedence() {
    assert_eq!(
        run_ok(
            "print 1 + 2 * 3;\n\
             print 2 - 3 - 4;\n\
             print (1 + 2) * 3;\n\
             print 10 / 4;\n\
             print -(-3);\n\
             print 1 / 0 > 1000000;\n\
             print 1 / 0;\n\
             print -1 / 0;\n\
             print 0 / 0;"
        ),
        vec!["7", "-5", "9", "2.5", "3", "true", "Infinity", "-Infinity", "NaN"]
    );
}

#[test]
fn test_strings_and_equality() {
    assert_eq!(
        run_ok(
            "print \"foo\" + \"bar\";\n\
             print \"a\" == \"a\";\n\
             print 1 == \"1\";\n\
             print nil == nil;\n\
             print nil == false;\n\
             print 0 != false;\n\
             print !nil;"
        ),
        vec!["foobar", "true", "false", "true", "false", "true", "true"]
    );
}

#[test]
fn test_truthiness_and_logical_operators() {
    assert_eq!(
        run_ok(
            "if (0) print \"zero is truthy\";\n\
             if (\"\") print \"empty is truthy\";\n\
             print nil or \"default\";\n\
             print 1 and 2;\n\
             print false and undefined;\n\
             print \"first\" or undefined;"
        ),
        vec![
            "zero is truthy",
            "empty is truthy",
            "default",
            "2",
            "false",
            "first",
        ]
    );
}

#[test]
fn test_type_errors() {
    let outcome = run("print 1 + \"a\";");
    assert!(outcome.had_runtime_error);
    assert!(!outcome.had_error);
    assert_eq!(
        outcome.errors,
        vec!["Operands must be two numbers or two strings.\n[line 1]"]
    );

    assert_eq!(
        run("print -\"a\";").errors,
        vec!["Operand must be a number.\n[line 1]"]
    );

    assert_eq!(
        run("print 1 <\n true;").errors,
        vec!["Operands must be numbers.\n[line 1]"]
    );
}

#[test]
fn test_runtime_error_stops_but_keeps_prior_output() {
    let outcome = run("print 1;\nprint missing;\nprint 2;");

    assert_eq!(outcome.output, vec!["1"]);
    assert_eq!(outcome.errors, vec!["Undefined variable 'missing'.\n[line 2]"]);
    assert!(outcome.had_runtime_error);
}

#[test]
fn test_assignment_to_undefined_global() {
    assert_eq!(
        run("x = 1;").errors,
        vec!["Undefined variable 'x'.\n[line 1]"]
    );
}

#[test]
fn test_blocks_shadow_and_restore() {
    assert_eq!(
        run_ok(
            "var a = \"outer\";\n\
             {\n\
               var a = \"inner\";\n\
               print a;\n\
             }\n\
             print a;"
        ),
        vec!["inner", "outer"]
    );
}

#[test]
fn test_environment_restored_after_runtime_error() {
    let (mut lox, out) = session();

    lox.run("var a = \"global\"; { var a = \"local\"; print nope; }");
    assert!(lox.reporter().had_runtime_error());
    lox.reset_errors();

    lox.run("print a;");
    assert!(!lox.reporter().had_runtime_error());
    assert_eq!(out.lines(), vec!["global"]);
}

#[test]
fn test_closures_bind_at_resolution_time() {
    assert_eq!(
        run_ok(
            "var a = \"global\";\n\
             {\n\
               fun show() { print a; }\n\
               show();\n\
               var a = \"block\";\n\
               show();\n\
               print a;\n\
             }"
        ),
        vec!["global", "global", "block"]
    );
}

#[test]
fn test_counters_are_independent() {
    assert_eq!(
        run_ok(
            "fun makeCounter() {\n\
               var i = 0;\n\
               fun count() { i = i + 1; return i; }\n\
               return count;\n\
             }\n\
             var a = makeCounter();\n\
             var b = makeCounter();\n\
             print a();\n\
             print a();\n\
             print b();\n\
             print a();"
        ),
        vec!["1", "2", "1", "3"]
    );
}

#[test]
fn test_control_flow() {
    assert_eq!(
        run_ok(
            "var i = 0;\n\
             while (i < 3) { print i; i = i + 1; }\n\
             for (var j = 0; j < 2; j = j + 1) print j * 10;\n\
             if (i == 3) print \"then\"; else print \"else\";"
        ),
        vec!["0", "1", "2", "0", "10", "then"]
    );
}

#[test]
fn test_return_unwinds_nested_blocks_and_loops() {
    assert_eq!(
        run_ok(
            "fun find(limit) {\n\
               for (var i = 0; i < 100; i = i + 1) {\n\
                 { if (i == limit) return i; }\n\
               }\n\
               return \"none\";\n\
             }\n\
             print find(4);\n\
             fun nothing() { return; }\n\
             print nothing();\n\
             fun implicit() {}\n\
             print implicit();"
        ),
        vec!["4", "nil", "nil"]
    );
}

#[test]
fn test_recursion() {
    assert_eq!(
        run_ok(
            "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }\n\
             print fib(15);"
        ),
        vec!["610"]
    );
}

#[test]
fn test_deep_recursion_below_the_limit() {
    assert_eq!(
        run_ok(
            "fun depth(n) { if (n == 0) return 0; return depth(n - 1) + 1; }\n\
             print depth(1000);"
        ),
        vec!["1000"]
    );
}

#[test]
fn test_unbounded_recursion_is_a_runtime_error() {
    let (mut lox, out) = session();

    lox.run("fun forever(n) { return forever(n + 1) + 1; }\nforever(0);");

    assert!(lox.reporter().had_runtime_error());
    assert!(!lox.reporter().had_error());
    assert_eq!(lox.reporter().messages(), vec!["Stack overflow.\n[line 1]"]);

    // Frames and the call depth unwind, so the session stays usable.
    lox.reset_errors();
    lox.run(
        "fun twice(n) { if (n == 0) return 0; return twice(n - 1) + 2; }\n\
         print twice(500);",
    );

    assert!(!lox.reporter().had_runtime_error());
    assert_eq!(out.lines(), vec!["1000"]);
}

#[test]
fn test_call_errors() {
    assert_eq!(
        run("fun f(a, b) {}\nf(1);").errors,
        vec!["Expected 2 arguments but got 1.\n[line 2]"]
    );

    assert_eq!(
        run("\"not a function\"();").errors,
        vec!["Can only call functions and classes.\n[line 1]"]
    );
}

#[test]
fn test_callable_display_and_clock() {
    assert_eq!(
        run_ok(
            "fun f() {}\n\
             print f;\n\
             print clock;\n\
             print clock() > 0;"
        ),
        vec!["<fn f>", "<native fn>", "true"]
    );
}

#[test]
fn test_session_state_persists_between_runs() {
    let (mut lox, out) = session();

    lox.run("var count = 0; fun bump() { count = count + 1; return count; }");
    lox.run("print bump();");
    lox.run("{ var local = 10; fun addLocal(n) { return local + n; } print addLocal(bump()); }");
    lox.run("print count;");

    assert!(!lox.reporter().had_error());
    assert!(!lox.reporter().had_runtime_error());
    assert_eq!(out.lines(), vec!["1", "12", "2"]);
}

#[test]
fn test_closure_survives_across_runs() {
    let (mut lox, out) = session();

    lox.run("fun make() { var n = 0; fun next() { n = n + 1; return n; } return next; }");
    lox.run("var next = make();");
    lox.run("print next();");
    lox.run("print next();");

    assert_eq!(out.lines(), vec!["1", "2"]);
}

#[test]
fn test_static_error_skips_whole_unit() {
    let outcome = run("print \"never\";\nprint (;");

    assert!(outcome.had_error);
    assert!(outcome.output.is_empty());
    assert_eq!(
        outcome.errors,
        vec!["[line 2] Error at ';': Expect expression."]
    );
}

#[test]
fn test_scan_errors_are_reported_with_line() {
    let outcome = run("print 1;\n@");

    assert!(outcome.had_error);
    assert!(outcome.output.is_empty());
    assert_eq!(outcome.errors, vec!["[line 2] Error: Unexpected character: @"]);
}
