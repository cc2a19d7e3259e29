use pretty_assertions::assert_eq;

use treelox::ast::{Expr, ExprId, ExprKind, Stmt};
use treelox::ast_printer::AstPrinter;
use treelox::parser::Parser;
use treelox::reporter::{CollectingReporter, Reporter};
use treelox::scanner::Scanner;
use treelox::token::Token;

fn parse(source: &str) -> (Vec<Stmt>, CollectingReporter) {
    let mut reporter = CollectingReporter::new();
    let tokens: Vec<Token> = Scanner::new(source).scan_tokens(&mut reporter);
    let statements: Vec<Stmt> = Parser::new(&tokens, &mut reporter).parse();

    (statements, reporter)
}

/// Parses a program that must be error free and prints each statement.
fn printed(source: &str) -> Vec<String> {
    let (statements, reporter) = parse(source);
    assert!(
        !reporter.had_error(),
        "unexpected diagnostics: {:?}",
        reporter.messages()
    );

    statements.iter().map(AstPrinter::print_stmt).collect()
}

fn expression(source: &str) -> String {
    let mut reporter = CollectingReporter::new();
    let tokens: Vec<Token> = Scanner::new(source).scan_tokens(&mut reporter);
    let expr: Expr = Parser::new(&tokens, &mut reporter)
        .parse_expression()
        .expect("expression should parse");

    AstPrinter::print(&expr)
}

#[test]
fn test_precedence_and_associativity() {
    assert_eq!(expression("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
    assert_eq!(expression("2 - 3 - 4"), "(- (- 2.0 3.0) 4.0)");
    assert_eq!(expression("(1 + 2) * 3"), "(* (group (+ 1.0 2.0)) 3.0)");
    assert_eq!(expression("-!x"), "(- (! x))");
    assert_eq!(expression("1 < 2 == true"), "(== (< 1.0 2.0) true)");
    assert_eq!(expression("a or b and c"), "(or a (and b c))");
    assert_eq!(expression("2.5 / \"s\""), "(/ 2.5 s)");
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(expression("a = b = c"), "(= a (= b c))");
    assert_eq!(expression("a.b.c = 1"), "(= (. (. a b) c) 1.0)");
}

#[test]
fn test_calls_and_property_access_chain() {
    assert_eq!(expression("a.b(c).d"), "(. (call (. a b) c) d)");
    assert_eq!(expression("f(1)(2, 3)"), "(call (call f 1.0) 2.0 3.0)");
    assert_eq!(expression("super.method"), "(super method)");
    assert_eq!(expression("this.x"), "(. this x)");
}

#[test]
fn test_for_loop_is_desugared() {
    assert_eq!(
        printed("for (var i = 0; i < 3; i = i + 1) print i;"),
        vec!["(block (var i 0.0) (while (< i 3.0) (block (print i) (; (= i (+ i 1.0))))))"]
    );

    assert_eq!(printed("for (;;) print 1;"), vec!["(while true (print 1.0))"]);
}

#[test]
fn test_declarations() {
    assert_eq!(
        printed(
            "var a; var b = \"x\";\n\
             fun add(x, y) { return x + y; }\n\
             class B < A { init(x) { this.x = x; } get() { return; } }"
        ),
        vec![
            "(var a)",
            "(var b x)",
            "(fun add (x y) (return (+ x y)))",
            "(class B < A (fun init (x) (; (= (. this x) x))) (fun get () (return)))",
        ]
    );
}

#[test]
fn test_if_else_binds_to_nearest_if() {
    assert_eq!(
        printed("if (a) if (b) print 1; else print 2;"),
        vec!["(if a (if b (print 1.0) (print 2.0)))"]
    );
}

#[test]
fn test_missing_semicolon_at_end() {
    let (statements, reporter) = parse("print 1");

    assert!(statements.is_empty());
    assert_eq!(
        reporter.messages(),
        vec!["[line 1] Error at end: Expect ';' after value."]
    );
}

#[test]
fn test_synchronize_reports_every_bad_statement() {
    let (statements, reporter) = parse("var = 1;\nprint 2;\nvar y 3;\nprint 4;");

    assert_eq!(
        reporter.messages(),
        vec![
            "[line 1] Error at '=': Expect variable name.",
            "[line 3] Error at '3': Expect ';' after variable declaration.",
        ]
    );

    let printed: Vec<String> = statements.iter().map(AstPrinter::print_stmt).collect();
    assert_eq!(printed, vec!["(print 2.0)", "(print 4.0)"]);
}

#[test]
fn test_invalid_assignment_target_keeps_parsing() {
    let (statements, reporter) = parse("1 = 2; print 3;");

    assert_eq!(
        reporter.messages(),
        vec!["[line 1] Error at '=': Invalid assignment target."]
    );
    assert_eq!(statements.len(), 2);
    assert_eq!(AstPrinter::print_stmt(&statements[0]), "(; 1.0)");
}

#[test]
fn test_too_many_arguments_is_not_fatal() {
    let (statements, reporter) = parse("f(1, 2, 3, 4, 5, 6, 7, 8, 9);");

    assert_eq!(
        reporter.messages(),
        vec!["[line 1] Error at '9': Can't have more than 8 arguments."]
    );
    assert_eq!(statements.len(), 1);

    match &statements[0] {
        Stmt::Expression(Expr {
            kind: ExprKind::Call { arguments, .. },
            ..
        }) => assert_eq!(arguments.len(), 9),
        other => panic!("expected a call statement, got {:?}", other),
    }
}

#[test]
fn test_too_many_parameters_is_not_fatal() {
    let (statements, reporter) = parse("fun f(a, b, c, d, e, f, g, h, i) {}");

    assert_eq!(
        reporter.messages(),
        vec!["[line 1] Error at 'i': Can't have more than 8 parameters."]
    );
    assert_eq!(statements.len(), 1);
}

#[test]
fn test_expect_expression() {
    let (_, reporter) = parse("print );");

    assert_eq!(
        reporter.messages(),
        vec!["[line 1] Error at ')': Expect expression."]
    );
}

#[test]
fn test_parsing_is_deterministic() {
    let source = "fun f(n) { if (n < 2) return n; return f(n - 1) + f(n - 2); } print f(10);";

    let (first, _) = parse(source);
    let (second, _) = parse(source);

    assert_eq!(first, second);
}

#[test]
fn test_expression_ids_are_unique_and_can_be_offset() {
    let mut reporter = CollectingReporter::new();
    let tokens: Vec<Token> = Scanner::new("print a + b;").scan_tokens(&mut reporter);

    let mut parser = Parser::new(&tokens, &mut reporter);
    parser.parse();
    // a, b and the binary node
    assert_eq!(parser.next_id().0, 3);

    let statements: Vec<Stmt> = Parser::new(&tokens, &mut reporter)
        .starting_at(ExprId(3))
        .parse();

    match &statements[0] {
        Stmt::Print(expr) => assert_eq!(expr.id.0, 5),
        other => panic!("expected print, got {:?}", other),
    }
}

