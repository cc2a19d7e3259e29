mod common;

use pretty_assertions::assert_eq;

use treelox::ast::{ExprKind, Stmt};
use treelox::interpreter::Interpreter;
use treelox::parser::Parser;
use treelox::reporter::{CollectingReporter, Reporter};
use treelox::resolver::Resolver;
use treelox::scanner::Scanner;
use treelox::token::Token;

fn parse(source: &str) -> Vec<Stmt> {
    let mut reporter = CollectingReporter::new();
    let tokens: Vec<Token> = Scanner::new(source).scan_tokens(&mut reporter);
    let statements: Vec<Stmt> = Parser::new(&tokens, &mut reporter).parse();

    assert!(!reporter.had_error(), "{:?}", reporter.messages());
    statements
}

/// Resolution diagnostics for `source`.
fn resolve_errors(source: &str) -> Vec<String> {
    let statements: Vec<Stmt> = parse(source);
    let mut interpreter = Interpreter::new();
    let mut reporter = CollectingReporter::new();

    Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);

    reporter.messages()
}

#[test]
fn test_local_hop_counts() {
    let statements: Vec<Stmt> = parse("var g = 0; { var a = 1; { print a; print g; } }");
    let mut interpreter = Interpreter::new();
    let mut reporter = CollectingReporter::new();

    Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);
    assert!(!reporter.had_error());

    let inner: &[Stmt] = match &statements[1] {
        Stmt::Block(outer) => match &outer[1] {
            Stmt::Block(inner) => inner,
            other => panic!("expected inner block, got {:?}", other),
        },
        other => panic!("expected outer block, got {:?}", other),
    };

    let (a, g) = match (&inner[0], &inner[1]) {
        (Stmt::Print(a), Stmt::Print(g)) => (a, g),
        other => panic!("expected two prints, got {:?}", other),
    };

    assert!(matches!(a.kind, ExprKind::Variable(_)));
    assert_eq!(interpreter.locals().get(&a.id), Some(&1));
    // globals stay unannotated
    assert_eq!(interpreter.locals().get(&g.id), None);
}

#[test]
fn test_resolution_is_idempotent() {
    let source = "fun outer() { var x = 1; fun inner() { return x; } return inner; }\n\
                  class A { m() { return this; } }\n\
                  class B < A { m() { return super.m(); } }";
    let statements: Vec<Stmt> = parse(source);

    let mut interpreter = Interpreter::new();
    let mut reporter = CollectingReporter::new();

    Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);
    let first = interpreter.locals().clone();

    Resolver::new(&mut interpreter, &mut reporter).resolve(&statements);

    assert!(!reporter.had_error());
    assert!(!first.is_empty());
    assert_eq!(&first, interpreter.locals());
}

#[test]
fn test_read_in_own_initializer() {
    assert_eq!(
        resolve_errors("var a = 1; { var a = a; }"),
        vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
    );
}

#[test]
fn test_global_may_reference_itself_and_be_redeclared() {
    assert!(resolve_errors("var a = 1; var a = a + 1;").is_empty());
}

#[test]
fn test_duplicate_local() {
    assert_eq!(
        resolve_errors("{ var a = 1;\nvar a = 2; }"),
        vec!["[line 2] Error at 'a': Already a variable with this name in this scope."]
    );

    assert_eq!(
        resolve_errors("fun f(a, a) {}"),
        vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
    );
}

#[test]
fn test_return_placement() {
    assert_eq!(
        resolve_errors("return 1;"),
        vec!["[line 1] Error at 'return': Can't return from top-level code."]
    );

    assert_eq!(
        resolve_errors("class A { init() { return 1; } }"),
        vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
    );

    // a bare return is fine in an initializer
    assert!(resolve_errors("class A { init() { return; } }").is_empty());
}

#[test]
fn test_this_and_super_placement() {
    assert_eq!(
        resolve_errors("print this;"),
        vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
    );

    assert_eq!(
        resolve_errors("fun f() { super.m(); }"),
        vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
    );

    assert_eq!(
        resolve_errors("class A { m() { super.m(); } }"),
        vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
    );

    assert_eq!(
        resolve_errors("class A < A {}"),
        vec!["[line 1] Error at 'A': A class can't inherit from itself."]
    );
}

#[test]
fn test_every_error_is_reported() {
    let errors: Vec<String> = resolve_errors("return 1;\nprint this;\n{ var b; var b; }");

    assert_eq!(errors.len(), 3);
}

#[test]
fn test_resolution_errors_skip_evaluation() {
    let outcome = common::run("print \"before\";\n{ var a = a; }");

    assert!(outcome.had_error);
    assert!(!outcome.had_runtime_error);
    assert!(outcome.output.is_empty());
    assert_eq!(
        outcome.errors,
        vec!["[line 2] Error at 'a': Can't read local variable in its own initializer."]
    );
}
