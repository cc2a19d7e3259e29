pub mod ast;
pub mod ast_printer;
pub mod callable;
pub mod class;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lox;
pub mod parser;
pub mod reporter;
pub mod resolver;
pub mod scanner;
pub mod token;
pub mod value;

pub use lox::Lox;
