//! Syntactic analysis for velac: a recursive-descent parser producing a
//! located AST from a token stream.

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::Ast;
pub use error::SyntaxError;
pub use parser::Parser;
