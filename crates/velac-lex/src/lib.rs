//! Lexical analysis for velac.
//!
//! Turns a source buffer into a flat stream of [`Token`]s, borrowing every
//! identifier and literal lexeme straight out of the source rather than
//! allocating or interning.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
