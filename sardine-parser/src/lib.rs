//! Lexer, AST and parser for the Sardine language.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod visitor;

pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::parse;
