//! Tree-walking evaluator for the Sardine language.

pub mod interpreter;

pub use interpreter::{Flow, Interpreter, MAX_CALL_DEPTH};
