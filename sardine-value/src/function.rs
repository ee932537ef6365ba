use crate::Environment;
use sardine_parser::ast::{FnDecl, Stmt};
use sardine_parser::lexer::Token;
use std::rc::Rc;

/// A user defined function together with the environment it was declared in.
pub struct Function {
    decl: Rc<FnDecl>,
    closure: Environment,
}

impl Function {
    pub fn new(decl: Rc<FnDecl>, closure: Environment) -> Self {
        Self { decl, closure }
    }

    pub fn name(&self) -> &str {
        &self.decl.name.lexeme
    }

    /// Number of arguments that the function accepts.
    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    pub fn params(&self) -> &[Token] {
        &self.decl.params
    }

    pub fn body(&self) -> &[Stmt] {
        &self.decl.body
    }

    /// The environment captured at the point of declaration.
    pub fn closure(&self) -> &Environment {
        &self.closure
    }
}
