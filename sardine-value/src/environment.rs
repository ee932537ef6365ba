//! Lexical scope frames.
//!
//! A frame is shared through [`Environment`] handles. Child frames hold a handle to their
//! parent; parents never reference their children. A frame lives as long as the scope that
//! created it, or longer if a closure captured it.

use crate::Value;
use sardine_parser::lexer::Token;
use sardine_source::{Error, RuntimeErrorKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

struct Frame {
    values: RefCell<HashMap<String, Value>>,
    parent: Option<Environment>,
}

/// A handle to a scope frame. Cloning the handle does not copy the frame.
#[derive(Clone)]
pub struct Environment(Rc<Frame>);

impl Environment {
    /// Creates a root frame without a parent.
    pub fn new() -> Self {
        Self(Rc::new(Frame {
            values: RefCell::new(HashMap::new()),
            parent: None,
        }))
    }

    /// Creates an empty frame whose parent is `self`.
    pub fn child(&self) -> Self {
        Self(Rc::new(Frame {
            values: RefCell::new(HashMap::new()),
            parent: Some(self.clone()),
        }))
    }

    /// Binds `name` in this frame, shadowing any outer binding and replacing any previous
    /// binding in this frame.
    pub fn define(&self, name: &str, value: Value) {
        tracing::trace!(name, %value, "define");
        self.0.values.borrow_mut().insert(name.to_string(), value);
    }

    /// Looks `name` up in this frame, then in each enclosing frame.
    pub fn get(&self, name: &Token) -> Result<Value, Error> {
        let mut env = Some(self);
        while let Some(Environment(frame)) = env {
            if let Some(value) = frame.values.borrow().get(&name.lexeme) {
                return Ok(value.clone());
            }
            env = frame.parent.as_ref();
        }
        Err(undefined_variable(name))
    }

    /// Rebinds `name` in the nearest frame that defines it.
    pub fn assign(&self, name: &Token, value: Value) -> Result<(), Error> {
        let mut env = Some(self);
        while let Some(Environment(frame)) = env {
            if let Some(slot) = frame.values.borrow_mut().get_mut(&name.lexeme) {
                tracing::trace!(name = %name.lexeme, %value, "assign");
                *slot = value;
                return Ok(());
            }
            env = frame.parent.as_ref();
        }
        Err(undefined_variable(name))
    }

    /// Returns `true` if both handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

fn undefined_variable(name: &Token) -> Error {
    Error::runtime(
        RuntimeErrorKind::UndefinedVariable,
        name.line,
        &name.lexeme,
        format!("Undefined variable '{}'.", name.lexeme),
    )
}
