//! Runtime values, scope frames and closures.

pub mod environment;
pub mod function;

pub use environment::Environment;
pub use function::Function;

use sardine_parser::lexer::Literal;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Callable(Rc<Function>),
}

impl Value {
    /// `None` and `False` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Name of the value's type, as used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "None",
            Value::Bool(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::Str(_) => "String",
            Value::Callable(_) => "Function",
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Nil => Value::Nil,
            Literal::Bool(val) => Value::Bool(*val),
            Literal::Number(val) => Value::Number(*val),
            Literal::Str(val) => Value::Str(val.as_str().into()),
        }
    }
}

impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Number(val)
    }
}

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Bool(val)
    }
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Str(val.into())
    }
}

impl PartialEq for Value {
    /// Structural equality. Functions are equal only to themselves.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Callable(l), Value::Callable(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Number(val) => write!(f, "{}", val),
            Value::Str(val) => write!(f, "{}", val),
            Value::Callable(function) => write!(f, "<fn {}>", function.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(val) => write!(f, "{:?}", val),
            _ => fmt::Display::fmt(self, f),
        }
    }
}
