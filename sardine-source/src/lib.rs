//! Diagnostics and source unit loading.

pub mod loader;

use std::{cell::RefCell, fmt};

pub use loader::{FsModuleLoader, MemoryModuleLoader, ModuleLoader};

/// The specific failure behind a [`ErrorKind::Runtime`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Reading or assigning a name that no frame defines.
    UndefinedVariable,
    /// Operator applied to operands of the wrong type.
    TypeMismatch,
    /// Call with the wrong number of arguments.
    ArityMismatch,
    NotCallable,
    ReturnOutsideFunction,
    /// Function calls nested deeper than the interpreter allows.
    StackOverflow,
    /// The output sink rejected a write.
    Output,
}

/// Category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    /// A module named by `import` could not be loaded.
    Import,
    Syntax,
    Runtime(RuntimeErrorKind),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "LexicalError"),
            ErrorKind::Import => write!(f, "ImportError"),
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::Runtime(_) => write!(f, "RuntimeError"),
        }
    }
}

/// An error produced by any stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: line {line}, at '{token}'. {message}")]
pub struct Error {
    pub kind: ErrorKind,
    /// 1-based source line.
    pub line: usize,
    /// The offending token or character, as written in the source.
    pub token: String,
    pub message: String,
}

impl Error {
    pub fn new(
        kind: ErrorKind,
        line: usize,
        token: impl ToString,
        message: impl ToString,
    ) -> Self {
        Self {
            kind,
            line,
            token: token.to_string(),
            message: message.to_string(),
        }
    }

    pub fn lexical(line: usize, token: impl ToString, message: impl ToString) -> Self {
        Self::new(ErrorKind::Lexical, line, token, message)
    }

    pub fn import(line: usize, token: impl ToString, message: impl ToString) -> Self {
        Self::new(ErrorKind::Import, line, token, message)
    }

    pub fn syntax(line: usize, token: impl ToString, message: impl ToString) -> Self {
        Self::new(ErrorKind::Syntax, line, token, message)
    }

    pub fn runtime(
        kind: RuntimeErrorKind,
        line: usize,
        token: impl ToString,
        message: impl ToString,
    ) -> Self {
        Self::new(ErrorKind::Runtime(kind), line, token, message)
    }

    /// Returns the runtime error kind, or `None` if this is not a runtime error.
    pub fn runtime_kind(&self) -> Option<RuntimeErrorKind> {
        match self.kind {
            ErrorKind::Runtime(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Manages all the errors.
pub struct ErrorReporter {
    errors: RefCell<Vec<Error>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: Error) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    /// Returns `true` if no errors were reported.
    pub fn has_no_errors(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors.into_inner()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "{}", error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let error = Error::syntax(1, "=", "Expect variable name.");
        assert_eq!(
            error.to_string(),
            "SyntaxError: line 1, at '='. Expect variable name."
        );

        let error = Error::runtime(
            RuntimeErrorKind::UndefinedVariable,
            3,
            "x",
            "Undefined variable 'x'.",
        );
        assert_eq!(
            error.to_string(),
            "RuntimeError: line 3, at 'x'. Undefined variable 'x'."
        );
        assert_eq!(
            error.runtime_kind(),
            Some(RuntimeErrorKind::UndefinedVariable)
        );
    }

    #[test]
    fn reporter_accumulates() {
        let reporter = ErrorReporter::new();
        assert!(reporter.has_no_errors());

        reporter.add_error(Error::syntax(1, "=", "Expect variable name."));
        reporter.add_error(Error::syntax(2, ")", "Expect expression."));
        assert!(!reporter.has_no_errors());
        assert_eq!(
            reporter.to_string(),
            "SyntaxError: line 1, at '='. Expect variable name.\n\
             SyntaxError: line 2, at ')'. Expect expression.\n"
        );
        assert_eq!(reporter.into_errors().len(), 2);
    }
}
