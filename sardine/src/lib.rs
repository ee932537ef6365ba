//! The Sardine scripting language.
//!
//! A [`Session`] ties the pipeline together: every call to [`Session::run`] lexes, parses and
//! evaluates one source unit in the same root environment, so declarations made by one unit
//! are visible to the next.

use sardine_interp::Interpreter;
use sardine_parser::{parse, Lexer};
use sardine_source::{Error, FsModuleLoader, ModuleLoader};
use sardine_value::Environment;
use std::io::{self, Write};

pub use sardine_source::{ErrorKind, RuntimeErrorKind};

pub struct Session<W> {
    globals: Environment,
    interpreter: Interpreter<W>,
    loader: Box<dyn ModuleLoader>,
}

impl Session<io::Stdout> {
    /// Creates a session printing to stdout and importing modules relative to the current
    /// directory.
    pub fn stdout() -> Self {
        Self::new(io::stdout(), FsModuleLoader::default())
    }
}

impl<W: Write> Session<W> {
    pub fn new(out: W, loader: impl ModuleLoader + 'static) -> Self {
        Self {
            globals: Environment::new(),
            interpreter: Interpreter::new(out),
            loader: Box::new(loader),
        }
    }

    /// Runs one source unit.
    ///
    /// Nothing is evaluated if lexing or parsing fails; all syntax errors are returned in that
    /// case. Evaluation stops at the first runtime error, keeping any effects made before it.
    pub fn run(&mut self, source: &str) -> Result<(), Vec<Error>> {
        let tokens = Lexer::new(&*self.loader)
            .tokenize(source)
            .map_err(|err| vec![err])?;
        let stmts = parse(&tokens)?;
        tracing::debug!(statements = stmts.len(), "parsed source unit");

        self.interpreter
            .interpret(&stmts, &self.globals)
            .map_err(|err| vec![err])
    }

    pub fn output(&self) -> &W {
        self.interpreter.output()
    }

    pub fn output_mut(&mut self) -> &mut W {
        self.interpreter.output_mut()
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sardine_source::MemoryModuleLoader;

    fn session() -> Session<Vec<u8>> {
        Session::new(Vec::new(), MemoryModuleLoader::new())
    }

    #[test]
    fn state_persists_between_runs() {
        let mut session = session();
        session.run("dec x = 1").unwrap();
        session.run("def inc() do x = x + 1 end").unwrap();
        session.run("inc()\ninc()").unwrap();
        session.run("print x").unwrap();
        assert_eq!(String::from_utf8(session.into_output()).unwrap(), "3\n");
    }

    #[test]
    fn syntax_errors_prevent_evaluation() {
        let mut session = session();
        let errs = session.run("print 1\ndec = 5\nprint 2\n").unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ErrorKind::Syntax);
        assert!(session.output().is_empty());
    }

    #[test]
    fn session_survives_errors() {
        let mut session = session();
        session.run("dec x = 1").unwrap();
        assert_eq!(session.run("print $").unwrap_err()[0].kind, ErrorKind::Lexical);
        assert_eq!(
            session.run("print y").unwrap_err()[0].kind,
            ErrorKind::Runtime(RuntimeErrorKind::UndefinedVariable)
        );
        session.run("print x").unwrap();
        assert_eq!(session.output(), b"1\n");
    }
}
