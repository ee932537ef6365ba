use sardine_parser::ast::Stmt;
use sardine_source::{Error, RuntimeErrorKind};
use sardine_value::{Environment, Function, Value};
use std::io::Write;
use std::rc::Rc;

mod expr;

/// Outcome of executing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Ran to completion; the next statement may run.
    Completed,
    /// A `return` is unwinding towards the nearest function call.
    Returning(Value),
}

pub type InterpretResult<T> = Result<T, Error>;

/// Default limit on nested function calls.
pub const MAX_CALL_DEPTH: usize = 1000;

/// Stack space that must remain before evaluation continues on a new segment.
const RED_ZONE: usize = 100 * 1024;
/// Size of each new stack segment.
const STACK_GROWTH: usize = 1024 * 1024;

pub struct Interpreter<W> {
    /// Sink for `print`.
    out: W,
    /// Number of function invocations currently executing.
    call_depth: usize,
    max_call_depth: usize,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            call_depth: 0,
            max_call_depth: MAX_CALL_DEPTH,
        }
    }

    /// Sets how deeply function calls may nest before failing with
    /// [`RuntimeErrorKind::StackOverflow`].
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes top-level statements in `env`, stopping at the first runtime error.
    pub fn interpret(&mut self, statements: &[Stmt], env: &Environment) -> InterpretResult<()> {
        self.call_depth = 0;
        for stmt in statements {
            let flow = self.execute(stmt, env)?;
            // `return` outside a function is rejected before it can unwind
            debug_assert_eq!(flow, Flow::Completed);
        }
        Ok(())
    }

    pub fn execute(&mut self, stmt: &Stmt, env: &Environment) -> InterpretResult<Flow> {
        match stmt {
            Stmt::VarDecl { name, initializer } => {
                let value = match initializer {
                    Some(initializer) => self.evaluate(initializer, env)?,
                    None => Value::Nil,
                };
                env.define(&name.lexeme, value);
                Ok(Flow::Completed)
            }
            Stmt::Print { keyword, expr } => {
                let value = self.evaluate(expr, env)?;
                writeln!(self.out, "{}", value).map_err(|err| {
                    Error::runtime(
                        RuntimeErrorKind::Output,
                        keyword.line,
                        &keyword.lexeme,
                        format!("Could not write output: {}", err),
                    )
                })?;
                Ok(Flow::Completed)
            }
            Stmt::ExprStmt(expr) => {
                self.evaluate(expr, env)?;
                Ok(Flow::Completed)
            }
            Stmt::Block(body) => self.execute_block(body, &env.child()),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition, env)?.is_truthy() {
                    self.execute(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch, env)
                } else {
                    Ok(Flow::Completed)
                }
            }
            Stmt::FnDecl(decl) => {
                let function = Function::new(Rc::clone(decl), env.clone());
                env.define(&decl.name.lexeme, Value::Callable(Rc::new(function)));
                Ok(Flow::Completed)
            }
            Stmt::Return { keyword, value } => {
                if self.call_depth == 0 {
                    return Err(Error::runtime(
                        RuntimeErrorKind::ReturnOutsideFunction,
                        keyword.line,
                        &keyword.lexeme,
                        "Can't return from top-level code.",
                    ));
                }
                let value = match value {
                    Some(value) => self.evaluate(value, env)?,
                    None => Value::Nil,
                };
                Ok(Flow::Returning(value))
            }
        }
    }

    /// Executes `body` in `env`, stopping early if a statement returns.
    /// The caller owns `env`; it is dropped once the caller is done with it.
    pub fn execute_block(&mut self, body: &[Stmt], env: &Environment) -> InterpretResult<Flow> {
        for stmt in body {
            if let Flow::Returning(value) = self.execute(stmt, env)? {
                return Ok(Flow::Returning(value));
            }
        }
        Ok(Flow::Completed)
    }

    /// Invokes `function` with already evaluated arguments.
    /// The arity and call depth must already have been checked.
    #[tracing::instrument(level = "debug", skip_all, fields(name = function.name()))]
    pub fn call_function(&mut self, function: &Function, args: Vec<Value>) -> InterpretResult<Value> {
        let env = function.closure().child();
        for (param, arg) in function.params().iter().zip(args) {
            env.define(&param.lexeme, arg);
        }

        self.call_depth += 1;
        let result = self.execute_block(function.body(), &env);
        self.call_depth -= 1;

        match result? {
            Flow::Returning(value) => Ok(value),
            Flow::Completed => Ok(Value::Nil),
        }
    }
}
