use super::*;
use sardine_parser::ast::Expr;
use sardine_parser::lexer::{Token, TokenKind};

impl<W: Write> Interpreter<W> {
    pub fn evaluate(&mut self, expr: &Expr, env: &Environment) -> InterpretResult<Value> {
        // nested calls recurse through here
        stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || self.evaluate_expr(expr, env))
    }

    fn evaluate_expr(&mut self, expr: &Expr, env: &Environment) -> InterpretResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal)),
            Expr::Grouping(inner) => self.evaluate(inner, env),
            Expr::Variable(name) => env.get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value, env)?;
                env.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Logical { lhs, op, rhs } => {
                let lhs = self.evaluate(lhs, env)?;
                let decided = match op.kind {
                    TokenKind::Or => lhs.is_truthy(),
                    _ => !lhs.is_truthy(),
                };
                if decided {
                    Ok(lhs)
                } else {
                    self.evaluate(rhs, env)
                }
            }
            Expr::Unary { op, arg } => {
                let arg = self.evaluate(arg, env)?;
                match op.kind {
                    TokenKind::Not => Ok(Value::Bool(!arg.is_truthy())),
                    _ => match arg {
                        Value::Number(val) => Ok(Value::Number(-val)),
                        _ => Err(type_mismatch(
                            op,
                            format!(
                                "Operand of '{}' must be a Number, got {}.",
                                op.lexeme,
                                arg.type_name()
                            ),
                        )),
                    },
                }
            }
            Expr::Binary { lhs, op, rhs } => {
                let lhs = self.evaluate(lhs, env)?;
                let rhs = self.evaluate(rhs, env)?;
                binary(op, lhs, rhs)
            }
            Expr::Call {
                callee,
                paren,
                args,
            } => {
                let callee = self.evaluate(callee, env)?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg, env))
                    .collect::<InterpretResult<Vec<_>>>()?;

                let function = match callee {
                    Value::Callable(function) => function,
                    _ => {
                        return Err(Error::runtime(
                            RuntimeErrorKind::NotCallable,
                            paren.line,
                            &paren.lexeme,
                            format!("Can only call functions, got {}.", callee.type_name()),
                        ))
                    }
                };
                if args.len() != function.arity() {
                    return Err(Error::runtime(
                        RuntimeErrorKind::ArityMismatch,
                        paren.line,
                        &paren.lexeme,
                        format!(
                            "Expected {} arguments but got {}.",
                            function.arity(),
                            args.len()
                        ),
                    ));
                }
                if self.call_depth >= self.max_call_depth {
                    return Err(Error::runtime(
                        RuntimeErrorKind::StackOverflow,
                        paren.line,
                        &paren.lexeme,
                        format!("Maximum call depth of {} exceeded.", self.max_call_depth),
                    ));
                }
                self.call_function(&function, args)
            }
        }
    }
}

fn binary(op: &Token, lhs: Value, rhs: Value) -> InterpretResult<Value> {
    /// Generate evaluation for a binary operator over two numbers.
    macro_rules! num_binary_op {
        ($op: tt, $result: path) => {
            match (&lhs, &rhs) {
                (Value::Number(a), Value::Number(b)) => Ok($result(*a $op *b)),
                _ => Err(operands_mismatch(op, &lhs, &rhs, "two Numbers")),
            }
        };
    }

    match op.kind {
        TokenKind::EqualEqual => Ok(Value::Bool(lhs == rhs)),
        TokenKind::BangEqual => Ok(Value::Bool(lhs != rhs)),
        TokenKind::Plus => match (&lhs, &rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b).into())),
            _ => Err(operands_mismatch(op, &lhs, &rhs, "two Numbers or two Strings")),
        },
        TokenKind::Minus => num_binary_op!(-, Value::Number),
        TokenKind::Star => num_binary_op!(*, Value::Number),
        TokenKind::Slash => num_binary_op!(/, Value::Number),
        TokenKind::Greater => num_binary_op!(>, Value::Bool),
        TokenKind::GreaterEqual => num_binary_op!(>=, Value::Bool),
        TokenKind::Less => num_binary_op!(<, Value::Bool),
        TokenKind::LessEqual => num_binary_op!(<=, Value::Bool),
        _ => unreachable!("parser only produces binary expressions for binary operators"),
    }
}

fn type_mismatch(op: &Token, message: String) -> Error {
    Error::runtime(RuntimeErrorKind::TypeMismatch, op.line, &op.lexeme, message)
}

fn operands_mismatch(op: &Token, lhs: &Value, rhs: &Value, expected: &str) -> Error {
    type_mismatch(
        op,
        format!(
            "Operands of '{}' must be {}, got {} and {}.",
            op.lexeme,
            expected,
            lhs.type_name(),
            rhs.type_name()
        ),
    )
}
