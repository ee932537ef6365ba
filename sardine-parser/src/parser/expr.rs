use super::*;
use crate::lexer::{Literal, PREFIX_BP};

impl Parser {
    /* Expressions */
    /// Parses any expression.
    /// This is equivalent to calling [`Self::parse_expr_bp`] with `min_bp = 0`.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_bp(0) // 0 to accept any expression
    }

    /// Parses a prefix expression, or a primary expression followed by any call suffixes.
    fn parse_prefix_expr(&mut self) -> ParseResult<Expr> {
        match self.current_token().kind {
            TokenKind::Not | TokenKind::Minus => {
                let op = self.next();
                Ok(Expr::Unary {
                    op,
                    arg: Box::new(self.parse_expr_bp(PREFIX_BP)?),
                })
            }
            _ => self.parse_call_expr(),
        }
    }

    /// Parses an expression with the specified `min_bp`.
    /// To parse any expression use, [`Self::parse_expr`].
    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_prefix_expr()?;

        loop {
            let (l_bp, r_bp) = match self.current_token().kind.binop_bp() {
                Some(bp) => bp,
                None => break, // not a valid binop, stop parsing
            };
            if l_bp < min_bp {
                break; // less than the min_bp, stop parsing
            }

            // self.current_token() is a valid binop
            let op = self.next();
            let rhs = Box::new(self.parse_expr_bp(r_bp)?);

            lhs = match op.kind {
                TokenKind::Equal => match lhs {
                    Expr::Variable(name) => Expr::Assign { name, value: rhs },
                    _ => {
                        return Err(Error::syntax(
                            op.line,
                            op.describe(),
                            "Invalid assignment target.",
                        ))
                    }
                },
                TokenKind::And | TokenKind::Or => Expr::Logical {
                    lhs: Box::new(lhs),
                    op,
                    rhs,
                },
                _ => Expr::Binary {
                    lhs: Box::new(lhs),
                    op,
                    rhs,
                },
            }
        }

        Ok(lhs)
    }

    /// Parses a primary expression followed by zero or more `(args)` suffixes.
    fn parse_call_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expr()?;

        while self.eat(TokenKind::LeftParen) {
            let mut args = Vec::new();
            if !self.check(TokenKind::RightParen) {
                loop {
                    args.push(self.parse_expr()?);
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            let paren = self.expect(TokenKind::RightParen, "Expect ')' after arguments.")?;

            expr = Expr::Call {
                callee: Box::new(expr),
                paren,
                args,
            };
        }

        Ok(expr)
    }

    /// Parses a primary (atom) expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Expr> {
        match self.current_token().kind {
            TokenKind::NumberLit
            | TokenKind::StringLit
            | TokenKind::True
            | TokenKind::False
            | TokenKind::NoneLit => self.parse_literal_expr(),
            TokenKind::Identifier => Ok(Expr::Variable(self.next())),
            TokenKind::LeftParen => {
                self.next();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RightParen, "Expect ')' after expression.")?;
                Ok(Expr::Grouping(Box::new(inner)))
            }
            _ => Err(self.unexpected("Expect expression.")),
        }
    }

    /* Expressions.Literals */
    /// Parses a literal expression.
    /// A literal can be a number, a string, a boolean or `None`.
    fn parse_literal_expr(&mut self) -> ParseResult<Expr> {
        let literal = match self.current_token().kind {
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::NoneLit => Literal::Nil,
            _ => match self.current_token().literal.clone() {
                Some(literal) => literal,
                None => return Err(self.unexpected("Expect literal.")),
            },
        };
        self.next(); // eat parsed token if not error
        Ok(Expr::Literal(literal))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{errors, program};
    use insta::assert_snapshot;

    #[test]
    fn test_literal() {
        assert_snapshot!(program("True"), @"True");
        assert_snapshot!(program("False"), @"False");
        assert_snapshot!(program("None"), @"None");
        assert_snapshot!(program("1"), @"1");
        assert_snapshot!(program("2.5"), @"2.5");
        assert_snapshot!(program(r#""hello""#), @r###""hello""###);
    }

    #[test]
    fn test_binary_expr() {
        assert_snapshot!(program("1 + 1"), @"(+ 1 1)");
        assert_snapshot!(program("2 + 3 * 4"), @"(+ 2 (* 3 4))");
        assert_snapshot!(program("1 == 2 - 1"), @"(== 1 (- 2 1))");
        assert_snapshot!(program("1 < 2 == 3 >= 4"), @"(== (< 1 2) (>= 3 4))");
        assert_snapshot!(program("2 * 2 * 2"), @"(* (* 2 2) 2)"); // left associative
        assert_snapshot!(program("8 - 4 - 2"), @"(- (- 8 4) 2)");
        assert_snapshot!(program("(2 + 3) * 4"), @"(* (group (+ 2 3)) 4)");
    }

    #[test]
    fn test_logical_expr() {
        assert_snapshot!(program("a or b and c"), @"(or a (and b c))");
        assert_snapshot!(program("a and b or c"), @"(or (and a b) c)");
        assert_snapshot!(program("a == b and c"), @"(and (== a b) c)");
    }

    #[test]
    fn test_unary_expr() {
        assert_snapshot!(program("-a + b"), @"(+ (- a) b)");
        assert_snapshot!(program("not a == b"), @"(== (not a) b)");
        assert_snapshot!(program("- - 1"), @"(- (- 1))");
        assert_snapshot!(program("-f()"), @"(- (call f))");
    }

    #[test]
    fn test_assignment() {
        assert_snapshot!(program("a = b = c"), @"(assign a (assign b c))"); // right associative
        assert_snapshot!(program("a = 1 + 2"), @"(assign a (+ 1 2))");
        assert_snapshot!(program("a = b or c"), @"(assign a (or b c))");
    }

    #[test]
    fn test_invalid_assignment_target() {
        let errs = errors("a + b = c\n");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].token, "=");
        assert_eq!(errs[0].message, "Invalid assignment target.");

        assert_eq!(errors("(a) = 1\n")[0].token, "=");
    }

    #[test]
    fn test_fn_call() {
        assert_snapshot!(program("foo()"), @"(call foo)");
        assert_snapshot!(program("foo(1, bar)"), @"(call foo 1 bar)");
        assert_snapshot!(program("foo(1, bar, baz())"), @"(call foo 1 bar (call baz))");
        assert_snapshot!(program("f()()"), @"(call (call f))");
        assert_snapshot!(program("f(1)(2)"), @"(call (call f 1) 2)");
    }

    #[test]
    fn test_missing_paren() {
        let errs = errors("print (1 + 2\n");
        assert_eq!(errs[0].token, "newline");
        assert_eq!(errs[0].message, "Expect ')' after expression.");

        let errs = errors("foo(1, 2\n");
        assert_eq!(errs[0].message, "Expect ')' after arguments.");
    }
}
