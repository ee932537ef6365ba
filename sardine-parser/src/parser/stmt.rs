use super::*;
use crate::ast::FnDecl;
use std::rc::Rc;

impl Parser {
    /// Parses a declaration (or statement).
    /// On error, the error is reported, the parser skips to the next line and `None` is returned.
    pub fn parse_declaration(&mut self) -> Option<Stmt> {
        let result = match self.current_token().kind {
            TokenKind::Dec => self.parse_var_declaration(),
            TokenKind::Def => self.parse_fn_declaration(),
            _ => self.parse_stmt(),
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                tracing::debug!(%err, "recovering from syntax error");
                self.errors.add_error(err);
                self.synchronize();
                None
            }
        }
    }

    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.current_token().kind {
            TokenKind::Print => {
                let keyword = self.next();
                let expr = self.parse_expr()?;
                self.expect_terminator("Expect newline after value.")?;
                Ok(Stmt::Print { keyword, expr })
            }
            TokenKind::Do => {
                self.next();
                Ok(Stmt::Block(self.parse_block()?))
            }
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            _ => {
                // expression statement
                let expr = self.parse_expr()?;
                self.expect_terminator("Expect newline after expression.")?;
                Ok(Stmt::ExprStmt(expr))
            }
        }
    }

    /// Parses the statements of a block up to and including the closing `end`.
    /// The opening `do` must already be consumed.
    pub fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut body = Vec::new();
        while !self.check(TokenKind::End) && !self.is_at_end() {
            if let Some(stmt) = self.parse_declaration() {
                body.push(stmt);
            }
        }
        self.expect(TokenKind::End, "Expect 'end' after block.")?;
        Ok(body)
    }

    fn parse_var_declaration(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Dec, "Expect 'dec'.")?;
        let name = self.expect(TokenKind::Identifier, "Expect variable name.")?;
        let initializer = if self.eat(TokenKind::Equal) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_terminator("Expect newline after variable declaration.")?;
        Ok(Stmt::VarDecl { name, initializer })
    }

    fn parse_fn_declaration(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::Def, "Expect 'def'.")?;
        let name = self.expect(TokenKind::Identifier, "Expect function name after 'def'.")?;
        self.expect(TokenKind::LeftParen, "Expect '(' after function name.")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(self.expect(TokenKind::Identifier, "Expect parameter name.")?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "Expect ')' after parameters.")?;

        self.expect(TokenKind::Do, "Expect 'do' before function body.")?;
        let body = self.parse_block()?;

        Ok(Stmt::FnDecl(Rc::new(FnDecl { name, params, body })))
    }

    fn parse_if_stmt(&mut self) -> ParseResult<Stmt> {
        self.expect(TokenKind::If, "Expect 'if'.")?;
        let condition = self.parse_expr()?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_return_stmt(&mut self) -> ParseResult<Stmt> {
        let keyword = self.expect(TokenKind::Return, "Expect 'return'.")?;
        let value = if self.check(TokenKind::Newline) || self.check(TokenKind::End) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_terminator("Expect newline after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    /// Ends a simple statement: eats a newline, or accepts (without eating) the `end` of
    /// the enclosing block.
    fn expect_terminator(&mut self, message: &str) -> ParseResult<()> {
        if self.eat(TokenKind::Newline) || self.check(TokenKind::End) {
            Ok(())
        } else {
            Err(self.unexpected(message))
        }
    }
}
