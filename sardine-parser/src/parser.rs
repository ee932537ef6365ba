use crate::ast::{Expr, Stmt};
use crate::lexer::{Token, TokenKind};
use sardine_source::{Error, ErrorReporter};

mod expr;
mod stmt;

pub type ParseResult<T> = Result<T, Error>;

/// Parses a token sequence into statements.
/// Returns every syntax error found if the tokens do not form a valid program.
pub fn parse(tokens: &[Token]) -> Result<Vec<Stmt>, Vec<Error>> {
    let mut parser = Parser::new(tokens.to_vec());
    let program = parser.parse_program();
    if parser.errors.has_no_errors() {
        Ok(program)
    } else {
        Err(parser.errors.into_errors())
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    /// Index of the current (not yet consumed) token.
    current: usize,
    /// Accumulated errors.
    errors: ErrorReporter,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token::new(TokenKind::Eof, "", None, line));
        }
        Self {
            tokens,
            current: 0,
            errors: ErrorReporter::new(),
        }
    }
}

impl Parser {
    /// Parses statements until the end of input.
    /// Errors are reported to [`Self::errors`] and the offending statements are skipped.
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.parse_declaration() {
                stmts.push(stmt);
            }
        }
        stmts
    }
}

/// Parse utilities
impl Parser {
    fn current_token(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn is_at_end(&self) -> bool {
        self.current_token().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_token().kind == kind
    }

    /// Consumes the current token and returns it. Never moves past [`TokenKind::Eof`].
    fn next(&mut self) -> Token {
        let token = self.current_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Predicate that tests whether the current token is of `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    /// Eats a token of `kind` or fails without consuming anything.
    fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.next())
        } else {
            Err(self.unexpected(message))
        }
    }

    /// Creates an unexpected token error at the current token.
    fn unexpected(&self, message: &str) -> Error {
        let token = self.current_token();
        Error::syntax(token.line, token.describe(), message)
    }

    /// Discards tokens up to and including the next newline.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.next().kind == TokenKind::Newline {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::printer::Printer;
    use sardine_source::ErrorKind;

    pub(crate) fn program(source: &str) -> String {
        let tokens = tokenize(source).unwrap();
        let stmts = parse(&tokens).unwrap();
        Printer::print_program(&stmts)
    }

    pub(crate) fn errors(source: &str) -> Vec<Error> {
        let tokens = tokenize(source).unwrap();
        parse(&tokens).unwrap_err()
    }

    #[test]
    fn test_program() {
        insta::assert_snapshot!(program("dec a = 5\ndec b = 2\nprint a * b\n"), @r###"
        (dec a 5)
        (dec b 2)
        (print (* a b))
        "###);
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(program(""), "");
        assert_eq!(program("# only a comment\n\n"), "");
    }

    #[test]
    fn test_missing_identifier() {
        let errors = errors("dec = 5\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Syntax);
        assert_eq!(errors[0].line, 1);
        assert_eq!(errors[0].token, "=");
    }

    #[test]
    fn test_recovery() {
        // one bad statement does not hide the next one
        let errors = errors("dec = 5\nprint )\ndec ok = 1\nprint ok +\n");
        let lines: Vec<_> = errors.iter().map(|error| error.line).collect();
        assert_eq!(lines, vec![1, 2, 5]);
        assert_eq!(errors[2].token, "end of input");
    }

    #[test]
    fn test_recovery_in_block() {
        let errors = errors("do\n  dec = 1\n  print 2\nend\nprint )\n");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].token, "=");
        assert_eq!(errors[1].token, ")");
        assert_eq!(errors[1].line, 5);
    }

    #[test]
    fn test_parser_without_eof() {
        let mut tokens = tokenize("print 1\n").unwrap();
        tokens.pop();
        insta::assert_snapshot!(Printer::print_program(&parse(&tokens).unwrap()), @"(print 1)");
    }
}
