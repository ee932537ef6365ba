use logos::Logos;
use sardine_source::{Error, FsModuleLoader, ModuleLoader};
use std::fmt;

#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // literals
    #[regex(r"[0-9]+(\.[0-9]*)?")]
    NumberLit,
    #[regex(r#""[^"]*""#)]
    StringLit,

    // identifiers
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // binary operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    // - assignment
    #[token("=")]
    Equal,
    // - equality
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    // - ordering
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,

    // punctuation
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token(",")]
    Comma,

    // keywords
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("do")]
    Do,
    #[token("end")]
    End,
    #[token("None")]
    NoneLit,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("return")]
    Return,
    #[token("print")]
    Print,
    #[token("def")]
    Def,
    #[token("dec")]
    Dec,
    #[token("if")]
    If,
    #[token("else")]
    Else,

    // misc
    /// A raw line break. Only kept when it terminates a statement.
    #[token("\n")]
    Newline,
    #[regex(r"[ \t\r\f]+", logos::skip)]
    #[regex(r"#[^\n]*", logos::skip)] // line comments
    #[error]
    Error,

    /// Appended by [`tokenize`] after the last token.
    Eof,
}

impl TokenKind {
    /// Returns the binary binding power or `None` if invalid binop token.
    /// Binding power `0` is reserved for accepting any expression.
    /// Assignment (`TokenKind::Equal`) has the lowest precedence with `(2, 1)`.
    pub fn binop_bp(&self) -> Option<(u8, u8)> {
        match self {
            /* Assignment */
            TokenKind::Equal => Some((2, 1)),
            /* Logical */
            TokenKind::Or => Some((3, 4)),
            TokenKind::And => Some((5, 6)),
            /* Equality */
            TokenKind::EqualEqual | TokenKind::BangEqual => Some((7, 8)),
            /* Comparison */
            TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::Less
            | TokenKind::LessEqual => Some((9, 10)),
            /* Additive */
            TokenKind::Plus | TokenKind::Minus => Some((11, 12)),
            /* Multiplicative */
            TokenKind::Star | TokenKind::Slash => Some((13, 14)),
            _ => None,
        }
    }

    /// Whether a raw newline directly after this token ends a statement.
    pub fn terminates_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::StringLit
                | TokenKind::NumberLit
                | TokenKind::True
                | TokenKind::False
                | TokenKind::NoneLit
                | TokenKind::Return
                | TokenKind::RightParen
        )
    }
}

/// Binding power of the prefix operators `not` and `-`.
/// Higher than every binary operator.
pub const PREFIX_BP: u8 = 15;

/// A decoded literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => write!(f, "None"),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::Number(val) => write!(f, "{}", val),
            Literal::Str(val) => write!(f, "\"{}\"", val),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub lexeme: String,
    /// Decoded value of number and string tokens.
    pub literal: Option<Literal>,
    pub line: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl ToString,
        literal: Option<Literal>,
        line: usize,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.to_string(),
            literal,
            line,
        }
    }

    /// The token as it should appear in a diagnostic.
    pub fn describe(&self) -> &str {
        match self.kind {
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of input",
            _ => &self.lexeme,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:?}, '{}'>", self.kind, self.describe())
    }
}

/// Tokenizes `source`, resolving `import`s relative to the current directory.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let loader = FsModuleLoader::default();
    Lexer::new(&loader).tokenize(source)
}

/// Turns source text into tokens.
///
/// `import NAME` is expanded in place: the lexer loads module `NAME` through its
/// [`ModuleLoader`] and splices the module's tokens into the stream.
pub struct Lexer<'a> {
    loader: &'a dyn ModuleLoader,
    /// Modules currently being expanded, innermost last.
    loading: Vec<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(loader: &'a dyn ModuleLoader) -> Self {
        Self {
            loader,
            loading: Vec::new(),
        }
    }

    /// Tokenizes a whole source unit. The result always ends with [`TokenKind::Eof`].
    pub fn tokenize(&mut self, source: &str) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        let line = self.scan(source, &mut tokens)?;
        tokens.push(Token::new(TokenKind::Eof, "", None, line));
        Ok(tokens)
    }

    /// Scans `source` into `tokens` and returns the line the scan ended on.
    fn scan(&mut self, source: &str, tokens: &mut Vec<Token>) -> Result<usize, Error> {
        let mut lexer = TokenKind::lexer(source);
        let mut line = 1;

        while let Some(kind) = lexer.next() {
            let lexeme = lexer.slice();
            match kind {
                TokenKind::Newline => {
                    push_newline(tokens, line);
                    line += 1;
                }
                TokenKind::Error => {
                    // only the first character is reported
                    let offending = lexeme.chars().next().unwrap_or_default();
                    return Err(if offending == '"' {
                        Error::lexical(line, offending, "Unterminated string.")
                    } else {
                        Error::lexical(line, offending, "Unexpected character.")
                    });
                }
                TokenKind::Identifier if lexeme == "import" => {
                    let name = match lexer.next() {
                        Some(TokenKind::Identifier) => lexer.slice().to_string(),
                        Some(_) => {
                            return Err(Error::lexical(
                                line,
                                lexer.slice().trim(),
                                "Expect module name after 'import'.",
                            ))
                        }
                        None => {
                            return Err(Error::lexical(
                                line,
                                "import",
                                "Expect module name after 'import'.",
                            ))
                        }
                    };
                    self.include(&name, line, tokens)?;
                }
                TokenKind::NumberLit => {
                    let val = lexeme
                        .parse()
                        .map_err(|_| Error::lexical(line, lexeme, "Invalid number literal."))?;
                    tokens.push(Token::new(kind, lexeme, Some(Literal::Number(val)), line));
                }
                TokenKind::StringLit => {
                    let content = &lexeme[1..lexeme.len() - 1];
                    tokens.push(Token::new(
                        kind,
                        lexeme,
                        Some(Literal::Str(content.to_string())),
                        line,
                    ));
                    line += content.matches('\n').count();
                }
                _ => tokens.push(Token::new(kind, lexeme, None, line)),
            }
        }

        // end of input acts as a final line break
        push_newline(tokens, line);
        Ok(line)
    }

    /// Expands `import name` by splicing the module's tokens into `tokens`.
    fn include(&mut self, name: &str, line: usize, tokens: &mut Vec<Token>) -> Result<(), Error> {
        if self.loading.iter().any(|loading| loading == name) {
            return Err(Error::import(
                line,
                name,
                format!("Module '{}' imports itself.", name),
            ));
        }

        let source = self.loader.load(name).map_err(|err| {
            Error::import(line, name, format!("Could not load module '{}': {}", name, err))
        })?;
        tracing::debug!(module = name, "including module");

        self.loading.push(name.to_string());
        let result = self.scan(&source, tokens);
        self.loading.pop();
        // lines inside a module count from the start of that module
        result.map(|_| ()).map_err(|mut err| {
            err.message = format!("{} (in module '{}')", err.message, name);
            err
        })
    }
}

/// Emits a [`TokenKind::Newline`] if the previous token ends a statement.
fn push_newline(tokens: &mut Vec<Token>, line: usize) {
    if tokens
        .last()
        .map_or(false, |token| token.kind.terminates_statement())
    {
        tokens.push(Token::new(TokenKind::Newline, "\n", None, line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sardine_source::{ErrorKind, MemoryModuleLoader};

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("( ) , + - * / = == != < <= > >="),
            vec![
                LeftParen,
                RightParen,
                Comma,
                Plus,
                Minus,
                Star,
                Slash,
                Equal,
                EqualEqual,
                BangEqual,
                Less,
                LessEqual,
                Greater,
                GreaterEqual,
                Eof
            ]
        );
        assert_eq!(kinds("print  a   != b"), vec![Print, Identifier, BangEqual, Identifier, Newline, Eof]);
    }

    #[test]
    fn test_keywords() {
        use TokenKind::*;
        assert_eq!(
            kinds("and or not do end None True False while for return print def dec if else"),
            vec![
                And, Or, Not, Do, End, NoneLit, True, False, While, For, Return, Print, Def, Dec, If,
                Else, Eof
            ]
        );
        // longest match wins over the keyword table
        assert_eq!(kinds("dec_x ender"), vec![Identifier, Identifier, Newline, Eof]);
    }

    #[test]
    fn test_literals() {
        let tokens = tokenize(r#"12 3.5 4. "hi there""#).unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Number(12.0)));
        assert_eq!(tokens[1].literal, Some(Literal::Number(3.5)));
        assert_eq!(tokens[2].literal, Some(Literal::Number(4.0)));
        assert_eq!(tokens[3].kind, TokenKind::StringLit);
        assert_eq!(tokens[3].lexeme, "\"hi there\"");
        assert_eq!(tokens[3].literal, Some(Literal::Str("hi there".to_string())));
    }

    #[test]
    fn test_significant_newlines() {
        use TokenKind::*;
        assert_eq!(
            kinds("dec a = 5\n\n\nprint a\n"),
            vec![Dec, Identifier, Equal, NumberLit, Newline, Print, Identifier, Newline, Eof]
        );
        // newlines after `do` and after operators are absorbed
        assert_eq!(
            kinds("def f() do\n  return 1 +\n 2\nend\n"),
            vec![
                Def, Identifier, LeftParen, RightParen, Do, Return, NumberLit, Plus, NumberLit, Newline,
                End, Eof
            ]
        );
        // end of input terminates the last statement
        assert_eq!(kinds("x"), vec![Identifier, Newline, Eof]);
    }

    #[test]
    fn test_comments() {
        use TokenKind::*;
        assert_eq!(
            kinds("dec x = 1 # a comment\n# another\nx"),
            vec![Dec, Identifier, Equal, NumberLit, Newline, Identifier, Newline, Eof]
        );
    }

    #[test]
    fn test_lines() {
        let tokens = tokenize("a\n\"multi\nline\"\nb").unwrap();
        let lines: Vec<_> = tokens
            .iter()
            .map(|token| (token.kind, token.line))
            .collect();
        assert_eq!(
            lines,
            vec![
                (TokenKind::Identifier, 1),
                (TokenKind::Newline, 1),
                (TokenKind::StringLit, 2),
                (TokenKind::Newline, 3),
                (TokenKind::Identifier, 4),
                (TokenKind::Newline, 4),
                (TokenKind::Eof, 4),
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("dec x = 1\nprint \"oops\n").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert_eq!(err.line, 2);
        assert_eq!(err.token, "\"");
        assert_eq!(err.message, "Unterminated string.");
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("dec x = 1\ndec y = x @ 2").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert_eq!(err.line, 2);
        assert_eq!(err.token, "@");

        let err = tokenize("if a or !b").unwrap_err();
        assert_eq!(err.token, "!");
    }

    #[test]
    fn test_import() {
        use TokenKind::*;
        let loader = MemoryModuleLoader::new().with_module("lib", "dec pi = 3\n");
        let tokens = Lexer::new(&loader)
            .tokenize("import lib\nprint pi\n")
            .unwrap();
        let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
        assert_eq!(
            kinds,
            vec![Dec, Identifier, Equal, NumberLit, Newline, Print, Identifier, Newline, Eof]
        );
        assert_eq!(tokens[1].lexeme, "pi");
    }

    #[test]
    fn test_import_errors() {
        let loader = MemoryModuleLoader::new()
            .with_module("a", "import b\n")
            .with_module("b", "import a\n");

        let err = Lexer::new(&loader).tokenize("import a").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Import);
        assert_eq!(err.token, "a");

        let err = Lexer::new(&loader).tokenize("import missing").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Import);
        assert_eq!(err.token, "missing");

        let err = Lexer::new(&loader).tokenize("import (").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert_eq!(err.token, "(");
    }

    #[test]
    fn test_error_inside_module() {
        let loader = MemoryModuleLoader::new()
            .with_module("broken", "dec x = 1\ndec y = $\n")
            .with_module("outer", "import broken\n");

        let err = Lexer::new(&loader).tokenize("print 1\nimport broken").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lexical);
        assert_eq!(err.line, 2);
        assert_eq!(err.token, "$");
        assert_eq!(err.message, "Unexpected character. (in module 'broken')");

        let err = Lexer::new(&loader).tokenize("import outer").unwrap_err();
        assert_eq!(
            err.message,
            "Unexpected character. (in module 'broken') (in module 'outer')"
        );
    }

    #[test]
    fn test_repeated_import() {
        let loader = MemoryModuleLoader::new().with_module("one", "1\n");
        let tokens = Lexer::new(&loader).tokenize("import one\nimport one\n").unwrap();
        let numbers = tokens
            .iter()
            .filter(|token| token.kind == TokenKind::NumberLit)
            .count();
        assert_eq!(numbers, 2);
    }
}
