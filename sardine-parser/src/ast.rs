use crate::lexer::{Literal, Token};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// A parenthesized expression (e.g. `(1 + 2)`).
    Grouping(Box<Expr>),
    /// A variable reference (e.g. `foo`).
    Variable(Token),
    /// An assignment to an existing variable (e.g. `x = 1`).
    Assign { name: Token, value: Box<Expr> },
    /// A binary expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// A short-circuiting `and` / `or` expression.
    Logical {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// A prefix `not` or `-` expression.
    Unary { op: Token, arg: Box<Expr> },
    /// A call expression (e.g. `f(1, 2)`).
    Call {
        callee: Box<Expr>,
        /// The closing parenthesis, kept for diagnostics.
        paren: Token,
        args: Vec<Expr>,
    },
}

/// A function declaration (`def name(params) do ... end`).
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `dec name [= initializer]`
    VarDecl {
        name: Token,
        initializer: Option<Expr>,
    },
    Print {
        keyword: Token,
        expr: Expr,
    },
    ExprStmt(Expr),
    /// `do ... end`
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// Shared with every function value created from it.
    FnDecl(Rc<FnDecl>),
    Return {
        keyword: Token,
        value: Option<Expr>,
    },
}
