//! Renders the AST as S-expressions, e.g. `(+ 1 (* 2 3))`.

use crate::ast::{Expr, Stmt};
use crate::visitor::{walk_expr, walk_stmt, Visitor};

#[derive(Default)]
pub struct Printer {
    buf: String,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders a single expression.
    pub fn print_expr(expr: &Expr) -> String {
        let mut printer = Self::new();
        printer.visit_expr(expr);
        printer.buf
    }

    /// Renders statements, one per line.
    pub fn print_program(stmts: &[Stmt]) -> String {
        stmts
            .iter()
            .map(|stmt| {
                let mut printer = Self::new();
                printer.visit_stmt(stmt);
                printer.buf
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn atom(&mut self, text: &str) {
        if !self.buf.is_empty() && !self.buf.ends_with('(') {
            self.buf.push(' ');
        }
        self.buf.push_str(text);
    }

    fn open(&mut self, label: &str) {
        self.atom("(");
        self.buf.push_str(label);
    }

    fn close(&mut self) {
        self.buf.push(')');
    }
}

impl<'ast> Visitor<'ast> for Printer {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Literal(literal) => self.atom(&literal.to_string()),
            Expr::Variable(name) => self.atom(&name.lexeme),
            Expr::Grouping(_) => {
                self.open("group");
                walk_expr(self, expr);
                self.close();
            }
            Expr::Assign { name, .. } => {
                self.open("assign");
                self.atom(&name.lexeme);
                walk_expr(self, expr);
                self.close();
            }
            Expr::Binary { op, .. } | Expr::Logical { op, .. } | Expr::Unary { op, .. } => {
                self.open(&op.lexeme);
                walk_expr(self, expr);
                self.close();
            }
            Expr::Call { .. } => {
                self.open("call");
                walk_expr(self, expr);
                self.close();
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::VarDecl { name, .. } => {
                self.open("dec");
                self.atom(&name.lexeme);
                walk_stmt(self, stmt);
                self.close();
            }
            Stmt::Print { .. } => {
                self.open("print");
                walk_stmt(self, stmt);
                self.close();
            }
            Stmt::ExprStmt(expr) => self.visit_expr(expr),
            Stmt::Block(_) => {
                self.open("block");
                walk_stmt(self, stmt);
                self.close();
            }
            Stmt::If { .. } => {
                self.open("if");
                walk_stmt(self, stmt);
                self.close();
            }
            Stmt::FnDecl(decl) => {
                self.open("def");
                self.atom(&decl.name.lexeme);
                let params = decl
                    .params
                    .iter()
                    .map(|param| param.lexeme.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                self.atom(&format!("({})", params));
                walk_stmt(self, stmt);
                self.close();
            }
            Stmt::Return { .. } => {
                self.open("return");
                walk_stmt(self, stmt);
                self.close();
            }
        }
    }
}
