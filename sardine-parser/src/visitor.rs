//! Visitor pattern for AST nodes.

use crate::ast::{Expr, Stmt};

pub trait Visitor<'ast>: Sized {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }
}

pub fn walk_expr<'ast>(visitor: &mut impl Visitor<'ast>, expr: &'ast Expr) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Variable(_) => {}
        Expr::Grouping(inner) => visitor.visit_expr(inner),
        Expr::Assign { name: _, value } => visitor.visit_expr(value),
        Expr::Binary { lhs, op: _, rhs } | Expr::Logical { lhs, op: _, rhs } => {
            visitor.visit_expr(lhs);
            visitor.visit_expr(rhs);
        }
        Expr::Unary { op: _, arg } => visitor.visit_expr(arg),
        Expr::Call {
            callee,
            paren: _,
            args,
        } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
    }
}

pub fn walk_stmt<'ast>(visitor: &mut impl Visitor<'ast>, stmt: &'ast Stmt) {
    /// Iteratively visit all statements in a `Vec<Stmt>`.
    macro_rules! visit_stmt_list {
        ($visitor: expr, $body: expr) => {
            for stmt in $body {
                Visitor::visit_stmt($visitor, stmt);
            }
        };
    }

    match stmt {
        Stmt::VarDecl {
            name: _,
            initializer,
        } => {
            if let Some(initializer) = initializer {
                visitor.visit_expr(initializer);
            }
        }
        Stmt::Print { keyword: _, expr } | Stmt::ExprStmt(expr) => visitor.visit_expr(expr),
        Stmt::Block(body) => visit_stmt_list!(visitor, body),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::FnDecl(decl) => visit_stmt_list!(visitor, &decl.body),
        Stmt::Return { keyword: _, value } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
    }
}
