//! Syntax tree.
//!
//! Both node families are closed sum types; every pass over the tree is an exhaustive `match`.

use std::rc::Rc;

use crate::token::Token;

#[derive(Debug, PartialEq, Clone)]
pub enum Stmt {
    Expr(Expr),
    /// The token is the `print` keyword, kept for diagnostics.
    Print(Token, Expr),
    /// `None` initializer leaves the variable uninitialized (not nil).
    VarDecl(Token, Option<Expr>),
    Block(Vec<Stmt>),
    /// Both branches are always brace-delimited blocks.
    If(Expr, Vec<Stmt>, Option<Vec<Stmt>>),
    While(Expr, Box<Stmt>),
    Break(Token),
    FunDecl(Rc<FunDecl>),
    Return(Token, Option<Expr>),
}

/// Function declaration, shared between the tree and the function values created from it.
#[derive(Debug, PartialEq, Clone)]
pub struct FunDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expr {
    Literal(LiteralValue),
    Var(Token),
    Assign(Token, Box<Expr>),
    Unary(Token, Box<Expr>),
    Binary(Box<Expr>, Token, Box<Expr>),
    /// Operator is `and` or `or`.
    Logical(Box<Expr>, Token, Box<Expr>),
    Group(Box<Expr>),
    /// Callee, closing parenthesis (for runtime error attribution) and arguments.
    Call(Box<Expr>, Token, Vec<Expr>),
}

/// Constant embedded in the tree.
#[derive(Debug, PartialEq, Clone)]
pub enum LiteralValue {
    Nil,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
}
