use std::cmp::Ordering;
use std::io::prelude::*;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{Expr, FunDecl, Stmt};
use crate::ctx::Context;
use crate::interner::Symbol;
use crate::scope::Scope;
use crate::stdlib;
use crate::token::{Token, TokenKind};
use crate::value::{format_number, Callable, NativeFn, NativeFunction, UserFunction, Value};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("Undefined variable '{0}'.")]
    Undefined(String),
    #[error("Variable '{0}' is used before being initialized.")]
    Uninitialized(String),
    #[error("{0}")]
    TypeMismatch(String),
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Can only call functions.")]
    NotCallable,
    #[error("Wrong number of arguments: expected {expected}, received {received}.")]
    ArityMismatch { expected: usize, received: usize },
    #[error("Repeated string would exceed {} bytes.", MAX_REPEAT_LEN)]
    RepetitionTooLarge,
    #[error("Unsupported operator.")]
    UnsupportedOperator,
    #[error("Cannot write program output: {0}")]
    Io(String),
}

/// Failure attributed to the token of the construct that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error at '{lexeme}': {kind}", line = .token.line, lexeme = .token.lexeme)]
pub struct RuntimeError {
    pub token: Token,
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(token: &Token, kind: RuntimeErrorKind) -> RuntimeError {
        RuntimeError {
            token: token.clone(),
            kind,
        }
    }
}

/// How a statement finished.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Completed,
    /// A `break` is unwinding to the innermost loop.
    BrokeOut,
    /// A `return` is unwinding to the innermost call.
    Returned(Value),
}

type ExecResult = Result<Flow, RuntimeError>;

/// Tree-walking evaluator.
///
/// `scope` is the scope statements currently execute in. Blocks and calls swap it for a
/// child scope and put the previous one back on every exit path, errors included.
#[derive(Debug)]
pub struct Evaluator<'t, W: Write> {
    output: &'t mut W,
    globals: Rc<Scope>,
    scope: Rc<Scope>,
    ctx: Rc<Context>,
}

impl<'t, W: Write> Evaluator<'t, W> {
    /// Creates an evaluator whose global scope holds the standard natives.
    pub fn new(output: &'t mut W, ctx: Rc<Context>) -> Evaluator<'t, W> {
        let globals = Scope::global();
        let mut evaluator = Evaluator {
            output,
            scope: globals.clone(),
            globals,
            ctx,
        };
        for (name, arity, body) in stdlib::standard_library() {
            evaluator.define_native(name, arity, body);
        }
        evaluator
    }

    /// Binds a host function in the global scope, replacing any previous binding.
    pub fn define_native(&mut self, name: &str, arity: usize, body: NativeFn) {
        let native = NativeFunction {
            name: name.to_string(),
            arity,
            body,
        };
        self.globals.define(
            &self.ctx.symbol(name),
            Value::Callable(Callable::Native(Rc::new(native))),
        );
    }

    /// Executes top-level statements in order, stopping at the first runtime error.
    ///
    /// Bindings made before the error stay in the global scope.
    pub fn interpret(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in stmts {
            match self.execute(stmt) {
                Ok(Flow::Completed) => (),
                Ok(flow) => {
                    debug!(?flow, "top-level statement ended the run");
                    break;
                }
                Err(e) => {
                    debug!(error = %e, "runtime error");
                    self.scope = self.globals.clone();
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Expr(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::Print(keyword, expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value).map_err(|e| {
                    RuntimeError::new(keyword, RuntimeErrorKind::Io(e.to_string()))
                })?;
            }
            Stmt::VarDecl(name, init) => {
                let value = match init {
                    Some(expr) => Some(self.evaluate(expr)?),
                    None => None,
                };
                let sym = self.symbol_of(name);
                self.scope.declare(&sym, value);
            }
            Stmt::Block(stmts) => {
                let scope = Scope::child(&self.scope);
                return self.execute_block(stmts, scope);
            }
            Stmt::If(cond, then_branch, else_branch) => {
                if self.evaluate(cond)?.is_truthy() {
                    return self.execute_block(then_branch, Scope::child(&self.scope));
                }
                if let Some(else_branch) = else_branch {
                    return self.execute_block(else_branch, Scope::child(&self.scope));
                }
            }
            Stmt::While(cond, body) => {
                while self.evaluate(cond)?.is_truthy() {
                    match self.execute(body)? {
                        Flow::Completed => (),
                        Flow::BrokeOut => break,
                        returned @ Flow::Returned(_) => return Ok(returned),
                    }
                }
            }
            Stmt::Break(_) => return Ok(Flow::BrokeOut),
            Stmt::FunDecl(decl) => self.declare_function(decl),
            Stmt::Return(_, value) => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                return Ok(Flow::Returned(value));
            }
        }
        Ok(Flow::Completed)
    }

    /// Runs `stmts` in `scope`, then restores the current scope whatever the outcome.
    fn execute_block(&mut self, stmts: &[Stmt], scope: Rc<Scope>) -> ExecResult {
        let previous = std::mem::replace(&mut self.scope, scope);
        let result = self.execute_all(stmts);
        self.scope = previous;
        result
    }

    fn execute_all(&mut self, stmts: &[Stmt]) -> ExecResult {
        for stmt in stmts {
            match self.execute(stmt)? {
                Flow::Completed => (),
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Completed)
    }

    fn declare_function(&mut self, decl: &Rc<FunDecl>) {
        let function = UserFunction {
            decl: decl.clone(),
            closure: self.scope.clone(),
        };
        trace!(name = %decl.name.lexeme, depth = self.scope.depth(), "declare function");
        let sym = self.symbol_of(&decl.name);
        self.scope
            .define(&sym, Value::Callable(Callable::User(Rc::new(function))));
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal)),
            Expr::Group(inner) => self.evaluate(inner),
            Expr::Var(name) => self
                .scope
                .lookup(&self.symbol_of(name))
                .map_err(|kind| RuntimeError::new(name, kind)),
            Expr::Assign(name, rhs) => {
                let value = self.evaluate(rhs)?;
                self.scope
                    .assign(&self.symbol_of(name), value.clone())
                    .map_err(|kind| RuntimeError::new(name, kind))?;
                Ok(value)
            }
            Expr::Logical(lhs, op, rhs) => {
                let left = self.evaluate(lhs)?;
                let short_circuits = match op.kind {
                    TokenKind::Or => left.is_truthy(),
                    TokenKind::And => !left.is_truthy(),
                    _ => {
                        return Err(RuntimeError::new(
                            op,
                            RuntimeErrorKind::UnsupportedOperator,
                        ))
                    }
                };
                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(rhs)
                }
            }
            Expr::Unary(op, operand) => {
                let value = self.evaluate(operand)?;
                unary(op, value).map_err(|kind| RuntimeError::new(op, kind))
            }
            Expr::Binary(lhs, op, rhs) => {
                let left = self.evaluate(lhs)?;
                let right = self.evaluate(rhs)?;
                binary(op, left, right).map_err(|kind| RuntimeError::new(op, kind))
            }
            Expr::Call(callee, paren, args) => {
                let callee = self.evaluate(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<Value>, RuntimeError>>()?;
                match callee {
                    Value::Callable(callable) => self.call(&callable, args, paren),
                    _ => Err(RuntimeError::new(paren, RuntimeErrorKind::NotCallable)),
                }
            }
        }
    }

    fn call(
        &mut self,
        callable: &Callable,
        args: Vec<Value>,
        paren: &Token,
    ) -> Result<Value, RuntimeError> {
        if args.len() != callable.arity() {
            return Err(RuntimeError::new(
                paren,
                RuntimeErrorKind::ArityMismatch {
                    expected: callable.arity(),
                    received: args.len(),
                },
            ));
        }
        trace!(name = callable.name(), arity = args.len(), "call");
        match callable {
            Callable::Native(native) => {
                (native.body)(&args).map_err(|kind| RuntimeError::new(paren, kind))
            }
            Callable::User(function) => {
                let scope = Scope::child(&function.closure);
                for (param, arg) in function.decl.params.iter().zip(args.into_iter()) {
                    scope.define(&self.symbol_of(param), arg);
                }
                match self.execute_block(&function.decl.body, scope)? {
                    Flow::Returned(value) => Ok(value),
                    Flow::Completed | Flow::BrokeOut => Ok(Value::Nil),
                }
            }
        }
    }

    // Hand-built trees may carry a non-identifier token; its lexeme is the name.
    fn symbol_of(&self, name: &Token) -> Symbol {
        match &name.kind {
            TokenKind::Identifier(sym) => sym.clone(),
            _ => self.ctx.symbol(&name.lexeme),
        }
    }
}

fn unary(op: &Token, value: Value) -> Result<Value, RuntimeErrorKind> {
    match (&op.kind, value) {
        (TokenKind::Minus, Value::Number(n)) => Ok(Value::from(-n)),
        (TokenKind::Minus, value) => Err(RuntimeErrorKind::TypeMismatch(format!(
            "Operand must be a number, got {}.",
            value.type_name()
        ))),
        (TokenKind::Bang, value) => Ok(Value::from(!value.is_truthy())),
        _ => Err(RuntimeErrorKind::UnsupportedOperator),
    }
}

fn binary(op: &Token, left: Value, right: Value) -> Result<Value, RuntimeErrorKind> {
    use Value::{Number, Str};

    match (&op.kind, left, right) {
        (TokenKind::EqualEqual, l, r) => Ok(Value::from(l == r)),
        (TokenKind::BangEqual, l, r) => Ok(Value::from(l != r)),

        (TokenKind::Plus, Number(l), Number(r)) => Ok(Value::from(l + r)),
        (TokenKind::Plus, Str(l), Str(r)) => Ok(Value::from(format!("{}{}", l, r))),
        (TokenKind::Plus, Number(l), Str(r)) => {
            Ok(Value::from(format!("{}{}", format_number(l), r)))
        }
        (TokenKind::Plus, Str(l), Number(r)) => {
            Ok(Value::from(format!("{}{}", l, format_number(r))))
        }
        (TokenKind::Plus, l, r) => Err(operands_mismatch("two numbers or two strings", &l, &r)),

        (TokenKind::Minus, Number(l), Number(r)) => Ok(Value::from(l - r)),
        // Divisors are checked the way an integer conversion sees them: NaN counts as zero.
        (TokenKind::Slash, Number(_), Number(r)) if r.is_nan() || r.trunc() == 0.0 => {
            Err(RuntimeErrorKind::DivisionByZero)
        }
        (TokenKind::Slash, Number(l), Number(r)) => Ok(Value::from(l / r)),

        (TokenKind::Star, Number(l), Number(r)) => Ok(Value::from(l * r)),
        (TokenKind::Star, Str(s), Number(n)) | (TokenKind::Star, Number(n), Str(s)) => {
            Ok(Value::from(repeat(&s, n)?))
        }
        (TokenKind::Star, l, r) => Err(operands_mismatch(
            "two numbers or a string and a number",
            &l,
            &r,
        )),

        (TokenKind::Greater, Number(l), Number(r)) => Ok(Value::from(l > r)),
        (TokenKind::Greater, Str(l), Str(r)) => {
            Ok(Value::from(compare_ignore_case(&l, &r) == Ordering::Greater))
        }
        (TokenKind::Greater, l, r) => {
            Err(operands_mismatch("two numbers or two strings", &l, &r))
        }
        (TokenKind::GreaterEqual, Number(l), Number(r)) => Ok(Value::from(l >= r)),
        (TokenKind::Less, Number(l), Number(r)) => Ok(Value::from(l < r)),
        (TokenKind::LessEqual, Number(l), Number(r)) => Ok(Value::from(l <= r)),

        (TokenKind::Minus, l, r)
        | (TokenKind::Slash, l, r)
        | (TokenKind::GreaterEqual, l, r)
        | (TokenKind::Less, l, r)
        | (TokenKind::LessEqual, l, r) => Err(operands_mismatch("numbers", &l, &r)),

        _ => Err(RuntimeErrorKind::UnsupportedOperator),
    }
}

/// Longest string a repetition may build, in bytes.
pub const MAX_REPEAT_LEN: usize = 1 << 28;

/// `s` repeated `trunc(n)` times, and at least once.
fn repeat(s: &str, n: f64) -> Result<String, RuntimeErrorKind> {
    let copies = n.trunc();
    if !(copies > 1.0) {
        return Ok(s.to_string());
    }
    // Float to int casts saturate, so huge or infinite counts land on usize::MAX.
    let copies = copies as usize;
    match s.len().checked_mul(copies) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(s.repeat(copies)),
        _ => Err(RuntimeErrorKind::RepetitionTooLarge),
    }
}

fn compare_ignore_case(l: &str, r: &str) -> Ordering {
    l.chars()
        .flat_map(char::to_lowercase)
        .cmp(r.chars().flat_map(char::to_lowercase))
}

fn operands_mismatch(expected: &str, l: &Value, r: &Value) -> RuntimeErrorKind {
    RuntimeErrorKind::TypeMismatch(format!(
        "Operands must be {}, got {} and {}.",
        expected,
        l.type_name(),
        r.type_name()
    ))
}
