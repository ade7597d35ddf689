//! Runtime values and the callable abstraction.

use std::fmt;
use std::rc::Rc;

use crate::ast::{FunDecl, LiteralValue};
use crate::eval::RuntimeErrorKind;
use crate::scope::Scope;

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Callable(Callable),
}

impl Value {
    /// Only `nil` and `false` are falsey.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Callable(_) => "function",
        }
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Value {
        match literal {
            LiteralValue::Nil => Value::Nil,
            LiteralValue::Bool(b) => Value::Bool(*b),
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(Rc::from(s))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(Rc::from(s))
    }
}

/// Nil equals only nil. Other values compare by kind then content; callables by identity.
///
/// Numbers are equal when their bit patterns are, with every NaN collapsed into one: NaN
/// equals itself and `-0` differs from `0`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => {
                (l.is_nan() && r.is_nan()) || l.to_bits() == r.to_bits()
            }
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Callable(l), Value::Callable(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{}", s),
            Value::Callable(c) => write!(f, "{}", c),
        }
    }
}

/// Number text with a trailing `.0` removed: `3.0` gives `3`, `2.5` stays `2.5`.
///
/// Magnitudes in `[1e-3, 1e7)` are written in plain decimal notation, others in scientific
/// notation with a mandatory fractional digit: `1.0E7`, `1.5E-5`.
pub fn format_number(n: f64) -> String {
    let text = number_text(n);
    match text.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => text,
    }
}

fn number_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = n.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        // Debug output of floats in this range is shortest round-trip decimal with a `.0`.
        return format!("{:?}", n);
    }
    // `{:e}` gives the shortest round-trip digits, e.g. `1.2345e-5` or `1e7`.
    let sci = format!("{:e}", n);
    match sci.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            format!("{}E{}", mantissa, exponent)
        }
        Some((mantissa, exponent)) => format!("{}.0E{}", mantissa, exponent),
        None => sci,
    }
}

/// Host-implemented function body.
pub type NativeFn = fn(&[Value]) -> Result<Value, RuntimeErrorKind>;

/// Anything that can appear on the left of a call.
#[derive(Debug, Clone)]
pub enum Callable {
    Native(Rc<NativeFunction>),
    User(Rc<UserFunction>),
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::Native(native) => &native.name,
            Callable::User(user) => &user.decl.name.lexeme,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(native) => native.arity,
            Callable::User(user) => user.decl.params.len(),
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native(l), Callable::Native(r)) => Rc::ptr_eq(l, r),
            (Callable::User(l), Callable::User(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(native) => write!(f, "<native fn {}>", native.name),
            Callable::User(user) => write!(f, "<fn {}>", user.decl.name.lexeme),
        }
    }
}

pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub body: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// A `fun` declaration bound to the scope it was declared in.
pub struct UserFunction {
    pub decl: Rc<FunDecl>,
    pub closure: Rc<Scope>,
}

// The closure scope usually contains the function itself, so it is left out.
impl fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFunction")
            .field("name", &self.decl.name.lexeme)
            .field("arity", &self.decl.params.len())
            .finish()
    }
}
