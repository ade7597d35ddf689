//! Lexical scope chain.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::eval::RuntimeErrorKind;
use crate::interner::Symbol;
use crate::value::Value;

/// One link of the scope chain.
///
/// A binding holding `None` was declared without an initializer; reading it is an error
/// distinct from reading a name that was never declared.
///
/// The enclosing scope is a shared handle rather than an owner-of-record: the block or call
/// that created a scope drops its handle on exit, and the scope lives on only if a function
/// value declared inside it captured it.
#[derive(Debug)]
pub struct Scope {
    enclosing: Option<Rc<Scope>>,
    bindings: RefCell<HashMap<Symbol, Option<Value>>>,
}

impl Scope {
    /// Creates an outermost scope.
    pub fn global() -> Rc<Scope> {
        Rc::new(Scope {
            enclosing: None,
            bindings: RefCell::new(HashMap::new()),
        })
    }

    /// Creates an empty scope nested in `enclosing`.
    pub fn child(enclosing: &Rc<Scope>) -> Rc<Scope> {
        Rc::new(Scope {
            enclosing: Some(enclosing.clone()),
            bindings: RefCell::new(HashMap::new()),
        })
    }

    /// Binds `name` in this scope only, replacing any previous binding here.
    pub fn declare(&self, name: &Symbol, value: Option<Value>) {
        self.bindings.borrow_mut().insert(name.clone(), value);
    }

    /// Binds `name` to an initialized value in this scope.
    pub fn define(&self, name: &Symbol, value: Value) {
        self.declare(name, Some(value))
    }

    /// Reads the innermost binding of `name`.
    pub fn lookup(&self, name: &Symbol) -> Result<Value, RuntimeErrorKind> {
        if let Some(slot) = self.bindings.borrow().get(name) {
            return slot
                .clone()
                .ok_or_else(|| RuntimeErrorKind::Uninitialized(name.name().to_string()));
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.lookup(name),
            None => Err(RuntimeErrorKind::Undefined(name.name().to_string())),
        }
    }

    /// Overwrites the innermost existing binding of `name`. Never creates a binding.
    pub fn assign(&self, name: &Symbol, value: Value) -> Result<(), RuntimeErrorKind> {
        if let Some(slot) = self.bindings.borrow_mut().get_mut(name) {
            *slot = Some(value);
            return Ok(());
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.assign(name, value),
            None => Err(RuntimeErrorKind::Undefined(name.name().to_string())),
        }
    }

    /// Number of scopes enclosing this one.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.enclosing.as_deref();
        while let Some(scope) = current {
            depth += 1;
            current = scope.enclosing.as_deref();
        }
        depth
    }
}
