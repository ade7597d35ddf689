use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::interner::{Interner, Symbol};
use crate::token::TokenKind;

/// Per-session state shared by the scanner and the evaluator.
///
/// Anchors the identifier interner and maps interned keyword symbols to their token kinds.
/// Scanning and evaluating with different contexts makes identical names unequal, so one
/// interpreter session owns exactly one context.
#[derive(Debug)]
pub struct Context {
    interner: RefCell<Interner>,
    keywords: HashMap<Symbol, TokenKind>,
}

impl Context {
    pub fn new() -> Rc<Self> {
        let mut interner = Interner::new();

        let keywords = KEYWORDS
            .iter()
            .map(|(name, kind)| (interner.symbol(name), kind.clone()))
            .collect();

        Rc::new(Context {
            interner: RefCell::new(interner),
            keywords,
        })
    }

    /// Interns `name`.
    pub fn symbol(&self, name: &str) -> Symbol {
        self.interner.borrow_mut().symbol(name)
    }

    /// Token kind for `sym` if it is a reserved word.
    pub fn keyword(&self, sym: &Symbol) -> Option<TokenKind> {
        self.keywords.get(sym).cloned()
    }
}

const KEYWORDS: [(&str, TokenKind); 17] = [
    ("and", TokenKind::And),
    ("break", TokenKind::Break),
    ("class", TokenKind::Class),
    ("else", TokenKind::Else),
    ("false", TokenKind::False),
    ("for", TokenKind::For),
    ("fun", TokenKind::Fun),
    ("if", TokenKind::If),
    ("nil", TokenKind::Nil),
    ("or", TokenKind::Or),
    ("print", TokenKind::Print),
    ("return", TokenKind::Return),
    ("super", TokenKind::Super),
    ("this", TokenKind::This),
    ("true", TokenKind::True),
    ("var", TokenKind::Var),
    ("while", TokenKind::While),
];
