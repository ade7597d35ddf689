use std::fmt;
use std::rc::Rc;

use crate::diag::Position;
use crate::interner::Symbol;

/// A lexeme scanned from source text.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text of the token (empty for `Eof`).
    pub lexeme: String,
    pub line: Position,
}

/// Token category. Literal kinds carry their decoded value.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Semicolon,

    // Operators
    Minus,
    Plus,
    Slash,
    Star,
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier(Symbol),
    String(Rc<str>),
    Number(f64),

    // Keywords
    And,
    Break,
    Class,
    Else,
    False,
    For,
    Fun,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

/// Decoded value of a literal token.
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(f64),
    String(Rc<str>),
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: Position) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn literal(&self) -> Option<Literal> {
        match &self.kind {
            TokenKind::Number(n) => Some(Literal::Number(*n)),
            TokenKind::String(s) => Some(Literal::String(s.clone())),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl TokenKind {
    /// True for tokens the parser may resynchronize on after a syntax error.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Break
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Eof => write!(f, "end"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_of_number_token() {
        let token = Token::new(TokenKind::Number(4.5), "4.5", 1);
        assert_eq!(token.literal(), Some(Literal::Number(4.5)));
    }

    #[test]
    fn operators_have_no_literal() {
        let token = Token::new(TokenKind::Plus, "+", 1);
        assert_eq!(token.literal(), None);
    }

    #[test]
    fn display_quotes_lexeme() {
        assert_eq!(Token::new(TokenKind::Semicolon, ";", 3).to_string(), "';'");
        assert_eq!(Token::new(TokenKind::Eof, "", 3).to_string(), "end");
    }
}
