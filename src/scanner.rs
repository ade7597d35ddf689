//! Lexical analyzer

use std::rc::Rc;

use tracing::trace;

use crate::ctx::Context;
use crate::diag::{Position, SyntaxError};
use crate::token::{Token, TokenKind};

/// Output of a full scan: every token that could be produced, terminated by `Eof`, and every
/// lexical error met on the way.
#[derive(Debug)]
pub struct Scanned {
    pub tokens: Vec<Token>,
    pub errors: Vec<SyntaxError>,
}

/// Turns source text into tokens.
#[derive(Debug)]
pub struct Scanner {
    chars: Vec<char>,
    // Index of the first char of the token being scanned.
    start: usize,
    current: usize,
    line: Position,
    ctx: Rc<Context>,
}

impl Scanner {
    pub fn new(source: &str, ctx: Rc<Context>) -> Scanner {
        Scanner {
            chars: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            ctx,
        }
    }

    /// Scans the whole input. Errors do not stop the scan.
    pub fn scan_tokens(mut self) -> Scanned {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match self.next_token() {
                Ok(token) => {
                    let eof = token.is_eof();
                    tokens.push(token);
                    if eof {
                        break;
                    }
                }
                Err(e) => {
                    trace!(line = e.line, "lexical error: {}", e.message);
                    errors.push(e);
                }
            }
        }
        Scanned { tokens, errors }
    }

    /// Scans the next token, skipping blanks and comments.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        loop {
            self.start = self.current;
            let ch = match self.advance() {
                None => return Ok(Token::new(TokenKind::Eof, "", self.line)),
                Some(ch) => ch,
            };
            let kind = match ch {
                '\n' => {
                    self.line += 1;
                    continue;
                }
                ' ' | '\t' | '\r' => continue,
                '(' => TokenKind::LeftParen,
                ')' => TokenKind::RightParen,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                '-' => TokenKind::Minus,
                '+' => TokenKind::Plus,
                ';' => TokenKind::Semicolon,
                '*' => TokenKind::Star,
                '!' => self.either('=', TokenKind::BangEqual, TokenKind::Bang),
                '=' => self.either('=', TokenKind::EqualEqual, TokenKind::Equal),
                '<' => self.either('=', TokenKind::LessEqual, TokenKind::Less),
                '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::Greater),
                '/' => {
                    if self.advance_if('/') {
                        self.skip_line_comment();
                        continue;
                    } else if self.advance_if('*') {
                        self.skip_block_comment()?;
                        continue;
                    } else {
                        TokenKind::Slash
                    }
                }
                '"' => self.scan_string()?,
                '0'..='9' => self.scan_number(),
                'a'..='z' | 'A'..='Z' | '_' => self.scan_identifier(),
                _ => {
                    return Err(SyntaxError::at_line(
                        self.line,
                        format!("Unexpected character '{}'.", ch),
                    ))
                }
            };
            return Ok(Token::new(kind, self.lexeme(), self.line));
        }
    }

    fn skip_line_comment(&mut self) {
        while matches!(self.peek(), Some(ch) if ch != '\n') {
            self.advance();
        }
    }

    /// Skips a possibly nested `/* ... */` comment. The opening `/*` is already consumed.
    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let mut depth = 1usize;
        while depth > 0 {
            match (self.peek(), self.peek_next()) {
                (None, _) => {
                    return Err(SyntaxError::at_line(
                        self.line,
                        "Unterminated block comment.",
                    ))
                }
                (Some('/'), Some('*')) => {
                    self.current += 2;
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.current += 2;
                    depth -= 1;
                }
                (Some(ch), _) => {
                    if ch == '\n' {
                        self.line += 1;
                    }
                    self.current += 1;
                }
            }
        }
        Ok(())
    }

    /// Strings may span lines. The opening quote is already consumed.
    fn scan_string(&mut self) -> Result<TokenKind, SyntaxError> {
        loop {
            match self.advance() {
                None => return Err(SyntaxError::at_line(self.line, "Unterminated string.")),
                Some('"') => break,
                Some('\n') => self.line += 1,
                Some(_) => (),
            }
        }
        let value: String = self.chars[self.start + 1..self.current - 1].iter().collect();
        Ok(TokenKind::String(Rc::from(value)))
    }

    fn scan_number(&mut self) -> TokenKind {
        self.skip_digits();
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(ch) if ch.is_ascii_digit())
        {
            self.current += 1;
            self.skip_digits();
        }
        // Only digits and at most one inner dot were accepted, so this cannot fail.
        let value = self.lexeme().parse::<f64>().unwrap_or_default();
        TokenKind::Number(value)
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            self.current += 1;
        }
    }

    fn scan_identifier(&mut self) -> TokenKind {
        while matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            self.current += 1;
        }
        let sym = self.ctx.symbol(&self.lexeme());
        self.ctx.keyword(&sym).unwrap_or(TokenKind::Identifier(sym))
    }

    fn either(&mut self, expected: char, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.advance_if(expected) {
            matched
        } else {
            otherwise
        }
    }

    fn lexeme(&self) -> String {
        self.chars[self.start..self.current].iter().collect()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.current).copied();
        if ch.is_some() {
            self.current += 1;
        }
        ch
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.current + 1).copied()
    }
}
