use std::fmt;

use thiserror::Error;

/// Line number (starting at one).
pub type Position = u32;

/// Lexical or syntactic error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct SyntaxError {
    pub line: Position,
    /// Either empty, ` at end` or ` at 'lexeme'`.
    pub location: String,
    pub message: String,
}

impl SyntaxError {
    /// Error found by the scanner, which has no token to point at.
    pub fn at_line(line: Position, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line,
            location: String::new(),
            message: message.into(),
        }
    }
}

/// Every syntax error found in one source text, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrors(pub Vec<SyntaxError>);

impl SyntaxErrors {
    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_error_has_no_location() {
        let e = SyntaxError::at_line(3, "Unexpected character '@'.");
        assert_eq!(e.to_string(), "[line 3] Error: Unexpected character '@'.");
    }

    #[test]
    fn errors_are_listed_one_per_line() {
        let errors = SyntaxErrors(vec![
            SyntaxError::at_line(1, "first"),
            SyntaxError {
                line: 2,
                location: " at end".to_string(),
                message: "second".to_string(),
            },
        ]);
        assert_eq!(
            errors.to_string(),
            "[line 1] Error: first\n[line 2] Error at end: second"
        );
    }
}
