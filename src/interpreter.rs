//! API to control the interpreter.

use std::io::prelude::*;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::ast::Stmt;
use crate::ctx::Context;
use crate::diag::SyntaxErrors;
use crate::eval::{Evaluator, RuntimeError};
use crate::parser::{self, Parsed};
use crate::scanner::{Scanned, Scanner};
use crate::token::Token;
use crate::value::NativeFn;

/// Tree-walk interpreter session.
///
/// Global bindings persist from one [`Interpreter::eval`] call to the next, even when a
/// call stops on a runtime error.
///
/// # Example
///
/// Invoke the interpreter a first time to define a function then additional times to call this
/// function:
///
/// ```
/// # use slox::interpreter::{Interpreter, LoxError};
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output);
///
/// let func_def = r#"
///     fun max(x, y) {
///         if (x > y) {
///             return x;
///         } else {
///             return y;
///         }
///     }
/// "#;
/// interp.eval(func_def)?;
///
/// interp.eval("print max(10, 20);").expect("interpreter error");
/// interp.eval("print max(5, 4) + \" apples\";").expect("interpreter error");
///
/// assert_eq!(output, b"20\n5 apples\n");
/// # Ok::<(), LoxError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write> {
    ctx: Rc<Context>,
    evaluator: Evaluator<'t, W>,
}

/// Errors the interpreter can raise.
#[derive(Debug, Error)]
pub enum LoxError {
    /// Every lexical and syntactic error found in the source. Nothing was executed.
    #[error("{0}")]
    Syntax(SyntaxErrors),

    /// Error that stopped evaluation.
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

impl<W: Write> Interpreter<'_, W> {
    pub fn new(output: &mut W) -> Interpreter<'_, W> {
        let ctx = Context::new();
        Interpreter {
            ctx: ctx.clone(),
            evaluator: Evaluator::new(output, ctx),
        }
    }

    /// Tokenizes `source` with this session's identifier table.
    pub fn scan(&self, source: &str) -> Scanned {
        Scanner::new(source, self.ctx.clone()).scan_tokens()
    }

    pub fn parse(&self, tokens: &[Token]) -> Parsed {
        parser::parse(tokens)
    }

    /// Executes statements against the session's global scope.
    pub fn interpret(&mut self, stmts: &[Stmt]) -> Result<(), RuntimeError> {
        self.evaluator.interpret(stmts)
    }

    /// Scans, parses and, when both are error-free, executes `source`.
    pub fn eval(&mut self, source: &str) -> Result<(), LoxError> {
        let scanned = self.scan(source);
        let parsed = self.parse(&scanned.tokens);

        let mut errors = scanned.errors;
        errors.extend(parsed.errors);
        if !errors.is_empty() {
            debug!(count = errors.len(), "not executing program with syntax errors");
            return Err(LoxError::Syntax(SyntaxErrors(errors)));
        }

        self.interpret(&parsed.statements)?;
        Ok(())
    }

    /// Binds a host function in the global scope.
    pub fn define_native(&mut self, name: &str, arity: usize, body: NativeFn) {
        self.evaluator.define_native(name, arity, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::RuntimeErrorKind;
    use crate::value::Value;

    fn interpret(input: &str) -> Result<String, LoxError> {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        interp.eval(input)?;
        let output = String::from_utf8(raw_output).expect("cannot convert output to string");
        Ok(output)
    }

    #[test]
    fn print_expr() -> Result<(), LoxError> {
        assert_eq!(interpret("print 3*2;")?, "6\n");
        Ok(())
    }

    #[test]
    fn precedence() -> Result<(), LoxError> {
        assert_eq!(interpret("print 1 + 2 * 3; print (1 + 2) * 3;")?, "7\n9\n");
        Ok(())
    }

    #[test]
    fn syntax_error_prevents_execution() {
        match interpret("print 1; print 2 +; print 3;") {
            Err(LoxError::Syntax(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(
                    errors.to_string(),
                    "[line 1] Error at ';': Expect expression."
                );
            }
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn lexical_and_syntax_errors_are_both_reported() {
        match interpret("var x = @;\nprint;") {
            Err(LoxError::Syntax(errors)) => assert!(errors.len() >= 2, "{}", errors),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn runtime_error_stops_run() {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        match interp.eval("print 1; print 1/0; print 2;") {
            Err(LoxError::Runtime(RuntimeError {
                kind: RuntimeErrorKind::DivisionByZero,
                ..
            })) => (),
            out => panic!("unexpected output: {:?}", out),
        }
        assert_eq!(raw_output, b"1\n");
    }

    #[test]
    fn globals_survive_between_evals() -> Result<(), LoxError> {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        interp.eval("var a = 1;")?;
        assert!(interp.eval("a = a + 1; print nope;").is_err());
        interp.eval("print a;")?;
        assert_eq!(raw_output, b"2\n");
        Ok(())
    }

    #[test]
    fn custom_native() -> Result<(), LoxError> {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        interp.define_native("twice", 1, |args| match args {
            [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
            _ => Err(RuntimeErrorKind::TypeMismatch("twice expects a number.".to_string())),
        });
        interp.eval("print twice(21);")?;
        assert_eq!(raw_output, b"42\n");
        Ok(())
    }

    #[test]
    fn staged_pipeline() -> Result<(), LoxError> {
        let mut raw_output: Vec<u8> = Vec::new();
        let mut interp = Interpreter::new(&mut raw_output);
        let scanned = interp.scan("var greeting = \"hi\"; print greeting;");
        assert!(scanned.errors.is_empty());
        let parsed = interp.parse(&scanned.tokens);
        assert_eq!(parsed.statements.len(), 2);
        interp.interpret(&parsed.statements)?;
        assert_eq!(raw_output, b"hi\n");
        Ok(())
    }
}
