//! Recursive-descent parser.
//!
//! Grammar, from lowest to highest precedence:
//!
//! ```text
//! program     → declaration* EOF
//! declaration → varDecl | funDecl | statement
//! statement   → print | if | while | block | for | break | return | exprStmt
//! expression  → assignment
//! assignment  → IDENTIFIER "=" assignment | logic_or
//! logic_or    → logic_and ( "or" logic_and )*
//! logic_and   → equality ( "and" equality )*
//! equality    → comparison ( ( "!=" | "==" ) comparison )*
//! comparison  → term ( ( ">" | ">=" | "<" | "<=" ) term )*
//! term        → factor ( ( "-" | "+" ) factor )*
//! factor      → unary ( ( "/" | "*" ) unary )*
//! unary       → ( "!" | "-" ) unary | call
//! call        → primary ( "(" arguments? ")" )*
//! ```

use std::rc::Rc;

use tracing::debug;

use crate::ast::{Expr, FunDecl, LiteralValue, Stmt};
use crate::diag::SyntaxError;
use crate::token::{Token, TokenKind};

/// Upper bound on call arguments and function parameters.
pub const MAX_ARITY: usize = 255;

/// Result of parsing a whole program.
///
/// `statements` holds every declaration that parsed cleanly, so it is only a faithful
/// rendition of the source when `errors` is empty.
#[derive(Debug, PartialEq)]
pub struct Parsed {
    pub statements: Vec<Stmt>,
    pub errors: Vec<SyntaxError>,
}

/// Parses an `Eof`-terminated token sequence.
pub fn parse(tokens: &[Token]) -> Parsed {
    if tokens.is_empty() {
        return Parsed {
            statements: Vec::new(),
            errors: Vec::new(),
        };
    }
    let mut parser = Parser::new(tokens);
    let statements = parser.program();
    Parsed {
        statements,
        errors: parser.errors,
    }
}

/// Signals that the current production failed. The diagnostic travels with it until the
/// declaration boundary records it and resynchronizes.
#[derive(Debug)]
struct ParseError(SyntaxError);

type ParseResult<T> = Result<T, ParseError>;

struct Parser<'t> {
    tokens: &'t [Token],
    current: usize,
    // Number of loop bodies enclosing the current position; `break` needs at least one.
    loop_depth: usize,
    errors: Vec<SyntaxError>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Parser<'t> {
        Parser {
            tokens,
            current: 0,
            loop_depth: 0,
            errors: Vec::new(),
        }
    }

    fn program(&mut self) -> Vec<Stmt> {
        let mut prg = Vec::new();
        while !self.at_end() {
            if let Some(stmt) = self.declaration() {
                prg.push(stmt);
            }
        }
        prg
    }

    /// Parses one declaration, recovering from any syntax error inside it.
    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.advance_if(&TokenKind::Var) {
            self.var_decl()
        } else if self.advance_if(&TokenKind::Fun) {
            self.fun_decl()
        } else {
            self.statement()
        };
        match result {
            Ok(stmt) => Some(stmt),
            Err(ParseError(e)) => {
                debug!(line = e.line, "recovering from syntax error: {}", e.message);
                self.errors.push(e);
                self.synchronize();
                None
            }
        }
    }

    /// Current token is past `var`.
    fn var_decl(&mut self) -> ParseResult<Stmt> {
        let name = self.consume_identifier("Expect variable name.")?;
        let init = if self.advance_if(&TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(&TokenKind::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::VarDecl(name, init))
    }

    /// Current token is past `fun`.
    fn fun_decl(&mut self) -> ParseResult<Stmt> {
        let name = self.consume_identifier("Expect function name.")?;
        self.consume(&TokenKind::LeftParen, "Expect '(' after function name.")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                if params.len() >= MAX_ARITY {
                    let token = self.peek().clone();
                    self.report(&token, "Can't have more than 255 parameters.");
                }
                params.push(self.consume_identifier("Expect parameter name.")?);
                if !self.advance_if(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(&TokenKind::RightParen, "Expect ')' after parameters.")?;
        self.consume(&TokenKind::LeftBrace, "Expect '{' before function body.")?;

        // `break` inside a function body never targets a loop around the declaration.
        let enclosing_loops = std::mem::replace(&mut self.loop_depth, 0);
        let body = self.block();
        self.loop_depth = enclosing_loops;

        Ok(Stmt::FunDecl(Rc::new(FunDecl {
            name,
            params,
            body: body?,
        })))
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind.clone() {
            TokenKind::Print => {
                let keyword = self.advance().clone();
                let expr = self.expression()?;
                self.consume(&TokenKind::Semicolon, "Expect ';' after value.")?;
                Ok(Stmt::Print(keyword, expr))
            }
            TokenKind::If => {
                self.advance();
                self.if_stmt()
            }
            TokenKind::While => {
                self.advance();
                self.while_stmt()
            }
            TokenKind::LeftBrace => {
                self.advance();
                Ok(Stmt::Block(self.block()?))
            }
            TokenKind::For => {
                self.advance();
                self.for_stmt()
            }
            TokenKind::Break => {
                let keyword = self.advance().clone();
                if self.loop_depth == 0 {
                    self.report(&keyword, "Can't use 'break' outside of a loop.");
                }
                self.consume(&TokenKind::Semicolon, "Expect ';' after 'break'.")?;
                Ok(Stmt::Break(keyword))
            }
            TokenKind::Return => {
                let keyword = self.advance().clone();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.expression()?)
                };
                self.consume(&TokenKind::Semicolon, "Expect ';' after return value.")?;
                Ok(Stmt::Return(keyword, value))
            }
            _ => {
                let expr = self.expression()?;
                self.consume(&TokenKind::Semicolon, "Expect ';' after expression.")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// Both branches must be blocks, which rules out any dangling `else`.
    fn if_stmt(&mut self) -> ParseResult<Stmt> {
        self.consume(&TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let cond = self.expression()?;
        self.consume(&TokenKind::RightParen, "Expect ')' after if condition.")?;
        self.consume(&TokenKind::LeftBrace, "Expect '{' before if block.")?;
        let then_branch = self.block()?;
        let else_branch = if self.advance_if(&TokenKind::Else) {
            self.consume(&TokenKind::LeftBrace, "Expect '{' before else block.")?;
            Some(self.block()?)
        } else {
            None
        };
        Ok(Stmt::If(cond, then_branch, else_branch))
    }

    fn while_stmt(&mut self) -> ParseResult<Stmt> {
        self.consume(&TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let cond = self.expression()?;
        self.consume(&TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = self.loop_body()?;
        Ok(Stmt::While(cond, Box::new(body)))
    }

    /// Desugars `for (init; cond; incr) body` into
    /// `{ init; while (cond) { body; incr; } }`.
    fn for_stmt(&mut self) -> ParseResult<Stmt> {
        self.consume(&TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let init = if self.advance_if(&TokenKind::Semicolon) {
            None
        } else if self.advance_if(&TokenKind::Var) {
            Some(self.var_decl()?)
        } else {
            let expr = self.expression()?;
            self.consume(&TokenKind::Semicolon, "Expect ';' after loop initializer.")?;
            Some(Stmt::Expr(expr))
        };

        let cond = if self.check(&TokenKind::Semicolon) {
            Expr::Literal(LiteralValue::Bool(true))
        } else {
            self.expression()?
        };
        self.consume(&TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let incr = if self.check(&TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = vec![self.loop_body()?];
        if let Some(incr) = incr {
            body.push(Stmt::Expr(incr));
        }

        let mut desugared = Vec::new();
        if let Some(init) = init {
            desugared.push(init);
        }
        desugared.push(Stmt::While(cond, Box::new(Stmt::Block(body))));
        Ok(Stmt::Block(desugared))
    }

    fn loop_body(&mut self) -> ParseResult<Stmt> {
        self.loop_depth += 1;
        let body = self.statement();
        self.loop_depth -= 1;
        body
    }

    /// Parses declarations up to the closing brace. The opening brace is already consumed.
    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RightBrace) && !self.at_end() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt);
            }
        }
        self.consume(&TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(stmts)
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let lhs = self.logic_or()?;
        if self.check(&TokenKind::Equal) {
            let equals = self.advance().clone();
            let rhs = self.assignment()?;
            if let Expr::Var(name) = lhs {
                return Ok(Expr::Assign(name, Box::new(rhs)));
            }
            // Reported without unwinding: the rest of the statement still parses.
            self.report(&equals, "Invalid assignment target.");
        }
        Ok(lhs)
    }

    fn logic_or(&mut self) -> ParseResult<Expr> {
        self.left_associative(Self::logic_and, &[TokenKind::Or], Expr::Logical)
    }

    fn logic_and(&mut self) -> ParseResult<Expr> {
        self.left_associative(Self::equality, &[TokenKind::And], Expr::Logical)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.left_associative(
            Self::comparison,
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Expr::Binary,
        )
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.left_associative(
            Self::term,
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Expr::Binary,
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.left_associative(
            Self::factor,
            &[TokenKind::Minus, TokenKind::Plus],
            Expr::Binary,
        )
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.left_associative(
            Self::unary,
            &[TokenKind::Slash, TokenKind::Star],
            Expr::Binary,
        )
    }

    /// Folds `operand (op operand)*` to the left while the current token is one of `ops`.
    fn left_associative(
        &mut self,
        operand: fn(&mut Self) -> ParseResult<Expr>,
        ops: &[TokenKind],
        node: fn(Box<Expr>, Token, Box<Expr>) -> Expr,
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;
        while ops.contains(&self.peek().kind) {
            let op = self.advance().clone();
            let rhs = operand(self)?;
            expr = node(Box::new(expr), op, Box::new(rhs));
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        match self.peek().kind.clone() {
            TokenKind::Bang | TokenKind::Minus => {
                let op = self.advance().clone();
                Ok(Expr::Unary(op, Box::new(self.unary()?)))
            }
            _ => self.call(),
        }
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        while self.advance_if(&TokenKind::LeftParen) {
            expr = self.finish_call(expr)?;
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RightParen) {
            loop {
                if args.len() >= MAX_ARITY {
                    let token = self.peek().clone();
                    self.report(&token, "Can't have more than 255 arguments.");
                }
                args.push(self.expression()?);
                if !self.advance_if(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let paren = self.consume(&TokenKind::RightParen, "Expect ')' after arguments.")?;
        Ok(Expr::Call(Box::new(callee), paren, args))
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        let expr = match token.kind {
            TokenKind::False => Expr::Literal(LiteralValue::Bool(false)),
            TokenKind::True => Expr::Literal(LiteralValue::Bool(true)),
            TokenKind::Nil => Expr::Literal(LiteralValue::Nil),
            TokenKind::Number(n) => Expr::Literal(LiteralValue::Number(n)),
            TokenKind::String(ref s) => Expr::Literal(LiteralValue::Str(s.clone())),
            TokenKind::Identifier(_) => Expr::Var(token.clone()),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.consume(&TokenKind::RightParen, "Expect ')' after expression.")?;
                return Ok(Expr::Group(Box::new(inner)));
            }
            _ => return Err(ParseError(error_at(&token, "Expect expression."))),
        };
        self.advance();
        Ok(expr)
    }

    /// Discards tokens until a statement boundary.
    fn synchronize(&mut self) {
        self.advance();
        while !self.at_end() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.starts_statement()
            {
                return;
            }
            self.advance();
        }
    }

    /// Records an error that does not need resynchronization.
    fn report(&mut self, token: &Token, message: &str) {
        self.errors.push(error_at(token, message));
    }

    fn consume(&mut self, expected: &TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(expected) {
            Ok(self.advance().clone())
        } else {
            Err(ParseError(error_at(self.peek(), message)))
        }
    }

    fn consume_identifier(&mut self, message: &str) -> ParseResult<Token> {
        if let TokenKind::Identifier(_) = self.peek().kind {
            Ok(self.advance().clone())
        } else {
            Err(ParseError(error_at(self.peek(), message)))
        }
    }

    fn check(&self, expected: &TokenKind) -> bool {
        !self.at_end() && self.peek().kind == *expected
    }

    fn advance_if(&mut self, expected: &TokenKind) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.peek().is_eof()
    }

    // Clamped so a sequence missing its `Eof` still behaves as if it ended with one.
    fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }
}

fn error_at(token: &Token, message: &str) -> SyntaxError {
    let location = if token.is_eof() {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    };
    SyntaxError {
        line: token.line,
        location,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::Context;
    use crate::scanner::Scanner;

    fn parse_src(input: &str) -> Parsed {
        let scanned = Scanner::new(input, Context::new()).scan_tokens();
        assert!(scanned.errors.is_empty(), "{:?}", scanned.errors);
        parse(&scanned.tokens)
    }

    fn parse_prg(input: &str) -> Vec<Stmt> {
        let parsed = parse_src(input);
        assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
        parsed.statements
    }

    fn parse_expr(input: &str) -> Expr {
        match parse_prg(&format!("{};", input)).pop() {
            Some(Stmt::Expr(e)) => e,
            out => panic!("unexpected output: {:?}", out),
        }
    }

    fn error_messages(input: &str) -> Vec<String> {
        parse_src(input)
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect()
    }

    fn num(n: f64) -> Expr {
        Expr::Literal(LiteralValue::Number(n))
    }

    /// Renders an expression as nested prefix operators, e.g. `(+ 1 (* 2 3))`.
    fn shape(expr: &Expr) -> String {
        match expr {
            Expr::Literal(LiteralValue::Number(n)) => n.to_string(),
            Expr::Literal(l) => format!("{:?}", l),
            Expr::Var(name) => name.lexeme.clone(),
            Expr::Assign(name, value) => format!("(= {} {})", name.lexeme, shape(value)),
            Expr::Unary(op, e) => format!("({} {})", op.lexeme, shape(e)),
            Expr::Binary(l, op, r) | Expr::Logical(l, op, r) => {
                format!("({} {} {})", op.lexeme, shape(l), shape(r))
            }
            Expr::Group(e) => format!("(group {})", shape(e)),
            Expr::Call(callee, _, args) => {
                let args: Vec<String> = args.iter().map(shape).collect();
                format!("(call {} [{}])", shape(callee), args.join(" "))
            }
        }
    }

    #[test]
    fn number() {
        assert_eq!(parse_expr("42"), num(42.0));
    }

    #[test]
    fn literals() {
        assert_eq!(parse_expr("true"), Expr::Literal(LiteralValue::Bool(true)));
        assert_eq!(parse_expr("nil"), Expr::Literal(LiteralValue::Nil));
        assert_eq!(
            parse_expr("\"hi\""),
            Expr::Literal(LiteralValue::Str(Rc::from("hi")))
        );
    }

    #[test]
    fn factors_have_precedence_over_terms() {
        assert_eq!(shape(&parse_expr("1 + 2 * 3")), "(+ 1 (* 2 3))");
    }

    #[test]
    fn grouping_overrides_precedence() {
        assert_eq!(shape(&parse_expr("(1 + 2) * 3")), "(* (group (+ 1 2)) 3)");
    }

    #[test]
    fn binary_operators_are_left_associative() {
        assert_eq!(shape(&parse_expr("1 - 2 - 3")), "(- (- 1 2) 3)");
        assert_eq!(shape(&parse_expr("1 == 2 == 3")), "(== (== 1 2) 3)");
    }

    #[test]
    fn full_precedence_cascade() {
        assert_eq!(
            shape(&parse_expr("a = b or c and d == e < f + g * -h")),
            "(= a (or b (and c (== d (< e (+ f (* g (- h))))))))"
        );
    }

    #[test]
    fn unary_is_right_recursive() {
        assert_eq!(shape(&parse_expr("!!x")), "(! (! x))");
        assert_eq!(shape(&parse_expr("--1")), "(- (- 1))");
    }

    #[test]
    fn assignment_is_right_associative() {
        assert_eq!(shape(&parse_expr("a = b = 1")), "(= a (= b 1))");
    }

    #[test]
    fn chained_calls() {
        assert_eq!(
            shape(&parse_expr("f(1)(2, 3)()")),
            "(call (call (call f [1]) [2 3]) [])"
        );
    }

    #[test]
    fn call_records_closing_paren() {
        match parse_expr("f(\n1\n)") {
            Expr::Call(_, paren, _) => {
                assert_eq!(paren.kind, TokenKind::RightParen);
                assert_eq!(paren.line, 3);
            }
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn var_decl_with_and_without_initializer() {
        match parse_prg("var a; var b = 1;").as_slice() {
            [Stmt::VarDecl(a, None), Stmt::VarDecl(b, Some(init))] => {
                assert_eq!(a.lexeme, "a");
                assert_eq!(b.lexeme, "b");
                assert_eq!(*init, num(1.0));
            }
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn if_else_requires_blocks() {
        match parse_prg("if (true) { 1; } else { 2; 3; }").as_slice() {
            [Stmt::If(_, then_branch, Some(else_branch))] => {
                assert_eq!(then_branch.len(), 1);
                assert_eq!(else_branch.len(), 2);
            }
            out => panic!("unexpected output: {:?}", out),
        }
        assert_eq!(
            error_messages("if (true) print 1;"),
            vec!["Expect '{' before if block."]
        );
        assert_eq!(
            error_messages("if (true) {} else print 1;"),
            vec!["Expect '{' before else block."]
        );
    }

    #[test]
    fn for_loop_is_desugared_to_while() {
        let prg = parse_prg("for (var i = 0; i < 3; i = i + 1) print i;");
        match prg.as_slice() {
            [Stmt::Block(outer)] => match outer.as_slice() {
                [Stmt::VarDecl(name, Some(_)), Stmt::While(cond, body)] => {
                    assert_eq!(name.lexeme, "i");
                    assert_eq!(shape(cond), "(< i 3)");
                    match body.as_ref() {
                        Stmt::Block(inner) => match inner.as_slice() {
                            [Stmt::Print(..), Stmt::Expr(incr)] => {
                                assert_eq!(shape(incr), "(= i (+ i 1))")
                            }
                            out => panic!("unexpected loop body: {:?}", out),
                        },
                        out => panic!("unexpected loop body: {:?}", out),
                    }
                }
                out => panic!("unexpected desugaring: {:?}", out),
            },
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn empty_for_clauses() {
        match parse_prg("for (;;) { break; }").as_slice() {
            [Stmt::Block(outer)] => match outer.as_slice() {
                [Stmt::While(cond, body)] => {
                    assert_eq!(*cond, Expr::Literal(LiteralValue::Bool(true)));
                    match body.as_ref() {
                        Stmt::Block(inner) => assert_eq!(inner.len(), 1),
                        out => panic!("unexpected loop body: {:?}", out),
                    }
                }
                out => panic!("unexpected desugaring: {:?}", out),
            },
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn break_inside_loop() {
        match parse_prg("while (true) { break; }").as_slice() {
            [Stmt::While(_, body)] => match body.as_ref() {
                Stmt::Block(stmts) => assert!(matches!(stmts.as_slice(), [Stmt::Break(_)])),
                out => panic!("unexpected loop body: {:?}", out),
            },
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn break_outside_loop_is_rejected() {
        assert_eq!(
            error_messages("break;"),
            vec!["Can't use 'break' outside of a loop."]
        );
        assert_eq!(
            error_messages("if (true) { break; }"),
            vec!["Can't use 'break' outside of a loop."]
        );
    }

    #[test]
    fn function_body_does_not_see_enclosing_loop() {
        assert_eq!(
            error_messages("while (true) { fun f() { break; } }"),
            vec!["Can't use 'break' outside of a loop."]
        );
    }

    #[test]
    fn return_with_and_without_value() {
        match parse_prg("return; return 1;").as_slice() {
            [Stmt::Return(_, None), Stmt::Return(_, Some(value))] => {
                assert_eq!(*value, num(1.0))
            }
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn function_declaration() {
        match parse_prg("fun add(a, b) { print a + b; }").as_slice() {
            [Stmt::FunDecl(decl)] => {
                assert_eq!(decl.name.lexeme, "add");
                let params: Vec<&str> = decl.params.iter().map(|p| p.lexeme.as_str()).collect();
                assert_eq!(params, vec!["a", "b"]);
                assert_eq!(decl.body.len(), 1);
            }
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn invalid_assignment_target_is_reported_without_unwinding() {
        let parsed = parse_src("1 + a = 2; print 3;");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].message, "Invalid assignment target.");
        assert_eq!(parsed.errors[0].location, " at '='");
        assert_eq!(parsed.statements.len(), 2);
    }

    #[test]
    fn too_many_arguments_is_reported() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let parsed = parse_src(&format!("f({});", args.join(", ")));
        assert_eq!(
            parsed
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>(),
            vec!["Can't have more than 255 arguments."]
        );
        assert_eq!(parsed.statements.len(), 1);
    }

    #[test]
    fn missing_right_paren() {
        let parsed = parse_src("(1");
        assert_eq!(
            parsed.errors,
            vec![SyntaxError {
                line: 1,
                location: " at end".to_string(),
                message: "Expect ')' after expression.".to_string(),
            }]
        );
    }

    #[test]
    fn recovers_at_next_statement() {
        let parsed = parse_src("var = 1; print 2; var x 3; print 4;");
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.errors[0].message, "Expect variable name.");
        assert_eq!(parsed.errors[1].message, "Expect ';' after variable declaration.");
        assert!(matches!(
            parsed.statements.as_slice(),
            [Stmt::Print(..), Stmt::Print(..)]
        ));
    }

    #[test]
    fn recovers_inside_block() {
        let parsed = parse_src("{ print ; print 1; } print 2;");
        assert_eq!(parsed.errors.len(), 1);
        match parsed.statements.as_slice() {
            [Stmt::Block(stmts), Stmt::Print(..)] => assert_eq!(stmts.len(), 1),
            out => panic!("unexpected output: {:?}", out),
        }
    }

    #[test]
    fn reserved_class_keyword_is_rejected() {
        assert_eq!(error_messages("class A {}"), vec!["Expect expression."]);
    }

    #[test]
    fn parsing_is_pure() {
        let scanned = Scanner::new(
            "fun f(x) { return x * 2; } for (var i = 0; i < 2; i = i + 1) { print f(i); }",
            Context::new(),
        )
        .scan_tokens();
        assert_eq!(parse(&scanned.tokens), parse(&scanned.tokens));
    }

    #[test]
    fn empty_program() {
        assert!(parse_prg("").is_empty());
    }
}
