//! Tree-walk interpreter for a small dynamically typed language of the Lox family.
//!
//! See [Crafting Interpreters](https://craftinginterpreters.com/) for the language this one
//! derives from. Departures from Lox include `break`, string repetition with `*`,
//! concatenation of strings with numbers and mandatory braces around `if` branches.
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - Classes are not implemented. `class`, `this` and `super` are reserved words only.
//! - Function values that capture their own declaring scope are never freed.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

use std::sync::Once;

pub mod ast;
pub mod diag;
pub mod eval;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

mod ctx;
mod interner;
mod scope;
mod stdlib;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr subscriber for the interpreter's diagnostics events.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=slox=debug` or `RUST_LOG=slox=trace`.
/// Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
