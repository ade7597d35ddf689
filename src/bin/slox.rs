//! Interpreter command-line.
//!
//! When called without argument it drops into an interactive read-evaluate-print loop.
//!
//! When called with arguments, it interprets the corresponding files in a single interpreter
//! session (so code and data sharing is possible). The first failing file ends the session
//! with exit status 65 for syntax errors or 70 for runtime errors.
//!
//! Set `RUST_LOG` (e.g. `RUST_LOG=slox=debug`) to get diagnostics events on stderr.

use std::env;
use std::fs;
use std::io;
use std::io::prelude::*;
use std::process;

use anyhow::{self, Context};
use tracing::info;

use slox::interpreter::{Interpreter, LoxError};

const EXIT_SYNTAX: i32 = 65;
const EXIT_RUNTIME: i32 = 70;

fn main() -> Result<(), anyhow::Error> {
    slox::init_tracing();

    let args = env::args().skip(1).collect::<Vec<_>>();
    if !args.is_empty() {
        if let Some(code) = run_all_files(&args)? {
            process::exit(code);
        }
    } else {
        run_prompt()?;
    }
    Ok(())
}

/// Returns the exit status to use when a file failed to interpret.
fn run_all_files(paths: &[String]) -> Result<Option<i32>, anyhow::Error> {
    let mut interp_stdout = io::stdout();
    let mut interp = Interpreter::new(&mut interp_stdout);

    for p in paths {
        let source = fs::read_to_string(p).with_context(|| format!("failed to open {}", p))?;
        info!(path = %p, bytes = source.len(), "running file");
        if let Err(e) = interp.eval(&source) {
            eprintln!("{}", e);
            return Ok(Some(exit_status(&e)));
        }
    }

    Ok(None)
}

fn exit_status(e: &LoxError) -> i32 {
    match e {
        LoxError::Syntax(_) => EXIT_SYNTAX,
        LoxError::Runtime(_) => EXIT_RUNTIME,
    }
}

fn run_prompt() -> Result<(), io::Error> {
    let stdin = io::stdin();
    let mut repl_stdout = io::stdout();
    let mut interp_stdout = io::stdout();

    let mut interp = Interpreter::new(&mut interp_stdout);

    let mut input = String::new();
    loop {
        repl_stdout.write_all(b"> ")?;
        repl_stdout.flush()?;

        input.clear();
        let nbytes = stdin.read_line(&mut input)?;
        if nbytes == 0 {
            break;
        }

        if let Err(e) = interp.eval(&input) {
            eprintln!("{}", e);
        }
    }

    Ok(())
}
