//! Native functions preloaded in every global scope.

use std::time::Instant;

use once_cell::sync::Lazy;

use crate::eval::RuntimeErrorKind;
use crate::value::{NativeFn, Value};

// Shared by all sessions so `clock()` readings are comparable across them.
static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Name, arity and body of each standard native.
pub fn standard_library() -> Vec<(&'static str, usize, NativeFn)> {
    vec![
        ("clock", 0, native_clock as NativeFn),
        ("sqrt", 1, native_sqrt as NativeFn),
    ]
}

/// Seconds elapsed on a monotonic clock.
fn native_clock(_args: &[Value]) -> Result<Value, RuntimeErrorKind> {
    Ok(Value::from(EPOCH.elapsed().as_secs_f64()))
}

fn native_sqrt(args: &[Value]) -> Result<Value, RuntimeErrorKind> {
    match args {
        [Value::Number(n)] => Ok(Value::from(n.sqrt())),
        [other] => Err(RuntimeErrorKind::TypeMismatch(format!(
            "sqrt expects a number, got {}.",
            other.type_name()
        ))),
        _ => Err(RuntimeErrorKind::ArityMismatch {
            expected: 1,
            received: args.len(),
        }),
    }
}
