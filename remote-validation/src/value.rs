//! String coercion for validated values and response bodies
//!
//! Form hosts hand over loosely typed values and remote endpoints answer
//! with whatever their serializer produced, so comparisons are done on the
//! string form of a value the way browser scripts coerce with `x + ""`:
//! `42` and `"42"` compare equal, `"42.0"` and `"42"` do not.

use serde_json::{Number, Value};

use crate::error::{RuleError, RuleResult};

/// Coerce any JSON value to its string form.
///
/// `null` becomes `"null"`, arrays are joined with `,` (with `null`
/// elements rendered empty) and objects become `[object Object]`.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Like [`coerce_to_string`], but refuses `null`, which has no string
/// conversion of its own.
///
/// # Errors
///
/// Returns [`RuleError::Stringify`] for `null`.
pub fn value_to_string(value: &Value) -> RuleResult<String> {
    match value {
        Value::Null => Err(RuleError::Stringify("null".to_string())),
        other => Ok(coerce_to_string(other)),
    }
}

/// Largest integer a script number holds exactly (2^53)
const MAX_SAFE_INTEGER: u64 = 1 << 53;

// Integers beyond 2^53 lose precision as script numbers, so they are
// rounded through f64 to print the same digits.
#[allow(clippy::cast_precision_loss)]
fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        if i.unsigned_abs() > MAX_SAFE_INTEGER {
            return float_to_string(i as f64);
        }
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        if u > MAX_SAFE_INTEGER {
            return float_to_string(u as f64);
        }
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => float_to_string(f),
        None => n.to_string(),
    }
}

fn float_to_string(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }
    // Rust prints `1e21`, scripts print `1e+21`
    let exp = format!("{f:e}");
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => exp,
    }
}
