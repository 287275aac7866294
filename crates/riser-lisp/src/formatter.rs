//! Compact AutoLISP serialization.
//!
//! Expressions are written on a single line with one space between items.
//! Numbers are rounded to six decimals and written without trailing zeros.

use crate::Expr;

/// Decimal places kept when writing coordinates.
const PRECISION: usize = 6;

pub fn format_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_compact(expr, &mut out);
    out
}

fn write_compact(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Symbol(s) => out.push_str(s),
        Expr::String(s) => out.push_str(&quote_string(s)),
        Expr::Number(n) => out.push_str(&format_number(*n)),
        Expr::List(items) => {
            out.push('(');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                write_compact(item, out);
            }
            out.push(')');
        }
    }
}

/// Quote a string value, escaping special characters.
pub fn quote_string(value: &str) -> String {
    let escaped = escape_string(value);
    let mut quoted = String::with_capacity(escaped.len() + 2);
    quoted.push('"');
    quoted.push_str(&escaped);
    quoted.push('"');
    quoted
}

pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(ch),
        }
    }
    result
}

/// `300.0` -> `300`, `21.25` -> `21.25`, `-0.0` -> `0`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        // AutoLISP has no literal for these; degrade to the origin.
        log::warn!("Non-finite coordinate {n} written as 0");
        return "0".to_string();
    }
    let s = trim_float(format!("{:.*}", PRECISION, n));
    if s == "-0" { "0".to_string() } else { s }
}

fn trim_float(mut s: String) -> String {
    if !s.contains('.') {
        return s;
    }

    while let Some(stripped) = s.strip_suffix('0') {
        s = stripped.to_string();
    }
    if let Some(stripped) = s.strip_suffix('.') {
        s = stripped.to_string();
    }

    if s.is_empty() { "0".to_string() } else { s }
}
