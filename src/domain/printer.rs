//! Tree Printer
//!
//! Echoes any JSON value back to text for diagnostics. This is independent
//! of the node schema: it follows the JSON structure itself.
//!
//! Output shape: arrays as `[a,b]`, objects as `{"k": v,"k2": w}` in
//! document order, strings in their escaped JSON form.

use serde_json::{Number, Value};
use std::fmt::{self, Write};

/// Display adapter: `format!("{}", JsonEcho(&value))`.
pub struct JsonEcho<'a>(pub &'a Value);

impl fmt::Display for JsonEcho<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print_json(self.0, f)
    }
}

enum Token<'a> {
    Value(&'a Value),
    Key(&'a str),
    Punct(&'static str),
}

/// Write `value` to `out`.
///
/// Runs over an explicit work-list, so nesting depth is bounded by memory
/// rather than the call stack.
pub fn print_json<W: Write + ?Sized>(value: &Value, out: &mut W) -> fmt::Result {
    let mut pending = vec![Token::Value(value)];

    while let Some(token) = pending.pop() {
        match token {
            Token::Punct(text) => out.write_str(text)?,
            Token::Key(key) => {
                write_string(key, out)?;
                out.write_str(": ")?;
            }
            Token::Value(Value::Array(items)) => {
                out.write_char('[')?;
                pending.push(Token::Punct("]"));
                for (i, item) in items.iter().enumerate().rev() {
                    pending.push(Token::Value(item));
                    if i > 0 {
                        pending.push(Token::Punct(","));
                    }
                }
            }
            Token::Value(Value::Object(map)) => {
                out.write_char('{')?;
                pending.push(Token::Punct("}"));
                for (i, (key, item)) in map.iter().enumerate().rev() {
                    pending.push(Token::Value(item));
                    pending.push(Token::Key(key.as_str()));
                    if i > 0 {
                        pending.push(Token::Punct(","));
                    }
                }
            }
            Token::Value(Value::Number(n)) => write_number(n, out)?,
            Token::Value(Value::String(s)) => write_string(s, out)?,
            Token::Value(Value::Bool(b)) => out.write_str(if *b { "true" } else { "false" })?,
            Token::Value(Value::Null) => out.write_str("null")?,
        }
    }

    Ok(())
}

/// Render `value` into a fresh string.
pub fn render_json(value: &Value) -> String {
    JsonEcho(value).to_string()
}

fn write_string<W: Write + ?Sized>(s: &str, out: &mut W) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    out.write_str(&quoted)
}

// Integers print exactly. Floats use the shortest text that parses back to
// the same double, keeping a fractional part so they stay floats.
fn write_number<W: Write + ?Sized>(n: &Number, out: &mut W) -> fmt::Result {
    if let Some(i) = n.as_i64() {
        write!(out, "{}", i)
    } else if let Some(u) = n.as_u64() {
        write!(out, "{}", u)
    } else {
        match n.as_f64() {
            Some(f) => write!(out, "{:?}", f),
            None => out.write_str(&n.to_string()),
        }
    }
}
