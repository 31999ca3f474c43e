//! Coercion helpers between Value shapes.
//!
//! Page configs are authored with CSS-ish strings ("50%", "10px", "#10B981",
//! "blur(10px)"). These helpers turn them into the kind a property expects.

use crate::value::{Value, ValueKind};

/// Parse a leading number from a CSS-ish token.
/// Rules:
/// - "12", "12px", "12%", "12deg" -> 12.0
/// - "blur(10px)" -> 10.0
/// - anything else -> None
pub fn parse_number(s: &str) -> Option<f32> {
    let s = s.trim();
    let inner = match (s.find('('), s.rfind(')')) {
        (Some(open), Some(close)) if close > open => &s[open + 1..close],
        _ => s,
    };
    let inner = inner.trim();
    let end = inner
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(inner.len());
    inner[..end].parse::<f32>().ok()
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into RGBA components in [0, 1].
pub fn parse_hex_color(s: &str) -> Option<[f32; 4]> {
    let hex = s.trim().strip_prefix('#')?;
    let channel = |h: &str| u8::from_str_radix(h, 16).ok().map(|v| v as f32 / 255.0);
    match hex.len() {
        3 => {
            let mut out = [0.0, 0.0, 0.0, 1.0];
            for (i, c) in hex.chars().enumerate() {
                let doubled = format!("{c}{c}");
                out[i] = channel(&doubled)?;
            }
            Some(out)
        }
        6 | 8 => {
            let mut out = [0.0, 0.0, 0.0, 1.0];
            for i in 0..hex.len() / 2 {
                out[i] = channel(hex.get(i * 2..i * 2 + 2)?)?;
            }
            Some(out)
        }
        _ => None,
    }
}

/// Attempt to coerce `value` into `kind`.
/// - same kind -> unchanged
/// - Text -> Float via [`parse_number`]
/// - Text -> ColorRgba via [`parse_hex_color`]
/// - Float -> Text via Display
pub fn coerce(value: Value, kind: ValueKind) -> Option<Value> {
    if value.kind() == kind {
        return Some(value);
    }
    match (value, kind) {
        (Value::Text(s), ValueKind::Float) => parse_number(&s).map(Value::Float),
        (Value::Text(s), ValueKind::ColorRgba) => parse_hex_color(&s).map(Value::ColorRgba),
        (Value::Float(v), ValueKind::Text) => Some(Value::Text(format!("{v}"))),
        _ => None,
    }
}
