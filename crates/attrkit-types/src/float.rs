//! Floating-point coercion
//!
//! Text and numeric inputs are converted to `Float`; anything else is
//! handed to the kind check unchanged.
//!
//! With the default [`TextParsing::Permissive`] mode, text is read as a
//! best-effort numeric prefix: `"3.14abc"` becomes `3.14` and `"abc"`
//! becomes `0.0` rather than an error. That leniency is a known gap, kept
//! for compatibility; use [`TextParsing::Strict`] to reject such input.

use attrkit_core::{CoercionError, Instance, KindTag, Value};

use crate::coercer::TypeCoercer;
use crate::config::{FloatCoercerConfig, TextParsing};

/// Coercer for `Float` values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatCoercer {
    config: FloatCoercerConfig,
}

impl FloatCoercer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FloatCoercerConfig) -> Self {
        Self { config }
    }

    pub fn strict() -> Self {
        Self::with_config(FloatCoercerConfig::strict())
    }

    pub fn config(&self) -> &FloatCoercerConfig {
        &self.config
    }

    fn parse_text(&self, text: &str) -> Result<f64, CoercionError> {
        match self.config.text_parsing {
            TextParsing::Permissive => Ok(parse_float_prefix(text)),
            TextParsing::Strict => {
                let trimmed = text.trim();
                match scan_float(trimmed) {
                    Some((value, consumed)) if consumed == trimmed.len() && value.is_finite() => {
                        Ok(value)
                    }
                    _ => Err(CoercionError::Invalid {
                        type_name: self.type_name().to_string(),
                        reason: format!("{:?} is not a finite decimal number", text),
                    }),
                }
            }
        }
    }
}

impl TypeCoercer for FloatCoercer {
    fn type_name(&self) -> &str {
        "Float"
    }

    fn required_kind(&self) -> KindTag {
        KindTag::Float
    }

    fn normalize(&self, _context: Option<&Instance>, value: Value) -> Result<Value, CoercionError> {
        match value {
            Value::Text(text) => self.parse_text(&text).map(Value::Float),
            Value::Int(i) => Ok(Value::Float(i as f64)),
            other => Ok(other),
        }
    }
}

/// Read the longest numeric prefix of `text`, or `0.0` if there is none
///
/// Accepts leading whitespace, an optional sign, digits with single
/// underscores between them, an optional fraction and an optional exponent.
pub fn parse_float_prefix(text: &str) -> f64 {
    scan_float(text.trim_start()).map_or(0.0, |(value, _)| value)
}

// Longest decimal literal at the start of `text` and the bytes it spans.
fn scan_float(text: &str) -> Option<(f64, usize)> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let mut literal = String::with_capacity(bytes.len());

    if let Some(&sign @ (b'+' | b'-')) = bytes.first() {
        literal.push(sign as char);
        pos += 1;
    }

    let int_digits = scan_digits(bytes, &mut pos, &mut literal);

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) {
        if int_digits == 0 {
            literal.push('0');
        }
        literal.push('.');
        pos += 1;
        frac_digits = scan_digits(bytes, &mut pos, &mut literal);
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if let Some(b'e' | b'E') = bytes.get(pos) {
        let mut exp_pos = pos + 1;
        let mut exponent = String::from("e");
        if let Some(&sign @ (b'+' | b'-')) = bytes.get(exp_pos) {
            exponent.push(sign as char);
            exp_pos += 1;
        }
        if scan_digits(bytes, &mut exp_pos, &mut exponent) > 0 {
            literal.push_str(&exponent);
            pos = exp_pos;
        }
    }

    literal.parse().ok().map(|value| (value, pos))
}

// Underscores are skipped only when they sit between two digits.
fn scan_digits(bytes: &[u8], pos: &mut usize, out: &mut String) -> usize {
    let mut count = 0;
    while let Some(&b) = bytes.get(*pos) {
        if b.is_ascii_digit() {
            out.push(b as char);
            count += 1;
            *pos += 1;
        } else if b == b'_' && count > 0 && bytes.get(*pos + 1).is_some_and(u8::is_ascii_digit) {
            *pos += 1;
        } else {
            break;
        }
    }
    count
}
