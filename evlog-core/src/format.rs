use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::inspect::{Inspector, float_text, number_text};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)%(.)").unwrap());

/// printf-style formatting.
///
/// Conversions: `%s` string, `%d` number, `%i` integer, `%f` float, `%j` JSON,
/// `%o`/`%O` inspected value, `%c` (consumes an argument, prints nothing) and
/// `%%` for a literal percent sign. Placeholders left without an argument stay
/// in the output verbatim, unknown conversions are never substituted, and
/// surplus arguments are appended separated by spaces.
///
/// A template given no arguments at all is returned untouched, `%%` included.
pub fn format(template: &str, args: &[Value]) -> String {
    if args.is_empty() {
        return template.to_string();
    }
    let mut remaining = args.iter();
    let mut out = PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let conversion = &caps[1];
            if conversion == "%" {
                return "%".to_string();
            }
            if !matches!(conversion, "s" | "d" | "i" | "f" | "j" | "o" | "O" | "c") {
                return caps[0].to_string();
            }
            match remaining.next() {
                Some(arg) => convert(conversion, arg),
                None => caps[0].to_string(),
            }
        })
        .into_owned();
    for arg in remaining {
        out.push(' ');
        match arg {
            Value::String(s) => out.push_str(s),
            other => out.push_str(&Inspector::default().inspect(other)),
        }
    }
    out
}

fn convert(conversion: &str, arg: &Value) -> String {
    match conversion {
        "s" => match arg {
            Value::String(s) => s.clone(),
            Value::Number(n) => number_text(n),
            Value::Array(_) | Value::Object(_) => {
                Inspector::default().with_depth(Some(0)).inspect(arg)
            }
            other => other.to_string(),
        },
        "d" => float_text(to_number(arg)),
        "i" => float_text(parse_int(arg)),
        "f" => float_text(parse_float(arg)),
        "j" => serde_json::to_string(arg).unwrap_or_else(|_| "undefined".into()),
        "o" => Inspector::default().with_depth(Some(4)).inspect(arg),
        "O" => Inspector::default().inspect(arg),
        _ => String::new(),
    }
}

/// Strict numeric conversion: the whole string must parse.
fn to_number(arg: &Value) -> f64 {
    match arg {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let s = s.trim();
            let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
            if s.is_empty() {
                0.0
            } else if unsigned == "Infinity" {
                infinity(s)
            } else if unsigned
                .bytes()
                .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E'))
            {
                f64::NAN
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Array(items) if items.is_empty() => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Leading integer of the value, ignoring trailing text.
fn parse_int(arg: &Value) -> f64 {
    match arg {
        Value::Number(n) => n.as_f64().map_or(f64::NAN, f64::trunc),
        Value::String(s) => {
            let s = s.trim_start();
            let end = numeric_prefix(s, false);
            s[..end].parse::<f64>().map_or(f64::NAN, f64::trunc)
        }
        _ => f64::NAN,
    }
}

/// Leading decimal of the value, ignoring trailing text.
fn parse_float(arg: &Value) -> f64 {
    match arg {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let s = s.trim_start();
            if s.strip_prefix(['+', '-']).unwrap_or(s).starts_with("Infinity") {
                return infinity(s);
            }
            let end = numeric_prefix(s, true);
            s[..end].parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

/// Signed infinity spelled out as `Infinity`, `+Infinity` or `-Infinity`.
fn infinity(s: &str) -> f64 {
    if s.starts_with('-') {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    }
}

/// Length of the longest leading numeric literal in `s`. Only digits, a sign,
/// a decimal point and an exponent count, so `inf` and `nan` never match.
fn numeric_prefix(s: &str, fractional: bool) -> usize {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };
    end += digits(end);
    if fractional {
        if bytes.get(end) == Some(&b'.') {
            end += 1 + digits(end + 1);
        }
        if matches!(bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_digits = digits(exp);
            if exp_digits > 0 {
                end = exp + exp_digits;
            }
        }
    }
    end
}
