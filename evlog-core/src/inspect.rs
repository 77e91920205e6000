//! Human-oriented structural dump of JSON values: single-quoted strings, bare
//! identifier keys, and short containers kept on one line while anything wider
//! than the break length is split one entry per line.

use serde_json::{Number, Value};

const BREAK_LENGTH: usize = 80;
/// Containers with this many container levels below them are never folded
/// onto one line.
const COMPACT_LEVELS: usize = 3;

/// Token classes handed to a [`Painter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    String,
    Number,
    Boolean,
    Null,
    /// Placeholders such as `[Object]` for containers beyond the depth limit.
    Special,
}

/// Wraps a token in terminal styling. Must not change the visible width.
pub type Painter = fn(Style, &str) -> String;

#[derive(Clone, Copy, Debug)]
pub struct Inspector {
    depth: Option<usize>,
    painter: Option<Painter>,
}

impl Default for Inspector {
    fn default() -> Self {
        Self {
            depth: Some(2),
            painter: None,
        }
    }
}

struct Rendered {
    text: String,
    /// Visible width, styling excluded.
    width: usize,
    /// Container levels at and below this value; 0 for scalars.
    height: usize,
}

impl Inspector {
    /// Maximum nesting shown before containers collapse to `[Object]`/`[Array]`.
    /// `None` shows everything.
    pub fn with_depth(self, depth: Option<usize>) -> Self {
        Self { depth, ..self }
    }

    pub fn with_painter(self, painter: Painter) -> Self {
        Self {
            painter: Some(painter),
            ..self
        }
    }

    pub fn inspect(&self, value: &Value) -> String {
        self.render(value, 0, 0).text
    }

    fn token(&self, style: Style, plain: String) -> Rendered {
        let width = plain.chars().count();
        let text = match self.painter {
            Some(paint) => paint(style, &plain),
            None => plain,
        };
        Rendered {
            text,
            width,
            height: 0,
        }
    }

    fn render(&self, value: &Value, level: usize, indent: usize) -> Rendered {
        let beyond_depth = self.depth.is_some_and(|depth| level > depth);
        match value {
            Value::Null => self.token(Style::Null, "null".into()),
            Value::Bool(b) => self.token(Style::Boolean, b.to_string()),
            Value::Number(n) => self.token(Style::Number, number_text(n)),
            Value::String(s) => self.token(Style::String, quote(s)),
            Value::Array(items) if items.is_empty() => unstyled("[]"),
            Value::Object(map) if map.is_empty() => unstyled("{}"),
            Value::Array(_) if beyond_depth => self.token(Style::Special, "[Array]".into()),
            Value::Object(_) if beyond_depth => self.token(Style::Special, "[Object]".into()),
            Value::Array(items) => {
                let entries = items
                    .iter()
                    .map(|item| self.render(item, level + 1, indent + 2))
                    .collect();
                self.reduce(entries, ('[', ']'), indent)
            }
            Value::Object(map) => {
                let entries = map
                    .iter()
                    .map(|(key, item)| {
                        let key = self.key(key);
                        let item = self.render(item, level + 1, indent + 2);
                        Rendered {
                            text: format!("{}: {}", key.text, item.text),
                            width: key.width + 2 + item.width,
                            height: item.height,
                        }
                    })
                    .collect();
                self.reduce(entries, ('{', '}'), indent)
            }
        }
    }

    fn key(&self, key: &str) -> Rendered {
        let mut chars = key.chars();
        let identifier = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        if identifier {
            unstyled(key)
        } else {
            self.token(Style::String, quote(key))
        }
    }

    fn reduce(&self, entries: Vec<Rendered>, (open, close): (char, char), indent: usize) -> Rendered {
        let below = entries.iter().map(|e| e.height).max().unwrap_or(0);
        let height = below + 1;
        if below < COMPACT_LEVELS && !entries.iter().any(|e| e.text.contains('\n')) {
            let count = entries.len();
            let start = count + indent + 1 + 10;
            let total = count + start + entries.iter().map(|e| e.width).sum::<usize>();
            if total <= BREAK_LENGTH {
                let width = 4 + entries.iter().map(|e| e.width).sum::<usize>() + 2 * (count - 1);
                let joined = entries.into_iter().map(|e| e.text).collect::<Vec<_>>();
                return Rendered {
                    text: format!("{open} {} {close}", joined.join(", ")),
                    width,
                    height,
                };
            }
        }
        let pad = " ".repeat(indent);
        let joined = entries.into_iter().map(|e| e.text).collect::<Vec<_>>();
        let text = format!(
            "{open}\n{pad}  {}\n{pad}{close}",
            joined.join(&format!(",\n{pad}  "))
        );
        Rendered {
            width: text.chars().count(),
            text,
            height,
        }
    }
}

fn unstyled(text: &str) -> Rendered {
    Rendered {
        text: text.to_string(),
        width: text.chars().count(),
        height: 0,
    }
}

/// Inspect with the default options (depth 2, no styling).
pub fn inspect(value: &Value) -> String {
    Inspector::default().inspect(value)
}

/// Renders a number without a fractional part when it is integral.
pub fn number_text(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) => float_text(f),
        None => n.to_string(),
    }
}

pub(crate) fn float_text(f: f64) -> String {
    if f.is_nan() {
        "NaN".into()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else if f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Quotes a string with single quotes, switching to double quotes or
/// backticks when that avoids escaping.
fn quote(s: &str) -> String {
    let quote = if !s.contains('\'') {
        '\''
    } else if !s.contains('"') {
        '"'
    } else if !s.contains('`') && !s.contains("${") {
        '`'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c < ' ' || c == '\u{7f}' => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        assert_eq!(inspect(&json!(null)), "null");
        assert_eq!(inspect(&json!(true)), "true");
        assert_eq!(inspect(&json!(42)), "42");
        assert_eq!(inspect(&json!(1.0)), "1");
        assert_eq!(inspect(&json!(1.5)), "1.5");
        assert_eq!(inspect(&json!("abc")), "'abc'");
    }

    #[test]
    fn test_string_quoting() {
        assert_eq!(inspect(&json!("it's")), "\"it's\"");
        assert_eq!(inspect(&json!("it's \"x\"")), "`it's \"x\"`");
        assert_eq!(inspect(&json!("a\nb")), "'a\\nb'");
        assert_eq!(inspect(&json!("a\\b")), "'a\\\\b'");
    }

    #[test]
    fn test_compact_containers() {
        assert_eq!(inspect(&json!({})), "{}");
        assert_eq!(inspect(&json!([])), "[]");
        assert_eq!(
            inspect(&json!({"a": 1, "b": "x", "c": [1, 2]})),
            "{ a: 1, b: 'x', c: [ 1, 2 ] }"
        );
        assert_eq!(inspect(&json!({"my-key": null})), "{ 'my-key': null }");
    }

    #[test]
    fn test_depth_limit() {
        let value = json!({"a": {"b": {"c": {"d": 1}}}});
        assert_eq!(inspect(&value), "{ a: { b: { c: [Object] } } }");
        assert_eq!(
            Inspector::default().with_depth(Some(0)).inspect(&value),
            "{ a: [Object] }"
        );
    }

    #[test]
    fn test_deep_nesting_breaks_lines() {
        let value = json!({"a": {"b": {"c": {"d": 1}}}});
        let out = Inspector::default().with_depth(None).inspect(&value);
        assert_eq!(out, "{\n  a: { b: { c: { d: 1 } } }\n}");
    }

    #[test]
    fn test_long_entries_break_lines() {
        let long = "x".repeat(40);
        let out = inspect(&json!({"first": long, "second": long}));
        assert_eq!(
            out,
            format!("{{\n  first: '{long}',\n  second: '{long}'\n}}")
        );
    }

    #[test]
    fn test_painter_does_not_affect_layout() {
        fn brackets(style: Style, text: &str) -> String {
            match style {
                Style::Number => format!("\x1b[33m{text}\x1b[39m"),
                _ => text.to_string(),
            }
        }
        let out = Inspector::default()
            .with_painter(brackets)
            .inspect(&json!({"n": 7}));
        assert_eq!(out, "{ n: \x1b[33m7\x1b[39m }");
    }

    #[test]
    fn test_float_text() {
        assert_eq!(float_text(f64::NAN), "NaN");
        assert_eq!(float_text(-3.0), "-3");
        assert_eq!(float_text(0.25), "0.25");
    }
}
