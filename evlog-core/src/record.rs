use std::error::Error;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};

use crate::{format::format, level::Level};

pub const LEVEL_KEY: &str = "level";
pub const TIME_KEY: &str = "time";
pub const MESSAGE_KEY: &str = "message";
pub const STACK_KEY: &str = "stack";

/// What a caller hands to a logging call.
#[derive(Debug, Clone, PartialEq)]
pub enum LogInput {
    /// Structured fields, used as the base of the record.
    Payload(Map<String, Value>),
    /// A printf-style template and its substitution values, rendered into `message`.
    Format { template: String, args: Vec<Value> },
    /// An error, rendered into `message` and `stack`.
    Error { message: String, stack: String },
}

impl LogInput {
    pub fn format(template: impl Into<String>, args: Vec<Value>) -> Self {
        LogInput::Format {
            template: template.into(),
            args,
        }
    }

    /// Captures an error's message and a stack made of its source chain,
    /// followed by a backtrace when `RUST_BACKTRACE` enables one.
    pub fn error<E: Error + ?Sized>(err: &E) -> Self {
        let message = err.to_string();
        let kind = std::any::type_name::<E>()
            .split('<')
            .next()
            .unwrap_or_default()
            .rsplit("::")
            .next()
            .unwrap_or("Error");
        let mut stack = format!("{kind}: {message}");
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str(&format!("\n    caused by: {cause}"));
            source = cause.source();
        }
        let backtrace = std::backtrace::Backtrace::capture();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            stack.push_str(&format!("\n{backtrace}"));
        }
        LogInput::Error { message, stack }
    }
}

impl From<&str> for LogInput {
    fn from(message: &str) -> Self {
        LogInput::format(message, Vec::new())
    }
}

impl From<String> for LogInput {
    fn from(message: String) -> Self {
        LogInput::format(message, Vec::new())
    }
}

impl From<Map<String, Value>> for LogInput {
    fn from(fields: Map<String, Value>) -> Self {
        LogInput::Payload(fields)
    }
}

/// Objects become payloads and strings become messages. Any other value
/// contributes no fields.
impl From<Value> for LogInput {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => LogInput::Payload(fields),
            Value::String(message) => LogInput::from(message),
            _ => LogInput::Payload(Map::new()),
        }
    }
}

/// One structured log event. `level` and `time` are always set; everything
/// else lives in `fields`, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    level: Level,
    time: DateTime<Utc>,
    fields: Map<String, Value>,
}

impl LogRecord {
    /// Builds a record from a call's input. Payload `level`/`time` keys are
    /// dropped in favor of the injected values and a payload `message` moves
    /// to the front.
    pub fn build(level: Level, input: LogInput, time: DateTime<Utc>) -> Self {
        let mut fields = match input {
            LogInput::Payload(mut fields) => match fields.shift_remove(MESSAGE_KEY) {
                Some(message) => {
                    let mut ordered = Map::with_capacity(fields.len() + 1);
                    ordered.insert(MESSAGE_KEY.into(), message);
                    ordered.extend(fields);
                    ordered
                }
                None => fields,
            },
            LogInput::Format { template, args } => {
                let mut fields = Map::new();
                fields.insert(MESSAGE_KEY.into(), Value::String(format(&template, &args)));
                fields
            }
            LogInput::Error { message, stack } => {
                let mut fields = Map::new();
                fields.insert(MESSAGE_KEY.into(), Value::String(message));
                fields.insert(STACK_KEY.into(), Value::String(stack));
                fields
            }
        };
        fields.shift_remove(LEVEL_KEY);
        fields.shift_remove(TIME_KEY);
        Self {
            level,
            time,
            fields,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// The `message` field when it is a string.
    pub fn message(&self) -> Option<&str> {
        self.fields.get(MESSAGE_KEY).and_then(Value::as_str)
    }

    pub fn stack(&self) -> Option<&str> {
        self.fields.get(STACK_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Every field except `level` and `time`, `message` included.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Time as written to JSON: RFC 3339, UTC, millisecond precision.
    pub fn time_string(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// The record as a JSON object: `level`, the fields, then `time`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(self.fields.len() + 2);
        map.insert(LEVEL_KEY.into(), Value::from(self.level.rank()));
        map.extend(self.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        map.insert(TIME_KEY.into(), Value::String(self.time_string()));
        Value::Object(map)
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry(LEVEL_KEY, &self.level)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry(TIME_KEY, &self.time_string())?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> LogInput {
        LogInput::from(value)
    }

    #[test]
    fn test_format_input_sets_message_only() {
        let record = LogRecord::build(
            Level::Info,
            LogInput::format("test %s", vec![json!("message")]),
            Utc::now(),
        );
        assert_eq!(record.level(), Level::Info);
        assert_eq!(record.message(), Some("test message"));
        assert_eq!(record.fields().len(), 1);
    }

    #[test]
    fn test_error_input() {
        let err = std::io::Error::other("disk on fire");
        let record = LogRecord::build(Level::Error, LogInput::error(&err), Utc::now());
        assert_eq!(record.message(), Some("disk on fire"));
        let stack = record.stack().unwrap();
        assert!(stack.starts_with("Error: disk on fire"));
        let keys: Vec<&String> = record.fields().keys().collect();
        assert_eq!(keys, vec!["message", "stack"]);
    }

    #[test]
    fn test_error_stack_lists_sources() {
        #[derive(Debug)]
        struct Outer(std::io::Error);
        impl std::fmt::Display for Outer {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "request failed")
            }
        }
        impl Error for Outer {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                Some(&self.0)
            }
        }
        let input = LogInput::error(&Outer(std::io::Error::other("timeout")));
        let LogInput::Error { message, stack } = input else {
            panic!("expected an error input");
        };
        assert_eq!(message, "request failed");
        assert!(stack.starts_with("Outer: request failed\n    caused by: timeout"));
    }

    #[test]
    fn test_reserved_keys_win() {
        let now = Utc::now();
        let record = LogRecord::build(
            Level::Warn,
            payload(json!({"level": "bogus", "user": "ann", "time": 0, "id": 7})),
            now,
        );
        assert_eq!(record.level(), Level::Warn);
        assert_eq!(record.time(), now);
        assert_eq!(
            record.to_value(),
            json!({"level": 40, "user": "ann", "id": 7, "time": record.time_string()})
        );
    }

    #[test]
    fn test_field_order() {
        let record = LogRecord::build(
            Level::Debug,
            payload(json!({"zeta": 1, "message": "hi", "alpha": 2})),
            Utc::now(),
        );
        let json = serde_json::to_string(&record).unwrap();
        let keys: Vec<String> = serde_json::from_str::<Map<String, Value>>(&json)
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["level", "message", "zeta", "alpha", "time"]);
    }

    #[test]
    fn test_caller_payload_is_not_mutated() {
        let original = json!({"request": {"path": "/"}});
        let record = LogRecord::build(Level::Info, payload(original.clone()), Utc::now());
        assert_eq!(original, json!({"request": {"path": "/"}}));
        assert!(record.get("request").is_some());
    }

    #[test]
    fn test_non_object_values() {
        let record = LogRecord::build(Level::Info, payload(json!(5)), Utc::now());
        assert!(record.fields().is_empty());
        let record = LogRecord::build(Level::Info, payload(json!("plain")), Utc::now());
        assert_eq!(record.message(), Some("plain"));
    }

    #[test]
    fn test_serialize_matches_to_value() {
        let record = LogRecord::build(
            Level::Fatal,
            payload(json!({"nested": {"a": [1, 2]}, "ok": true})),
            Utc::now(),
        );
        let parsed: Value = serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(parsed, record.to_value());
        assert!(record.time_string().ends_with('Z'));
    }
}
