use std::sync::{LazyLock, Mutex};

use chrono::Local;
use colored::{ColoredString, Colorize};
use evlog_core::{
    Inspector, LEVEL_KEY, Level, LogRecord, MESSAGE_KEY, Map, Style, TIME_KEY, Value,
    inspect::number_text,
};

use crate::{
    config::EVLOG_CONFIG,
    error::HandlerError,
    log_writer::{LogStdout, LogWriter},
};

static PID: LazyLock<u32> = LazyLock::new(std::process::id);

/// Each line is flushed before returning so it is visible once `log()` is done.
fn write_to<W: LogWriter>(writer: &Mutex<W>, line: &str) -> Result<(), HandlerError> {
    let mut writer = writer.lock().map_err(|_| HandlerError::Poisoned)?;
    writer.write_line(line)?;
    writer.flush()?;
    Ok(())
}

/// `false` for null, `false`, zero and the empty string.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Writes each record as one line of JSON, keys in record order.
pub struct JsonHandler<W: LogWriter> {
    writer: Mutex<W>,
}

impl<W: LogWriter> JsonHandler<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn handle(&self, record: &LogRecord) -> Result<(), HandlerError> {
        let line = serde_json::to_string(record)?;
        write_to(&self.writer, &line)
    }
}

/// Writes Bunyan-compatible JSON: `message` becomes `msg`, followed by `pid`
/// and `name`.
pub struct BunyanHandler<W: LogWriter> {
    writer: Mutex<W>,
    name: String,
}

impl<W: LogWriter> BunyanHandler<W> {
    /// Named after `EVLOG_BUNYAN_NAME`, `"default"` when unset or invalid.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            name: EVLOG_CONFIG.BUNYAN_NAME.clone(),
        }
    }

    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn to_value(&self, record: &LogRecord) -> Value {
        let mut map = Map::with_capacity(record.fields().len() + 5);
        map.insert(LEVEL_KEY.into(), Value::from(record.level().rank()));
        for (key, value) in record.fields() {
            if key != MESSAGE_KEY {
                map.insert(key.clone(), value.clone());
            }
        }
        map.insert(TIME_KEY.into(), Value::String(record.time_string()));
        let msg = match record.get(MESSAGE_KEY) {
            Some(message) if truthy(message) => message.clone(),
            _ => Value::from("object"),
        };
        map.insert("msg".into(), msg);
        map.insert("pid".into(), Value::from(*PID));
        map.insert("name".into(), Value::from(self.name.as_str()));
        Value::Object(map)
    }

    pub fn handle(&self, record: &LogRecord) -> Result<(), HandlerError> {
        let line = serde_json::to_string(&self.to_value(record))?;
        write_to(&self.writer, &line)
    }
}

/// Writes one human-oriented line per record:
/// `<glyph> [<YYYY-MM-DD HH:mm:ss>] <level> <message>` followed by a
/// tab-indented `key: value` line for every other field.
pub struct PrettyHandler<W: LogWriter> {
    writer: Mutex<W>,
    colors: bool,
}

fn paint_value(style: Style, text: &str) -> String {
    let painted = match style {
        Style::String => text.green(),
        Style::Number | Style::Boolean => text.yellow(),
        Style::Null => text.bold(),
        Style::Special => text.cyan(),
    };
    painted.to_string()
}

fn level_label(level: Level) -> ColoredString {
    match level {
        Level::Trace => "trace".blue(),
        Level::Debug => "debug".bright_black(),
        Level::Info => "info".green(),
        Level::Warn => "warn".yellow(),
        Level::Error => "error".red(),
        Level::Fatal => "fatal".red().bold(),
    }
}

fn level_glyph(level: Level) -> ColoredString {
    match level {
        Level::Trace | Level::Debug => "ℹ".blue(),
        Level::Info => "✔".green(),
        Level::Warn => "⚠".yellow(),
        Level::Error | Level::Fatal => "✖".red(),
    }
}

impl<W: LogWriter> PrettyHandler<W> {
    /// Styled unless `EVLOG_PRETTY_COLORS=false`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            colors: EVLOG_CONFIG.PRETTY_COLORS,
        }
    }

    pub fn with_colors(self, colors: bool) -> Self {
        Self { colors, ..self }
    }

    fn style(&self, text: ColoredString) -> String {
        if self.colors {
            text.to_string()
        } else {
            text.clear().to_string()
        }
    }

    fn plain_text(&self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => number_text(n),
            Value::Bool(b) => b.to_string(),
            structured => {
                let inspector = Inspector::default().with_depth(None);
                if self.colors {
                    inspector.with_painter(paint_value).inspect(structured)
                } else {
                    inspector.inspect(structured)
                }
            }
        }
    }

    pub fn render(&self, record: &LogRecord) -> String {
        let level = record.level();
        let time = record.time().with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
        let mut line = format!(
            "{} [{time}] {} ",
            self.style(level_glyph(level)),
            self.style(level_label(level))
        );
        if let Some(message) = record.get(MESSAGE_KEY).filter(|m| truthy(m)) {
            line.push_str(&self.plain_text(message));
            line.push(' ');
        }
        for (key, value) in record.fields() {
            if key == MESSAGE_KEY {
                continue;
            }
            let key = self.style(format!("{key}:").cyan());
            line.push_str(&format!("\n\t{key} {}", self.plain_text(value)));
        }
        line
    }

    pub fn handle(&self, record: &LogRecord) -> Result<(), HandlerError> {
        write_to(&self.writer, &self.render(record))
    }
}

/// Writes `record` to stdout as one line of JSON.
pub fn write_json(record: &LogRecord) -> Result<(), HandlerError> {
    JsonHandler::new(LogStdout).handle(record)
}

/// Writes `record` to stdout as one line of Bunyan-compatible JSON.
pub fn write_bunyan(record: &LogRecord) -> Result<(), HandlerError> {
    BunyanHandler::new(LogStdout).handle(record)
}

/// Writes `record` to stdout as a pretty, colored line.
pub fn write_pretty(record: &LogRecord) -> Result<(), HandlerError> {
    PrettyHandler::new(LogStdout).handle(record)
}
