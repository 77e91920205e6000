//! # evlog
//! Structured event logger: every call becomes a record with a `level` and a
//! `time`, handed synchronously to each subscribed handler.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! evlog = "0.1.0"
//! ```
//!
//! ```rust
//! use evlog::{Logger, printf, write_json, write_pretty};
//!
//! let logger = Logger::new();
//! logger.on(write_json);
//! logger.on(write_pretty);
//!
//! logger.info("Hello, world!");
//! logger.info(printf!("listening on port %d", 8080));
//! logger.warn(evlog::json!({"message": "slow query", "elapsed_ms": 1250}));
//! ```
//!
//! ## Errors
//! Errors are logged with their message and a stack built from their source chain.
//!
//! ```rust
//! use evlog::{LogInput, Logger};
//!
//! let logger = Logger::new();
//! logger.once(|record| {
//!     assert_eq!(record.message(), Some("disk full"));
//!     assert!(record.stack().is_some());
//!     Ok(())
//! });
//! logger.fatal(LogInput::error(&std::io::Error::other("disk full")));
//! ```
//!
//! ## Custom outputs
//! Handlers are plain closures. The ready-made ones write to any [`LogWriter`],
//! for instance a file or an in-memory buffer.
//!
//! ```rust
//! use evlog::{BunyanHandler, LogBuffer, Logger};
//!
//! let buffer = LogBuffer::default();
//! let bunyan = BunyanHandler::new(buffer.clone()).with_name("api");
//! let logger = Logger::new();
//! let id = logger.on(move |record| bunyan.handle(record));
//!
//! logger.error(evlog::json!({"code": 500}));
//! logger.off(id);
//! logger.error("not written");
//!
//! let lines = buffer.lines();
//! assert_eq!(lines.len(), 1);
//! assert!(lines[0].contains(r#""msg":"object""#));
//! ```
//!
//! ## The default logger
//! [`default_logger`] returns a process-wide instance, and [`init_log_bridge`]
//! routes the `log` crate macros into any `'static` logger.
//!
//! ```rust
//! use evlog::{default_logger, init_log_bridge, write_json};
//!
//! default_logger().on(write_json);
//! init_log_bridge(default_logger(), log::LevelFilter::Info).unwrap();
//! log::info!("Hello from the log crate!");
//! ```

mod bridge;
mod config;
mod error;
mod handlers;
mod log_writer;
mod logger;

pub use bridge::{LogBridge, init_log_bridge};
pub use config::{EVLOG_CONFIG, EvlogConfig};
pub use error::{DispatchError, HandlerError};
pub use evlog_core::{Inspector, Level, LogInput, LogRecord, Map, ParseLevelError, Value, format};
pub use handlers::{
    BunyanHandler, JsonHandler, PrettyHandler, write_bunyan, write_json, write_pretty,
};
pub use log_writer::{LogBuffer, LogFile, LogStdout, LogWriter};
pub use logger::{DispatchPolicy, HandlerFn, HandlerId, Logger, default_logger};
pub use serde_json::json;

/// Builds a [`LogInput`] from a printf-style template and its arguments.
///
/// ```rust
/// use evlog::{Logger, printf};
///
/// let logger = Logger::new();
/// logger.once(|record| {
///     assert_eq!(record.message(), Some("test message 42"));
///     Ok(())
/// });
/// logger.info(printf!("test %s %d", "message", 42));
/// ```
#[macro_export]
macro_rules! printf {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::LogInput::format($template, vec![$($crate::Value::from($arg)),*])
    };
}
