//! # evlog-core
//! Core types for evlog - levels, records and printf-style formatting.
//!
//! Nothing in this crate writes output or reads the environment: it only turns
//! a call's input into a [`LogRecord`].

mod format;
pub mod inspect;
mod level;
mod record;

pub use format::format;
pub use inspect::{Inspector, Painter, Style};
pub use level::{Level, ParseLevelError};
pub use record::{LEVEL_KEY, LogInput, LogRecord, MESSAGE_KEY, STACK_KEY, TIME_KEY};
pub use serde_json::{Map, Value};
