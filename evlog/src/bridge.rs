use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

use evlog_core::{MESSAGE_KEY, Map, Value};

use crate::logger::{Logger, is_dispatching};

/// Routes records from the `log` macros into a [`Logger`].
///
/// Records logged by evlog itself, or from inside a handler, are dropped so a
/// failing handler cannot feed itself.
pub struct LogBridge {
    logger: &'static Logger,
}

impl LogBridge {
    pub fn new(logger: &'static Logger) -> Self {
        Self { logger }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let target = metadata.target();
        target != "evlog" && !target.starts_with("evlog::")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) || is_dispatching() {
            return;
        }
        let mut fields = Map::new();
        fields.insert(MESSAGE_KEY.into(), Value::String(record.args().to_string()));
        fields.insert("target".into(), Value::from(record.target()));
        self.logger.log(record.level().into(), fields);
    }

    fn flush(&self) {}
}

/// Installs a [`LogBridge`] as the global `log` logger.
pub fn init_log_bridge(logger: &'static Logger, level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(LogBridge::new(logger)))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Level;
    use crossbeam_channel::unbounded;
    use std::sync::LazyLock;

    static LOGGER: LazyLock<Logger> = LazyLock::new(Logger::new);

    #[test]
    fn test_bridge_forwards_records() {
        let (sender, receiver) = unbounded();
        let id = LOGGER.on(move |record| {
            sender.send(record.clone()).ok();
            Ok(())
        });
        let bridge = LogBridge::new(&LOGGER);
        bridge.log(
            &Record::builder()
                .args(format_args!("disk at {}%", 91))
                .level(log::Level::Warn)
                .target("storage")
                .build(),
        );
        bridge.log(
            &Record::builder()
                .args(format_args!("handler failed"))
                .level(log::Level::Error)
                .target("evlog::dispatch")
                .build(),
        );
        LOGGER.off(id);
        let records: Vec<_> = receiver.try_iter().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level(), Level::Warn);
        assert_eq!(records[0].message(), Some("disk at 91%"));
        assert_eq!(records[0].get("target"), Some(&Value::from("storage")));
    }

    #[test]
    fn test_bridge_filters_own_targets() {
        let bridge = LogBridge::new(&LOGGER);
        let metadata = |target: &'static str| Metadata::builder().target(target).build();
        assert!(!bridge.enabled(&metadata("evlog")));
        assert!(!bridge.enabled(&metadata("evlog::dispatch")));
        assert!(bridge.enabled(&metadata("evlogger")));
        assert!(bridge.enabled(&metadata("app::db")));
    }
}
