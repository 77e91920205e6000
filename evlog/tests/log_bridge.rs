use std::sync::LazyLock;

use crossbeam_channel::unbounded;
use evlog::{HandlerError, Level, Logger, init_log_bridge};

static LOGGER: LazyLock<Logger> = LazyLock::new(Logger::new);

#[test]
fn test_log_macros_reach_handlers() {
    init_log_bridge(&LOGGER, log::LevelFilter::Debug).unwrap();
    let (sender, receiver) = unbounded();
    LOGGER.on(move |record| {
        sender.send(record.clone()).ok();
        Ok(())
    });
    // a failing handler reports through `log`, which must not loop back
    LOGGER.on(|record| {
        log::info!("logged from a handler: {:?}", record.message());
        Err(HandlerError::Custom("always fails".into()))
    });

    log::warn!(target: "app::db", "pool exhausted after {} retries", 3);
    log::trace!("filtered by max level");
    log::debug!("kept");

    let records: Vec<_> = receiver.try_iter().collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level(), Level::Warn);
    assert_eq!(records[0].message(), Some("pool exhausted after 3 retries"));
    assert_eq!(records[0].get("target"), Some(&evlog::json!("app::db")));
    assert_eq!(records[1].level(), Level::Debug);
    assert!(init_log_bridge(&LOGGER, log::LevelFilter::Info).is_err());
}
