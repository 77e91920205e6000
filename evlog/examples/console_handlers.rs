use evlog::{LogFile, LogInput, Logger, PrettyHandler, json, printf, write_bunyan, write_json};

fn main() {
    let path = "/tmp/evlog_example.log";
    let _ = std::fs::remove_file(path);

    let logger = Logger::new();
    logger.on(write_json);
    logger.on(write_bunyan);
    let pretty = PrettyHandler::new(LogFile::new(path).unwrap()).with_colors(false);
    logger.on(move |record| pretty.handle(record));

    logger.trace("starting up");
    logger.info(printf!("listening on %s:%d", "0.0.0.0", 8080));
    logger.warn(json!({
        "message": "slow request",
        "elapsed_ms": 1250,
        "request": {"method": "GET", "path": "/users", "query": {"page": 2}},
    }));
    logger.fatal(LogInput::error(&std::io::Error::other("listener closed")));

    println!("{}", std::fs::read_to_string(path).unwrap());
}
