use crate::logger::HandlerId;

/// Failure reported by a handler while rendering or writing a record.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("failed to write log output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize log record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("log writer lock poisoned")]
    Poisoned,
    #[error("{0}")]
    Custom(String),
}

/// Handlers that failed during a single dispatch, in invocation order.
#[derive(Debug, thiserror::Error)]
#[error("{} log handler(s) failed", .failures.len())]
pub struct DispatchError {
    pub failures: Vec<(HandlerId, HandlerError)>,
}
