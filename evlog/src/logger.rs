use std::{
    cell::Cell,
    fmt,
    sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, Utc};
use evlog_core::{Level, LogInput, LogRecord};
use uuid::Uuid;

use crate::error::{DispatchError, HandlerError};

/// A subscribed handler.
pub type HandlerFn = dyn Fn(&LogRecord) -> Result<(), HandlerError> + Send + Sync;

/// Identifies a subscription, returned by [`Logger::on`] and [`Logger::once`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct HandlerId(Uuid);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// What happens to the remaining handlers once one of them fails.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DispatchPolicy {
    /// Keep delivering the record to the handlers after the failing one.
    #[default]
    Isolate,
    /// Stop delivering the record at the first failure.
    FailFast,
}

struct Subscription {
    id: HandlerId,
    handler: Arc<HandlerFn>,
    once: bool,
}

thread_local! {
    /// Number of dispatches running on this thread.
    static DISPATCH_DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct DispatchGuard;

impl DispatchGuard {
    fn enter() -> Self {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get() + 1));
        DispatchGuard
    }
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        DISPATCH_DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

/// Whether the current thread is inside a handler invocation.
pub(crate) fn is_dispatching() -> bool {
    DISPATCH_DEPTH.with(|depth| depth.get() > 0)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Broadcast hub: builds a record for every call and hands it to each
/// subscribed handler, synchronously and in subscription order.
///
/// The subscription list is never locked while a handler runs, so handlers
/// may subscribe, unsubscribe or log from inside a dispatch.
pub struct Logger {
    subscriptions: Mutex<Vec<Subscription>>,
    last_time: Mutex<DateTime<Utc>>,
    policy: DispatchPolicy,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
            last_time: Mutex::new(DateTime::<Utc>::MIN_UTC),
            policy: DispatchPolicy::default(),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("handlers", &self.handler_count())
            .field("policy", &self.policy)
            .finish()
    }
}

static DEFAULT_LOGGER: LazyLock<Logger> = LazyLock::new(Logger::new);

/// Process-wide logger, created on first use and never torn down.
pub fn default_logger() -> &'static Logger {
    &DEFAULT_LOGGER
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(self, policy: DispatchPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Subscribes `handler` to every record logged from now on.
    pub fn on<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&LogRecord) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(handler), false)
    }

    /// Subscribes `handler` to the next record only.
    pub fn once<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&LogRecord) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(handler), true)
    }

    fn subscribe(&self, handler: Arc<HandlerFn>, once: bool) -> HandlerId {
        let id = HandlerId(Uuid::new_v4());
        lock(&self.subscriptions).push(Subscription { id, handler, once });
        id
    }

    /// Removes a subscription. Returns `false` if `id` was not subscribed.
    pub fn off(&self, id: HandlerId) -> bool {
        let mut subscriptions = lock(&self.subscriptions);
        match subscriptions.iter().position(|s| s.id == id) {
            Some(index) => {
                subscriptions.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn handler_count(&self) -> usize {
        lock(&self.subscriptions).len()
    }

    /// Removes every subscription.
    pub fn clear(&self) {
        lock(&self.subscriptions).clear();
    }

    /// Wall-clock time, clamped so it never goes backwards for this logger.
    fn now(&self) -> DateTime<Utc> {
        let mut last = lock(&self.last_time);
        let now = Utc::now().max(*last);
        *last = now;
        now
    }

    /// Builds a record at `level` and publishes it. Handler failures are
    /// reported through the `log` crate under the `evlog::dispatch` target.
    pub fn log(&self, level: Level, input: impl Into<LogInput>) {
        let record = LogRecord::build(level, input.into(), self.now());
        if let Err(err) = self.emit(&record) {
            for (id, failure) in &err.failures {
                log::error!(target: "evlog::dispatch", "handler {id} failed on {level} record: {failure}");
            }
        }
    }

    /// Publishes a prebuilt record to every subscribed handler.
    ///
    /// Once-subscriptions are removed right before they run, so a record
    /// logged from inside a handler never reaches them a second time.
    pub fn emit(&self, record: &LogRecord) -> Result<(), DispatchError> {
        let handlers: Vec<(HandlerId, Arc<HandlerFn>, bool)> = lock(&self.subscriptions)
            .iter()
            .map(|s| (s.id, Arc::clone(&s.handler), s.once))
            .collect();
        let _guard = DispatchGuard::enter();
        let mut failures = Vec::new();
        for (id, handler, once) in handlers {
            if once && !self.off(id) {
                continue;
            }
            if let Err(err) = handler(record) {
                failures.push((id, err));
                if self.policy == DispatchPolicy::FailFast {
                    break;
                }
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError { failures })
        }
    }

    pub fn trace(&self, input: impl Into<LogInput>) {
        self.log(Level::Trace, input)
    }

    pub fn debug(&self, input: impl Into<LogInput>) {
        self.log(Level::Debug, input)
    }

    pub fn info(&self, input: impl Into<LogInput>) {
        self.log(Level::Info, input)
    }

    pub fn warn(&self, input: impl Into<LogInput>) {
        self.log(Level::Warn, input)
    }

    pub fn error(&self, input: impl Into<LogInput>) {
        self.log(Level::Error, input)
    }

    pub fn fatal(&self, input: impl Into<LogInput>) {
        self.log(Level::Fatal, input)
    }
}
