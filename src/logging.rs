//! Routing of diagnostic log records to a host-provided sink.
//!
//! Library code logs through `tracing`; with the `log-always` feature every
//! event is also emitted as a `log` record, which the adapter installed
//! here forwards to the sink as a `(tag, message)` pair. The tag is the
//! record target, e.g. `edge_viewer_lib::bridge`.

use std::sync::Arc;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Receiver for log lines, typically the host platform's logger.
pub trait LogSink: Send + Sync {
    fn write(&self, level: Level, tag: &str, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(Level, &str, &str) + Send + Sync,
{
    fn write(&self, level: Level, tag: &str, message: &str) {
        self(level, tag, message)
    }
}

/// Android `__android_log_write` priority for a `log` level.
pub fn android_priority(level: Level) -> i32 {
    match level {
        Level::Error => 6,
        Level::Warn => 5,
        Level::Info => 4,
        Level::Debug => 3,
        Level::Trace => 2,
    }
}

struct SinkLogger {
    sink: Arc<dyn LogSink>,
    filter: LevelFilter,
}

impl Log for SinkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        self.sink.write(record.level(), record.target(), &message);
    }

    fn flush(&self) {}
}

/// Install `sink` as the process-wide logger.
///
/// Only the first call per process takes effect; later calls return
/// `false` and leave the existing logger in place.
pub fn install(sink: Arc<dyn LogSink>, filter: LevelFilter) -> bool {
    let logger = SinkLogger { sink, filter };
    match log::set_boxed_logger(Box::new(logger)) {
        Ok(()) => {
            log::set_max_level(filter);
            true
        }
        Err(_) => false,
    }
}
