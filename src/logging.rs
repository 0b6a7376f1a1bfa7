//! Logging sink (spec.md §6 `debug_log_cb`), grounded on the teacher's
//! `utils/logger.rs`: a single installable [`log::Log`] implementor, with a
//! no-op default for headless/test use instead of requiring every
//! embedding application to wire one up before anything else works.

use log::{Level, LevelFilter, Log, Metadata, Record};

/// A [`log::Log`] that discards everything. Installed by [`init_null`] for
/// tests and for embeddings that have not yet wired up a real sink.
pub struct NullLogger;

impl Log for NullLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        false
    }

    fn log(&self, _record: &Record) {}

    fn flush(&self) {}
}

static NULL_LOGGER: NullLogger = NullLogger;

/// Install [`NullLogger`] as the global logger, at `Off`. Safe to call more
/// than once; only the first call has any effect (`log::set_logger` errors
/// on subsequent calls, which this silently ignores).
pub fn init_null() {
    let _ = log::set_logger(&NULL_LOGGER);
    log::set_max_level(LevelFilter::Off);
}

/// Install `logger` as the global sink at `level`, the way the teacher's
/// `utils/logger::init` installs `CluuLogger`. Embedding applications that
/// want scheduler diagnostics call this once at startup instead of
/// `init_null`.
pub fn init(logger: &'static dyn Log, level: Level) {
    let _ = log::set_logger(logger);
    log::set_max_level(level.to_level_filter());
}
