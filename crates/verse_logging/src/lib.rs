#![deny(missing_docs)]
//! Logging macros shared by the harvester crates.
//!
//! Every `verse_*` macro forwards to the `log` facade. While a unit of work
//! (one chapter of one translation) is active on the current thread, its
//! label is prefixed to warnings and errors so a failure in a long batch can
//! be traced to the chapter that caused it.

use std::cell::RefCell;

thread_local! {
    static CURRENT_UNIT: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Returns the label of the active unit of work, or an empty string.
pub fn current_unit() -> String {
    CURRENT_UNIT.with(|unit| unit.borrow().clone().unwrap_or_default())
}

/// Marks `label` as the active unit of work until the guard is dropped.
/// Guards nest: dropping one restores the label that was active before it.
///
/// The label lives in a thread-local, so a guard must not be held across an
/// `.await`: on a multi-threaded runtime the task may resume elsewhere and
/// leave the label behind on the old thread.
pub fn enter_unit(label: impl Into<String>) -> UnitGuard {
    let previous = CURRENT_UNIT.with(|unit| unit.borrow_mut().replace(label.into()));
    UnitGuard { previous }
}

/// Restores the previous unit label when dropped. See [`enter_unit`].
#[must_use = "the unit label is cleared as soon as the guard is dropped"]
pub struct UnitGuard {
    previous: Option<String>,
}

impl Drop for UnitGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_UNIT.with(|unit| *unit.borrow_mut() = previous);
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __verse_log_in_unit {
    ($level:ident, $($arg:tt)*) => {{
        let unit = $crate::current_unit();
        if unit.is_empty() {
            log::$level!($($arg)*);
        } else {
            log::$level!("[{}] {}", unit, format_args!($($arg)*));
        }
    }};
}

/// Logs a trace-level message.
#[macro_export]
macro_rules! verse_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message.
#[macro_export]
macro_rules! verse_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message.
#[macro_export]
macro_rules! verse_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message, prefixed with the active unit label.
#[macro_export]
macro_rules! verse_warn {
    ($($arg:tt)*) => {
        $crate::__verse_log_in_unit!(warn, $($arg)*)
    };
}

/// Logs an error-level message, prefixed with the active unit label.
#[macro_export]
macro_rules! verse_error {
    ($($arg:tt)*) => {
        $crate::__verse_log_in_unit!(error, $($arg)*)
    };
}

/// Installs a terminal logger for tests. Later calls are no-ops.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
