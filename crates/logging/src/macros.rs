//! crates/logging/src/macros.rs
//! Logging macros that defer argument evaluation behind the level check.
//!
//! Every macro takes a logger expression first. Anything implementing
//! [`Logger`](crate::Logger) works, including [`global()`](crate::global):
//!
//! ```
//! use logging::{global, warn, NullLogger};
//!
//! let logger = NullLogger;
//! warn!(logger, "disk at {0}%", 95);
//! warn!(global(), "disk at {0}%", 95);
//!
//! let failure = std::io::Error::other("quota exceeded");
//! warn!(logger, error: &failure, "write to {0} refused", "/var/log");
//! ```
//!
//! The argument expressions are evaluated only after the level check passed,
//! so a disabled level costs one call to `is_enabled` and nothing else.

/// Logs at an explicit [`Level`](crate::Level) if it is enabled.
///
/// Accepts `log!(logger, level, [error: failure,] template [, arguments...])`.
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, error: $error:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level: $crate::Level = $level;
        if $crate::Logger::is_enabled(logger, level) {
            $crate::Logger::log(
                logger,
                level,
                ::core::option::Option::Some($error as $crate::Failure<'_>),
                $template,
                &[$(&$arg as $crate::Argument<'_>),*],
            );
        }
    }};
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level: $crate::Level = $level;
        if $crate::Logger::is_enabled(logger, level) {
            $crate::Logger::log(
                logger,
                level,
                ::core::option::Option::None,
                $template,
                &[$(&$arg as $crate::Argument<'_>),*],
            );
        }
    }};
}

/// Logs at [`Level::Trace`](crate::Level::Trace) if it is enabled.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($rest)+)
    };
}

/// Logs at [`Level::Debug`](crate::Level::Debug) if it is enabled.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($rest)+)
    };
}

/// Logs at [`Level::Information`](crate::Level::Information) if it is enabled.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Information, $($rest)+)
    };
}

/// Logs at [`Level::Warning`](crate::Level::Warning) if it is enabled.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning, $($rest)+)
    };
}

/// Logs at [`Level::Error`](crate::Level::Error) if it is enabled.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($rest)+)
    };
}

/// Logs at [`Level::Critical`](crate::Level::Critical) if it is enabled.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($rest)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Argument, Failure, Level, Logger};
    use std::cell::Cell;
    use std::sync::Mutex;

    struct Gate {
        enabled: bool,
        events: Mutex<Vec<(Level, bool, String, usize)>>,
    }

    impl Gate {
        fn new(enabled: bool) -> Self {
            Self {
                enabled,
                events: Mutex::new(Vec::new()),
            }
        }
    }

    impl Logger for Gate {
        fn is_enabled(&self, _level: Level) -> bool {
            self.enabled
        }

        fn log(
            &self,
            level: Level,
            error: Option<Failure<'_>>,
            template: &str,
            arguments: &[Argument<'_>],
        ) {
            self.events.lock().unwrap().push((
                level,
                error.is_some(),
                template.to_owned(),
                arguments.len(),
            ));
        }
    }

    #[test]
    fn disabled_level_skips_argument_evaluation() {
        let evaluated = Cell::new(false);
        let expensive = || {
            evaluated.set(true);
            42
        };

        let gate = Gate::new(false);
        crate::debug!(gate, "value={0}", expensive());

        assert!(!evaluated.get());
        assert!(gate.events.lock().unwrap().is_empty());
    }

    #[test]
    fn enabled_level_evaluates_and_emits() {
        let gate = Gate::new(true);
        crate::info!(gate, "{0} of {1}", 1, 2);
        crate::critical!(gate, "plain");

        let events = gate.events.lock().unwrap();
        assert_eq!(
            *events,
            [
                (Level::Information, false, "{0} of {1}".to_owned(), 2),
                (Level::Critical, false, "plain".to_owned(), 0),
            ]
        );
    }

    #[test]
    fn error_form_attaches_failure() {
        let gate = Gate::new(true);
        let failure = std::io::Error::other("denied");
        crate::error!(gate, error: &failure, "open {0}", "/etc/shadow");
        crate::log!(gate, Level::Trace, error: &failure, "retry",);

        let events = gate.events.lock().unwrap();
        assert_eq!(events[0], (Level::Error, true, "open {0}".to_owned(), 1));
        assert_eq!(events[1], (Level::Trace, true, "retry".to_owned(), 0));
    }

    #[test]
    fn macros_accept_shared_loggers() {
        let gate = std::sync::Arc::new(Gate::new(true));
        crate::warn!(gate, "shared");
        crate::warn!(&gate, "borrowed");
        assert_eq!(gate.events.lock().unwrap().len(), 2);
    }
}
