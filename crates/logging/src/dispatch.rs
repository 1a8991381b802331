//! crates/logging/src/dispatch.rs
//! Level-gated convenience operations over any [`Logger`].

use crate::level::Level;
use crate::logger::{Argument, Failure, Logger};

/// Level-specific logging operations available on every [`Logger`].
///
/// Each operation queries [`Logger::is_enabled`] once and returns immediately
/// when the level is disabled; only an enabled level reaches
/// [`Logger::log`], exactly once, with the arguments in the order given.
///
/// Argument expressions passed to these methods are evaluated by the caller
/// before the check runs. Hot paths whose arguments are expensive to compute
/// should use the [`trace!`](crate::trace)..[`critical!`](crate::critical)
/// macros, which defer argument evaluation until after the check.
///
/// # Examples
///
/// ```
/// use logging::{LoggerExt, NullLogger};
///
/// let logger = NullLogger;
/// logger.warn("disk at {0}%", &[&95]);
/// logger.info("started", &[]);
///
/// let failure = std::io::Error::other("connection reset");
/// logger.with_error(&failure).error("request {0} failed", &[&"GET /"]);
/// ```
pub trait LoggerExt: Logger {
    /// Logs one event at `level` if that level is enabled.
    #[inline]
    fn log_event(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        if !self.is_enabled(level) {
            return;
        }
        self.log(level, error, template, arguments);
    }

    /// Logs at [`Level::Trace`].
    fn trace(&self, template: &str, arguments: &[Argument<'_>]) {
        self.log_event(Level::Trace, None, template, arguments);
    }

    /// Logs at [`Level::Debug`].
    fn debug(&self, template: &str, arguments: &[Argument<'_>]) {
        self.log_event(Level::Debug, None, template, arguments);
    }

    /// Logs at [`Level::Information`].
    fn info(&self, template: &str, arguments: &[Argument<'_>]) {
        self.log_event(Level::Information, None, template, arguments);
    }

    /// Logs at [`Level::Warning`].
    fn warn(&self, template: &str, arguments: &[Argument<'_>]) {
        self.log_event(Level::Warning, None, template, arguments);
    }

    /// Logs at [`Level::Error`].
    fn error(&self, template: &str, arguments: &[Argument<'_>]) {
        self.log_event(Level::Error, None, template, arguments);
    }

    /// Logs at [`Level::Critical`].
    fn critical(&self, template: &str, arguments: &[Argument<'_>]) {
        self.log_event(Level::Critical, None, template, arguments);
    }

    /// Returns a view whose operations attach `error` to every event.
    fn with_error<'a>(&'a self, error: Failure<'a>) -> WithError<'a, Self> {
        WithError {
            logger: self,
            error,
        }
    }
}

impl<L> LoggerExt for L where L: Logger + ?Sized {}

/// Borrowed view over a logger that attaches a failure to each event.
///
/// Created by [`LoggerExt::with_error`] or [`crate::with_error`].
pub struct WithError<'a, L: ?Sized> {
    logger: &'a L,
    error: Failure<'a>,
}

impl<L: ?Sized> Clone for WithError<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: ?Sized> Copy for WithError<'_, L> {}

impl<L> WithError<'_, L>
where
    L: Logger + ?Sized,
{
    /// Logs at [`Level::Trace`] with the attached failure.
    pub fn trace(&self, template: &str, arguments: &[Argument<'_>]) {
        self.logger
            .log_event(Level::Trace, Some(self.error), template, arguments);
    }

    /// Logs at [`Level::Debug`] with the attached failure.
    pub fn debug(&self, template: &str, arguments: &[Argument<'_>]) {
        self.logger
            .log_event(Level::Debug, Some(self.error), template, arguments);
    }

    /// Logs at [`Level::Information`] with the attached failure.
    pub fn info(&self, template: &str, arguments: &[Argument<'_>]) {
        self.logger
            .log_event(Level::Information, Some(self.error), template, arguments);
    }

    /// Logs at [`Level::Warning`] with the attached failure.
    pub fn warn(&self, template: &str, arguments: &[Argument<'_>]) {
        self.logger
            .log_event(Level::Warning, Some(self.error), template, arguments);
    }

    /// Logs at [`Level::Error`] with the attached failure.
    pub fn error(&self, template: &str, arguments: &[Argument<'_>]) {
        self.logger
            .log_event(Level::Error, Some(self.error), template, arguments);
    }

    /// Logs at [`Level::Critical`] with the attached failure.
    pub fn critical(&self, template: &str, arguments: &[Argument<'_>]) {
        self.logger
            .log_event(Level::Critical, Some(self.error), template, arguments);
    }
}

impl<L: ?Sized> std::fmt::Debug for WithError<'_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithError")
            .field("error", &format_args!("{}", self.error))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Probe {
        enabled: bool,
        checks: Mutex<Vec<Level>>,
        events: Mutex<Vec<(Level, Option<String>, String, Vec<String>)>>,
    }

    impl Logger for Probe {
        fn is_enabled(&self, level: Level) -> bool {
            self.checks.lock().unwrap().push(level);
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
                error.map(ToString::to_string),
                template.to_owned(),
                arguments.iter().map(ToString::to_string).collect(),
            ));
        }
    }

    #[test]
    fn disabled_level_checks_once_and_never_emits() {
        let probe = Probe::default();
        probe.debug("value={0}", &[&1]);

        assert_eq!(*probe.checks.lock().unwrap(), [Level::Debug]);
        assert!(probe.events.lock().unwrap().is_empty());
    }

    #[test]
    fn enabled_level_emits_once_with_arguments_in_order() {
        let probe = Probe {
            enabled: true,
            ..Probe::default()
        };
        probe.warn("{0} {1} {2}", &[&"a", &2, &'c']);

        let events = probe.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, Level::Warning);
        assert_eq!(events[0].1, None);
        assert_eq!(events[0].2, "{0} {1} {2}");
        assert_eq!(events[0].3, ["a", "2", "c"]);
    }

    #[test]
    fn each_operation_uses_its_level() {
        let probe = Probe {
            enabled: true,
            ..Probe::default()
        };
        probe.trace("t", &[]);
        probe.debug("d", &[]);
        probe.info("i", &[]);
        probe.warn("w", &[]);
        probe.error("e", &[]);
        probe.critical("c", &[]);

        let levels: Vec<_> = probe.events.lock().unwrap().iter().map(|e| e.0).collect();
        assert_eq!(levels, Level::ALL);
    }

    #[test]
    fn with_error_attaches_failure() {
        let probe = Probe {
            enabled: true,
            ..Probe::default()
        };
        let failure = std::io::Error::other("boom");
        probe.with_error(&failure).critical("halted", &[]);

        let events = probe.events.lock().unwrap();
        assert_eq!(events[0].0, Level::Critical);
        assert_eq!(events[0].1.as_deref(), Some("boom"));
        assert!(events[0].3.is_empty());
    }

    #[test]
    fn works_through_trait_objects() {
        let probe = Probe {
            enabled: true,
            ..Probe::default()
        };
        let logger: &dyn Logger = &probe;
        logger.info("via dyn", &[]);
        assert_eq!(probe.events.lock().unwrap().len(), 1);
    }
}
