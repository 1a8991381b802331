//! crates/logging/src/logger.rs
//! The logging capability every backend implements.

use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;

use crate::level::Level;

/// A positional value substituted into a message template.
pub type Argument<'a> = &'a dyn Display;

/// A failure associated with a logged event.
pub type Failure<'a> = &'a (dyn Error + 'static);

/// Structured logging capability.
///
/// A logger answers whether a level is enabled and records events made of a
/// level, an optional failure, a message template and its positional
/// arguments. Backends implement this trait; callers normally go through the
/// gated helpers on [`LoggerExt`](crate::LoggerExt) or the logging macros,
/// which consult [`is_enabled`](Logger::is_enabled) before building any
/// arguments.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single instance can be shared by
/// every thread of the process.
pub trait Logger: Send + Sync {
    /// Reports whether events at `level` would be recorded.
    ///
    /// Must be free of side effects and callable at any time.
    fn is_enabled(&self, level: Level) -> bool;

    /// Records one event.
    ///
    /// `arguments` is empty when the template takes no values; it is never a
    /// stand-in for "arguments unknown". Implementations forward the
    /// template, arguments and failure to their sink unchanged and in order.
    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    );
}

impl<L> Logger for &L
where
    L: Logger + ?Sized,
{
    fn is_enabled(&self, level: Level) -> bool {
        (**self).is_enabled(level)
    }

    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        (**self).log(level, error, template, arguments);
    }
}

impl<L> Logger for Box<L>
where
    L: Logger + ?Sized,
{
    fn is_enabled(&self, level: Level) -> bool {
        (**self).is_enabled(level)
    }

    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        (**self).log(level, error, template, arguments);
    }
}

impl<L> Logger for Arc<L>
where
    L: Logger + ?Sized,
{
    fn is_enabled(&self, level: Level) -> bool {
        (**self).is_enabled(level)
    }

    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        (**self).log(level, error, template, arguments);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(bool);

    impl Logger for Fixed {
        fn is_enabled(&self, _level: Level) -> bool {
            self.0
        }

        fn log(
            &self,
            _level: Level,
            _error: Option<Failure<'_>>,
            _template: &str,
            _arguments: &[Argument<'_>],
        ) {
        }
    }

    fn enabled<L: Logger>(logger: L) -> bool {
        logger.is_enabled(Level::Information)
    }

    #[test]
    fn wrappers_delegate_to_inner_logger() {
        assert!(enabled(&Fixed(true)));
        assert!(!enabled(Box::new(Fixed(false))));
        assert!(enabled(Arc::new(Fixed(true))));

        let erased: Arc<dyn Logger> = Arc::new(Fixed(false));
        assert!(!enabled(erased));
    }
}
