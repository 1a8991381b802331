//! crates/test-support/src/lib.rs
//! Recording logger shared by the workspace's integration tests.
//!
//! [`RecordingLogger`] implements [`logging::Logger`] and remembers every
//! enabled check and every event it receives. A cloneable [`Recording`]
//! handle keeps observing the logger after it has been moved into a
//! dispatcher, including how many times it was released.
//!
//! ```
//! use logging::{Level, LoggerExt};
//! use test_support::RecordingLogger;
//!
//! let logger = RecordingLogger::at_least(Level::Warning);
//! let recording = logger.recording();
//!
//! logger.info("ignored", &[]);
//! logger.error("disk {0} failed", &[&"sda"]);
//!
//! assert_eq!(recording.checks(), [Level::Information, Level::Error]);
//! assert_eq!(recording.events()[0].arguments, ["sda"]);
//! drop(logger);
//! assert_eq!(recording.releases(), 1);
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use logging::{Argument, Failure, Level, Logger};

/// One event received by a [`RecordingLogger`], with its values rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedEvent {
    /// Level passed to `log`.
    pub level: Level,
    /// `Display` output of the attached failure.
    pub error: Option<String>,
    /// Template exactly as passed.
    pub template: String,
    /// `Display` output of each argument, in order.
    pub arguments: Vec<String>,
}

#[derive(Default)]
struct Shared {
    enabled: [AtomicBool; 6],
    checks: Mutex<Vec<Level>>,
    events: Mutex<Vec<RecordedEvent>>,
    releases: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Logger that records checks and events for later assertions.
pub struct RecordingLogger {
    shared: Arc<Shared>,
}

impl RecordingLogger {
    /// Creates a logger enabled for exactly `levels`.
    pub fn with_levels(levels: impl IntoIterator<Item = Level>) -> Self {
        let logger = Self {
            shared: Arc::new(Shared::default()),
        };
        for level in levels {
            logger.recording().set_enabled(level, true);
        }
        logger
    }

    /// Creates a logger with every level enabled.
    pub fn all() -> Self {
        Self::with_levels(Level::ALL)
    }

    /// Creates a logger with every level disabled.
    pub fn disabled() -> Self {
        Self::with_levels([])
    }

    /// Creates a logger enabled for `minimum` and every more severe level.
    pub fn at_least(minimum: Level) -> Self {
        Self::with_levels(Level::ALL.into_iter().filter(|level| *level >= minimum))
    }

    /// Returns a handle observing this logger.
    pub fn recording(&self) -> Recording {
        Recording {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Logger for RecordingLogger {
    fn is_enabled(&self, level: Level) -> bool {
        lock(&self.shared.checks).push(level);
        self.shared.enabled[level.index()].load(Ordering::SeqCst)
    }

    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        lock(&self.shared.events).push(RecordedEvent {
            level,
            error: error.map(ToString::to_string),
            template: template.to_owned(),
            arguments: arguments.iter().map(ToString::to_string).collect(),
        });
    }
}

impl Drop for RecordingLogger {
    fn drop(&mut self) {
        self.shared.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Observer handle for a [`RecordingLogger`].
#[derive(Clone)]
pub struct Recording {
    shared: Arc<Shared>,
}

impl Recording {
    /// Levels queried through `is_enabled`, in call order.
    pub fn checks(&self) -> Vec<Level> {
        lock(&self.shared.checks).clone()
    }

    /// Events received through `log`, in call order.
    pub fn events(&self) -> Vec<RecordedEvent> {
        lock(&self.shared.events).clone()
    }

    /// Number of times the logger has been dropped.
    pub fn releases(&self) -> usize {
        self.shared.releases.load(Ordering::SeqCst)
    }

    /// Turns `level` on or off.
    pub fn set_enabled(&self, level: Level, enabled: bool) {
        self.shared.enabled[level.index()].store(enabled, Ordering::SeqCst);
    }

    /// Forgets recorded checks and events.
    pub fn clear(&self) {
        lock(&self.shared.checks).clear();
        lock(&self.shared.events).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_least_enables_upper_levels_only() {
        let logger = RecordingLogger::at_least(Level::Error);
        assert!(!logger.is_enabled(Level::Warning));
        assert!(logger.is_enabled(Level::Error));
        assert!(logger.is_enabled(Level::Critical));
    }

    #[test]
    fn records_rendered_values() {
        let logger = RecordingLogger::all();
        let failure = std::io::Error::other("timeout");
        logger.log(Level::Debug, Some(&failure), "{a} {b}", &[&1, &"two"]);

        assert_eq!(
            logger.recording().events(),
            [RecordedEvent {
                level: Level::Debug,
                error: Some("timeout".to_owned()),
                template: "{a} {b}".to_owned(),
                arguments: vec!["1".to_owned(), "two".to_owned()],
            }]
        );
    }

    #[test]
    fn toggling_and_clearing() {
        let logger = RecordingLogger::disabled();
        let recording = logger.recording();
        assert!(!logger.is_enabled(Level::Trace));

        recording.set_enabled(Level::Trace, true);
        assert!(logger.is_enabled(Level::Trace));
        assert_eq!(recording.checks().len(), 2);

        recording.clear();
        assert!(recording.checks().is_empty());
    }
}
