//! crates/logging/src/tracing_bridge.rs
//! Adapter forwarding facade events to the tracing crate.
//!
//! [`TracingLogger`] turns each facade event into a `tracing` event carrying
//! these fields:
//!
//! - `logger`: the contextual name the logger was created with
//! - `template`: the unrendered message template
//! - `error`: the attached failure, when there is one
//! - `arguments`: the arguments rendered one by one, in order
//! - `message`: the template rendered with its arguments
//!
//! Level checks go through `tracing::enabled!`, so whatever subscriber is
//! active (including an `EnvFilter`) decides which levels are enabled.
//!
//! # Usage
//!
//! ```
//! use logging::{info, TracingLoggerFactory, LoggerFactory};
//!
//! let _ = logging::init_tracing("info");
//! let logger = TracingLoggerFactory.create("transfer");
//! info!(logger, "copied {count} files", 12);
//! ```

use std::fmt;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::factory::LoggerFactory;
use crate::level::Level;
use crate::level_map::LevelMap;
use crate::logger::{Argument, Failure, Logger};
use crate::template::MessageTemplate;

/// Level table used by [`TracingLogger::new`].
///
/// `tracing` has no level above `ERROR`, so [`Level::Critical`] shares it.
pub fn default_tracing_levels() -> LevelMap<tracing::Level> {
    LevelMap::from_fn(|level| match level {
        Level::Trace => tracing::Level::TRACE,
        Level::Debug => tracing::Level::DEBUG,
        Level::Information => tracing::Level::INFO,
        Level::Warning => tracing::Level::WARN,
        Level::Error | Level::Critical => tracing::Level::ERROR,
    })
}

/// Logger that emits `tracing` events.
#[derive(Clone)]
pub struct TracingLogger {
    name: String,
    levels: LevelMap<tracing::Level>,
}

impl TracingLogger {
    /// Creates a logger reporting `name` in the `logger` field.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_level_map(name, default_tracing_levels())
    }

    /// Creates a logger with a custom level translation.
    pub fn with_level_map(name: impl Into<String>, levels: LevelMap<tracing::Level>) -> Self {
        Self {
            name: name.into(),
            levels,
        }
    }

    /// Returns the contextual name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `tracing` level `level` is emitted at.
    pub fn native_level(&self, level: Level) -> tracing::Level {
        *self.levels.get(level)
    }
}

impl fmt::Debug for TracingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingLogger")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

macro_rules! emit {
    ($native:expr, $($fields:tt)+) => {
        match $native {
            tracing::Level::TRACE => tracing::event!(tracing::Level::TRACE, $($fields)+),
            tracing::Level::DEBUG => tracing::event!(tracing::Level::DEBUG, $($fields)+),
            tracing::Level::INFO => tracing::event!(tracing::Level::INFO, $($fields)+),
            tracing::Level::WARN => tracing::event!(tracing::Level::WARN, $($fields)+),
            tracing::Level::ERROR => tracing::event!(tracing::Level::ERROR, $($fields)+),
        }
    };
}

impl Logger for TracingLogger {
    fn is_enabled(&self, level: Level) -> bool {
        match self.native_level(level) {
            tracing::Level::TRACE => tracing::enabled!(tracing::Level::TRACE),
            tracing::Level::DEBUG => tracing::enabled!(tracing::Level::DEBUG),
            tracing::Level::INFO => tracing::enabled!(tracing::Level::INFO),
            tracing::Level::WARN => tracing::enabled!(tracing::Level::WARN),
            tracing::Level::ERROR => tracing::enabled!(tracing::Level::ERROR),
        }
    }

    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        let message = MessageTemplate::parse(template).render(arguments);
        let error = error.map(tracing::field::display);
        let arguments: Vec<String> = arguments.iter().map(ToString::to_string).collect();
        emit!(
            self.native_level(level),
            logger = %self.name,
            template,
            error,
            arguments = ?arguments,
            "{message}"
        );
    }
}

/// Factory producing [`TracingLogger`] instances.
#[derive(Clone, Debug)]
pub struct TracingLoggerFactory;

impl LoggerFactory for TracingLoggerFactory {
    type Logger = TracingLogger;

    fn create(&self, name: &str) -> TracingLogger {
        TracingLogger::new(name)
    }
}

/// Installs a global `tracing` subscriber printing formatted events.
///
/// Filtering directives come from `RUST_LOG` when it is set and parses,
/// otherwise from `default_directives` (for example `"info"` or
/// `"warn,storage=debug"`).
///
/// # Errors
///
/// Fails when a global subscriber has already been installed.
pub fn init_tracing(default_directives: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use tracing::Subscriber;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer};

    #[derive(Debug, Default)]
    struct Captured {
        level: Option<tracing::Level>,
        fields: Vec<(String, String)>,
    }

    impl Captured {
        fn field(&self, name: &str) -> Option<&str> {
            self.fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }
    }

    impl Visit for Captured {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.fields
                .push((field.name().to_owned(), format!("{value:?}")));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.fields.push((field.name().to_owned(), value.to_owned()));
        }
    }

    #[derive(Clone, Default)]
    struct CaptureLayer {
        events: Arc<Mutex<Vec<Captured>>>,
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut captured = Captured {
                level: Some(*event.metadata().level()),
                ..Captured::default()
            };
            event.record(&mut captured);
            self.events.lock().unwrap().push(captured);
        }
    }

    #[test]
    fn default_map_folds_critical_into_error() {
        let logger = TracingLogger::new("map");
        assert_eq!(logger.native_level(Level::Trace), tracing::Level::TRACE);
        assert_eq!(logger.native_level(Level::Information), tracing::Level::INFO);
        assert_eq!(logger.native_level(Level::Warning), tracing::Level::WARN);
        assert_eq!(logger.native_level(Level::Critical), tracing::Level::ERROR);
    }

    #[test]
    fn events_carry_name_template_and_message() {
        let layer = CaptureLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        let logger = TracingLoggerFactory.create("storage");

        tracing::subscriber::with_default(subscriber, || {
            logger.log(Level::Warning, None, "disk {disk} at {pct}%", &[&"sda", &91]);
        });

        let events = layer.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Some(tracing::Level::WARN));
        assert_eq!(events[0].field("logger"), Some("storage"));
        assert_eq!(events[0].field("template"), Some("disk {disk} at {pct}%"));
        assert_eq!(events[0].field("message"), Some("disk sda at 91%"));
        assert_eq!(events[0].field("arguments"), Some(r#"["sda", "91"]"#));
        assert_eq!(events[0].field("error"), None);
    }

    #[test]
    fn failure_is_recorded_as_error_field() {
        let layer = CaptureLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        let logger = TracingLogger::new("net");
        let failure = std::io::Error::other("connection reset");

        tracing::subscriber::with_default(subscriber, || {
            logger.log(Level::Critical, Some(&failure), "peer lost", &[]);
        });

        let events = layer.events.lock().unwrap();
        assert_eq!(events[0].level, Some(tracing::Level::ERROR));
        assert_eq!(events[0].field("error"), Some("connection reset"));
        assert_eq!(events[0].field("arguments"), Some("[]"));
    }

    #[test]
    fn enabled_follows_subscriber_filter() {
        let subscriber = tracing_subscriber::registry()
            .with(tracing_subscriber::filter::LevelFilter::INFO)
            .with(CaptureLayer::default());
        let logger = TracingLogger::new("filter");

        tracing::subscriber::with_default(subscriber, || {
            assert!(!logger.is_enabled(Level::Debug));
            assert!(logger.is_enabled(Level::Information));
            assert!(logger.is_enabled(Level::Critical));
        });
    }

    #[test]
    fn custom_map_changes_emitted_level() {
        let layer = CaptureLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        let mut levels = default_tracing_levels();
        levels.set(Level::Information, tracing::Level::DEBUG);
        let logger = TracingLogger::with_level_map("custom", levels);

        tracing::subscriber::with_default(subscriber, || {
            logger.log(Level::Information, None, "quiet", &[]);
        });

        assert_eq!(
            layer.events.lock().unwrap()[0].level,
            Some(tracing::Level::DEBUG)
        );
    }
}
