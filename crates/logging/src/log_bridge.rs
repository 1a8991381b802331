//! crates/logging/src/log_bridge.rs
//! Adapter forwarding facade events to the `log` crate.

use std::borrow::Cow;
use std::fmt;

use log::kv::{self, Key, Source, Value, VisitSource};

use crate::factory::LoggerFactory;
use crate::level::Level;
use crate::level_map::LevelMap;
use crate::logger::{Argument, Failure, Logger};
use crate::template::MessageTemplate;

/// Level table used by [`LogCrateLogger::new`].
///
/// `log` stops at `Error`, so [`Level::Critical`] shares it.
pub fn default_log_levels() -> LevelMap<log::Level> {
    LevelMap::from_fn(|level| match level {
        Level::Trace => log::Level::Trace,
        Level::Debug => log::Level::Debug,
        Level::Information => log::Level::Info,
        Level::Warning => log::Level::Warn,
        Level::Error | Level::Critical => log::Level::Error,
    })
}

/// Logger that hands events to whichever `log` implementation is installed.
///
/// The contextual name becomes the record target, so `log` backends can
/// filter per component. The rendered message is the record body. The record
/// also carries key-values: `template` with the unrendered template, `error`
/// when a failure is attached, and one pair per argument keyed by the hole it
/// fills (or by its position when no hole refers to it), in argument order.
#[derive(Clone)]
pub struct LogCrateLogger {
    target: String,
    levels: LevelMap<log::Level>,
}

impl LogCrateLogger {
    /// Creates a logger writing records with `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self::with_level_map(target, default_log_levels())
    }

    /// Creates a logger with a custom level translation.
    pub fn with_level_map(target: impl Into<String>, levels: LevelMap<log::Level>) -> Self {
        Self {
            target: target.into(),
            levels,
        }
    }

    /// Returns the record target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the `log` level `level` is recorded at.
    pub fn native_level(&self, level: Level) -> log::Level {
        self.levels.lookup(level)
    }
}

impl fmt::Debug for LogCrateLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogCrateLogger")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Logger for LogCrateLogger {
    fn is_enabled(&self, level: Level) -> bool {
        let native = self.native_level(level);
        native <= log::max_level()
            && log::logger().enabled(
                &log::Metadata::builder()
                    .level(native)
                    .target(&self.target)
                    .build(),
            )
    }

    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        let parsed = MessageTemplate::parse(template);
        let message = parsed.render(arguments);
        let fields = EventFields {
            template,
            error,
            names: parsed.argument_names(arguments.len()),
            arguments,
        };

        log::logger().log(
            &log::Record::builder()
                .args(format_args!("{message}"))
                .level(self.native_level(level))
                .target(&self.target)
                .module_path_static(Some(module_path!()))
                .key_values(&fields)
                .build(),
        );
    }
}

struct EventFields<'a> {
    template: &'a str,
    error: Option<Failure<'a>>,
    names: Vec<Cow<'a, str>>,
    arguments: &'a [Argument<'a>],
}

impl Source for EventFields<'_> {
    fn visit<'kvs>(&'kvs self, visitor: &mut dyn VisitSource<'kvs>) -> Result<(), kv::Error> {
        visitor.visit_pair(Key::from_str("template"), Value::from(self.template))?;
        if let Some(error) = &self.error {
            visitor.visit_pair(Key::from_str("error"), Value::from_display(error))?;
        }
        for (name, argument) in self.names.iter().zip(self.arguments) {
            visitor.visit_pair(Key::from_str(name), Value::from_display(argument))?;
        }
        Ok(())
    }
}

/// Factory producing [`LogCrateLogger`] instances targeted at the name.
#[derive(Clone, Copy, Debug)]
pub struct LogCrateLoggerFactory;

impl LoggerFactory for LogCrateLoggerFactory {
    type Logger = LogCrateLogger;

    fn create(&self, name: &str) -> LogCrateLogger {
        LogCrateLogger::new(name)
    }
}
