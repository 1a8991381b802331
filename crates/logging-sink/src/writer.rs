//! crates/logging-sink/src/writer.rs
//! Logger backend that renders events as text lines into an `io::Write`.

use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use logging::{Argument, Failure, Level, LevelFilter, Logger, LoggerFactory, MessageTemplate};

/// Whether a [`WriterLogger`] ends each event with a newline.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineMode {
    /// One event per line.
    #[default]
    WithNewline,
    /// Events are written back to back, for writers that frame records
    /// themselves.
    WithoutNewline,
}

/// Logger writing one rendered line per event into a writer.
///
/// Lines have the form `[name] level: message`, followed by `: error` when a
/// failure is attached. The `[name] ` prefix is omitted for an empty name.
/// Each event is rendered in full before the writer lock is taken, so
/// concurrent events never interleave.
///
/// Write failures are swallowed: a logging backend that cannot write has no
/// better channel to report through. The writer is flushed when the logger is
/// dropped, which is how a dispatcher releases it.
///
/// # Examples
///
/// ```
/// use logging::{LevelFilter, LoggerExt};
/// use logging_sink::WriterLogger;
///
/// let logger = WriterLogger::new("cache", Vec::new()).with_filter(LevelFilter::ALL);
/// logger.debug("evicted {count} entries", &[&3]);
/// logger.with_writer(|buffer| {
///     assert_eq!(buffer.as_slice(), b"[cache] debug: evicted 3 entries\n");
/// });
/// ```
pub struct WriterLogger<W: Write> {
    name: String,
    filter: LevelFilter,
    line_mode: LineMode,
    writer: Mutex<W>,
}

impl<W: Write> WriterLogger<W> {
    /// Creates a logger for `name` writing into `writer`.
    ///
    /// The filter defaults to [`LevelFilter::default`] (information and
    /// above) and each event ends with a newline.
    pub fn new(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            filter: LevelFilter::default(),
            line_mode: LineMode::default(),
            writer: Mutex::new(writer),
        }
    }

    /// Replaces the level threshold.
    pub fn with_filter(mut self, filter: LevelFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replaces the newline policy.
    pub fn with_line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = line_mode;
        self
    }

    /// Returns the contextual name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the level threshold.
    pub const fn filter(&self) -> LevelFilter {
        self.filter
    }

    /// Returns the newline policy.
    pub const fn line_mode(&self) -> LineMode {
        self.line_mode
    }

    /// Runs `f` with exclusive access to the writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut writer)
    }

    fn render_line(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) -> Result<String, fmt::Error> {
        let mut line = String::with_capacity(self.name.len() + template.len() + 16);
        if !self.name.is_empty() {
            write!(line, "[{}] ", self.name)?;
        }
        write!(line, "{level}: ")?;
        MessageTemplate::parse(template).render_to(&mut line, arguments)?;
        if let Some(error) = error {
            write!(line, ": {error}")?;
        }
        if self.line_mode == LineMode::WithNewline {
            line.push('\n');
        }
        Ok(line)
    }
}

impl WriterLogger<io::Stderr> {
    /// Creates a logger for `name` writing to standard error.
    pub fn stderr(name: impl Into<String>) -> Self {
        Self::new(name, io::stderr())
    }
}

impl<W> Logger for WriterLogger<W>
where
    W: Write + Send,
{
    fn is_enabled(&self, level: Level) -> bool {
        self.filter.allows(level)
    }

    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        if !self.filter.allows(level) {
            return;
        }
        // A failing Display impl drops the event rather than writing half a line.
        let Ok(line) = self.render_line(level, error, template, arguments) else {
            return;
        };
        let _ = self.with_writer(|writer| writer.write_all(line.as_bytes()));
    }
}

impl<W: Write> Drop for WriterLogger<W> {
    fn drop(&mut self) {
        let writer = self.writer.get_mut().unwrap_or_else(PoisonError::into_inner);
        let _ = writer.flush();
    }
}

impl<W: Write> fmt::Debug for WriterLogger<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterLogger")
            .field("name", &self.name)
            .field("filter", &self.filter)
            .field("line_mode", &self.line_mode)
            .finish_non_exhaustive()
    }
}

/// Factory creating a [`WriterLogger`] per name, each with a writer obtained
/// from `make_writer`.
///
/// # Examples
///
/// ```
/// use logging::{Level, Logger, LoggerFactory, LevelFilter};
/// use logging_sink::WriterLoggerFactory;
///
/// let factory = WriterLoggerFactory::stderr().with_filter(LevelFilter::AtLeast(Level::Warning));
/// let logger = factory.create("net");
/// assert!(logger.is_enabled(Level::Error));
/// assert!(!logger.is_enabled(Level::Debug));
/// ```
#[derive(Clone)]
pub struct WriterLoggerFactory<F> {
    make_writer: F,
    filter: LevelFilter,
    line_mode: LineMode,
}

impl<F, W> WriterLoggerFactory<F>
where
    F: Fn() -> W,
    W: Write,
{
    /// Creates a factory calling `make_writer` once per created logger.
    pub fn new(make_writer: F) -> Self {
        Self {
            make_writer,
            filter: LevelFilter::default(),
            line_mode: LineMode::default(),
        }
    }

    /// Sets the threshold given to created loggers.
    pub fn with_filter(mut self, filter: LevelFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the newline policy given to created loggers.
    pub fn with_line_mode(mut self, line_mode: LineMode) -> Self {
        self.line_mode = line_mode;
        self
    }
}

impl WriterLoggerFactory<fn() -> io::Stderr> {
    /// Creates a factory whose loggers write to standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr as fn() -> io::Stderr)
    }
}

impl<F, W> LoggerFactory for WriterLoggerFactory<F>
where
    F: Fn() -> W,
    W: Write + Send + 'static,
{
    type Logger = WriterLogger<W>;

    fn create(&self, name: &str) -> WriterLogger<W> {
        WriterLogger::new(name, (self.make_writer)())
            .with_filter(self.filter)
            .with_line_mode(self.line_mode)
    }
}

impl<F> fmt::Debug for WriterLoggerFactory<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterLoggerFactory")
            .field("filter", &self.filter)
            .field("line_mode", &self.line_mode)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::LoggerExt;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer {
        bytes: Arc<Mutex<Vec<u8>>>,
        flushes: Arc<Mutex<usize>>,
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.bytes.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            *self.flushes.lock().unwrap() += 1;
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::other("pipe closed"))
        }
    }

    #[test]
    fn renders_name_level_message_and_error() {
        let buffer = SharedBuffer::default();
        let logger = WriterLogger::new("storage", buffer.clone());
        let failure = io::Error::other("timeout");

        logger.warn("disk {disk} at {pct}%", &[&"sda", &91]);
        logger.with_error(&failure).error("flush failed", &[]);

        assert_eq!(
            buffer.contents(),
            "[storage] warning: disk sda at 91%\n[storage] error: flush failed: timeout\n"
        );
    }

    #[test]
    fn filter_gates_is_enabled_and_log() {
        let buffer = SharedBuffer::default();
        let logger = WriterLogger::new("", buffer.clone()).with_filter(Level::Error.into());

        assert!(!logger.is_enabled(Level::Warning));
        logger.log(Level::Warning, None, "direct call", &[]);
        logger.critical("halt", &[]);

        assert_eq!(buffer.contents(), "critical: halt\n");
    }

    #[test]
    fn without_newline_concatenates_events() {
        let buffer = SharedBuffer::default();
        let logger = WriterLogger::new("p", buffer.clone()).with_line_mode(LineMode::WithoutNewline);
        logger.info("a", &[]);
        logger.info("b", &[]);
        assert_eq!(buffer.contents(), "[p] information: a[p] information: b");
    }

    #[test]
    fn write_failures_are_swallowed() {
        let logger = WriterLogger::new("broken", Broken);
        logger.error("nobody hears this", &[]);
        drop(logger);
    }

    #[test]
    fn drop_flushes_writer() {
        let buffer = SharedBuffer::default();
        let logger = WriterLogger::new("f", buffer.clone());
        drop(logger);
        assert_eq!(*buffer.flushes.lock().unwrap(), 1);
    }

    #[test]
    fn factory_applies_settings_to_each_logger() {
        let buffer = SharedBuffer::default();
        let shared = buffer.clone();
        let factory = WriterLoggerFactory::new(move || shared.clone())
            .with_filter(LevelFilter::ALL)
            .with_line_mode(LineMode::WithNewline);

        factory.create("one").trace("first", &[]);
        factory.create("two").trace("second", &[]);

        assert_eq!(
            buffer.contents(),
            "[one] trace: first\n[two] trace: second\n"
        );
    }

    #[test]
    fn debug_omits_writer() {
        let logger = WriterLogger::new("dbg", Vec::new());
        let debug = format!("{logger:?}");
        assert!(debug.contains("WriterLogger"));
        assert!(debug.contains("dbg"));
    }
}
