//! crates/logging-sink/src/syslog.rs
//! syslog(3) backend.
//!
//! Uses libc `openlog`/`syslog`/`closelog` directly. A [`SyslogGuard`] owns
//! an open connection and closes it on drop; a [`SyslogLogger`] keeps the
//! guard alive, so releasing the logger from a dispatcher closes the
//! connection.
//!
//! The syslog connection is process-global. Opening a new connection replaces
//! the previous one, and only the most recently opened guard calls
//! `closelog` when dropped, so replacing one syslog logger with another never
//! tears down the newer connection.

#![allow(unsafe_code)]

use std::ffi::CString;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use logging::{
    Argument, Failure, Level, LevelFilter, LevelMap, Logger, LoggerFactory, MessageTemplate,
};

/// Syslog facility codes matching the POSIX syslog(3) constants.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogFacility {
    /// Kernel messages (LOG_KERN).
    Kern = libc::LOG_KERN,
    /// User-level messages (LOG_USER).
    #[default]
    User = libc::LOG_USER,
    /// Mail system (LOG_MAIL).
    Mail = libc::LOG_MAIL,
    /// System daemons (LOG_DAEMON).
    Daemon = libc::LOG_DAEMON,
    /// Security/authorization messages (LOG_AUTH).
    Auth = libc::LOG_AUTH,
    /// Messages generated internally by syslogd (LOG_SYSLOG).
    Syslog = libc::LOG_SYSLOG,
    /// Line printer subsystem (LOG_LPR).
    Lpr = libc::LOG_LPR,
    /// Network news subsystem (LOG_NEWS).
    News = libc::LOG_NEWS,
    /// UUCP subsystem (LOG_UUCP).
    Uucp = libc::LOG_UUCP,
    /// Clock daemon (LOG_CRON).
    Cron = libc::LOG_CRON,
    /// Reserved for local use (LOG_LOCAL0).
    Local0 = libc::LOG_LOCAL0,
    /// Reserved for local use (LOG_LOCAL1).
    Local1 = libc::LOG_LOCAL1,
    /// Reserved for local use (LOG_LOCAL2).
    Local2 = libc::LOG_LOCAL2,
    /// Reserved for local use (LOG_LOCAL3).
    Local3 = libc::LOG_LOCAL3,
    /// Reserved for local use (LOG_LOCAL4).
    Local4 = libc::LOG_LOCAL4,
    /// Reserved for local use (LOG_LOCAL5).
    Local5 = libc::LOG_LOCAL5,
    /// Reserved for local use (LOG_LOCAL6).
    Local6 = libc::LOG_LOCAL6,
    /// Reserved for local use (LOG_LOCAL7).
    Local7 = libc::LOG_LOCAL7,
}

impl SyslogFacility {
    /// Every facility, in `<syslog.h>` order.
    pub const ALL: [Self; 18] = [
        Self::Kern,
        Self::User,
        Self::Mail,
        Self::Daemon,
        Self::Auth,
        Self::Syslog,
        Self::Lpr,
        Self::News,
        Self::Uucp,
        Self::Cron,
        Self::Local0,
        Self::Local1,
        Self::Local2,
        Self::Local3,
        Self::Local4,
        Self::Local5,
        Self::Local6,
        Self::Local7,
    ];

    /// Parses a facility name, case-insensitively.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging_sink::syslog::SyslogFacility;
    ///
    /// assert_eq!(SyslogFacility::from_name("LOCAL3"), Some(SyslogFacility::Local3));
    /// assert_eq!(SyslogFacility::from_name("unknown"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|facility| facility.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// Returns the conventional lowercase facility name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kern => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Lpr => "lpr",
            Self::News => "news",
            Self::Uucp => "uucp",
            Self::Cron => "cron",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }
}

impl fmt::Display for SyslogFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syslog severities matching the POSIX syslog(3) constants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(i32)]
pub enum SyslogPriority {
    /// System is unusable (LOG_EMERG).
    Emergency = libc::LOG_EMERG,
    /// Action must be taken immediately (LOG_ALERT).
    Alert = libc::LOG_ALERT,
    /// Critical conditions (LOG_CRIT).
    Critical = libc::LOG_CRIT,
    /// Error conditions (LOG_ERR).
    Error = libc::LOG_ERR,
    /// Warning conditions (LOG_WARNING).
    Warning = libc::LOG_WARNING,
    /// Normal but significant condition (LOG_NOTICE).
    Notice = libc::LOG_NOTICE,
    /// Informational messages (LOG_INFO).
    Info = libc::LOG_INFO,
    /// Debug-level messages (LOG_DEBUG).
    Debug = libc::LOG_DEBUG,
}

/// Level table used by [`SyslogLogger`] unless overridden.
///
/// syslog has no trace severity, so [`Level::Trace`] shares `LOG_DEBUG`.
pub fn default_syslog_priorities() -> LevelMap<SyslogPriority> {
    LevelMap::from_fn(|level| match level {
        Level::Trace | Level::Debug => SyslogPriority::Debug,
        Level::Information => SyslogPriority::Info,
        Level::Warning => SyslogPriority::Warning,
        Level::Error => SyslogPriority::Error,
        Level::Critical => SyslogPriority::Critical,
    })
}

/// Ident used when none is configured or the configured one contains NUL.
pub const DEFAULT_SYSLOG_TAG: &str = "logging";

/// Connection parameters and threshold for a syslog backend.
///
/// # Examples
///
/// ```
/// use logging::{Level, LevelFilter};
/// use logging_sink::syslog::{SyslogConfig, SyslogFacility};
///
/// let config = SyslogConfig::new(SyslogFacility::Local5, "my-daemon")
///     .with_filter(LevelFilter::AtLeast(Level::Warning));
/// assert_eq!(config.facility(), SyslogFacility::Local5);
/// assert_eq!(config.tag(), "my-daemon");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyslogConfig {
    facility: SyslogFacility,
    tag: String,
    filter: LevelFilter,
}

impl SyslogConfig {
    /// Creates a configuration with the default threshold.
    pub fn new(facility: SyslogFacility, tag: impl Into<String>) -> Self {
        Self {
            facility,
            tag: tag.into(),
            filter: LevelFilter::default(),
        }
    }

    /// Replaces the level threshold.
    pub fn with_filter(mut self, filter: LevelFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Returns the facility.
    pub const fn facility(&self) -> SyslogFacility {
        self.facility
    }

    /// Returns the ident string.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the level threshold.
    pub const fn filter(&self) -> LevelFilter {
        self.filter
    }

    /// Opens the process syslog connection with this facility and tag.
    ///
    /// The returned guard closes the connection when dropped, unless another
    /// connection has been opened since.
    pub fn open(&self) -> SyslogGuard {
        let ident = CString::new(self.tag.as_str())
            .or_else(|_| CString::new(DEFAULT_SYSLOG_TAG))
            .unwrap_or_default();

        let mut active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
        *active += 1;
        // SAFETY: the ident pointer stays valid while this guard lives; the
        // guard owns the CString and drops it only after closelog or after a
        // newer openlog has replaced the ident. ACTIVE serialises
        // openlog/closelog.
        unsafe {
            libc::openlog(ident.as_ptr(), libc::LOG_PID, self.facility as libc::c_int);
        }

        SyslogGuard {
            generation: *active,
            ident,
        }
    }
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self::new(SyslogFacility::default(), DEFAULT_SYSLOG_TAG)
    }
}

/// Generation of the most recent `openlog`; 0 once closed.
static ACTIVE: Mutex<u64> = Mutex::new(0);

/// An open syslog connection, closed on drop.
#[derive(Debug)]
pub struct SyslogGuard {
    generation: u64,
    ident: CString,
}

impl SyslogGuard {
    /// Returns the ident the connection was opened with.
    pub fn ident(&self) -> &str {
        self.ident.to_str().unwrap_or(DEFAULT_SYSLOG_TAG)
    }

    /// Reports whether this guard holds the connection currently in effect.
    pub fn is_current(&self) -> bool {
        *ACTIVE.lock().unwrap_or_else(PoisonError::into_inner) == self.generation
    }
}

impl Drop for SyslogGuard {
    fn drop(&mut self) {
        let mut active = ACTIVE.lock().unwrap_or_else(PoisonError::into_inner);
        if *active == self.generation {
            // SAFETY: closelog has no preconditions; ACTIVE serialises it
            // against openlog.
            unsafe {
                libc::closelog();
            }
            *active = 0;
        }
    }
}

/// Sends `message` to syslog(3) at `priority`.
///
/// Embedded NUL bytes, which C strings cannot carry, are replaced with
/// spaces.
pub fn syslog_message(priority: SyslogPriority, message: &str) {
    let Ok(message) = CString::new(message).or_else(|_| CString::new(message.replace('\0', " ")))
    else {
        return;
    };

    // SAFETY: both arguments are valid NUL-terminated strings; "%s" keeps
    // `%` in the message from being read as a conversion.
    unsafe {
        libc::syslog(priority as libc::c_int, c"%s".as_ptr(), message.as_ptr());
    }
}

/// Logger forwarding events to syslog(3).
///
/// Holds a shared [`SyslogGuard`]; the connection closes when the last logger
/// using it is dropped. Messages are the rendered template, prefixed with
/// `name: ` when the logger has a name and suffixed with `: error` when a
/// failure is attached.
pub struct SyslogLogger {
    name: String,
    filter: LevelFilter,
    priorities: LevelMap<SyslogPriority>,
    guard: Arc<SyslogGuard>,
}

impl SyslogLogger {
    /// Opens a connection from `config` and returns an unnamed logger on it.
    pub fn open(config: &SyslogConfig) -> Self {
        Self::on_connection("", config.filter(), Arc::new(config.open()))
    }

    fn on_connection(name: &str, filter: LevelFilter, guard: Arc<SyslogGuard>) -> Self {
        Self {
            name: name.to_owned(),
            filter,
            priorities: default_syslog_priorities(),
            guard,
        }
    }

    /// Replaces the level translation.
    pub fn with_priorities(mut self, priorities: LevelMap<SyslogPriority>) -> Self {
        self.priorities = priorities;
        self
    }

    /// Returns the contextual name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the syslog severity `level` is sent at.
    pub fn priority(&self, level: Level) -> SyslogPriority {
        self.priorities.lookup(level)
    }

    /// Returns the connection this logger writes through.
    pub fn guard(&self) -> &SyslogGuard {
        &self.guard
    }

    fn render(
        &self,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) -> String {
        let mut message = String::new();
        if !self.name.is_empty() {
            message.push_str(&self.name);
            message.push_str(": ");
        }
        message.push_str(&MessageTemplate::parse(template).render(arguments));
        if let Some(error) = error {
            message.push_str(": ");
            message.push_str(&error.to_string());
        }
        message
    }
}

impl Logger for SyslogLogger {
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
        syslog_message(self.priority(level), &self.render(error, template, arguments));
    }
}

impl fmt::Debug for SyslogLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyslogLogger")
            .field("name", &self.name)
            .field("filter", &self.filter)
            .field("ident", &self.guard.ident())
            .finish_non_exhaustive()
    }
}

/// Factory creating named [`SyslogLogger`]s that share one connection.
///
/// The connection is opened by the first `create` and reopened by a later
/// `create` once every logger using it has been dropped.
#[derive(Debug)]
pub struct SyslogLoggerFactory {
    config: SyslogConfig,
    connection: Mutex<Weak<SyslogGuard>>,
}

impl SyslogLoggerFactory {
    /// Creates a factory for `config`. No connection is opened yet.
    pub fn new(config: SyslogConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(Weak::new()),
        }
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &SyslogConfig {
        &self.config
    }

    fn connection(&self) -> Arc<SyslogGuard> {
        let mut connection = self
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(guard) = connection.upgrade() {
            return guard;
        }
        let guard = Arc::new(self.config.open());
        *connection = Arc::downgrade(&guard);
        guard
    }
}

impl LoggerFactory for SyslogLoggerFactory {
    type Logger = SyslogLogger;

    fn create(&self, name: &str) -> SyslogLogger {
        SyslogLogger::on_connection(name, self.config.filter(), self.connection())
    }
}
