#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` is a structured logging facade. Application code logs against
//! the [`Logger`] capability using one of six [`Level`]s, a message template
//! and a slice of arguments; the concrete backend is chosen once, by the host
//! application, and can be replaced at runtime.
//!
//! # Design
//!
//! - [`Logger`] is the capability every backend implements: an enabled check
//!   and a single `log` entry point receiving the level, an optional failure,
//!   the template and the arguments.
//! - [`LoggerExt`] adds `trace`..`critical` and [`with_error`](LoggerExt::with_error)
//!   to every logger. Each operation checks [`Logger::is_enabled`] once and
//!   returns before touching the backend when the level is disabled.
//! - The [`trace!`]..[`critical!`] macros go one step further and evaluate
//!   their argument expressions only after the check has passed.
//! - [`Dispatcher`] holds the active logger behind an atomic swap. The
//!   process-wide instance returned by [`global()`] starts closed with a
//!   [`NullLogger`], so logging before configuration is safe and silent.
//!   [`global_for`] hands out further process-wide dispatchers keyed by a
//!   type, each with its own lifecycle.
//! - [`LoggerFactory`] creates loggers from a contextual name. Backends ship
//!   one each: [`TracingLoggerFactory`] and [`LogCrateLoggerFactory`] here,
//!   syslog and writer sinks in the `logging-sink` crate.
//!
//! # Invariants
//!
//! - A disabled level costs one `is_enabled` call; `log` is never reached.
//! - An enabled level reaches `log` exactly once with the template and the
//!   arguments unchanged and in order.
//! - The global slot always holds a valid logger. [`open`] with `None` is
//!   ignored, [`close`] is idempotent, and each replaced logger is dropped
//!   exactly once.
//! - Level translation into a backend vocabulary is total: every adapter
//!   stores a [`LevelMap`], and raw values from outside the facade are
//!   rejected with a [`LevelError`].
//!
//! # Examples
//!
//! Install a logger process-wide and log through it:
//!
//! ```
//! use logging::{Level, LoggerFactory, NullLoggerFactory};
//!
//! assert!(!logging::is_enabled(Level::Error));
//!
//! logging::open(Some(NullLoggerFactory.create_shared("app")));
//! logging::warn("cache miss for {key}", &[&"user:42"]);
//! logging::info!(logging::global(), "served {0} requests", 1200);
//!
//! logging::close();
//! logging::close();
//! ```
//!
//! # Features
//!
//! - `tracing` (default): [`TracingLogger`] and [`init_tracing`].
//! - `log` (default): [`LogCrateLogger`].
//! - `serde`: `Serialize`/`Deserialize` for [`Level`] and [`LevelFilter`].

#[macro_use]
mod macros;

mod dispatch;
mod dispatcher;
mod error;
mod factory;
mod filter;
mod level;
mod level_map;
#[cfg(feature = "log")]
mod log_bridge;
mod logger;
mod null;
mod template;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use dispatch::{LoggerExt, WithError};
pub use dispatcher::{
    Dispatcher, DispatcherState, close, critical, debug, error, global, global_for, info,
    install, is_enabled, open, trace, warn, with_error,
};
pub use error::LevelError;
pub use factory::LoggerFactory;
pub use filter::{FilteredLogger, LevelFilter};
pub use level::Level;
pub use level_map::LevelMap;
#[cfg(feature = "log")]
pub use log_bridge::{LogCrateLogger, LogCrateLoggerFactory, default_log_levels};
pub use logger::{Argument, Failure, Logger};
pub use null::{NullLogger, NullLoggerFactory};
pub use template::{Capture, Hole, MessageTemplate, Token, render};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{TracingLogger, TracingLoggerFactory, default_tracing_levels, init_tracing};
