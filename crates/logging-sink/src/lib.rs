#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `logging-sink` provides [`logging::Logger`] backends that own an external
//! resource: a text stream ([`WriterLogger`]) and, on unix, the process
//! syslog connection ([`syslog::SyslogLogger`]). Each backend comes with a
//! [`logging::LoggerFactory`] so a composition root can create loggers by
//! name and install them into a [`logging::Dispatcher`].
//!
//! # Design
//!
//! Resources are released through `Drop`. When a dispatcher replaces or
//! closes its logger, the old logger is dropped exactly once: a
//! [`WriterLogger`] flushes its writer and a syslog logger closes the
//! connection when no other logger shares it.
//!
//! Neither backend reports I/O failures to the caller. Logging is a side
//! channel; a failed write must not turn into a failed operation.
//!
//! # Examples
//!
//! ```
//! use logging::{Level, LevelFilter, LoggerFactory, info};
//! use logging_sink::{LineMode, WriterLoggerFactory};
//!
//! let factory = WriterLoggerFactory::new(std::io::sink)
//!     .with_filter(LevelFilter::AtLeast(Level::Debug))
//!     .with_line_mode(LineMode::WithNewline);
//!
//! logging::open(Some(factory.create_shared("worker")));
//! info!(logging::global(), "job {0} finished in {1} ms", 17, 250);
//! logging::close();
//! ```

#[cfg(unix)]
pub mod syslog;
mod writer;

pub use writer::{LineMode, WriterLogger, WriterLoggerFactory};
