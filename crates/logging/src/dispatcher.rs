//! crates/logging/src/dispatcher.rs
//! Hot-swappable logger slot and the process-wide instance.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use crate::dispatch::{LoggerExt, WithError};
use crate::level::Level;
use crate::logger::{Argument, Failure, Logger};
use crate::null::NullLogger;

/// Whether a [`Dispatcher`] currently holds a caller-supplied logger.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DispatcherState {
    /// The slot holds a [`NullLogger`]; every level is disabled.
    Closed,
    /// The slot holds a logger installed through [`Dispatcher::open`].
    Open,
}

struct Slot {
    logger: Arc<dyn Logger>,
    state: DispatcherState,
}

impl Slot {
    fn closed() -> Self {
        Self {
            logger: Arc::new(NullLogger),
            state: DispatcherState::Closed,
        }
    }
}

/// Holder of the active logger.
///
/// The slot always contains a valid logger: a [`NullLogger`] until
/// [`open`](Self::open) installs another one, and again after
/// [`close`](Self::close). Replacing the logger is a single exchange under a
/// write lock, so a concurrent reader observes either the old or the new
/// logger in full. Readers take the lock only long enough to clone the
/// current `Arc`; no lock is held while a backend runs.
///
/// The outgoing logger is dropped once the slot no longer references it.
/// Backends that own resources release them in their `Drop` implementation,
/// which therefore runs exactly once: immediately after the exchange, or when
/// the last in-flight call that cloned it returns.
///
/// A `Dispatcher` is itself a [`Logger`]. Each call reads the slot afresh, so
/// a swap between a dispatch's `is_enabled` check and its `log` call may route
/// the two calls to different loggers; each call on its own sees one whole
/// logger.
///
/// # Examples
///
/// ```
/// use logging::{Dispatcher, DispatcherState, Level, LoggerExt, NullLogger};
///
/// let dispatcher = Dispatcher::new();
/// assert_eq!(dispatcher.state(), DispatcherState::Closed);
/// assert!(!dispatcher.is_enabled(Level::Critical));
///
/// dispatcher.install(NullLogger);
/// assert_eq!(dispatcher.state(), DispatcherState::Open);
/// dispatcher.warn("disk at {0}%", &[&95]);
///
/// dispatcher.close();
/// assert_eq!(dispatcher.state(), DispatcherState::Closed);
/// ```
pub struct Dispatcher {
    slot: RwLock<Slot>,
}

impl Dispatcher {
    /// Creates a closed dispatcher holding a [`NullLogger`].
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::closed()),
        }
    }

    /// Creates a dispatcher that is already open with `logger`.
    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self {
            slot: RwLock::new(Slot {
                logger,
                state: DispatcherState::Open,
            }),
        }
    }

    /// Installs `logger`, releasing the previous one.
    ///
    /// `None` leaves the dispatcher untouched; it is not an error.
    pub fn open(&self, logger: Option<Arc<dyn Logger>>) {
        let Some(logger) = logger else {
            return;
        };
        self.exchange(Slot {
            logger,
            state: DispatcherState::Open,
        });
    }

    /// Installs an owned logger, releasing the previous one.
    pub fn install<L>(&self, logger: L)
    where
        L: Logger + 'static,
    {
        self.open(Some(Arc::new(logger)));
    }

    /// Reinstalls a [`NullLogger`], releasing the previous logger.
    ///
    /// Closing an already closed dispatcher has no observable effect.
    pub fn close(&self) {
        self.exchange(Slot::closed());
    }

    /// Reports whether the dispatcher is open or closed.
    pub fn state(&self) -> DispatcherState {
        self.read_slot(|slot| slot.state)
    }

    /// Returns the logger currently installed.
    pub fn current(&self) -> Arc<dyn Logger> {
        self.read_slot(|slot| Arc::clone(&slot.logger))
    }

    /// Reports whether the installed logger records events at `level`.
    pub fn is_enabled(&self, level: Level) -> bool {
        self.current().is_enabled(level)
    }

    fn exchange(&self, replacement: Slot) {
        let previous = {
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *slot, replacement)
        };
        // The write guard is gone before the old logger drops, so a backend
        // whose Drop logs through this dispatcher cannot deadlock.
        drop(previous);
    }

    fn read_slot<T>(&self, f: impl FnOnce(&Slot) -> T) -> T {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        f(&slot)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Logger for Dispatcher {
    fn is_enabled(&self, level: Level) -> bool {
        Self::is_enabled(self, level)
    }

    fn log(
        &self,
        level: Level,
        error: Option<Failure<'_>>,
        template: &str,
        arguments: &[Argument<'_>],
    ) {
        self.current().log(level, error, template, arguments);
    }
}

/// Returns the process-wide dispatcher.
///
/// The dispatcher starts closed, so logging before any [`open`] is silently
/// discarded.
pub fn global() -> &'static Dispatcher {
    static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();
    GLOBAL.get_or_init(Dispatcher::new)
}

/// Returns the process-wide dispatcher tagged with the type `T`.
///
/// Every tag owns an independent slot, so components can open, close and
/// query their own logger without touching anyone else's. A tag's dispatcher
/// starts closed and lives for the rest of the process. [`global()`] is not
/// any tag's dispatcher.
///
/// The lookup takes a lock; keep the returned reference rather than calling
/// this on every event.
///
/// ```
/// use logging::{global_for, DispatcherState, NullLogger};
///
/// struct Billing;
/// struct Search;
///
/// global_for::<Billing>().install(NullLogger);
/// assert_eq!(global_for::<Billing>().state(), DispatcherState::Open);
/// assert_eq!(global_for::<Search>().state(), DispatcherState::Closed);
/// ```
pub fn global_for<T>() -> &'static Dispatcher
where
    T: ?Sized + 'static,
{
    static TAGGED: OnceLock<Mutex<HashMap<TypeId, &'static Dispatcher>>> = OnceLock::new();
    let mut tagged = TAGGED
        .get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    *tagged
        .entry(TypeId::of::<T>())
        .or_insert_with(|| -> &'static Dispatcher { Box::leak(Box::new(Dispatcher::new())) })
}

/// Installs `logger` into the process-wide dispatcher.
///
/// `None` is ignored and keeps the current logger.
pub fn open(logger: Option<Arc<dyn Logger>>) {
    global().open(logger);
}

/// Installs an owned logger into the process-wide dispatcher.
pub fn install<L>(logger: L)
where
    L: Logger + 'static,
{
    global().install(logger);
}

/// Closes the process-wide dispatcher, releasing its logger.
pub fn close() {
    global().close();
}

/// Reports whether the process-wide logger records events at `level`.
pub fn is_enabled(level: Level) -> bool {
    global().is_enabled(level)
}

/// Logs at [`Level::Trace`] through the process-wide dispatcher.
pub fn trace(template: &str, arguments: &[Argument<'_>]) {
    global().trace(template, arguments);
}

/// Logs at [`Level::Debug`] through the process-wide dispatcher.
pub fn debug(template: &str, arguments: &[Argument<'_>]) {
    global().debug(template, arguments);
}

/// Logs at [`Level::Information`] through the process-wide dispatcher.
pub fn info(template: &str, arguments: &[Argument<'_>]) {
    global().info(template, arguments);
}

/// Logs at [`Level::Warning`] through the process-wide dispatcher.
pub fn warn(template: &str, arguments: &[Argument<'_>]) {
    global().warn(template, arguments);
}

/// Logs at [`Level::Error`] through the process-wide dispatcher.
pub fn error(template: &str, arguments: &[Argument<'_>]) {
    global().error(template, arguments);
}

/// Logs at [`Level::Critical`] through the process-wide dispatcher.
pub fn critical(template: &str, arguments: &[Argument<'_>]) {
    global().critical(template, arguments);
}

/// Attaches `error` to events logged through the process-wide dispatcher.
pub fn with_error(error: Failure<'_>) -> WithError<'_, Dispatcher> {
    global().with_error(error)
}
