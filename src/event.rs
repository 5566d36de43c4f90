//! Change notification and the debug log callback.
//!
//! Index renderers cache resolved line styles, so every mutation of an
//! index-family rule set is announced as a [`StyleEvent`] through the
//! engine's [`Notifier`]. Events are fire-and-forget: observers are called
//! synchronously and no acknowledgement is awaited.
//!
//! The log callback is process-global, mirroring how the embedding
//! application wires its debug output once at startup.

use std::fmt;
use std::sync::{Mutex, OnceLock};

use crate::region::Region;

/// Log level for debug callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// What changed in a rule set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleEventKind {
    /// A region's rule set gained a rule or had one restyled.
    StyleSetChanged,
}

/// Notification published when an index-family rule set changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StyleEvent {
    pub kind: StyleEventKind,
    /// The region whose rule set was mutated.
    pub region: Region,
}

impl StyleEvent {
    /// Event announcing a change to `region`'s rule set.
    #[must_use]
    pub const fn style_set_changed(region: Region) -> Self {
        Self {
            kind: StyleEventKind::StyleSetChanged,
            region,
        }
    }
}

type EventCallback = Box<dyn Fn(&StyleEvent)>;
type LogCallback = Box<dyn Fn(LogLevel, &str) + Send + Sync + 'static>;

/// Observer registry for rule-set change events.
///
/// Owned by the [`RuleEngine`](crate::engine::RuleEngine); observers run
/// on the calling thread, in registration order.
#[derive(Default)]
pub struct Notifier {
    subscribers: Vec<EventCallback>,
}

impl Notifier {
    /// Notifier with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&StyleEvent) + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Publish an event to every observer.
    pub fn send(&self, event: &StyleEvent) {
        for callback in &self.subscribers {
            callback(event);
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

fn log_callback() -> &'static Mutex<Option<LogCallback>> {
    static CALLBACK: OnceLock<Mutex<Option<LogCallback>>> = OnceLock::new();
    CALLBACK.get_or_init(|| Mutex::new(None))
}

/// Set the global log callback.
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    let mut guard = log_callback().lock().expect("log callback lock");
    *guard = Some(Box::new(callback));
}

/// Emit a log message to the registered callback, if any.
pub fn emit_log(level: LogLevel, message: &str) {
    if let Ok(guard) = log_callback().lock() {
        if let Some(callback) = guard.as_ref() {
            callback(level, message);
        }
    }
}
