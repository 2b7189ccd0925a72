//! Diagnostic observers for dependency injection traceability.
//!
//! Observers are notified for every resolution, including nested parameter
//! resolutions and singleton cache hits, which makes them the natural place
//! to trace how an object graph was assembled.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for dependency injection resolution events.
///
/// Observer calls are made synchronously during resolution. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{DiError, DiObserver, Key, ServiceCollection};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct PrintObserver;
///
/// impl DiObserver for PrintObserver {
///     fn resolving(&self, key: &Key) {
///         println!("Resolving: {}", key.display_name());
///     }
///
///     fn resolved(&self, key: &Key, duration: Duration) {
///         println!("Resolved: {} in {:?}", key.display_name(), duration);
///     }
///
///     fn resolution_failed(&self, key: &Key, error: &DiError) {
///         println!("Failed: {}: {}", key.display_name(), error);
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(PrintObserver));
/// let provider = services.build().unwrap();
/// ```
pub trait DiObserver: Send + Sync {
    /// Called when starting to resolve a service.
    fn resolving(&self, key: &Key);

    /// Called when a service is successfully resolved.
    ///
    /// `duration` covers the whole resolution, nested dependencies included.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when resolving a service fails.
    ///
    /// A failure deep in the graph is reported once per enclosing resolution
    /// as it propagates outwards.
    fn resolution_failed(&self, key: &Key, error: &DiError);
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn DiObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn DiObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(key, error);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Resolutions are logged at `debug`, failures at `warn`. Install a
/// subscriber (for example `tracing-subscriber`) to see them.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ServiceCollection, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(LoggingObserver::new()));
/// let provider = services.build().unwrap();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-inject".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(prefix = %self.prefix, service = key.display_name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(
            prefix = %self.prefix,
            service = key.display_name(),
            elapsed = ?duration,
            "resolved"
        );
    }

    fn resolution_failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, service = key.display_name(), error = %error, "resolution failed");
    }
}

/// A single recorded resolution event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionEvent {
    Resolving(&'static str),
    Resolved(&'static str),
    Failed(&'static str),
}

/// Observer that records every event in order.
///
/// Handy in tests for asserting the exact shape of a resolution.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{RecordingObserver, ResolutionEvent, ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// let recorder = Arc::new(RecordingObserver::new());
/// let mut services = ServiceCollection::new();
/// services.add_instance(7u8).add_observer(recorder.clone());
///
/// let provider = services.build().unwrap();
/// provider.get_required::<u8>();
/// assert_eq!(
///     recorder.events(),
///     vec![ResolutionEvent::Resolving("u8"), ResolutionEvent::Resolved("u8")]
/// );
/// ```
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ResolutionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<ResolutionEvent> {
        self.lock().clone()
    }

    /// Number of `resolving` notifications, i.e. lookups performed.
    pub fn lookups(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| matches!(e, ResolutionEvent::Resolving(_)))
            .count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ResolutionEvent>> {
        self.events.lock()
    }
}

impl DiObserver for RecordingObserver {
    fn resolving(&self, key: &Key) {
        self.lock().push(ResolutionEvent::Resolving(key.display_name()));
    }

    fn resolved(&self, key: &Key, _duration: Duration) {
        self.lock().push(ResolutionEvent::Resolved(key.display_name()));
    }

    fn resolution_failed(&self, key: &Key, _error: &DiError) {
        self.lock().push(ResolutionEvent::Failed(key.display_name()));
    }
}
