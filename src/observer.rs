//! Diagnostic observers for resolution events.
//!
//! Observers see every build the registry performs: a `resolving` call before
//! the factory or constructor runs, then either `resolved` or `failed`. Cache
//! hits are not reported.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::ServiceName;

/// Observer trait for registry resolution events.
///
/// Calls are made synchronously on the resolving thread. Keep implementations
/// lightweight. No registry lock is held during a call, so an observer may
/// resolve services or add further observers; those see builds that start
/// after they were added.
///
/// # Examples
///
/// ```
/// use autowire_di::{Definition, DiError, Registry, RegistryObserver, Resolver, ServiceName};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl RegistryObserver for Recorder {
///     fn resolving(&self, name: &ServiceName) {
///         self.0.lock().unwrap().push(format!("start {}", name));
///     }
///     fn resolved(&self, name: &ServiceName, _: Duration) {
///         self.0.lock().unwrap().push(format!("done {}", name));
///     }
///     fn failed(&self, name: &ServiceName, _: &DiError) {
///         self.0.lock().unwrap().push(format!("fail {}", name));
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let registry = Registry::new();
/// registry.add_observer(recorder.clone());
/// registry.register("port", Definition::instance(8080u16));
///
/// registry.get::<u16>("port").unwrap();
/// registry.get::<u16>("port").unwrap(); // cache hit, not observed
/// assert_eq!(*recorder.0.lock().unwrap(), ["start port", "done port"]);
/// ```
pub trait RegistryObserver: Send + Sync {
    /// Called before a factory or constructor runs for `name`.
    fn resolving(&self, name: &ServiceName);

    /// Called after `name` was built and cached.
    fn resolved(&self, name: &ServiceName, duration: Duration);

    /// Called when building `name` failed. The error still propagates.
    fn failed(&self, name: &ServiceName, error: &DiError);
}

/// Container for registered observers.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, name: &ServiceName) {
        for observer in &self.observers {
            observer.resolving(name);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, name: &ServiceName, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(name, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, name: &ServiceName, error: &DiError) {
        for observer in &self.observers {
            observer.failed(name, error);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Successful builds are logged at `DEBUG`, failures at `WARN`, under the
/// `autowire_di::observer` target. No subscriber is installed by this crate.
///
/// # Examples
///
/// ```
/// use autowire_di::{Registry, TracingObserver};
/// use std::sync::Arc;
///
/// let registry = Registry::new();
/// registry.add_observer(Arc::new(TracingObserver::new()));
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    /// Creates an observer with the default label.
    pub fn new() -> Self {
        Self::with_label("autowire-di")
    }

    /// Creates an observer whose events carry `label`, useful when several
    /// registries log to the same subscriber.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    /// Label attached to every event.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryObserver for TracingObserver {
    fn resolving(&self, name: &ServiceName) {
        tracing::trace!(label = %self.label, service = %name, "resolving");
    }

    fn resolved(&self, name: &ServiceName, duration: Duration) {
        tracing::debug!(label = %self.label, service = %name, ?duration, "resolved");
    }

    fn failed(&self, name: &ServiceName, error: &DiError) {
        tracing::warn!(label = %self.label, service = %name, %error, "resolution failed");
    }
}
