//! Bootstrap sequencing: run providers, then caller code.

use tracing::debug;

use crate::error::DiResult;
use crate::provider::{DefaultProvider, Provider};
use crate::registry::Registry;

/// Composition root that owns a [`Registry`] while it is being populated.
///
/// [`run`](App::run) sets up every provider in insertion order, or only the
/// [`DefaultProvider`] when none was added, then calls the supplied closure
/// with the populated registry.
///
/// # Examples
///
/// ```
/// use autowire_di::{App, Definition, DiResult, Registry, Resolver, SystemClock};
///
/// # fn main() -> DiResult<()> {
/// // No providers: the default one registers a clock.
/// let timestamp = App::new().run(|registry| {
///     registry.get_service::<SystemClock>().map(|clock| clock.unix_timestamp())
/// })??;
/// assert!(timestamp > 0);
///
/// let greeting = App::new()
///     .with_provider(|r: &Registry| -> DiResult<()> {
///         r.register("greeting", Definition::instance("hi".to_string()));
///         Ok(())
///     })
///     .run(|registry| registry.get_required::<String>("greeting"))?;
/// assert_eq!(*greeting, "hi");
/// # Ok(())
/// # }
/// ```
pub struct App {
    registry: Registry,
    providers: Vec<Box<dyn Provider>>,
}

impl App {
    /// Creates an app around a fresh registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::new())
    }

    /// Creates an app around an existing registry.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            providers: Vec::new(),
        }
    }

    /// Queues a provider. Providers run in the order they were added.
    pub fn with_provider<P: Provider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Runs the providers, then `f` with the populated registry.
    ///
    /// The first provider error stops the sequence and is returned; `f` is not
    /// called in that case.
    pub fn run<R, F>(self, f: F) -> DiResult<R>
    where
        F: FnOnce(&Registry) -> R,
    {
        let registry = self.boot()?;
        Ok(f(&registry))
    }

    /// Runs the providers and hands back the populated registry.
    pub fn boot(self) -> DiResult<Registry> {
        if self.providers.is_empty() {
            debug!("no providers supplied, using the default provider");
            DefaultProvider.setup(&self.registry)?;
        } else {
            for (index, provider) in self.providers.iter().enumerate() {
                debug!(index, "setting up provider");
                provider.setup(&self.registry)?;
            }
        }
        Ok(self.registry)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
