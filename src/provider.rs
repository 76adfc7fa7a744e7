//! Setup collaborators that populate a registry.
//!
//! A provider groups the registrations of one part of an application. It only
//! registers; resolving inside `setup` is allowed but defeats the point of
//! deferring construction.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::DiResult;
use crate::key::name_of;
use crate::registration::Definition;
use crate::registry::Registry;

/// A unit that registers services with a [`Registry`].
///
/// # Example
///
/// ```rust
/// use autowire_di::{Definition, DiResult, Provider, Registry, Resolver};
///
/// struct MailerConfig { host: String }
///
/// struct MailProvider;
///
/// impl Provider for MailProvider {
///     fn setup(&self, registry: &Registry) -> DiResult<()> {
///         registry.register("mailer.config", Definition::factory(|_| MailerConfig {
///             host: "smtp.localhost".to_string(),
///         }));
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let registry = Registry::new();
/// registry.add_provider(&MailProvider)?;
/// assert_eq!(registry.get::<MailerConfig>("mailer.config")?.host, "smtp.localhost");
/// # Ok(())
/// # }
/// ```
pub trait Provider {
    /// Registers this provider's services.
    fn setup(&self, registry: &Registry) -> DiResult<()>;
}

impl<F> Provider for F
where
    F: Fn(&Registry) -> DiResult<()>,
{
    fn setup(&self, registry: &Registry) -> DiResult<()> {
        self(registry)
    }
}

impl Registry {
    /// Runs `provider` against this registry.
    pub fn add_provider<P: Provider + ?Sized>(&self, provider: &P) -> DiResult<&Self> {
        provider.setup(self)?;
        Ok(self)
    }
}

/// Wall-clock service registered by [`DefaultProvider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Current time.
    pub fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    /// Seconds since the Unix epoch, or 0 if the system clock is set before it.
    pub fn unix_timestamp(&self) -> u64 {
        self.now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

/// Provider used when an [`App`](crate::App) is run without any.
///
/// Registers a [`SystemClock`] factory under [`name_of::<SystemClock>()`](name_of).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultProvider;

impl Provider for DefaultProvider {
    fn setup(&self, registry: &Registry) -> DiResult<()> {
        registry.register(name_of::<SystemClock>(), Definition::factory(|_| SystemClock));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Resolver;

    #[test]
    fn default_provider_registers_clock() {
        let registry = Registry::new();
        registry.add_provider(&DefaultProvider).unwrap();

        let clock = registry.get_service::<SystemClock>().unwrap();
        assert!(clock.unix_timestamp() > 0);
    }

    #[test]
    fn closures_are_providers() {
        let registry = Registry::new();
        let provider = |r: &Registry| -> DiResult<()> {
            r.register("flag", Definition::instance(true));
            Ok(())
        };
        registry.add_provider(&provider).unwrap();
        assert!(*registry.get::<bool>("flag").unwrap());
    }
}
