//! Registry configuration.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default limit on nested resolutions per thread.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Tunables for a [`Registry`](crate::Registry).
///
/// The defaults reproduce the plain lookup-or-build behavior: autowiring asks
/// for every dependency through `get`, so each dependency needs a definition.
///
/// With the `config` feature enabled the options can be deserialized, with
/// missing fields falling back to their defaults.
///
/// # Examples
///
/// ```
/// use autowire_di::{Registry, RegistryOptions};
///
/// let options = RegistryOptions::default()
///     .max_depth(64)
///     .implicit_autowire(true);
/// let registry = Registry::with_options(options);
/// assert_eq!(registry.options().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegistryOptions {
    /// Nested resolutions allowed before failing with `DepthExceeded`
    pub max_depth: usize,
    /// Autowire a dependency that has no definition when its type has been
    /// declared, instead of failing with `NotFound`
    pub implicit_autowire: bool,
}

impl RegistryOptions {
    /// Sets the nesting limit.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables implicit autowiring of declared dependencies.
    pub fn implicit_autowire(mut self, enabled: bool) -> Self {
        self.implicit_autowire = enabled;
        self
    }
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            implicit_autowire: false,
        }
    }
}
