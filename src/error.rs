//! Error types for the dependency injection registry.

use thiserror::Error;

use crate::key::ServiceName;

/// Dependency injection errors
///
/// Every error is raised at the point of detection and travels unchanged
/// through nested resolutions up to the original caller of `get`/`resolve`.
///
/// # Examples
///
/// ```rust
/// use autowire_di::{DiError, Registry, ResolverCore};
///
/// let registry = Registry::new();
/// match registry.get_any("missing") {
///     Err(DiError::NotFound(name)) => assert_eq!(name.as_str(), "missing"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum DiError {
    /// No definition and no cached instance for the name, or the type is unknown
    #[error("Service not found: {0}")]
    NotFound(ServiceName),

    /// The definition points at a type identifier the registry does not know
    #[error("Invalid definition for: {0}")]
    InvalidDefinition(ServiceName),

    /// The type is known but cannot be constructed
    #[error("Type {0} is not instantiable")]
    NotInstantiable(ServiceName),

    /// A constructor parameter is not a constructible service type
    #[error("Cannot resolve the dependency `{parameter}` of {service}")]
    UnresolvableDependency {
        /// Type being autowired
        service: ServiceName,
        /// Declared parameter name
        parameter: &'static str,
    },

    /// A name was requested while its own resolution was in progress
    #[error("Circular dependency: {}", fmt_path(.0))]
    Circular(Vec<ServiceName>),

    /// Resolution nested deeper than the configured limit
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),

    /// The cached instance is not of the requested Rust type
    #[error("Type mismatch for {name}: expected {expected}")]
    TypeMismatch {
        /// Service that was requested
        name: ServiceName,
        /// Rust type the caller asked for
        expected: &'static str,
    },

    /// A constructor or fallible factory reported failure
    #[error("Failed to construct {service}: {message}")]
    Construction {
        /// Service being built
        service: ServiceName,
        /// Failure reported by the constructor
        message: String,
    },
}

impl DiError {
    /// Wraps a constructor failure for `service`.
    pub fn construction(service: impl Into<ServiceName>, error: impl std::fmt::Display) -> Self {
        DiError::Construction {
            service: service.into(),
            message: error.to_string(),
        }
    }
}

fn fmt_path(path: &[ServiceName]) -> String {
    path.iter()
        .map(ServiceName::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for DI operations
///
/// ```rust
/// use autowire_di::{DiResult, DiError};
///
/// fn lookup() -> DiResult<u32> {
///     Err(DiError::NotFound("port".into()))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
