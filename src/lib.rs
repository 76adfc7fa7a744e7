//! # autowire-di
//!
//! Name-keyed dependency injection: register a service definition under a
//! name, then ask the registry for a fully-constructed, cached instance.
//!
//! ## Features
//!
//! - **Two kinds of definition**: a factory closure, or a constructible type
//!   that the registry autowires from its declared constructor parameters
//! - **Registry-wide singletons**: each name is built once and the same `Arc`
//!   is returned afterwards
//! - **Autowiring without reflection**: types implement [`Autowire`] to list
//!   their dependencies in order
//! - **Circular dependency detection**: cycles fail with the offending path
//!   instead of overflowing the stack
//! - **Static validation**: [`Registry::validate`] finds broken wiring
//!   without constructing anything
//!
//! ## Quick Start
//!
//! ```rust
//! use autowire_di::{Arguments, Autowire, Definition, DiResult, Parameter, Registry, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Autowire for UserService {
//!     fn parameters() -> Vec<Parameter> {
//!         vec![Parameter::service::<Database>("db")]
//!     }
//!
//!     fn construct(mut args: Arguments) -> DiResult<Self> {
//!         Ok(UserService { db: args.next()? })
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.register(
//!     autowire_di::name_of::<Database>(),
//!     Definition::factory(|_| Database { url: "postgres://localhost".to_string() }),
//! );
//! registry.register_type::<UserService>();
//!
//! let users = registry.get_service::<UserService>().unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//! ```
//!
//! ## Bootstrapping
//!
//! [`App`] runs a list of [`Provider`]s against a registry and then hands the
//! registry to application code. With no providers it falls back to the
//! [`DefaultProvider`].
//!
//! ```rust
//! use autowire_di::{App, Resolver, SystemClock};
//!
//! let now = App::new()
//!     .run(|registry| registry.get_service::<SystemClock>().map(|c| c.unix_timestamp()))
//!     .unwrap()
//!     .unwrap();
//! assert!(now > 0);
//! ```

// Module declarations
pub mod app;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod observer;
pub mod provider;
pub mod registry;
pub mod traits;
pub mod validation;

// Internal modules
mod catalog;
mod internal;
mod registration;

// Re-export core types
pub use app::App;
pub use catalog::TypeEntry;
pub use descriptors::{Arguments, Autowire, Parameter, ParameterKind, TypeDescriptor};
pub use error::{DiError, DiResult};
pub use key::{name_of, ServiceName};
pub use observer::{RegistryObserver, TracingObserver};
pub use provider::{DefaultProvider, Provider, SystemClock};
pub use registration::{AnyArc, Definition, FactoryDefinition, TypeDefinition};
pub use registry::{Registry, RegistryOptions, DEFAULT_MAX_DEPTH};
pub use traits::{Resolver, ResolverCore};
pub use validation::{ValidationIssue, ValidationReport};
