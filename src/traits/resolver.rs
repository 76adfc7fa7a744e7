//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::descriptors::{Autowire, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::key::{name_of, ServiceName};
use crate::registration::AnyArc;

/// Core resolver trait for object-safe service resolution.
///
/// Works on type-erased instances. Most callers want the typed helpers on
/// [`Resolver`] instead.
pub trait ResolverCore: Send + Sync {
    /// Returns the instance registered under `name`, building and caching it
    /// on first request.
    ///
    /// # Errors
    ///
    /// * [`DiError::NotFound`] - no definition and no cached instance
    /// * [`DiError::InvalidDefinition`] - the definition names an unknown type
    /// * [`DiError::NotInstantiable`] - the definition names an abstract type
    /// * any error raised while building a dependency, unchanged
    fn get_any(&self, name: &str) -> DiResult<AnyArc>;

    /// Builds (or returns the cached instance of) a declared type directly,
    /// without consulting the definitions. The instance is cached under
    /// `type_name`.
    ///
    /// # Errors
    ///
    /// * [`DiError::NotFound`] - the type has not been declared
    /// * [`DiError::NotInstantiable`] - the type is abstract
    /// * any error raised while autowiring, unchanged
    fn resolve_any(&self, type_name: &str) -> DiResult<AnyArc>;

    /// Declares the described type if it is unknown, then resolves it like
    /// [`resolve_any`](Self::resolve_any).
    fn resolve_descriptor(&self, descriptor: &TypeDescriptor) -> DiResult<AnyArc>;
}

/// High-level resolver interface with typed access.
///
/// # Examples
///
/// ```
/// use autowire_di::{Definition, Registry, Resolver};
///
/// let registry = Registry::new();
/// registry.register("answer", Definition::instance(42usize));
///
/// let answer = registry.get::<usize>("answer").unwrap();
/// assert_eq!(*answer, 42);
/// assert!(registry.get::<String>("answer").is_err());
/// ```
pub trait Resolver: ResolverCore {
    /// Returns the service registered under `name` as `Arc<T>`.
    ///
    /// # Errors
    ///
    /// Everything [`ResolverCore::get_any`] can return, plus
    /// [`DiError::TypeMismatch`] when the instance is not a `T`.
    fn get<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
        downcast(name, self.get_any(name)?)
    }

    /// Like [`get`](Self::get) but panics on failure.
    ///
    /// # Panics
    ///
    /// When the service cannot be resolved.
    fn get_required<T: Send + Sync + 'static>(&self, name: &str) -> Arc<T> {
        self.get::<T>(name)
            .unwrap_or_else(|error| panic!("failed to resolve required service {}: {}", name, error))
    }

    /// Returns the service registered under [`name_of::<T>()`](name_of).
    fn get_service<T: Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.get::<T>(name_of::<T>().as_str())
    }

    /// Autowires `T` (declaring it first if needed) and caches it under
    /// [`name_of::<T>()`](name_of). Never fails with `NotFound` for `T` itself.
    fn resolve<T: Autowire>(&self) -> DiResult<Arc<T>> {
        let descriptor = TypeDescriptor::of::<T>();
        let instance = self.resolve_descriptor(&descriptor)?;
        downcast(descriptor.type_name().as_str(), instance)
    }

    /// Like [`resolve`](Self::resolve) but panics on failure.
    ///
    /// # Panics
    ///
    /// When `T` cannot be autowired.
    fn resolve_required<T: Autowire>(&self) -> Arc<T> {
        self.resolve::<T>().unwrap_or_else(|error| {
            panic!("failed to autowire {}: {}", std::any::type_name::<T>(), error)
        })
    }
}

fn downcast<T: Send + Sync + 'static>(name: &str, instance: AnyArc) -> DiResult<Arc<T>> {
    instance.downcast::<T>().map_err(|_| DiError::TypeMismatch {
        name: ServiceName::from(name),
        expected: std::any::type_name::<T>(),
    })
}
