//! The registry: definitions, cached instances and the autowiring engine.
//!
//! Every request goes through the same lookup-or-build procedure. A cached
//! instance is returned as is; otherwise the definition is evaluated (factory
//! call or autowiring), the result is cached under the requested name and
//! returned. Autowiring requests each declared dependency through that same
//! procedure, keyed by the dependency's service name.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::catalog::{TypeCatalog, TypeEntry};
use crate::descriptors::{Arguments, Autowire, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::StackGuard;
use crate::key::{name_of, ServiceName};
use crate::observer::{Observers, RegistryObserver};
use crate::registration::{AnyArc, Definition, Definitions};
use crate::traits::{Resolver, ResolverCore};

pub mod options;

pub use options::{RegistryOptions, DEFAULT_MAX_DEPTH};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Name-keyed service registry with cached instances and autowiring.
///
/// A registry is an ordinary value: the composition root creates it, hands
/// `&Registry` to whatever registers or resolves services, and drops it when
/// the application is done. Each service name is built at most once; later
/// requests return the same `Arc`.
///
/// The internal maps are locked only around individual reads and writes,
/// never while a factory or constructor runs, so factories may freely call
/// back into the registry.
///
/// # Examples
///
/// ```
/// use autowire_di::{Definition, Registry, Resolver};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
/// struct Server { config: Arc<Config> }
///
/// let registry = Registry::new();
/// registry.register("config", Definition::instance(Config { port: 8080 }));
/// registry.register("server", Definition::try_factory(|r| {
///     Ok(Server { config: r.get::<Config>("config")? })
/// }));
///
/// let server = registry.get::<Server>("server").unwrap();
/// assert_eq!(server.config.port, 8080);
/// assert!(Arc::ptr_eq(&server, &registry.get::<Server>("server").unwrap()));
/// ```
pub struct Registry {
    id: u64,
    options: RegistryOptions,
    pub(crate) definitions: Mutex<Definitions>,
    pub(crate) catalog: Mutex<TypeCatalog>,
    instances: Mutex<HashMap<ServiceName, AnyArc>>,
    observers: RwLock<Observers>,
}

impl Registry {
    /// Creates an empty registry with default options.
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    /// Creates an empty registry with the given options.
    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            options,
            definitions: Mutex::new(Definitions::default()),
            catalog: Mutex::new(TypeCatalog::default()),
            instances: Mutex::new(HashMap::new()),
            observers: RwLock::new(Observers::default()),
        }
    }

    /// Options this registry was created with.
    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// Stores `definition` under `name`, replacing any earlier definition.
    ///
    /// Nothing is validated here. An instance already cached under `name` is
    /// kept and keeps being returned.
    pub fn register(&self, name: impl Into<ServiceName>, definition: Definition) -> &Self {
        let name = name.into();
        if let Definition::Type(ty) = &definition {
            if let Some(descriptor) = &ty.descriptor {
                self.catalog.lock().declare(descriptor.clone());
            }
        }

        debug!(service = %name, ?definition, "registering service");
        if self.definitions.lock().insert(name.clone(), definition).is_some() {
            trace!(service = %name, "replaced existing definition");
        }
        self
    }

    /// Registers the type identifier `type_name` under its own name.
    pub fn simple_register(&self, type_name: impl Into<ServiceName>) -> &Self {
        let type_name = type_name.into();
        self.register(type_name.clone(), Definition::type_name(type_name))
    }

    /// Declares `T` and registers it, autowired, under [`name_of::<T>()`](name_of).
    pub fn register_type<T: Autowire>(&self) -> &Self {
        self.register(name_of::<T>(), Definition::autowired::<T>())
    }

    /// Makes `T` known as a constructible type without registering a service.
    pub fn declare<T: Autowire>(&self) -> &Self {
        self.declare_descriptor(TypeDescriptor::of::<T>())
    }

    /// Makes a type known from its descriptor.
    pub fn declare_descriptor(&self, descriptor: TypeDescriptor) -> &Self {
        trace!(type_name = %descriptor.type_name(), "declaring type");
        self.catalog.lock().declare(descriptor);
        self
    }

    /// Makes `type_name` known as a type that cannot be constructed.
    pub fn declare_abstract(&self, type_name: impl Into<ServiceName>) -> &Self {
        let type_name = type_name.into();
        trace!(type_name = %type_name, "declaring abstract type");
        self.catalog.lock().declare_abstract(type_name);
        self
    }

    /// Adds an observer notified of every build.
    pub fn add_observer(&self, observer: Arc<dyn RegistryObserver>) -> &Self {
        self.observers.write().add(observer);
        self
    }

    /// True when a definition is registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.definitions.lock().contains(name)
    }

    /// True when an instance is cached under `name`.
    pub fn is_cached(&self, name: &str) -> bool {
        self.instances.lock().contains_key(name)
    }

    /// True when `type_name` has been declared, constructible or not.
    pub fn knows_type(&self, type_name: &str) -> bool {
        self.catalog.lock().contains(type_name)
    }

    /// Registered service names, sorted.
    pub fn service_names(&self) -> Vec<ServiceName> {
        let mut names: Vec<_> = self.definitions.lock().iter().map(|(name, _)| name.clone()).collect();
        names.sort();
        names
    }

    pub(crate) fn cached_names(&self) -> HashSet<ServiceName> {
        self.instances.lock().keys().cloned().collect()
    }

    fn cached(&self, name: &str) -> Option<AnyArc> {
        self.instances.lock().get(name).cloned()
    }

    /// Caches `instance` unless another build got there first; either way
    /// returns the instance that is now cached.
    fn store(&self, name: &ServiceName, instance: AnyArc) -> AnyArc {
        self.instances
            .lock()
            .entry(name.clone())
            .or_insert(instance)
            .clone()
    }

    /// Runs one build of `name` under the resolution guard, caching on success.
    fn build<F>(&self, name: &ServiceName, make: F) -> DiResult<AnyArc>
    where
        F: FnOnce() -> DiResult<AnyArc>,
    {
        let _guard = StackGuard::enter(self.id, name, self.options.max_depth)?;

        // Snapshot so callbacks run without the observer lock held.
        let observers = {
            let guard = self.observers.read();
            guard.has_observers().then(|| guard.clone())
        };
        let start = Instant::now();
        if let Some(observers) = &observers {
            observers.resolving(name);
        }

        match make() {
            Ok(instance) => {
                let instance = self.store(name, instance);
                if let Some(observers) = &observers {
                    observers.resolved(name, start.elapsed());
                }
                debug!(service = %name, "built service");
                Ok(instance)
            }
            Err(error) => {
                if let Some(observers) = &observers {
                    observers.failed(name, &error);
                }
                debug!(service = %name, %error, "failed to build service");
                Err(error)
            }
        }
    }

    fn evaluate(&self, name: &ServiceName, definition: &Definition) -> DiResult<AnyArc> {
        match definition {
            Definition::Factory(factory) => {
                trace!(service = %name, produces = factory.produces(), "invoking factory");
                (factory.factory)(self)
            }
            Definition::Type(ty) => {
                let entry = self.catalog.lock().get(ty.type_name().as_ref()).cloned();
                match entry {
                    Some(TypeEntry::Constructible(descriptor)) => self.autowire(&descriptor),
                    Some(TypeEntry::Abstract) => Err(DiError::NotInstantiable(ty.type_name().clone())),
                    None => Err(DiError::InvalidDefinition(name.clone())),
                }
            }
        }
    }

    /// Builds a fresh instance of the described type. Caching is the caller's job.
    fn autowire(&self, descriptor: &TypeDescriptor) -> DiResult<AnyArc> {
        let service = descriptor.type_name();
        let parameters = descriptor.parameters();

        // Reject value parameters before any dependency gets built.
        let mut dependencies = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let dependency = parameter.service_name().ok_or_else(|| DiError::UnresolvableDependency {
                service: service.clone(),
                parameter: parameter.name(),
            })?;
            dependencies.push(dependency);
        }

        trace!(service = %service, count = dependencies.len(), "autowiring");
        let mut values = Vec::with_capacity(dependencies.len());
        for dependency in dependencies {
            values.push((dependency.clone(), self.get_dependency(dependency)?));
        }

        descriptor.construct(Arguments::new(service.clone(), values))
    }

    fn get_dependency(&self, name: &ServiceName) -> DiResult<AnyArc> {
        let name = name.as_str();
        if self.options.implicit_autowire && !self.is_cached(name) && !self.is_registered(name) {
            let constructible = matches!(
                self.catalog.lock().get(name),
                Some(TypeEntry::Constructible(_))
            );
            if constructible {
                trace!(service = name, "implicitly autowiring undefined dependency");
                return self.resolve_any(name);
            }
        }
        self.get_any(name)
    }
}

impl ResolverCore for Registry {
    fn get_any(&self, name: &str) -> DiResult<AnyArc> {
        if let Some(instance) = self.cached(name) {
            trace!(service = name, "cache hit");
            return Ok(instance);
        }

        let name = ServiceName::from(name);
        let definition = self.definitions.lock().get(name.as_str()).cloned();
        let Some(definition) = definition else {
            debug!(service = %name, "service not found");
            return Err(DiError::NotFound(name));
        };

        self.build(&name, || self.evaluate(&name, &definition))
    }

    fn resolve_any(&self, type_name: &str) -> DiResult<AnyArc> {
        if let Some(instance) = self.cached(type_name) {
            trace!(service = type_name, "cache hit");
            return Ok(instance);
        }

        let type_name = ServiceName::from(type_name);
        let entry = self.catalog.lock().get(type_name.as_str()).cloned();
        match entry {
            Some(TypeEntry::Constructible(descriptor)) => self.build(&type_name, || self.autowire(&descriptor)),
            Some(TypeEntry::Abstract) => Err(DiError::NotInstantiable(type_name)),
            None => {
                debug!(type_name = %type_name, "type not found");
                Err(DiError::NotFound(type_name))
            }
        }
    }

    fn resolve_descriptor(&self, descriptor: &TypeDescriptor) -> DiResult<AnyArc> {
        {
            let mut catalog = self.catalog.lock();
            if !catalog.contains(descriptor.type_name().as_str()) {
                catalog.declare(descriptor.clone());
            }
        }
        self.resolve_any(descriptor.type_name().as_str())
    }
}

impl Resolver for Registry {}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("definitions", &self.definitions.lock().len())
            .field("types", &self.catalog.lock().len())
            .field("instances", &self.instances.lock().len())
            .finish()
    }
}
