//! Service definition types.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::descriptors::{Autowire, TypeDescriptor};
use crate::error::DiResult;
use crate::key::{name_of, ServiceName};
use crate::registry::Registry;

// Type-erased Arc for storage
pub type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type FactoryFn = Arc<dyn Fn(&Registry) -> DiResult<AnyArc> + Send + Sync>;

/// The registered recipe for producing a service.
///
/// Either a factory invoked with the registry, or the identifier of a
/// constructible type to autowire. Definitions are not validated when they are
/// registered; problems surface when the service is first resolved.
///
/// # Examples
///
/// ```rust
/// use autowire_di::{Definition, Registry, Resolver, ResolverCore};
///
/// let registry = Registry::new();
/// registry.register("greeting", Definition::factory(|_| "hello".to_string()));
/// registry.register("broken", Definition::type_name("app::DoesNotExist"));
///
/// assert_eq!(*registry.get::<String>("greeting").unwrap(), "hello");
/// assert!(registry.get_any("broken").is_err());
/// ```
#[derive(Clone)]
pub enum Definition {
    /// Invoked once with the registry; its return value is the instance
    Factory(FactoryDefinition),
    /// Identifier of a constructible type, looked up in the catalog
    Type(TypeDefinition),
}

/// Factory half of [`Definition`].
#[derive(Clone)]
pub struct FactoryDefinition {
    pub(crate) factory: FactoryFn,
    pub(crate) produces: &'static str,
}

/// Type half of [`Definition`].
#[derive(Clone, Debug)]
pub struct TypeDefinition {
    pub(crate) type_name: ServiceName,
    /// Carried when the definition was built from a Rust type, so registering
    /// it also declares the type.
    pub(crate) descriptor: Option<TypeDescriptor>,
}

impl Definition {
    /// A factory producing `T`.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Registry) -> T + Send + Sync + 'static,
    {
        Self::try_factory(move |registry| Ok(factory(registry)))
    }

    /// A factory that may fail. Errors propagate to the caller of `get`.
    pub fn try_factory<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Registry) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |registry: &Registry| -> DiResult<AnyArc> {
            factory(registry).map(|value| Arc::new(value) as AnyArc)
        };
        Definition::Factory(FactoryDefinition {
            factory: Arc::new(ctor),
            produces: std::any::type_name::<T>(),
        })
    }

    /// A factory that hands out an already-built instance.
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        let value: AnyArc = Arc::new(value);
        Definition::Factory(FactoryDefinition {
            factory: Arc::new(move |_: &Registry| -> DiResult<AnyArc> { Ok(value.clone()) }),
            produces: std::any::type_name::<T>(),
        })
    }

    /// The type `T`, autowired from its declared parameters.
    pub fn autowired<T: Autowire>() -> Self {
        Definition::Type(TypeDefinition {
            type_name: name_of::<T>(),
            descriptor: Some(TypeDescriptor::of::<T>()),
        })
    }

    /// A type referenced only by identifier. The registry must learn about
    /// the type through [`Registry::declare`] or another registration before
    /// the service is resolved.
    pub fn type_name(type_name: impl Into<ServiceName>) -> Self {
        Definition::Type(TypeDefinition {
            type_name: type_name.into(),
            descriptor: None,
        })
    }

    /// True for factory definitions.
    pub fn is_factory(&self) -> bool {
        matches!(self, Definition::Factory(_))
    }
}

impl TypeDefinition {
    /// Referenced type identifier.
    pub fn type_name(&self) -> &ServiceName {
        &self.type_name
    }
}

impl FactoryDefinition {
    /// Rust type the factory returns.
    pub fn produces(&self) -> &'static str {
        self.produces
    }
}

impl fmt::Debug for FactoryDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryDefinition")
            .field("produces", &self.produces)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Factory(factory) => f.debug_tuple("Factory").field(factory).finish(),
            Definition::Type(ty) => f.debug_tuple("Type").field(&ty.type_name).finish(),
        }
    }
}

/// Definition map keyed by service name.
#[derive(Default)]
pub(crate) struct Definitions {
    entries: HashMap<ServiceName, Definition>,
}

impl Definitions {
    /// Inserts, returning the definition it replaced.
    pub(crate) fn insert(&mut self, name: ServiceName, definition: Definition) -> Option<Definition> {
        self.entries.insert(name, definition)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Definition> {
        self.entries.get(name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&ServiceName, &Definition)> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
