//! Constructor descriptions used for autowiring.
//!
//! A type opts into autowiring by implementing [`Autowire`]: it lists its
//! constructor parameters in declaration order and builds itself from the
//! positionally resolved [`Arguments`]. The registry never inspects types at
//! runtime; this declaration is the whole contract.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::{name_of, ServiceName};
use crate::registration::AnyArc;

/// A type the registry can build from its declared dependencies.
///
/// # Examples
///
/// ```rust
/// use autowire_di::{Arguments, Autowire, DiResult, Parameter, Registry, Resolver};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Database;
///
/// impl Autowire for Database {
///     fn parameters() -> Vec<Parameter> { Vec::new() }
///     fn construct(_: Arguments) -> DiResult<Self> { Ok(Database) }
/// }
///
/// struct UserService { db: Arc<Database> }
///
/// impl Autowire for UserService {
///     fn parameters() -> Vec<Parameter> {
///         vec![Parameter::service::<Database>("db")]
///     }
///     fn construct(mut args: Arguments) -> DiResult<Self> {
///         Ok(UserService { db: args.next()? })
///     }
/// }
///
/// let registry = Registry::new();
/// registry.register_type::<Database>();
/// let users = registry.resolve::<UserService>().unwrap();
/// let db = registry.resolve::<Database>().unwrap();
/// assert!(Arc::ptr_eq(&users.db, &db));
/// ```
pub trait Autowire: Sized + Send + Sync + 'static {
    /// Declared constructor parameters, in declaration order.
    ///
    /// An empty list means the type is built with no arguments.
    fn parameters() -> Vec<Parameter>;

    /// Builds the value from dependencies resolved in parameter order.
    fn construct(args: Arguments) -> DiResult<Self>;
}

/// How a constructor parameter is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    /// A constructible service, requested from the registry under this name
    Service(ServiceName),
    /// A primitive, untyped or defaulted scalar; never resolvable
    Value,
}

/// One declared constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: &'static str,
    kind: ParameterKind,
}

impl Parameter {
    /// A parameter whose declared type is `T`, requested under `name_of::<T>()`.
    pub fn service<T: ?Sized + 'static>(name: &'static str) -> Self {
        Parameter {
            name,
            kind: ParameterKind::Service(name_of::<T>()),
        }
    }

    /// A parameter requested under an explicit service name.
    pub fn named(name: &'static str, service: impl Into<ServiceName>) -> Self {
        Parameter {
            name,
            kind: ParameterKind::Service(service.into()),
        }
    }

    /// A primitive or untyped parameter. Autowiring a type that declares one
    /// fails with [`DiError::UnresolvableDependency`].
    pub fn value(name: &'static str) -> Self {
        Parameter {
            name,
            kind: ParameterKind::Value,
        }
    }

    /// Declared parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared kind.
    pub fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    /// Service name this parameter is resolved under, if any.
    pub fn service_name(&self) -> Option<&ServiceName> {
        match &self.kind {
            ParameterKind::Service(name) => Some(name),
            ParameterKind::Value => None,
        }
    }
}

/// Dependencies resolved for one constructor call, consumed in order.
pub struct Arguments {
    service: ServiceName,
    values: std::vec::IntoIter<(ServiceName, AnyArc)>,
}

impl Arguments {
    pub(crate) fn new(service: ServiceName, values: Vec<(ServiceName, AnyArc)>) -> Self {
        Self {
            service,
            values: values.into_iter(),
        }
    }

    /// Takes the next argument, downcast to `T`.
    pub fn next<T: Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        let (name, value) = self.values.next().ok_or_else(|| {
            DiError::construction(&self.service, "constructor requested more arguments than declared")
        })?;
        value
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch {
                name,
                expected: std::any::type_name::<T>(),
            })
    }

    /// Takes the next argument without downcasting.
    pub fn next_any(&mut self) -> DiResult<AnyArc> {
        self.values
            .next()
            .map(|(_, value)| value)
            .ok_or_else(|| {
                DiError::construction(&self.service, "constructor requested more arguments than declared")
            })
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Service the arguments were resolved for.
    pub fn service(&self) -> &ServiceName {
        &self.service
    }
}

type ConstructFn = fn(Arguments) -> DiResult<AnyArc>;

/// Type-erased [`Autowire`] implementation stored in the catalog.
#[derive(Clone)]
pub struct TypeDescriptor {
    type_name: ServiceName,
    parameters: Arc<[Parameter]>,
    construct: ConstructFn,
}

impl TypeDescriptor {
    /// Captures the autowiring contract of `T`.
    pub fn of<T: Autowire>() -> Self {
        fn construct<T: Autowire>(args: Arguments) -> DiResult<AnyArc> {
            T::construct(args).map(|value| Arc::new(value) as Arc<dyn Any + Send + Sync>)
        }

        Self {
            type_name: name_of::<T>(),
            parameters: T::parameters().into(),
            construct: construct::<T>,
        }
    }

    /// Fully-qualified type name.
    pub fn type_name(&self) -> &ServiceName {
        &self.type_name
    }

    /// Declared parameters, in order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub(crate) fn construct(&self, args: Arguments) -> DiResult<AnyArc> {
        (self.construct)(args)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_name", &self.type_name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf;

    impl Autowire for Leaf {
        fn parameters() -> Vec<Parameter> {
            Vec::new()
        }

        fn construct(_: Arguments) -> DiResult<Self> {
            Ok(Leaf)
        }
    }

    #[test]
    fn descriptor_captures_parameters_in_order() {
        struct Pair;
        impl Autowire for Pair {
            fn parameters() -> Vec<Parameter> {
                vec![Parameter::service::<Leaf>("left"), Parameter::value("count")]
            }
            fn construct(_: Arguments) -> DiResult<Self> {
                Ok(Pair)
            }
        }

        let descriptor = TypeDescriptor::of::<Pair>();
        let names: Vec<_> = descriptor.parameters().iter().map(Parameter::name).collect();
        assert_eq!(names, ["left", "count"]);
        assert_eq!(descriptor.parameters()[0].service_name(), Some(&name_of::<Leaf>()));
        assert_eq!(descriptor.parameters()[1].kind(), &ParameterKind::Value);
    }

    #[test]
    fn arguments_downcast_and_exhaust() {
        let leaf: AnyArc = Arc::new(Leaf);
        let mut args = Arguments::new("Pair".into(), vec![(name_of::<Leaf>(), leaf)]);
        assert_eq!(args.remaining(), 1);
        assert!(args.next::<Leaf>().is_ok());
        assert!(matches!(args.next::<Leaf>(), Err(DiError::Construction { .. })));
    }

    #[test]
    fn arguments_report_wrong_type() {
        let leaf: AnyArc = Arc::new(Leaf);
        let mut args = Arguments::new("Pair".into(), vec![("leaf".into(), leaf)]);
        match args.next::<String>() {
            Err(DiError::TypeMismatch { name, expected }) => {
                assert_eq!(name, "leaf");
                assert!(expected.contains("String"));
            }
            _ => panic!("Expected TypeMismatch"),
        }
    }
}
