//! Service name keys for the registry.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Key for definition storage, instance caching and type lookup.
///
/// A service name is an arbitrary string. By convention a type registered
/// under its own identity uses its fully-qualified type name (see
/// [`name_of`]), which is also the name autowiring uses to request a
/// constructor dependency. The same key therefore joins "requested service"
/// and "constructor parameter type".
///
/// Cloning is cheap: the text is shared.
///
/// # Examples
///
/// ```rust
/// use autowire_di::{ServiceName, name_of};
///
/// struct Database;
///
/// let by_hand = ServiceName::from("database");
/// assert_eq!(by_hand.as_str(), "database");
///
/// let by_type = name_of::<Database>();
/// assert!(by_type.as_str().ends_with("Database"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceName(Arc<str>);

impl ServiceName {
    /// Creates a service name from any string-like value.
    pub fn new(name: impl AsRef<str>) -> Self {
        ServiceName(Arc::from(name.as_ref()))
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ServiceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceName {
    fn from(name: &str) -> Self {
        ServiceName(Arc::from(name))
    }
}

impl From<String> for ServiceName {
    fn from(name: String) -> Self {
        ServiceName(Arc::from(name))
    }
}

impl From<&String> for ServiceName {
    fn from(name: &String) -> Self {
        ServiceName::from(name.as_str())
    }
}

impl From<&ServiceName> for ServiceName {
    fn from(name: &ServiceName) -> Self {
        name.clone()
    }
}

impl PartialEq<str> for ServiceName {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ServiceName {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Conventional service name of a type: its fully-qualified type name.
#[inline]
pub fn name_of<T: ?Sized + 'static>() -> ServiceName {
    ServiceName::from(std::any::type_name::<T>())
}
