//! Known type identifiers.

use std::collections::HashMap;

use crate::descriptors::TypeDescriptor;
use crate::key::ServiceName;

/// What the registry knows about a type identifier.
#[derive(Debug, Clone)]
pub enum TypeEntry {
    /// The type can be autowired
    Constructible(TypeDescriptor),
    /// The type exists but has no constructor (e.g. a trait object)
    Abstract,
}

/// Type identifier → [`TypeEntry`].
///
/// Stands in for runtime "does this class exist" checks: a type exists for the
/// registry exactly when it has been declared here.
#[derive(Debug, Default)]
pub(crate) struct TypeCatalog {
    entries: HashMap<ServiceName, TypeEntry>,
}

impl TypeCatalog {
    pub(crate) fn declare(&mut self, descriptor: TypeDescriptor) {
        self.entries
            .insert(descriptor.type_name().clone(), TypeEntry::Constructible(descriptor));
    }

    pub(crate) fn declare_abstract(&mut self, type_name: ServiceName) {
        self.entries.insert(type_name, TypeEntry::Abstract);
    }

    pub(crate) fn get(&self, type_name: &str) -> Option<&TypeEntry> {
        self.entries.get(type_name)
    }

    pub(crate) fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub(crate) fn snapshot(&self) -> HashMap<ServiceName, TypeEntry> {
        self.entries.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
