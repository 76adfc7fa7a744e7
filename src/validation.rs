//! Static validation of registered definitions.
//!
//! Checks that every registered service could be built from its declared
//! dependencies alone, without running a single factory or constructor.
//! Factories are opaque: their dependencies are unknown, so a factory
//! definition always counts as buildable.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::catalog::TypeEntry;
use crate::descriptors::{ParameterKind, TypeDescriptor};
use crate::key::ServiceName;
use crate::registration::Definition;
use crate::registry::Registry;

/// A problem found by [`Registry::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The definition names a type that was never declared
    UnknownType {
        service: ServiceName,
        type_name: ServiceName,
    },
    /// The definition names an abstract type
    NotInstantiable {
        service: ServiceName,
        type_name: ServiceName,
    },
    /// The type declares a value parameter
    UnresolvableParameter {
        service: ServiceName,
        type_name: ServiceName,
        parameter: &'static str,
    },
    /// A declared dependency has no definition, no cached instance and cannot
    /// be autowired implicitly
    MissingDependency {
        service: ServiceName,
        dependency: ServiceName,
    },
    /// Services that depend on each other; the first name is repeated last
    Cycle { path: Vec<ServiceName> },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownType { service, type_name } => {
                write!(f, "{} refers to unknown type {}", service, type_name)
            }
            ValidationIssue::NotInstantiable { service, type_name } => {
                write!(f, "{} refers to abstract type {}", service, type_name)
            }
            ValidationIssue::UnresolvableParameter {
                service,
                type_name,
                parameter,
            } => write!(
                f,
                "{} ({}) declares unresolvable parameter `{}`",
                service, type_name, parameter
            ),
            ValidationIssue::MissingDependency { service, dependency } => {
                write!(f, "{} depends on missing service {}", service, dependency)
            }
            ValidationIssue::Cycle { path } => {
                let names: Vec<&str> = path.iter().map(ServiceName::as_str).collect();
                write!(f, "circular dependency: {}", names.join(" -> "))
            }
        }
    }
}

/// Outcome of [`Registry::validate`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems, in the order they were found
    pub issues: Vec<ValidationIssue>,
    /// Number of registered services that were checked
    pub checked: usize,
}

impl ValidationReport {
    /// True when no issue was found.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct Walker<'a> {
    definitions: HashMap<ServiceName, Definition>,
    catalog: HashMap<ServiceName, TypeEntry>,
    cached: HashSet<ServiceName>,
    implicit_autowire: bool,
    marks: HashMap<ServiceName, Mark>,
    stack: Vec<ServiceName>,
    report: &'a mut ValidationReport,
}

impl Walker<'_> {
    /// Dependencies of `name`, or `None` when it is a leaf or already broken.
    fn descriptor_for(&mut self, name: &ServiceName) -> Option<TypeDescriptor> {
        match self.definitions.get(name) {
            Some(Definition::Factory(_)) => None,
            Some(Definition::Type(ty)) => match self.catalog.get(ty.type_name()) {
                Some(TypeEntry::Constructible(descriptor)) => Some(descriptor.clone()),
                Some(TypeEntry::Abstract) => {
                    self.report.issues.push(ValidationIssue::NotInstantiable {
                        service: name.clone(),
                        type_name: ty.type_name().clone(),
                    });
                    None
                }
                None => {
                    self.report.issues.push(ValidationIssue::UnknownType {
                        service: name.clone(),
                        type_name: ty.type_name().clone(),
                    });
                    None
                }
            },
            // Only reached for implicitly autowired dependencies.
            None => match self.catalog.get(name) {
                Some(TypeEntry::Constructible(descriptor)) => Some(descriptor.clone()),
                _ => None,
            },
        }
    }

    fn satisfiable(&self, dependency: &ServiceName) -> bool {
        self.cached.contains(dependency)
            || self.definitions.contains_key(dependency)
            || (self.implicit_autowire
                && matches!(self.catalog.get(dependency), Some(TypeEntry::Constructible(_))))
    }

    fn visit(&mut self, name: &ServiceName) {
        match self.marks.get(name) {
            Some(Mark::Done) => return,
            Some(Mark::InProgress) => {
                if let Some(start) = self.stack.iter().position(|frame| frame == name) {
                    let mut path = self.stack[start..].to_vec();
                    path.push(name.clone());
                    self.report.issues.push(ValidationIssue::Cycle { path });
                }
                return;
            }
            None => {}
        }

        // A cached instance is never rebuilt, whatever its definition says.
        if self.cached.contains(name) {
            self.marks.insert(name.clone(), Mark::Done);
            return;
        }

        self.marks.insert(name.clone(), Mark::InProgress);
        self.stack.push(name.clone());

        if let Some(descriptor) = self.descriptor_for(name) {
            let value_parameter = descriptor
                .parameters()
                .iter()
                .find(|parameter| parameter.kind() == &ParameterKind::Value);

            if let Some(parameter) = value_parameter {
                self.report.issues.push(ValidationIssue::UnresolvableParameter {
                    service: name.clone(),
                    type_name: descriptor.type_name().clone(),
                    parameter: parameter.name(),
                });
            } else {
                for dependency in descriptor.parameters().iter().filter_map(|p| p.service_name()) {
                    if self.satisfiable(dependency) {
                        self.visit(dependency);
                    } else {
                        self.report.issues.push(ValidationIssue::MissingDependency {
                            service: name.clone(),
                            dependency: dependency.clone(),
                        });
                    }
                }
            }
        }

        self.stack.pop();
        self.marks.insert(name.clone(), Mark::Done);
    }
}

impl Registry {
    /// Checks every registered service for problems `get` would hit, without
    /// building anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use autowire_di::{Definition, Registry, ValidationIssue};
    ///
    /// let registry = Registry::new();
    /// registry.register("ok", Definition::instance(1u8));
    /// registry.register("broken", Definition::type_name("app::Missing"));
    ///
    /// let report = registry.validate();
    /// assert!(!report.is_valid());
    /// assert!(matches!(
    ///     &report.issues[0],
    ///     ValidationIssue::UnknownType { service, .. } if service == "broken"
    /// ));
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let definitions: HashMap<_, _> = self
            .definitions
            .lock()
            .iter()
            .map(|(name, definition)| (name.clone(), definition.clone()))
            .collect();
        let catalog = self.catalog.lock().snapshot();
        let cached = self.cached_names();

        let mut roots: Vec<ServiceName> = definitions.keys().cloned().collect();
        roots.sort();

        let mut report = ValidationReport {
            issues: Vec::new(),
            checked: roots.len(),
        };
        let mut walker = Walker {
            definitions,
            catalog,
            cached,
            implicit_autowire: self.options().implicit_autowire,
            marks: HashMap::new(),
            stack: Vec::new(),
            report: &mut report,
        };
        for root in &roots {
            walker.visit(root);
        }

        tracing::debug!(checked = report.checked, issues = report.issues.len(), "validated registry");
        report
    }
}
