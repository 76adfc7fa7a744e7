//! Core traits for the dependency injection registry.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
