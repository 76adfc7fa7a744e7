/// Property-based tests for service resolution
///
/// These tests verify that caching and overwrite behavior hold regardless of
/// the names and values involved.

use autowire_di::{Definition, DiError, Registry, Resolver, ResolverCore};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

proptest! {
    #[test]
    fn get_is_idempotent(name in "\\PC{1,40}", value in any::<u64>()) {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let registry = Registry::new();
        registry.register(name.as_str(), Definition::factory(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            value
        }));

        let first = registry.get::<u64>(&name).unwrap();
        let second = registry.get::<u64>(&name).unwrap();

        prop_assert!(Arc::ptr_eq(&first, &second));
        prop_assert_eq!(*first, value);
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

proptest! {
    #[test]
    fn unknown_names_are_not_found(
        registered in prop::collection::hash_set("[a-z]{1,8}", 0..10),
        probe in "[a-z]{1,8}",
    ) {
        let registry = Registry::new();
        for name in &registered {
            registry.register(name.as_str(), Definition::instance(name.clone()));
        }

        let result = registry.get::<String>(&probe);
        if registered.contains(&probe) {
            let value = result.unwrap();
            prop_assert_eq!(value.as_str(), probe.as_str());
        } else {
            prop_assert!(matches!(result, Err(DiError::NotFound(_))));
        }
    }
}

proptest! {
    #[test]
    fn last_registration_before_first_get_wins(values in prop::collection::vec(any::<i32>(), 1..10)) {
        let registry = Registry::new();
        for value in &values {
            registry.register("value", Definition::instance(*value));
        }

        let resolved = registry.get::<i32>("value").unwrap();
        prop_assert_eq!(*resolved, *values.last().unwrap());

        // Later registrations never replace the cached instance.
        registry.register("value", Definition::instance(i32::MIN));
        prop_assert_eq!(*registry.get::<i32>("value").unwrap(), *values.last().unwrap());
    }
}

proptest! {
    #[test]
    fn each_name_gets_its_own_instance(names in prop::collection::hash_set("[a-z]{1,6}", 1..8)) {
        let registry = Registry::new();
        for name in &names {
            registry.register(name.as_str(), Definition::factory(|_| 0u8));
        }

        let mut pointers = HashSet::new();
        for name in &names {
            let instance = registry.get_any(name).unwrap();
            pointers.insert(Arc::as_ptr(&instance) as *const () as usize);
        }
        prop_assert_eq!(pointers.len(), names.len());
    }
}
