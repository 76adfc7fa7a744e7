use autowire_di::{Definition, DiError, Registry, Resolver, ResolverCore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_get_returns_cached_instance() {
    let registry = Registry::new();
    registry.register("number", Definition::instance(42usize));
    registry.register("text", Definition::factory(|_| "hello".to_string()));

    let num1 = registry.get_required::<usize>("number");
    let num2 = registry.get_required::<usize>("number");
    let str1 = registry.get_required::<String>("text");
    let str2 = registry.get_required::<String>("text");

    assert_eq!(*num1, 42);
    assert_eq!(*str1, "hello");
    assert!(Arc::ptr_eq(&num1, &num2)); // Same instance
    assert!(Arc::ptr_eq(&str1, &str2)); // Same instance
}

#[test]
fn test_factory_runs_exactly_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = calls.clone();

    let registry = Registry::new();
    registry.register(
        "counter",
        Definition::factory(move |_| {
            let n = calls_clone.fetch_add(1, Ordering::SeqCst) + 1;
            format!("instance-{}", n)
        }),
    );

    let a = registry.get_required::<String>("counter");
    let b = registry.get_required::<String>("counter");
    let c = registry.get_required::<String>("counter");

    assert_eq!(*a, "instance-1");
    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&b, &c));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_factory_receives_registry() {
    #[derive(Debug)]
    struct Config {
        port: u16,
    }

    #[derive(Debug)]
    struct Server {
        config: Arc<Config>,
        name: String,
    }

    let registry = Registry::new();
    registry.register("config", Definition::instance(Config { port: 8080 }));
    registry.register(
        "server",
        Definition::try_factory(|r| {
            Ok(Server {
                config: r.get::<Config>("config")?,
                name: "MyServer".to_string(),
            })
        }),
    );

    let server = registry.get_required::<Server>("server");
    assert_eq!(server.config.port, 8080);
    assert_eq!(server.name, "MyServer");
}

#[test]
fn test_not_found_error() {
    let registry = Registry::new();

    match registry.get_any("missing") {
        Err(DiError::NotFound(name)) => assert_eq!(name, "missing"),
        other => panic!("Expected NotFound, got {:?}", other.map(|_| ())),
    }
    assert!(registry.get::<u32>("missing").is_err());
}

#[test]
fn test_replace_semantics_before_first_get() {
    let registry = Registry::new();
    registry.register("value", Definition::instance(1usize));
    registry.register("value", Definition::instance(2usize));

    assert_eq!(*registry.get_required::<usize>("value"), 2);
}

#[test]
fn test_replace_does_not_touch_cached_instance() {
    let registry = Registry::new();
    registry.register("value", Definition::instance(1usize));
    let first = registry.get_required::<usize>("value");

    registry.register("value", Definition::instance(2usize));
    let second = registry.get_required::<usize>("value");

    assert_eq!(*second, 1);
    assert!(Arc::ptr_eq(&first, &second));

    // A fresh name reflects the new registration.
    registry.register("other", Definition::instance(2usize));
    assert_eq!(*registry.get_required::<usize>("other"), 2);
}

#[test]
fn test_type_mismatch() {
    let registry = Registry::new();
    registry.register("port", Definition::instance(8080u16));

    match registry.get::<String>("port") {
        Err(DiError::TypeMismatch { name, expected }) => {
            assert_eq!(name, "port");
            assert!(expected.contains("String"));
        }
        _ => panic!("Expected TypeMismatch"),
    }
    // The instance is still cached and usable with the right type.
    assert_eq!(*registry.get_required::<u16>("port"), 8080);
}

#[test]
fn test_failure_propagates_unchanged_through_factories() {
    let registry = Registry::new();
    registry.register("outer", Definition::try_factory(|r| r.get::<u8>("inner").map(|v| *v)));
    registry.register("inner", Definition::type_name("app::Nowhere"));

    match registry.get_any("outer") {
        Err(DiError::InvalidDefinition(name)) => assert_eq!(name, "inner"),
        _ => panic!("Expected InvalidDefinition from the nested service"),
    }
    assert!(!registry.is_cached("outer"));
    assert!(!registry.is_cached("inner"));
}

#[test]
#[should_panic(expected = "failed to resolve required service missing")]
fn test_get_required_panics() {
    let registry = Registry::new();
    let _ = registry.get_required::<u8>("missing");
}

#[test]
fn test_registration_queries() {
    let registry = Registry::new();
    registry.register("a", Definition::instance(()));

    assert!(registry.is_registered("a"));
    assert!(!registry.is_cached("a"));
    registry.get_any("a").unwrap();
    assert!(registry.is_cached("a"));
    assert!(!registry.is_registered("b"));
}
