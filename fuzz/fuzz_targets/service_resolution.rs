#![no_main]

use autowire_di::{Definition, DiError, Registry, RegistryOptions, Resolver, ResolverCore};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

const NODES: u8 = 8;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the depth limit, the rest describe edges between
    // numbered services. Any graph, cyclic or not, must resolve or fail
    // cleanly.
    let max_depth = (data[0] as usize % 16) + 1;
    let registry = Registry::with_options(RegistryOptions::default().max_depth(max_depth));

    let mut edges: Vec<Vec<u8>> = vec![Vec::new(); NODES as usize];
    for pair in data[1..].chunks_exact(2) {
        edges[(pair[0] % NODES) as usize].push(pair[1] % NODES);
    }

    for (node, targets) in edges.into_iter().enumerate() {
        let targets: Arc<[u8]> = targets.into();
        registry.register(
            format!("node.{}", node),
            Definition::try_factory(move |r| {
                let mut sum = 1u64;
                for target in targets.iter() {
                    sum = sum.wrapping_add(*r.get::<u64>(&format!("node.{}", target))?);
                }
                Ok(sum)
            }),
        );
    }
    // Unregistered and mistyped lookups must fail, not panic.
    registry.register("node.mistyped", Definition::instance("text"));

    for node in 0..NODES {
        let name = format!("node.{}", node);
        match registry.get::<u64>(&name) {
            Ok(first) => {
                let second = registry.get::<u64>(&name).unwrap();
                assert!(Arc::ptr_eq(&first, &second));
            }
            Err(DiError::Circular(path)) => {
                assert!(path.len() >= 2);
                assert_eq!(path.first(), path.last());
            }
            Err(DiError::DepthExceeded(limit)) => assert_eq!(limit, max_depth),
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert!(matches!(registry.get_any("node.missing"), Err(DiError::NotFound(_))));
    assert!(matches!(
        registry.get::<u64>("node.mistyped"),
        Err(DiError::TypeMismatch { .. })
    ));
});
