//! Lazy Initialisation Tests
//!
//! This test suite verifies that resolution state is built once, on first use, across threads.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{bundle, framework, package_requirement, CountingRegistry};
use runctx_core::{
    InMemoryRepository, PluginRegistry, Registry, Repository, ResolveContext, RunResolveContext,
    RunSpec,
};

fn populated_registry() -> Registry {
    Registry::new().with_repository(Arc::new(
        InMemoryRepository::new("Release")
            .with_resource(framework("org.apache.felix.framework", "5.6.10"))
            .with_resource(bundle("osgi.core", "6.0.0", &["org.osgi.framework"])),
    ))
}

/// Registry slow enough that concurrent callers overlap with initialisation
struct SlowRegistry(CountingRegistry);

impl PluginRegistry for SlowRegistry {
    fn repositories(&self) -> Vec<Arc<dyn Repository>> {
        thread::sleep(Duration::from_millis(50));
        self.0.repositories()
    }
}

#[test]
fn test_registry_is_consulted_once_across_operations() {
    let registry = Arc::new(CountingRegistry::new(populated_registry()));
    let ctx = RunResolveContext::new(
        RunSpec::new().with_run_framework("org.apache.felix.framework"),
        registry.clone(),
    );
    assert_eq!(registry.loads(), 0, "construction must not initialise");

    let requirement = package_requirement("org.osgi.framework");
    ctx.mandatory_resources().unwrap();
    ctx.find_providers(&requirement).unwrap();
    ctx.find_providers(&requirement).unwrap();
    ctx.mandatory_resources().unwrap();

    assert_eq!(registry.loads(), 1);
}

#[test]
fn test_unsupported_operations_do_not_initialise() {
    let registry = Arc::new(CountingRegistry::new(populated_registry()));
    let ctx = RunResolveContext::new(RunSpec::new(), registry.clone());

    ctx.optional_resources().unwrap_err();
    assert!(ctx.wirings().is_empty());
    assert!(ctx.is_effective(&package_requirement("org.osgi.framework")));

    assert_eq!(registry.loads(), 0);
}

#[test]
fn test_concurrent_first_use_initialises_once() {
    let slow = Arc::new(SlowRegistry(CountingRegistry::new(populated_registry())));
    let ctx = RunResolveContext::new(
        RunSpec::new().with_run_framework("org.apache.felix.framework"),
        slow.clone(),
    );
    let requirement = package_requirement("org.osgi.framework");

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ctx = &ctx;
                let requirement = &requirement;
                scope.spawn(move || {
                    if i % 2 == 0 {
                        ctx.find_providers(requirement).unwrap().len()
                    } else {
                        ctx.mandatory_resources().unwrap().len()
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(slow.0.loads(), 1);
    for (i, count) in results.into_iter().enumerate() {
        let expected = if i % 2 == 0 { 2 } else { 1 };
        assert_eq!(count, expected, "caller {}", i);
    }
}

#[test]
fn test_concurrent_callers_share_one_snapshot() {
    let slow = Arc::new(SlowRegistry(CountingRegistry::new(populated_registry())));
    let ctx = RunResolveContext::new(RunSpec::new(), slow.clone());
    let ctx = &ctx;

    let snapshots: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || ctx.ensure_ready().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for snapshot in &snapshots[1..] {
        assert!(Arc::ptr_eq(&snapshots[0], snapshot));
    }
    assert_eq!(slow.0.loads(), 1);
}

#[test]
fn test_failed_initialisation_is_not_retried() {
    let registry = Arc::new(CountingRegistry::new(populated_registry()));
    let ctx = RunResolveContext::new(
        RunSpec::new().with_run_framework("org.apache.felix.framework;version='[1,'"),
        registry.clone(),
    );

    let first = ctx.mandatory_resources().unwrap_err();
    let second = ctx
        .find_providers(&package_requirement("org.osgi.framework"))
        .unwrap_err();

    assert_eq!(first, second);
    assert_eq!(registry.loads(), 1);
}
