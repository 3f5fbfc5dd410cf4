//! Candidate Provider Tests
//!
//! This test suite verifies provider lookup order, framework exclusion and
//! the effectiveness filter over declared requirements.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{bundle, framework, owners, package_requirement, FailingRepository};
use runctx_core::model::{HostedCapability, Wiring};
use runctx_core::{
    is_framework_resource, InMemoryRepository, Registry, Requirement, Resource, ResolveContext,
    ResolveError, RunResolveContext, RunSpec, Version,
};

fn context(spec: RunSpec, registry: Registry) -> RunResolveContext {
    RunResolveContext::new(spec, Arc::new(registry))
}

#[test]
fn test_framework_answers_first_then_repositories_in_order() {
    let fw = framework("org.apache.felix.framework", "5.6.10");
    let registry = Registry::new()
        .with_repository(Arc::new(
            InMemoryRepository::new("Release")
                .with_resource(fw.clone())
                .with_resource(bundle("osgi.core", "6.0.0", &["org.osgi.framework"])),
        ))
        .with_repository(Arc::new(InMemoryRepository::new("Workspace").with_resource(
            bundle("org.example.shim", "1.0.0", &["org.osgi.framework"]),
        )));
    let ctx = context(
        RunSpec::new().with_run_framework("org.apache.felix.framework"),
        registry,
    );

    let caps = ctx
        .find_providers(&package_requirement("org.osgi.framework"))
        .unwrap();

    assert_eq!(
        owners(&caps),
        vec![
            "org.apache.felix.framework;version=5.6.10",
            "osgi.core;version=6.0.0",
            "org.example.shim;version=1.0.0",
        ]
    );
    assert!(Arc::ptr_eq(caps[0].resource(), &fw));
}

#[test]
fn test_framework_tagged_resources_never_come_from_plain_repositories() {
    let selected = framework("org.apache.felix.framework", "5.6.10");
    let other = framework("org.eclipse.osgi", "3.18.0");
    let registry = Registry::new().with_repository(Arc::new(
        InMemoryRepository::new("Release")
            .with_resource(selected.clone())
            .with_resource(other)
            .with_resource(bundle("osgi.core", "6.0.0", &["org.osgi.framework"])),
    ));
    let ctx = context(
        RunSpec::new().with_run_framework("org.apache.felix.framework"),
        registry,
    );

    let caps = ctx
        .find_providers(&package_requirement("org.osgi.framework"))
        .unwrap();

    // Only the selected framework, queried first, may contribute a framework capability.
    let framework_caps: Vec<_> = caps
        .iter()
        .filter(|c| is_framework_resource(c.resource()))
        .collect();
    assert_eq!(framework_caps.len(), 1);
    assert!(Arc::ptr_eq(framework_caps[0].resource(), &selected));
    assert!(Arc::ptr_eq(caps[0].resource(), &selected));
    assert_eq!(caps.len(), 2);
}

#[test]
fn test_without_framework_all_framework_resources_are_excluded() {
    let registry = Registry::new().with_repository(Arc::new(
        InMemoryRepository::new("Release")
            .with_resource(framework("org.apache.felix.framework", "5.6.10"))
            .with_resource(bundle("osgi.core", "6.0.0", &["org.osgi.framework"])),
    ));
    let ctx = context(RunSpec::new(), registry);

    let caps = ctx
        .find_providers(&package_requirement("org.osgi.framework"))
        .unwrap();
    assert_eq!(owners(&caps), vec!["osgi.core;version=6.0.0"]);
}

#[test]
fn test_duplicates_across_repositories_are_kept() {
    let shared = bundle("org.example.api", "1.0.0", &["org.example.api"]);
    let registry = Registry::new()
        .with_repository(Arc::new(
            InMemoryRepository::new("A").with_resource(shared.clone()),
        ))
        .with_repository(Arc::new(InMemoryRepository::new("B").with_resource(shared)));
    let ctx = context(RunSpec::new(), registry);

    let caps = ctx
        .find_providers(&package_requirement("org.example.api"))
        .unwrap();
    assert_eq!(caps.len(), 2);
}

#[test]
fn test_repeated_queries_return_identical_order() {
    let registry = Registry::new()
        .with_repository(Arc::new(InMemoryRepository::new("A").with_resources([
            bundle("a1", "1.0.0", &["org.example"]),
            bundle("a2", "2.0.0", &["org.example"]),
        ])))
        .with_repository(Arc::new(
            InMemoryRepository::new("B").with_resource(bundle("b1", "1.0.0", &["org.example"])),
        ));
    let ctx = context(RunSpec::new(), registry);
    let requirement = package_requirement("org.example");

    let first = ctx.find_providers(&requirement).unwrap();
    let second = ctx.find_providers(&requirement).unwrap();
    assert_eq!(first, second);
    assert_eq!(owners(&first), vec!["a1;version=1.0.0", "a2;version=2.0.0", "b1;version=1.0.0"]);
}

#[test]
fn test_no_matches_yields_empty_list() {
    let registry = Registry::new().with_repository(Arc::new(
        InMemoryRepository::new("A").with_resource(bundle("a", "1.0.0", &["org.example"])),
    ));
    let ctx = context(RunSpec::new(), registry);

    assert!(ctx
        .find_providers(&package_requirement("org.unknown"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_repository_failure_propagates() {
    let registry = Registry::new()
        .with_repository(Arc::new(
            InMemoryRepository::new("A").with_resource(bundle("a", "1.0.0", &["org.example"])),
        ))
        .with_repository(Arc::new(FailingRepository {
            name: "Remote".to_string(),
        }));
    let ctx = context(RunSpec::new(), registry);

    let err = ctx
        .find_providers(&package_requirement("org.example"))
        .unwrap_err();
    assert_eq!(
        err,
        ResolveError::Repository {
            repository: "Remote".to_string(),
            message: "index unavailable".to_string(),
        }
    );
}

#[test]
fn test_mandatory_resources_is_selected_framework() {
    let fw = framework("org.apache.felix.framework", "5.6.10");
    let registry = Registry::new()
        .with_repository(Arc::new(InMemoryRepository::new("Release").with_resource(fw.clone())));
    let ctx = context(
        RunSpec::new().with_run_framework("org.apache.felix.framework"),
        registry,
    );

    let mandatory = ctx.mandatory_resources().unwrap();
    assert_eq!(mandatory.len(), 1);
    assert!(Arc::ptr_eq(&mandatory[0], &fw));
}

#[test]
fn test_mandatory_resources_empty_without_framework() {
    let ctx = context(RunSpec::new(), Registry::new());
    assert!(ctx.mandatory_resources().unwrap().is_empty());
}

#[test]
fn test_optional_resources_not_supported() {
    let ctx = context(RunSpec::new(), Registry::new());
    let err = ctx.optional_resources().unwrap_err();
    assert_eq!(err, ResolveError::not_supported("optional_resources"));
}

#[test]
fn test_insert_hosted_capability_not_supported_and_list_untouched() {
    let host = bundle("host", "1.0.0", &["org.example"]);
    let fragment = bundle("fragment", "1.0.0", &["org.example.extra"]);
    let ctx = context(RunSpec::new(), Registry::new());

    let mut caps = host.capabilities(Some(common::PACKAGE_NAMESPACE));
    let before = caps.clone();
    let hosted = HostedCapability {
        host: host.clone(),
        declared: fragment.capabilities(Some(common::PACKAGE_NAMESPACE))[0].clone(),
    };

    let err = ctx.insert_hosted_capability(&mut caps, hosted).unwrap_err();
    assert_eq!(err, ResolveError::not_supported("insert_hosted_capability"));
    assert_eq!(caps, before);
}

#[test]
fn test_wirings_always_empty() {
    let ctx = context(RunSpec::new(), Registry::new());
    let wirings = ctx.wirings();
    assert!(wirings.is_empty());
    assert_eq!(wirings.get(&bundle("x", "1.0.0", &[])), None::<&Wiring>);
}

#[test]
fn test_context_is_usable_as_trait_object() {
    let ctx: Box<dyn ResolveContext> = Box::new(context(RunSpec::new(), Registry::new()));
    assert!(ctx.is_effective(&Requirement::new("osgi.wiring.package")));
    assert!(!ctx.is_effective(
        &Requirement::new("osgi.service").with_directive("effective", "active")
    ));
}

#[test]
fn test_declared_requirements_filtered_by_effectiveness() {
    let client = Resource::builder()
        .identity("org.example.client", Version::new(1, 0, 0))
        .requirement(package_requirement("org.example.api"))
        .requirement(package_requirement("org.example.optional").with_directive("effective", "active"))
        .build();
    let registry = Registry::new().with_repository(Arc::new(InMemoryRepository::new("A").with_resources([
        bundle("org.example.api", "1.0.0", &["org.example.api"]),
        bundle("org.example.optional", "1.0.0", &["org.example.optional"]),
    ])));
    let ctx = context(RunSpec::new(), registry);

    let mut resolved = Vec::new();
    for requirement in client.requirements(Some(common::PACKAGE_NAMESPACE)) {
        if ctx.is_effective(requirement) {
            resolved.extend(owners(&ctx.find_providers(requirement).unwrap()));
        }
    }

    assert_eq!(resolved, vec!["org.example.api;version=1.0.0"]);
}
