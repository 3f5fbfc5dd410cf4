//! Resolve context demonstration
//!
//! Builds two in-memory repositories, selects a framework from them and
//! answers a few provider queries the way a resolver engine would.

use std::sync::Arc;

use runctx_core::logging_facility::{init, Profile};
use runctx_core::model::{Attrs, Filter};
use runctx_core::{
    InMemoryRepository, Registry, Requirement, Resource, ResolveContext, RunResolveContext,
    RunSpec, Version,
};

fn package(name: &str) -> Attrs {
    let mut attrs = Attrs::new();
    attrs.insert("osgi.wiring.package".to_string(), name.into());
    attrs
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init(Profile::Development);

    let felix_4 = Resource::builder()
        .identity("org.apache.felix.framework", Version::new(4, 6, 1))
        .framework_contract(Version::new(1, 0, 0))
        .capability("osgi.wiring.package", package("org.osgi.framework"))
        .build();
    let felix_5 = Resource::builder()
        .identity("org.apache.felix.framework", Version::new(5, 6, 10))
        .framework_contract(Version::new(1, 0, 0))
        .capability("osgi.wiring.package", package("org.osgi.framework"))
        .build();
    let api = Resource::builder()
        .identity("org.example.api", Version::new(1, 0, 0))
        .capability("osgi.wiring.package", package("org.example.api"))
        .build();

    let registry = Registry::new()
        .with_repository(Arc::new(
            InMemoryRepository::new("Release").with_resources([felix_4, api]),
        ))
        .with_repository(Arc::new(
            InMemoryRepository::new("Workspace").with_resource(felix_5),
        ));

    let spec = RunSpec::from_bndrun_str(
        "-runfw: org.apache.felix.framework;version='[4,5)'\n-runrepos: Workspace, Release\n",
    )?;
    let ctx = RunResolveContext::new(spec, Arc::new(registry));

    for resource in ctx.mandatory_resources()? {
        println!("mandatory: {}", resource);
    }

    let requirement = Requirement::new("osgi.wiring.package")
        .with_filter(&Filter::eq("osgi.wiring.package", "org.osgi.framework"));
    for capability in ctx.find_providers(&requirement)? {
        println!("provider: {}", capability);
    }

    println!(
        "effective: {}",
        ctx.is_effective(&requirement.clone().with_directive("effective", "active"))
    );
    Ok(())
}
