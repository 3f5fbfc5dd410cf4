//! Shared fixtures for the integration test suites

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use runctx_core::model::{Attrs, Filter};
use runctx_core::{
    Capability, InMemoryRepository, PluginRegistry, Registry, Repository, Requirement, Resource,
    ResolveError, Version,
};

pub const PACKAGE_NAMESPACE: &str = "osgi.wiring.package";

/// Package capability attributes
#[allow(dead_code)]
pub fn package(name: &str) -> Attrs {
    let mut attrs = Attrs::new();
    attrs.insert(PACKAGE_NAMESPACE.to_string(), name.into());
    attrs
}

/// Framework implementation exporting `org.osgi.framework`
#[allow(dead_code)]
pub fn framework(name: &str, version: &str) -> Arc<Resource> {
    Resource::builder()
        .identity(name, Version::parse(version).unwrap())
        .framework_contract(Version::new(1, 0, 0))
        .capability(PACKAGE_NAMESPACE, package("org.osgi.framework"))
        .build()
}

/// Plain bundle exporting the given packages
#[allow(dead_code)]
pub fn bundle(name: &str, version: &str, packages: &[&str]) -> Arc<Resource> {
    packages.iter().fold(
        Resource::builder().identity(name, Version::parse(version).unwrap()),
        |builder, pkg| builder.capability(PACKAGE_NAMESPACE, package(pkg)),
    )
    .build()
}

/// Requirement for one package
#[allow(dead_code)]
pub fn package_requirement(name: &str) -> Requirement {
    Requirement::new(PACKAGE_NAMESPACE).with_filter(&Filter::eq(PACKAGE_NAMESPACE, name))
}

/// Identity names of the resources behind `capabilities`, in order
#[allow(dead_code)]
pub fn owners(capabilities: &[Capability]) -> Vec<String> {
    capabilities
        .iter()
        .map(|c| c.resource().to_string())
        .collect()
}

/// Registry that counts how often its repositories are loaded
#[allow(dead_code)]
#[derive(Default)]
pub struct CountingRegistry {
    inner: Registry,
    loads: AtomicUsize,
}

#[allow(dead_code)]
impl CountingRegistry {
    pub fn new(inner: Registry) -> Self {
        Self {
            inner,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl PluginRegistry for CountingRegistry {
    fn repositories(&self) -> Vec<Arc<dyn Repository>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.repositories()
    }
}

/// Repository wrapper that counts provider queries
#[allow(dead_code)]
#[derive(Debug)]
pub struct CountingRepository {
    inner: InMemoryRepository,
    queries: AtomicUsize,
}

#[allow(dead_code)]
impl CountingRepository {
    pub fn new(inner: InMemoryRepository) -> Self {
        Self {
            inner,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Repository for CountingRepository {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn find_providers(
        &self,
        requirements: &[Requirement],
    ) -> runctx_core::Result<HashMap<Requirement, Vec<Capability>>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.find_providers(requirements)
    }
}

/// Repository whose every query fails
#[allow(dead_code)]
#[derive(Debug)]
pub struct FailingRepository {
    pub name: String,
}

impl Repository for FailingRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_providers(
        &self,
        _requirements: &[Requirement],
    ) -> runctx_core::Result<HashMap<Requirement, Vec<Capability>>> {
        Err(ResolveError::Repository {
            repository: self.name.clone(),
            message: "index unavailable".to_string(),
        })
    }
}
