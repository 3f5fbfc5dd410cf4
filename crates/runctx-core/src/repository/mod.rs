//! Capability sources
//!
//! `Repository` is the seam to the outside world: real implementations
//! (indexes, workspaces, remote catalogues) live elsewhere and are handed to
//! the resolve context through a `PluginRegistry`.

pub mod memory;
pub mod singleton;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::Result;
use crate::model::{Capability, Requirement, Resource};

pub use memory::InMemoryRepository;
pub use singleton::SingletonResourceRepository;

/// Read-only source of capabilities
///
/// Implementations must be safe to query from several threads at once.
pub trait Repository: Send + Sync + fmt::Debug {
    /// Identity string used to select the repository by name
    fn name(&self) -> &str;

    /// Answer each requirement with the capabilities that satisfy it
    ///
    /// A requirement with no entry in the returned map has no providers.
    ///
    /// # Errors
    ///
    /// Implementation defined; errors propagate to the caller unchanged.
    fn find_providers(
        &self,
        requirements: &[Requirement],
    ) -> Result<HashMap<Requirement, Vec<Capability>>>;
}

/// Query one repository for a single requirement
///
/// # Errors
///
/// Whatever the repository reports.
pub fn providers_for(
    repository: &dyn Repository,
    requirement: &Requirement,
) -> Result<Vec<Capability>> {
    let mut answers = repository.find_providers(std::slice::from_ref(requirement))?;
    Ok(answers.remove(requirement).unwrap_or_default())
}

/// Whether `capability` satisfies `requirement`
///
/// Namespaces must be equal and the requirement's filter, if any, must match
/// the capability's attributes.
///
/// # Errors
///
/// `InvalidFilter` when the requirement's filter directive does not parse.
pub fn capability_matches(requirement: &Requirement, capability: &Capability) -> Result<bool> {
    if requirement.namespace() != capability.namespace() {
        return Ok(false);
    }
    Ok(requirement
        .filter()?
        .map_or(true, |filter| filter.matches(capability.attributes())))
}

/// Capabilities of `resources`, in order, that satisfy `requirement`
pub(crate) fn matching_capabilities<'a>(
    resources: impl IntoIterator<Item = &'a Arc<Resource>>,
    requirement: &Requirement,
) -> Result<Vec<Capability>> {
    let filter = requirement.filter()?;
    let mut matches = Vec::new();
    for resource in resources {
        for capability in resource.capabilities(Some(requirement.namespace())) {
            if filter
                .as_ref()
                .map_or(true, |f| f.matches(capability.attributes()))
            {
                matches.push(capability);
            }
        }
    }
    Ok(matches)
}

/// Answer every requirement against a fixed resource list
pub(crate) fn answer_all<'a>(
    resources: &'a [Arc<Resource>],
    requirements: &[Requirement],
) -> Result<HashMap<Requirement, Vec<Capability>>> {
    let mut answers = HashMap::with_capacity(requirements.len());
    for requirement in requirements {
        let matches = matching_capabilities(resources.iter(), requirement)?;
        if !matches.is_empty() {
            answers.insert(requirement.clone(), matches);
        }
    }
    Ok(answers)
}
