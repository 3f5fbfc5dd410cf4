use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::model::{Capability, Requirement, Resource};
use crate::repository::{answer_all, Repository};

/// Named, fixed list of resources held in memory
///
/// Answers requirements by namespace and filter match, in resource order.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    name: String,
    resources: Vec<Arc<Resource>>,
}

impl InMemoryRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resources: Vec::new(),
        }
    }

    pub fn with_resource(mut self, resource: Arc<Resource>) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_resources(mut self, resources: impl IntoIterator<Item = Arc<Resource>>) -> Self {
        self.resources.extend(resources);
        self
    }

    pub fn resources(&self) -> &[Arc<Resource>] {
        &self.resources
    }
}

impl Repository for InMemoryRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_providers(
        &self,
        requirements: &[Requirement],
    ) -> Result<HashMap<Requirement, Vec<Capability>>> {
        tracing::debug!(
            repository = %self.name,
            requirements = requirements.len(),
            "answering provider query"
        );
        answer_all(&self.resources, requirements)
    }
}
