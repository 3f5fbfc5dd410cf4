use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::model::{Capability, Requirement, Resource};
use crate::repository::{answer_all, Repository};

/// Repository view over exactly one resource
///
/// Used to put the selected framework in front of every other repository.
#[derive(Debug, Clone)]
pub struct SingletonResourceRepository {
    name: String,
    resource: [Arc<Resource>; 1],
}

impl SingletonResourceRepository {
    pub fn new(resource: Arc<Resource>) -> Self {
        Self {
            name: format!("singleton:{}", resource),
            resource: [resource],
        }
    }

    pub fn resource(&self) -> &Arc<Resource> {
        &self.resource[0]
    }
}

impl Repository for SingletonResourceRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn find_providers(
        &self,
        requirements: &[Requirement],
    ) -> Result<HashMap<Requirement, Vec<Capability>>> {
        answer_all(&self.resource, requirements)
    }
}
