//! Source of the repositories available to a run

use std::fmt;
use std::sync::Arc;

use crate::repository::Repository;

/// Supplies every repository the environment knows about, in registry order
///
/// Injected into the resolve context; the context never looks repositories
/// up anywhere else.
pub trait PluginRegistry: Send + Sync {
    fn repositories(&self) -> Vec<Arc<dyn Repository>>;
}

/// Registry over a fixed list of repositories
#[derive(Default, Clone)]
pub struct Registry {
    repositories: Vec<Arc<dyn Repository>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, repository: Arc<dyn Repository>) -> Self {
        self.repositories.push(repository);
        self
    }

    pub fn register(&mut self, repository: Arc<dyn Repository>) {
        self.repositories.push(repository);
    }
}

impl PluginRegistry for Registry {
    fn repositories(&self) -> Vec<Arc<dyn Repository>> {
        self.repositories.clone()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.repositories.iter().map(|r| r.name()))
            .finish()
    }
}
