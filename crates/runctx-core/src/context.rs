//! Resolve context for one resolution run
//!
//! `RunResolveContext` is what the resolver engine talks to. On first use it
//! selects the run's repositories and locates the framework, exactly once,
//! then answers provider queries against that fixed snapshot.
//!
//! ## Logging Ownership
//!
//! The context owns lifecycle logging (`resolve_context_init`,
//! `mandatory_resources`). Per-query detail goes to `tracing::debug!`.

#![allow(clippy::result_large_err)]

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::time::Instant;

use runctx_core_types::{RunContext, RunId};

use crate::effective;
use crate::errors::{ExError, ResolveError, Result};
use crate::framework::{is_framework_resource, locate_framework, FrameworkSelection};
use crate::model::{Capability, HostedCapability, Requirement, Resource, Wiring};
use crate::registry::PluginRegistry;
use crate::repository::{providers_for, Repository};
use crate::run_spec::RunSpec;
use crate::selector::select_repositories;
use crate::{log_op_end, log_op_error, log_op_start};

/// Contract between the resolver engine and its source of candidates
pub trait ResolveContext: Send + Sync {
    /// Resources that must be part of every solution
    ///
    /// # Errors
    ///
    /// `FrameworkNotFound` when a framework was requested but not located.
    fn mandatory_resources(&self) -> Result<Vec<Arc<Resource>>>;

    /// Resources the resolver should try to include
    ///
    /// # Errors
    ///
    /// Always `NotSupported` in this implementation.
    fn optional_resources(&self) -> Result<Vec<Arc<Resource>>>;

    /// Ordered candidates for `requirement`
    ///
    /// # Errors
    ///
    /// Initialisation and repository failures.
    fn find_providers(&self, requirement: &Requirement) -> Result<Vec<Capability>>;

    /// Insert a hosted capability into a candidate list, returning its index
    ///
    /// # Errors
    ///
    /// Always `NotSupported` in this implementation.
    fn insert_hosted_capability(
        &self,
        capabilities: &mut Vec<Capability>,
        hosted: HostedCapability,
    ) -> Result<usize>;

    /// Whether `requirement` applies during this resolve pass
    fn is_effective(&self, requirement: &Requirement) -> bool;

    /// Existing wiring the resolution starts from
    fn wirings(&self) -> HashMap<Arc<Resource>, Wiring>;
}

/// Repositories and framework fixed for the rest of a run
#[derive(Debug)]
pub struct ResolutionState {
    repositories: Vec<Arc<dyn Repository>>,
    framework: Option<FrameworkSelection>,
}

impl ResolutionState {
    /// Repositories in query order (the framework repository is not included)
    pub fn repositories(&self) -> &[Arc<dyn Repository>] {
        &self.repositories
    }

    pub fn framework(&self) -> Option<&FrameworkSelection> {
        self.framework.as_ref()
    }
}

enum InitState {
    Uninitialized,
    Initializing,
    /// Outcome of the single initialisation attempt; never retried
    Ready(Result<Arc<ResolutionState>>),
}

/// `ResolveContext` driven by a `RunSpec` and a `PluginRegistry`
pub struct RunResolveContext {
    run: RunContext,
    run_spec: RunSpec,
    registry: Arc<dyn PluginRegistry>,
    added: Vec<Arc<dyn Repository>>,
    state: Mutex<InitState>,
    ready: Condvar,
}

impl RunResolveContext {
    pub fn new(run_spec: RunSpec, registry: Arc<dyn PluginRegistry>) -> Self {
        let run = match run_spec.source() {
            Some(source) => RunContext::new().with_label(source),
            None => RunContext::new(),
        };
        Self {
            run,
            run_spec,
            registry,
            added: Vec::new(),
            state: Mutex::new(InitState::Uninitialized),
            ready: Condvar::new(),
        }
    }

    /// Replace the generated run context, e.g. to reuse the resolver's run id
    pub fn with_run_context(mut self, run: RunContext) -> Self {
        self.run = run;
        self
    }

    pub fn run_id(&self) -> &RunId {
        &self.run.run_id
    }

    pub fn run_spec(&self) -> &RunSpec {
        &self.run_spec
    }

    /// Add a repository ahead of the registry's repositories
    ///
    /// Added repositories are not subject to the `run_repos` filter.
    ///
    /// # Errors
    ///
    /// `AlreadyInitialised` once the context has started initialising.
    pub fn add_repository(&mut self, repository: Arc<dyn Repository>) -> Result<()> {
        match self.state.get_mut()? {
            InitState::Uninitialized => {
                self.added.push(repository);
                Ok(())
            }
            InitState::Initializing | InitState::Ready(_) => Err(ResolveError::AlreadyInitialised {
                op: "add_repository".to_string(),
            }),
        }
    }

    /// Run initialisation if nobody has yet, otherwise wait for its outcome
    ///
    /// Every caller observes the same snapshot, or the same error.
    ///
    /// # Errors
    ///
    /// The initialisation error, or `LockPoisoned`.
    pub fn ensure_ready(&self) -> Result<Arc<ResolutionState>> {
        let mut state = self.state.lock()?;
        loop {
            if let InitState::Ready(outcome) = &*state {
                return outcome.clone();
            }
            if matches!(*state, InitState::Uninitialized) {
                break;
            }
            state = self.ready.wait(state)?;
        }
        *state = InitState::Initializing;
        drop(state);

        let mut publish = Publish {
            context: self,
            outcome: None,
        };
        let outcome = self.initialise().map(Arc::new);
        publish.outcome = Some(outcome.clone());
        drop(publish);
        outcome
    }

    fn initialise(&self) -> Result<ResolutionState> {
        log_op_start!("resolve_context_init", run_id = %self.run.run_id);
        let start = Instant::now();

        let result = self.load_state();
        match &result {
            Ok(state) => {
                let (framework, framework_version) = state
                    .framework()
                    .map(|fw| (fw.resource.to_string(), fw.version.to_string()))
                    .unwrap_or_default();
                log_op_end!(
                    "resolve_context_init",
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = %self.run.run_id,
                    repo_count = state.repositories.len() as u64,
                    framework = %framework,
                    framework_version = %framework_version
                );
            }
            Err(err) => {
                log_op_error!(
                    "resolve_context_init",
                    ExError::from(err.clone()).with_run_id(self.run.run_id.clone()),
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = %self.run.run_id
                );
            }
        }
        result
    }

    fn load_state(&self) -> Result<ResolutionState> {
        let mut repositories = self.added.clone();
        repositories.extend(select_repositories(
            self.registry.repositories(),
            &self.run_spec,
        ));

        let framework = locate_framework(&repositories, self.run_spec.run_framework())?;
        Ok(ResolutionState {
            repositories,
            framework,
        })
    }
}

/// Stores the init outcome and wakes waiters, even if init panicked
struct Publish<'a> {
    context: &'a RunResolveContext,
    outcome: Option<Result<Arc<ResolutionState>>>,
}

impl Drop for Publish<'_> {
    fn drop(&mut self) {
        let outcome = self
            .outcome
            .take()
            .unwrap_or(Err(ResolveError::LockPoisoned));
        let mut state = self
            .context
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *state = InitState::Ready(outcome);
        self.context.ready.notify_all();
    }
}

impl ResolveContext for RunResolveContext {
    fn mandatory_resources(&self) -> Result<Vec<Arc<Resource>>> {
        log_op_start!("mandatory_resources", run_id = %self.run.run_id);
        let start = Instant::now();

        let result = self.ensure_ready().and_then(|state| {
            match (state.framework(), self.run_spec.run_framework()) {
                (Some(framework), _) => Ok(vec![Arc::clone(&framework.resource)]),
                (None, Some(header)) => Err(ResolveError::FrameworkNotFound {
                    framework: header.to_string(),
                }),
                (None, None) => Ok(Vec::new()),
            }
        });

        match &result {
            Ok(resources) => {
                log_op_end!(
                    "mandatory_resources",
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = %self.run.run_id,
                    candidate_count = resources.len() as u64
                );
            }
            Err(err) => {
                log_op_error!(
                    "mandatory_resources",
                    ExError::from(err.clone()).with_run_id(self.run.run_id.clone()),
                    duration_ms = start.elapsed().as_millis() as u64,
                    run_id = %self.run.run_id
                );
            }
        }
        result
    }

    fn optional_resources(&self) -> Result<Vec<Arc<Resource>>> {
        Err(ResolveError::not_supported("optional_resources"))
    }

    fn find_providers(&self, requirement: &Requirement) -> Result<Vec<Capability>> {
        let state = self.ensure_ready()?;
        let mut result = Vec::new();

        // The selected framework always gets the first chance to provide.
        if let Some(framework) = state.framework() {
            result.extend(providers_for(&framework.repository, requirement)?);
        }

        for repo in state.repositories() {
            let capabilities = providers_for(repo.as_ref(), requirement)?;
            result.reserve(capabilities.len());
            result.extend(
                capabilities
                    .into_iter()
                    .filter(|cap| !is_framework_resource(cap.resource())),
            );
        }

        tracing::debug!(
            run_id = %self.run.run_id,
            namespace = requirement.namespace(),
            candidate_count = result.len() as u64,
            "providers found"
        );
        Ok(result)
    }

    fn insert_hosted_capability(
        &self,
        _capabilities: &mut Vec<Capability>,
        _hosted: HostedCapability,
    ) -> Result<usize> {
        Err(ResolveError::not_supported("insert_hosted_capability"))
    }

    fn is_effective(&self, requirement: &Requirement) -> bool {
        effective::is_effective(requirement)
    }

    fn wirings(&self) -> HashMap<Arc<Resource>, Wiring> {
        HashMap::new()
    }
}

impl fmt::Debug for RunResolveContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunResolveContext")
            .field("run_id", &self.run.run_id)
            .field("run_spec", &self.run_spec)
            .field("added", &self.added.len())
            .finish_non_exhaustive()
    }
}
