//! Run resolve context
//!
//! Supplies candidate capabilities to a dependency resolver for one
//! resolution run:
//! - Repository selection and ordering from the run descriptor
//! - Framework location by identity and version range
//! - Per-requirement candidate lookup with the framework queried first
//! - Resolve-time effectiveness of requirements
//!
//! The resolver itself, real repository implementations and any CLI live
//! outside this crate.

pub mod context;
pub mod effective;
pub mod errors;
pub mod framework;
pub mod header;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod repository;
pub mod run_spec;
pub mod selector;

// Re-export commonly used types
pub use context::{ResolutionState, ResolveContext, RunResolveContext};
pub use errors::{ExError, ExErrorKind, ResolveError, Result};
pub use framework::{is_framework_resource, FrameworkSelection, FrameworkSpec};
pub use model::{Capability, Requirement, Resource, Version, VersionRange};
pub use registry::{PluginRegistry, Registry};
pub use repository::{InMemoryRepository, Repository, SingletonResourceRepository};
pub use run_spec::RunSpec;
