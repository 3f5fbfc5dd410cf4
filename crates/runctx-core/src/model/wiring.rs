//! Resolver contract types for existing wiring state
//!
//! A run always starts from no wiring, so these only appear as empty
//! collections and as arguments to unsupported operations.

use std::sync::Arc;

use crate::model::capability::Capability;
use crate::model::requirement::Requirement;
use crate::model::resource::Resource;

/// One satisfied requirement
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub requirement: Requirement,
    pub capability: Capability,
}

/// Wires of an already resolved resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wiring {
    pub required: Vec<Wire>,
    pub provided: Vec<Wire>,
}

/// Capability of an attached fragment, re-hosted on its host resource
#[derive(Debug, Clone, PartialEq)]
pub struct HostedCapability {
    pub host: Arc<Resource>,
    pub declared: Capability,
}
