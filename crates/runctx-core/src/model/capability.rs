use std::fmt;
use std::sync::Arc;

use crate::model::attrs::{AttrValue, Attrs, Directives};
use crate::model::resource::Resource;

/// Offer made by a resource: namespace, attributes and the declaring resource
///
/// Cheap to clone; it holds the resource `Arc` and the declaration index.
#[derive(Clone)]
pub struct Capability {
    resource: Arc<Resource>,
    index: usize,
}

impl Capability {
    pub(crate) fn new(resource: Arc<Resource>, index: usize) -> Self {
        Self { resource, index }
    }

    pub fn namespace(&self) -> &str {
        &self.resource.declaration(self.index).namespace
    }

    pub fn attributes(&self) -> &Attrs {
        &self.resource.declaration(self.index).attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttrValue> {
        self.attributes().get(key)
    }

    pub fn directives(&self) -> &Directives {
        &self.resource.declaration(self.index).directives
    }

    /// The resource that declares this capability
    pub fn resource(&self) -> &Arc<Resource> {
        &self.resource
    }
}

impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && (Arc::ptr_eq(&self.resource, &other.resource) || self.resource == other.resource)
    }
}

impl Eq for Capability {}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("namespace", &self.namespace())
            .field("attributes", self.attributes())
            .field("resource", &self.resource.to_string())
            .finish()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {}", self.namespace(), self.resource)
    }
}
