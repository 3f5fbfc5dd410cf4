use std::fmt;
use std::sync::Arc;

use crate::model::attrs::{AttrValue, Attrs, Directives};
use crate::model::capability::Capability;
use crate::model::namespace::{
    CONTRACT_NAMESPACE, CONTRACT_OSGI_FRAMEWORK, IDENTITY_NAMESPACE, IDENTITY_TYPE_ATTRIBUTE,
    VERSION_ATTRIBUTE,
};
use crate::model::requirement::Requirement;
use crate::model::version::Version;

/// A capability as declared by its resource, without the back-reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityDecl {
    pub namespace: String,
    pub attributes: Attrs,
    pub directives: Directives,
}

/// Artifact description: the capabilities it offers and the requirements it has
///
/// Resources are shared as `Arc<Resource>`; a `Capability` handed out by a
/// repository points back at the `Arc` it was declared by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Resource {
    capabilities: Vec<CapabilityDecl>,
    requirements: Vec<Requirement>,
}

impl Resource {
    pub fn builder() -> ResourceBuilder {
        ResourceBuilder::default()
    }

    /// Capabilities of this resource, optionally restricted to one namespace
    pub fn capabilities(self: &Arc<Self>, namespace: Option<&str>) -> Vec<Capability> {
        self.capabilities
            .iter()
            .enumerate()
            .filter(|(_, decl)| namespace.map_or(true, |ns| decl.namespace == ns))
            .map(|(index, _)| Capability::new(Arc::clone(self), index))
            .collect()
    }

    /// Declarations in `namespace`, without building capability handles
    pub fn declarations<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a CapabilityDecl> {
        self.capabilities
            .iter()
            .filter(move |decl| decl.namespace == namespace)
    }

    pub(crate) fn declaration(&self, index: usize) -> &CapabilityDecl {
        &self.capabilities[index]
    }

    pub fn requirements(&self, namespace: Option<&str>) -> Vec<&Requirement> {
        self.requirements
            .iter()
            .filter(|req| namespace.map_or(true, |ns| req.namespace() == ns))
            .collect()
    }

    /// Symbolic name from the identity capability
    pub fn identity(&self) -> Option<&str> {
        self.declarations(IDENTITY_NAMESPACE)
            .next()
            .and_then(|decl| decl.attributes.get(IDENTITY_NAMESPACE))
            .and_then(AttrValue::as_str)
    }

    /// Raw version attribute of the identity capability
    pub fn version_attribute(&self) -> Option<&AttrValue> {
        self.declarations(IDENTITY_NAMESPACE)
            .next()
            .and_then(|decl| decl.attributes.get(VERSION_ATTRIBUTE))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity().unwrap_or("<anonymous>"))?;
        if let Some(version) = self.version_attribute() {
            write!(f, ";version={}", version)?;
        }
        Ok(())
    }
}

/// Builder for `Arc<Resource>`
#[derive(Debug, Default)]
pub struct ResourceBuilder {
    resource: Resource,
}

impl ResourceBuilder {
    /// Add the identity capability (`type=osgi.bundle`)
    pub fn identity(self, name: impl Into<String>, version: Version) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert(IDENTITY_NAMESPACE.to_string(), AttrValue::String(name.into()));
        attrs.insert(VERSION_ATTRIBUTE.to_string(), AttrValue::Version(version));
        attrs.insert(
            IDENTITY_TYPE_ATTRIBUTE.to_string(),
            AttrValue::String("osgi.bundle".to_string()),
        );
        self.capability(IDENTITY_NAMESPACE, attrs)
    }

    /// Add an `osgi.contract` capability
    pub fn contract(self, name: impl Into<String>, version: Version) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert(CONTRACT_NAMESPACE.to_string(), AttrValue::String(name.into()));
        attrs.insert(VERSION_ATTRIBUTE.to_string(), AttrValue::Version(version));
        self.capability(CONTRACT_NAMESPACE, attrs)
    }

    /// Mark the resource as a framework implementation
    pub fn framework_contract(self, version: Version) -> Self {
        self.contract(CONTRACT_OSGI_FRAMEWORK, version)
    }

    pub fn capability(self, namespace: impl Into<String>, attributes: Attrs) -> Self {
        self.capability_with_directives(namespace, attributes, Directives::new())
    }

    pub fn capability_with_directives(
        mut self,
        namespace: impl Into<String>,
        attributes: Attrs,
        directives: Directives,
    ) -> Self {
        self.resource.capabilities.push(CapabilityDecl {
            namespace: namespace.into(),
            attributes,
            directives,
        });
        self
    }

    pub fn requirement(mut self, requirement: Requirement) -> Self {
        self.resource.requirements.push(requirement);
        self
    }

    pub fn build(self) -> Arc<Resource> {
        Arc::new(self.resource)
    }
}
