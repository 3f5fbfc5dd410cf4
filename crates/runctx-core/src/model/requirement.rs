use std::fmt;

use crate::errors::Result;
use crate::model::attrs::{AttrValue, Attrs, Directives};
use crate::model::filter::Filter;
use crate::model::namespace::FILTER_DIRECTIVE;

/// Query for capabilities in one namespace
///
/// Requirements are immutable for the life of a run and hashable so that
/// repositories can key their answers by them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    namespace: String,
    attributes: Attrs,
    directives: Directives,
}

impl Requirement {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            attributes: Attrs::new(),
            directives: Directives::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_directive(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.directives.insert(key.into(), value.into());
        self
    }

    /// Set the `filter` directive to the printed form of `filter`
    pub fn with_filter(self, filter: &Filter) -> Self {
        self.with_directive(FILTER_DIRECTIVE, filter.to_string())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn attributes(&self) -> &Attrs {
        &self.attributes
    }

    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives.get(key).map(String::as_str)
    }

    /// Parsed `filter` directive, `None` when the requirement has none
    ///
    /// # Errors
    ///
    /// `InvalidFilter` when the directive does not parse.
    pub fn filter(&self) -> Result<Option<Filter>> {
        self.directive(FILTER_DIRECTIVE)
            .map(Filter::parse)
            .transpose()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.namespace)?;
        if let Some(filter) = self.directive(FILTER_DIRECTIVE) {
            write!(f, " {}", filter)?;
        }
        Ok(())
    }
}
