//! Framework selection
//!
//! Finds the highest-version framework implementation matching the run's
//! framework header and wraps it as a one-resource repository.

#![allow(clippy::result_large_err)]

use std::sync::Arc;

use crate::errors::{ResolveError, Result};
use crate::header::parse_header;
use crate::model::namespace::{
    CONTRACT_NAMESPACE, CONTRACT_OSGI_FRAMEWORK, IDENTITY_NAMESPACE, VERSION_ATTRIBUTE,
};
use crate::model::{AttrValue, Filter, Requirement, Resource, Version, VersionRange};
use crate::repository::{providers_for, Repository, SingletonResourceRepository};

/// Parsed framework header: one identity and an optional version range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkSpec {
    pub identity: String,
    pub range: Option<VersionRange>,
}

impl FrameworkSpec {
    /// Parse `identity;version=range`
    ///
    /// # Errors
    ///
    /// `MultipleFrameworks` when the header names more than one identity,
    /// `InvalidHeader`/`InvalidVersionRange` when it is malformed.
    pub fn parse(header: &str) -> Result<Self> {
        let mut entries = parse_header(header)?;
        if entries.len() > 1 {
            return Err(ResolveError::MultipleFrameworks {
                header: header.to_string(),
            });
        }
        let entry = entries.pop().ok_or_else(|| ResolveError::InvalidHeader {
            header: header.to_string(),
            reason: "no framework named".to_string(),
        })?;

        let range = entry
            .attribute(VERSION_ATTRIBUTE)
            .map(VersionRange::parse)
            .transpose()?;

        Ok(Self {
            identity: entry.name,
            range,
        })
    }

    /// Identity requirement used to search the repositories
    ///
    /// The range is not part of the filter: candidate versions may be
    /// declared as strings, which a filter would compare lexically.
    pub fn to_requirement(&self) -> Requirement {
        Requirement::new(IDENTITY_NAMESPACE)
            .with_filter(&Filter::eq(IDENTITY_NAMESPACE, self.identity.clone()))
    }

    /// Whether `version` lies in the requested range; no range accepts all
    pub fn accepts(&self, version: &Version) -> bool {
        self.range.as_ref().map_or(true, |range| range.includes(version))
    }
}

/// The framework chosen for a run
#[derive(Debug, Clone)]
pub struct FrameworkSelection {
    pub resource: Arc<Resource>,
    pub version: Version,
    pub repository: SingletonResourceRepository,
}

/// Whether `resource` declares the framework contract capability
pub fn is_framework_resource(resource: &Resource) -> bool {
    resource.declarations(CONTRACT_NAMESPACE).any(|decl| {
        decl.attributes
            .get(CONTRACT_NAMESPACE)
            .and_then(AttrValue::as_str)
            == Some(CONTRACT_OSGI_FRAMEWORK)
    })
}

/// Normalise a version attribute
///
/// `None` stays `None`; strings are parsed.
///
/// # Errors
///
/// `VersionConversion` for any other representation or an unparseable
/// string.
pub fn to_version(value: Option<&AttrValue>) -> Result<Option<Version>> {
    match value {
        None => Ok(None),
        Some(AttrValue::Version(v)) => Ok(Some(v.clone())),
        Some(AttrValue::String(s)) => {
            Version::parse(s)
                .map(Some)
                .map_err(|e| ResolveError::VersionConversion {
                    found: format!("String '{}' ({})", s, e.reason),
                })
        }
        Some(other) => Err(ResolveError::VersionConversion {
            found: format!("type {}", other.type_name()),
        }),
    }
}

/// Search `repositories` in order for the best framework matching `header`
///
/// Returns `Ok(None)` when no header is configured or nothing matches;
/// absence is reported later by whoever needs the framework.
///
/// # Errors
///
/// Header parse errors, `VersionConversion` for a candidate with an
/// unusable version, and any repository failure.
pub fn locate_framework(
    repositories: &[Arc<dyn Repository>],
    header: Option<&str>,
) -> Result<Option<FrameworkSelection>> {
    let Some(header) = header else {
        return Ok(None);
    };

    let spec = FrameworkSpec::parse(header)?;
    let requirement = spec.to_requirement();

    let mut best: Option<(Arc<Resource>, Version)> = None;
    for repo in repositories {
        for capability in providers_for(repo.as_ref(), &requirement)? {
            if !is_framework_resource(capability.resource()) {
                tracing::debug!(
                    repository = repo.name(),
                    resource = %capability.resource(),
                    "identity match is not a framework implementation"
                );
                continue;
            }

            let Some(found) = to_version(capability.attribute(VERSION_ATTRIBUTE))? else {
                continue;
            };
            if !spec.accepts(&found) {
                tracing::debug!(
                    repository = repo.name(),
                    framework = %capability.resource(),
                    version = %found,
                    "framework candidate outside requested range"
                );
                continue;
            }

            let better = best.as_ref().map_or(true, |(_, current)| found > *current);
            if better {
                tracing::debug!(
                    repository = repo.name(),
                    framework = %capability.resource(),
                    version = %found,
                    "framework candidate selected"
                );
                best = Some((Arc::clone(capability.resource()), found));
            }
        }
    }

    Ok(best.map(|(resource, version)| FrameworkSelection {
        repository: SingletonResourceRepository::new(Arc::clone(&resource)),
        resource,
        version,
    }))
}
