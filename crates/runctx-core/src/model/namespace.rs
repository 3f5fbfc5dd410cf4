//! Well-known namespaces, attributes and directives

/// Namespace of the identity capability every resource declares
pub const IDENTITY_NAMESPACE: &str = "osgi.identity";

/// Namespace of contract capabilities
pub const CONTRACT_NAMESPACE: &str = "osgi.contract";

/// Contract name declared by framework implementations
pub const CONTRACT_OSGI_FRAMEWORK: &str = "OSGiFramework";

/// Version attribute on identity and contract capabilities
pub const VERSION_ATTRIBUTE: &str = "version";

/// Type attribute on identity capabilities
pub const IDENTITY_TYPE_ATTRIBUTE: &str = "type";

/// Requirement directive holding the filter expression
pub const FILTER_DIRECTIVE: &str = "filter";

/// Requirement directive naming the stage a requirement applies to
pub const EFFECTIVE_DIRECTIVE: &str = "effective";

/// `effective` value for requirements that apply while resolving
pub const EFFECTIVE_RESOLVE: &str = "resolve";

/// `effective` value for requirements that only apply at runtime
pub const EFFECTIVE_ACTIVE: &str = "active";
