use runctx_core_types::RunId;
use thiserror::Error;

/// Result type alias using ResolveError
pub type Result<T> = std::result::Result<T, ResolveError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in structured log events and
/// by callers that want to branch on the class of failure rather than on the
/// concrete `ResolveError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidConfiguration,
    TypeConversion,

    // Lookup
    NotFound,

    // Contract
    NotSupported,
    InvalidState,

    // Collaborators
    Repository,
    Io,
    Concurrency,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfiguration => "ERR_INVALID_CONFIGURATION",
            ExErrorKind::TypeConversion => "ERR_TYPE_CONVERSION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NotSupported => "ERR_NOT_SUPPORTED",
            ExErrorKind::InvalidState => "ERR_INVALID_STATE",
            ExErrorKind::Repository => "ERR_REPOSITORY",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used in log events plus enough context
/// (operation, subject, run) to trace a failure back to its run.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    subject: Option<String>,
    run_id: Option<RunId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            subject: None,
            run_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the subject the error is about (repository name, framework spec, ...)
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add run context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(subject) = &self.subject {
            write!(f, " (subject: {})", subject)?;
        }
        if let Some(run_id) = &self.run_id {
            write!(f, " (run_id: {})", run_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for run resolve context operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    // ===== Configuration Errors =====
    /// The framework header named more than one framework
    #[error("Cannot specify more than one OSGi Framework: {header}")]
    MultipleFrameworks { header: String },

    /// A version range string could not be parsed
    #[error("Invalid version range '{range}': {reason}")]
    InvalidVersionRange { range: String, reason: String },

    /// A header string could not be parsed
    #[error("Invalid header '{header}': {reason}")]
    InvalidHeader { header: String, reason: String },

    /// A filter expression could not be parsed
    #[error("Invalid filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    /// A run descriptor could not be parsed
    #[error("Invalid run descriptor: {message}")]
    RunSpecParse { message: String },

    // ===== Conversion Errors =====
    /// A version attribute could not be converted to a Version
    #[error("Cannot convert {found} to Version")]
    VersionConversion { found: String },

    // ===== Lookup Errors =====
    /// A framework was configured but no repository offered a match
    #[error("Could not find OSGi framework matching {framework}")]
    FrameworkNotFound { framework: String },

    // ===== Contract Errors =====
    /// The operation is deliberately not provided by this context
    #[error("Operation not supported: {op}")]
    NotSupported { op: String },

    /// The context was already initialised and can no longer be changed
    #[error("Resolve context already initialised; cannot {op}")]
    AlreadyInitialised { op: String },

    // ===== Collaborator Errors =====
    /// A repository failed while answering a query
    #[error("Repository {repository} failed: {message}")]
    Repository { repository: String, message: String },

    /// Reading a run descriptor failed
    #[error("I/O error: {message}")]
    Io { message: String },

    /// A previous initialiser panicked while holding the state lock
    #[error("Resolve context state lock poisoned")]
    LockPoisoned,
}

impl ResolveError {
    /// Shorthand for the `NotSupported` variant
    pub fn not_supported(op: impl Into<String>) -> Self {
        ResolveError::NotSupported { op: op.into() }
    }

    /// Get the canonical kind for this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            ResolveError::MultipleFrameworks { .. }
            | ResolveError::InvalidVersionRange { .. }
            | ResolveError::InvalidHeader { .. }
            | ResolveError::InvalidFilter { .. }
            | ResolveError::RunSpecParse { .. } => ExErrorKind::InvalidConfiguration,
            ResolveError::VersionConversion { .. } => ExErrorKind::TypeConversion,
            ResolveError::FrameworkNotFound { .. } => ExErrorKind::NotFound,
            ResolveError::NotSupported { .. } => ExErrorKind::NotSupported,
            ResolveError::AlreadyInitialised { .. } => ExErrorKind::InvalidState,
            ResolveError::Repository { .. } => ExErrorKind::Repository,
            ResolveError::Io { .. } => ExErrorKind::Io,
            ResolveError::LockPoisoned => ExErrorKind::Concurrency,
        }
    }
}

impl From<ResolveError> for ExError {
    fn from(err: ResolveError) -> Self {
        let message = err.to_string();
        let ex = ExError::new(err.kind()).with_message(message);
        match err {
            ResolveError::MultipleFrameworks { header } => ex.with_subject(header),
            ResolveError::InvalidVersionRange { range, .. } => ex.with_subject(range),
            ResolveError::InvalidHeader { header, .. } => ex.with_subject(header),
            ResolveError::InvalidFilter { filter, .. } => ex.with_subject(filter),
            ResolveError::FrameworkNotFound { framework } => ex
                .with_op("mandatory_resources")
                .with_subject(framework),
            ResolveError::NotSupported { op } => ex.with_op(op),
            ResolveError::AlreadyInitialised { op } => ex.with_op(op),
            ResolveError::Repository { repository, .. } => {
                ex.with_op("find_providers").with_subject(repository)
            }
            ResolveError::RunSpecParse { .. }
            | ResolveError::VersionConversion { .. }
            | ResolveError::Io { .. }
            | ResolveError::LockPoisoned => ex,
        }
    }
}

impl From<std::io::Error> for ResolveError {
    fn from(err: std::io::Error) -> Self {
        ResolveError::Io {
            message: err.to_string(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for ResolveError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        ResolveError::LockPoisoned
    }
}
