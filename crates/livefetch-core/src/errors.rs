use std::sync::Arc;
use thiserror::Error;

use crate::snapshot::IndexPath;

/// Result type alias using FetchError
pub type Result<T> = std::result::Result<T, FetchError>;

/// Boxed error produced by a store connector
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in livefetch. Each kind maps to a stable error code that can be used for
/// programmatic error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Lookup
    InvalidIndexPath,

    // Fetch cycle
    ConnectorFailure,
    DuplicateIdentity,
    Usage,

    // Edit scripts
    InvalidEditScript,

    // Configuration / caller input
    InvalidInput,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidIndexPath => "ERR_INVALID_INDEX_PATH",
            ExErrorKind::ConnectorFailure => "ERR_CONNECTOR_FAILURE",
            ExErrorKind::DuplicateIdentity => "ERR_DUPLICATE_IDENTITY",
            ExErrorKind::Usage => "ERR_USAGE",
            ExErrorKind::InvalidEditScript => "ERR_INVALID_EDIT_SCRIPT",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Flattened view of a [`FetchError`] with classification fields, used by
/// the logging macros and by callers that only care about the error code.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    index_path: Option<IndexPath>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            index_path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add index path context
    pub fn with_index_path(mut self, index_path: IndexPath) -> Self {
        self.index_path = Some(index_path);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the index path context, if any
    pub fn index_path(&self) -> Option<IndexPath> {
        self.index_path
    }

    /// Get the error message
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
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (id: {})", entity_id)?;
        }
        if let Some(path) = self.index_path {
            write!(f, " (section: {}, row: {})", path.section, path.row)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for fetch, refresh and lookup operations
#[derive(Error, Debug, Clone)]
pub enum FetchError {
    /// Requested coordinate does not resolve inside the snapshot
    #[error("Invalid index path: row {row} in section {section}")]
    InvalidIndexPath { row: usize, section: usize },

    /// Requested section does not exist in the snapshot
    #[error("Invalid section: {section}")]
    InvalidSection { section: usize },

    /// The store connector could not satisfy the request
    #[error("Connector failure: {source}")]
    ConnectorFailure {
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A raw result batch contained two entries sharing an id
    #[error("Duplicate identity in result batch: {id}")]
    DuplicateIdentity { id: String },

    /// Operation invoked in a state that does not allow it
    #[error("Usage error in '{op}': {reason}")]
    Usage { op: String, reason: String },

    /// An edit script does not apply to the given list view
    #[error("Invalid edit script: {reason}")]
    InvalidEditScript { reason: String },

    /// Caller-supplied input (configuration, records) is invalid
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Internal invariant broken (should never happen)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl FetchError {
    /// Wrap a connector error, keeping it reachable through `source()`
    pub fn connector(err: impl Into<BoxError>) -> Self {
        FetchError::ConnectorFailure {
            source: Arc::from(err.into()),
        }
    }

    /// Usage error for `op` invoked before any successful fetch
    pub fn not_loaded(op: impl Into<String>) -> Self {
        FetchError::Usage {
            op: op.into(),
            reason: "no snapshot loaded; call perform_fetch first".to_string(),
        }
    }

    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            FetchError::InvalidIndexPath { .. } | FetchError::InvalidSection { .. } => {
                ExErrorKind::InvalidIndexPath
            }
            FetchError::ConnectorFailure { .. } => ExErrorKind::ConnectorFailure,
            FetchError::DuplicateIdentity { .. } => ExErrorKind::DuplicateIdentity,
            FetchError::Usage { .. } => ExErrorKind::Usage,
            FetchError::InvalidEditScript { .. } => ExErrorKind::InvalidEditScript,
            FetchError::InvalidInput { .. } => ExErrorKind::InvalidInput,
            FetchError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    /// Stable error code of this error
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

/// Conversion from FetchError to ExError
impl From<&FetchError> for ExError {
    fn from(err: &FetchError) -> Self {
        let base = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            FetchError::InvalidIndexPath { row, section } => {
                base.with_index_path(IndexPath::new(*section, *row))
            }
            FetchError::InvalidSection { .. } => base,
            FetchError::DuplicateIdentity { id } => base.with_entity_id(id.clone()),
            FetchError::Usage { op, .. } => base.with_op(op.clone()),
            FetchError::ConnectorFailure { .. }
            | FetchError::InvalidEditScript { .. }
            | FetchError::InvalidInput { .. }
            | FetchError::Internal { .. } => base,
        }
    }
}

impl From<FetchError> for ExError {
    fn from(err: FetchError) -> Self {
        ExError::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidIndexPath,
            ExErrorKind::ConnectorFailure,
            ExErrorKind::DuplicateIdentity,
            ExErrorKind::Usage,
            ExErrorKind::InvalidEditScript,
            ExErrorKind::InvalidInput,
            ExErrorKind::Internal,
        ];
        let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_invalid_index_path_carries_coordinates() {
        let err = FetchError::InvalidIndexPath { row: 7, section: 2 };
        let ex: ExError = (&err).into();

        assert_eq!(ex.kind(), ExErrorKind::InvalidIndexPath);
        assert_eq!(ex.index_path(), Some(IndexPath::new(2, 7)));
        assert_eq!(err.to_string(), "Invalid index path: row 7 in section 2");
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let ex = ExError::new(ExErrorKind::DuplicateIdentity)
            .with_op("perform_fetch")
            .with_entity_id("a")
            .with_message("duplicate");
        let text = ex.to_string();

        assert!(text.starts_with("[ERR_DUPLICATE_IDENTITY]"));
        assert!(text.contains("perform_fetch"));
        assert!(text.contains("(id: a)"));
    }
}
