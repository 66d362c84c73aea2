use thiserror::Error;

/// Result type alias using DeltaError
pub type Result<T> = std::result::Result<T, DeltaError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure in the engine is a contract violation at the call site.
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Index outside the current or snapshot bounds
    PreconditionViolation,
    /// Operation not valid for the accumulator's present mode
    InvalidState,
    /// Accessor not provided by the active representation
    Unsupported,
    /// Malformed argument (e.g. a reorder map that is not a permutation)
    InvalidInput,
    /// Configuration could not be parsed
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::PreconditionViolation => "ERR_PRECONDITION_VIOLATION",
            ExErrorKind::InvalidState => "ERR_INVALID_STATE",
            ExErrorKind::Unsupported => "ERR_UNSUPPORTED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used by `log_op_error!` plus enough context
/// (operation, offending index) to locate the bad call.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    index: Option<usize>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            index: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add index context
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
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

    /// Get the index context, if any
    pub fn index(&self) -> Option<usize> {
        self.index
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
        if let Some(index) = self.index {
            write!(f, " (index: {})", index)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for accumulator and cursor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeltaError {
    /// Index outside the valid range for the operation
    #[error("{op}: index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        op: &'static str,
        index: usize,
        len: usize,
    },

    /// Reorder map requested on a batch without a permutation
    #[error("Cannot get reorder map for a non-reordering change")]
    NotReordering,

    /// Random-access block accessors on a tree or reorder batch
    #[error("Operation {operation} is only supported on block-list batches")]
    Unsupported { operation: &'static str },

    /// Discrete edit attempted while a permutation is installed
    #[error("{op} rejected: batch holds a reorder permutation")]
    ReorderActive { op: &'static str },

    /// Permutation installed onto a batch that already has edits
    #[error("Cannot install reorder: batch already holds {count} change block(s)")]
    EditsPending { count: usize },

    /// Reorder map is not a permutation of the snapshot positions
    #[error("Invalid permutation: {reason}")]
    InvalidPermutation { reason: String },

    /// Configuration failed to parse
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// An edit inside a batch failed; nothing from the batch was applied
    #[error("edit {position} rejected: {source}")]
    EditRejected {
        position: usize,
        #[source]
        source: Box<DeltaError>,
    },
}

impl DeltaError {
    pub(crate) fn out_of_bounds(op: &'static str, index: usize, len: usize) -> Self {
        DeltaError::IndexOutOfBounds { op, index, len }
    }
}

/// Conversion from DeltaError to ExError
impl From<DeltaError> for ExError {
    fn from(err: DeltaError) -> Self {
        let message = err.to_string();
        match err {
            DeltaError::IndexOutOfBounds { op, index, .. } => {
                ExError::new(ExErrorKind::PreconditionViolation)
                    .with_op(op)
                    .with_index(index)
                    .with_message(message)
            }

            DeltaError::NotReordering => ExError::new(ExErrorKind::InvalidState)
                .with_op("reorder_map")
                .with_message(message),

            DeltaError::ReorderActive { op } => ExError::new(ExErrorKind::InvalidState)
                .with_op(op)
                .with_message(message),

            DeltaError::EditsPending { .. } => ExError::new(ExErrorKind::InvalidState)
                .with_op("install_reorder")
                .with_message(message),

            DeltaError::Unsupported { operation } => ExError::new(ExErrorKind::Unsupported)
                .with_op(operation)
                .with_message(message),

            DeltaError::InvalidPermutation { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("install_reorder")
                .with_message(message),

            DeltaError::Config { .. } => ExError::new(ExErrorKind::Config).with_message(message),

            DeltaError::EditRejected { source, .. } => {
                ExError::from(*source).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to DeltaError
impl From<serde_json::Error> for DeltaError {
    fn from(err: serde_json::Error) -> Self {
        DeltaError::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (
                ExErrorKind::PreconditionViolation,
                "ERR_PRECONDITION_VIOLATION",
            ),
            (ExErrorKind::InvalidState, "ERR_INVALID_STATE"),
            (ExErrorKind::Unsupported, "ERR_UNSUPPORTED"),
            (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
            (ExErrorKind::Config, "ERR_CONFIG"),
            (ExErrorKind::Internal, "ERR_INTERNAL"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_out_of_bounds_carries_index() {
        let ex: ExError = DeltaError::out_of_bounds("remove", 7, 3).into();
        assert_eq!(ex.kind(), ExErrorKind::PreconditionViolation);
        assert_eq!(ex.op(), Some("remove"));
        assert_eq!(ex.index(), Some(7));
        assert!(ex.message().contains("out of bounds"));
    }

    #[test]
    fn test_rejected_edit_keeps_inner_kind() {
        let err = DeltaError::EditRejected {
            position: 2,
            source: Box::new(DeltaError::out_of_bounds("update", 9, 4)),
        };
        let ex: ExError = err.into();
        assert_eq!(ex.code(), "ERR_PRECONDITION_VIOLATION");
        assert_eq!(ex.op(), Some("update"));
        assert!(ex.message().starts_with("edit 2 rejected"));
    }

    #[test]
    fn test_display_includes_code_and_op() {
        let ex: ExError = DeltaError::ReorderActive { op: "add" }.into();
        let rendered = ex.to_string();
        assert!(rendered.starts_with("[ERR_INVALID_STATE]"));
        assert!(rendered.contains("'add'"));
    }
}
