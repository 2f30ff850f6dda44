use branchdiff_core_types::{RequestContext, RequestId, TraceId};
use thiserror::Error;

/// Result type alias using BranchDiffError
pub type Result<T> = std::result::Result<T, BranchDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used for programmatic handling,
/// tests, and CLI output. The comparator and diff engine never produce
/// errors; every kind below originates from snapshot construction,
/// definition loading, or snapshot resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input validation
    InvalidInput,
    InvalidAssetKey,

    // Snapshot construction
    /// Two definitions in one snapshot share an asset key
    DuplicateAssetKey,
    /// A loaded definition's key disagrees with the key it was registered under
    DefinitionMismatch,
    /// A definition was requested that the index does not know about
    DefinitionNotFound,

    // Snapshot files / resolution
    InvalidSnapshot,
    UnsupportedSchemaVersion,
    SnapshotNotFound,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidAssetKey => "ERR_INVALID_ASSET_KEY",
            ExErrorKind::DuplicateAssetKey => "ERR_DUPLICATE_ASSET_KEY",
            ExErrorKind::DefinitionMismatch => "ERR_DEFINITION_MISMATCH",
            ExErrorKind::DefinitionNotFound => "ERR_DEFINITION_NOT_FOUND",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::UnsupportedSchemaVersion => "ERR_UNSUPPORTED_SCHEMA_VERSION",
            ExErrorKind::SnapshotNotFound => "ERR_SNAPSHOT_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus
/// optional context for debugging. Built with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    asset_key: Option<String>,
    deployment: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            asset_key: None,
            deployment: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add asset key context (display form, `a/b/c`)
    pub fn with_asset_key(mut self, key: impl Into<String>) -> Self {
        self.asset_key = Some(key.into());
        self
    }

    /// Add deployment context
    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Stamp the correlation ids of the run that surfaced this error
    pub fn with_request_context(self, ctx: &RequestContext) -> Self {
        let stamped = self.with_request_id(ctx.request_id.clone());
        match &ctx.trace_id {
            Some(trace_id) => stamped.with_trace_id(trace_id.clone()),
            None => stamped,
        }
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add candidate names (known asset keys, searched snapshot paths)
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = Some(candidates);
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

    pub fn asset_key(&self) -> Option<&str> {
        self.asset_key.as_deref()
    }

    pub fn deployment(&self) -> Option<&str> {
        self.deployment.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
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
        if let Some(key) = &self.asset_key {
            write!(f, " (asset_key: {})", key)?;
        }
        if let Some(deployment) = &self.deployment {
            write!(f, " (deployment: {})", deployment)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain errors raised while building or loading snapshots
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BranchDiffError {
    /// Asset key failed to parse (empty key or empty segment)
    #[error("Invalid asset key '{input}': {reason}")]
    InvalidAssetKey { input: String, reason: String },

    /// Two definitions in one snapshot share a key
    #[error("Duplicate definition for asset {asset_key} in deployment {deployment}")]
    DuplicateAssetKey {
        asset_key: String,
        deployment: String,
    },

    /// A lazily discovered definition conflicts with an eager one
    #[error("Duplicate definition found for asset {asset_key}")]
    ConflictingDefinition { asset_key: String },

    /// A definition was loaded under one key but describes another
    #[error("Definition registered as {expected} describes asset {actual}")]
    DefinitionKeyMismatch { expected: String, actual: String },

    /// Definition lookup failed
    #[error("Could not find asset '{asset_key}'. Found: {}", format_found(.known))]
    DefinitionNotFound {
        asset_key: String,
        known: Vec<String>,
    },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_found(known: &[String]) -> String {
    known
        .iter()
        .map(|k| format!("'{}'", k))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<BranchDiffError> for ExError {
    fn from(err: BranchDiffError) -> Self {
        let message = err.to_string();
        match err {
            BranchDiffError::InvalidAssetKey { input, .. } => {
                ExError::new(ExErrorKind::InvalidAssetKey)
                    .with_op("parse_asset_key")
                    .with_asset_key(input)
                    .with_message(message)
            }
            BranchDiffError::DuplicateAssetKey {
                asset_key,
                deployment,
            } => ExError::new(ExErrorKind::DuplicateAssetKey)
                .with_op("build_snapshot")
                .with_asset_key(asset_key)
                .with_deployment(deployment)
                .with_message(message),
            BranchDiffError::ConflictingDefinition { asset_key } => {
                ExError::new(ExErrorKind::DuplicateAssetKey)
                    .with_op("load_definitions")
                    .with_asset_key(asset_key)
                    .with_message(message)
            }
            BranchDiffError::DefinitionKeyMismatch { expected, .. } => {
                ExError::new(ExErrorKind::DefinitionMismatch)
                    .with_op("load_definition")
                    .with_asset_key(expected)
                    .with_message(message)
            }
            BranchDiffError::DefinitionNotFound { asset_key, known } => {
                ExError::new(ExErrorKind::DefinitionNotFound)
                    .with_op("get_definition")
                    .with_asset_key(asset_key)
                    .with_candidates(known)
                    .with_message(message)
            }
            BranchDiffError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            BranchDiffError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to BranchDiffError
impl From<serde_json::Error> for BranchDiffError {
    fn from(err: serde_json::Error) -> Self {
        BranchDiffError::Serialization {
            message: err.to_string(),
        }
    }
}
