use geoaudit_core_types::RunId;
use thiserror::Error;

/// Result type alias using GeoAuditError
pub type Result<T> = std::result::Result<T, GeoAuditError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration/Validation
    InvalidInput,
    InvalidConfig,
    InvalidCollection,
    InvalidGeometry,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    ExternalService,
    Timeout,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidCollection => "ERR_INVALID_COLLECTION",
            ExErrorKind::InvalidGeometry => "ERR_INVALID_GEOMETRY",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, layer, run) for debugging and log correlation.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    layer: Option<String>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            layer: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add layer context
    pub fn with_layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = Some(layer.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
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

    /// Get the layer context, if any
    pub fn layer(&self) -> Option<&str> {
        self.layer.as_deref()
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(layer) = &self.layer {
            write!(f, " (layer: {})", layer)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
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

/// Domain errors raised by the core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoAuditError {
    /// No layer policies were supplied for the run
    #[error("Layer catalog is empty: at least one layer must be configured")]
    EmptyLayerCatalog,

    /// The same layer was configured twice
    #[error("Layer configured more than once: {layer}")]
    DuplicateLayer { layer: String },

    /// A layer name was empty or whitespace-only
    #[error("Layer name cannot be empty")]
    EmptyLayerName,

    /// The payload is not a feature collection
    #[error("Invalid feature collection: {reason}")]
    InvalidFeatureCollection { reason: String },

    /// A geometry object could not be interpreted
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<GeoAuditError> for ExError {
    fn from(err: GeoAuditError) -> Self {
        let message = err.to_string();
        match err {
            GeoAuditError::EmptyLayerCatalog | GeoAuditError::EmptyLayerName => {
                ExError::new(ExErrorKind::InvalidConfig)
                    .with_op("validate_catalog")
                    .with_message(message)
            }
            GeoAuditError::DuplicateLayer { layer } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("validate_catalog")
                .with_layer(layer)
                .with_message(message),
            GeoAuditError::InvalidFeatureCollection { .. } => {
                ExError::new(ExErrorKind::InvalidCollection).with_message(message)
            }
            GeoAuditError::InvalidGeometry { .. } => {
                ExError::new(ExErrorKind::InvalidGeometry).with_message(message)
            }
            GeoAuditError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for GeoAuditError {
    fn from(err: serde_json::Error) -> Self {
        GeoAuditError::Serialization {
            message: err.to_string(),
        }
    }
}
