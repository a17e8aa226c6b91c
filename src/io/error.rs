//! Error types for generation, configuration and output operations

use std::fmt;
use std::path::PathBuf;

/// Why the configured supply could not be reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exhaustion {
    /// Too many consecutive draws produced an already admitted DNA
    DuplicateDna {
        /// Consecutive rejected draws when the run gave up
        failures: usize,
    },
    /// Every re-roll for a layer still clashed with the exclusion table
    UnresolvableExclusion {
        /// Layer whose element could not be placed
        layer: String,
        /// Re-rolls attempted before giving up
        attempts: usize,
    },
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDna { failures } => {
                write!(f, "{failures} consecutive duplicate DNA draws")
            }
            Self::UnresolvableExclusion { layer, attempts } => {
                write!(
                    f,
                    "layer '{layer}' still clashed with the exclusion table after {attempts} re-rolls"
                )
            }
        }
    }
}

/// Main error type for all generation operations
#[derive(Debug)]
pub enum GenerationError {
    /// The layer and element space is too small for the requested supply
    ConfigurationExhausted {
        /// Cumulative edition target of the phase being generated
        target: usize,
        /// What ran out
        cause: Exhaustion,
    },

    /// The renderer reported a different number of attributes than layers drawn
    IntegrationMismatch {
        /// Edition being assembled
        edition: usize,
        /// Active layer count
        expected: usize,
        /// Attributes returned by the renderer
        actual: usize,
    },

    /// A layer has no selectable elements (or only zero weights)
    EmptyLayer {
        /// Layer name
        layer: String,
    },

    /// A DNA string could not be parsed or resolved against its layers
    InvalidDna {
        /// The offending DNA string
        dna: String,
        /// Description of the problem
        reason: String,
    },

    /// Configuration value validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to load a layer image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a composited edition image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Reading or writing JSON failed
    Serialization {
        /// File being read or written
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationExhausted { target, cause } => {
                write!(
                    f,
                    "Cannot grow the collection to {target} editions ({cause}); add more layers or elements"
                )
            }
            Self::IntegrationMismatch {
                edition,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Renderer returned {actual} attributes for edition {edition}, expected {expected}"
                )
            }
            Self::EmptyLayer { layer } => {
                write!(f, "Layer '{layer}' has no selectable elements")
            }
            Self::InvalidDna { dna, reason } => {
                write!(f, "Invalid DNA '{dna}': {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(f, "JSON error in '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

impl GenerationError {
    /// Whether this error means the configuration cannot reach its supply
    pub const fn is_exhaustion(&self) -> bool {
        matches!(self, Self::ConfigurationExhausted { .. })
    }
}

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Cumulative target of the phase being generated
    pub target: Option<usize>,
    /// Edition number being produced
    pub edition: Option<usize>,
}

/// Enriches errors with generation state that lower layers do not know
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Add just the phase target
    ///
    /// # Errors
    ///
    /// Propagates the original error with the target applied
    fn with_target(self, target: usize) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<GenerationError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                GenerationError::ConfigurationExhausted { target, .. } => {
                    if let Some(value) = context.target {
                        *target = value;
                    }
                }
                GenerationError::IntegrationMismatch { edition, .. } => {
                    if let Some(value) = context.edition {
                        *edition = value;
                    }
                }
                _ => {}
            }
            error
        })
    }

    fn with_target(self, target: usize) -> Result<T> {
        self.with_context(ErrorContext {
            target: Some(target),
            ..Default::default()
        })
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to a path and operation
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> GenerationError {
    GenerationError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}

/// Create an invalid DNA error
pub fn invalid_dna(dna: &impl ToString, reason: &impl ToString) -> GenerationError {
    GenerationError::InvalidDna {
        dna: dna.to_string(),
        reason: reason.to_string(),
    }
}
