//! Error types for the segmentation engine.

use thiserror::Error;

/// Boxed error type carried for caller-supplied callback failures.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Errors that can surface while driving an export window.
///
/// The engine itself is a thin state machine over caller-supplied
/// callbacks and defines no failure modes of its own beyond parameter
/// validation. Callback failures are carried through [`ExportError::External`]
/// and propagate to the caller unmodified - no retry, no partial rollback.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Window parameters were rejected at construction time.
    #[error("invalid window: {message}")]
    InvalidWindow {
        /// Description of the offending parameter.
        message: String,
    },

    /// A caller-supplied callback (loader, batch hook, or projector) failed.
    #[error("export callback failed: {0}")]
    External(#[source] BoxedError),
}

impl ExportError {
    /// Creates an invalid window error.
    pub fn invalid_window(message: impl Into<String>) -> Self {
        Self::InvalidWindow {
            message: message.into(),
        }
    }

    /// Wraps a caller-side error for propagation through the engine.
    pub fn external(err: impl Into<BoxedError>) -> Self {
        Self::External(err.into())
    }
}
