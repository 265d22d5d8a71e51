//! # Error Types
//!
//! Error types for visibility analysis. Every variant is a precondition or
//! collaborator failure; degenerate geometry is handled locally and never
//! surfaces here.
//!
//! ## Error Policy
//!
//! - Precondition failures abort before sampling begins
//! - Exporters render the full output before writing, so a failure leaves
//!   no partial result file

use config::ConfigError;
use los_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur during a visibility analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Invalid numeric settings
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Mesh loading or validation failed
    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    /// Observer pose cannot define a viewing direction
    #[error("Invalid observer: {message}")]
    InvalidObserver { message: String },

    /// Target surface is not a polygon mesh
    #[error("Target surface has no triangles")]
    EmptyTarget,

    /// Named target is not registered in the scene
    #[error("Target object not found: {name}")]
    TargetNotFound { name: String },

    /// Spacing too small for the target surface
    #[error("Too many samples: {count} (max: {max})")]
    TooManySamples { count: usize, max: usize },

    /// Writing results failed
    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Creates an invalid observer error.
    pub fn invalid_observer(message: impl Into<String>) -> Self {
        Self::InvalidObserver {
            message: message.into(),
        }
    }
}

/// Result type alias for analysis operations.
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::TooManySamples { count: 9, max: 3 };
        assert_eq!(err.to_string(), "Too many samples: 9 (max: 3)");

        let err = AnalysisError::from(ConfigError::InvalidSpacing(0.0));
        assert!(err.to_string().contains("point spacing"));

        let err = AnalysisError::TargetNotFound {
            name: "Target_Panel".to_string(),
        };
        assert!(err.to_string().contains("Target_Panel"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AnalysisError>();
    }
}
