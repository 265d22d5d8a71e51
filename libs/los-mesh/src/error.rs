//! # Mesh Errors
//!
//! Error types for mesh import and scene construction.

use thiserror::Error;

/// Errors that can occur while loading meshes or building a scene.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Reading a mesh file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed mesh file contents
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Invalid mesh topology
    #[error("Invalid topology: {message}")]
    InvalidTopology { message: String },

    /// File extension not recognised by the importer
    #[error("Unsupported mesh format: {extension:?}")]
    UnsupportedFormat { extension: String },

    /// Too many triangles
    #[error("Too many triangles: {count} (max: {max})")]
    TooManyTriangles { count: usize, max: usize },

    /// Two scene objects registered under the same name
    #[error("Duplicate scene object: {name}")]
    DuplicateObject { name: String },
}

impl MeshError {
    /// Creates a parse error.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }
}

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::parse(12, "expected 3 coordinates");
        assert!(err.to_string().contains("line 12"));
        assert!(err.to_string().contains("3 coordinates"));

        let err = MeshError::TooManyTriangles { count: 20, max: 10 };
        assert_eq!(err.to_string(), "Too many triangles: 20 (max: 10)");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }
}
