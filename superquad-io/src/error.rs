//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file format: {format}")]
    InvalidFormat { format: String },

    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for superquad_core::Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Io(e) => superquad_core::Error::Io(e),
            IoError::InvalidFormat { format } => superquad_core::Error::UnsupportedFormat(format),
            IoError::FileNotFound { path } => superquad_core::Error::FileNotFound(path),
            other => superquad_core::Error::InvalidData(other.to_string()),
        }
    }
}
