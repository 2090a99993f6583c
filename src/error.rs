//! Global error handling for srcdump
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

/// Global error type for srcdump operations
#[derive(Error, Debug)]
pub enum SrcDumpError {
    /// Project root does not exist or is not a directory
    #[error("Project directory '{0}' not found")]
    DirectoryNotFound(String),

    /// Settings file could not be parsed
    #[error("Error parsing YAML config file '{path}': {source}")]
    Settings {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Content that cannot be represented in a CDATA section
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Output file could not be written
    #[error("Could not write to output file {path}: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Specialized Result type for srcdump operations
pub type Result<T> = std::result::Result<T, SrcDumpError>;

/// Creates a SrcDumpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::SrcDumpError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

impl From<SrcDumpError> for io::Error {
    fn from(err: SrcDumpError) -> Self {
        let kind = match &err {
            SrcDumpError::Io(e) => e.kind(),
            SrcDumpError::OutputWrite { source, .. } => source.kind(),
            SrcDumpError::DirectoryNotFound(_) => io::ErrorKind::NotFound,
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}
