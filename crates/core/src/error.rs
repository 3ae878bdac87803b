//! Error types for Quill.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Quill operations.
pub type Result<T> = std::result::Result<T, QuillError>;

/// The closed set of failures a scripting command can produce.
#[derive(Debug, Error)]
pub enum QuillError {
    /// The feature could not be brought up (a capability library failed to
    /// load, the configuration directory is unavailable, ...).
    #[error("Activation failed for {component}: {reason}")]
    Activation { component: String, reason: String },

    /// An import emitted by the preamble or written by the operator could
    /// not be resolved by the guest engine.
    #[error("Import failed: {message}")]
    Resolution { message: String },

    /// The operator's script raised an error (syntax or evaluation).
    #[error("Script error: {message}{}", line_suffix(.line))]
    Runtime {
        message: String,
        line: Option<usize>,
    },

    #[error("Failed to read script file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Discriminant of [`QuillError`], for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Activation,
    Resolution,
    Runtime,
    File,
}

impl QuillError {
    /// Creates an activation error for the given component.
    pub fn activation(component: impl Into<String>, reason: impl ToString) -> Self {
        Self::Activation {
            component: component.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the failure class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuillError::Activation { .. } => ErrorKind::Activation,
            QuillError::Resolution { .. } => ErrorKind::Resolution,
            QuillError::Runtime { .. } => ErrorKind::Runtime,
            QuillError::FileRead { .. } => ErrorKind::File,
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" (line {})", line),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_display_with_line() {
        let err = QuillError::Runtime {
            message: "Variable not found: y".to_string(),
            line: Some(2),
        };
        assert_eq!(err.to_string(), "Script error: Variable not found: y (line 2)");
        assert_eq!(err.kind(), ErrorKind::Runtime);
    }

    #[test]
    fn test_runtime_display_without_line() {
        let err = QuillError::Runtime {
            message: "boom".to_string(),
            line: None,
        };
        assert_eq!(err.to_string(), "Script error: boom");
    }

    #[test]
    fn test_file_read_kind() {
        let err = QuillError::FileRead {
            path: PathBuf::from("missing.rhai"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.kind(), ErrorKind::File);
        assert!(err.to_string().contains("missing.rhai"));
    }
}
