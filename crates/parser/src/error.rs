//! Parser error types.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Error type for operator input that does not name a known command.
#[derive(Debug, Error, Diagnostic)]
#[error("Parse error: {message}")]
#[diagnostic(code(quill::parser::error))]
pub struct ParseError {
    pub message: String,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, src: &str, offset: usize) -> Self {
        Self {
            message: message.into(),
            src: src.to_string(),
            span: Some(SourceSpan::from(offset..offset + 1)),
        }
    }

    /// Creates an error spanning a whole word starting at `offset`.
    pub fn word(message: impl Into<String>, src: &str, offset: usize, len: usize) -> Self {
        Self {
            message: message.into(),
            src: src.to_string(),
            span: Some(SourceSpan::from(offset..offset + len.max(1))),
        }
    }
}
