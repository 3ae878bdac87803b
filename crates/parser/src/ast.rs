//! Parsed operator input.

use quill_core::Command;

/// A raw command line before the token is checked against the command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstLine {
    /// The token, including the leading slash.
    pub token: String,

    /// Byte offset of the token within the input.
    pub offset: usize,

    /// Everything after the separator, verbatim.
    pub arguments: String,
}

/// A command line resolved against the command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub command: Command,
    pub arguments: String,
}

impl CommandLine {
    /// Creates a command line.
    pub fn new(command: Command, arguments: impl Into<String>) -> Self {
        Self {
            command,
            arguments: arguments.into(),
        }
    }
}
