//! Quill Core - Core types shared by the Quill scripting host.

mod buffer;
mod command;
mod config;
mod error;

pub use buffer::ScriptBuffer;
pub use command::Command;
pub use config::{FeatureConfig, LibraryConfig};
pub use error::{ErrorKind, QuillError, Result};
