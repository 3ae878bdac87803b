//! The stand-in host application: interface object, output channel and
//! command table.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use quill_engine::{CommandRouter, OperatorOutput};
use quill_host::HostInterface;

use crate::output;

/// Root interface object handed to scripts.
pub struct CliInterface {
    config_dir: PathBuf,
}

impl CliInterface {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }
}

impl HostInterface for CliInterface {
    fn name(&self) -> String {
        env!("CARGO_PKG_NAME").to_string()
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn config_directory(&self) -> PathBuf {
        self.config_dir.clone()
    }
}

/// Echo channel writing to the terminal.
pub struct ConsoleOutput;

impl OperatorOutput for ConsoleOutput {
    fn print(&self, text: &str) {
        output::echo(text);
    }
}

/// Registered command tokens, shared between the feature and the prompt.
#[derive(Clone, Default)]
pub struct CommandTable {
    handlers: Rc<RefCell<BTreeMap<String, String>>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, token: &str) -> bool {
        self.handlers.borrow().contains_key(token)
    }

    /// Registered tokens with their descriptions, sorted by token.
    pub fn entries(&self) -> Vec<(String, String)> {
        self.handlers
            .borrow()
            .iter()
            .map(|(token, description)| (token.clone(), description.clone()))
            .collect()
    }
}

impl CommandRouter for CommandTable {
    fn add_handler(&mut self, token: &str, description: &str) {
        log::debug!("Registered {}", token);
        self.handlers
            .borrow_mut()
            .insert(token.to_string(), description.to_string());
    }

    fn remove_handler(&mut self, token: &str) {
        log::debug!("Unregistered {}", token);
        self.handlers.borrow_mut().remove(token);
    }
}
