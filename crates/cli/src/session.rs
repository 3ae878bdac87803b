//! A running scripting feature plus the prompt-side command table.

use std::path::Path;

use miette::{Result, miette};
use quill_core::{Command, FeatureConfig};
use quill_engine::{CommandOutcome, ScriptingFeature};
use quill_host::InterfaceHandle;
use quill_parser::CommandLine;

use crate::capabilities;
use crate::host::{CliInterface, CommandTable, ConsoleOutput};
use crate::output;

/// What the prompt should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Exit,
}

/// One activation of the scripting feature driven from the terminal.
pub struct Session {
    feature: ScriptingFeature,
    table: CommandTable,
}

impl Session {
    /// Activates the feature with the demo capabilities.
    pub fn start(config: &FeatureConfig) -> Result<Self> {
        let config_dir = config
            .resolve_config_dir()
            .map_err(|e| miette!("{}", e))?;

        let table = CommandTable::new();
        let feature = ScriptingFeature::activate(
            config,
            capabilities::registry(),
            capabilities::libraries(),
            InterfaceHandle::new(CliInterface::new(&config_dir)),
            Box::new(table.clone()),
            Box::new(ConsoleOutput),
        )
        .map_err(|e| miette!("{}", e))?;

        Ok(Self { feature, table })
    }

    /// Handles one line of interactive input.
    pub fn handle_line(&mut self, line: &str) -> LineOutcome {
        match line.trim() {
            "" => return LineOutcome::Continue,
            "exit" | "quit" => return LineOutcome::Exit,
            "help" => {
                self.print_help();
                return LineOutcome::Continue;
            }
            _ => {}
        }

        match quill_parser::parse_line(line) {
            Ok(command_line) => {
                self.run(&command_line);
            }
            Err(e) => eprintln!("{:?}", miette::Report::new(e)),
        }

        LineOutcome::Continue
    }

    /// Runs a parsed command. Returns false if the command failed.
    pub fn run(&mut self, line: &CommandLine) -> bool {
        if !self.is_registered(line.command) {
            output::error(&format!("Command '{}' is not registered", line.command));
            return false;
        }

        render(self.feature.handle_command(line.command, &line.arguments))
    }

    pub fn print_help(&self) {
        output::section_header("Commands");
        for (token, description) in self.table.entries() {
            output::key_value(&token, &description);
        }
        output::key_value("help", "Show this list");
        output::key_value("exit", "Leave the prompt");
    }

    pub fn config_dir(&self) -> &Path {
        self.feature.config_dir()
    }

    #[cfg(test)]
    pub fn store(&self) -> &quill_host::PersistentStore {
        self.feature.store()
    }

    pub fn is_registered(&self, command: Command) -> bool {
        self.table.is_registered(command.token())
    }

    /// Deactivates the feature.
    pub fn finish(self) {
        self.feature.deactivate();
    }
}

fn render(outcome: CommandOutcome) -> bool {
    match outcome {
        CommandOutcome::Executed { .. } | CommandOutcome::Skipped => true,
        CommandOutcome::Buffered { lines } => {
            output::info(&format!("{} line(s) buffered", lines));
            true
        }
        CommandOutcome::Reset => {
            output::info("Buffer cleared");
            true
        }
        CommandOutcome::Listed(lines) => {
            if lines.is_empty() {
                output::info("No capabilities exposed");
            } else {
                output::section_header("Imports");
                for line in &lines {
                    output::list_item(line);
                }
            }
            true
        }
        CommandOutcome::Contained(e) => {
            output::warning(&e.to_string());
            true
        }
        CommandOutcome::Failed(e) => {
            output::error(&e.to_string());
            false
        }
    }
}
