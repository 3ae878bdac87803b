//! Command dispatch and the REPL buffer.

use std::fs;
use std::path::{Path, PathBuf};

use quill_core::{Command, QuillError, ScriptBuffer};
use quill_host::PersistentStore;

use crate::pipeline::{ExecutionOutcome, ExecutionPipeline};

/// What a dispatched command did.
#[derive(Debug)]
pub enum CommandOutcome {
    /// A script ran. `output` is the echoed text, if any.
    Executed { output: Option<String> },

    /// A line was appended; `lines` is the buffer's new length.
    Buffered { lines: usize },

    /// The buffer was cleared.
    Reset,

    /// Nothing to do (empty buffer, blank `/pyload` argument).
    Skipped,

    /// Import lines listed by `/pydebug`.
    Listed(Vec<String>),

    /// An import failed to resolve. Logged, not fatal.
    Contained(QuillError),

    /// The command failed. Logged; the dispatcher stays usable.
    Failed(QuillError),
}

/// Maps scripting commands onto the buffer and the execution pipeline.
pub struct Dispatcher {
    pipeline: ExecutionPipeline,
    buffer: ScriptBuffer,
    config_dir: PathBuf,
}

impl Dispatcher {
    /// Creates a dispatcher. `/pyload` paths resolve under `config_dir`.
    pub fn new(pipeline: ExecutionPipeline, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            buffer: ScriptBuffer::new(),
            config_dir: config_dir.into(),
        }
    }

    /// Handles one command with the remainder of its input line.
    pub fn dispatch(&mut self, command: Command, args: &str) -> CommandOutcome {
        log::debug!("Dispatching {}", command);

        match command {
            Command::Python | Command::Py => self.run(args, false),
            Command::PyPrint => self.run(args, true),
            Command::PyAdd => {
                self.buffer.append(args);
                CommandOutcome::Buffered {
                    lines: self.buffer.line_count(),
                }
            }
            Command::PyExecute => match self.buffer.take() {
                Some(script) => self.run(&script, args.trim() == "print"),
                None => CommandOutcome::Skipped,
            },
            Command::PyReset => {
                self.buffer.reset();
                CommandOutcome::Reset
            }
            Command::PyLoad => self.load(args),
            Command::PyDebug => {
                let lines = self.pipeline.import_lines();
                for line in &lines {
                    log::info!("{}", line);
                }
                CommandOutcome::Listed(lines)
            }
        }
    }

    fn load(&mut self, args: &str) -> CommandOutcome {
        let relative = args.trim();
        if relative.is_empty() {
            return CommandOutcome::Skipped;
        }

        let path = self.config_dir.join(relative);
        match fs::read_to_string(&path) {
            Ok(script) => self.run(&script, false),
            Err(source) => Self::fail(QuillError::FileRead { path, source }),
        }
    }

    fn run(&mut self, script: &str, echo: bool) -> CommandOutcome {
        match self.pipeline.execute(script, echo) {
            Ok(ExecutionOutcome::Completed { output }) => CommandOutcome::Executed { output },
            Ok(ExecutionOutcome::Contained(err)) => CommandOutcome::Contained(err),
            Err(err) => Self::fail(err),
        }
    }

    fn fail(err: QuillError) -> CommandOutcome {
        log::error!("{}", err);
        CommandOutcome::Failed(err)
    }

    /// The pending buffer text, if any.
    pub fn buffer(&self) -> &ScriptBuffer {
        &self.buffer
    }

    pub fn store(&self) -> &PersistentStore {
        self.pipeline.store()
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Shuts the interpreter down. The dispatcher cannot be used afterwards.
    pub fn shutdown(self) {
        self.pipeline.shutdown();
    }
}
