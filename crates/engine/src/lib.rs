//! Quill Engine - runs operator scripts and dispatches scripting commands.

mod dispatcher;
mod feature;
mod output;
mod pipeline;

pub use dispatcher::{CommandOutcome, Dispatcher};
pub use feature::ScriptingFeature;
pub use output::{CommandRouter, OperatorOutput};
pub use pipeline::{ExecutionOutcome, ExecutionPipeline};
