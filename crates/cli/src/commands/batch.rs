//! Batch session execution.

use std::fs;
use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr, miette};
use quill_parser::CommandLine;

use crate::output;
use crate::session::Session;

/// Runs every command in a session file, one per line.
///
/// A failing command does not stop the batch; the run fails at the end if
/// any command failed.
pub fn execute(mut session: Session, path: &Path) -> Result<()> {
    let lines = match load(path) {
        Ok(lines) => lines,
        Err(e) => {
            session.finish();
            return Err(e);
        }
    };

    let failed = lines.iter().filter(|line| !session.run(line)).count();
    session.finish();

    if failed > 0 {
        return Err(miette!("{} of {} command(s) failed", failed, lines.len()));
    }

    output::success(&format!("{} command(s) completed", lines.len()));
    Ok(())
}

fn load(path: &Path) -> Result<Vec<CommandLine>> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read session file {}", path.display()))?;

    Ok(quill_parser::parse_session(&content)?)
}
