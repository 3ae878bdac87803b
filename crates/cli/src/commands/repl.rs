//! Interactive prompt.

use std::io::{self, BufRead, Write};

use miette::{IntoDiagnostic, Result};

use crate::output;
use crate::session::{LineOutcome, Session};

/// Reads commands from `input` until `exit` or end of input.
///
/// The feature is deactivated however the prompt ends.
pub fn execute(mut session: Session, mut input: impl BufRead) -> Result<()> {
    output::info(&format!(
        "Scripting ready in {} (type 'help' for commands)",
        session.config_dir().display()
    ));

    let result = prompt(&mut session, &mut input);

    session.finish();
    output::success("Scripting deactivated");
    result
}

fn prompt(session: &mut Session, input: &mut impl BufRead) -> Result<()> {
    let mut line = String::new();

    loop {
        output::prompt();
        io::stdout().flush().into_diagnostic()?;

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                output::error("Input is not valid UTF-8, line ignored");
                continue;
            }
            Err(e) => return Err(e).into_diagnostic(),
        }

        if session.handle_line(&line) == LineOutcome::Exit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::FeatureConfig;
    use std::io::{Cursor, Read};
    use tempfile::tempdir;

    fn start(dir: &std::path::Path) -> Session {
        Session::start(&FeatureConfig::default().with_config_dir(dir)).unwrap()
    }

    struct BrokenInput;

    impl Read for BrokenInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("terminal went away"))
        }
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let dir = tempdir().unwrap();
        let mut session = start(dir.path());
        let mut input = Cursor::new(
            b"\xff\n/py store[\"after\"] = true;\nexit\n/py store[\"late\"] = 1;\n".to_vec(),
        );

        prompt(&mut session, &mut input).unwrap();

        assert!(session.store().contains_key("after"));
        assert!(!session.store().contains_key("late"));
        session.finish();
    }

    #[test]
    fn test_end_of_input_ends_prompt() {
        let dir = tempdir().unwrap();
        let mut session = start(dir.path());

        prompt(&mut session, &mut Cursor::new(b"/pyadd 1\n".to_vec())).unwrap();
        session.finish();
    }

    #[test]
    fn test_read_error_is_reported_after_deactivation() {
        let dir = tempdir().unwrap();
        let mut session = start(dir.path());

        let err = prompt(&mut session, &mut io::BufReader::new(BrokenInput)).unwrap_err();
        assert!(err.to_string().contains("terminal went away"));
        session.finish();

        let result = execute(start(dir.path()), io::BufReader::new(BrokenInput));
        assert!(result.is_err());
    }
}
