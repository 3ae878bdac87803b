//! Operator command tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scripting command the host routes to the dispatcher.
///
/// Registration and dispatch both go through [`Command::ALL`], so a token that
/// is not listed here can never reach the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// `/python`: run a single line, discard the result.
    Python,
    /// `/py`: alias for `/python`.
    Py,
    /// `/pyprint`: run a single line and echo the result.
    PyPrint,
    /// `/pyadd`: append a line to the script buffer.
    PyAdd,
    /// `/pyexecute`: run the buffer and clear it.
    PyExecute,
    /// `/pyreset`: clear the buffer.
    PyReset,
    /// `/pyload`: run a file relative to the configuration directory.
    PyLoad,
    /// `/pydebug`: log the import line of every exposed capability.
    PyDebug,
}

impl Command {
    /// Every command, in registration order.
    pub const ALL: [Command; 8] = [
        Command::Python,
        Command::Py,
        Command::PyPrint,
        Command::PyAdd,
        Command::PyExecute,
        Command::PyReset,
        Command::PyLoad,
        Command::PyDebug,
    ];

    /// Returns the literal token, including the leading slash.
    pub fn token(self) -> &'static str {
        match self {
            Command::Python => "/python",
            Command::Py => "/py",
            Command::PyPrint => "/pyprint",
            Command::PyAdd => "/pyadd",
            Command::PyExecute => "/pyexecute",
            Command::PyReset => "/pyreset",
            Command::PyLoad => "/pyload",
            Command::PyDebug => "/pydebug",
        }
    }

    /// Returns the help text shown next to the token.
    pub fn description(self) -> &'static str {
        match self {
            Command::Python => "Run a line of script",
            Command::Py => "Alias for /python",
            Command::PyPrint => "Run a line of script and print the result to the output window",
            Command::PyAdd => "Add a line of script to a temporary script",
            Command::PyExecute => "Run the temporary script (append `print` to echo the result)",
            Command::PyReset => "Clear the temporary script",
            Command::PyLoad => {
                "Read the contents of a file relative to the config folder and run them as a script"
            }
            Command::PyDebug => "Log the import line of every exposed capability",
        }
    }

    /// Looks a command up by its exact, case-sensitive token.
    pub fn from_token(token: &str) -> Option<Command> {
        Self::ALL.into_iter().find(|command| command.token() == token)
    }

    /// The static token/description table, for configuration panels.
    pub fn table() -> impl Iterator<Item = (&'static str, &'static str)> {
        Self::ALL
            .into_iter()
            .map(|command| (command.token(), command.description()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_round_trip() {
        for command in Command::ALL {
            assert_eq!(Command::from_token(command.token()), Some(command));
        }
    }

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert_eq!(Command::from_token("/PY"), None);
        assert_eq!(Command::from_token("/PyPrint"), None);
        assert_eq!(Command::from_token("py"), None);
    }

    #[test]
    fn test_table_lists_every_token() {
        let tokens: Vec<_> = Command::table().map(|(token, _)| token).collect();
        assert_eq!(
            tokens,
            vec![
                "/python",
                "/py",
                "/pyprint",
                "/pyadd",
                "/pyexecute",
                "/pyreset",
                "/pyload",
                "/pydebug"
            ]
        );
    }
}
