//! Resolution of parsed lines against the command table.

use quill_core::Command;

use crate::ast::{AstLine, CommandLine};
use crate::combinators;
use crate::error::ParseError;
use crate::lexer::span;

/// Parses a single operator input line such as `/pyadd let x = 1;`.
///
/// A trailing line ending is ignored. Unknown tokens are rejected here so they
/// never reach the dispatcher.
pub fn parse_line(input: &str) -> Result<CommandLine, ParseError> {
    let line = strip_line_ending(input);

    let (_, ast) = combinators::command_line(span(line))
        .map_err(|e| syntax_error(line, e, 0))?;

    resolve(ast, line, 0)
}

/// Parses a session file: one command per line, blank lines and `#` comments
/// skipped.
pub fn parse_session(content: &str) -> Result<Vec<CommandLine>, ParseError> {
    let mut commands = Vec::new();
    let mut line_start = 0;

    for (index, raw) in content.split('\n').enumerate() {
        let line = strip_line_ending(raw);

        let (_, ast) = combinators::session_line(span(line))
            .map_err(|e| syntax_error(content, e, line_start).at_line(index + 1))?;

        if let Some(ast) = ast {
            commands.push(resolve(ast, content, line_start).map_err(|e| e.at_line(index + 1))?);
        }

        line_start += raw.len() + 1;
    }

    Ok(commands)
}

/// Looks the token up in the command table.
fn resolve(ast: AstLine, src: &str, base: usize) -> Result<CommandLine, ParseError> {
    match Command::from_token(&ast.token) {
        Some(command) => Ok(CommandLine::new(command, ast.arguments)),
        None => Err(ParseError::word(
            format!("Unknown command '{}'", ast.token),
            src,
            base + ast.offset,
            ast.token.len(),
        )),
    }
}

fn syntax_error(
    src: &str,
    err: nom::Err<nom::error::Error<crate::lexer::Span<'_>>>,
    base: usize,
) -> ParseError {
    let offset = match &err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input.location_offset(),
        nom::Err::Incomplete(_) => 0,
    };

    ParseError::new(
        "Expected a command such as '/py <script>'",
        src,
        base + offset,
    )
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

impl ParseError {
    /// Prefixes the message with a 1-based line number.
    fn at_line(mut self, line: usize) -> Self {
        self.message = format!("line {}: {}", line, self.message);
        self
    }
}
