//! Nom parser combinators for operator input.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, one_of, space0},
    combinator::{eof, map, opt, peek, recognize, rest, value},
    sequence::pair,
};

use crate::ast::AstLine;
use crate::lexer::Span;

// ============================================================================
// Tokens
// ============================================================================

/// Parses a command token: `/` followed by letters or digits.
pub fn token(input: Span) -> IResult<Span, Span> {
    recognize(pair(char('/'), take_while1(|c: char| c.is_alphanumeric()))).parse(input)
}

/// Checks that a token is followed by whitespace or the end of input.
fn token_end(input: Span) -> IResult<Span, ()> {
    peek(alt((value((), eof), value((), one_of(" \t"))))).parse(input)
}

// ============================================================================
// Lines
// ============================================================================

/// Parses `/token[<separator>arguments]`.
///
/// Exactly one separator character is consumed; the arguments are the rest of
/// the input, verbatim.
pub fn command_line(input: Span) -> IResult<Span, AstLine> {
    let (input, _) = space0(input)?;
    let (input, token) = token(input)?;
    let (input, _) = token_end(input)?;
    let (input, _) = opt(one_of(" \t")).parse(input)?;
    let (input, arguments) = rest(input)?;

    Ok((
        input,
        AstLine {
            token: token.fragment().to_string(),
            offset: token.location_offset(),
            arguments: arguments.fragment().to_string(),
        },
    ))
}

/// Parses a blank line or a `#` comment line.
fn skipped_line(input: Span) -> IResult<Span, ()> {
    let (input, _) = space0(input)?;
    alt((value((), eof), value((), pair(char('#'), rest)))).parse(input)
}

/// Parses one line of a session file; `None` for blank and comment lines.
pub fn session_line(input: Span) -> IResult<Span, Option<AstLine>> {
    alt((value(None, skipped_line), map(command_line, Some))).parse(input)
}

// ============================================================================
// Tests
// ============================================================================
