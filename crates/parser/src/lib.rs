//! Quill Parser - operator input parsing using nom combinators.

mod ast;
mod combinators;
mod error;
mod lexer;
mod parser;

pub use ast::CommandLine;
pub use error::ParseError;
pub use parser::{parse_line, parse_session};
