//! Parsing of inputs that are single in-memory strings.

use crate::{Config, Datum, Error, Parser, premade::StrSourceStream};

use super::helper::collect_up_to_first_err;


/// The `Result` of parsing a top-level item, and the type of elements returned
/// by [`parse_str`](fn.parse_str.html).
pub type TopItemResult = Result<Datum, Error>;


/// Parse the given string with the given configuration, and return a vector
/// of the results for each top-level item, up to and including the first
/// error if any.
///
/// If you would rather handle each item as soon as it is parsed, use
/// [`Parser::parse_str`] instead.
///
/// [`Parser::parse_str`]: ../../../knit_core/struct.Parser.html#method.parse_str
pub fn parse_str(config: &Config, input: &str) -> Vec<TopItemResult> {
    collect_up_to_first_err(Parser::new(config).parse_str(input))
}

/// Parse the given string with the given configuration, and return its whole
/// top level as the single root `List`.
pub fn parse_root_str(config: &Config, input: &str) -> Result<Datum, Error> {
    Parser::new(config).parse_root(StrSourceStream::new(input))
}
