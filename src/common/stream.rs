//! Parsing of inputs from streaming sources.

use std::io::Read;

use crate::{Config, Datum, Error, Parser, source_stream::ReadSourceStream};

use super::{helper::collect_up_to_first_err, inmem::TopItemResult};


/// Parse UTF-8 from the given reader with the given configuration, and return
/// a vector of the results for each top-level item, up to and including the
/// first error if any.  The reader is consumed incrementally, as parsing needs
/// more input.
pub fn parse_reader<R>(config: &Config, reader: R) -> Vec<TopItemResult>
    where R: Read,
{
    collect_up_to_first_err(Parser::new(config).parse(ReadSourceStream::new(reader)))
}

/// Parse UTF-8 from the given reader with the given configuration, and return
/// its whole top level as the single root `List`.
pub fn parse_root_reader<R>(config: &Config, reader: R) -> Result<Datum, Error>
    where R: Read,
{
    Parser::new(config).parse_root(ReadSourceStream::new(reader))
}
