//! Used by the integration tests of both the [core](../knit_core/index.html)
//! and the [full](../knit/index.html) crates.  It provides test suites that
//! can be run against any way of parsing, e.g. from in-memory strings or from
//! the various streaming sources, and it represents expected results in the
//! canonical printed form so that they are easy to read and write.

use knit_core::{Config, Datum, Error, ErrorKind};


pub mod suites;
pub mod utils;


/// Any way of parsing an input with a configuration, collecting the items up to
/// and including the first error.
pub type ParseFn<'a> = &'a dyn Fn(&Config, &str) -> Vec<Result<Datum, Error>>;

/// One expected result: the printed form of an item, or the kind of an error.
pub type Expected = Result<String, ErrorKind>;


/// Represent results as their printed forms and error kinds.
pub fn render(results: Vec<Result<Datum, Error>>) -> Vec<Expected> {
    results.into_iter()
           .map(|r| r.map(|d| knit::printer::print(&d)).map_err(|e| e.kind))
           .collect()
}

/// Convert expectations written with `&str`s.
pub fn expect(e: Vec<Result<&str, ErrorKind>>) -> Vec<Expected> {
    e.into_iter().map(|r| r.map(str::to_owned)).collect()
}
