//! The core of a configurable, mechanical parser for an indentation-sensitive,
//! S-expression-flavored notation.  It turns text into a tree of two kinds of
//! node: atoms (indivisible tokens) and lists (ordered sequences of nodes,
//! each tagged with the delimiter pair that wraps it).
//!
//! The parser knows nothing of the meaning of any symbol.  Every syntactic
//! rule is parameterized by a [`Config`](struct.Config.html): which bracket
//! pairs exist, which symbols are glue, infix, associative, or triggers, which
//! keywords form sibling groups, how strings, comments, and directives look.
//! The same input therefore parses differently under different
//! configurations, and the output is an uninterpreted tree ready for any
//! downstream consumer.
//!
//! Layout is significant: newlines and indentation delimit items and blocks,
//! except inside bracketed lists, where only the brackets and separators do.
//! Glue symbols attach to their neighbors without whitespace, triggers like
//! `:` open sections that run to the end of the line or over an indented
//! block, and infix and associative symbols are folded mechanically, with no
//! precedence.
//!
//! Parsing is incremental.  Sources are pulled one character at a time through
//! the [`SourceStream`](trait.SourceStream.html) trait, and top-level items are
//! yielded by [`ParseIter`](struct.ParseIter.html) as soon as each is complete.
//! Nesting is kept on an explicit stack, so deep input never overflows the
//! native stack, and deep trees are also dropped iteratively.

#![forbid(unsafe_code)]


mod datum;
pub use datum::*;

pub mod drop;

mod error;
pub use error::{ConfigError, ContextKind, Error, ErrorClass, ErrorKind, SourceError};

mod source;
pub use source::{SourcePos, SourceStream, premade};

mod config;
pub use config::{Config, ConfigSpec, StringDelims, SymbolClass, Trigger};

mod parser;
pub use parser::{ParseIter, Parser};

mod context;
mod cursor;
mod emitter;
mod resolver;
mod scanner;
mod whitespace;


#[cfg(test)]
mod test_util {
    use crate::Datum;

    /// Minimal rendering, enough to check shapes.
    pub(crate) fn show(d: &Datum) -> String {
        match d {
            Datum::Atom(a) => a.text.clone(),
            Datum::List(l) => {
                let inner: Vec<String> = l.children.iter().map(show).collect();
                format!("{}{}{}", l.delim.open, inner.join(" "), l.delim.close)
            }
        }
    }
}
