//! Utilities for constructing inputs of various shapes and sizes, and the
//! various ways of parsing them that the suites are run against.

use std::{env, io::{self, Read}};

use knit::{
    Config, Datum, Error, Parser,
    common::{inmem, stream},
    source_stream::{CharIterSourceStream, ReadSourceStream},
};


/// This allows passing a `tree-size=$SIZE` command-line argument to the tests
pub fn get_arg_tree_size() -> usize {
    // This default size is usually enough to blow the stack, without our
    // recursion-avoiding parsing and Drop impl
    const DEFAULT: usize = 1 << 16;
    env::args().find_map(
        |arg|
        match *arg.splitn(2, '=').collect::<Vec<_>>() {
            ["tree-size", size] => size.parse().ok(),
            _ => None
        }
    ).unwrap_or(DEFAULT)
}

/// `depth` nested applications, with an atom innermost
pub fn nested_parens(depth: usize) -> String {
    let mut s = String::with_capacity(2 * depth + 1);
    s.extend(std::iter::repeat('(').take(depth));
    s.push('x');
    s.extend(std::iter::repeat(')').take(depth));
    s
}

/// `depth` nested sections, each on its own more-indented line
pub fn nested_sections(depth: usize) -> String {
    let mut s = String::new();
    for i in 0 .. depth {
        s.push_str(&" ".repeat(i));
        s.push_str("f :\n");
    }
    s.push_str(&" ".repeat(depth));
    s.push('x');
    s
}

/// An infix chain of `len` operands, which folds into a left-leaning tree of
/// depth `len - 1`
pub fn infix_chain(len: usize) -> String {
    let mut s = String::from("a");
    for _ in 1 .. len {
        s.push_str(" + a");
    }
    s
}

/// `count` top-level items, one per line
pub fn many_items(count: usize) -> String {
    (0 .. count).map(|i| format!("item {}\n", i)).collect()
}

/// The depth of the given tree, where an atom has depth 0
pub fn depth(datum: &Datum) -> usize {
    let mut max = 0;
    let mut pending = vec![(datum, 0)];
    while let Some((d, n)) = pending.pop() {
        max = max.max(n);
        if let Datum::List(list) = d {
            pending.extend(list.children.iter().map(|c| (c, n + 1)));
        }
    }
    max
}


/// Parse from an in-memory string.
pub fn parse_inmem(config: &Config, input: &str) -> Vec<Result<Datum, Error>> {
    inmem::parse_str(config, input)
}

/// Parse from an iterator of `char`s, as a streaming source would be.
pub fn parse_chars(config: &Config, input: &str) -> Vec<Result<Datum, Error>> {
    let iter = Parser::new(config).parse(CharIterSourceStream::new(input.chars()));
    up_to_first_err(iter)
}

/// Parse from a reader of UTF-8 bytes.
pub fn parse_reader(config: &Config, input: &str) -> Vec<Result<Datum, Error>> {
    stream::parse_reader(config, input.as_bytes())
}

/// Parse from a reader that gives one byte per read, through the smallest
/// buffer, so that every multi-byte character spans refills.
pub fn parse_trickle(config: &Config, input: &str) -> Vec<Result<Datum, Error>> {
    let source = ReadSourceStream::with_capacity(1, Trickle(input.as_bytes()));
    up_to_first_err(Parser::new(config).parse(source))
}

fn up_to_first_err<I>(iter: I) -> Vec<Result<Datum, Error>>
    where I: Iterator<Item = Result<Datum, Error>>,
{
    let mut results = Vec::new();
    for r in iter {
        let stop = r.is_err();
        results.push(r);
        if stop {
            break;
        }
    }
    results
}

/// A reader that gives at most one byte per read.
#[derive(Debug)]
pub struct Trickle<'a>(pub &'a [u8]);

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match (self.0.split_first(), buf.first_mut()) {
            (Some((&b, rest)), Some(slot)) => {
                *slot = b;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes() {
        assert_eq!(nested_parens(3), "(((x)))");
        assert_eq!(nested_sections(2), "f :\n f :\n  x");
        assert_eq!(infix_chain(3), "a + a + a");
        assert_eq!(many_items(2), "item 0\nitem 1\n");
    }

    #[test]
    fn trickle() {
        let mut t = Trickle(b"ab");
        let mut buf = [0; 4];
        assert_eq!(t.read(&mut buf).unwrap(), 1);
        assert_eq!(t.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'b');
        assert_eq!(t.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn depths() {
        let c = Config::standard();
        let items = parse_inmem(&c, &nested_parens(5));
        assert_eq!(depth(items[0].as_ref().unwrap()), 5);
        let items = parse_inmem(&c, &infix_chain(4));
        assert_eq!(depth(items[0].as_ref().unwrap()), 3);
    }
}
