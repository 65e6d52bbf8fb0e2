//! The character sources that parsing pulls from, and the positions of their
//! characters.

use std::str::Chars;

use crate::error::SourceError;


/// Position of a character relative to the start of its source.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SourcePos {
    /// Byte offset (of the UTF-8 encoding)
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in `char`s
    pub column: usize,
}

impl SourcePos {
    /// The position of the first character of any source.
    pub const START: SourcePos = SourcePos { offset: 0, line: 1, column: 1 };

    /// The position after `ch`, assuming `self` is the position of `ch`.
    #[must_use]
    pub fn after(self, ch: char) -> Self {
        if ch == '\n' {
            SourcePos { offset: self.offset + 1, line: self.line + 1, column: 1 }
        } else {
            SourcePos { offset: self.offset + ch.len_utf8(),
                        column: self.column + 1,
                        ..self }
        }
    }
}

impl Default for SourcePos {
    fn default() -> Self {
        Self::START
    }
}


/// A stream of characters that is pulled lazily, one `char` at a time, and that
/// might fail.
///
/// Parsing never asks for more than a small, bounded number of characters
/// beyond the one it is working on, so streaming sources that are not entirely
/// in memory, or that are indefinitely long, work well.  Positions are tracked
/// by the parser, so implementations only need to produce characters.
pub trait SourceStream {
    /// Pull the next character.  `None` means the end of the stream.  After
    /// either `None` or an error is returned, this will not be called again by
    /// a parser.
    fn pull(&mut self) -> Option<Result<char, SourceError>>;
}

impl<S> SourceStream for &mut S
    where S: SourceStream + ?Sized,
{
    #[inline]
    fn pull(&mut self) -> Option<Result<char, SourceError>> {
        (**self).pull()
    }
}

impl<S> SourceStream for Box<S>
    where S: SourceStream + ?Sized,
{
    #[inline]
    fn pull(&mut self) -> Option<Result<char, SourceError>> {
        (**self).pull()
    }
}


/// Implementations provided for ready use.
pub mod premade {
    use super::*;

    /// A [`SourceStream`](../trait.SourceStream.html) of the characters of an
    /// in-memory string slice.  It never fails.
    #[derive(Clone, Debug)]
    pub struct StrSourceStream<'s> {
        chars: Chars<'s>,
    }

    impl<'s> StrSourceStream<'s> {
        /// Make a new stream of the characters of `s`.
        pub fn new(s: &'s str) -> Self {
            Self { chars: s.chars() }
        }
    }

    impl SourceStream for StrSourceStream<'_> {
        #[inline]
        fn pull(&mut self) -> Option<Result<char, SourceError>> {
            self.chars.next().map(Ok)
        }
    }

    impl<'s> From<&'s str> for StrSourceStream<'s> {
        fn from(s: &'s str) -> Self {
            Self::new(s)
        }
    }
}
