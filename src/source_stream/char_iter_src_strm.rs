//! A generic `SourceStream` implementation for any `Iterator` of `char`s.

use crate::{SourceError, SourceStream};


/// A generic [`SourceStream`] implementation for any `Iterator` of `char`s.  It
/// never fails.
///
/// This is useful for streaming sources that are not entirely in memory and
/// that already decode their own characters, e.g. a channel receiver or a
/// generator.  Positions are tracked by the parser, relative to the start of
/// the iteration, as if the `char`s were UTF-8 encoded.
///
/// [`SourceStream`]: ../../knit_core/trait.SourceStream.html
#[derive(Clone, Debug)]
pub struct CharIterSourceStream<CI> {
    iter: CI,
}

impl<CI> CharIterSourceStream<CI>
    where CI: Iterator<Item = char>,
{
    /// Given anything that can convert into an `Iterator` of `char`s, make a
    /// new `SourceStream` from it that yields its `char`s.
    pub fn new<I>(iter: I) -> Self
        where I: IntoIterator<IntoIter = CI, Item = char>,
    {
        Self { iter: iter.into_iter() }
    }
}


/// Enables `CharIterSourceStream` to be used as the input source for parsing.
impl<CI> SourceStream for CharIterSourceStream<CI>
    where CI: Iterator<Item = char>,
{
    #[inline]
    fn pull(&mut self) -> Option<Result<char, SourceError>> {
        self.iter.next().map(Ok)
    }
}
