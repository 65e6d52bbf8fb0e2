//! A `SourceStream` implementation that decodes UTF-8 from any `io::Read`.

use std::io::{self, Read};

use crate::{SourceError, SourceStream};


const DEFAULT_CAPACITY: usize = 8 * 1024;

/// Longest UTF-8 encoding of a `char`
const MAX_WIDTH: usize = 4;


/// A [`SourceStream`] that reads bytes from any [`Read`]er into a fixed-size
/// buffer and decodes them as UTF-8 incrementally, so that parsing proceeds as
/// the input arrives and the input never needs to be entirely in memory.
///
/// Invalid UTF-8, including an encoding truncated by the end of the input, is
/// reported as [`SourceError::InvalidUtf8`] with the byte offset where it
/// begins.  A read failure is reported as [`SourceError::Read`].  Reads
/// interrupted by signals are retried.
///
/// [`SourceStream`]: ../../knit_core/trait.SourceStream.html
/// [`Read`]: http://doc.rust-lang.org/std/io/trait.Read.html
/// [`SourceError::InvalidUtf8`]: ../../knit_core/enum.SourceError.html#variant.InvalidUtf8
/// [`SourceError::Read`]: ../../knit_core/enum.SourceError.html#variant.Read
#[derive(Debug)]
pub struct ReadSourceStream<R> {
    reader: R,
    buf: Box<[u8]>,
    /// Start of the not-yet-decoded bytes in `buf`
    start: usize,
    /// End of the bytes read into `buf`
    end: usize,
    /// Offset, relative to the start of the reading, of `buf[start]`
    offset: usize,
    eof: bool,
}

impl<R> ReadSourceStream<R>
    where R: Read,
{
    /// Make a new `SourceStream` that reads from `reader`.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, reader)
    }

    /// Make a new `SourceStream` that reads from `reader` at most `capacity`
    /// bytes at a time.  The capacity is raised to the longest UTF-8 encoding
    /// if it is less.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; capacity.max(MAX_WIDTH)].into_boxed_slice(),
            start: 0,
            end: 0,
            offset: 0,
            eof: false,
        }
    }

    /// Give back the reader.  Any bytes already read but not yet pulled are
    /// lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Move the undecoded bytes to the front of the buffer, and read more after
    /// them.
    fn refill(&mut self) -> Result<(), SourceError> {
        self.buf.copy_within(self.start .. self.end, 0);
        self.end -= self.start;
        self.start = 0;
        loop {
            match self.reader.read(&mut self.buf[self.end ..]) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    tracing::trace!(bytes = n, offset = self.offset, "read source bytes");
                    self.end += n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// The length of the UTF-8 encoding that starts with the byte `b`, or `None` if
/// `b` cannot start one.
fn utf8_width(b: u8) -> Option<usize> {
    match b {
        0x00 ..= 0x7F => Some(1),
        0xC2 ..= 0xDF => Some(2),
        0xE0 ..= 0xEF => Some(3),
        0xF0 ..= 0xF4 => Some(4),
        _ => None,
    }
}


/// Enables `ReadSourceStream` to be used as the input source for parsing.
impl<R> SourceStream for ReadSourceStream<R>
    where R: Read,
{
    fn pull(&mut self) -> Option<Result<char, SourceError>> {
        loop {
            let pending = &self.buf[self.start .. self.end];
            if let Some(&first) = pending.first() {
                let invalid = Some(Err(SourceError::InvalidUtf8(self.offset)));
                let Some(width) = utf8_width(first) else { return invalid };
                if let Some(bytes) = pending.get(.. width) {
                    let Some(ch) = std::str::from_utf8(bytes).ok()
                                                            .and_then(|s| s.chars().next())
                    else {
                        return invalid;
                    };
                    self.start += width;
                    self.offset += width;
                    return Some(Ok(ch));
                }
                if self.eof {
                    return invalid;
                }
            } else if self.eof {
                return None;
            }
            if let Err(e) = self.refill() {
                return Some(Err(e));
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn pull_all<R: Read>(mut s: ReadSourceStream<R>) -> Vec<Result<char, SourceError>> {
        std::iter::from_fn(|| s.pull()).take(100).collect()
    }

    #[test]
    fn decodes_across_refills() {
        let text = "aλ€😀z";
        for cap in 1 .. 8 {
            let s = ReadSourceStream::with_capacity(cap, text.as_bytes());
            let chars: Vec<char> = pull_all(s).into_iter().map(Result::unwrap).collect();
            assert_eq!(chars, text.chars().collect::<Vec<_>>());
        }
    }

    #[test]
    fn invalid_utf8() {
        let s = ReadSourceStream::new(&b"ab\xFFc"[..]);
        assert_eq!(pull_all(s).last(), Some(&Err(SourceError::InvalidUtf8(2))));
        let s = ReadSourceStream::new(&b"a\xCE"[..]);
        assert_eq!(pull_all(s).last(), Some(&Err(SourceError::InvalidUtf8(1))));
        let s = ReadSourceStream::new(&b"\xE2\x28\xA1"[..]);
        assert_eq!(pull_all(s).first(), Some(&Err(SourceError::InvalidUtf8(0))));
    }

    #[test]
    fn read_failure() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            }
        }
        let mut s = ReadSourceStream::new(Failing);
        assert!(matches!(s.pull(),
                         Some(Err(SourceError::Read { kind: io::ErrorKind::BrokenPipe, .. }))));
    }
}
