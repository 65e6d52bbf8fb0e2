//! Bounded-lookahead cursor over a `SourceStream`, which tracks the positions
//! of characters.

use std::collections::VecDeque;

use crate::{SourceStream, SourcePos, error::SourceError};


pub(crate) struct Cursor<S> {
    source: S,
    ahead: VecDeque<char>,
    pos: SourcePos,
    exhausted: bool,
}

impl<S> Cursor<S>
    where S: SourceStream,
{
    pub(crate) fn new(source: S) -> Self {
        Self { source, ahead: VecDeque::new(), pos: SourcePos::START, exhausted: false }
    }

    /// Position of the next character (or of the end).
    #[inline]
    pub(crate) fn pos(&self) -> SourcePos {
        self.pos
    }

    /// The character `n` places ahead of the cursor, without consuming.
    pub(crate) fn peek_nth(&mut self, n: usize) -> Result<Option<char>, SourceError> {
        while self.ahead.len() <= n && !self.exhausted {
            match self.source.pull() {
                Some(Ok(ch)) => self.ahead.push_back(ch),
                Some(Err(e)) => {
                    self.exhausted = true;
                    return Err(e);
                }
                None => self.exhausted = true,
            }
        }
        Ok(self.ahead.get(n).copied())
    }

    #[inline]
    pub(crate) fn peek(&mut self) -> Result<Option<char>, SourceError> {
        self.peek_nth(0)
    }

    /// Consume the next character.
    pub(crate) fn bump(&mut self) -> Result<Option<char>, SourceError> {
        let next = self.peek()?;
        if let Some(ch) = next {
            let _ = self.ahead.pop_front();
            self.pos = self.pos.after(ch);
        }
        Ok(next)
    }

    /// Whether the upcoming characters are exactly `s`, starting `skip` places
    /// ahead.
    pub(crate) fn looking_at(&mut self, skip: usize, s: &str) -> Result<bool, SourceError> {
        for (i, c) in s.chars().enumerate() {
            if self.peek_nth(skip + i)? != Some(c) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Consume exactly the characters of `s`, which must already have been
    /// checked with `looking_at`, appending them to `into`.
    pub(crate) fn bump_str(&mut self, s: &str, into: &mut String) -> Result<(), SourceError> {
        for _ in s.chars() {
            if let Some(ch) = self.bump()? {
                into.push(ch);
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::premade::StrSourceStream;

    #[test]
    fn lookahead_and_positions() {
        let mut c = Cursor::new(StrSourceStream::new("ab\ncd"));
        assert_eq!(c.peek_nth(3), Ok(Some('c')));
        assert!(c.looking_at(0, "ab").unwrap());
        assert!(!c.looking_at(1, "ab").unwrap());
        let mut s = String::new();
        c.bump_str("ab", &mut s).unwrap();
        assert_eq!(s, "ab");
        assert_eq!(c.bump(), Ok(Some('\n')));
        assert_eq!(c.pos(), SourcePos { offset: 3, line: 2, column: 1 });
        assert_eq!(c.peek_nth(5), Ok(None));
        assert_eq!(c.bump(), Ok(Some('c')));
        assert_eq!(c.bump(), Ok(Some('d')));
        assert_eq!(c.bump(), Ok(None));
        assert_eq!(c.pos().offset, 5);
    }

    struct Failing(u8);

    impl SourceStream for Failing {
        fn pull(&mut self) -> Option<Result<char, SourceError>> {
            if self.0 == 0 {
                Some(Err(SourceError::InvalidUtf8(1)))
            } else {
                self.0 -= 1;
                Some(Ok('x'))
            }
        }
    }

    #[test]
    fn source_failure() {
        let mut c = Cursor::new(Failing(1));
        assert_eq!(c.bump(), Ok(Some('x')));
        assert_eq!(c.bump(), Err(SourceError::InvalidUtf8(1)));
    }
}
