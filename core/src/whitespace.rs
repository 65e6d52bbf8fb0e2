//! Classification of runs of whitespace and comments into the newline and
//! indentation signals that drive boundaries.

use crate::{
    Config, SourceStream, SourcePos, ErrorKind,
    cursor::Cursor,
    error::Fault,
};


/// A maximal run of whitespace and comments.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Gap {
    /// How many line breaks it contains
    pub(crate) newlines: usize,
    /// Columns of leading indentation of the line it ends on.  Only meaningful
    /// when `line_start` is.
    pub(crate) indent: usize,
    /// Whether any comment was discarded
    pub(crate) had_comment: bool,
    /// Whether it ends at the start of a line's content, i.e. it contained a
    /// line break or began at the very start of the source
    pub(crate) line_start: bool,
    /// Where it ended
    pub(crate) end: SourcePos,
}

impl Gap {
    /// Whether it stays within one line, and so is never a boundary.
    #[inline]
    pub(crate) fn is_inline(&self) -> bool {
        !self.line_start
    }
}


/// Whether a comment starts at the cursor: the comment prefix followed by a
/// space, or by the end of the line or of the source.
fn at_comment<S>(cursor: &mut Cursor<S>, config: &Config) -> Result<bool, Fault>
    where S: SourceStream,
{
    let prefix = config.comment_prefix();
    if !cursor.looking_at(0, prefix)? {
        return Ok(false);
    }
    let after = cursor.peek_nth(prefix.chars().count())?;
    Ok(matches!(after, None | Some(' ' | '\n' | '\r')))
}

/// Consume a maximal run of whitespace and comments, returning `None` if there
/// was none, i.e. if the next token is immediately adjacent to the previous.
///
/// `at_source_start` makes the leading run of the source count as
/// indentation.  A tab in indentation is an error, but tabs elsewhere are
/// ordinary whitespace.
pub(crate) fn skip<S>(cursor: &mut Cursor<S>, config: &Config, at_source_start: bool)
                      -> Result<Option<Gap>, Fault>
    where S: SourceStream,
{
    let mut consumed = false;
    let mut newlines = 0;
    let mut indent = 0;
    let mut had_comment = false;
    let mut in_indent = at_source_start;

    loop {
        match cursor.peek()? {
            Some('\n') => {
                let _ = cursor.bump()?;
                newlines += 1;
                indent = 0;
                in_indent = true;
            }
            Some('\t') if in_indent => {
                return Err(Fault::at(ErrorKind::TabInIndentation, cursor.pos()));
            }
            Some(c) if c.is_whitespace() => {
                let _ = cursor.bump()?;
                // A carriage return is part of its line break, not indentation.
                if in_indent && c != '\r' {
                    indent += 1;
                }
            }
            Some(_) if at_comment(cursor, config)? => {
                while !matches!(cursor.peek()?, None | Some('\n')) {
                    let _ = cursor.bump()?;
                }
                had_comment = true;
                in_indent = false;
            }
            _ => break,
        }
        consumed = true;
    }

    Ok(if consumed {
        Some(Gap { newlines, indent, had_comment,
                   line_start: at_source_start || newlines > 0,
                   end: cursor.pos() })
    } else {
        None
    })
}
