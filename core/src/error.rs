//! Errors that might be returned by configuring or parsing.

use std::fmt;

use crate::source::SourcePos;


/// The broad class of an error.  Every error is fatal: there is no recovery and
/// no partial result.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ErrorClass {
    /// Conflicting or malformed configuration, detected before any parsing
    Configuration,
    /// Malformed characters: strings, indentation, directives
    Lexical,
    /// Malformed nesting: delimiters, glue operands, contexts
    Structural,
    /// The character source itself failed
    Source,
}


/// The kind of collection context that was active when an error was detected.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ContextKind {
    /// The top-level context
    Top,
    /// A section opened by the section trigger
    Section,
    /// A structure opened by the structure trigger
    Structure,
    /// An effect opened by the effect trigger
    Effect,
    /// A section opened implicitly by glue or an associative symbol at the end
    /// of a line
    Implicit,
    /// A list opened by the given delimiter character
    Delimited(char),
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Top => f.write_str("top level"),
            ContextKind::Section => f.write_str("section"),
            ContextKind::Structure => f.write_str("structure"),
            ContextKind::Effect => f.write_str("effect"),
            ContextKind::Implicit => f.write_str("implicit section"),
            ContextKind::Delimited(c) => write!(f, "`{}` list", c),
        }
    }
}


/// The possible errors that might be detected while parsing.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Tab character in the leading indentation of a line
    #[error("tab in indentation")]
    TabInIndentation,
    /// End-of-stream reached inside a string literal
    #[error("unterminated string literal")]
    UnterminatedString,
    /// Unknown or malformed backslash escape in an escaped string
    #[error("bad escape `\\{0}`")]
    BadEscape(char),
    /// Character other than a bit or a spacer in a binary string
    #[error("invalid binary digit `{0}`")]
    InvalidBinaryDigit(char),
    /// Directive prefix not followed by a name
    #[error("directive prefix without a name")]
    InvalidDirective,
    /// Close-bracket without matching open-bracket
    #[error("unbalanced `{0}`")]
    UnbalancedClose(char),
    /// Close-bracket that does not match the innermost open-bracket
    #[error("expected `{expected}` but found `{found}`")]
    MismatchedClose {
        /// The close-bracket that would have matched
        expected: char,
        /// The close-bracket that was found
        found: char,
    },
    /// End-of-stream reached inside a delimited list
    #[error("missing `{0}`")]
    MissingClose(char),
    /// End-of-stream immediately after a glue symbol
    #[error("end of input right after glue `{0}`")]
    GlueAtEof(String),
    /// Glue symbol whose operand is missing
    #[error("glue `{0}` has no operand")]
    MissingOperand(String),
    /// Section, structure or effect context closed without any items
    #[error("empty section")]
    EmptySection,
    /// Line indented deeper than any open context allows
    #[error("unexpected indentation of {found} columns (expected {expected})")]
    UnexpectedIndent {
        /// The indentation that would have been consistent
        expected: usize,
        /// The indentation that was found
        found: usize,
    },
    /// The character source failed
    #[error("source failed: {0}")]
    Source(#[from] SourceError),
}

impl ErrorKind {
    /// The broad class of this kind of error.
    pub fn class(&self) -> ErrorClass {
        use ErrorKind::*;

        match self {
            TabInIndentation | UnterminatedString | BadEscape(_)
            | InvalidBinaryDigit(_) | InvalidDirective
                => ErrorClass::Lexical,
            UnbalancedClose(_) | MismatchedClose{..} | MissingClose(_)
            | GlueAtEof(_) | MissingOperand(_) | EmptySection
            | UnexpectedIndent{..}
                => ErrorClass::Structural,
            Source(_)
                => ErrorClass::Source,
        }
    }
}


/// A fatal parse error, with the position where it was detected and the kind
/// of context that was active then.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
#[error("{kind} at line {}, column {} (byte {}), in {context}",
        .pos.line, .pos.column, .pos.offset)]
pub struct Error {
    /// What went wrong
    pub kind: ErrorKind,
    /// Where it was detected
    pub pos: SourcePos,
    /// The innermost context active when it was detected
    pub context: ContextKind,
}

impl Error {
    /// The broad class of this error.
    #[inline]
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}


/// An error detected below the level of the context stack, which does not know
/// the active context, and which might not know its position (when the source
/// itself failed).
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Fault {
    pub(crate) kind: ErrorKind,
    pub(crate) pos: Option<SourcePos>,
}

impl Fault {
    pub(crate) fn at(kind: ErrorKind, pos: SourcePos) -> Self {
        Self { kind, pos: Some(pos) }
    }
}

impl From<SourceError> for Fault {
    fn from(e: SourceError) -> Self {
        Self { kind: ErrorKind::Source(e), pos: None }
    }
}


/// Failure of a [`SourceStream`](trait.SourceStream.html) to produce its next
/// character.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum SourceError {
    /// The underlying reader failed
    #[error("read failed ({kind:?}): {message}")]
    Read {
        /// The I/O error kind
        kind: std::io::ErrorKind,
        /// The I/O error's message
        message: String,
    },
    /// The underlying bytes are not valid UTF-8
    #[error("invalid UTF-8 at byte {0}")]
    InvalidUtf8(usize),
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Read { kind: e.kind(), message: e.to_string() }
    }
}


/// The possible errors that might be returned by validating a configuration.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ConfigError {
    /// A symbol was assigned to two incompatible categories
    #[error("symbol `{symbol}` is both {first} and {second}")]
    Conflict {
        /// The symbol
        symbol: String,
        /// The category it was first assigned to
        first: &'static str,
        /// The category it was also assigned to
        second: &'static str,
    },
    /// An empty symbol, prefix or keyword
    #[error("empty symbol in {0}")]
    EmptySymbol(&'static str),
    /// A symbol containing whitespace
    #[error("symbol `{symbol}` in {category} contains whitespace")]
    Whitespace {
        /// The symbol
        symbol: String,
        /// Where it was given
        category: &'static str,
    },
    /// The same character used by two delimiter pairs, or as both halves of
    /// one pair
    #[error("delimiter character `{0}` is used more than once")]
    DuplicateDelimiter(char),
    /// A delimiter that must be one of the configured pairs is not
    #[error("{role} delimiter `{open}` is not a configured pair")]
    UnknownDelimiter {
        /// What it was given for
        role: &'static str,
        /// Its opening character
        open: char,
    },
    /// A special character collides with a delimiter or with another special
    /// character
    #[error("character `{ch}` for {role} is already in use")]
    ReservedChar {
        /// The character
        ch: char,
        /// What it was given for
        role: &'static str,
    },
    /// A keyword listed in two sibling groups
    #[error("sibling keyword `{0}` is in more than one group")]
    DuplicateKeyword(String),
    /// A sibling group with no keywords
    #[error("sibling group {0} is empty")]
    EmptyGroup(usize),
}

impl ConfigError {
    /// Always [`ErrorClass::Configuration`](enum.ErrorClass.html).
    #[inline]
    pub fn class(&self) -> ErrorClass {
        ErrorClass::Configuration
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        assert_eq!(ErrorKind::TabInIndentation.class(), ErrorClass::Lexical);
        assert_eq!(ErrorKind::MissingClose(')').class(), ErrorClass::Structural);
        assert_eq!(ErrorKind::GlueAtEof("&".into()).class(), ErrorClass::Structural);
        assert_eq!(ErrorKind::Source(SourceError::InvalidUtf8(3)).class(),
                   ErrorClass::Source);
        assert_eq!(ConfigError::EmptyGroup(0).class(), ErrorClass::Configuration);
    }

    #[test]
    fn display() {
        let e = Error {
            kind: ErrorKind::MissingClose(')'),
            pos: SourcePos { offset: 4, line: 1, column: 5 },
            context: ContextKind::Delimited('('),
        };
        assert_eq!(e.to_string(),
                   "missing `)` at line 1, column 5 (byte 4), in `(` list");

        let c = ConfigError::Conflict { symbol: ":".into(),
                                        first: "suffix glue",
                                        second: "section trigger" };
        assert_eq!(c.to_string(), "symbol `:` is both suffix glue and section trigger");
    }

    #[test]
    fn io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "gone");
        assert_eq!(SourceError::from(io),
                   SourceError::Read { kind: std::io::ErrorKind::UnexpectedEof,
                                       message: "gone".into() });
    }
}
