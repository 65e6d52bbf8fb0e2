//! Datum type used in the abstract syntax tree (AST) returned by parsing.

use serde::{Deserialize, Serialize};


/// Byte range, relative to the start of the source, that a `Datum` was produced
/// from.  `end` is exclusive.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Span {
    /// Offset of the first byte
    pub start: usize,
    /// Offset just past the last byte
    pub end: usize,
}

impl Span {
    /// Make a new `Span` covering `start .. end`.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The smallest `Span` that covers both `self` and `other`.  Synthetic
    /// `List`s get their spans this way so they remain traceable to all of
    /// their constituents.
    #[inline]
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self { start: self.start.min(other.start), end: self.end.max(other.end) }
    }

    /// Number of bytes covered.
    #[inline]
    pub fn len(self) -> usize {
        self.end - self.start
    }

    /// Whether no bytes are covered.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}


/// An open/close bracket pair.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Delim {
    /// Opening character
    pub open: char,
    /// Closing character
    pub close: char,
}

impl Delim {
    /// Make a new pair.
    #[inline]
    pub const fn new(open: char, close: char) -> Self {
        Self { open, close }
    }
}


/// Purely syntactic metadata about a `List`, derived from its delimiter.  It
/// means nothing to the parser itself.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Shape {
    /// Delimited by the configured struct delimiter
    Struct,
    /// Delimited by the configured binary delimiter
    Binary,
}


/// Which rule created a `List`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Origin {
    /// Written explicitly in the source with a delimiter pair
    Source,
    /// Glue, infix or associative folding, or the wrapping of a multi-element
    /// run
    Application,
    /// Head-graft or tail-graft adjacency
    Graft,
    /// Materialization of a section context
    Section,
    /// Materialization of a structure context
    Structure,
    /// Materialization of an effect context
    Effect,
    /// A bare suffix-glue tag form (`::Type`) that has no left operand
    Tag,
    /// Combination of sibling-keyword clauses
    Sibling,
}


/// The delimiter kind of a `List`: either one of the configured bracket pairs,
/// as written in the source, or a synthetic kind chosen by the rule that made
/// it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum DelimKind {
    /// A configured bracket pair written in the source (possibly grafted onto)
    Pair(Delim),
    /// Synthetic application
    Application,
    /// Synthetic section materialization
    Section,
    /// Synthetic structure materialization
    Structure,
    /// Synthetic effect materialization
    Effect,
}


/// The three kinds of string literal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum StrKind {
    /// Backslash escapes are interpreted
    Escaped,
    /// Content is literal; the delimiter is embedded by doubling it
    Raw,
    /// Content is a bit pattern
    Binary,
}


/// What sort of text an `Atom` is.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AtomKind {
    /// Identifier, number, transformer symbol, marker, etc.
    Symbol,
    /// Filesystem or URL-like text, never split
    Path,
    /// Directive-prefixed name
    Directive,
    /// The `#!` line at the very start of a source
    Shebang,
    /// String literal, with its decoded content
    Str(StrKind, String),
}


/// An indivisible span of text.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Atom {
    /// The text exactly as it appears in the source
    pub text: String,
    /// Classification, and the decoded content for strings
    pub kind: AtomKind,
    /// Where it came from
    pub span: Span,
}

impl Atom {
    /// Make a plain `Symbol` atom.
    pub fn symbol(text: impl Into<String>, span: Span) -> Self {
        Self { text: text.into(), kind: AtomKind::Symbol, span }
    }

    /// Whether this is a `Symbol` with exactly the given text.
    #[inline]
    pub fn is_symbol(&self, text: &str) -> bool {
        self.kind == AtomKind::Symbol && self.text == text
    }

    /// The decoded content if this is a string literal.
    pub fn str_value(&self) -> Option<&str> {
        match &self.kind {
            AtomKind::Str(_, value) => Some(value),
            _ => None,
        }
    }
}


/// An ordered sequence of `Datum`s tagged with its delimiter.
///
/// Dropping a `List` never recurses (see [`drop`](../drop/index.html)), so
/// because it implements `Drop` its fields cannot be moved out by
/// destructuring; use `std::mem::take` on `children` instead.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct List {
    /// Elements in parse order
    pub children: Vec<Datum>,
    /// The bracket characters this list prints with
    pub delim: Delim,
    /// The rule that created it
    pub origin: Origin,
    /// Syntactic shape tag, if any
    pub shape: Option<Shape>,
    /// Where it came from.  Synthetic lists cover all their constituents.
    pub span: Span,
}

impl List {
    /// The delimiter kind, as a configured pair for lists written in the source
    /// (or grafted onto), or the synthetic kind otherwise.
    pub fn delim_kind(&self) -> DelimKind {
        match self.origin {
            Origin::Source | Origin::Graft => DelimKind::Pair(self.delim),
            Origin::Section => DelimKind::Section,
            Origin::Structure => DelimKind::Structure,
            Origin::Effect => DelimKind::Effect,
            Origin::Application | Origin::Tag | Origin::Sibling
                => DelimKind::Application,
        }
    }

    /// The first child, conventionally the "head" or operator.
    pub fn head(&self) -> Option<&Datum> {
        self.children.first()
    }
}


/// The abstract syntax tree (AST) type returned by parsing.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Datum {
    /// An indivisible span of text
    Atom(Atom),
    /// A delimited, or synthetic, sequence of other `Datum`s
    List(List),
}

impl Datum {
    /// The source span.
    pub fn span(&self) -> Span {
        match self {
            Datum::Atom(a) => a.span,
            Datum::List(l) => l.span,
        }
    }

    /// The `Atom`, if this is one.
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Datum::Atom(a) => Some(a),
            Datum::List(_) => None,
        }
    }

    /// The `List`, if this is one.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Datum::List(l) => Some(l),
            Datum::Atom(_) => None,
        }
    }

    /// Whether this is a `Symbol` atom with exactly the given text.
    pub fn is_symbol(&self, text: &str) -> bool {
        self.as_atom().map_or(false, |a| a.is_symbol(text))
    }

    /// Structural equality that ignores spans and origins: atoms compare by
    /// text and kind, lists by delimiter characters and children.  This is the
    /// equality under which reparsing printed output is idempotent.
    ///
    /// This avoids stack overflows for very deep trees by using an explicit
    /// stack instead of recursion.
    pub fn same_structure(&self, other: &Datum) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (Datum::Atom(a1), Datum::Atom(a2))
                    => if a1.text != a2.text || a1.kind != a2.kind {
                        return false;
                    },
                (Datum::List(l1), Datum::List(l2))
                    => if l1.delim == l2.delim
                          && l1.children.len() == l2.children.len()
                    {
                        pending.extend(l1.children.iter().zip(&l2.children));
                    } else {
                        return false;
                    },
                _
                    => return false
            }
        }
        true
    }
}

impl From<Atom> for Datum {
    #[inline]
    fn from(a: Atom) -> Self {
        Datum::Atom(a)
    }
}

impl From<List> for Datum {
    #[inline]
    fn from(l: List) -> Self {
        Datum::List(l)
    }
}
