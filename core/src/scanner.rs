//! The atom scanner: turns the characters after a gap into one token, with the
//! fixed precedence of system paths, string literals, directives, glue, and
//! ordinary atoms.

use crate::{
    Atom, AtomKind, Config, Delim, ErrorKind, SourcePos, SourceStream, Span,
    StrKind, SymbolClass,
    cursor::Cursor,
    error::Fault,
};


/// The fixed, non-configurable system path patterns.
const PATH_PATTERNS: [&str; 4] = ["./", "../", ":/", "~/"];


/// One lexical unit handed to the context stack.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum Token {
    /// Ordinary atom, string literal, system path, or directive
    Atom(Atom),
    /// Prefix glue symbol glued to a following unit
    Prefix(Atom),
    /// Suffix glue symbol glued to a preceding unit
    Suffix(Atom),
    /// Suffix glue symbol with no left operand, glued to a following unit
    Tag(Atom),
    /// Section, structure or effect trigger, spaced on both sides
    Trigger(SymbolClass, Atom),
    Open(Delim, SourcePos),
    Close(char, SourcePos),
    Separator(SourcePos),
    Sequence(SourcePos),
    Eof(SourcePos),
}


/// What immediately precedes the token about to be scanned.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Adjacency {
    /// Whether a completed operand precedes with zero characters between
    pub(crate) after_unit: bool,
    /// Whether whitespace (or the start of the source) precedes
    pub(crate) spaced: bool,
}


/// Whether `ch` can begin a unit that glue could attach to.
fn starts_unit(config: &Config, ch: char) -> bool {
    !(ch.is_whitespace() || config.is_closer(ch) || config.is_separator(ch)
      || config.is_sequence(ch))
}

/// The first of `symbols` that the cursor is looking at.  The symbols are
/// longest first, so this is the longest match.
fn match_symbol<'s, S>(cursor: &mut Cursor<S>, symbols: &'s [String])
                       -> Result<Option<&'s str>, Fault>
    where S: SourceStream,
{
    for sym in symbols {
        if cursor.looking_at(0, sym)? {
            return Ok(Some(sym));
        }
    }
    Ok(None)
}

fn at_path<S>(cursor: &mut Cursor<S>) -> Result<bool, Fault>
    where S: SourceStream,
{
    for pat in PATH_PATTERNS {
        if cursor.looking_at(0, pat)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn span_from(start: SourcePos, cursor: &Cursor<impl SourceStream>) -> Span {
    Span::new(start.offset, cursor.pos().offset)
}


/// Scan the next token.  The cursor must be at a non-whitespace character or at
/// the end of the source.
pub(crate) fn scan<S>(cursor: &mut Cursor<S>, config: &Config, adj: Adjacency)
                      -> Result<Token, Fault>
    where S: SourceStream,
{
    let start = cursor.pos();
    let Some(ch) = cursor.peek()? else {
        return Ok(Token::Eof(start));
    };

    if let Some(delim) = config.opener(ch) {
        let _ = cursor.bump()?;
        return Ok(Token::Open(delim, start));
    }
    if config.is_closer(ch) {
        let _ = cursor.bump()?;
        return Ok(Token::Close(ch, start));
    }
    if config.is_separator(ch) {
        let _ = cursor.bump()?;
        return Ok(Token::Separator(start));
    }
    if config.is_sequence(ch) {
        let _ = cursor.bump()?;
        return Ok(Token::Sequence(start));
    }

    if at_path(cursor)? {
        let mut text = String::new();
        return scan_path(cursor, start, &mut text).map(Token::Atom);
    }
    if let Some(kind) = config.string_kind(ch) {
        return scan_string(cursor, kind).map(Token::Atom);
    }
    if cursor.looking_at(0, config.directive_prefix())? {
        return scan_directive(cursor, config).map(Token::Atom);
    }

    // A prefix symbol that is not glued is an ordinary atom, even if it also
    // begins with a suffix symbol.
    let mut plain_prefix = false;
    if !adj.after_unit {
        if let Some(sym) = match_symbol(cursor, config.prefix_symbols())? {
            let len = sym.chars().count();
            match cursor.peek_nth(len)? {
                None => return Err(Fault::at(ErrorKind::GlueAtEof(sym.to_owned()), start)),
                Some(next) if starts_unit(config, next) => {
                    let atom = scan_symbol(cursor, sym, start)?;
                    return Ok(Token::Prefix(atom));
                }
                Some(_) => plain_prefix = true,
            }
        }
    }
    let suffix = if plain_prefix { None }
                 else { match_symbol(cursor, config.suffix_symbols())? };
    if let Some(sym) = suffix {
        let len = sym.chars().count();
        let next = cursor.peek_nth(len)?;
        if adj.after_unit {
            if next.is_none() {
                return Err(Fault::at(ErrorKind::GlueAtEof(sym.to_owned()), start));
            }
            return scan_symbol(cursor, sym, start).map(Token::Suffix);
        } else if next.map_or(false, |n| starts_unit(config, n)) {
            return scan_symbol(cursor, sym, start).map(Token::Tag);
        }
    }

    let atom = scan_atom(cursor, config, String::new(), start)?;
    if adj.spaced {
        if let Some(class @ (SymbolClass::Section | SymbolClass::Structure
                             | SymbolClass::Effect)) = config.class_of(&atom.text)
        {
            if cursor.peek()?.map_or(true, char::is_whitespace) {
                return Ok(Token::Trigger(class, atom));
            }
        }
    }
    Ok(Token::Atom(atom))
}

fn scan_symbol<S>(cursor: &mut Cursor<S>, sym: &str, start: SourcePos) -> Result<Atom, Fault>
    where S: SourceStream,
{
    let mut text = String::new();
    cursor.bump_str(sym, &mut text)?;
    Ok(Atom::symbol(text, span_from(start, cursor)))
}

/// Collect an ordinary atom, appending to `text`.  A glue symbol at its very
/// start (which was not recognized as glue) is taken whole, along with any
/// glue symbols directly after it.  After that it ends at whitespace, a
/// delimiter, separator, sequence or string character, or a suffix glue
/// symbol.  A system path pattern anywhere turns the rest into a path.
fn scan_atom<S>(cursor: &mut Cursor<S>, config: &Config, mut text: String, start: SourcePos)
                -> Result<Atom, Fault>
    where S: SourceStream,
{
    if text.is_empty() {
        loop {
            let sym = match match_symbol(cursor, config.prefix_symbols())? {
                Some(sym) => Some(sym),
                None => match_symbol(cursor, config.suffix_symbols())?,
            };
            match sym {
                Some(sym) => cursor.bump_str(sym, &mut text)?,
                None => break,
            }
        }
    }
    loop {
        let Some(ch) = cursor.peek()? else { break };
        if config.is_atom_end(ch) {
            break;
        }
        if at_path(cursor)? {
            return scan_path(cursor, start, &mut text);
        }
        if !text.is_empty() && match_symbol(cursor, config.suffix_symbols())?.is_some() {
            break;
        }
        if let Some(ch) = cursor.bump()? {
            text.push(ch);
        }
    }
    Ok(Atom::symbol(text, span_from(start, cursor)))
}

/// Collect everything up to the next whitespace as one path atom, after the
/// already-collected `text`.
fn scan_path<S>(cursor: &mut Cursor<S>, start: SourcePos, text: &mut String)
                -> Result<Atom, Fault>
    where S: SourceStream,
{
    while let Some(ch) = cursor.peek()? {
        if ch.is_whitespace() {
            break;
        }
        let _ = cursor.bump()?;
        text.push(ch);
    }
    Ok(Atom { text: std::mem::take(text), kind: AtomKind::Path,
              span: span_from(start, cursor) })
}

fn scan_directive<S>(cursor: &mut Cursor<S>, config: &Config) -> Result<Atom, Fault>
    where S: SourceStream,
{
    let start = cursor.pos();
    let prefix = config.directive_prefix();
    match cursor.peek_nth(prefix.chars().count())? {
        Some(ch) if !config.is_atom_end(ch) => {}
        _ => return Err(Fault::at(ErrorKind::InvalidDirective, start)),
    }
    let mut text = String::new();
    cursor.bump_str(prefix, &mut text)?;
    // The name always has at least its first character.
    if let Some(ch) = cursor.bump()? {
        text.push(ch);
    }
    let atom = scan_atom(cursor, config, text, start)?;
    Ok(match atom.kind {
        AtomKind::Symbol => Atom { kind: AtomKind::Directive, ..atom },
        _ => atom,
    })
}

/// Scan a string literal of the given kind, whose opening delimiter is at the
/// cursor.
fn scan_string<S>(cursor: &mut Cursor<S>, kind: StrKind) -> Result<Atom, Fault>
    where S: SourceStream,
{
    let start = cursor.pos();
    let mut text = String::new();
    let mut value = String::new();
    let Some(delim) = cursor.bump()? else {
        return Err(Fault::at(ErrorKind::UnterminatedString, start));
    };
    text.push(delim);

    loop {
        let at = cursor.pos();
        let Some(ch) = cursor.bump()? else {
            return Err(Fault::at(ErrorKind::UnterminatedString, at));
        };
        text.push(ch);
        match kind {
            StrKind::Escaped if ch == '\\' => {
                let decoded = scan_escape(cursor, delim, &mut text, at)?;
                value.push(decoded);
            }
            _ if ch == delim => {
                if kind == StrKind::Raw && cursor.peek()? == Some(delim) {
                    let _ = cursor.bump()?;
                    text.push(delim);
                    value.push(delim);
                } else {
                    break;
                }
            }
            StrKind::Binary => match ch {
                '0' | '1' => value.push(ch),
                '_' => {}
                c if c.is_whitespace() => {}
                c => return Err(Fault::at(ErrorKind::InvalidBinaryDigit(c), at)),
            },
            _ => value.push(ch),
        }
    }

    Ok(Atom { text, kind: AtomKind::Str(kind, value), span: span_from(start, cursor) })
}

/// Decode the escape after a backslash, which was at `at`.
fn scan_escape<S>(cursor: &mut Cursor<S>, delim: char, text: &mut String, at: SourcePos)
                  -> Result<char, Fault>
    where S: SourceStream,
{
    let Some(e) = cursor.bump()? else {
        return Err(Fault::at(ErrorKind::UnterminatedString, cursor.pos()));
    };
    text.push(e);
    Ok(match e {
        '\\' => '\\',
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        'u' => {
            let bad = || Fault::at(ErrorKind::BadEscape('u'), at);
            if cursor.peek()? != Some('{') {
                return Err(bad());
            }
            let _ = cursor.bump()?;
            text.push('{');
            let mut hex = String::new();
            loop {
                match cursor.bump()? {
                    Some('}') => break,
                    Some(h) if h.is_ascii_hexdigit() && hex.len() < 6 => hex.push(h),
                    Some(_) => return Err(bad()),
                    None => return Err(Fault::at(ErrorKind::UnterminatedString,
                                                 cursor.pos())),
                }
            }
            text.push_str(&hex);
            text.push('}');
            u32::from_str_radix(&hex, 16).ok()
                .and_then(char::from_u32)
                .ok_or_else(bad)?
        }
        c if c == delim => delim,
        c => return Err(Fault::at(ErrorKind::BadEscape(c), at)),
    })
}

/// Scan a `#!` line at the very start of a source, up to but excluding its
/// line break.
pub(crate) fn scan_shebang<S>(cursor: &mut Cursor<S>) -> Result<Atom, Fault>
    where S: SourceStream,
{
    let start = cursor.pos();
    let mut text = String::new();
    while let Some(ch) = cursor.peek()? {
        if ch == '\n' || (ch == '\r' && cursor.peek_nth(1)? == Some('\n')) {
            break;
        }
        let _ = cursor.bump()?;
        text.push(ch);
    }
    Ok(Atom { text, kind: AtomKind::Shebang, span: span_from(start, cursor) })
}
