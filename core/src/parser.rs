//! The parser: drives the whitespace analyzer and the atom scanner, and keeps
//! the explicit stack of collection contexts that tokens and boundaries are
//! applied to.

use std::{fmt, mem::take};

use crate::{
    Atom, AtomKind, Config, ContextKind, Datum, Error, ErrorKind, Origin, SourcePos,
    SourceStream, Span, SymbolClass,
    context::{self, Form, Frame, Group},
    cursor::Cursor,
    emitter::{self, Emitter},
    error::Fault,
    resolver,
    scanner::{self, Adjacency, Token},
    source::premade::StrSourceStream,
    whitespace::{self, Gap},
};


/// Represents the ability to parse character sources according to one frozen
/// [`Config`](struct.Config.html).  It is cheap to copy, and any number of
/// parses, on any number of threads, may use the same configuration at once.
#[derive(Copy, Clone, Debug)]
pub struct Parser<'c> {
    config: &'c Config,
}

impl<'c> Parser<'c> {
    /// Make a new `Parser` that uses `config`.
    #[inline]
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// The configuration used.
    #[inline]
    pub fn config(&self) -> &'c Config {
        self.config
    }

    /// The primary method.  Parse the given character source and return an
    /// iterator that yields each top-level item as a `Datum` AST, as soon as
    /// it is complete, or a fatal `Error` after which it yields nothing more.
    pub fn parse<S>(&self, source: S) -> ParseIter<'c, S>
        where S: SourceStream,
    {
        ParseIter::new(self.config, source)
    }

    /// Parse an in-memory string.
    pub fn parse_str<'s>(&self, text: &'s str) -> ParseIter<'c, StrSourceStream<'s>> {
        self.parse(StrSourceStream::new(text))
    }

    /// Parse the whole source and materialize its top level as the single root
    /// `List`, by the same rules as a section.  Empty input is an
    /// `EmptySection` error.
    pub fn parse_root<S>(&self, source: S) -> Result<Datum, Error>
        where S: SourceStream,
    {
        let mut iter = self.parse(source);
        let mut items = Vec::new();
        for item in &mut iter {
            items.push(item?);
        }
        let end = iter.cursor.pos();
        emitter::materialize_root(self.config, items, end.offset)
            .map_err(|kind| Error { kind, pos: end, context: ContextKind::Top })
    }
}


/// An [`Iterator`](http://doc.rust-lang.org/std/iter/trait.Iterator.html) that
/// parses its source one top-level item at a time per each call to
/// [`next`](http://doc.rust-lang.org/std/iter/trait.Iterator.html#tymethod.next),
/// and yields a [`Datum`](enum.Datum.html) AST for each or an
/// [`Error`](struct.Error.html).
///
/// Nesting is kept on an explicit stack of contexts, so arbitrarily deep input
/// never exhausts the native call stack.  The caller may stop pulling items at
/// any point; there is nothing to tear down.
pub struct ParseIter<'c, S> {
    config: &'c Config,
    cursor: Cursor<S>,
    /// The top-level context, which is never popped
    root: Frame,
    /// Nested contexts, innermost last.  Each one's parent is the one below
    /// it, or `root`.
    stack: Vec<Frame>,
    emitter: Emitter,
    /// The fatal error, once the items completed before it are handed over
    failure: Option<Error>,
    /// Indentation of the line the current run is on
    line_indent: usize,
    /// Whether the last token completed an operand
    after_unit: bool,
    /// Whether the next token continues the current unit across a line break
    continuation: bool,
    started: bool,
    finished: bool,
}

impl<S> fmt::Debug for ParseIter<'_, S>
    where S: SourceStream,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseIter")
         .field("pos", &self.cursor.pos())
         .field("depth", &self.stack.len())
         .field("finished", &self.finished)
         .finish_non_exhaustive()
    }
}

impl<'c, S> Iterator for ParseIter<'c, S>
    where S: SourceStream,
{
    type Item = Result<Datum, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.emitter.pop() {
                return Some(Ok(item));
            }
            if let Some(error) = self.failure.take() {
                return Some(Err(error));
            }
            if self.finished {
                return None;
            }
            if let Err(fault) = self.step() {
                self.failure = Some(self.fail(fault));
            }
        }
    }
}

impl<'c, S> ParseIter<'c, S>
    where S: SourceStream,
{
    fn new(config: &'c Config, source: S) -> Self {
        Self {
            config,
            cursor: Cursor::new(source),
            root: Frame::new(ContextKind::Top, Form::Top { body: 0 }, 0),
            stack: Vec::new(),
            emitter: Emitter::default(),
            failure: None,
            line_indent: 0,
            after_unit: false,
            continuation: false,
            started: false,
            finished: false,
        }
    }

    /// Position of the next character to be parsed.
    pub fn pos(&self) -> SourcePos {
        self.cursor.pos()
    }

    /// The innermost context.
    fn top(&mut self) -> &mut Frame {
        match self.stack.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    fn top_ref(&self) -> &Frame {
        self.stack.last().unwrap_or(&self.root)
    }

    /// Whether newlines are boundaries here, i.e. no delimited list encloses
    /// the innermost non-inline context.
    fn indent_mode(&self) -> bool {
        self.stack.iter().rev()
            .find(|f| f.form != Form::Inline)
            .map_or(true, Frame::is_indented)
    }

    fn push(&mut self, frame: Frame) {
        tracing::trace!(context = %frame.kind, depth = self.stack.len() + 1, start = frame.start,
                        "context opened");
        self.stack.push(frame);
    }

    /// Convert a fault to the error reported to the caller, and stop.  A
    /// top-level sibling group is emitted first, unless the line that failed
    /// was continuing it.
    fn fail(&mut self, fault: Fault) -> Error {
        let error = Error {
            kind: fault.kind,
            pos: fault.pos.unwrap_or_else(|| self.cursor.pos()),
            context: self.top_ref().kind,
        };
        tracing::debug!(kind = %error.kind, line = error.pos.line, column = error.pos.column,
                        context = %error.context, "parse failed");
        self.finished = true;
        self.stack.clear();
        if !self.root.run.continues_group {
            self.flush_group();
        }
        error
    }

    /// Consume one gap and one token.
    fn step(&mut self) -> Result<(), Fault> {
        let spaced = if self.started {
            let gap = whitespace::skip(&mut self.cursor, self.config, false)?;
            if let Some(gap) = gap {
                self.on_gap(gap)?;
            }
            gap.is_some()
        } else {
            self.begin()?;
            true
        };
        let adj = Adjacency { after_unit: (self.after_unit && !spaced) || self.continuation,
                              spaced };
        self.continuation = false;
        let token = scanner::scan(&mut self.cursor, self.config, adj)?;
        self.after_unit = matches!(token, Token::Atom(_) | Token::Close(..));
        self.on_token(token)
    }

    /// The start of the source: an optional shebang line, and the indentation
    /// of the first line, which all top-level lines must share.
    fn begin(&mut self) -> Result<(), Fault> {
        self.started = true;
        tracing::debug!("parse started");
        if self.cursor.looking_at(0, "#!")? {
            let shebang = scanner::scan_shebang(&mut self.cursor)?;
            self.emitter.push(shebang.into());
        }
        let indent = whitespace::skip(&mut self.cursor, self.config, true)?
            .map_or(0, |gap| gap.indent);
        self.root.form = Form::Top { body: indent };
        self.root.start_line();
        self.line_indent = indent;
        Ok(())
    }

    fn at_suffix(&mut self) -> Result<bool, Fault> {
        let config = self.config;
        for sym in config.suffix_symbols() {
            if self.cursor.looking_at(0, sym)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn on_gap(&mut self, gap: Gap) -> Result<(), Fault> {
        let config = self.config;
        let indent_mode = self.indent_mode();
        let deeper = gap.indent > self.line_indent;
        // A line that starts with suffix glue continues the unit before it,
        // from a deeper line or from anywhere inside brackets.
        if !gap.is_inline() && (deeper || !indent_mode)
            && self.top_ref().unit.has_operand() && self.at_suffix()?
        {
            self.continuation = true;
            return Ok(());
        }
        if gap.is_inline() || !indent_mode {
            if !self.top_ref().unit.awaits_operand() {
                self.finish_unit()?;
            }
            return Ok(());
        }
        if self.cursor.peek()?.is_none() {
            return Ok(());
        }

        if self.top_ref().unit.awaits_operand() {
            if deeper {
                self.open_implicit(gap.indent);
                return Ok(());
            }
            let glue = self.top_ref().unit.pending_glue();
            return Err(Fault::at(ErrorKind::MissingOperand(glue), gap.end));
        }
        self.finish_unit()?;
        if deeper && self.top_ref().run_ends_with_assoc(config) {
            self.open_implicit(gap.indent);
            return Ok(());
        }
        self.line_break(gap.indent, gap.end)
    }

    /// A section opened by glue or an associative symbol that ends its line.
    fn open_implicit(&mut self, indent: usize) {
        let form = Form::Block { opener: self.line_indent, body: Some(indent) };
        let mut frame = Frame::new(ContextKind::Implicit, form, self.cursor.pos().offset);
        frame.start_line();
        self.push(frame);
        self.line_indent = indent;
    }

    /// A new line at `indent` in indentation mode.
    fn line_break(&mut self, indent: usize, pos: SourcePos) -> Result<(), Fault> {
        // Inline contexts end with their line, except that one with nothing
        // after its trigger becomes a block.
        loop {
            let opener = self.line_indent;
            let top = self.top();
            if top.form != Form::Inline {
                break;
            }
            if top.is_fresh() {
                top.form = Form::Block { opener, body: None };
                break;
            }
            self.close_top()?;
        }

        if let Form::Block { opener, body: None } = self.top_ref().form {
            if indent > opener {
                let top = self.top();
                top.form = Form::Block { opener, body: Some(indent) };
                top.start_line();
                self.line_indent = indent;
                return Ok(());
            }
        }

        self.end_run()?;
        loop {
            match self.top_ref().form {
                Form::Block { body: Some(body), .. } if body <= indent => break,
                Form::Block { .. } | Form::Inline => self.close_top()?,
                Form::Top { .. } | Form::Delimited { .. } => break,
            }
            self.end_run()?;
        }

        let expected = self.top_ref().body_indent().unwrap_or(indent);
        if expected != indent {
            return Err(Fault::at(ErrorKind::UnexpectedIndent { expected, found: indent },
                                 pos));
        }
        self.line_indent = indent;
        self.top().start_line();
        Ok(())
    }

    fn on_token(&mut self, token: Token) -> Result<(), Fault> {
        let config = self.config;
        self.start_run(&token);
        match token {
            Token::Atom(atom) => self.take_atom(atom),
            Token::Prefix(symbol) => {
                if self.top_ref().unit.has_operand() {
                    self.finish_unit()?;
                }
                self.top().unit.push_prefix(symbol);
                Ok(())
            }
            Token::Suffix(symbol) => {
                let pos = self.cursor.pos();
                self.top().unit.push_suffix(config, symbol)
                    .map_err(|s| Fault::at(ErrorKind::MissingOperand(s.text), pos))
            }
            Token::Tag(symbol) => {
                if self.top_ref().unit.has_operand() {
                    self.finish_unit()?;
                }
                let pos = self.cursor.pos();
                let unit = &mut self.top().unit;
                if !unit.is_empty() {
                    return Err(Fault::at(ErrorKind::MissingOperand(unit.pending_glue()), pos));
                }
                unit.set_tag(symbol);
                Ok(())
            }
            Token::Trigger(class, symbol) => {
                let kind = match class {
                    SymbolClass::Structure => ContextKind::Structure,
                    SymbolClass::Effect => ContextKind::Effect,
                    _ => ContextKind::Section,
                };
                self.push(Frame::new(kind, Form::Inline, symbol.span.start));
                Ok(())
            }
            Token::Open(delim, pos) => {
                let graft = self.top_ref().unit.has_operand();
                let kind = ContextKind::Delimited(delim.open);
                self.push(Frame::new(kind, Form::Delimited { delim, graft }, pos.offset));
                Ok(())
            }
            Token::Close(ch, pos) => self.close_delimited(ch, pos),
            Token::Separator(_) => {
                self.end_run()?;
                self.top().separated = true;
                Ok(())
            }
            Token::Sequence(_) => {
                self.close_inlines()?;
                self.end_run()?;
                self.top().separated = true;
                Ok(())
            }
            Token::Eof(pos) => self.finish(pos),
        }
    }

    fn take_atom(&mut self, atom: Atom) -> Result<(), Fault> {
        let config = self.config;
        let atom = if matches!(atom.kind, AtomKind::Str(..))
                      && self.top_ref().unit.has_operand()
        {
            match self.top().unit.prefix_string(config, atom) {
                Ok(()) => return Ok(()),
                Err(atom) => atom,
            }
        } else {
            atom
        };
        if self.top_ref().unit.has_operand() {
            self.finish_unit()?;
        }
        self.top().unit.set_primary(atom.into());
        Ok(())
    }

    /// Finish the current unit, appending it to the current run.
    fn finish_unit(&mut self) -> Result<(), Fault> {
        let config = self.config;
        let pos = self.cursor.pos();
        match self.top().unit.finish(config) {
            Ok(Some(datum)) => {
                self.push_elem(datum);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(glue) => Err(Fault::at(ErrorKind::MissingOperand(glue), pos)),
        }
    }

    /// At the first token of a run, decide whether it continues the open
    /// sibling group: only a run at the start of a line whose first token is a
    /// later keyword of the group does.  Otherwise the group is emitted now.
    fn start_run(&mut self, token: &Token) {
        let config = self.config;
        let top = self.top_ref();
        if !top.run.elems.is_empty() || !top.unit.is_empty() {
            return;
        }
        let keyword = match token {
            Token::Atom(a) if top.is_indented() && top.run.line_start
                              && a.kind == AtomKind::Symbol
                => config.keyword(&a.text),
            _ => None,
        };
        let continues = top.group.as_ref().map_or(false, |g| g.accepts(keyword));
        if !continues {
            self.flush_group();
        }
        let run = &mut self.top().run;
        run.keyword = keyword;
        run.continues_group = continues;
    }

    /// Append to the current run.
    fn push_elem(&mut self, datum: Datum) {
        self.top().run.elems.push(datum);
    }

    /// End the current run: fold it and add it as one item, to an open sibling
    /// group if it continues one.
    fn end_run(&mut self) -> Result<(), Fault> {
        self.finish_unit()?;
        let config = self.config;
        let top = self.top();
        let run = take(&mut top.run);
        let neutral = matches!(top.form, Form::Delimited { .. })
                      && resolver::is_neutral(config, &run.elems);
        let elems = if neutral { run.elems } else { resolver::fold_run(config, run.elems) };
        let Some(item) = resolver::wrap_run(config, elems) else {
            return Ok(());
        };

        if run.continues_group {
            if let (Some(group), Some((_, rank))) = (&mut top.group, run.keyword) {
                group.clauses.push(item);
                group.rank = rank;
                return Ok(());
            }
        }
        self.flush_group();
        if let Some((id, 0)) = run.keyword {
            self.top().group = Some(Group { id, rank: 0, clauses: vec![item] });
            return Ok(());
        }
        self.add_item(item);
        Ok(())
    }

    fn add_item(&mut self, item: Datum) {
        match self.stack.last_mut() {
            Some(frame) => frame.items.push(item),
            None => self.emitter.push(item),
        }
    }

    /// Emit the innermost context's sibling group, if any: a lone clause as
    /// itself, or several as one combined application.
    fn flush_group(&mut self) {
        let config = self.config;
        let Some(group) = self.top().group.take() else { return };
        let mut clauses = group.clauses;
        let item = if clauses.len() == 1 {
            clauses.pop()
        } else {
            Some(resolver::application(config, Origin::Sibling, clauses))
        };
        if let Some(item) = item {
            self.add_item(item);
        }
    }

    /// Materialize the innermost (non-delimited, non-root) context, and give
    /// the result to its parent's current unit.
    fn close_top(&mut self) -> Result<(), Fault> {
        if self.stack.is_empty() {
            return Ok(());
        }
        self.end_run()?;
        self.flush_group();
        let config = self.config;
        let pos = self.cursor.pos();
        let top = self.top();
        let (kind, start) = (top.kind, top.start);
        let items = take(&mut top.items);
        let count = items.len();
        let datum = match kind {
            ContextKind::Implicit => context::materialize_implicit(config, items, start),
            _ => {
                let (delim, origin) = context::materializer(config, kind);
                context::materialize(config, items, delim, origin, start)
            }
        }.map_err(|e| Fault::at(e, pos))?;
        tracing::trace!(context = %kind, items = count, start = datum.span().start,
                        end = datum.span().end, "context materialized");
        let _ = self.stack.pop();
        self.deliver(datum)
    }

    fn close_inlines(&mut self) -> Result<(), Fault> {
        while self.top_ref().form == Form::Inline {
            self.close_top()?;
        }
        Ok(())
    }

    fn close_delimited(&mut self, ch: char, pos: SourcePos) -> Result<(), Fault> {
        self.close_inlines()?;
        let config = self.config;
        let (delim, graft) = match self.top_ref().form {
            Form::Delimited { delim, graft } => (delim, graft),
            _ => return Err(Fault::at(ErrorKind::UnbalancedClose(ch), pos)),
        };
        if delim.close != ch {
            return Err(Fault::at(ErrorKind::MismatchedClose { expected: delim.close,
                                                              found: ch },
                                 pos));
        }

        let (mut children, folded) = if self.top_ref().separated {
            self.end_run()?;
            (take(&mut self.top().items), false)
        } else {
            self.finish_unit()?;
            let elems = take(&mut self.top().run.elems);
            if resolver::is_neutral(config, &elems) {
                (elems, false)
            } else {
                let count = elems.len();
                let elems = resolver::fold_run(config, elems);
                let folded = elems.len() < count;
                (elems, folded)
            }
        };
        let tag = resolver::take_tag(&mut children);
        let span = Span::new(self.top_ref().start, pos.offset + ch.len_utf8());
        tracing::trace!(context = %self.top_ref().kind, items = children.len(),
                        start = span.start, end = span.end, "context materialized");
        let _ = self.stack.pop();

        // Application brackets around one folded operation only group it.
        let grouping = !graft && folded && delim == config.application()
            && matches!(children.as_slice(),
                        [Datum::List(l)] if l.origin == Origin::Application);
        let body = match children.pop() {
            Some(Datum::List(mut inner)) if grouping => {
                inner.span = span;
                inner
            }
            last => {
                children.extend(last);
                resolver::list(config, delim, Origin::Source, children, span)
            }
        };
        if graft {
            self.top().unit.graft(body, tag);
            return Ok(());
        }
        self.deliver(match tag {
            Some(tag) => resolver::apply_tag(config, tag, body.into()),
            None => body.into(),
        })
    }

    /// Give a materialized context to the current unit as its operand.
    fn deliver(&mut self, datum: Datum) -> Result<(), Fault> {
        if self.top_ref().unit.has_operand() {
            self.finish_unit()?;
        }
        self.top().unit.set_primary(datum);
        Ok(())
    }

    /// End of input: every open context is closed, and the top level's last
    /// item and sibling group are emitted.
    fn finish(&mut self, pos: SourcePos) -> Result<(), Fault> {
        if self.top_ref().unit.awaits_operand() {
            let glue = self.top_ref().unit.pending_glue();
            return Err(Fault::at(ErrorKind::GlueAtEof(glue), pos));
        }
        let unclosed = self.stack.iter().rev().find_map(|f| match f.form {
            Form::Delimited { delim, .. } => Some(delim.close),
            _ => None,
        });
        if let Some(close) = unclosed {
            return Err(Fault::at(ErrorKind::MissingClose(close), pos));
        }
        while !self.stack.is_empty() {
            self.close_top()?;
        }
        self.end_run()?;
        self.flush_group();
        self.finished = true;
        tracing::debug!(end = pos.offset, "parse finished");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::show;

    fn parse(s: &str) -> Vec<Result<String, ErrorKind>> {
        let config = Config::standard();
        Parser::new(&config).parse_str(s)
            .map(|r| r.map(|d| show(&d)).map_err(|e| e.kind))
            .collect()
    }

    fn ok(s: &str) -> Vec<String> {
        parse(s).into_iter().collect::<Result<_, _>>().unwrap()
    }

    #[test]
    fn items_are_lazy() {
        let config = Config::standard();
        let mut it = Parser::new(&config).parse_str("a b\nc (d");
        assert_eq!(it.next().map(|r| r.map(|d| show(&d))), Some(Ok("(a b)".to_owned())));
        assert_eq!(it.next().map(|r| r.map_err(|e| e.kind)),
                   Some(Err(ErrorKind::MissingClose(')'))));
        assert!(it.next().is_none());
    }

    #[test]
    fn glue_and_graft() {
        assert_eq!(ok("&data"), ["(& data)"]);
        assert_eq!(ok("&a.b"), ["(& (. a b))"]);
        assert_eq!(ok("f[x]{y}"), ["(f [x] {y})"]);
        assert_eq!(ok("[a]{b}"), ["[a {b}]"]);
        assert_eq!(ok("f(x).g(y)"), ["(. (f x) (g y))"]);
        assert_eq!(ok("r\"s\""), ["(r \"s\")"]);
    }

    #[test]
    fn indentation() {
        assert_eq!(ok("f x :\n  a b\n  c\nd"), ["(f x {(a b) c})", "d"]);
        assert_eq!(ok("foo.\n  bar"), ["(. foo bar)"]);
        assert_eq!(ok("list\n  .map(f)\n  # note\n\n  .sum()"),
                   ["(. (. list (map f)) (sum))"]);
        assert_eq!(ok("xs |>\n  map f\n  sum"), ["(|> xs {(map f) sum})"]);
        assert_eq!(parse("a\n  b"),
                   [Ok("a".to_owned()),
                    Err(ErrorKind::UnexpectedIndent { expected: 0, found: 2 })]);
    }

    #[test]
    fn contexts() {
        assert_eq!(ok("s : t := a, b"), ["(s (t [a b]))"]);
        assert_eq!(ok("if p : (print 1)"), ["(if p (print 1))"]);
        assert_eq!(ok("if p : 42"), ["(if p {42})"]);
        assert_eq!(ok("(a\n b)"), ["(a b)"]);
        assert_eq!(parse("x :"), [Err(ErrorKind::EmptySection)]);
    }

    #[test]
    fn delimited_materialization() {
        assert_eq!(ok("[a, b, ::T]"), ["(:: [a b] T)"]);
        assert_eq!(ok("(a + b) * c"), ["(* (+ a b) c)"]);
        assert_eq!(ok("(f a)"), ["(f a)"]);
        assert_eq!(ok("(list\n  .map(f))"), ["((. list (map f)))"]);
    }

    #[test]
    fn sibling_group_before_error() {
        assert_eq!(parse("if a : x\n(b"),
                   [Ok("(if a {x})".to_owned()), Err(ErrorKind::MissingClose(')'))]);
        let config = Config::standard();
        let mut it = Parser::new(&config).parse_str("if a : x\n(b c d e f g");
        assert_eq!(it.next().map(|r| r.map(|d| show(&d))), Some(Ok("(if a {x})".to_owned())));
        // Decided by the `(` alone
        assert_eq!(it.pos().offset, 10);
    }

    #[test]
    fn root() {
        let config = Config::standard();
        let p = Parser::new(&config);
        assert_eq!(p.parse_root(StrSourceStream::new("a\nb")).map(|d| show(&d)),
                   Ok("{a b}".to_owned()));
        assert_eq!(p.parse_root(StrSourceStream::new("(a)")).map(|d| show(&d)),
                   Ok("(a)".to_owned()));
        let e = p.parse_root(StrSourceStream::new("  # nothing\n")).unwrap_err();
        assert_eq!((e.kind, e.context), (ErrorKind::EmptySection, ContextKind::Top));
    }

    #[test]
    fn error_positions() {
        let config = Config::standard();
        let e = Parser::new(&config).parse_str("(a\n  [b c)").find_map(Result::err).unwrap();
        assert_eq!(e.kind, ErrorKind::MismatchedClose { expected: ']', found: ')' });
        assert_eq!(e.pos, SourcePos { offset: 9, line: 2, column: 7 });
        assert_eq!(e.context, ContextKind::Delimited('['));
    }
}
