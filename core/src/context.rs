//! The collection contexts kept on the parser's explicit stack, the runs and
//! units they accumulate, and the rules for materializing them.

use std::mem::take;

use crate::{
    Atom, AtomKind, Config, ContextKind, Datum, Delim, ErrorKind, List, Origin, Span,
    resolver,
};


/// How a context ends.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Form {
    /// The top level, which ends only at the end of input.  `body` is the
    /// indentation of its lines.
    Top { body: usize },
    /// Ends at the first line indented no deeper than `opener`, the
    /// indentation of the line that opened it.  `body` is the indentation of
    /// its lines once the first one is seen.
    Block { opener: usize, body: Option<usize> },
    /// Ends at the end of the current run.
    Inline,
    /// Ends at the matching close-bracket.  `graft` is whether it is glued to a
    /// preceding unit.
    Delimited { delim: Delim, graft: bool },
}


/// The operand currently being built in a unit.
#[derive(Debug)]
pub(crate) enum Primary {
    Plain(Datum),
    /// A chain of lists grafted onto an optional head, and the tags that
    /// closed any of them, applied to the whole chain
    Grafted { head: Option<Datum>, lists: Vec<List>, tags: Vec<List> },
}


/// One element of a run in the making: glue symbols and the operands they
/// attach to.  A unit is finished by whitespace (unless it awaits an
/// operand), or by anything that ends its run.
#[derive(Default, Debug)]
pub(crate) struct Unit {
    /// Bare suffix symbol that makes the whole unit a tag form
    tag: Option<Atom>,
    /// Prefix glue before the first operand, which applies to the whole chain
    outer: Vec<Atom>,
    /// Left operand of the pending suffix glue
    chain: Option<Datum>,
    /// Pending suffix glue symbol
    suffix: Option<Atom>,
    /// Prefix glue after the pending suffix, which applies to its right operand
    inner: Vec<Atom>,
    primary: Option<Primary>,
}

impl Unit {
    pub(crate) fn is_empty(&self) -> bool {
        self.tag.is_none() && self.outer.is_empty() && self.suffix.is_none()
            && self.primary.is_none()
    }

    /// Whether an operand is currently being built.
    pub(crate) fn has_operand(&self) -> bool {
        self.primary.is_some()
    }

    /// Whether glue has been seen whose operand has not.
    pub(crate) fn awaits_operand(&self) -> bool {
        self.primary.is_none() && !self.is_empty()
    }

    /// The innermost glue symbol still waiting for its operand.
    pub(crate) fn pending_glue(&self) -> String {
        self.inner.last()
            .or(self.suffix.as_ref())
            .or(self.outer.last())
            .or(self.tag.as_ref())
            .map(|a| a.text.clone())
            .unwrap_or_default()
    }

    pub(crate) fn push_prefix(&mut self, symbol: Atom) {
        if self.suffix.is_some() {
            self.inner.push(symbol);
        } else {
            self.outer.push(symbol);
        }
    }

    /// Start the unit as a tag form.  Only valid for an empty unit.
    pub(crate) fn set_tag(&mut self, symbol: Atom) {
        self.tag = Some(symbol);
    }

    /// Give the unit its operand.  Only valid when it has none.
    pub(crate) fn set_primary(&mut self, datum: Datum) {
        self.primary = Some(Primary::Plain(datum));
    }

    /// Prefix the current operand onto a string literal.
    pub(crate) fn prefix_string(&mut self, config: &Config, string: Atom) -> Result<(), Atom> {
        match self.primary.take() {
            Some(Primary::Plain(Datum::Atom(prefix))) if prefix.kind == AtomKind::Symbol => {
                self.set_primary(resolver::prefixed_string(config, prefix, string));
                Ok(())
            }
            other => {
                self.primary = other;
                Err(string)
            }
        }
    }

    /// Graft `list` onto the current operand.  `tag` is a tag form that ended
    /// `list`, which tags the resolved graft.
    pub(crate) fn graft(&mut self, list: List, tag: Option<List>) {
        self.primary = Some(match self.primary.take() {
            Some(Primary::Grafted { head, mut lists, mut tags }) => {
                lists.push(list);
                tags.extend(tag);
                Primary::Grafted { head, lists, tags }
            }
            Some(Primary::Plain(Datum::List(first))) if first.origin == Origin::Source
                => Primary::Grafted { head: None, lists: vec![first, list],
                                      tags: tag.into_iter().collect() },
            Some(Primary::Plain(head))
                => Primary::Grafted { head: Some(head), lists: vec![list],
                                      tags: tag.into_iter().collect() },
            None
                => Primary::Grafted { head: None, lists: vec![list],
                                      tags: tag.into_iter().collect() },
        });
    }

    /// The completed current operand, with its inner prefix glue applied.
    fn take_operand(&mut self, config: &Config) -> Option<Datum> {
        let operand = match self.primary.take()? {
            Primary::Plain(d) => d,
            Primary::Grafted { head, lists, tags } => tags.into_iter().fold(
                resolver::graft_chain(config, head, lists),
                |acc, tag| resolver::apply_tag(config, tag, acc)),
        };
        Some(take(&mut self.inner).into_iter().rev()
             .fold(operand, |acc, p| resolver::prefix_glue(config, p, acc)))
    }

    /// Suffix glue after the current operand, which becomes the left operand of
    /// `symbol`.  Returns the symbol back if there is no operand.
    pub(crate) fn push_suffix(&mut self, config: &Config, symbol: Atom) -> Result<(), Atom> {
        let Some(operand) = self.take_operand(config) else {
            return Err(symbol);
        };
        self.chain = Some(match (self.chain.take(), self.suffix.take()) {
            (Some(left), Some(pending)) => resolver::suffix_glue(config, pending, left, operand),
            _ => operand,
        });
        self.suffix = Some(symbol);
        Ok(())
    }

    /// Finish the unit, resetting it to empty.  `Ok(None)` if it was empty,
    /// and `Err` with the pending glue if it awaits an operand.
    pub(crate) fn finish(&mut self, config: &Config) -> Result<Option<Datum>, String> {
        if self.is_empty() {
            return Ok(None);
        }
        let pending = self.pending_glue();
        let Some(operand) = self.take_operand(config) else {
            return Err(pending);
        };
        let chain = match (self.chain.take(), self.suffix.take()) {
            (Some(left), Some(symbol)) => resolver::suffix_glue(config, symbol, left, operand),
            _ => operand,
        };
        let glued = take(&mut self.outer).into_iter().rev()
            .fold(chain, |acc, p| resolver::prefix_glue(config, p, acc));
        Ok(Some(match self.tag.take() {
            Some(tag) => resolver::tag_form(config, tag, glued),
            None => glued,
        }))
    }
}


/// The elements of one item in the making, between item boundaries.
#[derive(Default, Debug)]
pub(crate) struct Run {
    pub(crate) elems: Vec<Datum>,
    /// Whether it began at the start of a line, in indentation mode
    pub(crate) line_start: bool,
    /// `(group, rank)` if its first token is a sibling keyword
    pub(crate) keyword: Option<(usize, usize)>,
    /// Whether it continues the frame's open sibling group
    pub(crate) continues_group: bool,
}


/// Clauses of a sibling group being collected.
#[derive(Debug)]
pub(crate) struct Group {
    pub(crate) id: usize,
    /// Rank of the latest clause
    pub(crate) rank: usize,
    pub(crate) clauses: Vec<Datum>,
}

impl Group {
    /// Whether a clause whose first token is the keyword `(id, rank)` continues
    /// this group.
    pub(crate) fn accepts(&self, keyword: Option<(usize, usize)>) -> bool {
        matches!(keyword, Some((id, rank)) if id == self.id && rank > 0 && rank >= self.rank)
    }
}


/// A collection context on the stack.  Its parent is the frame below it.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) kind: ContextKind,
    pub(crate) form: Form,
    /// Where it was opened
    pub(crate) start: usize,
    /// Items already completed
    pub(crate) items: Vec<Datum>,
    pub(crate) run: Run,
    pub(crate) unit: Unit,
    /// Whether any separator or sequence character was seen directly in it
    pub(crate) separated: bool,
    pub(crate) group: Option<Group>,
}

impl Frame {
    pub(crate) fn new(kind: ContextKind, form: Form, start: usize) -> Self {
        Self { kind, form, start, items: Vec::new(), run: Run::default(),
               unit: Unit::default(), separated: false, group: None }
    }

    /// Whether nothing at all has been collected yet.
    pub(crate) fn is_fresh(&self) -> bool {
        self.items.is_empty() && self.run.elems.is_empty() && self.unit.is_empty()
            && self.group.is_none()
    }

    /// Whether newlines are boundaries within it.
    pub(crate) fn is_indented(&self) -> bool {
        matches!(self.form, Form::Top { .. } | Form::Block { .. })
    }

    /// Begin a new run at the start of a line.
    pub(crate) fn start_line(&mut self) {
        self.run = Run { line_start: true, ..Run::default() };
    }

    /// The indentation of its lines, if it is indentation-based and known.
    pub(crate) fn body_indent(&self) -> Option<usize> {
        match self.form {
            Form::Top { body } => Some(body),
            Form::Block { body, .. } => body,
            Form::Inline | Form::Delimited { .. } => None,
        }
    }

    /// Whether the run so far ends with an associative symbol.
    pub(crate) fn run_ends_with_assoc(&self, config: &Config) -> bool {
        use crate::SymbolClass::{AssocLeft, AssocRight};

        matches!(self.run.elems.last(),
                 Some(Datum::Atom(a)) if a.kind == AtomKind::Symbol
                     && matches!(config.class_of(&a.text), Some(AssocLeft | AssocRight)))
    }
}


/// The delimiter and origin that a trigger-opened or implicit context
/// materializes with.
pub(crate) fn materializer(config: &Config, kind: ContextKind) -> (Delim, Origin) {
    match kind {
        ContextKind::Structure => (config.structure_delim(), Origin::Structure),
        ContextKind::Effect => (config.effect_delim(), Origin::Effect),
        ContextKind::Section | ContextKind::Implicit | ContextKind::Top
        | ContextKind::Delimited(_)
            => (config.section_delim(), Origin::Section),
    }
}

/// Materialize the items of a section, structure, effect, or of the top level:
/// no items is an error, a single `List` collapses to itself, a single atom is
/// wrapped alone, and several items are wrapped in order.  A trailing tag form
/// is removed and tags the materialization of the rest.
pub(crate) fn materialize(config: &Config, mut items: Vec<Datum>, delim: Delim,
                          origin: Origin, start: usize) -> Result<Datum, ErrorKind> {
    let tag = resolver::take_tag(&mut items);
    let body = match items.len() {
        0 => return Err(ErrorKind::EmptySection),
        1 if matches!(items[0], Datum::List(_)) => items.pop(),
        _ => None,
    };
    let body = body.unwrap_or_else(|| {
        let span = Span::new(start, start);
        let span = items.first().map_or(span, Datum::span);
        resolver::list(config, delim, origin, items, span).into()
    });
    Ok(match tag {
        Some(tag) => resolver::apply_tag(config, tag, body),
        None => body,
    })
}

/// Materialize an implicit section: one item is itself, several are a
/// section.
pub(crate) fn materialize_implicit(config: &Config, mut items: Vec<Datum>, start: usize)
                                   -> Result<Datum, ErrorKind> {
    if items.len() == 1 {
        if let Some(item) = items.pop() {
            return Ok(item);
        }
    }
    materialize(config, items, config.section_delim(), Origin::Section, start)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::show;

    fn sym(t: &str, at: usize) -> Atom {
        Atom::symbol(t, Span::new(at, at + t.len()))
    }

    #[test]
    fn unit_glue() {
        let c = Config::standard();
        let mut u = Unit::default();
        u.push_prefix(sym("&", 0));
        assert!(u.awaits_operand());
        assert_eq!(u.pending_glue(), "&");
        u.set_primary(sym("a", 1).into());
        u.push_suffix(&c, sym(".", 2)).unwrap();
        u.push_prefix(sym("mut&", 3));
        u.set_primary(sym("b", 7).into());
        u.push_suffix(&c, sym(".", 8)).unwrap();
        u.set_primary(sym("c", 9).into());
        let d = u.finish(&c).unwrap().unwrap();
        assert_eq!(show(&d), "(& (. (. a (mut& b)) c))");
        assert_eq!(d.span(), Span::new(0, 10));
        assert!(u.is_empty());
    }

    #[test]
    fn unit_errors() {
        let c = Config::standard();
        let mut u = Unit::default();
        assert_eq!(u.finish(&c), Ok(None));
        assert!(u.push_suffix(&c, sym(".", 0)).is_err());
        u.set_primary(sym("a", 0).into());
        u.push_suffix(&c, sym("::", 1)).unwrap();
        assert_eq!(u.finish(&c), Err("::".to_owned()));
    }

    #[test]
    fn unit_tag_and_string() {
        let c = Config::standard();
        let mut u = Unit::default();
        u.set_tag(sym("::", 0));
        u.set_primary(sym("Int", 2).into());
        let d = u.finish(&c).unwrap().unwrap();
        assert!(resolver::is_tag_form(&d));

        let mut u = Unit::default();
        u.set_primary(sym("r", 0).into());
        let s = Atom { text: "'x'".into(),
                       kind: AtomKind::Str(crate::StrKind::Raw, "x".into()),
                       span: Span::new(1, 4) };
        assert!(u.prefix_string(&c, s.clone()).is_ok());
        assert!(u.prefix_string(&c, s).is_err());
        assert_eq!(show(&u.finish(&c).unwrap().unwrap()), "(r 'x')");
    }

    #[test]
    fn unit_grafts() {
        let c = Config::standard();
        let l = |open: char, close: char, t: &str, at: usize| {
            resolver::list(&c, Delim::new(open, close), Origin::Source, vec![sym(t, at).into()],
                           Span::new(at - 1, at + 2))
        };
        let mut u = Unit::default();
        u.set_primary(sym("f", 0).into());
        u.graft(l('[', ']', "x", 2), None);
        u.graft(l('{', '}', "y", 5), None);
        assert_eq!(show(&u.finish(&c).unwrap().unwrap()), "(f [x] {y})");

        let mut u = Unit::default();
        u.set_primary(l('[', ']', "a", 1).into());
        u.graft(l('{', '}', "b", 4), None);
        assert_eq!(show(&u.finish(&c).unwrap().unwrap()), "[a {b}]");

        let tag = || match resolver::tag_form(&c, sym("::", 6), sym("T", 8).into()) {
            Datum::List(t) => t,
            Datum::Atom(_) => unreachable!(),
        };
        let mut u = Unit::default();
        u.set_primary(sym("f", 0).into());
        u.graft(l('[', ']', "x", 2), Some(tag()));
        assert_eq!(show(&u.finish(&c).unwrap().unwrap()), "(:: [f x] T)");
    }

    #[test]
    fn materialization() {
        let c = Config::standard();
        let d = c.section_delim();
        let a = |t: &str| -> Datum { sym(t, 0).into() };
        assert_eq!(materialize(&c, vec![], d, Origin::Section, 0),
                   Err(ErrorKind::EmptySection));
        assert_eq!(show(&materialize(&c, vec![a("42")], d, Origin::Section, 0).unwrap()),
                   "{42}");
        let inner = resolver::application(&c, Origin::Application, vec![a("print"), a("1")]);
        assert_eq!(show(&materialize(&c, vec![inner], d, Origin::Section, 0).unwrap()),
                   "(print 1)");
        assert_eq!(show(&materialize(&c, vec![a("a"), a("b")], d, Origin::Section, 0)
                        .unwrap()),
                   "{a b}");

        let tag = || resolver::tag_form(&c, sym("::", 0), a("T"));
        assert_eq!(show(&materialize(&c, vec![a("a"), a("b"), tag()], d, Origin::Section, 0)
                        .unwrap()),
                   "(:: {a b} T)");
        assert_eq!(show(&materialize(&c, vec![a("a"), tag()], d, Origin::Section, 0).unwrap()),
                   "(:: {a} T)");
        assert_eq!(show(&materialize(&c, vec![tag()], d, Origin::Section, 0).unwrap()),
                   "(:: T)");

        assert_eq!(show(&materialize_implicit(&c, vec![a("x")], 0).unwrap()), "x");
        assert_eq!(show(&materialize_implicit(&c, vec![a("x"), a("y")], 0).unwrap()),
                   "{x y}");
    }

    #[test]
    fn sibling_acceptance() {
        let g = Group { id: 0, rank: 1, clauses: vec![] };
        assert!(g.accepts(Some((0, 1))));
        assert!(g.accepts(Some((0, 2))));
        assert!(!g.accepts(Some((0, 0))));
        assert!(!g.accepts(Some((1, 1))));
        assert!(!g.accepts(None));
        let g = Group { rank: 2, ..g };
        assert!(!g.accepts(Some((0, 1))));
    }
}
