//! The transformer resolver: glue, graft, infix and associative folding, each
//! producing synthetic `List`s whose spans are the union of their constituents.

use std::mem::take;

use crate::{Atom, AtomKind, Config, Datum, Delim, List, Origin, Span, SymbolClass};


/// Make a `List`, with its shape tag derived from `delim` and its span covering
/// all of `children` (or `span` if there are none).
pub(crate) fn list(config: &Config, delim: Delim, origin: Origin, children: Vec<Datum>,
                   span: Span) -> List {
    let span = children.iter().fold(span, |acc, c| acc.union(c.span()));
    List { children, delim, origin, shape: config.shape_of(delim), span }
}

/// A synthetic application `List` of `children`, which must be non-empty.
pub(crate) fn application(config: &Config, origin: Origin, children: Vec<Datum>) -> Datum {
    let span = children.first().map_or_else(Span::default, Datum::span);
    list(config, config.application(), origin, children, span).into()
}

/// `P<operand>` becomes `(P operand)`.
pub(crate) fn prefix_glue(config: &Config, symbol: Atom, operand: Datum) -> Datum {
    application(config, Origin::Application, vec![symbol.into(), operand])
}

/// `<left>S<right>` becomes `(S left right)`.
pub(crate) fn suffix_glue(config: &Config, symbol: Atom, left: Datum, right: Datum) -> Datum {
    application(config, Origin::Application, vec![symbol.into(), left, right])
}

/// `S<operand>` with no left operand becomes the tag form `(S operand)`.
pub(crate) fn tag_form(config: &Config, symbol: Atom, operand: Datum) -> Datum {
    application(config, Origin::Tag, vec![symbol.into(), operand])
}

/// Whether `datum` is a tag form, and so is removed from the end of a
/// materialized context to tag the rest.
pub(crate) fn is_tag_form(datum: &Datum) -> bool {
    matches!(datum, Datum::List(l) if l.origin == Origin::Tag && l.children.len() == 2)
}

/// Remove a trailing tag form from `items`, if anything precedes it.
pub(crate) fn take_tag(items: &mut Vec<Datum>) -> Option<List> {
    match items.last() {
        Some(last) if items.len() >= 2 && is_tag_form(last) => match items.pop() {
            Some(Datum::List(tag)) => Some(tag),
            _ => None,
        },
        _ => None,
    }
}

/// Tag the materialized `body` with a tag form: `(S body operand)`.
pub(crate) fn apply_tag(config: &Config, mut tag: List, body: Datum) -> Datum {
    let mut parts = take(&mut tag.children).into_iter();
    match (parts.next(), parts.next()) {
        (Some(symbol), Some(operand))
            => application(config, Origin::Application, vec![symbol, body, operand]),
        // Only reachable with a malformed tag form, which `is_tag_form` rules out.
        _ => body,
    }
}

/// `f[x]` becomes `[f x]`, keeping the list's own delimiter.
pub(crate) fn head_graft(head: Datum, mut list: List) -> List {
    list.span = list.span.union(head.span());
    list.children.insert(0, head);
    list.origin = Origin::Graft;
    list
}

/// Resolve a chain of grafts.  With a head, a single list is head-grafted and
/// further lists make an application chain `(head list ...)`.  Without a head,
/// every later list is tail-grafted onto the first.
pub(crate) fn graft_chain(config: &Config, head: Option<Datum>, lists: Vec<List>) -> Datum {
    let mut lists = lists.into_iter();
    match head {
        Some(head) => {
            let Some(first) = lists.next() else { return head };
            let rest: Vec<Datum> = lists.map(Datum::List).collect();
            if rest.is_empty() {
                head_graft(head, first).into()
            } else {
                let mut children = Vec::with_capacity(rest.len() + 2);
                children.push(head);
                children.push(first.into());
                children.extend(rest);
                application(config, Origin::Application, children)
            }
        }
        None => {
            let Some(mut first) = lists.next() else {
                return application(config, Origin::Application, vec![]);
            };
            for tail in lists {
                first.span = first.span.union(tail.span);
                first.children.push(tail.into());
                first.origin = Origin::Graft;
            }
            first.into()
        }
    }
}

/// An atom followed immediately by a string literal becomes `(atom string)`.
pub(crate) fn prefixed_string(config: &Config, prefix: Atom, string: Atom) -> Datum {
    application(config, Origin::Application, vec![prefix.into(), string.into()])
}


/// The category of `datum` if it is a plain symbol atom that is configured as
/// a transformer.
fn symbol_class(config: &Config, datum: &Datum) -> Option<SymbolClass> {
    match datum {
        Datum::Atom(Atom { kind: AtomKind::Symbol, text, .. }) => config.class_of(text),
        _ => None,
    }
}

/// Whether `elems` starts with a transformer symbol, in which case it is
/// already structured and is left untouched.
pub(crate) fn is_neutral(config: &Config, elems: &[Datum]) -> bool {
    matches!(elems.first().and_then(|d| symbol_class(config, d)),
             Some(SymbolClass::Prefix | SymbolClass::Suffix | SymbolClass::Infix
                  | SymbolClass::AssocLeft | SymbolClass::AssocRight))
}

/// One run of elements as a single item: itself if there is one element, or
/// else an application of all of them.
pub(crate) fn wrap_run(config: &Config, mut elems: Vec<Datum>) -> Option<Datum> {
    match elems.len() {
        0 => None,
        1 => elems.pop(),
        _ => Some(application(config, Origin::Application, elems)),
    }
}

/// Split `elems` at every symbol of class `class`, unless there are none or
/// any piece would be empty.
fn split(config: &Config, elems: Vec<Datum>, class: SymbolClass)
         -> Result<(Vec<Vec<Datum>>, Vec<Atom>), Vec<Datum>> {
    let at: Vec<usize> = elems.iter().enumerate()
        .filter(|(_, d)| symbol_class(config, d) == Some(class))
        .map(|(i, _)| i)
        .collect();
    let (Some(&first), Some(&last)) = (at.first(), at.last()) else {
        return Err(elems);
    };
    if first == 0 || last + 1 == elems.len() || at.windows(2).any(|w| w[1] == w[0] + 1) {
        return Err(elems);
    }

    let mut pieces = vec![Vec::new()];
    let mut symbols = Vec::with_capacity(at.len());
    for d in elems {
        match d {
            Datum::Atom(a) if config.class_of(&a.text) == Some(class)
                              && a.kind == AtomKind::Symbol => {
                symbols.push(a);
                pieces.push(Vec::new());
            }
            d => if let Some(piece) = pieces.last_mut() { piece.push(d) },
        }
    }
    Ok((pieces, symbols))
}

/// Fold one run of elements: split at left-associative symbols (loosest) and
/// fold left, then at right-associative symbols and fold right, then fold infix
/// symbols strictly left to right.  Pieces between associative symbols are
/// themselves folded and wrapped.
pub(crate) fn fold_run(config: &Config, elems: Vec<Datum>) -> Vec<Datum> {
    let operand = |piece: Vec<Datum>| -> Datum {
        let folded = fold_run(config, piece);
        // Pieces are never empty, so neither is their folding.
        wrap_run(config, folded).unwrap_or_else(|| application(config, Origin::Application,
                                                                vec![]))
    };

    let elems = match split(config, elems, SymbolClass::AssocLeft) {
        Ok((pieces, symbols)) => {
            let mut pieces = pieces.into_iter().map(operand);
            let mut acc = pieces.next();
            for (symbol, right) in symbols.into_iter().zip(pieces) {
                acc = acc.map(|left| suffix_glue(config, symbol, left, right));
            }
            return acc.into_iter().collect();
        }
        Err(elems) => elems,
    };

    let elems = match split(config, elems, SymbolClass::AssocRight) {
        Ok((pieces, symbols)) => {
            let mut pieces: Vec<Datum> = pieces.into_iter().map(operand).collect();
            let mut acc = pieces.pop();
            for symbol in symbols.into_iter().rev() {
                if let (Some(left), Some(right)) = (pieces.pop(), acc.take()) {
                    acc = Some(suffix_glue(config, symbol, left, right));
                }
            }
            return acc.into_iter().collect();
        }
        Err(elems) => elems,
    };

    fold_infix(config, elems)
}

/// Replace the earliest `left S right` triple with `(S left right)`, repeatedly,
/// continuing from the new element.
fn fold_infix(config: &Config, elems: Vec<Datum>) -> Vec<Datum> {
    let mut out: Vec<Datum> = Vec::with_capacity(elems.len());
    let mut rest = elems.into_iter().peekable();
    while let Some(d) = rest.next() {
        let infix = symbol_class(config, &d) == Some(SymbolClass::Infix);
        match (d, out.pop()) {
            (Datum::Atom(symbol), Some(left)) if infix && rest.peek().is_some() => {
                if let Some(right) = rest.next() {
                    out.push(suffix_glue(config, symbol, left, right));
                }
            }
            (d, left) => {
                out.extend(left);
                out.push(d);
            }
        }
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::show;

    fn sym(t: &str, at: usize) -> Datum {
        Atom::symbol(t, Span::new(at, at + t.len())).into()
    }

    fn syms(s: &str) -> Vec<Datum> {
        let mut at = 0;
        s.split(' ').map(|t| { let d = sym(t, at); at += t.len() + 1; d }).collect()
    }

    fn fold(s: &str) -> String {
        let c = Config::standard();
        let v: Vec<String> = fold_run(&c, syms(s)).iter().map(show).collect();
        v.join(" ")
    }

    #[test]
    fn infix_left_to_right() {
        assert_eq!(fold("a + b + c"), "(+ (+ a b) c)");
        assert_eq!(fold("a + b * c"), "(* (+ a b) c)");
        assert_eq!(fold("print a + b"), "print (+ a b)");
        assert_eq!(fold("a +"), "a +");
        assert_eq!(fold("+ a"), "+ a");
    }

    #[test]
    fn associative() {
        assert_eq!(fold("a |> f |> g"), "(|> (|> a f) g)");
        assert_eq!(fold("xs |> map f |> sum"), "(|> (|> xs (map f)) sum)");
        assert_eq!(fold("a -> b -> c"), "(-> a (-> b c))");
        assert_eq!(fold("x |> a -> b + c"), "(|> x (-> a (+ b c)))");
        assert_eq!(fold("|> f"), "|> f");
        assert_eq!(fold("a |> |> b"), "a |> |> b");
    }

    #[test]
    fn spans_are_unions() {
        let c = Config::standard();
        let folded = fold_run(&c, syms("a + bb"));
        assert_eq!(folded[0].span(), Span::new(0, 6));
    }

    #[test]
    fn neutrality() {
        let c = Config::standard();
        assert!(is_neutral(&c, &syms("+ a b")));
        assert!(is_neutral(&c, &syms(". a b")));
        assert!(!is_neutral(&c, &syms("f + b")));
        assert!(!is_neutral(&c, &[]));
    }

    #[test]
    fn grafts() {
        let c = Config::standard();
        let l = |open: char, close: char, t: &str, at: usize| {
            list(&c, Delim::new(open, close), Origin::Source, vec![sym(t, at)],
                 Span::new(at - 1, at + 2))
        };
        let g = graft_chain(&c, Some(sym("f", 0)), vec![l('[', ']', "x", 2)]);
        assert_eq!(show(&g), "[f x]");
        assert_eq!(g.as_list().map(|l| (l.origin, l.span)),
                   Some((Origin::Graft, Span::new(0, 4))));
        assert_eq!(g.as_list().and_then(|l| l.shape), Some(crate::Shape::Struct));

        let g = graft_chain(&c, Some(sym("f", 0)),
                            vec![l('[', ']', "x", 2), l('{', '}', "y", 5)]);
        assert_eq!(show(&g), "(f [x] {y})");

        let g = graft_chain(&c, None, vec![l('[', ']', "a", 1), l('{', '}', "b", 4)]);
        assert_eq!(show(&g), "[a {b}]");
        assert_eq!(g.span(), Span::new(0, 6));
    }

    #[test]
    fn tags() {
        let c = Config::standard();
        let t = tag_form(&c, Atom::symbol("::", Span::new(4, 6)), sym("Int", 6));
        assert!(is_tag_form(&t));
        let Datum::List(t) = t else { panic!() };
        let tagged = apply_tag(&c, t, sym("x", 0));
        assert_eq!(show(&tagged), "(:: x Int)");
        assert_eq!(tagged.span(), Span::new(0, 9));
    }
}
