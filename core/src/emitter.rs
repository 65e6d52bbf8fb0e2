//! The AST emitter: the queue of completed top-level items waiting to be handed
//! to the caller, and the materialization of the whole top level as one root.

use std::collections::VecDeque;

use crate::{Config, Datum, ErrorKind, Origin, context};


#[derive(Default, Debug)]
pub(crate) struct Emitter {
    ready: VecDeque<Datum>,
    count: usize,
}

impl Emitter {
    pub(crate) fn push(&mut self, item: Datum) {
        self.count += 1;
        tracing::debug!(item = self.count, start = item.span().start, end = item.span().end,
                        "top-level item complete");
        self.ready.push_back(item);
    }

    pub(crate) fn pop(&mut self) -> Option<Datum> {
        self.ready.pop_front()
    }
}


/// Materialize all the top-level items as the root, by the same rules as a
/// section.
pub(crate) fn materialize_root(config: &Config, items: Vec<Datum>, end: usize)
                               -> Result<Datum, ErrorKind> {
    let start = items.first().map_or(end, |d| d.span().start);
    let root = context::materialize(config, items, config.section_delim(), Origin::Section,
                                    start)?;
    tracing::trace!(start = root.span().start, end = root.span().end, "root materialized");
    Ok(root)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Atom, Span};

    #[test]
    fn queue_order() {
        let mut e = Emitter::default();
        e.push(Atom::symbol("a", Span::new(0, 1)).into());
        e.push(Atom::symbol("b", Span::new(2, 3)).into());
        assert!(e.pop().map_or(false, |d| d.is_symbol("a")));
        assert!(e.pop().map_or(false, |d| d.is_symbol("b")));
        assert_eq!(e.pop(), None);
    }

    #[test]
    fn root() {
        let c = Config::standard();
        assert_eq!(materialize_root(&c, vec![], 0), Err(ErrorKind::EmptySection));
        let r = materialize_root(&c, vec![Atom::symbol("x", Span::new(3, 4)).into()], 4)
            .unwrap();
        let l = r.as_list().unwrap();
        assert_eq!((l.delim.open, l.origin, l.span), ('{', Origin::Section, Span::new(3, 4)));
    }
}
