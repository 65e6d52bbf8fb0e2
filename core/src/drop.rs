//! Custom handling of dropping for [`List`](../struct.List.html).  Enables
//! using very-deep `Datum` trees, e.g. long chains of folded infix forms or
//! deeply nested delimiters, which would otherwise cause stack overflows when
//! dropped (due to the compiler's automatic recursive dropping).

use core::mem::take;

use crate::{Datum, List};


/// Avoids recursive dropping by moving the descendants of `top` out onto a
/// work list and dropping them iteratively.  Every `List` taken from the work
/// list has its own children moved onto the work list before it is dropped, so
/// by the time any `List` is dropped it has no children and its own (nested)
/// call of this function does nothing.
///
/// The work list grows to at most the total number of not-yet-dropped nodes
/// that are siblings along the current path, which is bounded by the size of
/// the tree, not its depth.
pub fn drop_children_iteratively(top: &mut List) {
    let mut pending: Vec<Datum> = take(&mut top.children);
    while let Some(datum) = pending.pop() {
        if let Datum::List(mut list) = datum {
            pending.append(&mut list.children);
            // `list` now has no children and is dropped here without recursion.
        }
    }
}

/// Use [`drop_children_iteratively`](fn.drop_children_iteratively.html) for
/// dropping, to avoid extensive drop recursion.
impl Drop for List {
    fn drop(&mut self) {
        if !self.children.is_empty() {
            drop_children_iteratively(self);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Atom, Delim, Origin, Span};

    fn leaf(n: usize) -> Datum {
        Atom::symbol(n.to_string(), Span::default()).into()
    }

    fn wrap(children: Vec<Datum>) -> Datum {
        List { children, delim: Delim::new('(', ')'), origin: Origin::Source,
               shape: None, span: Span::default() }.into()
    }

    #[test]
    fn empties_the_top() {
        let mut top = List { children: vec![wrap(vec![leaf(1), leaf(2)]), leaf(3)],
                             delim: Delim::new('[', ']'), origin: Origin::Source,
                             shape: None, span: Span::default() };
        drop_children_iteratively(&mut top);
        assert!(top.children.is_empty());
    }

    #[test]
    fn deep_nest() {
        let mut d = leaf(0);
        for n in 1 ..= 1 << 18 {
            d = wrap(vec![leaf(n), d]);
        }
        drop(d);
    }
}
