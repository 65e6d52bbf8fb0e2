//! The canonical printer: renders any `Datum` tree as text that, when reparsed
//! with the same configuration, gives a structurally-equal tree.
//!
//! Atoms print as their verbatim source text.  Lists print as their opening
//! delimiter, their children separated by single spaces, and their closing
//! delimiter, whatever their origin.  Synthetic applications, such as folded
//! infix forms, therefore print with their transformer symbol first, and such
//! runs are left untouched when reparsed.
//!
//! Printing walks the tree with an explicit stack, so very-deep trees never
//! overflow the native stack.

use std::fmt;

use crate::{AtomKind, Datum};


/// Render `datum` canonically.
pub fn print(datum: &Datum) -> String {
    let mut out = String::new();
    // Writing to a `String` never fails.
    let _ = write(&mut out, datum);
    out
}

/// Render each of `items` canonically on its own line, as top-level items.
pub fn print_items<'d, I>(items: I) -> String
    where I: IntoIterator<Item = &'d Datum>,
{
    let mut out = String::new();
    for item in items {
        let _ = write(&mut out, item);
        out.push('\n');
    }
    out
}

/// Render `datum` canonically into `out`.
pub fn write<W>(out: &mut W, datum: &Datum) -> fmt::Result
    where W: fmt::Write + ?Sized,
{
    enum Step<'d> {
        Datum(&'d Datum),
        Space,
        Close(char),
    }

    let mut pending = vec![Step::Datum(datum)];
    while let Some(step) = pending.pop() {
        match step {
            Step::Datum(Datum::Atom(atom)) => out.write_str(&atom.text)?,
            Step::Datum(Datum::List(list)) => {
                out.write_char(list.delim.open)?;
                pending.push(Step::Close(list.delim.close));
                // A path extends to the next whitespace, closers included.
                if matches!(list.children.last(),
                            Some(Datum::Atom(a)) if a.kind == AtomKind::Path) {
                    pending.push(Step::Space);
                }
                for (i, child) in list.children.iter().enumerate().rev() {
                    pending.push(Step::Datum(child));
                    if i > 0 {
                        pending.push(Step::Space);
                    }
                }
            }
            Step::Space => out.write_char(' ')?,
            Step::Close(close) => out.write_char(close)?,
        }
    }
    Ok(())
}


/// Wraps a `Datum` reference so that its `Display` is the canonical rendering.
#[derive(Copy, Clone, Debug)]
pub struct Printed<'d>(pub &'d Datum);

impl fmt::Display for Printed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write(f, self.0)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Atom, Delim, List, Origin, Span};

    fn sym(t: &str) -> Datum {
        Atom::symbol(t, Span::default()).into()
    }

    fn list(open: char, close: char, children: Vec<Datum>) -> Datum {
        List { children, delim: Delim::new(open, close), origin: Origin::Application,
               shape: None, span: Span::default() }.into()
    }

    #[test]
    fn shapes() {
        assert_eq!(print(&sym("a")), "a");
        assert_eq!(print(&list('(', ')', vec![])), "()");
        let d = list('(', ')', vec![sym("+"), list('(', ')', vec![sym("+"), sym("a"), sym("b")]),
                                    sym("c")]);
        assert_eq!(print(&d), "(+ (+ a b) c)");
        assert_eq!(Printed(&d).to_string(), "(+ (+ a b) c)");
        let d = list('[', ']', vec![sym("f"), list('{', '}', vec![sym("x")])]);
        assert_eq!(print(&d), "[f {x}]");
        assert_eq!(print_items([&sym("a"), &d]), "a\n[f {x}]\n");
    }

    #[test]
    fn path_before_close() {
        let path = Atom { text: "./a.txt".into(), kind: AtomKind::Path, span: Span::default() };
        let d = list('(', ')', vec![sym("load"), path.into()]);
        assert_eq!(print(&d), "(load ./a.txt )");
    }

    #[test]
    fn deep() {
        let mut d = sym("x");
        for _ in 0 .. 100_000 {
            d = list('(', ')', vec![d]);
        }
        let s = print(&d);
        assert_eq!(s.len(), 200_001);
        assert!(s.starts_with("((") && s.ends_with("x))"));
    }
}
