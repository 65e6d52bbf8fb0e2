//! The reports of fatal errors: kind, class, position and context.

use knit::{
    Config, ContextKind, ErrorClass, ErrorKind, Parser, SourceError, SourcePos,
    common::{inmem::parse_str, stream::parse_reader},
};


fn first_error(input: &str) -> knit::Error {
    let c = Config::standard();
    let results = parse_str(&c, input);
    match results.into_iter().last() {
        Some(Err(e)) => e,
        other => panic!("{:?} gave {:?}", input, other),
    }
}

#[test]
fn positions() {
    let e = first_error("(a b]");
    assert_eq!(e.kind, ErrorKind::MismatchedClose { expected: ')', found: ']' });
    assert_eq!(e.pos, SourcePos { offset: 4, line: 1, column: 5 });
    assert_eq!(e.context, ContextKind::Delimited('('));
    assert_eq!(e.class(), ErrorClass::Structural);

    let e = first_error("f :\n  λ\n\tx");
    assert_eq!(e.kind, ErrorKind::TabInIndentation);
    assert_eq!(e.pos.line, 3);
    assert_eq!(e.class(), ErrorClass::Lexical);

    let e = first_error("say \"λ\\z\"");
    assert_eq!(e.kind, ErrorKind::BadEscape('z'));
    assert_eq!((e.pos.line, e.pos.column), (1, 7));
}

#[test]
fn contexts() {
    assert_eq!(first_error("f : (a]").context, ContextKind::Delimited('('));
    assert_eq!(first_error("f : a. ::T").context, ContextKind::Section);
    assert_eq!(first_error("p := x.\ny").context, ContextKind::Structure);
    assert_eq!(first_error("a )").context, ContextKind::Top);
    assert_eq!(first_error("x :=").kind, ErrorKind::EmptySection);
    assert_eq!(first_error("x :=").context, ContextKind::Structure);
}

#[test]
fn display() {
    let e = first_error("(a b]");
    assert_eq!(e.to_string(),
               "expected `)` but found `]` at line 1, column 5 (byte 4), in `(` list");
    let e = first_error("(a [b");
    assert_eq!(e.to_string(), "missing `]` at line 1, column 6 (byte 5), in `[` list");
}

#[test]
fn source_failure() {
    let c = Config::standard();
    let results = parse_reader(&c, &b"a b\nc \xFF"[..]);
    let e = results.last().and_then(|r| r.as_ref().err()).unwrap();
    assert_eq!(e.kind, ErrorKind::Source(SourceError::InvalidUtf8(6)));
    assert_eq!(e.class(), ErrorClass::Source);
    assert!(results[0].is_ok());
}

#[test]
fn nothing_after_an_error() {
    let c = Config::standard();
    let mut iter = Parser::new(&c).parse_str("(a]\nb c\nd");
    assert!(matches!(iter.next(), Some(Err(_))));
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
}

#[test]
fn configuration() {
    let mut spec = knit::ConfigSpec::default();
    spec.infix.push(":".into());
    let e = Config::new(spec).unwrap_err();
    assert_eq!(e.class(), ErrorClass::Configuration);
    assert_eq!(e.to_string(), "symbol `:` is both infix and section trigger");
}
