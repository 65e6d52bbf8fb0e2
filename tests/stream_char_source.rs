//! Tests `CharIterSourceStream` similar to how it would be used with a
//! streaming source.

use knit::{Config, Parser, printer::print, source_stream::CharIterSourceStream};

use knit_shared_tests::{suites::test_all, utils::parse_chars};


#[test]
fn suites() {
    test_all(&parse_chars);
}

/// Items are yielded before the rest of the source is pulled.
#[test]
fn incremental() {
    let c = Config::standard();
    let mut pulled = 0;
    let chars = "a b\nc d\n(e".chars().inspect(|_| pulled += 1);
    let mut iter = Parser::new(&c).parse(CharIterSourceStream::new(chars));
    assert_eq!(iter.next().map(|r| r.map(|d| print(&d)).ok()), Some(Some("(a b)".to_owned())));
    assert_eq!(iter.pos().line, 2);
    assert_eq!(iter.next().map(|r| r.map(|d| print(&d)).ok()), Some(Some("(c d)".to_owned())));
    assert!(matches!(iter.next(), Some(Err(_))));
    assert!(iter.next().is_none());
    drop(iter);
    assert_eq!(pulled, 10);
}
