use knit::{Config, common::inmem::{parse_str, parse_root_str}, printer::print};

use knit_shared_tests::{suites::test_all, utils::parse_inmem};


#[test]
fn suites() {
    test_all(&parse_inmem);
}

#[test]
fn root() {
    let c = Config::standard();
    let root = |s| parse_root_str(&c, s).map(|d| print(&d)).map_err(|e| e.kind);
    assert_eq!(root("a b\nc"), Ok("{(a b) c}".to_owned()));
    assert_eq!(root("f x"), Ok("(f x)".to_owned()));
    assert_eq!(root("x"), Ok("{x}".to_owned()));
    assert_eq!(root("a\nb\n::T"), Ok("(:: {a b} T)".to_owned()));
    assert_eq!(root(""), Err(knit::ErrorKind::EmptySection));
    assert_eq!(root("(a"), Err(knit::ErrorKind::MissingClose(')')));
}

#[test]
fn stops_at_first_error() {
    let c = Config::standard();
    let results = parse_str(&c, "a\n)\nb");
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert_eq!(results[1].as_ref().map_err(|e| &e.kind),
               Err(&knit::ErrorKind::UnbalancedClose(')')));
}
