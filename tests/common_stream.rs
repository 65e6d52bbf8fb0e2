use std::io::Cursor;

use indoc::indoc;

use knit::{Config, common::stream::{parse_reader, parse_root_reader}, printer::print};

use knit_shared_tests::{suites::test_all, utils::{self, parse_trickle}};


#[test]
fn suites() {
    test_all(&utils::parse_reader);
}

#[test]
fn suites_one_byte_at_a_time() {
    test_all(&parse_trickle);
}

#[test]
fn root() {
    let c = Config::standard();
    let root = parse_root_reader(&c, Cursor::new(indoc!("
        f :
          a
          b
"))).unwrap();
    assert_eq!(print(&root), "(f {a b})");
}

#[test]
fn large_input() {
    let c = Config::standard();
    let input = utils::many_items(10_000);
    let results = parse_reader(&c, input.as_bytes());
    assert_eq!(results.len(), 10_000);
    assert_eq!(results[9_999].as_ref().map(print).ok(), Some("(item 9999)".to_owned()));
}
