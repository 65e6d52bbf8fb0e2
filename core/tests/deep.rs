//! Very deep and very long inputs parse, and their trees drop, without
//! exhausting the native stack.

use knit_core::{Config, Datum, Parser};

use knit_shared_tests::utils::{
    depth, get_arg_tree_size, infix_chain, nested_parens, nested_sections,
};


fn parse_one(config: &Config, input: &str) -> Datum {
    let mut items = Parser::new(config).parse_str(input);
    let item = items.next().unwrap().unwrap();
    assert!(items.next().is_none());
    item
}

#[test]
fn deep_nesting() {
    let c = Config::standard();
    let size = get_arg_tree_size();
    let d = parse_one(&c, &nested_parens(size));
    assert_eq!(depth(&d), size);
    drop(d);
}

#[test]
fn long_infix_chain() {
    let c = Config::standard();
    let size = get_arg_tree_size();
    let d = parse_one(&c, &infix_chain(size));
    assert_eq!(depth(&d), size - 1);
}

#[test]
fn deep_sections() {
    let c = Config::standard();
    let size = get_arg_tree_size().min(1 << 10);
    let d = parse_one(&c, &nested_sections(size));
    assert_eq!(depth(&d), size + 1);
}

#[test]
fn deep_clone_and_compare() {
    let c = Config::standard();
    let size = get_arg_tree_size();
    let d = parse_one(&c, &nested_parens(size));
    assert!(d.same_structure(&parse_one(&c, &nested_parens(size))));
}
