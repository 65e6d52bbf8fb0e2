#![allow(missing_docs, clippy::dbg_macro, clippy::print_stdout)]

use knit::{Config, common::inmem::{parse_str, parse_root_str}, printer::Printed};


/// Parse with the standard notation and print results.  This shows that the
/// structure of any input is found without knowing what any of it means.
fn standard() {
    let config = Config::standard();
    let input = "\
fn area(shape) :
  match shape :
    Circle(r) -> 3.14 * r * r
    Rect(w, h) -> w * h

if total > limit :
  warn \"over\"
elseif total == 0 :
  skip()
else :
  items |> map price |> sum

point := x, y
";
    for item in parse_str(&config, input) {
        match item {
            Ok(datum) => println!("{}", Printed(&datum)),
            Err(e) => println!("error: {}", e),
        }
    }
    dbg!(parse_root_str(&config, "a.b(c)"));
}

/// Errors are reported with their position and context.
fn errors() {
    let config = Config::standard();
    for input in ["(a [b)", "f :\n  x\n    y", "\"bad \\q\""] {
        if let Some(Err(e)) = parse_str(&config, input).pop() {
            println!("{:?}: {}", input, e);
        }
    }
}

fn main() {
    standard();
    errors();
}
