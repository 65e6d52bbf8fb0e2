//! Suites of tests applied across multiple crates and sources

use indoc::indoc;

use knit_core::{Config, ConfigSpec, Delim, ErrorKind::*, Trigger};

use super::*;


/// Run every suite.
pub fn test_all(parse: ParseFn<'_>) {
    test_suite_basics(parse);
    test_suite_glue(parse);
    test_suite_folding(parse);
    test_suite_contexts(parse);
    test_suite_siblings(parse);
    test_suite_literals(parse);
    test_suite_errors(parse);
    test_suite_custom(parse);
}

macro_rules! check {
    ($parse:expr, $config:expr; $input:expr => [$($expected:expr),*]) => {
        assert_eq!(render($parse($config, $input)), expect(vec![$($expected),*]),
                   "input: {:?}", $input)
    };
}


/// Items, whitespace, comments, delimited lists, separators and sequences.
pub fn test_suite_basics(parse: ParseFn<'_>) {
    let c = &Config::standard();

    macro_rules! test {
        ($($t:tt)*) => { check!(parse, c; $($t)*) };
    }

    test!("" => []);
    test!("   " => []);
    test!("\n\n" => []);
    test!("# only a comment" => []);
    test!("a" => [Ok("a")]);
    test!("a b c" => [Ok("(a b c)")]);
    test!("a\nb" => [Ok("a"), Ok("b")]);
    test!("  a\n  b" => [Ok("a"), Ok("b")]);
    test!("a\r\nb\r\n" => [Ok("a"), Ok("b")]);
    test!("a  # trailing\n\n\nb c  " => [Ok("a"), Ok("(b c)")]);
    test!("#tag x" => [Ok("(#tag x)")]);
    test!("λ ünï" => [Ok("(λ ünï)")]);

    test!("a, b c" => [Ok("a"), Ok("(b c)")]);
    test!("a b; c; d e" => [Ok("(a b)"), Ok("c"), Ok("(d e)")]);

    test!("()" => [Ok("()")]);
    test!("(a)" => [Ok("(a)")]);
    test!("(a b c)" => [Ok("(a b c)")]);
    test!("( a  b )" => [Ok("(a b)")]);
    test!("[a b] {c}" => [Ok("([a b] {c})")]);
    test!("(a (b (c)))" => [Ok("(a (b (c)))")]);
    test!("(a b, c)" => [Ok("((a b) c)")]);
    test!("(a, b, c)" => [Ok("(a b c)")]);
    test!("(a,)" => [Ok("(a)")]);
    test!("(a; b c)" => [Ok("(a (b c))")]);
    test!("(\n  a\n    b\n)" => [Ok("(a b)")]);
    test!("f (a\nb) c" => [Ok("(f (a b) c)")]);
    test!(indoc!("
        [1,
         2,
              3]
        next")
          => [Ok("[1 2 3]"), Ok("next")]);
}


/// Prefix and suffix glue, tags, grafts, and prefixed strings.
pub fn test_suite_glue(parse: ParseFn<'_>) {
    let c = &Config::standard();

    macro_rules! test {
        ($($t:tt)*) => { check!(parse, c; $($t)*) };
    }

    test!("&data" => [Ok("(& data)")]);
    test!("share&expensive" => [Ok("(share& expensive)")]);
    test!("mut&x" => [Ok("(mut& x)")]);
    test!("...rest" => [Ok("(... rest)")]);
    test!("f &a &b" => [Ok("(f (& a) (& b))")]);

    test!("a.b" => [Ok("(. a b)")]);
    test!("a.b.c" => [Ok("(. (. a b) c)")]);
    test!("a::b" => [Ok("(:: a b)")]);
    test!("a. b" => [Ok("(. a b)")]);
    test!("1.5" => [Ok("(. 1 5)")]);
    test!("&a.b" => [Ok("(& (. a b))")]);
    test!("a.&b" => [Ok("(. a (& b))")]);
    test!("f x.y z" => [Ok("(f (. x y) z)")]);

    test!("::Int" => [Ok("(:: Int)")]);
    test!("x ::Int" => [Ok("(x (:: Int))")]);

    test!("f(x)" => [Ok("(f x)")]);
    test!("f()" => [Ok("(f)")]);
    test!("f[x]" => [Ok("[f x]")]);
    test!("f{x y}" => [Ok("{f x y}")]);
    test!("f(x)(y)" => [Ok("(f (x) (y))")]);
    test!("f[x]{y}" => [Ok("(f [x] {y})")]);
    test!("[a]{b}" => [Ok("[a {b}]")]);
    test!("(a)(b)[c]" => [Ok("(a (b) [c])")]);
    test!("f(x).g(y)" => [Ok("(. (f x) (g y))")]);
    test!("obj.method(a, b)" => [Ok("(. obj (method a b))")]);
    test!("&f(x)" => [Ok("(& (f x))")]);

    test!(r#"r"raw""# => [Ok(r#"(r "raw")"#)]);
    test!("b`0101`" => [Ok("(b `0101`)")]);
    test!("sql'x'" => [Ok("(sql 'x')")]);
}


/// Infix and associative folding, and neutrality.
pub fn test_suite_folding(parse: ParseFn<'_>) {
    let c = &Config::standard();

    macro_rules! test {
        ($($t:tt)*) => { check!(parse, c; $($t)*) };
    }

    test!("a + b" => [Ok("(+ a b)")]);
    test!("a + b + c" => [Ok("(+ (+ a b) c)")]);
    test!("a + b * c" => [Ok("(* (+ a b) c)")]);
    test!("a * b + c" => [Ok("(+ (* a b) c)")]);
    test!("a - b - c - d" => [Ok("(- (- (- a b) c) d)")]);
    test!("x = y + 1" => [Ok("(+ (= x y) 1)")]);
    test!("a and b or c" => [Ok("(or (and a b) c)")]);
    test!("print a + b" => [Ok("(print (+ a b))")]);
    test!("f a + g b" => [Ok("(f (+ a g) b)")]);
    test!("a +" => [Ok("(a +)")]);
    test!("+ a b" => [Ok("(+ a b)")]);

    test!("a -> b -> c" => [Ok("(-> a (-> b c))")]);
    test!("xs |> f |> g" => [Ok("(|> (|> xs f) g)")]);
    test!("f x |> g y" => [Ok("(|> (f x) (g y))")]);
    test!("xs |> map f -> g" => [Ok("(|> xs (-> (map f) g))")]);
    test!("a + b |> f" => [Ok("(|> (+ a b) f)")]);
    test!("|> a" => [Ok("(|> a)")]);

    test!("(a + b)" => [Ok("(+ a b)")]);
    test!("(a + b) * c" => [Ok("(* (+ a b) c)")]);
    test!("((a + b))" => [Ok("((+ a b))")]);
    test!("(a |> f)" => [Ok("(|> a f)")]);
    test!("f(a + b)" => [Ok("(f (+ a b))")]);
    test!("[a + b]" => [Ok("[(+ a b)]")]);
    test!("(a.b)" => [Ok("((. a b))")]);
    test!("(+ a b)" => [Ok("(+ a b)")]);
    test!("(+ (+ a b) c)" => [Ok("(+ (+ a b) c)")]);
    test!("(-> a b c)" => [Ok("(-> a b c)")]);
    test!("(a + b, c * d)" => [Ok("((+ a b) (* c d))")]);
    test!("(+ a, b + c)" => [Ok("((+ a) (+ b c))")]);
}


/// Sections, structures, effects, blocks, implicit sections and continuations.
pub fn test_suite_contexts(parse: ParseFn<'_>) {
    let c = &Config::standard();

    macro_rules! test {
        ($($t:tt)*) => { check!(parse, c; $($t)*) };
    }

    test!("if p : (print 1)" => [Ok("(if p (print 1))")]);
    test!("if p : 42" => [Ok("(if p {42})")]);
    test!("f : a b" => [Ok("(f (a b))")]);
    test!("f : a, b" => [Ok("(f {a b})")]);
    test!("f : g : x" => [Ok("(f (g {x}))")]);
    test!("f : a; g" => [Ok("(f {a})"), Ok("g")]);
    test!("point := x, y" => [Ok("(point [x y])")]);
    test!("p := x" => [Ok("(p [x])")]);
    test!("run !: go" => [Ok("(run {go})")]);
    test!("s : t := a, b" => [Ok("(s (t [a b]))")]);
    test!("(f : a b)" => [Ok("(f (a b))")]);
    test!("(f : a, b)" => [Ok("(f {a b})")]);
    test!("a:b" => [Ok("a:b")]);
    test!("f : a, b, ::T" => [Ok("(f (:: {a b} T))")]);
    test!("[a, b, ::T]" => [Ok("(:: [a b] T)")]);
    test!("[a b ::T]" => [Ok("(:: [a b] T)")]);
    test!("[::T]" => [Ok("[(:: T)]")]);
    test!("(a + b ::T)" => [Ok("(:: (+ a b) T)")]);
    test!("f[x ::T]" => [Ok("(:: [f x] T)")]);
    test!("g [x ::T]" => [Ok("(g (:: [x] T))")]);

    test!(indoc!("
        f x :
          a b
          c
        d")
          => [Ok("(f x {(a b) c})"), Ok("d")]);
    test!(indoc!("
        def main :
          print 1")
          => [Ok("(def main (print 1))")]);
    test!(indoc!("
        a :
          b :
            c
          d
        e")
          => [Ok("(a {(b {c}) d})"), Ok("e")]);
    test!(indoc!("
        config :=
          name,
          version
        ")
          => [Ok("(config [name version])")]);
    test!(indoc!("
        f :

          # comment
          x
        ")
          => [Ok("(f {x})")]);

    test!("foo.\n  bar" => [Ok("(. foo bar)")]);
    test!("x.\n  a\n  b" => [Ok("(. x {a b})")]);
    test!(indoc!("
        xs |>
          map f
          sum")
          => [Ok("(|> xs {(map f) sum})")]);
    test!(indoc!("
        list
          .map(f)
          # then
          .sum()
        done")
          => [Ok("(. (. list (map f)) (sum))"), Ok("done")]);
    test!(indoc!("
        (list
          .map(f)
        .sum())")
          => [Ok("((. (. list (map f)) (sum)))")]);
    test!("(a
 b)" => [Ok("(a b)")]);
}


/// Sibling-keyword groups.
pub fn test_suite_siblings(parse: ParseFn<'_>) {
    let c = &Config::standard();

    macro_rules! test {
        ($($t:tt)*) => { check!(parse, c; $($t)*) };
    }

    test!(indoc!("
        if x : a
        elseif y : b
        print z")
          => [Ok("((if x {a}) (elseif y {b}))"), Ok("(print z)")]);
    test!(indoc!("
        if a : x
        elseif b : y
        elseif c : z
        else : w")
          => [Ok("((if a {x}) (elseif b {y}) (elseif c {z}) (else {w}))")]);
    test!(indoc!("
        if a : x

        else : y")
          => [Ok("((if a {x}) (else {y}))")]);
    test!("if a : x" => [Ok("(if a {x})")]);
    test!("if a : x\nif b : y" => [Ok("(if a {x})"), Ok("(if b {y})")]);
    test!("else : y\nif a : x" => [Ok("(else {y})"), Ok("(if a {x})")]);
    test!(indoc!("
        if a : x
        else : y
        elseif b : z")
          => [Ok("((if a {x}) (else {y}))"), Ok("(elseif b {z})")]);
    test!(indoc!("
        try : f
        catch e : g
        finally : h")
          => [Ok("((try {f}) (catch e {g}) (finally {h}))")]);
    test!(indoc!("
        if a : x
        catch e : g")
          => [Ok("(if a {x})"), Ok("(catch e {g})")]);
    test!(indoc!("
        f :
          if a : x
          else : y
        g")
          => [Ok("(f ((if a {x}) (else {y})))"), Ok("g")]);
    test!(indoc!("
        if a :
          x
        else :
          y")
          => [Ok("((if a {x}) (else {y}))")]);
    test!("if a : x; else : y" => [Ok("(if a {x})"), Ok("(else {y})")]);
    test!("(if a, else b)" => [Ok("((if a) (else b))")]);
    test!("if a : x\n(b" => [Ok("(if a {x})"), Err(MissingClose(')'))]);
    test!("if a : x\nelse : y\n(b"
          => [Ok("((if a {x}) (else {y}))"), Err(MissingClose(')'))]);
    test!("if a : x\n\"s\"\n(b" => [Ok("(if a {x})"), Ok("\"s\""), Err(MissingClose(')'))]);
    test!("if a : x\n  y" => [Ok("(if a {x})"),
                               Err(UnexpectedIndent { expected: 0, found: 2 })]);
    test!("if a : x\nelse : (y" => [Err(MissingClose(')'))]);
}


/// String literals, system paths, directives and shebangs.
pub fn test_suite_literals(parse: ParseFn<'_>) {
    let c = &Config::standard();

    macro_rules! test {
        ($($t:tt)*) => { check!(parse, c; $($t)*) };
    }

    test!(r#""hello world""# => [Ok(r#""hello world""#)]);
    test!(r#""a\n\t\u{41}\"\\""# => [Ok(r#""a\n\t\u{41}\"\\""#)]);
    test!(r#""a # not a comment""# => [Ok(r#""a # not a comment""#)]);
    test!("'it''s'" => [Ok("'it''s'")]);
    test!("'\\n'" => [Ok("'\\n'")]);
    test!("`0101_1111 0000`" => [Ok("`0101_1111 0000`")]);
    test!(r#"say "a b", 'c'"# => [Ok(r#"(say "a b")"#), Ok("'c'")]);
    test!("\"multi\nline\"" => [Ok("\"multi\nline\"")]);

    test!("./a:b.txt" => [Ok("./a:b.txt")]);
    test!("load ../x.y" => [Ok("(load ../x.y)")]);
    test!("cd ~/src" => [Ok("(cd ~/src)")]);
    test!("get http://example.com/a.b" => [Ok("(get http://example.com/a.b)")]);
    test!("(load ./x )" => [Ok("(load ./x )")]);

    test!("@inline f x" => [Ok("(@inline f x)")]);
    test!("@deprecated" => [Ok("@deprecated")]);

    test!("#!/usr/bin/env knit\nmain" => [Ok("#!/usr/bin/env knit"), Ok("main")]);
    test!("#!/bin/knit" => [Ok("#!/bin/knit")]);
}


/// Every kind of fatal error, and that nothing follows one.
pub fn test_suite_errors(parse: ParseFn<'_>) {
    let c = &Config::standard();

    macro_rules! test {
        ($($t:tt)*) => { check!(parse, c; $($t)*) };
    }

    test!("&" => [Err(GlueAtEof("&".into()))]);
    test!("a." => [Err(GlueAtEof(".".into()))]);
    test!("a. " => [Err(GlueAtEof(".".into()))]);
    test!("(a b" => [Err(MissingClose(')'))]);
    test!("(a [b" => [Err(MissingClose(']'))]);
    test!("a b\n(c" => [Ok("(a b)"), Err(MissingClose(')'))]);
    test!("\ta" => [Err(TabInIndentation)]);
    test!("a\n\tb" => [Err(TabInIndentation)]);
    test!("a )" => [Err(UnbalancedClose(')'))]);
    test!("(a]" => [Err(MismatchedClose { expected: ')', found: ']' })]);
    test!("(a : b]" => [Err(MismatchedClose { expected: ')', found: ']' })]);
    test!("\"abc" => [Err(UnterminatedString)]);
    test!("'abc''" => [Err(UnterminatedString)]);
    test!(r#""\q""# => [Err(BadEscape('q'))]);
    test!(r#""\u{110000}""# => [Err(BadEscape('u'))]);
    test!(r#""\u41""# => [Err(BadEscape('u'))]);
    test!("`012`" => [Err(InvalidBinaryDigit('2'))]);
    test!("@ x" => [Err(InvalidDirective)]);
    test!("x :" => [Err(EmptySection)]);
    test!("x :\ny" => [Err(EmptySection)]);
    test!("(x : )" => [Err(EmptySection)]);
    test!("a\n  b" => [Ok("a"), Err(UnexpectedIndent { expected: 0, found: 2 })]);
    test!("f :\n  x\n    y" => [Err(UnexpectedIndent { expected: 2, found: 4 })]);
    test!("  a\nb" => [Ok("a"), Err(UnexpectedIndent { expected: 2, found: 0 })]);
    test!("a.\nb" => [Err(MissingOperand(".".into()))]);
    test!("a. ::T" => [Err(MissingOperand(".".into()))]);
}


/// A configuration other than the standard one.
pub fn test_suite_custom(parse: ParseFn<'_>) {
    let spec = ConfigSpec {
        delimiters: vec![Delim::new('⟨', '⟩'), Delim::new('«', '»')],
        application: '⟨',
        struct_delimiter: None,
        infix: vec!["plus".into()],
        sibling_groups: vec![vec!["when".into(), "otherwise".into()]],
        section: Trigger { symbol: "=>".into(), materializer: '«' },
        structure: Trigger { symbol: "==>".into(), materializer: '«' },
        effect: Trigger { symbol: "!=>".into(), materializer: '«' },
        ..ConfigSpec::default()
    };
    let c = &Config::new(spec).unwrap();

    macro_rules! test {
        ($($t:tt)*) => { check!(parse, c; $($t)*) };
    }

    test!("a plus b plus c" => [Ok("⟨plus ⟨plus a b⟩ c⟩")]);
    test!("a + b" => [Ok("⟨a + b⟩")]);
    test!("f ⟨x⟩" => [Ok("⟨f ⟨x⟩⟩")]);
    test!("f⟨x⟩" => [Ok("⟨f x⟩")]);
    test!("f«x»" => [Ok("«f x»")]);
    test!("(a)" => [Ok("(a)")]);
    test!("f => a, b" => [Ok("⟨f «a b»⟩")]);
    test!("f : a" => [Ok("⟨f : a⟩")]);
    test!("when a => x\notherwise => y" => [Ok("⟨⟨when a «x»⟩ ⟨otherwise «y»⟩⟩")]);
    test!("⟨a" => [Err(MissingClose('⟩'))]);
    test!("⟨a»" => [Err(MismatchedClose { expected: '⟩', found: '»' })]);
}
