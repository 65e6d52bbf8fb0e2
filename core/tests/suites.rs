use knit_core::{Config, Datum, Error, Parser};

use knit_shared_tests::suites::test_all;


fn parse(config: &Config, input: &str) -> Vec<Result<Datum, Error>> {
    let mut results = Vec::new();
    for r in Parser::new(config).parse_str(input) {
        let stop = r.is_err();
        results.push(r);
        if stop {
            break;
        }
    }
    results
}

#[test]
fn suites() {
    test_all(&parse);
}

#[test]
fn suites_boxed_source() {
    test_all(&|config: &Config, input: &str| {
        let source: Box<dyn knit_core::SourceStream + '_> =
            Box::new(knit_core::premade::StrSourceStream::new(input));
        Parser::new(config).parse(source).collect()
    });
}
