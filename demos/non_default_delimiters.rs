#![allow(missing_docs, clippy::print_stdout)]

use knit::{
    Config, ConfigSpec, Delim, Parser, Trigger,
    printer::Printed, source_stream::CharIterSourceStream,
};


fn main() {
    let spec = ConfigSpec {
        delimiters: vec![Delim::new('⟪', '⟫'), Delim::new('⟨', '⟩'), Delim::new('«', '»')],
        application: '⟪',
        struct_delimiter: Some('⟨'),
        infix: vec!["plus".into(), "times".into()],
        sibling_groups: vec![vec!["when".into(), "otherwise".into()]],
        section: Trigger { symbol: "=>".into(), materializer: '«' },
        structure: Trigger { symbol: "==>".into(), materializer: '⟨' },
        effect: Trigger { symbol: "!=>".into(), materializer: '«' },
        ..ConfigSpec::default()
    };
    let config = match Config::new(spec) {
        Ok(config) => config,
        Err(e) => {
            println!("invalid configuration: {}", e);
            return;
        }
    };

    let input = "\
Using non-default delimiters:

when a plus b => ⟪total⟫
otherwise =>
  total times 2

point ==> x, y
f⟨x⟩ (not a list)
";
    // Any `Iterator` of `char`s can be the source, e.g. one fed by a stream.
    let source = CharIterSourceStream::new(input.chars());
    for item in Parser::new(&config).parse(source) {
        match item {
            Ok(datum) => println!("{}", Printed(&datum)),
            Err(e) => println!("error: {}", e),
        }
    }
}
