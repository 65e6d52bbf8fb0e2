//! One frozen configuration shared by parses on many threads at once.

use std::thread;

use knit::{Config, ConfigSpec, common::inmem::parse_str, printer::print_items};


fn printed(config: &Config, input: &str) -> String {
    let items: Vec<_> = parse_str(config, input).into_iter().map(Result::unwrap).collect();
    print_items(&items)
}

#[test]
fn shared_config() {
    let mut spec = ConfigSpec::default();
    spec.infix.push("<>".into());
    let config = Config::new(spec).unwrap();
    let inputs: Vec<String> = (0 .. 8).map(|i| format!("f{} a <> b\ng : x {}, y\n", i, i))
                                      .collect();
    let expected: Vec<String> = inputs.iter().map(|i| printed(&config, i)).collect();

    let config = &config;
    let results: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = inputs.iter()
            .map(|input| s.spawn(move || printed(config, input)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results, expected);
    assert_eq!(results[3], "(f3 (<> a b))\n(g {(x 3) y})\n");
}

#[test]
fn config_is_send_and_sync() {
    fn check<T: Send + Sync>() {}
    check::<Config>();
    check::<knit::Datum>();
    check::<knit::Error>();
}
