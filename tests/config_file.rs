use std::{env, fs, process};

use knit::{
    config_file::{LoadError, from_json_path},
    common::inmem::parse_str, printer::print, ConfigError,
};


#[test]
fn load_and_parse() {
    let path = env::temp_dir().join(format!("knit-config-{}.json", process::id()));
    fs::write(&path, r#"{
        "delimiters": [{ "open": "⟨", "close": "⟩" }, { "open": "{", "close": "}" }],
        "application": "⟨",
        "struct_delimiter": null,
        "infix": ["plus"],
        "section": { "symbol": "=>", "materializer": "{" },
        "structure": { "symbol": ":=", "materializer": "{" },
        "effect": { "symbol": "!:", "materializer": "{" }
    }"#).unwrap();
    let config = from_json_path(&path);
    fs::remove_file(&path).unwrap();
    let config = config.unwrap();

    let items: Vec<_> = parse_str(&config, "a plus b => c, d\n(x)")
        .into_iter().map(|r| print(&r.unwrap())).collect();
    assert_eq!(items, ["⟨⟨plus a b⟩ {c d}⟩", "(x)"]);
}

#[test]
fn invalid() {
    let r = knit::config_file::from_json_str(r#"{ "sibling_groups": [["if"], ["if"]] }"#);
    assert!(matches!(r, Err(LoadError::Invalid(ConfigError::DuplicateKeyword(ref k)))
                        if k == "if"));
    let e = r.unwrap_err();
    assert!(e.to_string().starts_with("invalid configuration: "));
}
