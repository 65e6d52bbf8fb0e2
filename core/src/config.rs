//! The configuration table: which symbols and characters belong to which
//! syntactic category.  It is validated once, then frozen into lookup tables
//! that any number of parses may share.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Delim, ConfigError};


/// A (trigger symbol, materializer delimiter) pair for sections, structures, or
/// effects.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Trigger {
    /// The symbol that opens the context, when spaced on both sides
    pub symbol: String,
    /// Opening character of the configured pair that its materialized `List`s
    /// use
    pub materializer: char,
}


/// The delimiters of the three kinds of string literal.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct StringDelims {
    /// Backslash escapes interpreted
    pub escaped: char,
    /// Literal content; delimiter embedded by doubling
    pub raw: char,
    /// Bit-pattern content
    pub binary: char,
}


/// The plain, serializable, not-yet-validated description of a configuration.
/// Its `Default` is the standard notation.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigSpec {
    /// Bracket pairs
    pub delimiters: Vec<Delim>,
    /// Opening character of the pair used for synthetic application `List`s
    pub application: char,
    /// Opening character of the pair whose `List`s are struct-shaped
    pub struct_delimiter: Option<char>,
    /// Opening character of the pair whose `List`s are binary-shaped
    pub binary_delimiter: Option<char>,
    /// Prefix glue, name to symbol
    pub prefix_glue: BTreeMap<String, String>,
    /// Suffix glue, name to symbol
    pub suffix_glue: BTreeMap<String, String>,
    /// Infix symbols, folded left with no precedence
    pub infix: Vec<String>,
    /// Left-associative symbols
    pub assoc_left: Vec<String>,
    /// Right-associative symbols
    pub assoc_right: Vec<String>,
    /// Sibling keyword groups, each in declared order with its leading keyword
    /// first
    pub sibling_groups: Vec<Vec<String>>,
    /// Section trigger
    pub section: Trigger,
    /// Structure trigger
    pub structure: Trigger,
    /// Effect trigger
    pub effect: Trigger,
    /// Characters that separate items of the innermost context
    pub separators: Vec<char>,
    /// Characters that end a statement
    pub sequences: Vec<char>,
    /// String literal delimiters
    pub strings: StringDelims,
    /// Start of a comment, when followed by a space or the end of the line
    pub comment_prefix: String,
    /// Start of a directive name
    pub directive_prefix: String,
}

impl Default for ConfigSpec {
    fn default() -> Self {
        let map = |pairs: &[(&str, &str)]| -> BTreeMap<String, String> {
            pairs.iter().map(|&(n, s)| (n.to_owned(), s.to_owned())).collect()
        };
        let strings = |syms: &[&str]| -> Vec<String> {
            syms.iter().map(|&s| s.to_owned()).collect()
        };
        Self {
            delimiters: vec![Delim::new('(', ')'), Delim::new('[', ']'), Delim::new('{', '}')],
            application: '(',
            struct_delimiter: Some('['),
            binary_delimiter: None,
            prefix_glue: map(&[("ref", "&"), ("share", "share&"), ("mut", "mut&"),
                               ("spread", "...")]),
            suffix_glue: map(&[("field", "."), ("tag", "::")]),
            infix: strings(&["+", "-", "*", "/", "%", "==", "!=", "<", ">", "<=", ">=",
                             "=", "and", "or"]),
            assoc_left: strings(&["|>"]),
            assoc_right: strings(&["->"]),
            sibling_groups: vec![strings(&["if", "elseif", "else"]),
                                 strings(&["try", "catch", "finally"])],
            section: Trigger { symbol: ":".into(), materializer: '{' },
            structure: Trigger { symbol: ":=".into(), materializer: '[' },
            effect: Trigger { symbol: "!:".into(), materializer: '{' },
            separators: vec![','],
            sequences: vec![';'],
            strings: StringDelims { escaped: '"', raw: '\'', binary: '`' },
            comment_prefix: "#".into(),
            directive_prefix: "@".into(),
        }
    }
}


/// Syntactic category of a transformer or trigger symbol.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum SymbolClass {
    /// Prefix glue
    Prefix,
    /// Suffix glue
    Suffix,
    /// Infix, folded left
    Infix,
    /// Left-associative
    AssocLeft,
    /// Right-associative
    AssocRight,
    /// Opens a section
    Section,
    /// Opens a structure
    Structure,
    /// Opens an effect
    Effect,
}

impl SymbolClass {
    fn describe(self) -> &'static str {
        match self {
            SymbolClass::Prefix => "prefix glue",
            SymbolClass::Suffix => "suffix glue",
            SymbolClass::Infix => "infix",
            SymbolClass::AssocLeft => "left associative",
            SymbolClass::AssocRight => "right associative",
            SymbolClass::Section => "section trigger",
            SymbolClass::Structure => "structure trigger",
            SymbolClass::Effect => "effect trigger",
        }
    }
}


/// The frozen, validated configuration.  Read-only once constructed, so it is
/// shared freely (it is `Send` and `Sync`) by any number of concurrent parses.
#[derive(Clone, Debug)]
pub struct Config {
    spec: ConfigSpec,
    symbols: HashMap<String, SymbolClass>,
    // Longest first, so the first match is the longest match.
    prefix_symbols: Vec<String>,
    suffix_symbols: Vec<String>,
    keywords: HashMap<String, (usize, usize)>,
    application: Delim,
    materializers: [Delim; 3],
}

impl Config {
    /// Validate `spec` and freeze it.
    pub fn new(spec: ConfigSpec) -> Result<Self, ConfigError> {
        let symbols = classify(&spec)?;
        check_chars(&spec)?;

        let pair = |role: &'static str, open: char| -> Result<Delim, ConfigError> {
            spec.delimiters.iter().copied().find(|d| d.open == open)
                .ok_or(ConfigError::UnknownDelimiter { role, open })
        };
        let application = pair("application", spec.application)?;
        let materializers = [pair("section materializer", spec.section.materializer)?,
                             pair("structure materializer", spec.structure.materializer)?,
                             pair("effect materializer", spec.effect.materializer)?];
        if let Some(open) = spec.struct_delimiter {
            let _ = pair("struct", open)?;
        }
        if let Some(open) = spec.binary_delimiter {
            let _ = pair("binary", open)?;
        }

        let mut keywords = HashMap::new();
        for (g, group) in spec.sibling_groups.iter().enumerate() {
            if group.is_empty() {
                return Err(ConfigError::EmptyGroup(g));
            }
            for (rank, kw) in group.iter().enumerate() {
                check_symbol(kw, "sibling group")?;
                if keywords.insert(kw.clone(), (g, rank)).is_some() {
                    return Err(ConfigError::DuplicateKeyword(kw.clone()));
                }
            }
        }

        let longest_first = |m: &BTreeMap<String, String>| {
            let mut v: Vec<String> = m.values().cloned().collect();
            v.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
            v.dedup();
            v
        };
        let prefix_symbols = longest_first(&spec.prefix_glue);
        let suffix_symbols = longest_first(&spec.suffix_glue);

        tracing::debug!(symbols = symbols.len(),
                        delimiters = spec.delimiters.len(),
                        sibling_groups = spec.sibling_groups.len(),
                        "configuration frozen");

        Ok(Self { spec, symbols, prefix_symbols, suffix_symbols, keywords,
                  application, materializers })
    }

    /// The standard notation.
    pub fn standard() -> Self {
        // The default spec is known to be valid; the unit tests guard this.
        match Self::new(ConfigSpec::default()) {
            Ok(config) => config,
            Err(e) => unreachable!("standard configuration is invalid: {}", e),
        }
    }

    /// The specification this was frozen from.
    pub fn spec(&self) -> &ConfigSpec {
        &self.spec
    }

    /// Category of `text`, if it is a configured transformer or trigger symbol.
    #[inline]
    pub fn class_of(&self, text: &str) -> Option<SymbolClass> {
        self.symbols.get(text).copied()
    }

    /// Prefix glue symbols, longest first.
    pub fn prefix_symbols(&self) -> &[String] {
        &self.prefix_symbols
    }

    /// Suffix glue symbols, longest first.
    pub fn suffix_symbols(&self) -> &[String] {
        &self.suffix_symbols
    }

    /// The `(group, rank)` of a sibling keyword.
    #[inline]
    pub fn keyword(&self, text: &str) -> Option<(usize, usize)> {
        self.keywords.get(text).copied()
    }

    /// The configured pair opened by `ch`.
    pub fn opener(&self, ch: char) -> Option<Delim> {
        self.spec.delimiters.iter().copied().find(|d| d.open == ch)
    }

    /// Whether `ch` closes any configured pair.
    pub fn is_closer(&self, ch: char) -> bool {
        self.spec.delimiters.iter().any(|d| d.close == ch)
    }

    /// The pair used for synthetic application `List`s.
    #[inline]
    pub fn application(&self) -> Delim {
        self.application
    }

    /// The materializer pair of sections.
    #[inline]
    pub fn section_delim(&self) -> Delim {
        self.materializers[0]
    }

    /// The materializer pair of structures.
    #[inline]
    pub fn structure_delim(&self) -> Delim {
        self.materializers[1]
    }

    /// The materializer pair of effects.
    #[inline]
    pub fn effect_delim(&self) -> Delim {
        self.materializers[2]
    }

    /// The shape tag implied by a pair.
    pub fn shape_of(&self, delim: Delim) -> Option<crate::Shape> {
        if self.spec.struct_delimiter == Some(delim.open) {
            Some(crate::Shape::Struct)
        } else if self.spec.binary_delimiter == Some(delim.open) {
            Some(crate::Shape::Binary)
        } else {
            None
        }
    }

    /// Whether `ch` is a separator character.
    #[inline]
    pub fn is_separator(&self, ch: char) -> bool {
        self.spec.separators.contains(&ch)
    }

    /// Whether `ch` is a sequence character.
    #[inline]
    pub fn is_sequence(&self, ch: char) -> bool {
        self.spec.sequences.contains(&ch)
    }

    /// The kind of string literal that `ch` opens.
    pub fn string_kind(&self, ch: char) -> Option<crate::StrKind> {
        let s = &self.spec.strings;
        if ch == s.escaped {
            Some(crate::StrKind::Escaped)
        } else if ch == s.raw {
            Some(crate::StrKind::Raw)
        } else if ch == s.binary {
            Some(crate::StrKind::Binary)
        } else {
            None
        }
    }

    /// Whether `ch` ends an ordinary atom by itself.
    pub fn is_atom_end(&self, ch: char) -> bool {
        ch.is_whitespace()
            || self.opener(ch).is_some()
            || self.is_closer(ch)
            || self.is_separator(ch)
            || self.is_sequence(ch)
            || self.string_kind(ch).is_some()
    }

    /// The comment prefix.
    #[inline]
    pub fn comment_prefix(&self) -> &str {
        &self.spec.comment_prefix
    }

    /// The directive prefix.
    #[inline]
    pub fn directive_prefix(&self) -> &str {
        &self.spec.directive_prefix
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::standard()
    }
}


fn check_symbol(sym: &str, category: &'static str) -> Result<(), ConfigError> {
    if sym.is_empty() {
        Err(ConfigError::EmptySymbol(category))
    } else if sym.chars().any(char::is_whitespace) {
        Err(ConfigError::Whitespace { symbol: sym.to_owned(), category })
    } else {
        Ok(())
    }
}

/// Assign every transformer and trigger symbol its one category.
fn classify(spec: &ConfigSpec) -> Result<HashMap<String, SymbolClass>, ConfigError> {
    use SymbolClass::*;

    let mut symbols: HashMap<String, SymbolClass> = HashMap::new();
    let mut add = |sym: &str, class: SymbolClass| -> Result<(), ConfigError> {
        check_symbol(sym, class.describe())?;
        match symbols.get(sym) {
            Some(&first) if first != class
                => Err(ConfigError::Conflict { symbol: sym.to_owned(),
                                               first: first.describe(),
                                               second: class.describe() }),
            _ => {
                let _ = symbols.insert(sym.to_owned(), class);
                Ok(())
            }
        }
    };

    for sym in spec.prefix_glue.values() { add(sym, Prefix)?; }
    for sym in spec.suffix_glue.values() { add(sym, Suffix)?; }
    for sym in &spec.infix { add(sym, Infix)?; }
    for sym in &spec.assoc_left { add(sym, AssocLeft)?; }
    for sym in &spec.assoc_right { add(sym, AssocRight)?; }
    add(&spec.section.symbol, Section)?;
    add(&spec.structure.symbol, Structure)?;
    add(&spec.effect.symbol, Effect)?;

    // Separator and sequence characters are single-character symbols too.
    let mut seen: HashMap<char, &'static str> = HashMap::new();
    for (chars, role) in [(&spec.separators, "separator"), (&spec.sequences, "sequence")] {
        for &ch in chars {
            let text = ch.to_string();
            if let Some(class) = symbols.get(&text) {
                return Err(ConfigError::Conflict { symbol: text,
                                                   first: class.describe(),
                                                   second: role });
            }
            if let Some(first) = seen.insert(ch, role) {
                return Err(ConfigError::Conflict { symbol: text, first, second: role });
            }
        }
    }

    Ok(symbols)
}

/// Check that delimiter, string, separator and sequence characters are
/// distinct from each other.
fn check_chars(spec: &ConfigSpec) -> Result<(), ConfigError> {
    let mut used: Vec<char> = Vec::new();
    for d in &spec.delimiters {
        for ch in [d.open, d.close] {
            if used.contains(&ch) {
                return Err(ConfigError::DuplicateDelimiter(ch));
            }
            used.push(ch);
        }
    }
    let s = &spec.strings;
    let specials = [(s.escaped, "escaped string"), (s.raw, "raw string"),
                    (s.binary, "binary string")].into_iter()
        .chain(spec.separators.iter().map(|&c| (c, "separator")))
        .chain(spec.sequences.iter().map(|&c| (c, "sequence")));
    for (ch, role) in specials {
        if used.contains(&ch) || ch.is_whitespace() {
            return Err(ConfigError::ReservedChar { ch, role });
        }
        used.push(ch);
    }
    check_symbol(&spec.comment_prefix, "comment prefix")?;
    check_symbol(&spec.directive_prefix, "directive prefix")?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_is_valid() {
        let c = Config::new(ConfigSpec::default()).unwrap();
        assert_eq!(c.class_of("&"), Some(SymbolClass::Prefix));
        assert_eq!(c.class_of("::"), Some(SymbolClass::Suffix));
        assert_eq!(c.class_of("|>"), Some(SymbolClass::AssocLeft));
        assert_eq!(c.class_of(":="), Some(SymbolClass::Structure));
        assert_eq!(c.class_of("x"), None);
        assert_eq!(c.keyword("elseif"), Some((0, 1)));
        assert_eq!(c.keyword("finally"), Some((1, 2)));
        assert_eq!(c.application(), Delim::new('(', ')'));
        assert_eq!(c.structure_delim(), Delim::new('[', ']'));
        assert_eq!(c.shape_of(Delim::new('[', ']')), Some(crate::Shape::Struct));
        assert_eq!(c.shape_of(Delim::new('{', '}')), None);
    }

    #[test]
    fn glue_symbols_longest_first() {
        let c = Config::standard();
        assert_eq!(c.prefix_symbols()[0].chars().count(), 6);
        assert_eq!(c.prefix_symbols().last().map(String::as_str), Some("&"));
        assert_eq!(c.suffix_symbols(), ["::".to_owned(), ".".to_owned()]);
    }

    #[test]
    fn symbol_in_two_categories() {
        let mut spec = ConfigSpec::default();
        let _ = spec.suffix_glue.insert("label".into(), ":".into());
        assert_eq!(Config::new(spec).unwrap_err(),
                   ConfigError::Conflict { symbol: ":".into(),
                                           first: "suffix glue",
                                           second: "section trigger" });

        let mut spec = ConfigSpec::default();
        spec.infix.push("|>".into());
        assert!(matches!(Config::new(spec), Err(ConfigError::Conflict { .. })));

        let mut spec = ConfigSpec::default();
        spec.separators.push(';');
        assert!(matches!(Config::new(spec), Err(ConfigError::Conflict { .. })));
    }

    #[test]
    fn bad_symbols_and_chars() {
        let mut spec = ConfigSpec::default();
        spec.infix.push(String::new());
        assert_eq!(Config::new(spec).unwrap_err(), ConfigError::EmptySymbol("infix"));

        let mut spec = ConfigSpec::default();
        spec.assoc_left.push("a b".into());
        assert!(matches!(Config::new(spec), Err(ConfigError::Whitespace { .. })));

        let mut spec = ConfigSpec::default();
        spec.delimiters.push(Delim::new('<', '('));
        assert_eq!(Config::new(spec).unwrap_err(), ConfigError::DuplicateDelimiter('('));

        let mut spec = ConfigSpec::default();
        spec.section.materializer = '<';
        assert!(matches!(Config::new(spec), Err(ConfigError::UnknownDelimiter { .. })));

        let mut spec = ConfigSpec::default();
        spec.separators = vec!['['];
        assert_eq!(Config::new(spec).unwrap_err(),
                   ConfigError::ReservedChar { ch: '[', role: "separator" });

        let mut spec = ConfigSpec::default();
        spec.sibling_groups.push(vec!["else".into()]);
        assert_eq!(Config::new(spec).unwrap_err(),
                   ConfigError::DuplicateKeyword("else".into()));
    }

    #[test]
    fn shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Config>();
    }
}
