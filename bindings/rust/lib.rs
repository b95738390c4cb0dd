//! Rust bindings for the tree-sitter Ruby grammar.
//!
//! The parse tables are compiled by the `tree-sitter-ruby` package. This crate wraps
//! its accessor into a `tree_sitter::Language` handle and checks that the handle is
//! usable by a parser before handing it out.

use thiserror::Error;
use tree_sitter::{Language, Parser, LANGUAGE_VERSION, MIN_COMPATIBLE_LANGUAGE_VERSION};

pub use tree_sitter_ruby::{HIGHLIGHTS_QUERY, LOCALS_QUERY, NODE_TYPES, TAGS_QUERY};

#[derive(Debug, Error)]
pub enum Error {
    /// The accessor yielded nothing, or the grammar's ABI version is outside
    /// the range the linked runtime supports.
    #[error("Error loading Ruby grammar")]
    GrammarLoadFailure { abi: Option<usize> },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns the Tree-sitter [`Language`] for the Ruby grammar.
pub fn language() -> Language {
    Language::new(tree_sitter_ruby::LANGUAGE)
}

/// Like [`language`], but verifies the handle before returning it.
pub fn try_language() -> Result<Language> {
    load_grammar(|| Some(language()))
}

/// Obtains a grammar handle from `accessor` and checks that a [`Parser`] would accept it.
pub fn load_grammar<F>(accessor: F) -> Result<Language>
where
    F: FnOnce() -> Option<Language>,
{
    let Some(language) = accessor() else {
        tracing::warn!("grammar accessor returned no language");
        return Err(Error::GrammarLoadFailure { abi: None });
    };
    check_abi(language.abi_version())?;

    tracing::debug!(
        abi = language.abi_version(),
        node_kinds = language.node_kind_count(),
        "loaded ruby grammar"
    );
    Ok(language)
}

/// Returns a [`Parser`] already set to the Ruby grammar.
pub fn parser() -> Result<Parser> {
    let language = language();
    let mut parser = Parser::new();
    parser.set_language(&language).map_err(|err| {
        tracing::warn!(error = %err, "parser rejected grammar");
        Error::GrammarLoadFailure {
            abi: Some(language.abi_version()),
        }
    })?;
    Ok(parser)
}

// Same range `Parser::set_language` enforces.
fn check_abi(abi: usize) -> Result<()> {
    if (MIN_COMPATIBLE_LANGUAGE_VERSION..=LANGUAGE_VERSION).contains(&abi) {
        return Ok(());
    }
    tracing::warn!(
        abi,
        min = MIN_COMPATIBLE_LANGUAGE_VERSION,
        max = LANGUAGE_VERSION,
        "grammar ABI version is not supported"
    );
    Err(Error::GrammarLoadFailure { abi: Some(abi) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Query;

    #[test]
    fn grammar_can_be_loaded() {
        if let Err(err) = try_language() {
            panic!("{err}");
        }
    }

    #[test]
    fn repeated_loads_are_equivalent() {
        let first = try_language().expect("Error loading Ruby grammar");
        let second = try_language().expect("Error loading Ruby grammar");
        assert_eq!(first.abi_version(), second.abi_version());
        assert_eq!(first.node_kind_count(), second.node_kind_count());
        assert_eq!(first.abi_version(), language().abi_version());
    }

    #[test]
    fn missing_grammar_reports_load_failure() {
        let err = load_grammar(|| None).unwrap_err();
        assert!(matches!(err, Error::GrammarLoadFailure { abi: None }));
        assert_eq!(err.to_string(), "Error loading Ruby grammar");
    }

    #[test]
    fn abi_is_within_supported_range() {
        assert!(check_abi(language().abi_version()).is_ok());
    }

    #[test]
    fn unsupported_abi_reports_load_failure() {
        for abi in [MIN_COMPATIBLE_LANGUAGE_VERSION - 1, LANGUAGE_VERSION + 1] {
            let err = check_abi(abi).unwrap_err();
            assert!(matches!(err, Error::GrammarLoadFailure { abi: Some(v) } if v == abi));
            assert_eq!(err.to_string(), "Error loading Ruby grammar");
        }
    }

    #[test]
    fn parser_accepts_grammar() {
        let mut parser = parser().expect("Error loading Ruby grammar");
        let tree = parser.parse("def greet(name)\n  puts name\nend\n", None).unwrap();
        let root = tree.root_node();
        assert_eq!(root.kind(), "program");
        assert!(!root.has_error());
        assert_eq!(root.child(0).unwrap().kind(), "method");
    }

    #[test]
    fn bundled_queries_compile() {
        let language = language();
        for source in [HIGHLIGHTS_QUERY, LOCALS_QUERY, TAGS_QUERY] {
            if let Err(err) = Query::new(&language, source) {
                panic!("query failed to compile: {err}");
            }
        }
        assert!(NODE_TYPES.contains("\"program\""));
    }
}
