//! Supported languages and the tree producer seam.
//!
//! [`TreeProducer`] is the extension point between the engine and the parser.
//! The default implementation, [`TreeSitterProducer`], builds a fresh
//! tree-sitter parser per call so a single producer can be shared across
//! threads.

use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tree_sitter::{Parser, Tree};

/// A language the analyzer can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Python 3.
    Python,
    /// JavaScript, including JSX.
    JavaScript,
    /// TypeScript.
    TypeScript,
}

/// Extension table used by [`Language::detect`].
const EXTENSIONS: &[(&str, Language)] = &[
    ("py", Language::Python),
    ("pyi", Language::Python),
    ("js", Language::JavaScript),
    ("mjs", Language::JavaScript),
    ("cjs", Language::JavaScript),
    ("jsx", Language::JavaScript),
    ("ts", Language::TypeScript),
    ("mts", Language::TypeScript),
    ("cts", Language::TypeScript),
    ("tsx", Language::TypeScript),
];

impl Language {
    /// All supported languages.
    pub const ALL: [Self; 3] = [Self::Python, Self::JavaScript, Self::TypeScript];

    /// Canonical lowercase identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
        }
    }

    /// Returns true for JavaScript and TypeScript, which share node kinds.
    #[must_use]
    pub const fn is_js_family(self) -> bool {
        matches!(self, Self::JavaScript | Self::TypeScript)
    }

    /// Maps a file extension (without the dot) to a language.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, lang)| *lang)
    }

    /// Resolves the identifier to analyze with: an explicit flag wins
    /// (trimmed and lowercased), otherwise the path extension is used.
    ///
    /// Returns the raw identifier rather than a [`Language`] so that an
    /// unsupported flag value reaches validation and is reported there.
    #[must_use]
    pub fn detect(flag: Option<&str>, path: Option<&Path>) -> Option<String> {
        if let Some(flag) = flag.map(str::trim).filter(|f| !f.is_empty()) {
            return Some(flag.to_ascii_lowercase());
        }
        path.and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .map(|lang| lang.id().to_string())
    }

    /// The tree-sitter grammar for this language.
    #[must_use]
    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a language identifier is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("language {0} not supported")]
pub struct UnsupportedLanguage(pub String);

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.id() == normalized)
            .ok_or_else(|| UnsupportedLanguage(s.trim().to_string()))
    }
}

/// Failure to produce a syntax tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {language} grammar: {source}")]
    Grammar {
        /// Language whose grammar failed to load.
        language: Language,
        /// Underlying tree-sitter error.
        #[source]
        source: tree_sitter::LanguageError,
    },

    /// The parser returned no tree.
    #[error("failed to parse source")]
    NoTree,
}

/// Produces a syntax tree for a source buffer.
pub trait TreeProducer: Send + Sync {
    /// Parses `source` as `language`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if no usable tree could be produced.
    fn parse(&self, language: Language, source: &[u8]) -> Result<Tree, ParseError>;
}

/// Default [`TreeProducer`] backed by tree-sitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterProducer;

impl TreeProducer for TreeSitterProducer {
    fn parse(&self, language: Language, source: &[u8]) -> Result<Tree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&language.grammar())
            .map_err(|source| ParseError::Grammar { language, source })?;
        parser.parse(source, None).ok_or(ParseError::NoTree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_trims_and_lowercases_flag() {
        let got = Language::detect(Some(" PYTHON "), Some(Path::new("example.js")));
        assert_eq!(got.as_deref(), Some("python"));
    }

    #[test]
    fn detect_falls_back_to_extension() {
        assert_eq!(
            Language::detect(None, Some(Path::new("src/app.tsx"))).as_deref(),
            Some("typescript")
        );
        assert_eq!(
            Language::detect(Some("  "), Some(Path::new("lib.MJS"))).as_deref(),
            Some("javascript")
        );
        assert_eq!(Language::detect(None, Some(Path::new("main.rs"))), None);
        assert_eq!(Language::detect(None, None), None);
    }

    #[test]
    fn detect_keeps_unknown_flag_for_validation() {
        assert_eq!(
            Language::detect(Some("Ruby"), None).as_deref(),
            Some("ruby")
        );
    }

    #[test]
    fn from_str_round_trips_ids() {
        for lang in Language::ALL {
            assert_eq!(lang.id().parse::<Language>().unwrap(), lang);
        }
        assert_eq!(
            "cobol".parse::<Language>(),
            Err(UnsupportedLanguage("cobol".to_string()))
        );
    }

    #[test]
    fn tree_sitter_producer_parses_each_language() {
        let producer = TreeSitterProducer;
        let cases = [
            (Language::Python, "x = 1\n"),
            (Language::JavaScript, "const x = 1;\n"),
            (Language::TypeScript, "const x: number = 1;\n"),
        ];
        for (lang, src) in cases {
            let tree = producer.parse(lang, src.as_bytes()).unwrap();
            assert!(!tree.root_node().has_error(), "{lang} failed to parse");
        }
    }
}
