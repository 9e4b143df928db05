//! Keyword and symbol tables for the lexer, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

const DEFAULT_KEYWORDS: &[&str] = &[
    "and", "or", "not", "is", "null", "true", "false", "in", "like", "between", "case", "when",
    "then", "else", "end", "as", "distinct", "date", "datetime",
];

const DEFAULT_SYMBOLS: &[&str] = &[
    "<=", ">=", "<>", "!=", "||", "=", "<", ">", "+", "-", "*", "/", "%", "(", ")", ",", ".", ";",
];

/// On-disk layout of a symbol table before validation.
#[derive(Debug, Deserialize)]
struct SymbolTableFile {
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    symbols: Vec<String>,
}

/// The reserved words and operator symbols the lexer recognizes.
///
/// Keywords are stored in lowercase and match ASCII case-insensitively.
/// Symbols are kept longest first so a prefix scan finds the longest one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SymbolTableFile")]
pub struct SymbolTable {
    keywords: Vec<String>,
    symbols: Vec<String>,
}

impl TryFrom<SymbolTableFile> for SymbolTable {
    type Error = ConfigError;

    fn try_from(file: SymbolTableFile) -> Result<Self, Self::Error> {
        SymbolTable::new(file.keywords, file.symbols)
    }
}

impl SymbolTable {
    pub fn new<K, S>(keywords: K, symbols: S) -> Result<Self, ConfigError>
    where
        K: IntoIterator,
        K::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let mut keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.into().to_ascii_lowercase())
            .collect();
        for keyword in &keywords {
            if !is_word(keyword) {
                return Err(ConfigError::Invalid(format!(
                    "keyword '{}' is not a word",
                    keyword
                )));
            }
        }
        keywords.sort();
        keywords.dedup();

        let mut symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        for symbol in &symbols {
            if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid(format!(
                    "symbol '{}' is empty or contains whitespace",
                    symbol
                )));
            }
        }
        symbols.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        symbols.dedup();

        Ok(Self { keywords, symbols })
    }

    /// Loads a table from a JSON file shaped like
    /// `{"keywords": ["and", ...], "symbols": ["<=", ...]}`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(ConfigError::NotFound(path_ref.to_path_buf()));
        }

        let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let table: SymbolTable = serde_json::from_str(&content).map_err(|source| {
            ConfigError::Parse {
                path: path_ref.to_path_buf(),
                source,
            }
        })?;

        log::info!(
            "loaded {} keywords and {} symbols from {}",
            table.keywords.len(),
            table.symbols.len(),
            path_ref.display()
        );
        Ok(table)
    }

    /// Returns the table's spelling of `word` if it is a keyword.
    pub fn keyword(&self, word: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|k| k.eq_ignore_ascii_case(word))
            .map(String::as_str)
    }

    /// Returns the longest symbol that `text` starts with.
    pub fn longest_symbol(&self, text: &str) -> Option<&str> {
        self.symbols
            .iter()
            .find(|s| text.starts_with(s.as_str()))
            .map(String::as_str)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut keywords: Vec<String> = DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect();
        keywords.sort();
        let mut symbols: Vec<String> = DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect();
        symbols.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { keywords, symbols }
    }
}

fn is_word(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
