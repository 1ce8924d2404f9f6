//! Error types shared by the library.
//!
//! Most failures in this crate are recovered close to where they happen
//! (a single file, identifier, or endpoint), so callers usually see these
//! in logs rather than as a failed run.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing, resolving, or rewriting source.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("failed to load {language} grammar: {source}")]
    Grammar {
        language: &'static str,
        #[source]
        source: tree_sitter::LanguageError,
    },
    #[error("invalid tree-sitter query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("failed to parse {path}")]
    Parse { path: String },
    #[error("{path} contains syntax errors")]
    Syntax { path: String },
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("record for {name:?} does not match the text: {reason}")]
    StaleRecord { name: String, reason: String },
    #[error("documentation request failed: {0}")]
    Documenter(String),
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Library result alias.
pub type Result<T> = std::result::Result<T, Error>;
