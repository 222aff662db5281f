use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a corpus source into a usable word list.
///
/// Always fatal to the process: the binary reports it and exits non-zero.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unable to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed corpus: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("corpus '{0}' has no words")]
    EmptyWordList(String),

    #[error("corpus word #{index} ({word:?}) must be non-empty printable ASCII without spaces")]
    InvalidWord { index: usize, word: String },

    #[error("embedded corpus '{0}' not found")]
    MissingEmbedded(String),
}
