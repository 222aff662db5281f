use include_dir::{include_dir, Dir};
use rand::Rng;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::LoadError;

static WORDS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/words");

/// Name of the word list bundled into the binary.
pub const DEFAULT_CORPUS: &str = "english";

/// On-disk shape of a corpus file.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CorpusRecord {
    name: String,
    #[serde(default)]
    no_lazy_mode: bool,
    #[serde(default)]
    ordered_by_frequency: bool,
    words: Vec<String>,
}

/// Immutable list of candidate words. Never empty, every word is printable ASCII.
#[derive(Debug, Clone, PartialEq)]
pub struct WordCorpus {
    name: String,
    no_lazy_mode: bool,
    ordered_by_frequency: bool,
    words: Vec<String>,
}

impl WordCorpus {
    pub fn new(name: impl Into<String>, words: Vec<String>) -> Result<Self, LoadError> {
        Self::validated(CorpusRecord {
            name: name.into(),
            no_lazy_mode: false,
            ordered_by_frequency: false,
            words,
        })
    }

    /// Read and validate a corpus file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::from_json(&contents)?;
        debug!(path = %path.display(), words = corpus.len(), "loaded corpus file");
        Ok(corpus)
    }

    pub fn from_json(contents: &str) -> Result<Self, LoadError> {
        let record: CorpusRecord = serde_json::from_str(contents)?;
        Self::validated(record)
    }

    /// Word list compiled into the binary, looked up by name.
    pub fn embedded(name: &str) -> Result<Self, LoadError> {
        let file = WORDS_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| LoadError::MissingEmbedded(name.to_string()))?;
        let contents = file
            .contents_utf8()
            .ok_or_else(|| LoadError::MissingEmbedded(name.to_string()))?;
        Self::from_json(contents)
    }

    fn validated(record: CorpusRecord) -> Result<Self, LoadError> {
        if record.words.is_empty() {
            return Err(LoadError::EmptyWordList(record.name));
        }
        if let Some((index, word)) = record
            .words
            .iter()
            .enumerate()
            .find(|(_, w)| !is_typeable(w))
        {
            return Err(LoadError::InvalidWord {
                index,
                word: word.clone(),
            });
        }

        Ok(Self {
            name: record.name,
            no_lazy_mode: record.no_lazy_mode,
            ordered_by_frequency: record.ordered_by_frequency,
            words: record.words,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn no_lazy_mode(&self) -> bool {
        self.no_lazy_mode
    }

    pub fn ordered_by_frequency(&self) -> bool {
        self.ordered_by_frequency
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Draw `n` words independently and uniformly.
    ///
    /// Each draw maps a uniform `r` in [0, 1) to `floor(r * len)`. The
    /// frequency ordering flag is carried as metadata only and does not bias
    /// the draw.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<String> {
        let len = self.words.len();
        (0..n)
            .map(|_| {
                let draw: f64 = rng.gen();
                let index = ((draw * len as f64) as usize).min(len - 1);
                self.words[index].clone()
            })
            .collect()
    }
}

fn is_typeable(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_graphic())
}
