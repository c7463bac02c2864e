//! The dictionary oracle boundary and a word-list backed implementation.
//!
//! The engine never looks words up itself. It asks a [`DictionaryOracle`],
//! which may be an in-memory list, an external spell-checker process, or a
//! network service. The only contract is "is this literal word valid?".

use std::collections::HashSet;
use std::future::Future;
use std::io::{self, BufRead};
use std::path::Path;

/// Answers whether a literal word is valid.
///
/// Implementations must tolerate concurrent queries: the wildcard resolver
/// issues all of a word's candidate spellings at once.
///
/// # Example
///
/// ```rust
/// use scrabr_rules::DictionaryOracle;
///
/// /// Accepts every word. Handy for tests that only exercise placement.
/// struct Permissive;
///
/// impl DictionaryOracle for Permissive {
///     async fn is_valid(&self, _word: &str) -> bool {
///         true
///     }
/// }
/// ```
pub trait DictionaryOracle: Send + Sync + 'static {
    fn is_valid(&self, word: &str) -> impl Future<Output = bool> + Send;
}

/// A dictionary held in memory as a set of folded words.
///
/// Words are stored lowercase with Portuguese diacritics removed, and
/// queries are folded the same way, so `voce` on the board matches a
/// `você` entry in the list.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Builds a word list from any iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| fold(w.as_ref().trim()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Reads one word per line. Blank lines and `#` comments are skipped,
    /// as is anything after a `/` (hunspell affix flags).
    pub fn from_reader(reader: impl BufRead) -> io::Result<Self> {
        let mut words = HashSet::new();
        for line in reader.lines() {
            let line = line?;
            let entry = line.split('/').next().unwrap_or_default().trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            words.insert(fold(entry));
        }
        Ok(Self { words })
    }

    /// Loads a word list from a file.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let list = Self::from_reader(io::BufReader::new(file))?;
        tracing::info!(
            path = %path.as_ref().display(),
            words = list.len(),
            "word list loaded"
        );
        Ok(list)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&fold(word))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl DictionaryOracle for WordList {
    async fn is_valid(&self, word: &str) -> bool {
        self.contains(word)
    }
}

/// Lowercases and strips the diacritics used in Portuguese.
fn fold(word: &str) -> String {
    word.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
