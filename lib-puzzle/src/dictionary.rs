//! Dictionary and frequency-map loading.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::word::Word;

/// An ordered, deduplicated collection of five-letter words.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<Word>,
}

impl Dictionary {
    pub fn from_words(words: Vec<Word>) -> Dictionary {
        let mut seen = std::collections::HashSet::with_capacity(words.len());
        let deduped: Vec<Word> = words.into_iter().filter(|w| seen.insert(*w)).collect();
        Dictionary { words: deduped }
    }

    /// Parse a dictionary from file contents: one word per line, trimmed and
    /// lowercased; only lines that are exactly five ASCII letters are kept.
    pub fn parse(contents: &str) -> Dictionary {
        let words: Vec<Word> = contents
            .lines()
            .filter_map(|line| Word::new(line.trim()))
            .collect();

        Dictionary::from_words(words)
    }

    pub fn load(path: &Path) -> std::io::Result<Dictionary> {
        let contents = fs::read_to_string(path)?;
        Ok(Dictionary::parse(&contents))
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn contains(&self, word: Word) -> bool {
        self.words.contains(&word)
    }
}

/// Optional mapping from word to a non-negative real frequency. Missing
/// entries mean "unknown frequency".
#[derive(Debug, Clone, Default)]
pub struct FrequencyMap {
    frequencies: HashMap<Word, f64>,
}

impl FrequencyMap {
    pub fn empty() -> FrequencyMap {
        FrequencyMap { frequencies: HashMap::new() }
    }

    /// Parse `word,frequency` lines; malformed lines are silently skipped.
    pub fn parse(contents: &str) -> FrequencyMap {
        let mut frequencies = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();
            let Some((word_text, freq_text)) = line.rsplit_once(',') else { continue };

            let Some(word) = Word::new(word_text.trim()) else { continue };
            let Ok(freq) = freq_text.trim().parse::<f64>() else { continue };
            if freq < 0.0 {
                continue;
            }

            frequencies.insert(word, freq);
        }

        FrequencyMap { frequencies }
    }

    pub fn load(path: &Path) -> std::io::Result<FrequencyMap> {
        let contents = fs::read_to_string(path)?;
        Ok(FrequencyMap::parse(&contents))
    }

    /// Load the frequency file if it exists; a missing file is non-fatal and
    /// yields an empty map so the generator proceeds with default scoring.
    pub fn load_optional(path: Option<&Path>) -> FrequencyMap {
        match path {
            Some(path) if path.exists() => FrequencyMap::load(path).unwrap_or_else(|err| {
                log::warn!("Could not read frequency file {path:?}: {err}");
                FrequencyMap::empty()
            }),
            Some(path) => {
                log::warn!("Frequency file {path:?} not found, using default scoring");
                FrequencyMap::empty()
            }
            None => FrequencyMap::empty(),
        }
    }

    pub fn get(&self, word: Word) -> Option<f64> {
        self.frequencies.get(&word).copied()
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.frequencies.values().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_dedupes_and_filters() {
        let dictionary = Dictionary::parse("crane\nCRANE\nshort\ntoolong\n12345\n\nslate\n");
        let words: Vec<String> = dictionary.words().iter().map(|w| w.to_string()).collect();
        assert_eq!(words, vec!["crane", "slate"]);
    }

    #[test]
    fn frequency_map_skips_malformed_lines() {
        let map = FrequencyMap::parse("crane,12.5\nslate,not-a-number\nbadline\nshard,0\n,5\n");
        assert_eq!(map.get(Word::new("crane").unwrap()), Some(12.5));
        assert_eq!(map.get(Word::new("shard").unwrap()), Some(0.0));
        assert_eq!(map.get(Word::new("slate").unwrap()), None);
        assert_eq!(map.len(), 2);
    }
}
