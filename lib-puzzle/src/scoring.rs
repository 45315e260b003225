//! Letter/position frequency tables and per-word scores used to bias the
//! puzzle search toward informative, plausible guesses.
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dictionary::{Dictionary, FrequencyMap};
use crate::word::Word;

/// Letter- and position-proportion tables built once from a Dictionary.
#[derive(Debug, Clone)]
pub struct ScoringTables {
    /// `letter_freq[l] = count(l in dictionary) / total_letter_occurrences`
    letter_freq: [f64; 26],
    /// `pos_freq[p][l] = count_at_position(l, p) / dictionary_size`
    pos_freq: [[f64; 26]; 5],
}

impl ScoringTables {
    pub fn build(dictionary: &[Word]) -> ScoringTables {
        let mut letter_counts = [0u64; 26];
        let mut pos_counts = [[0u64; 26]; 5];

        for &word in dictionary {
            for idx in word.iter_index() {
                letter_counts[idx as usize] += 1;
            }
            for pos in 0..5 {
                pos_counts[pos][word.index_at(pos) as usize] += 1;
            }
        }

        let total_letters: u64 = letter_counts.iter().sum();
        let dictionary_size = dictionary.len().max(1) as f64;

        let mut letter_freq = [0.0; 26];
        if total_letters > 0 {
            for i in 0..26 {
                letter_freq[i] = letter_counts[i] as f64 / total_letters as f64;
            }
        }

        let mut pos_freq = [[0.0; 26]; 5];
        for pos in 0..5 {
            for i in 0..26 {
                pos_freq[pos][i] = pos_counts[pos][i] as f64 / dictionary_size;
            }
        }

        ScoringTables { letter_freq, pos_freq }
    }

    /// `word_score(w) = Σ_p 2·pos_freq[p][w[p]] + Σ_{distinct l in w} max(letter_freq[l], 0.01)`
    pub fn base_score(&self, word: Word) -> f64 {
        let mut score = 0.0;

        for pos in 0..5 {
            let idx = word.index_at(pos) as usize;
            score += 2.0 * self.pos_freq[pos][idx];
        }

        let mut seen = 0u32;
        for idx in word.iter_index() {
            let mask = 1u32 << idx;
            if seen & mask != 0 {
                continue;
            }
            seen |= mask;
            score += self.letter_freq[idx as usize].max(0.01);
        }

        score
    }
}

/// A word's precomputed score, folding in frequency data when available.
#[derive(Debug, Clone, Copy)]
pub struct WordScore {
    pub word: Word,
    pub score: f64,
}

/// Compute the final score for every word: the base score, boosted by
/// `1 + 0.5 · min(word_freq / 100, 10)` when frequency data is available.
pub fn score_words(dictionary: &[Word], tables: &ScoringTables, frequencies: &FrequencyMap) -> Vec<WordScore> {
    dictionary
        .iter()
        .map(|&word| {
            let base = tables.base_score(word);
            let score = match frequencies.get(word) {
                Some(freq) => base * (1.0 + 0.5 * (freq / 100.0).min(10.0)),
                None => base,
            };
            WordScore { word, score }
        })
        .collect()
}

/// Reduce `dictionary` to a curated working subset: the top 70% by score,
/// padded with a uniformly random 30% of the remainder for diversity, then
/// re-sorted ascending (the Dictionary's natural order).
pub fn curated_subset(
    dictionary: &Dictionary,
    scores: &[WordScore],
    curated_size: usize,
    rng: &mut impl Rng,
) -> Dictionary {
    if dictionary.len() <= curated_size {
        return dictionary.clone();
    }

    let mut by_score: Vec<WordScore> = scores.to_vec();
    by_score.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());

    let top_count = ((curated_size as f64) * 0.7).floor() as usize;
    let top_count = top_count.min(by_score.len());

    let (top, remainder) = by_score.split_at(top_count);
    let mut selected: Vec<Word> = top.iter().map(|s| s.word).collect();

    let fill_count = curated_size.saturating_sub(top_count).min(remainder.len());
    let mut remainder_words: Vec<Word> = remainder.iter().map(|s| s.word).collect();
    remainder_words.shuffle(rng);
    selected.extend(remainder_words.into_iter().take(fill_count));

    selected.sort();
    Dictionary::from_words(selected)
}

/// Threshold above which a word's frequency makes it eligible to be chosen
/// as an answer: the larger of `min_answer_frequency` and the 20th
/// percentile of observed positive frequencies.
pub fn answer_frequency_threshold(frequencies: &FrequencyMap, min_answer_frequency: f64) -> f64 {
    let mut positive: Vec<f64> = frequencies.values().filter(|&f| f > 0.0).collect();
    if positive.is_empty() {
        return min_answer_frequency;
    }

    positive.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let idx = ((positive.len() as f64) * 0.20).floor() as usize;
    let idx = idx.min(positive.len() - 1);
    let percentile_20 = positive[idx];

    min_answer_frequency.max(percentile_20)
}

/// Words eligible to be selected as an answer. When `frequencies` is empty,
/// every word in `dictionary` is eligible.
pub fn answer_candidates(dictionary: &[Word], frequencies: &FrequencyMap, min_answer_frequency: f64) -> Vec<Word> {
    if frequencies.is_empty() {
        return dictionary.to_vec();
    }

    let threshold = answer_frequency_threshold(frequencies, min_answer_frequency);
    dictionary
        .iter()
        .copied()
        .filter(|&word| frequencies.get(word).map_or(true, |freq| freq >= threshold))
        .collect()
}

/// Pick a random answer from `candidates`, weighted by `freq + 1` so common
/// words appear more often without excluding rarer ones.
pub fn choose_answer(candidates: &[Word], frequencies: &FrequencyMap, rng: &mut impl Rng) -> Option<Word> {
    if candidates.is_empty() {
        return None;
    }

    let weights: Vec<f64> = candidates.iter().map(|&w| frequencies.get(w).unwrap_or(0.0) + 1.0).collect();
    let total: f64 = weights.iter().sum();

    let mut pick = rng.gen::<f64>() * total;
    for (word, weight) in candidates.iter().zip(weights.iter()) {
        if pick < *weight {
            return Some(*word);
        }
        pick -= weight;
    }

    candidates.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn w(text: &str) -> Word {
        Word::new(text).unwrap()
    }

    #[test]
    fn letter_freq_sums_to_one() {
        let dictionary = ["crane", "slate", "apple"].map(w).to_vec();
        let tables = ScoringTables::build(&dictionary);
        let total: f64 = tables.letter_freq.iter().sum();
        assert_float_absolute_eq!(total, 1.0);
    }

    #[test]
    fn repeated_letters_only_count_once_in_distinct_term() {
        let dictionary = ["apple"].map(w).to_vec();
        let tables = ScoringTables::build(&dictionary);
        // "apple" has a repeated 'p'; base_score's distinct-letter term
        // should only add each distinct letter's contribution once.
        let score = tables.base_score(w("apple"));
        assert!(score.is_finite() && score > 0.0);
    }

    #[test]
    fn frequency_boost_increases_score() {
        let dictionary = ["crane", "slate"].map(w).to_vec();
        let tables = ScoringTables::build(&dictionary);
        let mut frequencies = FrequencyMap::parse("crane,50\n");
        let with_freq = score_words(&dictionary, &tables, &frequencies);
        frequencies = FrequencyMap::empty();
        let without_freq = score_words(&dictionary, &tables, &frequencies);

        let crane_boosted = with_freq.iter().find(|s| s.word == w("crane")).unwrap().score;
        let crane_base = without_freq.iter().find(|s| s.word == w("crane")).unwrap().score;
        assert!(crane_boosted > crane_base);
    }

    #[test]
    fn curated_subset_is_no_larger_than_requested() {
        let words: Vec<Word> = ["crane", "slate", "apple", "grass", "shard", "today", "shale", "grace"]
            .map(w)
            .to_vec();
        let dictionary = Dictionary::from_words(words.clone());
        let tables = ScoringTables::build(&words);
        let scores = score_words(&words, &tables, &FrequencyMap::empty());
        let mut rng = StdRng::seed_from_u64(1);

        let curated = curated_subset(&dictionary, &scores, 4, &mut rng);
        assert!(curated.len() <= 4);
    }

    #[test]
    fn curated_subset_no_op_when_dictionary_small() {
        let words: Vec<Word> = ["crane", "slate"].map(w).to_vec();
        let dictionary = Dictionary::from_words(words.clone());
        let tables = ScoringTables::build(&words);
        let scores = score_words(&words, &tables, &FrequencyMap::empty());
        let mut rng = StdRng::seed_from_u64(1);

        let curated = curated_subset(&dictionary, &scores, 100, &mut rng);
        assert_eq!(curated.len(), dictionary.len());
    }

    #[test]
    fn answer_candidates_all_eligible_without_frequency_data() {
        let words: Vec<Word> = ["crane", "slate"].map(w).to_vec();
        let candidates = answer_candidates(&words, &FrequencyMap::empty(), 0.1);
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn answer_candidates_respects_percentile_threshold() {
        let words: Vec<Word> = ["crane", "slate", "apple", "grass", "shard"].map(w).to_vec();
        let frequencies = FrequencyMap::parse("crane,100\nslate,90\napple,1\ngrass,0.5\nshard,0.1\n");
        let candidates = answer_candidates(&words, &frequencies, 0.1);
        // 20th percentile of [0.1, 0.5, 1, 90, 100] is the first sorted entry (0.1);
        // threshold = max(0.1, 0.1) = 0.1, so every word clears it.
        assert_eq!(candidates.len(), 5);
    }

    #[test]
    fn answer_candidates_keeps_words_absent_from_frequency_map() {
        let words: Vec<Word> = ["crane", "slate", "apple"].map(w).to_vec();
        // "apple" has no entry at all; a high threshold shouldn't exclude it,
        // only words whose known frequency falls below the threshold.
        let frequencies = FrequencyMap::parse("crane,100\nslate,0\n");
        let candidates = answer_candidates(&words, &frequencies, 50.0);
        assert!(candidates.contains(&w("crane")));
        assert!(candidates.contains(&w("apple")));
        assert!(!candidates.contains(&w("slate")));
    }

    #[test]
    fn choose_answer_favors_higher_weight_over_many_draws() {
        let candidates = vec![w("crane"), w("slate")];
        let frequencies = FrequencyMap::parse("crane,1000\nslate,0\n");
        let mut rng = StdRng::seed_from_u64(42);

        let mut crane_count = 0;
        for _ in 0..200 {
            if choose_answer(&candidates, &frequencies, &mut rng) == Some(w("crane")) {
                crane_count += 1;
            }
        }
        assert!(crane_count > 150, "expected crane to dominate draws, got {crane_count}/200");
    }
}
