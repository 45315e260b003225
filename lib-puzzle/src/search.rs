//! Puzzle search: picks four guesses whose combined feedback narrows the
//! dictionary down to (ideally) the answer alone.
use std::collections::HashMap;
use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::candidates::find_candidates;
use crate::dictionary::{Dictionary, FrequencyMap};
use crate::error::PuzzleError;
use crate::feedback::{derive_feedback, Feedback, Tile};
use crate::puzzle::{Guess, Puzzle};
use crate::scoring::{self, ScoringTables, WordScore};
use crate::word::Word;

const TOP_POOL_SIZE: usize = 300;
const RANDOM_POOL_SIZE: usize = 400;
const LETTER_OVERLAP_CAP: u32 = 3;
const PRUNE_CANDIDATE_FLOOR: usize = 20;
const PRUNE_REDUCTION_RATIO: f64 = 0.1;
const DEFAULT_MAX_ATTEMPTS: usize = 500;

/// Parameters used to construct a `PuzzleGenerator`.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub wordlist_path: PathBuf,
    pub frequency_path: Option<PathBuf>,
    pub use_curated: bool,
    pub curated_size: usize,
    pub min_answer_frequency: f64,
}

impl GeneratorConfig {
    pub fn new(wordlist_path: PathBuf) -> GeneratorConfig {
        GeneratorConfig {
            wordlist_path,
            frequency_path: None,
            use_curated: true,
            curated_size: 3000,
            min_answer_frequency: 0.1,
        }
    }
}

/// Owns the (possibly curated) dictionary, frequency map, and precomputed
/// scores needed to generate puzzles. Read-only after construction, so a
/// single instance may be shared across threads.
#[derive(Debug, Clone)]
pub struct PuzzleGenerator {
    dictionary: Dictionary,
    frequencies: FrequencyMap,
    score_lookup: HashMap<Word, f64>,
    top_scored: Vec<WordScore>,
    answer_candidates: Vec<Word>,
}

impl PuzzleGenerator {
    pub fn new(config: &GeneratorConfig, rng: &mut impl Rng) -> Result<PuzzleGenerator, PuzzleError> {
        let dictionary = Dictionary::load(&config.wordlist_path).map_err(PuzzleError::DictionaryIo)?;
        let frequencies = FrequencyMap::load_optional(config.frequency_path.as_deref());

        PuzzleGenerator::from_parts(
            dictionary,
            frequencies,
            config.use_curated,
            config.curated_size,
            config.min_answer_frequency,
            rng,
        )
    }

    /// Build a generator directly from an in-memory dictionary and
    /// frequency map, bypassing file I/O (used by tests and callers that
    /// already have the data loaded).
    pub fn from_parts(
        dictionary: Dictionary,
        frequencies: FrequencyMap,
        use_curated: bool,
        curated_size: usize,
        min_answer_frequency: f64,
        rng: &mut impl Rng,
    ) -> Result<PuzzleGenerator, PuzzleError> {
        if dictionary.is_empty() {
            return Err(PuzzleError::EmptyDictionary);
        }

        let tables = ScoringTables::build(dictionary.words());
        let full_scores = scoring::score_words(dictionary.words(), &tables, &frequencies);

        let working_dictionary = if use_curated {
            scoring::curated_subset(&dictionary, &full_scores, curated_size, rng)
        } else {
            dictionary
        };

        let working_scores = scoring::score_words(working_dictionary.words(), &tables, &frequencies);

        let mut top_scored = working_scores.clone();
        top_scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap());

        let score_lookup: HashMap<Word, f64> = working_scores.iter().map(|s| (s.word, s.score)).collect();

        let answer_candidates = scoring::answer_candidates(working_dictionary.words(), &frequencies, min_answer_frequency);
        if answer_candidates.is_empty() {
            return Err(PuzzleError::NoEligibleAnswers);
        }

        Ok(PuzzleGenerator { dictionary: working_dictionary, frequencies, score_lookup, top_scored, answer_candidates })
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn frequencies(&self) -> &FrequencyMap {
        &self.frequencies
    }

    fn score_of(&self, word: Word) -> f64 {
        self.score_lookup.get(&word).copied().unwrap_or(0.0)
    }

    /// Find (or choose) an answer, then search for four guesses that narrow
    /// the candidate set as far as possible within `max_attempts` trials.
    pub fn generate_puzzle(
        &self,
        answer: Option<Word>,
        max_attempts: Option<usize>,
        rng: &mut impl Rng,
    ) -> Result<Puzzle, PuzzleError> {
        let answer = match answer {
            Some(answer) => {
                if !self.dictionary.contains(answer) {
                    return Err(PuzzleError::UnknownAnswer(answer));
                }
                answer
            }
            None => scoring::choose_answer(&self.answer_candidates, &self.frequencies, rng)
                .ok_or(PuzzleError::NoEligibleAnswers)?,
        };

        let max_attempts = max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS).max(1);
        let mut best: Option<(Vec<Feedback>, Vec<Word>)> = None;

        for attempt in 0..max_attempts {
            let Some((feedbacks, candidates)) = self.try_one_attempt(answer, attempt, max_attempts, rng) else {
                continue;
            };

            if candidates.len() == 1 && candidates[0] == answer {
                return Ok(self.to_puzzle(answer, feedbacks, candidates));
            }

            let improves = match &best {
                None => true,
                Some((_, best_candidates)) => candidates.len() < best_candidates.len(),
            };
            if improves {
                best = Some((feedbacks, candidates));
            }
        }

        match best {
            Some((feedbacks, candidates)) => Ok(self.to_puzzle(answer, feedbacks, candidates)),
            None => Err(PuzzleError::ExhaustedAttempts { attempts: max_attempts }),
        }
    }

    fn to_puzzle(&self, answer: Word, feedbacks: Vec<Feedback>, candidates: Vec<Word>) -> Puzzle {
        Puzzle {
            answer,
            guesses: feedbacks.iter().map(Guess::from_feedback).collect(),
            candidates_remaining: candidates.len(),
            valid_answers: candidates,
        }
    }

    fn try_one_attempt(
        &self,
        answer: Word,
        attempt: usize,
        max_attempts: usize,
        rng: &mut impl Rng,
    ) -> Option<(Vec<Feedback>, Vec<Word>)> {
        let mut guesses: Vec<Word> = Vec::with_capacity(4);
        let mut feedbacks: Vec<Feedback> = Vec::with_capacity(4);
        let mut candidates: Vec<Word> = self.dictionary.words().to_vec();

        for k in 1..=4usize {
            let pool = self.candidate_pool(attempt, max_attempts, rng);
            let (guess, feedback, next_candidates) = self.select_guess(k, &guesses, &candidates, &pool, answer)?;

            guesses.push(guess);
            feedbacks.push(feedback);
            candidates = next_candidates;
        }

        Some((feedbacks, candidates))
    }

    /// Top-scored words for the first half of attempts, a random sample of
    /// the working dictionary for the second half (diversity injection).
    fn candidate_pool(&self, attempt: usize, max_attempts: usize, rng: &mut impl Rng) -> Vec<Word> {
        if attempt < max_attempts / 2 {
            self.top_scored.iter().take(TOP_POOL_SIZE).map(|s| s.word).collect()
        } else {
            let mut pool: Vec<Word> = self.dictionary.words().to_vec();
            pool.shuffle(rng);
            pool.truncate(RANDOM_POOL_SIZE);
            pool
        }
    }

    fn select_guess(
        &self,
        k: usize,
        chosen: &[Word],
        candidates: &[Word],
        pool: &[Word],
        answer: Word,
    ) -> Option<(Word, Feedback, Vec<Word>)> {
        let chosen_letters = chosen.iter().fold(0u32, |acc, w| acc | w.letters_in_word());

        let mut best: Option<(Word, Feedback, Vec<Word>, f64)> = None;

        for &guess in pool {
            if guess == answer || chosen.contains(&guess) {
                continue;
            }

            let letter_overlap = (guess.letters_in_word() & chosen_letters).count_ones();
            if k < 3 && letter_overlap > LETTER_OVERLAP_CAP {
                continue;
            }

            let feedback = derive_feedback(guess, answer);
            let next_candidates = find_candidates(self.dictionary.words(), std::slice::from_ref(&feedback), Some(candidates));
            if next_candidates.is_empty() {
                continue;
            }

            if k > 1 && candidates.len() > PRUNE_CANDIDATE_FLOOR {
                let reduction = candidates.len() - next_candidates.len();
                if (reduction as f64) < PRUNE_REDUCTION_RATIO * candidates.len() as f64 {
                    continue;
                }
            }

            let info_gain = (candidates.len() - next_candidates.len()) as f64;
            let exact_count = feedback.entries().iter().filter(|e| e.tile == Tile::Exact).count() as f64;
            let present_count = feedback.entries().iter().filter(|e| e.tile == Tile::Present).count() as f64;
            let constraint_score = 5.0 * exact_count + 2.0 * present_count;
            let frequency_bonus = 100.0 * self.score_of(guess);
            let diversity_penalty = 20.0 * letter_overlap as f64;

            let total = 20.0 * info_gain + constraint_score + frequency_bonus - diversity_penalty;

            let better = match &best {
                None => true,
                Some((_, _, best_candidates, best_total)) => {
                    total > *best_total || (total == *best_total && next_candidates.len() < best_candidates.len())
                }
            };

            if better {
                best = Some((guess, feedback, next_candidates, total));
            }
        }

        best.map(|(guess, feedback, candidates, _)| (guess, feedback, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn w(text: &str) -> Word {
        Word::new(text).unwrap()
    }

    fn small_dictionary() -> Dictionary {
        Dictionary::from_words(
            [
                "crane", "slate", "shard", "grass", "apple", "today", "shale", "grace", "stone", "plant", "brisk",
                "fjord", "glyph", "nymph", "vodka", "zesty", "whack", "pluck", "frown", "index",
            ]
            .map(w)
            .to_vec(),
        )
    }

    #[test]
    fn generate_puzzle_narrows_to_the_requested_answer() {
        let dictionary = small_dictionary();
        let generator =
            PuzzleGenerator::from_parts(dictionary, FrequencyMap::empty(), false, 100, 0.1, &mut StdRng::seed_from_u64(7))
                .unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let puzzle = generator.generate_puzzle(Some(w("crane")), Some(50), &mut rng).unwrap();

        assert_eq!(puzzle.answer, w("crane"));
        assert_eq!(puzzle.guesses.len(), 4);
        assert!(puzzle.valid_answers.contains(&w("crane")));
    }

    #[test]
    fn generate_puzzle_rejects_unknown_answer() {
        let dictionary = small_dictionary();
        let generator =
            PuzzleGenerator::from_parts(dictionary, FrequencyMap::empty(), false, 100, 0.1, &mut StdRng::seed_from_u64(1))
                .unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let absent = Word::new("mould").unwrap();
        let err = generator.generate_puzzle(Some(absent), Some(10), &mut rng);
        assert!(matches!(err, Err(PuzzleError::UnknownAnswer(_))));
    }

    #[test]
    fn generate_puzzle_picks_an_eligible_answer_when_none_given() {
        let dictionary = small_dictionary();
        let generator =
            PuzzleGenerator::from_parts(dictionary, FrequencyMap::empty(), false, 100, 0.1, &mut StdRng::seed_from_u64(3))
                .unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let puzzle = generator.generate_puzzle(None, Some(50), &mut rng).unwrap();
        assert!(generator.dictionary().contains(puzzle.answer));
    }

    #[test]
    fn empty_dictionary_is_rejected_at_construction() {
        let dictionary = Dictionary::from_words(vec![]);
        let result =
            PuzzleGenerator::from_parts(dictionary, FrequencyMap::empty(), false, 100, 0.1, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(PuzzleError::EmptyDictionary)));
    }
}
