//! Typed errors surfaced by the puzzle core.
use thiserror::Error;

use crate::word::Word;

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("dictionary is empty, cannot build a generator")]
    EmptyDictionary,

    #[error("requested answer {0} is not present in the dictionary")]
    UnknownAnswer(Word),

    #[error("no answer candidates met the frequency eligibility threshold")]
    NoEligibleAnswers,

    #[error("exhausted {attempts} attempts without completing four guesses")]
    ExhaustedAttempts { attempts: usize },

    #[error("failed to read dictionary file: {0}")]
    DictionaryIo(#[source] std::io::Error),
}
