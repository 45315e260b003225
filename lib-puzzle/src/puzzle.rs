//! Output types for a generated puzzle, matching the wire schema consumed by
//! the CLI and HTTP shells.
use serde::Serialize;

use crate::feedback::{Feedback, Tile};
use crate::word::Word;

/// One constraint tile in the wire schema: a letter, its position, and the
/// tile color.
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintTile {
    pub letter: char,
    pub position: u8,
    #[serde(rename = "type")]
    pub tile_type: Tile,
}

/// One guess and its five constraint tiles.
#[derive(Debug, Clone, Serialize)]
pub struct Guess {
    pub word: Word,
    pub constraints: Vec<ConstraintTile>,
}

impl Guess {
    pub fn from_feedback(feedback: &Feedback) -> Guess {
        let constraints = feedback
            .entries()
            .iter()
            .map(|entry| ConstraintTile {
                letter: entry.letter as char,
                position: entry.position,
                tile_type: entry.tile,
            })
            .collect();

        Guess { word: feedback.guess(), constraints }
    }
}

/// The result of one `generate_puzzle` call.
#[derive(Debug, Clone, Serialize)]
pub struct Puzzle {
    pub answer: Word,
    pub guesses: Vec<Guess>,
    pub valid_answers: Vec<Word>,
    pub candidates_remaining: usize,
}

impl Puzzle {
    /// A puzzle is perfect iff exactly one word (the answer) remains
    /// consistent with every guess's feedback.
    pub fn is_perfect(&self) -> bool {
        self.candidates_remaining == 1 && self.valid_answers == [self.answer]
    }
}
