//! Per-position tile feedback for a (guess, answer) pair, and the test for
//! whether a word is still consistent with an accumulated feedback.
use crate::word::Word;

/// One tile of feedback for a single letter/position of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Correct letter, correct position.
    Exact,
    /// Letter occurs in the answer, but not at this position.
    Present,
    /// No further occurrences of this letter are permitted beyond what
    /// Exact/Present already account for (not necessarily "not in the word").
    Absent,
}

impl Tile {
    fn wire_name(self) -> &'static str {
        match self {
            Tile::Exact => "green",
            Tile::Present => "yellow",
            Tile::Absent => "gray",
        }
    }
}

impl serde::Serialize for Tile {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_name())
    }
}

/// One (letter, position, tile) entry of a derived feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileEntry {
    pub letter: u8,
    pub position: u8,
    pub tile: Tile,
}

/// The five-tile annotation of one guess against one answer.
#[derive(Debug, Clone)]
pub struct Feedback {
    guess: Word,
    entries: [TileEntry; 5],
}

impl Feedback {
    pub fn guess(&self) -> Word {
        self.guess
    }

    pub fn entries(&self) -> &[TileEntry; 5] {
        &self.entries
    }

    pub fn tile_at(&self, position: usize) -> Tile {
        self.entries[position].tile
    }
}

/// Compute the five tiles for `guess` scored against `answer`, using
/// two-pass multiset-aware marking (green/exact pass first, then
/// yellow/present against the remaining letter counts).
pub fn derive_feedback(guess: Word, answer: Word) -> Feedback {
    // Ephemeral multiset of answer letters not yet claimed by an Exact match.
    let mut remaining = [0u8; 26];
    for letter in answer.iter_index() {
        remaining[letter as usize] += 1;
    }

    let mut tiles = [Tile::Absent; 5];

    // First pass: mark Exact matches and remove them from the multiset.
    for pos in 0..5 {
        let g = guess.index_at(pos);
        if g == answer.index_at(pos) {
            tiles[pos] = Tile::Exact;
            remaining[g as usize] -= 1;
        }
    }

    // Second pass: remaining positions are Present if a letter is still
    // available in the multiset, Absent otherwise.
    for pos in 0..5 {
        if tiles[pos] == Tile::Exact {
            continue;
        }

        let g = guess.index_at(pos) as usize;
        if remaining[g] > 0 {
            tiles[pos] = Tile::Present;
            remaining[g] -= 1;
        }
    }

    let mut entries = [TileEntry { letter: 0, position: 0, tile: Tile::Absent }; 5];
    for pos in 0..5 {
        entries[pos] = TileEntry { letter: guess.byte_at(pos), position: pos as u8, tile: tiles[pos] };
    }

    Feedback { guess, entries }
}

/// Whether `word` is consistent with a previously derived `feedback`.
///
/// An Absent tile caps the letter's count at however many Exact/Present
/// entries already require — it does not forbid the letter outright. This is
/// what makes duplicate-letter handling correct (see module docs).
pub fn word_satisfies(word: Word, feedback: &Feedback) -> bool {
    let mut required = [0u8; 26];

    for entry in feedback.entries() {
        match entry.tile {
            Tile::Exact => {
                if word.byte_at(entry.position as usize) != entry.letter {
                    return false;
                }
                required[(entry.letter - b'a') as usize] += 1;
            }
            Tile::Present => {
                if word.byte_at(entry.position as usize) == entry.letter {
                    return false;
                }
                required[(entry.letter - b'a') as usize] += 1;
            }
            Tile::Absent => {
                if word.byte_at(entry.position as usize) == entry.letter {
                    return false;
                }
            }
        }
    }

    for entry in feedback.entries() {
        let idx = (entry.letter - b'a') as usize;
        let have = word.count_of(entry.letter - b'a');
        match entry.tile {
            Tile::Exact | Tile::Present => {
                if have < required[idx] {
                    return false;
                }
            }
            Tile::Absent => {
                if have > required[idx] {
                    return false;
                }
            }
        }
    }

    true
}
