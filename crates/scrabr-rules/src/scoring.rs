//! Word and play scoring against the bonus overlay.

use crate::{BonusOverlay, Position, letter_value};

/// Scores one word laid on `positions`.
///
/// Letter multipliers apply to their own letter; word multipliers compound
/// across the word. Words holding a blank are scored by their resolved
/// spelling, so the blank is worth the letter it stands for.
pub fn score_word(word: &str, positions: &[Position], overlay: &BonusOverlay) -> u32 {
    let mut letters = 0;
    let mut factor = 1;
    for (c, pos) in word.chars().zip(positions) {
        let bonus = overlay.get(*pos);
        letters += letter_value(c) * bonus.letter_multiplier();
        factor *= bonus.word_multiplier();
    }
    letters * factor
}
