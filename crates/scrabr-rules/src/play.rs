//! The full evaluation pipeline for one proposed play: placement rules,
//! spelling, then price.

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::{
    Board, DictionaryOracle, Letter, PlayError, Placement, Position, Rack, bonus_overlay,
    score_word, validate_play, wildcard,
};

/// A new word that passed the dictionary, with its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredWord {
    /// Resolved spelling. Blanks are replaced by the letter they stand for.
    pub word: String,
    pub positions: Vec<Position>,
    pub score: u32,
}

/// The outcome of a legal play, not yet applied to any room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedPlay {
    pub board: Board,
    pub words: Vec<ScoredWord>,
    pub total: u32,
    pub consumed: Vec<Letter>,
}

/// Validates, spell-checks and scores a play without side effects.
///
/// Every new word is resolved concurrently. If any word has no valid
/// spelling the play fails with the first such word in extraction order.
pub async fn evaluate_play<D: DictionaryOracle>(
    board: &Board,
    rack: &Rack,
    placements: &[Placement],
    oracle: &D,
) -> Result<EvaluatedPlay, PlayError> {
    let validated = validate_play(board, rack, placements)?;

    let resolved = join_all(
        validated
            .new_words
            .iter()
            .map(|w| wildcard::resolve(&w.word, oracle)),
    )
    .await;

    let overlay = bonus_overlay();
    let mut words = Vec::with_capacity(validated.new_words.len());
    for (found, spelling) in validated.new_words.into_iter().zip(resolved) {
        let Some(spelling) = spelling else {
            return Err(PlayError::UnknownWord(found.word));
        };
        let score = score_word(&spelling, &found.positions, overlay);
        words.push(ScoredWord {
            word: spelling,
            positions: found.positions,
            score,
        });
    }
    let total = words.iter().map(|w| w.score).sum();

    Ok(EvaluatedPlay {
        board: validated.board,
        words,
        total,
        consumed: validated.consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tile, TileId, WordList};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn rack_of(letters: &str) -> Rack {
        letters
            .chars()
            .enumerate()
            .map(|(i, c)| Tile {
                id: TileId(i as u64),
                letter: Letter::new(c).unwrap(),
            })
            .collect()
    }

    fn across(row: usize, col: usize, word: &str) -> Vec<Placement> {
        word.chars()
            .enumerate()
            .map(|(i, c)| Placement::new(pos(row, col + i), Letter::new(c).unwrap()))
            .collect()
    }

    fn oracle() -> WordList {
        WordList::from_words(["casa", "mar", "mas", "cat", "cot", "cut", "os", "mo", "as"])
    }

    #[tokio::test]
    async fn test_first_move_is_priced() {
        let play = evaluate_play(&Board::empty(), &rack_of("casa"), &across(7, 5, "casa"), &oracle())
            .await
            .unwrap();
        assert_eq!(play.words.len(), 1);
        assert_eq!(play.words[0].word, "casa");
        assert_eq!(play.total, 2 + 1 + 1 + 1);
    }

    #[tokio::test]
    async fn test_unknown_word_rejects_the_play() {
        let err = evaluate_play(&Board::empty(), &rack_of("zzq"), &across(7, 6, "zzq"), &oracle())
            .await
            .unwrap_err();
        assert_eq!(err, PlayError::UnknownWord("zzq".into()));
    }

    #[tokio::test]
    async fn test_blank_scores_as_the_letter_it_resolves_to() {
        let play = evaluate_play(&Board::empty(), &rack_of("c_t"), &across(7, 6, "c_t"), &oracle())
            .await
            .unwrap();
        assert_eq!(play.words[0].word, "cat");
        assert_eq!(play.total, 2 + 1 + 1);
        // The board keeps the blank itself.
        assert_eq!(play.board.get(Position::CENTER), Some(Letter::BLANK));
    }

    #[tokio::test]
    async fn test_blank_on_double_letter_doubles_its_resolved_value() {
        // (7,3) is a double letter; the blank there stands for `b`.
        let oracle = WordList::from_words(["barco"]);
        let play = evaluate_play(&Board::empty(), &rack_of("_arco"), &across(7, 3, "_arco"), &oracle)
            .await
            .unwrap();
        assert_eq!(play.words[0].word, "barco");
        assert_eq!(play.total, 3 * 2 + 1 + 1 + 2 + 1);
    }

    #[tokio::test]
    async fn test_every_new_word_must_be_valid() {
        let board = Board::empty().with_word(pos(7, 6), true, "mar");
        // "os" across is fine, so are "mo" and "as" down.
        let ok = evaluate_play(&board, &rack_of("os"), &across(8, 6, "os"), &oracle())
            .await
            .unwrap();
        assert_eq!(ok.words.len(), 3);
        assert_eq!(ok.total, ok.words.iter().map(|w| w.score).sum::<u32>());

        // "ia" across is not in the list.
        let err = evaluate_play(&board, &rack_of("ia"), &across(8, 6, "ia"), &oracle())
            .await
            .unwrap_err();
        assert_eq!(err, PlayError::UnknownWord("ia".into()));
    }

    #[tokio::test]
    async fn test_placement_errors_short_circuit_the_oracle() {
        let board = Board::empty().with_word(pos(7, 6), true, "mar");
        let err = evaluate_play(&board, &rack_of("os"), &across(7, 6, "os"), &oracle())
            .await
            .unwrap_err();
        assert!(err.is_desync());
    }
}
