//! Game rules for Scrabr.
//!
//! Everything in this crate is pure with respect to room state: functions
//! take a board, a rack and a proposed play and return a verdict. The room
//! layer decides when to commit.
//!
//! # Key types
//!
//! - [`Board`] and [`bonus_overlay`] — the grid and its multipliers
//! - [`LetterPool`] and [`Rack`] — the bag and a player's hand
//! - [`extract_words`] — maximal runs of tiles on a board
//! - [`validate_play`] — placement legality
//! - [`DictionaryOracle`] — the spelling boundary; [`WordList`] implements it
//! - [`evaluate_play`] — validation, spelling and scoring in one call

#![allow(async_fn_in_trait)]

mod board;
mod dictionary;
mod error;
mod letters;
mod play;
mod pool;
mod scoring;
mod validator;
pub mod wildcard;
mod words;

pub use board::{BOARD_SIZE, Board, Bonus, BonusOverlay, Position, bonus_overlay};
pub use dictionary::{DictionaryOracle, WordList};
pub use error::{PlayError, PoolError};
pub use letters::{Letter, Variant, WILDCARD_ALPHABET, letter_value};
pub use play::{EvaluatedPlay, ScoredWord, evaluate_play};
pub use pool::{LetterPool, RACK_SIZE, Rack, Tile, TileId};
pub use scoring::score_word;
pub use validator::{Placement, ValidatedPlay, validate_play};
pub use words::{BoardWord, extract_words};
