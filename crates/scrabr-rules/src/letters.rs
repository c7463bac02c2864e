//! Letter symbols, point values, and starting distributions.
//!
//! The letter set follows the Portuguese tile set: no `k`, `w`, or `y`,
//! and a blank (`_`) that stands for any letter and scores zero.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single tile symbol: one of the playable letters or the blank.
///
/// Letters are always stored lowercase. Construction goes through
/// [`Letter::new`], so a `Letter` that exists is always one the point
/// table knows about. Serde routes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Letter(char);

impl Letter {
    /// The blank tile marker.
    pub const BLANK: Letter = Letter('_');

    /// Returns the letter for `c` (case-insensitive), or `None` if `c` is
    /// not part of the tile set.
    pub fn new(c: char) -> Option<Self> {
        let lower = c.to_ascii_lowercase();
        if lower == '_' || WILDCARD_ALPHABET.contains(&lower) {
            Some(Self(lower))
        } else {
            None
        }
    }

    /// Returns the underlying character.
    pub fn as_char(self) -> char {
        self.0
    }

    /// Returns `true` for the blank tile.
    pub fn is_blank(self) -> bool {
        self == Self::BLANK
    }

    /// Point value of this tile.
    pub fn value(self) -> u32 {
        letter_value(self.0)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for Letter {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Letter::new(c).ok_or_else(|| format!("'{c}' is not a tile letter"))
    }
}

impl From<Letter> for char {
    fn from(letter: Letter) -> char {
        letter.0
    }
}

/// Letters a blank may stand for, in canonical enumeration order.
///
/// The wildcard resolver walks this order, so when several substitutions
/// spell valid words the one using the earliest letter here wins.
pub const WILDCARD_ALPHABET: [char; 23] = [
    'a', 'e', 'i', 'o', 's', 'u', 'm', 'r', 't', 'd', 'l', 'c', 'p', 'n', 'b',
    'f', 'g', 'h', 'v', 'j', 'q', 'z', 'x',
];

/// Point value of a character. Unknown characters are worth nothing.
pub fn letter_value(c: char) -> u32 {
    match c.to_ascii_lowercase() {
        'a' | 'e' | 'i' | 'o' | 's' | 'u' | 'm' | 'r' | 't' => 1,
        'd' | 'l' | 'c' | 'p' => 2,
        'n' | 'b' => 3,
        'f' | 'g' | 'h' | 'v' => 4,
        'j' => 5,
        'q' => 6,
        'x' | 'z' => 8,
        _ => 0,
    }
}

/// Game variant, fixed at room creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Full bag.
    #[default]
    Standard,
    /// Roughly half the bag, for shorter games.
    Blitz,
}

impl Variant {
    /// Maps the client's blitz toggle to a variant.
    pub fn from_blitz(blitz: bool) -> Self {
        if blitz { Self::Blitz } else { Self::Standard }
    }

    /// Returns `true` for the blitz variant.
    pub fn is_blitz(self) -> bool {
        matches!(self, Self::Blitz)
    }

    /// Starting tile counts for this variant.
    pub fn distribution(self) -> &'static [(char, u32)] {
        match self {
            Self::Standard => STANDARD_DISTRIBUTION,
            Self::Blitz => BLITZ_DISTRIBUTION,
        }
    }
}

const STANDARD_DISTRIBUTION: &[(char, u32)] = &[
    ('_', 2),
    ('a', 14),
    ('e', 11),
    ('i', 10),
    ('o', 10),
    ('s', 8),
    ('u', 7),
    ('m', 6),
    ('r', 6),
    ('t', 5),
    ('d', 5),
    ('l', 5),
    ('c', 4),
    ('p', 4),
    ('n', 4),
    ('b', 3),
    ('f', 3),
    ('v', 3),
    ('g', 2),
    ('h', 2),
    ('j', 2),
    ('q', 1),
    ('x', 1),
    ('z', 1),
];

const BLITZ_DISTRIBUTION: &[(char, u32)] = &[
    ('_', 1),
    ('a', 7),
    ('e', 6),
    ('i', 5),
    ('o', 5),
    ('s', 4),
    ('u', 4),
    ('m', 3),
    ('r', 3),
    ('t', 3),
    ('d', 3),
    ('l', 3),
    ('c', 2),
    ('p', 2),
    ('n', 2),
    ('b', 2),
    ('f', 2),
    ('v', 2),
    ('g', 1),
    ('h', 1),
    ('j', 1),
    ('q', 1),
    ('x', 1),
    ('z', 1),
];
