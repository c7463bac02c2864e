//! The shared letter pool (the bag) and player racks.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Letter, PlayError, PoolError, Variant};

/// Number of tiles a full rack holds.
pub const RACK_SIZE: usize = 7;

/// Remaining tiles per letter, plus their total.
///
/// The total is kept alongside the counts so the top-up check is O(1);
/// every mutation goes through [`LetterPool::draw`], which keeps the two
/// in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterPool {
    counts: Vec<(Letter, u32)>,
    total: u32,
}

impl LetterPool {
    /// Returns a full pool for the variant.
    pub fn new(variant: Variant) -> Self {
        Self::from_counts(
            variant
                .distribution()
                .iter()
                .filter_map(|&(c, n)| Letter::new(c).map(|letter| (letter, n))),
        )
    }

    /// Builds a pool from explicit counts. Letters may repeat; their counts
    /// are merged.
    pub fn from_counts(counts: impl IntoIterator<Item = (Letter, u32)>) -> Self {
        let mut merged: Vec<(Letter, u32)> = Vec::new();
        for (letter, n) in counts {
            match merged.iter_mut().find(|(l, _)| *l == letter) {
                Some((_, existing)) => *existing += n,
                None => merged.push((letter, n)),
            }
        }
        let total = merged.iter().map(|(_, n)| n).sum();
        Self {
            counts: merged,
            total,
        }
    }

    /// Total tiles left.
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Tiles left for one letter.
    pub fn count(&self, letter: Letter) -> u32 {
        self.counts
            .iter()
            .find(|(l, _)| *l == letter)
            .map_or(0, |(_, n)| *n)
    }

    /// Draws one tile, uniformly over the physical tiles left, so a letter
    /// is picked with probability `count / total`.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Result<Letter, PoolError> {
        if self.total == 0 {
            return Err(PoolError::Exhausted);
        }
        let mut pick = rng.random_range(0..self.total);
        for (letter, count) in &mut self.counts {
            if pick < *count {
                *count -= 1;
                self.total -= 1;
                return Ok(*letter);
            }
            pick -= *count;
        }
        // Only reachable if counts and total disagree.
        Err(PoolError::Exhausted)
    }

    /// Number of tiles needed to bring `rack` to a full hand.
    pub fn shortfall(rack: &Rack) -> u32 {
        RACK_SIZE.saturating_sub(rack.len()) as u32
    }

    /// Returns `true` if the pool holds enough tiles to fill `rack`.
    pub fn can_fill(&self, rack: &Rack) -> bool {
        self.total >= Self::shortfall(rack)
    }

    /// Draws until the rack holds [`RACK_SIZE`] tiles, giving each new tile
    /// a fresh id.
    pub fn fill_rack(&mut self, rack: &mut Rack, rng: &mut impl Rng) -> Result<(), PoolError> {
        while rack.len() < RACK_SIZE {
            let letter = self.draw(rng)?;
            rack.tiles.push(Tile {
                id: TileId(rng.random()),
                letter,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tiles and racks
// ---------------------------------------------------------------------------

/// Identity of one physical tile, independent of its letter. Clients use it
/// to follow a specific tile through drag and reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u64);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{:016x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub letter: Letter,
}

/// A player's hand. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rack {
    tiles: Vec<Tile>,
}

impl Rack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn letters(&self) -> impl Iterator<Item = Letter> + '_ {
        self.tiles.iter().map(|t| t.letter)
    }

    /// Checks that every letter in `letters` can be taken from this rack,
    /// each rack tile used at most once.
    pub fn check_letters(&self, letters: &[Letter]) -> Result<(), PlayError> {
        let mut available: Vec<Letter> = self.letters().collect();
        for letter in letters {
            match available.iter().position(|l| l == letter) {
                Some(i) => {
                    available.swap_remove(i);
                }
                None => return Err(PlayError::LetterNotOnRack(*letter)),
            }
        }
        Ok(())
    }

    /// Removes one tile per letter. Fails without touching the rack if a
    /// letter is missing.
    pub fn take_letters(&mut self, letters: &[Letter]) -> Result<Vec<Tile>, PlayError> {
        self.check_letters(letters)?;
        let mut taken = Vec::with_capacity(letters.len());
        for letter in letters {
            if let Some(i) = self.tiles.iter().position(|t| t.letter == *letter) {
                taken.push(self.tiles.remove(i));
            }
        }
        Ok(taken)
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

impl FromIterator<Tile> for Rack {
    fn from_iter<I: IntoIterator<Item = Tile>>(iter: I) -> Self {
        Self {
            tiles: iter.into_iter().collect(),
        }
    }
}
