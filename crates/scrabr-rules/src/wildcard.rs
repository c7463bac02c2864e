//! Blank-tile resolution.
//!
//! A word containing blanks is valid if some substitution of its blanks
//! spells a dictionary word. Candidates are generated lazily as a Cartesian
//! product over the blank positions, rightmost blank varying fastest, each
//! blank walking [`WILDCARD_ALPHABET`] in order.

use std::collections::HashSet;

use futures_util::future::join_all;

use crate::{DictionaryOracle, Letter, WILDCARD_ALPHABET};

/// Iterator over every spelling of a word with its blanks filled in.
///
/// A word without blanks yields itself once.
#[derive(Debug, Clone)]
pub struct Expansions {
    template: Vec<char>,
    blanks: Vec<usize>,
    odometer: Vec<usize>,
    exhausted: bool,
}

impl Expansions {
    pub fn new(word: &str) -> Self {
        let template: Vec<char> = word.chars().collect();
        let blanks: Vec<usize> = template
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Letter::BLANK.as_char())
            .map(|(i, _)| i)
            .collect();
        let odometer = vec![0; blanks.len()];
        Self {
            template,
            blanks,
            odometer,
            exhausted: false,
        }
    }

    /// Advances the rightmost digit, carrying left. Returns `false` once
    /// every combination has been produced.
    fn advance(&mut self) -> bool {
        for digit in self.odometer.iter_mut().rev() {
            *digit += 1;
            if *digit < WILDCARD_ALPHABET.len() {
                return true;
            }
            *digit = 0;
        }
        false
    }
}

impl Iterator for Expansions {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.exhausted {
            return None;
        }
        let mut spelled = self.template.clone();
        for (&at, &digit) in self.blanks.iter().zip(&self.odometer) {
            spelled[at] = WILDCARD_ALPHABET[digit];
        }
        if !self.advance() {
            self.exhausted = true;
        }
        Some(spelled.into_iter().collect())
    }
}

/// Finds the spelling under which `word` is valid.
///
/// Words without blanks are checked directly. For blanks, every distinct
/// candidate is queried concurrently and the first valid one in
/// enumeration order is returned. `None` means no spelling is valid.
pub async fn resolve<D: DictionaryOracle>(word: &str, oracle: &D) -> Option<String> {
    let mut seen = HashSet::new();
    let candidates: Vec<String> = Expansions::new(word)
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect();

    let verdicts = join_all(candidates.iter().map(|c| oracle.is_valid(c))).await;

    candidates
        .into_iter()
        .zip(verdicts)
        .find_map(|(candidate, valid)| valid.then_some(candidate))
}
