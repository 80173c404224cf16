// SPDX-License-Identifier: MIT

//! Guess checking and round scoring

use crate::gateway::PuzzleData;

pub const FULL_SCORE: u32 = 100;
pub const HINT_SCORE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct { points: u32 },
    Wrong,
}

/// One puzzle being played. Tracks whether the hint was revealed so a win
/// after peeking scores less.
#[derive(Debug)]
pub struct Round {
    puzzle: PuzzleData,
    hint_shown: bool,
}

impl Round {
    pub fn new(puzzle: PuzzleData) -> Self {
        Self {
            puzzle,
            hint_shown: false,
        }
    }

    /// True when the gateway substituted the sentinel; the "hint" then holds
    /// the provider error message and the round is not playable.
    pub fn is_error(&self) -> bool {
        self.puzzle.is_error()
    }

    pub fn emojis(&self) -> &str {
        &self.puzzle.emojis
    }

    pub fn answer(&self) -> &str {
        &self.puzzle.answer
    }

    /// Reveal the hint, halving the score of a later win.
    pub fn hint(&mut self) -> &str {
        self.hint_shown = true;
        &self.puzzle.hint
    }

    pub fn check(&self, guess: &str) -> GuessOutcome {
        let guess = normalize(guess);
        if guess.is_empty() {
            return GuessOutcome::Wrong;
        }

        let matched = normalize(&self.puzzle.answer) == guess
            || self
                .puzzle
                .acceptable_answers
                .iter()
                .any(|a| normalize(a) == guess);

        if matched {
            let points = if self.hint_shown { HINT_SCORE } else { FULL_SCORE };
            GuessOutcome::Correct { points }
        } else {
            GuessOutcome::Wrong
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}
