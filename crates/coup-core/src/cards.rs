//! Character cards and the court deck.
//!
//! This module contains:
//! - The five character types
//! - The court deck (the face-down pool of cards not held or revealed)

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Copies of each character in a fresh deck
pub const COPIES_PER_CHARACTER: usize = 3;

/// Total cards in a fresh deck (5 characters x 3 copies)
pub const DECK_SIZE: usize = 15;

/// The five character cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Character {
    /// Tax; blocks foreign aid
    Duke,
    /// Assassinate
    Assassin,
    /// Steal; blocks steal
    Captain,
    /// Exchange; blocks steal
    Ambassador,
    /// Blocks assassination
    Contessa,
}

impl Character {
    pub const ALL: [Character; 5] = [
        Character::Duke,
        Character::Assassin,
        Character::Captain,
        Character::Ambassador,
        Character::Contessa,
    ];
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Character::Duke => "Duke",
            Character::Assassin => "Assassin",
            Character::Captain => "Captain",
            Character::Ambassador => "Ambassador",
            Character::Contessa => "Contessa",
        };
        f.write_str(name)
    }
}

/// The court deck.
///
/// Every operation that puts cards back reshuffles, so deck order never
/// encodes where a returned card came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Remaining face-down cards; the draw end is the back
    pub cards: Vec<Character>,
}

impl Deck {
    /// Create the standard 15-card deck, shuffled
    pub fn standard<R: Rng>(rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for character in Character::ALL {
            cards.extend(std::iter::repeat(character).take(COPIES_PER_CHARACTER));
        }
        cards.shuffle(rng);
        Self { cards }
    }

    /// Draw one card, or `None` if the deck is empty.
    ///
    /// An empty deck is "no card available", not a hard error: only exchange
    /// and challenge replacement draw, and both degrade to drawing fewer.
    pub fn draw(&mut self) -> Option<Character> {
        self.cards.pop()
    }

    /// Draw up to `count` cards (fewer if the deck runs out)
    pub fn draw_up_to(&mut self, count: usize) -> Vec<Character> {
        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            match self.draw() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }

    /// Return cards to the deck and reshuffle
    pub fn return_cards<R: Rng>(
        &mut self,
        cards: impl IntoIterator<Item = Character>,
        rng: &mut R,
    ) {
        self.cards.extend(cards);
        self.shuffle(rng);
    }

    /// Shuffle the deck in place
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Number of cards remaining
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is empty
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
