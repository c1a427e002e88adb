//! Player state and influence management.
//!
//! This module contains:
//! - Player record (coins, hidden hand, revealed cards, status)
//! - The influence-loss rule, including elimination

use crate::cards::Character;
use serde::{Deserialize, Serialize};

/// Stable player identifier, e.g. `"player1"`
pub type PlayerId = String;

/// Coins dealt to each player at game start
pub const STARTING_COINS: u32 = 2;

/// Hidden cards dealt to each player at game start
pub const STARTING_HAND_SIZE: usize = 2;

/// Whether a player is still in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    Active,
    Eliminated,
}

/// A single player's state.
///
/// `status` is `Eliminated` exactly when `hand` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Current coins
    pub coins: u32,
    /// Hidden influence cards (at most 2)
    pub hand: Vec<Character>,
    /// Permanently revealed cards, oldest first
    pub revealed: Vec<Character>,
    /// Active or eliminated
    pub status: PlayerStatus,
}

impl Player {
    /// Create a new player with starting coins and an empty hand.
    /// Cards are dealt by the game when the deck is built.
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            coins: STARTING_COINS,
            hand: Vec::with_capacity(STARTING_HAND_SIZE),
            revealed: Vec::new(),
            status: PlayerStatus::Active,
        }
    }

    /// Whether this player is still in the game
    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Number of hidden influence cards
    pub fn influence_count(&self) -> usize {
        self.hand.len()
    }

    /// Whether the hidden hand contains `character`
    pub fn holds(&self, character: Character) -> bool {
        self.hand.contains(&character)
    }

    /// Remove one copy of `character` from the hidden hand.
    /// Returns false if the player does not hold it.
    pub fn take_card(&mut self, character: Character) -> bool {
        if let Some(pos) = self.hand.iter().position(|c| *c == character) {
            self.hand.remove(pos);
            true
        } else {
            false
        }
    }

    /// Lose one influence card, moving it to `revealed`.
    ///
    /// If `choice` names a card in the hand, that card is lost; otherwise the
    /// oldest card is lost, so callers that cannot ask the player still get a
    /// legal outcome. An empty hand is a no-op returning `None`.
    pub fn lose_influence(&mut self, choice: Option<Character>) -> Option<Character> {
        if self.hand.is_empty() {
            return None;
        }

        let pos = choice
            .and_then(|card| self.hand.iter().position(|c| *c == card))
            .unwrap_or(0);
        let lost = self.hand.remove(pos);
        self.revealed.push(lost);

        if self.hand.is_empty() {
            self.status = PlayerStatus::Eliminated;
        }
        Some(lost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Character::*;

    fn player_with_hand(hand: Vec<Character>) -> Player {
        let mut player = Player::new("player1".to_string(), "Player 1".to_string());
        player.hand = hand;
        player
    }

    #[test]
    fn test_lose_influence_default_is_oldest() {
        let mut player = player_with_hand(vec![Duke, Assassin]);
        let lost = player.lose_influence(None);
        assert_eq!(lost, Some(Duke));
        assert_eq!(player.hand, vec![Assassin]);
        assert_eq!(player.revealed, vec![Duke]);
        assert!(player.is_active());
    }

    #[test]
    fn test_lose_influence_specific_card() {
        let mut player = player_with_hand(vec![Duke, Assassin]);
        let lost = player.lose_influence(Some(Assassin));
        assert_eq!(lost, Some(Assassin));
        assert_eq!(player.hand, vec![Duke]);
    }

    #[test]
    fn test_lose_influence_missing_choice_falls_back() {
        let mut player = player_with_hand(vec![Duke, Assassin]);
        let lost = player.lose_influence(Some(Contessa));
        assert_eq!(lost, Some(Duke));
    }

    #[test]
    fn test_losing_last_card_eliminates() {
        let mut player = player_with_hand(vec![Captain]);
        player.lose_influence(None);
        assert_eq!(player.status, PlayerStatus::Eliminated);
        assert!(!player.is_active());
        assert_eq!(player.influence_count(), 0);
    }

    #[test]
    fn test_lose_influence_on_empty_hand_is_noop() {
        let mut player = player_with_hand(vec![Captain]);
        player.lose_influence(None);
        assert_eq!(player.lose_influence(None), None);
        assert_eq!(player.revealed, vec![Captain]);
    }

    #[test]
    fn test_take_card() {
        let mut player = player_with_hand(vec![Duke, Duke]);
        assert!(player.take_card(Duke));
        assert_eq!(player.hand, vec![Duke]);
        assert!(!player.take_card(Contessa));
    }
}
