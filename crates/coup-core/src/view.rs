//! Per-observer redaction of game state.
//!
//! `Game::redact` produces the only projection that may leave the trust
//! boundary: other players' hidden hands collapse to a count, exchange
//! options are visible only to the exchanging actor, and the deck is
//! stripped unless the observer is the privileged debug identity. Apply it
//! to every outbound state, never to the stored authoritative copy.

use crate::actions::{ActionKind, ActionType, Block, PendingAction, ResponseRecord};
use crate::cards::Character;
use crate::game::{Game, GamePhase};
use crate::history::HistoryEntry;
use crate::player::{Player, PlayerId, PlayerStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Observer identity that may see the deck contents
pub const DEBUG_OBSERVER: &str = "debug";

/// A player as seen by an observer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub coins: u32,
    /// Number of hidden influence cards (public knowledge)
    pub influence_count: usize,
    /// Hidden hand; present only for the observer's own player
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Character>>,
    /// Revealed cards are already public
    pub revealed: Vec<Character>,
    pub status: PlayerStatus,
}

/// The pending action as seen by an observer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedPendingAction {
    pub actor: PlayerId,
    pub action: ActionType,
    pub claimed_character: Option<Character>,
    pub target: Option<PlayerId>,
    pub responses: BTreeMap<PlayerId, ResponseRecord>,
    pub block: Option<Block>,
    /// Exchange options; present only for the exchanging actor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_options: Option<Vec<Character>>,
}

/// The game as seen by an observer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedGame {
    pub players: Vec<RedactedPlayer>,
    /// Deck contents; present only for the debug observer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<Vec<Character>>,
    pub turn_index: usize,
    pub turn_count: u32,
    pub phase: GamePhase,
    pub pending_action: Option<RedactedPendingAction>,
    pub history: Vec<HistoryEntry>,
    pub formatted_history: Vec<String>,
    pub winner: Option<PlayerId>,
}

fn redact_player(player: &Player, observer: &str) -> RedactedPlayer {
    let own = player.id == observer;
    RedactedPlayer {
        id: player.id.clone(),
        name: player.name.clone(),
        coins: player.coins,
        influence_count: player.influence_count(),
        hand: own.then(|| player.hand.clone()),
        revealed: player.revealed.clone(),
        status: player.status,
    }
}

fn redact_pending(pending: &PendingAction, observer: &str) -> RedactedPendingAction {
    let exchange_options = match &pending.kind {
        ActionKind::Exchange {
            options: Some(options),
        } if pending.actor == observer => Some(options.clone()),
        _ => None,
    };
    RedactedPendingAction {
        actor: pending.actor.clone(),
        action: pending.kind.action_type(),
        claimed_character: pending.kind.claim(),
        target: pending.kind.target().cloned(),
        responses: pending.responses.clone(),
        block: pending.block.clone(),
        exchange_options,
    }
}

impl Game {
    /// Project the state for `observer`, hiding everything they may not see
    pub fn redact(&self, observer: &str) -> RedactedGame {
        RedactedGame {
            players: self
                .players
                .iter()
                .map(|p| redact_player(p, observer))
                .collect(),
            deck: (observer == DEBUG_OBSERVER).then(|| self.deck.cards.clone()),
            turn_index: self.turn_index,
            turn_count: self.turn_count,
            phase: self.phase,
            pending_action: self
                .pending_action
                .as_ref()
                .map(|p| redact_pending(p, observer)),
            history: self.history.clone(),
            formatted_history: self.formatted_history(),
            winner: self.winner.clone(),
        }
    }
}
